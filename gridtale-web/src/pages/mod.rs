pub mod game;
pub mod home;
pub mod level;
pub mod not_found;

pub use game::{AssetStatus, GamePage};
pub use home::HomePage;
pub use level::{LEVELS, LevelEntry, LevelList};
pub use not_found::NotFound;
