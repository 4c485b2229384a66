//! Helpers for the deployment base path that data/asset URLs are built from.

/// Logical path of the sprite-atlas bundle, resolved under [`base_path`].
pub const SPRITE_SHEET_PATH: &str = "things/game_sprites.json";

/// Directory, under the base path, that scene-description files live in.
pub const SCENE_SETUP_DIR: &str = "sceneSetups";

/// Configured base path for remote data and assets.
///
/// When `PUBLIC_URL` is set at compile time (e.g., `/game` for a sub-path
/// deployment), it is used as-is; local builds fall back to a relative base.
/// The result always ends with `/`.
#[must_use]
pub fn base_path() -> String {
    normalize_base(option_env!("PUBLIC_URL").unwrap_or("./"))
}

/// Join `relative` under `base`, collapsing duplicate separators.
#[must_use]
pub fn join(base: &str, relative: &str) -> String {
    format!("{}{}", normalize_base(base), relative.trim_start_matches('/'))
}

fn normalize_base(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        String::from("./")
    } else if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::{base_path, join, normalize_base};

    #[test]
    fn base_always_ends_with_separator() {
        assert_eq!(normalize_base("./"), "./");
        assert_eq!(normalize_base("/game"), "/game/");
        assert_eq!(normalize_base("/game/"), "/game/");
        assert_eq!(normalize_base(""), "./");
        assert!(base_path().ends_with('/'));
    }

    #[test]
    fn join_strips_leading_slashes_from_relative() {
        assert_eq!(join("./", "things/sprites.json"), "./things/sprites.json");
        assert_eq!(join("/game", "/things/sprites.json"), "/game/things/sprites.json");
    }
}
