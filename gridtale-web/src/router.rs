use yew_router::prelude::*;

use crate::env::HostingContext;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/level")]
    Level,
    #[at("/game")]
    Game,
    #[at("/404")]
    #[not_found]
    NotFound,
}

/// One-time navigation strategy decision, made at startup from the
/// [`HostingContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationPlan {
    /// Fragment routing. `root` records the current pathname: a sandbox
    /// host may have rewritten the path independent of the configured
    /// base, so the configured base must not be used here.
    Hash { root: String },
    /// Path routing under the configured base (`None` when served from
    /// the site root).
    Path { base: Option<String> },
}

impl NavigationPlan {
    #[must_use]
    pub fn select(context: &HostingContext, configured_base: &str) -> Self {
        if context.prefers_hash_navigation() {
            let root = if context.pathname.is_empty() {
                String::from("/")
            } else {
                context.pathname.clone()
            };
            Self::Hash { root }
        } else {
            Self::Path {
                base: router_base(configured_base),
            }
        }
    }
}

/// Turn the configured base path into a router basename.
///
/// Relative bases collapse to `None` (the router roots at `/`), and a
/// trailing separator is trimmed the way the router expects.
fn router_base(configured_base: &str) -> Option<String> {
    let base = configured_base.trim().trim_end_matches('/');
    if base.is_empty() || base == "." {
        None
    } else {
        Some(base.to_string())
    }
}
