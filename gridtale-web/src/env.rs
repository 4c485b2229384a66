//! Hosting-context classification.
//!
//! Embedded WebViews, `file://` origins, and static hosting without an SPA
//! fallback all break path-based routing in different ways. The classifier
//! runs once at startup and answers a single question: is path-based
//! navigation safe here, or must the app fall back to fragment routing?

use once_cell::sync::Lazy;
use regex::Regex;

// An `.html` entry path signals a document opened directly, with no
// server-side rewrite of unknown paths to the entry document.
static HTML_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.html(?:$|[?#])").expect("static pattern"));

/// Properties of the current location that decide navigation strategy.
///
/// Computed once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingContext {
    pub protocol: String,
    pub origin: String,
    pub pathname: String,
    pub is_http_like: bool,
    pub is_null_origin: bool,
    pub is_html_entry_path: bool,
}

impl HostingContext {
    /// Classify raw location components. Pure and infallible.
    #[must_use]
    pub fn from_parts(protocol: &str, origin: &str, pathname: &str) -> Self {
        let scheme = protocol.trim_end_matches(':').to_ascii_lowercase();
        let is_http_like = scheme == "http" || scheme == "https";
        let is_null_origin = origin.is_empty() || origin == "null";
        let is_html_entry_path = HTML_ENTRY.is_match(pathname);
        Self {
            protocol: protocol.to_string(),
            origin: origin.to_string(),
            pathname: pathname.to_string(),
            is_http_like,
            is_null_origin,
            is_html_entry_path,
        }
    }

    /// The conservative default when the location cannot be read: assume a
    /// constrained environment, where only fragment routing is safe.
    #[must_use]
    pub fn constrained() -> Self {
        Self::from_parts("", "", "/")
    }

    /// Classify the current browser location.
    ///
    /// Never fails: any error while inspecting `location` yields
    /// [`HostingContext::constrained`].
    #[must_use]
    pub fn detect() -> Self {
        let Some(location) = web_sys::window().map(|win| win.location()) else {
            return Self::constrained();
        };
        let (Ok(protocol), Ok(origin), Ok(pathname)) =
            (location.protocol(), location.origin(), location.pathname())
        else {
            return Self::constrained();
        };
        Self::from_parts(&protocol, &origin, &pathname)
    }

    /// Decision rule consumed by the router bootstrapper.
    ///
    /// Path-based routing needs server cooperation that is absent on
    /// file-like origins, null-origin sandboxes, and raw `.html` entries;
    /// fragment routing never leaves the current document.
    #[must_use]
    pub const fn prefers_hash_navigation(&self) -> bool {
        !self.is_http_like || self.is_null_origin || self.is_html_entry_path
    }
}

#[cfg(test)]
mod tests {
    use super::HostingContext;

    #[test]
    fn file_protocol_is_never_http_like() {
        for path in ["/", "/index", "/deep/route"] {
            let ctx = HostingContext::from_parts("file:", "null", path);
            assert!(!ctx.is_http_like);
            assert!(ctx.prefers_hash_navigation());
        }
    }

    #[test]
    fn null_or_missing_origin_is_constrained() {
        let ctx = HostingContext::from_parts("https:", "null", "/");
        assert!(ctx.is_null_origin);
        assert!(ctx.prefers_hash_navigation());

        let ctx = HostingContext::from_parts("https:", "", "/");
        assert!(ctx.is_null_origin);
        assert!(ctx.prefers_hash_navigation());
    }

    #[test]
    fn html_entry_path_forces_hash_even_on_http() {
        let ctx = HostingContext::from_parts("http:", "http://localhost:8080", "/index.html");
        assert!(ctx.is_http_like);
        assert!(ctx.is_html_entry_path);
        assert!(ctx.prefers_hash_navigation());

        // Query/fragment after the .html segment still counts as an entry document.
        let ctx = HostingContext::from_parts("http:", "http://localhost", "/index.html?x=1");
        assert!(ctx.is_html_entry_path);
    }

    #[test]
    fn plain_https_origin_uses_path_navigation() {
        let ctx = HostingContext::from_parts("https:", "https://example.com", "/play/level");
        assert!(ctx.is_http_like);
        assert!(!ctx.is_null_origin);
        assert!(!ctx.is_html_entry_path);
        assert!(!ctx.prefers_hash_navigation());
    }

    #[test]
    fn constrained_default_is_not_http_like() {
        let ctx = HostingContext::constrained();
        assert!(!ctx.is_http_like);
        assert!(ctx.prefers_hash_navigation());
    }
}
