//! Guarded wrapper around the browser history-mutation primitives.
//!
//! Embedded previews (VS Code HTML preview and similar) inject a
//! cross-origin `<base>` tag that assets need but that can make a router
//! build cross-origin history URLs. `pushState`/`replaceState` with such a
//! URL throws a `SecurityError` and black-screens the app. The guard
//! resolves every URL against the current document, rewrites anything
//! cross-origin or malformed to a same-origin equivalent, and retries once
//! when the underlying call still fails with a security error.
//!
//! The underlying primitives are captured once at install time; callers go
//! through the wrapper instead of reaching into `window.history`.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::History;

/// Snapshot of the parts of the document URL needed to synthesize a safe
/// same-origin replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUrl {
    pub origin: String,
    pub pathname: String,
    pub search: String,
    pub href: String,
}

impl DocumentUrl {
    /// Capture the current document URL, or `None` when the location is
    /// unreadable (in which case sanitization is skipped entirely).
    #[must_use]
    pub fn capture() -> Option<Self> {
        let location = web_sys::window()?.location();
        Some(Self {
            origin: location.origin().ok()?,
            pathname: location.pathname().ok()?,
            search: location.search().ok()?,
            href: location.href().ok()?,
        })
    }

    /// An absolute same-origin URL for the current document, carrying the
    /// given fragment. `<base href>` cannot affect an absolute URL, which
    /// is why the synthesized form is always absolute.
    #[must_use]
    pub fn forced_same_origin(&self, fragment: &str) -> String {
        format!("{}{}{}{fragment}", self.origin, self.pathname, self.search)
    }
}

/// Extract the fragment (`#...`) from a raw URL-like string.
///
/// Works on inputs that fail full URL resolution, since fragment-only
/// inputs are the common case for fragment-based navigation.
#[must_use]
pub fn fragment_of(raw: &str) -> &str {
    match raw.find('#') {
        Some(idx) => &raw[idx..],
        None => "",
    }
}

/// Rewrite `raw` so the URL handed to the history primitive is always
/// resolvable to the current origin.
///
/// `resolve` resolves a URL-like string against the document URL and
/// reports the resolved `(origin, href)`; it is injected so the policy can
/// be exercised without a browser.
pub fn sanitize_with<R>(raw: &str, doc: &DocumentUrl, resolve: R) -> String
where
    R: Fn(&str) -> Option<(String, String)>,
{
    match resolve(raw) {
        Some((origin, href)) if origin == doc.origin => href,
        _ => doc.forced_same_origin(fragment_of(raw)),
    }
}

fn resolve_against(raw: &str, base_href: &str) -> Option<(String, String)> {
    let url = web_sys::Url::new_with_base(raw, base_href).ok()?;
    Some((url.origin(), url.href()))
}

fn is_security_error(err: &JsValue) -> bool {
    err.dyn_ref::<web_sys::DomException>()
        .is_some_and(|ex| ex.name() == "SecurityError")
}

#[derive(Clone, Copy)]
enum Op {
    Push,
    Replace,
}

/// Wrapper owning the captured [`History`] handle.
pub struct HistoryGuard {
    history: History,
}

impl HistoryGuard {
    /// Append a history entry with a guarded URL.
    ///
    /// # Errors
    /// Propagates the underlying failure when even the forced same-origin
    /// retry is rejected; navigation is fundamentally broken then.
    pub fn push_state(&self, state: &JsValue, title: &str, url: Option<&str>) -> Result<(), JsValue> {
        self.apply(Op::Push, state, title, url)
    }

    /// Replace the current history entry with a guarded URL.
    ///
    /// # Errors
    /// Same contract as [`HistoryGuard::push_state`].
    pub fn replace_state(
        &self,
        state: &JsValue,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), JsValue> {
        self.apply(Op::Replace, state, title, url)
    }

    fn apply(&self, op: Op, state: &JsValue, title: &str, url: Option<&str>) -> Result<(), JsValue> {
        let Some(doc) = DocumentUrl::capture() else {
            // No readable location, nothing to sanitize against.
            return self.raw(op, state, title, url);
        };

        let safe = url.map(|raw| sanitize_with(raw, &doc, |u| resolve_against(u, &doc.href)));
        match self.raw(op, state, title, safe.as_deref()) {
            Ok(()) => Ok(()),
            Err(err) if url.is_some() && is_security_error(&err) => {
                // An injected <base> can make resolution misleading; force
                // the synthesized same-origin URL and try exactly once more.
                let forced = doc.forced_same_origin(fragment_of(url.unwrap_or_default()));
                self.raw(op, state, title, Some(&forced)).map_err(|_| err)
            }
            Err(err) => Err(err),
        }
    }

    fn raw(&self, op: Op, state: &JsValue, title: &str, url: Option<&str>) -> Result<(), JsValue> {
        match op {
            Op::Push => self.history.push_state_with_url(state, title, url),
            Op::Replace => self.history.replace_state_with_url(state, title, url),
        }
    }
}

thread_local! {
    static GUARD: RefCell<Option<HistoryGuard>> = const { RefCell::new(None) };
}

/// Capture the history primitives and install the process-wide guard.
/// Idempotent; called once during startup before the first navigation.
///
/// # Errors
/// Returns an error when no window or history object is reachable.
pub fn install() -> Result<(), JsValue> {
    GUARD.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Ok(());
        }
        let history = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .history()?;
        *slot = Some(HistoryGuard { history });
        Ok(())
    })
}

/// Run `f` against the installed guard, if any.
pub fn with<R>(f: impl FnOnce(&HistoryGuard) -> R) -> Option<R> {
    GUARD.with(|slot| slot.borrow().as_ref().map(f))
}

/// Normalize the entry URL for fragment routing.
///
/// When the document was opened without a route fragment, write a `#/`
/// fragment through the guard so the session starts from a clean
/// same-origin URL. This is the first history mutation of a session and
/// the one an injected `<base>` historically broke.
///
/// # Errors
/// Propagates the guard's fatal condition (see [`HistoryGuard::replace_state`]).
pub fn ensure_fragment_root() -> Result<(), JsValue> {
    let has_fragment = web_sys::window()
        .and_then(|win| win.location().hash().ok())
        .is_some_and(|hash| !hash.is_empty());
    if has_fragment {
        return Ok(());
    }
    with(|guard| guard.replace_state(&JsValue::NULL, "", Some("#/"))).unwrap_or(Ok(()))
}

#[cfg(test)]
mod tests {
    use super::{DocumentUrl, fragment_of, sanitize_with};

    fn doc() -> DocumentUrl {
        DocumentUrl {
            origin: String::from("https://host.example"),
            pathname: String::from("/play/index.html"),
            search: String::from("?v=2"),
            href: String::from("https://host.example/play/index.html?v=2"),
        }
    }

    // Resolver stub covering the cases the guard distinguishes: absolute
    // URLs keep their own origin, fragments and relative paths resolve to
    // the document's origin, and clearly malformed input fails.
    fn resolve(raw: &str) -> Option<(String, String)> {
        if raw.contains(' ') {
            return None;
        }
        if let Some(rest) = raw.strip_prefix("https://") {
            let origin = format!("https://{}", rest.split('/').next().unwrap_or(rest));
            return Some((origin, raw.to_string()));
        }
        Some((
            String::from("https://host.example"),
            format!("https://host.example/play/resolved{raw}"),
        ))
    }

    #[test]
    fn fragment_is_extracted_from_raw_input() {
        assert_eq!(fragment_of("#/game"), "#/game");
        assert_eq!(fragment_of("https://evil.example/x#/game"), "#/game");
        assert_eq!(fragment_of("/plain/path"), "");
    }

    #[test]
    fn cross_origin_url_is_rewritten_keeping_fragment() {
        let out = sanitize_with("https://evil.example/x#/game", &doc(), resolve);
        assert_eq!(out, "https://host.example/play/index.html?v=2#/game");
    }

    #[test]
    fn malformed_url_is_rewritten_to_document_url() {
        let out = sanitize_with("http://[broken #frag", &doc(), resolve);
        assert_eq!(out, "https://host.example/play/index.html?v=2#frag");
    }

    #[test]
    fn same_origin_url_passes_through_resolved() {
        let out = sanitize_with("#/level", &doc(), resolve);
        assert_eq!(out, "https://host.example/play/resolved#/level");
    }

    #[test]
    fn forced_url_without_fragment_is_document_url() {
        assert_eq!(
            doc().forced_same_origin(""),
            "https://host.example/play/index.html?v=2"
        );
    }
}
