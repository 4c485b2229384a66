//! Boot diagnostics overlay.
//!
//! A session-scoped, append-only log that starts buffering before the UI
//! mounts, so failures that happen while the screen is still blank can be
//! reconstructed afterwards. Nothing renders until the overlay is enabled
//! through a URL flag, a persisted preference, or the keyboard toggle.
//!
//! Diagnostics must never become a second point of failure: every DOM or
//! storage error inside this module is caught and dropped.

mod overlay;
mod snapshot;

use std::cell::RefCell;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::env::HostingContext;

pub use snapshot::snapshot_dom;

/// Storage key of the persisted visibility preference (`"1"` / `"0"`).
pub const STORAGE_KEY: &str = "gridtale.bootdiag";

static URL_FLAG_QUERY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[?&]bootdiag=1\b").expect("static pattern"));
static URL_FLAG_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"bootdiag=1\b").expect("static pattern"));

/// `true` when the URL carries the diagnostics enable flag in its query or
/// fragment.
#[must_use]
pub fn enabled_from_url(search: &str, hash: &str) -> bool {
    URL_FLAG_QUERY.is_match(search) || URL_FLAG_HASH.is_match(hash)
}

/// Overlay lifecycle. `EnabledPending` buffers with intent to render: the
/// preference is on but no display surface has been attached yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enablement {
    Disabled,
    EnabledPending,
    EnabledVisible,
}

/// The append-only buffer plus enablement state. Pure; all DOM effects
/// live in the overlay layer.
#[derive(Debug)]
pub struct DiagState {
    lines: Vec<String>,
    enablement: Enablement,
}

impl DiagState {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            lines: Vec::new(),
            enablement: if enabled {
                Enablement::EnabledPending
            } else {
                Enablement::Disabled
            },
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub const fn enablement(&self) -> Enablement {
        self.enablement
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self.enablement, Enablement::Disabled)
    }

    /// Append a line. Returns `true` when the caller should also render it
    /// live (the overlay is currently visible).
    pub fn push(&mut self, line: String) -> bool {
        self.lines.push(line);
        matches!(self.enablement, Enablement::EnabledVisible)
    }

    /// Flip the enabled state; the buffer is never cleared. Returns the new
    /// enabled state.
    pub const fn toggle(&mut self) -> bool {
        self.enablement = match self.enablement {
            Enablement::Disabled => Enablement::EnabledPending,
            Enablement::EnabledPending | Enablement::EnabledVisible => Enablement::Disabled,
        };
        self.is_enabled()
    }

    /// Record that a display surface is attached and rendered. Ignored
    /// while disabled.
    pub const fn mark_visible(&mut self) {
        if matches!(self.enablement, Enablement::EnabledPending) {
            self.enablement = Enablement::EnabledVisible;
        }
    }
}

thread_local! {
    static STATE: RefCell<DiagState> = const { RefCell::new(DiagState::new(false)) };
    static SUBS: RefCell<Option<overlay::Subscriptions>> = const { RefCell::new(None) };
}

/// Append a diagnostic line, rendering it live when the overlay is
/// visible. Never fails the caller; render errors are dropped.
pub fn log(line: impl Into<String>) {
    let line = line.into();
    let render_live = STATE.with(|state| state.borrow_mut().push(line.clone()));
    if render_live {
        overlay::render_line(&line);
    }
}

/// Flip the overlay, persist the preference, and re-render or hide.
pub fn toggle() {
    let enabled = STATE.with(|state| state.borrow_mut().toggle());
    overlay::persist_enabled(enabled);
    if enabled {
        flush_pending();
    } else {
        overlay::set_visible(false);
    }
}

/// Re-render the whole buffer into a fresh display surface, discarding any
/// partial or stale panel content from an earlier failed render.
fn flush_pending() {
    let enabled = STATE.with(|state| state.borrow().is_enabled());
    if !enabled {
        return;
    }
    let lines = STATE.with(|state| state.borrow().lines().to_vec());
    if overlay::render_all(&lines) {
        STATE.with(|state| state.borrow_mut().mark_visible());
    }
}

/// Start buffering, log the boot banner, and install the passive
/// observers. Called once from `start()`, before the UI mounts.
pub fn init(context: &HostingContext) {
    let enabled = overlay::read_boot_enabled();
    STATE.with(|state| *state.borrow_mut() = DiagState::new(enabled));

    log("[boot] diagnostics buffering");
    log(format!(
        "[boot] origin={} protocol={}",
        context.origin, context.protocol
    ));
    log(format!("[boot] pathname={}", context.pathname));
    if let Some(win) = web_sys::window() {
        let location = win.location();
        if let Ok(href) = location.href() {
            log(format!("[boot] href={href}"));
        }
        if let Ok(hash) = location.hash() {
            log(format!("[boot] hash={hash}"));
        }
    }
    log("[boot] tip: press H=Home, L=Level, G=Game");
    log("[boot] tip: toggle diag with Ctrl/Cmd+Alt+D (or add ?bootdiag=1)");

    let subs = overlay::Subscriptions::install();
    SUBS.with(|slot| *slot.borrow_mut() = subs);

    if enabled {
        overlay::flush_when_ready();
    } else {
        overlay::set_visible(false);
    }
}

/// Detach every passive observer. For harnesses that boot the layer more
/// than once in a single page.
pub fn teardown() {
    if let Some(subs) = SUBS.with(|slot| slot.borrow_mut().take()) {
        subs.teardown();
    }
}
