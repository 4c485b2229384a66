//! DOM side of the diagnostics overlay: the badge and panel surfaces, the
//! persisted preference, and the passive event subscriptions.
//!
//! Every function here is best-effort. A missing body, a detached
//! document, or a storage failure silently degrades to buffering only.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, Document, Element, ErrorEvent, Event, HtmlElement, KeyboardEvent,
    MutationObserver, MutationObserverInit, PromiseRejectionEvent, Storage,
};

use super::snapshot::snapshot_dom;

const PANEL_ID: &str = "boot-diag";
const BADGE_ID: &str = "boot-diag-badge";

const BADGE_CSS: &str = "position:fixed;left:8px;top:8px;z-index:2147483647;\
background:rgba(255,215,0,0.95);color:#111;padding:6px 10px;border-radius:10px;\
border:2px solid rgba(0,0,0,0.6);\
font:700 12px/1 ui-sans-serif,system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial";

const PANEL_CSS: &str = "position:fixed;left:8px;right:8px;bottom:8px;max-height:55vh;\
overflow:auto;z-index:2147483647;background:rgba(255,255,255,0.92);color:#111;\
padding:10px;border-radius:10px;border:2px solid rgba(0,0,0,0.55);\
box-shadow:0 10px 30px rgba(0,0,0,0.35);\
font:12px/1.35 ui-monospace,SFMono-Regular,Menlo,Monaco,Consolas,monospace;\
white-space:pre-wrap;word-break:break-word";

// Grace period before concluding the mount point never received content.
// A heuristic: a slow but eventually-successful mount still trips it.
const MOUNT_CHECK_MS: i32 = 2500;
const EARLY_SNAPSHOT_MS: [i32; 2] = [200, 1000];

fn document() -> Option<Document> {
    web_sys::window().and_then(|win| win.document())
}

fn storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub(super) fn read_boot_enabled() -> bool {
    let from_url = web_sys::window().is_some_and(|win| {
        let location = win.location();
        let search = location.search().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        super::enabled_from_url(&search, &hash)
    });
    from_url
        || storage()
            .and_then(|store| store.get_item(super::STORAGE_KEY).ok().flatten())
            .is_some_and(|value| value == "1")
}

pub(super) fn persist_enabled(enabled: bool) {
    if let Some(store) = storage() {
        let _ = store.set_item(super::STORAGE_KEY, if enabled { "1" } else { "0" });
    }
}

fn ensure_element(doc: &Document, id: &str, tag: &str, css: &str) -> Option<Element> {
    if let Some(existing) = doc.get_element_by_id(id) {
        return Some(existing);
    }
    let body = doc.body()?;
    let element = doc.create_element(tag).ok()?;
    element.set_id(id);
    let _ = element.set_attribute("style", css);
    body.append_child(&element).ok()?;
    Some(element)
}

fn ensure_badge(doc: &Document) -> Option<Element> {
    let badge = ensure_element(doc, BADGE_ID, "div", BADGE_CSS)?;
    if badge.text_content().unwrap_or_default().is_empty() {
        badge.set_text_content(Some("BOOT-DIAG"));
    }
    Some(badge)
}

// The badge is always created alongside the panel, so the overlay can be
// located even when the panel is scrolled or empty.
fn ensure_panel(doc: &Document) -> Option<Element> {
    ensure_badge(doc);
    ensure_element(doc, PANEL_ID, "pre", PANEL_CSS)
}

pub(super) fn render_line(line: &str) {
    let Some(doc) = document() else { return };
    let Some(panel) = ensure_panel(&doc) else { return };
    let mut text = panel.text_content().unwrap_or_default();
    text.push_str(line);
    text.push('\n');
    panel.set_text_content(Some(&text));
}

/// Render the full buffer into a freshly cleared panel. Returns `false`
/// when no surface could be attached (caller stays in the pending state).
pub(super) fn render_all(lines: &[String]) -> bool {
    let Some(doc) = document() else { return false };
    let Some(panel) = ensure_panel(&doc) else {
        return false;
    };
    set_visible(true);
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    panel.set_text_content(Some(&text));
    true
}

fn set_display(doc: &Document, id: &str, value: &str) {
    if let Some(element) = doc.get_element_by_id(id)
        && let Some(html) = element.dyn_ref::<HtmlElement>()
    {
        let _ = html.style().set_property("display", value);
    }
}

pub(super) fn set_visible(visible: bool) {
    let Some(doc) = document() else { return };
    let value = if visible { "block" } else { "none" };
    set_display(&doc, PANEL_ID, value);
    set_display(&doc, BADGE_ID, value);
}

/// Flush the buffer once the DOM is attachable: immediately when the
/// document has finished parsing, otherwise on `DOMContentLoaded`.
pub(super) fn flush_when_ready() {
    let Some(doc) = document() else { return };
    if doc.ready_state() == "loading" {
        let listener = Closure::once_into_js(|| super::flush_pending());
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let _ = doc.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            listener.unchecked_ref(),
            &options,
        );
    } else {
        super::flush_pending();
    }
}

fn describe_failed_resource(event: &Event) {
    let Some(target) = event.target() else { return };
    let Some(element) = target.dyn_ref::<Element>() else {
        return;
    };
    let tag = element.tag_name().to_ascii_lowercase();
    let url = match tag.as_str() {
        "script" | "img" => element.get_attribute("src"),
        "link" => element.get_attribute("href"),
        _ => return,
    };
    super::log(format!("[resource.error] <{tag}> failed to load"));
    if let Some(url) = url.filter(|u| !u.is_empty()) {
        super::log(format!("  url={url}"));
    }
    if tag == "script"
        && let Some(kind) = element.get_attribute("type")
    {
        super::log(format!("  type={kind}"));
    }
    if tag == "link"
        && let Some(rel) = element.get_attribute("rel")
    {
        super::log(format!("  rel={rel}"));
    }
}

fn handle_keydown(event: &KeyboardEvent) {
    let key = event.key().to_ascii_lowercase();
    if key == "d" && event.alt_key() && (event.ctrl_key() || event.meta_key()) {
        event.prevent_default();
        super::toggle();
        return;
    }
    // Single-letter route jumps are a debugging convenience for blank
    // screens; never intercept modified keys.
    if event.alt_key() || event.ctrl_key() || event.meta_key() {
        return;
    }
    let hash = match key.as_str() {
        "h" => "#/",
        "l" => "#/level",
        "g" => "#/game",
        _ => return,
    };
    if let Some(win) = web_sys::window() {
        let _ = win.location().set_hash(hash);
    }
}

fn mount_check() {
    let app = document().and_then(|doc| doc.get_element_by_id("app"));
    let nodes = app
        .as_ref()
        .map_or(-1, |el| i64::from(el.child_nodes().length()));
    let mounted = nodes > 0;
    super::log(format!("[boot] mounted={mounted} appNodes={nodes}"));
    snapshot_dom("t+2500ms");
    if !mounted {
        super::log("Hint: if opened via file:// in a desktop browser, ES modules may be blocked by browser policy.");
        super::log("Hint: inside an embedded WebView, serve assets through the host's asset loader instead of raw file paths.");
    }
}

/// Retained handles for every passive observer the overlay installs.
/// Dropping the struct without `teardown` would detach the Rust side of
/// the closures while listeners stay registered; harnesses call
/// [`Subscriptions::teardown`] for an orderly release.
pub(super) struct Subscriptions {
    on_error: Closure<dyn FnMut(ErrorEvent)>,
    on_resource_error: Closure<dyn FnMut(Event)>,
    on_rejection: Closure<dyn FnMut(PromiseRejectionEvent)>,
    on_keydown: Closure<dyn FnMut(KeyboardEvent)>,
    observer: Option<MutationObserver>,
    _observer_callback: Option<Closure<dyn FnMut()>>,
    _timers: Vec<Closure<dyn FnMut()>>,
}

impl Subscriptions {
    pub(super) fn install() -> Option<Self> {
        let win = web_sys::window()?;

        let on_error = Closure::wrap(Box::new(|event: ErrorEvent| {
            super::log(format!("[window.error] {}", event.message()));
            let filename = event.filename();
            if !filename.is_empty() {
                super::log(format!(
                    "  at {filename}:{}:{}",
                    event.lineno(),
                    event.colno()
                ));
            }
        }) as Box<dyn FnMut(ErrorEvent)>);
        let _ = win
            .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref());

        // Sub-resource load failures do not bubble; capture them.
        let on_resource_error = Closure::wrap(Box::new(|event: Event| {
            describe_failed_resource(&event);
        }) as Box<dyn FnMut(Event)>);
        let _ = win.add_event_listener_with_callback_and_bool(
            "error",
            on_resource_error.as_ref().unchecked_ref(),
            true,
        );

        let on_rejection = Closure::wrap(Box::new(|event: PromiseRejectionEvent| {
            let reason = event.reason();
            super::log(format!(
                "[unhandledrejection] {}",
                crate::dom::js_error_message(&reason)
            ));
        }) as Box<dyn FnMut(PromiseRejectionEvent)>);
        let _ = win.add_event_listener_with_callback(
            "unhandledrejection",
            on_rejection.as_ref().unchecked_ref(),
        );

        let on_keydown = Closure::wrap(Box::new(|event: KeyboardEvent| {
            handle_keydown(&event);
        }) as Box<dyn FnMut(KeyboardEvent)>);
        let _ = win.add_event_listener_with_callback_and_bool(
            "keydown",
            on_keydown.as_ref().unchecked_ref(),
            true,
        );

        // Structural changes under the mount point explain router-driven
        // view swaps without coupling to the router itself.
        let mut observer = None;
        let mut observer_callback = None;
        if let Some(app) = win.document().and_then(|doc| doc.get_element_by_id("app")) {
            let callback = Closure::wrap(Box::new(|| {
                snapshot_dom("mutation");
            }) as Box<dyn FnMut()>);
            if let Ok(mo) = MutationObserver::new(callback.as_ref().unchecked_ref()) {
                let init = MutationObserverInit::new();
                init.set_child_list(true);
                init.set_subtree(true);
                if mo.observe_with_options(&app, &init).is_ok() {
                    observer = Some(mo);
                }
            }
            observer_callback = Some(callback);
        }

        let mut timers: Vec<Closure<dyn FnMut()>> = Vec::new();
        for delay in EARLY_SNAPSHOT_MS {
            let tag = format!("t+{delay}ms");
            let timer = Closure::wrap(Box::new(move || {
                snapshot_dom(&tag);
            }) as Box<dyn FnMut()>);
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                timer.as_ref().unchecked_ref(),
                delay,
            );
            timers.push(timer);
        }
        let mount_timer = Closure::wrap(Box::new(|| {
            mount_check();
        }) as Box<dyn FnMut()>);
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            mount_timer.as_ref().unchecked_ref(),
            MOUNT_CHECK_MS,
        );
        timers.push(mount_timer);

        Some(Self {
            on_error,
            on_resource_error,
            on_rejection,
            on_keydown,
            observer,
            _observer_callback: observer_callback,
            _timers: timers,
        })
    }

    pub(super) fn teardown(self) {
        if let Some(win) = web_sys::window() {
            let _ = win.remove_event_listener_with_callback(
                "error",
                self.on_error.as_ref().unchecked_ref(),
            );
            let _ = win.remove_event_listener_with_callback_and_bool(
                "error",
                self.on_resource_error.as_ref().unchecked_ref(),
                true,
            );
            let _ = win.remove_event_listener_with_callback(
                "unhandledrejection",
                self.on_rejection.as_ref().unchecked_ref(),
            );
            let _ = win.remove_event_listener_with_callback_and_bool(
                "keydown",
                self.on_keydown.as_ref().unchecked_ref(),
                true,
            );
        }
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}
