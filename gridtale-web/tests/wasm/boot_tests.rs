use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use gridtale_web::env::HostingContext;
use gridtale_web::{diag, history_guard};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn panel_text() -> String {
    web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id("boot-diag"))
        .and_then(|el| el.text_content())
        .unwrap_or_default()
}

#[wasm_bindgen_test]
fn buffered_lines_appear_in_order_after_toggle() {
    diag::init(&HostingContext::detect());
    diag::log("first line");
    diag::log("second line");

    diag::toggle();
    let text = panel_text();
    let first = text.find("first line").expect("first line rendered");
    let second = text.find("second line").expect("second line rendered");
    assert!(first < second, "buffer order must be preserved");

    diag::toggle();
    diag::teardown();
}

#[wasm_bindgen_test]
fn guard_rewrites_cross_origin_history_url() {
    history_guard::install().expect("guard installs");
    history_guard::with(|guard| {
        guard
            .push_state(&JsValue::NULL, "", Some("https://evil.example/x#/game"))
            .expect("guarded push succeeds");
    })
    .expect("guard available");

    let location = web_sys::window().expect("window").location();
    assert_eq!(location.hash().unwrap_or_default(), "#/game");
    let origin = location.origin().expect("origin");
    let href = location.href().expect("href");
    assert!(href.starts_with(&origin), "history URL must stay same-origin");
}
