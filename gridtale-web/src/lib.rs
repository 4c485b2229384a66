#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod diag;
pub mod dom;
pub mod env;
pub mod history_guard;
pub mod pages;
pub mod paths;
pub mod resource;
pub mod router;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // The guard must be in place before the router's first navigation.
    if let Err(err) = history_guard::install() {
        dom::console_error(&format!(
            "history guard unavailable: {}",
            dom::js_error_message(&err)
        ));
    }

    let context = env::HostingContext::detect();
    diag::init(&context);

    let plan = router::NavigationPlan::select(&context, &paths::base_path());
    diag::log(format!("[boot] navigation {plan:?}"));
    if matches!(plan, router::NavigationPlan::Hash { .. })
        && let Err(err) = history_guard::ensure_fragment_root()
    {
        diag::log(format!(
            "[boot] entry url normalization failed: {}",
            dom::js_error_message(&err)
        ));
    }

    let mount = dom::document().get_element_by_id("app");
    match mount {
        Some(root) => yew::Renderer::<app::App>::with_root(root).render(),
        None => yew::Renderer::<app::App>::new().render(),
    };
}
