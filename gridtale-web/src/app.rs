#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::env::HostingContext;
#[cfg(target_arch = "wasm32")]
use crate::pages::{AssetStatus, GamePage, HomePage, LevelList, NotFound};
#[cfg(target_arch = "wasm32")]
use crate::router::{NavigationPlan, Route};

#[cfg(target_arch = "wasm32")]
thread_local! {
    // Scene picked on the level list; the /game route itself is
    // parameterless, matching the entry document's deep-link surface.
    static SELECTED_SCENE: RefCell<String> = RefCell::new(String::from("default.json"));
}

#[cfg(target_arch = "wasm32")]
#[function_component(HomeScreen)]
fn home_screen() -> Html {
    let navigator = use_navigator();
    let on_play = Callback::from(move |()| {
        if let Some(nav) = &navigator {
            nav.push(&Route::Level);
        }
    });
    html! { <HomePage {on_play} /> }
}

#[cfg(target_arch = "wasm32")]
#[function_component(LevelScreen)]
fn level_screen() -> Html {
    let navigator = use_navigator();
    let on_select = Callback::from(move |entry: crate::pages::LevelEntry| {
        SELECTED_SCENE.with(|scene| *scene.borrow_mut() = entry.scene_file.to_string());
        if let Some(nav) = &navigator {
            nav.push(&Route::Game);
        }
    });
    html! { <LevelList {on_select} /> }
}

#[cfg(target_arch = "wasm32")]
#[function_component(GameScreen)]
pub fn game_screen() -> Html {
    let status = use_state(|| AssetStatus::Loading);
    {
        let status = status.clone();
        use_effect_with((), move |()| {
            wasm_bindgen_futures::spawn_local(async move {
                let scene_file = SELECTED_SCENE.with(|scene| scene.borrow().clone());
                match load_game_assets(&scene_file).await {
                    Ok(scene) => status.set(AssetStatus::Ready(Rc::new(scene))),
                    Err(err) => {
                        crate::diag::log(format!("[resource] {err}"));
                        status.set(AssetStatus::Failed(err.to_string()));
                    }
                }
            });
            || {}
        });
    }
    html! { <GamePage status={(*status).clone()} /> }
}

#[cfg(target_arch = "wasm32")]
async fn load_game_assets(
    scene_file: &str,
) -> Result<crate::resource::scene::SceneSetup, crate::resource::ResolveError> {
    crate::resource::texture::load_resources().await?;
    crate::resource::scene::load_scene_setup(scene_file).await
}

#[cfg(target_arch = "wasm32")]
#[function_component(NotFoundScreen)]
fn not_found_screen() -> Html {
    let navigator = use_navigator();
    let on_go_home = Callback::from(move |()| {
        if let Some(nav) = &navigator {
            nav.push(&Route::Home);
        }
    });
    html! { <NotFound {on_go_home} /> }
}

#[cfg(target_arch = "wasm32")]
fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <HomeScreen /> },
        Route::Level => html! { <LevelScreen /> },
        Route::Game => html! { <GameScreen /> },
        Route::NotFound => html! { <NotFoundScreen /> },
    }
}

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let plan = use_memo((), |()| {
        NavigationPlan::select(&HostingContext::detect(), &crate::paths::base_path())
    });

    match &*plan {
        NavigationPlan::Hash { .. } => html! {
            <HashRouter>
                <Switch<Route> render={switch} />
            </HashRouter>
        },
        NavigationPlan::Path { base } => {
            let basename = base.clone().map(AttrValue::from);
            html! {
                <BrowserRouter basename={basename}>
                    <Switch<Route> render={switch} />
                </BrowserRouter>
            }
        }
    }
}
