use std::rc::Rc;

use yew::prelude::*;

use crate::resource::scene::SceneSetup;

/// Outcome of the game page's asset resolution.
#[derive(Clone, PartialEq)]
pub enum AssetStatus {
    Loading,
    Ready(Rc<SceneSetup>),
    /// Resolution exhausted every candidate; the aggregate error text
    /// (naming each attempted URL) is shown to the user.
    Failed(String),
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub status: AssetStatus,
}

#[function_component(GamePage)]
pub fn game_page(props: &Props) -> Html {
    match &props.status {
        AssetStatus::Loading => html! {
            <main id="main" class="page game loading" aria-busy="true" aria-live="polite">
                <h1>{ "Loading" }</h1>
                <progress max="100" value={crate::resource::texture::loading_progress().to_string()} />
                <p>{ "Fetching scene and sprites…" }</p>
            </main>
        },
        AssetStatus::Ready(scene) => html! {
            <main id="main" class="page game">
                <h1>{ scene.name.clone() }</h1>
                <p>
                    { format!(
                        "{}x{} blocks, {} things placed",
                        scene.scene_width,
                        scene.scene_height,
                        scene.thing_count()
                    ) }
                </p>
                <canvas id="scene" width={(scene.scene_width * 16).to_string()} height={(scene.scene_height * 16).to_string()} />
            </main>
        },
        AssetStatus::Failed(message) => html! {
            <main id="main" class="page game failed" aria-live="assertive">
                <h1>{ "Could not load the game" }</h1>
                <p class="error">{ message.clone() }</p>
                <p>{ "Open the diagnostics overlay (Ctrl/Cmd+Alt+D) for details." }</p>
            </main>
        },
    }
}
