use yew::prelude::*;

/// A selectable scene: display name plus the scene-description file the
/// resolver should load for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub name: &'static str,
    pub scene_file: &'static str,
}

/// Built-in level roster. Scene files live under the configured base path.
pub const LEVELS: &[LevelEntry] = &[
    LevelEntry {
        name: "Meadow",
        scene_file: "default.json",
    },
    LevelEntry {
        name: "Cavern",
        scene_file: "cavern.json",
    },
];

#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_select: Callback<LevelEntry>,
}

#[function_component(LevelList)]
pub fn level_list(props: &Props) -> Html {
    html! {
        <main id="main" class="page levels">
            <h1>{ "Levels" }</h1>
            <ul>
                { for LEVELS.iter().map(|entry| {
                    let on_select = props.on_select.clone();
                    let chosen = entry.clone();
                    let onclick = Callback::from(move |_| on_select.emit(chosen.clone()));
                    html! {
                        <li key={entry.name}>
                            <button type="button" {onclick}>{ entry.name }</button>
                        </li>
                    }
                }) }
            </ul>
        </main>
    }
}
