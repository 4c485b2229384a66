use std::rc::Rc;

use futures::executor::block_on;
use yew::{Callback, LocalServerRenderer};

use gridtale_web::pages::game::{self, AssetStatus};
use gridtale_web::pages::home;
use gridtale_web::pages::level;
use gridtale_web::pages::not_found;
use gridtale_web::pages::{GamePage, HomePage, LevelList, NotFound};
use gridtale_web::resource::scene::{SceneSetup, SceneSetupJson};

#[test]
fn home_page_renders_title_and_play_button() {
    let props = home::Props {
        on_play: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<HomePage>::with_props(props).render());
    assert!(html.contains("Gridtale"));
    assert!(html.contains("Play"));
}

#[test]
fn level_list_renders_every_builtin_level() {
    let props = level::Props {
        on_select: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<LevelList>::with_props(props).render());
    for entry in gridtale_web::pages::LEVELS {
        assert!(html.contains(entry.name), "missing level {}", entry.name);
    }
}

#[test]
fn game_page_shows_loading_state() {
    let props = game::Props {
        status: AssetStatus::Loading,
    };
    let html = block_on(LocalServerRenderer::<GamePage>::with_props(props).render());
    assert!(html.contains("Loading"));
    assert!(html.contains("aria-busy"));
}

#[test]
fn game_page_shows_scene_summary_when_ready() {
    let json: SceneSetupJson = serde_json::from_str(
        r#"{
            "id": "lvl-1",
            "name": "Meadow",
            "sceneWidth": 33,
            "sceneHeight": 18,
            "thingsMap": []
        }"#,
    )
    .expect("decode scene");
    let props = game::Props {
        status: AssetStatus::Ready(Rc::new(SceneSetup::from(json))),
    };
    let html = block_on(LocalServerRenderer::<GamePage>::with_props(props).render());
    assert!(html.contains("Meadow"));
    assert!(html.contains("33x18 blocks"));
}

#[test]
fn game_page_surfaces_resolution_failure_with_attempted_urls() {
    let message = "no candidate yielded a usable document; tried: ./sceneSetups/default.json, \
                   /sceneSetups/default.json, ../sceneSetups/default.json; last error: status 404";
    let props = game::Props {
        status: AssetStatus::Failed(String::from(message)),
    };
    let html = block_on(LocalServerRenderer::<GamePage>::with_props(props).render());
    assert!(html.contains("Could not load the game"));
    assert!(html.contains("/sceneSetups/default.json"));
    assert!(html.contains("diagnostics overlay"));
}

#[test]
fn not_found_page_offers_way_home() {
    let props = not_found::Props {
        on_go_home: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<NotFound>::with_props(props).render());
    assert!(html.contains("Nothing here"));
    assert!(html.contains("Back to start"));
}
