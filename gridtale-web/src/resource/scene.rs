//! Scene-description documents and their per-call resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CandidateRules, ResolveError};
use crate::paths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingSetup {
    pub default_block_x: u32,
    pub default_block_y: u32,
    pub texture_name: String,
    pub default_towards: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingsMapJson {
    pub species: String,
    pub name: String,
    pub thing_setup: Vec<ThingSetup>,
}

/// Wire shape of a scene-description document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSetupJson {
    pub id: String,
    pub name: String,
    pub scene_width: u32,
    pub scene_height: u32,
    pub things_map: Vec<ThingsMapJson>,
}

/// Key of a placed thing: which species/name pair its setups belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThingKey {
    pub species: String,
    pub name: String,
}

/// In-memory scene description handed to the rendering runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSetup {
    pub id: String,
    pub name: String,
    pub scene_width: u32,
    pub scene_height: u32,
    pub things_map: HashMap<ThingKey, Vec<ThingSetup>>,
}

impl From<SceneSetupJson> for SceneSetup {
    fn from(json: SceneSetupJson) -> Self {
        let mut things_map = HashMap::with_capacity(json.things_map.len());
        for entry in json.things_map {
            let key = ThingKey {
                species: entry.species,
                name: entry.name,
            };
            things_map.insert(key, entry.thing_setup);
        }
        Self {
            id: json.id,
            name: json.name,
            scene_width: json.scene_width,
            scene_height: json.scene_height,
            things_map,
        }
    }
}

impl SceneSetup {
    /// Total number of placed things across the scene.
    #[must_use]
    pub fn thing_count(&self) -> usize {
        self.things_map.values().map(Vec::len).sum()
    }
}

/// Resolve and decode a scene-description file under the configured base.
///
/// Each scene load is logically a fresh request: no caching, the candidate
/// list is rebuilt and re-tried on every call.
///
/// # Errors
/// [`ResolveError::Exhausted`] when no candidate mount point serves the
/// document.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn load_scene_setup(file_path: &str) -> Result<SceneSetup, ResolveError> {
    let logical = format!(
        "{}/{}",
        paths::SCENE_SETUP_DIR,
        file_path.trim_start_matches('/')
    );
    let json: SceneSetupJson = super::resolve_json(
        &paths::base_path(),
        &logical,
        &CandidateRules::default(),
    )
    .await?;
    Ok(SceneSetup::from(json))
}

#[cfg(test)]
mod tests {
    use super::{SceneSetup, SceneSetupJson, ThingKey};

    const SAMPLE: &str = r#"{
        "id": "lvl-1",
        "name": "Meadow",
        "sceneWidth": 33,
        "sceneHeight": 18,
        "thingsMap": [
            {
                "species": "character",
                "name": "fox",
                "thingSetup": [
                    {
                        "defaultBlockX": 3,
                        "defaultBlockY": 4,
                        "textureName": "fox_idle",
                        "defaultTowards": "right"
                    }
                ]
            },
            {
                "species": "block",
                "name": "wall",
                "thingSetup": [
                    {
                        "defaultBlockX": 0,
                        "defaultBlockY": 0,
                        "textureName": "wall",
                        "defaultTowards": "down"
                    },
                    {
                        "defaultBlockX": 1,
                        "defaultBlockY": 0,
                        "textureName": "wall",
                        "defaultTowards": "down"
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn scene_json_decodes_camel_case_wire_names() {
        let json: SceneSetupJson = serde_json::from_str(SAMPLE).expect("decode sample");
        assert_eq!(json.scene_width, 33);
        assert_eq!(json.things_map.len(), 2);
        assert_eq!(json.things_map[0].thing_setup[0].texture_name, "fox_idle");
    }

    #[test]
    fn conversion_keys_setups_by_species_and_name() {
        let json: SceneSetupJson = serde_json::from_str(SAMPLE).expect("decode sample");
        let scene = SceneSetup::from(json);
        assert_eq!(scene.thing_count(), 3);
        let key = ThingKey {
            species: String::from("block"),
            name: String::from("wall"),
        };
        assert_eq!(scene.things_map.get(&key).map(Vec::len), Some(2));
    }
}
