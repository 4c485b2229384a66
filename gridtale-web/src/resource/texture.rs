//! Texture-atlas resolution with a session-lifetime cache.
//!
//! Unlike scene descriptions, the sprite atlas is immutable for the whole
//! session: once one candidate URL has produced a sheet, later load
//! requests are no-ops and never touch the network again.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Deserialize;

use super::{CandidateRules, ResolveError, candidates, resolve_first};
use crate::paths;

/// Wire shape of the sprite-atlas bundle (sprite-sheet JSON: frame
/// definitions plus named animation sequences). Frame geometry is opaque
/// to this layer; the rendering runtime consumes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AtlasSheet {
    pub frames: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub animations: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// Session cache for the resolved atlas.
#[derive(Debug, Default)]
pub struct AtlasService {
    sheet: Option<AtlasSheet>,
}

impl AtlasService {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.sheet.is_some()
    }

    /// Percentage progress for boot UI: all-or-nothing at this layer.
    #[must_use]
    pub const fn loading_progress(&self) -> u8 {
        if self.sheet.is_some() { 100 } else { 0 }
    }

    pub fn install(&mut self, sheet: AtlasSheet) {
        self.sheet = Some(sheet);
    }

    /// Frame ids of the `species/name` animation, or `None` when the atlas
    /// is missing or has no such sequence.
    #[must_use]
    pub fn animation_frames(&self, species: &str, name: &str) -> Option<Vec<String>> {
        self.sheet
            .as_ref()
            .and_then(|sheet| sheet.animations.get(&format!("{species}/{name}")))
            .cloned()
    }
}

/// Resolve the atlas into `service` unless one is already cached.
///
/// # Errors
/// [`ResolveError::Exhausted`] when every candidate fails; the cache stays
/// empty so a later call may try again.
pub async fn load_into<F, Fut>(
    service: &RefCell<AtlasService>,
    candidate_urls: &[String],
    fetch: F,
) -> Result<(), ResolveError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<AtlasSheet, String>>,
{
    if service.borrow().is_loaded() {
        return Ok(());
    }
    let sheet = resolve_first(candidate_urls, fetch).await?;
    service.borrow_mut().install(sheet);
    Ok(())
}

thread_local! {
    static SERVICE: Rc<RefCell<AtlasService>> = Rc::default();
}

/// Resolve the sprite atlas for this session, a no-op once it succeeded.
///
/// # Errors
/// See [`load_into`].
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn load_resources() -> Result<(), ResolveError> {
    let service = SERVICE.with(Rc::clone);
    let urls = candidates(
        &paths::base_path(),
        paths::SPRITE_SHEET_PATH,
        &CandidateRules::default(),
    );
    load_into(&service, &urls, |url| async move {
        crate::dom::fetch_json::<AtlasSheet>(&url)
            .await
            .map_err(|err| crate::dom::js_error_message(&err))
    })
    .await
}

/// Animation lookup against the session atlas.
#[must_use]
pub fn animation_frames(species: &str, name: &str) -> Option<Vec<String>> {
    SERVICE.with(|service| service.borrow().animation_frames(species, name))
}

/// Current atlas loading progress for boot UI.
#[must_use]
pub fn loading_progress() -> u8 {
    SERVICE.with(|service| service.borrow().loading_progress())
}

#[cfg(test)]
mod tests {
    use super::{AtlasService, AtlasSheet, load_into};
    use futures::executor::block_on;
    use std::cell::RefCell;

    const SHEET: &str = r#"{
        "frames": { "fox_idle_0": {}, "fox_idle_1": {} },
        "animations": { "character/fox": ["fox_idle_0", "fox_idle_1"] },
        "meta": { "scale": "1" }
    }"#;

    fn sheet() -> AtlasSheet {
        serde_json::from_str(SHEET).expect("decode sample sheet")
    }

    #[test]
    fn second_load_is_a_no_op() {
        let service = RefCell::new(AtlasService::default());
        let urls = vec![String::from("/things/game_sprites.json")];
        let calls = RefCell::new(0_u32);

        for _ in 0..2 {
            let result = block_on(load_into(&service, &urls, |_| {
                *calls.borrow_mut() += 1;
                async { Ok(sheet()) }
            }));
            assert_eq!(result, Ok(()));
        }
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(service.borrow().loading_progress(), 100);
    }

    #[test]
    fn failed_load_keeps_cache_empty() {
        let service = RefCell::new(AtlasService::default());
        let urls = vec![String::from("/a.json")];
        let result = block_on(load_into(&service, &urls, |_| async {
            Err(String::from("offline"))
        }));
        assert!(result.is_err());
        assert!(!service.borrow().is_loaded());
        assert_eq!(service.borrow().loading_progress(), 0);
    }

    #[test]
    fn animation_lookup_uses_species_name_key() {
        let mut service = AtlasService::default();
        assert_eq!(service.animation_frames("character", "fox"), None);
        service.install(sheet());
        assert_eq!(
            service.animation_frames("character", "fox"),
            Some(vec![
                String::from("fox_idle_0"),
                String::from("fox_idle_1")
            ])
        );
        assert_eq!(service.animation_frames("character", "owl"), None);
    }
}
