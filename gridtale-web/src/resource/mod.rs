//! Multi-candidate resource resolution.
//!
//! Deployments of the same build get opened from radically different mount
//! points: the configured base, the site root, a parent directory, or a
//! document at the site root while the app is served from a sub-mount.
//! Instead of guessing, resolution builds an ordered candidate list and
//! tries each URL in sequence until one yields a well-formed document.

pub mod scene;
pub mod texture;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::paths;

/// Hosting quirks encoded as data rather than control flow: new rewrite
/// rules are added here, the resolution loop never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRules {
    /// Sub-mount prefixes that deployments are known to serve the app
    /// under while documents open from the site root, or vice versa.
    pub sub_mounts: Vec<String>,
}

impl Default for CandidateRules {
    fn default() -> Self {
        Self {
            sub_mounts: vec![String::from("/game/")],
        }
    }
}

/// Build the ordered, duplicate-free list of URLs to try for a logical
/// resource under a configured base path. Earlier entries are preferred.
#[must_use]
pub fn candidates(base_path: &str, logical_path: &str, rules: &CandidateRules) -> Vec<String> {
    let mut list: Vec<String> = Vec::new();
    let mut add = |value: String, list: &mut Vec<String>| {
        if !value.is_empty() && !list.contains(&value) {
            list.push(value);
        }
    };

    let joined = paths::join(base_path, logical_path);
    add(joined.clone(), &mut list);

    // A relative base means the document's own directory was assumed to be
    // the serving root; cover the root-absolute and parent-relative reads
    // of the same path.
    if let Some(bare) = joined.strip_prefix("./") {
        let bare = bare.trim_start_matches('/');
        add(format!("/{bare}"), &mut list);
        add(format!("../{bare}"), &mut list);
    }

    for prefix in &rules.sub_mounts {
        if let Some(rest) = joined.strip_prefix(prefix.as_str()) {
            let bare = rest.trim_start_matches('/');
            add(format!("/{bare}"), &mut list);
            add(format!("./{bare}"), &mut list);
            add(format!("../{bare}"), &mut list);
        }
    }

    list
}

/// Resolution failure, surfaced to the caller once every candidate has
/// been tried. Callers must not retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no resource candidates for empty logical path")]
    NoCandidates,
    #[error("no candidate yielded a usable document; tried: {}; last error: {last_error}", attempted.join(", "))]
    Exhausted {
        attempted: Vec<String>,
        last_error: String,
    },
}

/// Try `candidates` strictly in order through `fetch`, returning the first
/// success. A failed fetch and a malformed body are treated identically:
/// move to the next candidate (a wrong-origin server may return an
/// unrelated HTML document at a plausible-looking URL).
///
/// # Errors
/// [`ResolveError::Exhausted`] naming every attempted URL when no
/// candidate succeeds.
pub async fn resolve_first<T, F, Fut>(candidates: &[String], fetch: F) -> Result<T, ResolveError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    if candidates.is_empty() {
        return Err(ResolveError::NoCandidates);
    }

    let mut last_error = String::new();
    for url in candidates {
        match fetch(url.clone()).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                log::warn!("candidate {url} failed: {err}");
                last_error = err;
            }
        }
    }

    Err(ResolveError::Exhausted {
        attempted: candidates.to_vec(),
        last_error,
    })
}

/// Resolve a logical path under the configured base into a decoded JSON
/// document, trying every candidate mount point in order.
///
/// # Errors
/// See [`resolve_first`].
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn resolve_json<T: DeserializeOwned>(
    base_path: &str,
    logical_path: &str,
    rules: &CandidateRules,
) -> Result<T, ResolveError> {
    let list = candidates(base_path, logical_path, rules);
    resolve_first(&list, |url| async move {
        crate::dom::fetch_json::<T>(&url)
            .await
            .map_err(|err| crate::dom::js_error_message(&err))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::{CandidateRules, ResolveError, candidates, resolve_first};
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[test]
    fn relative_base_adds_root_and_parent_forms_in_order() {
        let list = candidates("./", "things/sprites.json", &CandidateRules::default());
        assert_eq!(
            list,
            vec![
                String::from("./things/sprites.json"),
                String::from("/things/sprites.json"),
                String::from("../things/sprites.json"),
            ]
        );
    }

    #[test]
    fn sub_mount_base_adds_site_root_and_relative_forms() {
        let list = candidates("/game/", "things/sprites.json", &CandidateRules::default());
        assert_eq!(
            list,
            vec![
                String::from("/game/things/sprites.json"),
                String::from("/things/sprites.json"),
                String::from("./things/sprites.json"),
                String::from("../things/sprites.json"),
            ]
        );
    }

    #[test]
    fn candidate_list_is_duplicate_free() {
        let rules = CandidateRules {
            sub_mounts: vec![String::from("/game/"), String::from("/game/")],
        };
        let list = candidates("/game/", "a.json", &rules);
        let mut deduped = list.clone();
        deduped.dedup();
        assert_eq!(list, deduped);
    }

    #[test]
    fn unknown_mount_keeps_only_direct_join() {
        let list = candidates("/assets/", "a.json", &CandidateRules::default());
        assert_eq!(list, vec![String::from("/assets/a.json")]);
    }

    #[test]
    fn resolution_stops_at_first_success() {
        let list = vec![
            String::from("/one.json"),
            String::from("/two.json"),
            String::from("/three.json"),
        ];
        let attempts = RefCell::new(Vec::new());
        let result = block_on(resolve_first(&list, |url| {
            attempts.borrow_mut().push(url.clone());
            async move {
                if url == "/two.json" {
                    Ok(42_u32)
                } else {
                    Err(String::from("not found"))
                }
            }
        }));
        assert_eq!(result, Ok(42));
        assert_eq!(
            *attempts.borrow(),
            vec![String::from("/one.json"), String::from("/two.json")]
        );
    }

    #[test]
    fn exhaustion_error_names_every_attempted_url() {
        let list = vec![String::from("/a.json"), String::from("/b.json")];
        let result: Result<u32, _> = block_on(resolve_first(&list, |url| async move {
            Err(format!("{url} unreachable"))
        }));
        let err = result.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/a.json"));
        assert!(message.contains("/b.json"));
        assert!(message.contains("/b.json unreachable"));
        assert!(matches!(err, ResolveError::Exhausted { .. }));
    }

    #[test]
    fn empty_candidate_list_is_rejected() {
        let result: Result<u32, _> =
            block_on(resolve_first(&[], |_| async move { Ok(1) }));
        assert_eq!(result, Err(ResolveError::NoCandidates));
    }
}
