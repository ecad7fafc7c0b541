//! Checks on a proposed attachment list.

use std::collections::{BTreeSet, HashMap, HashSet};

use catalog_core::config::CatalogConfig;
use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::id::PluginId;
use catalog_database::CatalogTransaction;
use catalog_entity::project::AttachmentInput;

use crate::validation::{check_length, require_text};

/// Reject malformed or repeated attachments.
///
/// Two inputs with the same plugin and URL would be the same attachment.
pub(crate) fn check_inputs(inputs: &[AttachmentInput], limits: &CatalogConfig) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(inputs.len());
    for input in inputs {
        require_text("Plugin URL", &input.url, limits.max_text_length)?;
        check_length("Plugin display name", &input.display_name, limits.max_name_length)?;
        if !seen.insert((input.plugin_id, input.url.as_str())) {
            return Err(AppError::validation(format!(
                "Plugin {} is listed twice with URL {}",
                input.plugin_id, input.url
            )));
        }
    }
    Ok(())
}

/// Look up plugin names, failing with one error that lists every id in
/// `required` that does not exist.
///
/// Ids in `known` are expected to exist already and are resolved without
/// being checked.
pub(crate) async fn resolve_plugin_names<T: CatalogTransaction>(
    tx: &mut T,
    required: impl IntoIterator<Item = PluginId>,
    known: impl IntoIterator<Item = PluginId>,
) -> AppResult<HashMap<PluginId, String>> {
    let required: BTreeSet<PluginId> = required.into_iter().collect();
    let all: Vec<PluginId> = required
        .iter()
        .copied()
        .chain(known)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let names = tx.plugin_names_for(&all).await?;

    let missing: Vec<String> = required
        .iter()
        .filter(|id| !names.contains_key(id))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::not_found(format!(
            "Plugins not found: {}",
            missing.join(", ")
        )));
    }
    Ok(names)
}

/// Name recorded for a plugin, falling back to its id.
pub(crate) fn plugin_label(names: &HashMap<PluginId, String>, id: PluginId) -> String {
    names.get(&id).cloned().unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::error::ErrorKind;
    use catalog_database::{CatalogStore, MemoryCatalogStore};
    use catalog_entity::plugin::CreatePlugin;

    fn input(plugin: i64, url: &str) -> AttachmentInput {
        AttachmentInput {
            plugin_id: PluginId(plugin),
            url: url.into(),
            display_name: "Label".into(),
        }
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let err = check_inputs(
            &[input(1, "https://a"), input(1, "https://a")],
            &CatalogConfig::default(),
        )
        .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[test]
    fn test_same_plugin_different_urls_is_fine() {
        assert!(
            check_inputs(
                &[input(1, "https://a"), input(1, "https://b")],
                &CatalogConfig::default()
            )
            .is_ok()
        );
    }

    #[test]
    fn test_blank_url_is_rejected() {
        assert!(check_inputs(&[input(1, " ")], &CatalogConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_missing_ids_are_listed_sorted_and_deduplicated() {
        let store = MemoryCatalogStore::new();
        let mut tx = store.begin().await.unwrap();
        let jira = tx
            .insert_plugin(
                &CreatePlugin {
                    name: "Jira".into(),
                    description: None,
                },
                chrono::Utc::now(),
            )
            .await
            .unwrap();

        let err = resolve_plugin_names(
            &mut tx,
            [PluginId(100), jira.id, PluginId(99), PluginId(100)],
            [],
        )
        .await
        .unwrap_err();

        assert!(err.is(ErrorKind::NotFound));
        assert_eq!(err.message, "Plugins not found: 99, 100");
    }

    #[tokio::test]
    async fn test_known_ids_are_resolved_without_check() {
        let store = MemoryCatalogStore::new();
        let mut tx = store.begin().await.unwrap();
        let names = resolve_plugin_names(&mut tx, [], [PluginId(5)]).await.unwrap();
        assert!(names.is_empty());
        assert_eq!(plugin_label(&names, PluginId(5)), "5");
    }
}
