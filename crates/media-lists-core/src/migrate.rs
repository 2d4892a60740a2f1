use media_lists_config::SettingsStore;
use media_lists_models::MediaList;
use media_lists_sources::ListStore;
use serde::Serialize;
use tracing::{error, info};

use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub migrated: usize,
    pub lists: Vec<MediaList>,
}

/// Copy every local-only list to the server, then clear local storage.
///
/// Local lists are only cleared once every create succeeded. A failure part
/// way through leaves them in place, so lists created before the failure
/// will exist twice if the migration is run again.
pub async fn migrate_local_lists<S: ListStore + ?Sized>(store: &S, settings: &SettingsStore) -> Result<MigrationReport> {
    let mut local = settings.try_load()?;
    if local.legacy_lists.is_empty() {
        return Ok(MigrationReport {
            migrated: 0,
            lists: Vec::new(),
        });
    }

    info!("Migrating {} local lists", local.legacy_lists.len());
    let mut created = Vec::with_capacity(local.legacy_lists.len());
    for legacy in &local.legacy_lists {
        let list = store.create_list(&legacy.to_new_list()).await.map_err(|e| {
            error!("Failed to migrate local list {}: {}", legacy.name, e);
            e
        })?;
        created.push(list);
    }

    local.legacy_lists.clear();
    settings.save(&local)?;
    info!("Migrated {} local lists", created.len());

    Ok(MigrationReport {
        migrated: created.len(),
        lists: created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::testing::{items, FakeStore};
    use media_lists_config::ClientSettings;
    use media_lists_models::{LegacyList, SortMethod};
    use tempfile::TempDir;

    fn legacy(id: &str, name: &str, description: Option<&str>) -> LegacyList {
        LegacyList {
            id: id.to_string(),
            name: name.to_string(),
            description: description.map(|d| d.to_string()),
            items: items(2),
            created_at: None,
        }
    }

    fn settings_with(dir: &TempDir, lists: Vec<LegacyList>) -> SettingsStore {
        let store = SettingsStore::new(dir.path().join("settings.json"));
        store
            .save(&ClientSettings {
                sort_method: SortMethod::Manual,
                legacy_lists: lists,
                ..Default::default()
            })
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_empty_storage_makes_no_requests() {
        let dir = TempDir::new().unwrap();
        let settings = SettingsStore::new(dir.path().join("settings.json"));
        let store = FakeStore::default();
        let report = migrate_local_lists(&store, &settings).await.unwrap();
        assert_eq!(report.migrated, 0);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_migrates_and_clears() {
        let dir = TempDir::new().unwrap();
        let settings = settings_with(
            &dir,
            vec![legacy("l1", "Old Favs", Some("from before")), legacy("l2", "Queue", None)],
        );
        let store = FakeStore::default();

        let report = migrate_local_lists(&store, &settings).await.unwrap();
        assert_eq!(report.migrated, 2);
        assert_eq!(report.lists[1].description, "");
        assert_eq!(store.snapshot().len(), 2);
        assert_eq!(store.snapshot()[0].items.len(), 2);

        let after = settings.load();
        assert!(after.legacy_lists.is_empty());
        assert_eq!(after.sort_method, SortMethod::Manual);
    }

    #[tokio::test]
    async fn test_failure_keeps_local_lists() {
        let dir = TempDir::new().unwrap();
        let settings = settings_with(&dir, vec![legacy("l1", "Fine", None), legacy("l2", "Broken", None)]);
        let store = FakeStore::default().failing_create("Broken");

        assert!(migrate_local_lists(&store, &settings).await.is_err());
        assert_eq!(settings.load().legacy_lists.len(), 2);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_storage_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let original = r#"{"lists":[{"id":"1","name":"Old","items":[{"id":"m1","title":"Song","type":"music"}]}]}"#;
        std::fs::write(&path, original).unwrap();
        let store = FakeStore::default();

        let result = migrate_local_lists(&store, &SettingsStore::new(path.clone())).await;
        assert!(matches!(result, Err(CoreError::Local(_))));
        assert_eq!(store.writes(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }
}
