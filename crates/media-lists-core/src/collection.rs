use media_lists_config::SettingsStore;
use media_lists_models::{ListScope, MediaList, NewList, SortDirection, SortMethod};
use media_lists_sources::ListStore;
use tracing::{debug, error, info};

use crate::error::{CoreError, Result};
use crate::manual_order::{self, ManualOrder};
use crate::sort::{filter_lists, sort_lists, SortSelection};

/// View model over every list in one scope.
///
/// Holds the lists in fetch order and derives the display order from the
/// active sort. Every mutation goes to the store first and then reloads the
/// whole collection; nothing is inserted optimistically. Sort preferences and
/// the manual order are only persisted for the owned scope.
pub struct ListCollection<S: ListStore> {
    store: S,
    settings: SettingsStore,
    scope: ListScope,
    lists: Vec<MediaList>,
    selection: SortSelection,
    manual: ManualOrder,
    search: String,
}

impl<S: ListStore> ListCollection<S> {
    pub fn new(store: S, settings: SettingsStore, scope: ListScope) -> Self {
        let saved = settings.load();
        let selection = match scope {
            ListScope::Owned => SortSelection::new(saved.sort_method, saved.sort_direction),
            // Public lists open on recent activity
            ListScope::Public => SortSelection::new(SortMethod::Recent, SortDirection::Desc),
            ListScope::Followed => SortSelection::default(),
        };

        Self {
            store,
            settings,
            scope,
            lists: Vec::new(),
            selection,
            manual: ManualOrder::new(saved.manual_order),
            search: String::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scope(&self) -> ListScope {
        self.scope
    }

    pub fn selection(&self) -> SortSelection {
        self.selection
    }

    pub fn manual_order(&self) -> &ManualOrder {
        &self.manual
    }

    pub fn is_manual(&self) -> bool {
        self.selection.method == SortMethod::Manual
    }

    /// Lists in fetch order
    pub fn lists(&self) -> &[MediaList] {
        &self.lists
    }

    pub fn get(&self, id: &str) -> Option<&MediaList> {
        self.lists.iter().find(|l| l.id == id)
    }

    /// Replace the local collection with a fresh fetch
    pub async fn load(&mut self) -> Result<usize> {
        match self.store.get_lists(self.scope).await {
            Ok(lists) => {
                debug!("Loaded {} {} lists", lists.len(), self.scope);
                self.lists = lists;
                Ok(self.lists.len())
            }
            Err(e) => {
                error!("Failed to load {} lists: {}", self.scope, e);
                Err(e.into())
            }
        }
    }

    /// Every list in display order, ignoring the search term
    pub fn ordered(&self) -> Vec<&MediaList> {
        let mut ordered: Vec<&MediaList> = self.lists.iter().collect();
        sort_lists(&mut ordered, self.selection, &self.manual);
        ordered
    }

    /// Lists matching the search term, in display order
    pub fn displayed(&self) -> Vec<&MediaList> {
        let mut shown = filter_lists(&self.lists, &self.search);
        sort_lists(&mut shown, self.selection, &self.manual);
        shown
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Menu-style selection: toggles direction when re-picking the active method
    pub fn select_sort(&mut self, method: SortMethod) -> Result<SortSelection> {
        let next = self.selection.select(method);
        self.apply_selection(next)?;
        Ok(next)
    }

    /// Set method and direction explicitly
    pub fn set_sort(&mut self, method: SortMethod, direction: SortDirection) -> Result<SortSelection> {
        let next = SortSelection::new(method, direction);
        self.apply_selection(next)?;
        Ok(next)
    }

    fn apply_selection(&mut self, next: SortSelection) -> Result<()> {
        // Entering manual mode starts from whatever is on screen now
        if next.method == SortMethod::Manual {
            self.manual = ManualOrder::from_lists(self.ordered());
        }
        self.selection = next;
        debug!("Sort set to {}", next.label());
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if self.scope != ListScope::Owned {
            return Ok(());
        }
        let mut settings = self.settings.try_load()?;
        settings.sort_method = self.selection.method;
        settings.sort_direction = self.selection.direction;
        settings.manual_order = self.manual.ids().to_vec();
        self.settings.save(&settings)?;
        Ok(())
    }

    fn require(&self, id: &str) -> Result<&MediaList> {
        self.get(id).ok_or_else(|| CoreError::UnknownList(id.to_string()))
    }

    pub async fn create(&mut self, name: &str, description: &str) -> Result<MediaList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }

        let created = self
            .store
            .create_list(&NewList::new(name, description.trim()))
            .await
            .map_err(|e| {
                error!("Failed to create list {}: {}", name, e);
                e
            })?;
        info!("Created list {} ({})", created.name, created.id);
        self.load().await?;
        Ok(created)
    }

    /// Rename writes the full document back, like any other save
    pub async fn rename(&mut self, id: &str, name: &str, description: &str) -> Result<MediaList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }

        let mut updated = self.require(id)?.clone();
        updated.name = name.to_string();
        updated.description = description.trim().to_string();

        let saved = self.store.update_list(&updated).await.map_err(|e| {
            error!("Failed to rename list {}: {}", id, e);
            e
        })?;
        self.load().await?;
        Ok(saved)
    }

    pub async fn duplicate(&mut self, id: &str) -> Result<MediaList> {
        let copy = NewList::duplicate_of(self.require(id)?);
        let created = self.store.create_list(&copy).await.map_err(|e| {
            error!("Failed to duplicate list {}: {}", id, e);
            e
        })?;
        info!("Duplicated list {} as {}", id, created.id);
        self.load().await?;
        Ok(created)
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.require(id)?;
        self.store.delete_list(id).await.map_err(|e| {
            error!("Failed to delete list {}: {}", id, e);
            e
        })?;

        if self.is_manual() && self.manual.remove(id) {
            self.persist()?;
        }
        self.load().await?;
        Ok(())
    }

    /// Move the list at display position `index` one place up (manual mode only)
    pub fn move_up(&mut self, index: usize) -> Result<bool> {
        self.reorder(|ids| manual_order::move_up(ids, index))
    }

    pub fn move_down(&mut self, index: usize) -> Result<bool> {
        self.reorder(|ids| manual_order::move_down(ids, index))
    }

    /// Drag-style move from one display position to another
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<bool> {
        self.reorder(|ids| manual_order::move_to(ids, from, to))
    }

    fn reorder<F>(&mut self, op: F) -> Result<bool>
    where
        F: FnOnce(&mut Vec<String>) -> bool,
    {
        if !self.is_manual() {
            return Ok(false);
        }

        let mut ids = ManualOrder::from_lists(self.ordered()).into_ids();
        if !op(&mut ids) {
            return Ok(false);
        }

        self.manual = ManualOrder::new(ids);
        self.persist()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dated, items, list, FakeStore};
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.json"))
    }

    fn seeded() -> FakeStore {
        FakeStore::with_lists(vec![
            dated(list("a", "Watch Next"), Some("2024-01-01T00:00:00Z"), None),
            dated(list("b", "Classics"), Some("2024-03-01T00:00:00Z"), None),
            dated(list("c", "Books 2024"), Some("2024-02-01T00:00:00Z"), None),
        ])
    }

    fn ids(lists: Vec<&MediaList>) -> Vec<String> {
        lists.into_iter().map(|l| l.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_load_uses_default_sort() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        assert_eq!(collection.load().await.unwrap(), 3);
        assert_eq!(ids(collection.displayed()), vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_sort_selection_is_persisted() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        collection.load().await.unwrap();

        collection.select_sort(SortMethod::Alphabetical).unwrap();
        assert_eq!(ids(collection.displayed()), vec!["c", "b", "a"]);
        let flipped = collection.select_sort(SortMethod::Alphabetical).unwrap();
        assert_eq!(flipped.direction, SortDirection::Desc);

        let reopened = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        assert_eq!(reopened.selection(), flipped);
    }

    #[tokio::test]
    async fn test_public_scope_does_not_persist() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Public);
        collection.select_sort(SortMethod::Popularity).unwrap();
        assert!(!dir.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn test_public_scope_opens_on_recent_activity() {
        let dir = TempDir::new().unwrap();
        let store = FakeStore::with_lists(vec![
            dated(list("old-updated", "Old"), Some("2023-01-01T00:00:00Z"), Some("2024-06-01T00:00:00Z")),
            dated(list("new", "New"), Some("2024-03-01T00:00:00Z"), None),
        ]);
        let mut collection = ListCollection::new(store, settings_in(&dir), ListScope::Public);
        assert_eq!(
            collection.selection(),
            SortSelection::new(SortMethod::Recent, SortDirection::Desc)
        );

        collection.load().await.unwrap();
        assert_eq!(ids(collection.displayed()), vec!["old-updated", "new"]);

        let flipped = collection.select_sort(SortMethod::Recent).unwrap();
        assert_eq!(flipped.direction, SortDirection::Asc);
        assert_eq!(ids(collection.displayed()), vec!["new", "old-updated"]);
    }

    #[tokio::test]
    async fn test_followed_scope_opens_on_default_sort() {
        let dir = TempDir::new().unwrap();
        let collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Followed);
        assert_eq!(collection.selection(), SortSelection::default());
    }

    #[tokio::test]
    async fn test_sort_change_keeps_corrupt_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let original = r#"{"listsManualOrder":["b","a"],"lists":[{"id":"1","name":"Old","items":[{"id":"m1","title":"Song","type":"music"}]}]}"#;
        std::fs::write(&path, original).unwrap();

        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        collection.load().await.unwrap();
        assert!(matches!(
            collection.select_sort(SortMethod::Alphabetical),
            Err(CoreError::Local(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_switching_to_manual_seeds_current_order() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        collection.load().await.unwrap();
        collection.select_sort(SortMethod::Alphabetical).unwrap();

        collection.select_sort(SortMethod::Manual).unwrap();
        assert_eq!(collection.manual_order().ids(), &["c", "b", "a"]);
        assert_eq!(ids(collection.displayed()), vec!["c", "b", "a"]);

        assert!(collection.move_up(2).unwrap());
        assert_eq!(ids(collection.displayed()), vec!["c", "a", "b"]);
        assert!(collection.move_to(0, 2).unwrap());
        assert_eq!(ids(collection.displayed()), vec!["a", "b", "c"]);

        let saved = settings_in(&dir).load();
        assert_eq!(saved.manual_order, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_moves_ignored_outside_manual_mode() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        collection.load().await.unwrap();
        assert!(!collection.move_down(0).unwrap());

        collection.set_sort(SortMethod::Manual, SortDirection::Desc).unwrap();
        assert!(!collection.move_down(2).unwrap());
        assert!(!collection.move_up(0).unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let store = seeded();
        let mut collection = ListCollection::new(store, settings_in(&dir), ListScope::Owned);
        assert!(matches!(collection.create("   ", "x").await, Err(CoreError::EmptyName)));
        assert_eq!(collection.store().writes(), 0);
    }

    #[tokio::test]
    async fn test_create_reloads_collection() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        let created = collection.create(" Horror ", "Spooky").await.unwrap();
        assert_eq!(created.name, "Horror");
        assert!(created.items.is_empty());
        assert_eq!(collection.lists().len(), 4);
        assert!(collection.get(&created.id).is_some());
    }

    #[tokio::test]
    async fn test_rename_and_duplicate() {
        let dir = TempDir::new().unwrap();
        let mut store_lists = vec![list("a", "Watch Next")];
        store_lists[0].items = items(3);
        store_lists[0].description = "soon".to_string();
        let mut collection =
            ListCollection::new(FakeStore::with_lists(store_lists), settings_in(&dir), ListScope::Owned);
        collection.load().await.unwrap();

        let renamed = collection.rename("a", "Up Next", "later").await.unwrap();
        assert_eq!(renamed.name, "Up Next");
        assert_eq!(renamed.items.len(), 3);
        assert_eq!(collection.get("a").unwrap().description, "later");

        let copy = collection.duplicate("a").await.unwrap();
        assert_eq!(copy.name, "Up Next (Copy)");
        assert_eq!(copy.description, "later");
        assert_eq!(copy.items, collection.get("a").unwrap().items);
        assert_ne!(copy.id, "a");

        assert!(matches!(
            collection.duplicate("missing").await,
            Err(CoreError::UnknownList(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_prunes_manual_order() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        collection.load().await.unwrap();
        collection.select_sort(SortMethod::Manual).unwrap();

        collection.delete("c").await.unwrap();
        assert_eq!(collection.lists().len(), 2);
        assert_eq!(collection.manual_order().ids(), &["b", "a"]);
        assert_eq!(settings_in(&dir).load().manual_order, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_search_filters_display() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        collection.load().await.unwrap();
        collection.set_search("BOOK");
        assert_eq!(ids(collection.displayed()), vec!["c"]);
        assert_eq!(collection.ordered().len(), 3);
    }

    #[tokio::test]
    async fn test_save_unchanged_reload_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut collection = ListCollection::new(seeded(), settings_in(&dir), ListScope::Owned);
        collection.load().await.unwrap();
        let before = collection.lists().to_vec();

        let first = before[0].clone();
        collection.store().update_list(&first).await.unwrap();
        collection.load().await.unwrap();
        assert_eq!(collection.lists(), before.as_slice());
    }
}
