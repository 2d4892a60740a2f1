use chrono::Utc;
use media_lists_models::{MediaList, MediaRef};
use media_lists_sources::ListStore;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{CoreError, Result};
use crate::manual_order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Viewing,
    Editing,
}

/// Local copies that shadow the server document while editing
#[derive(Debug, Clone, PartialEq)]
struct Draft {
    description: String,
    items: Vec<MediaRef>,
    is_public: bool,
    is_collaborative: bool,
    collaborators: Vec<String>,
}

impl Draft {
    fn of(list: &MediaList) -> Self {
        Self {
            description: list.description.clone(),
            items: list.items.clone(),
            is_public: list.is_public,
            is_collaborative: list.is_collaborative,
            collaborators: list.collaborators.clone(),
        }
    }
}

/// Detail view of a single list.
///
/// `Viewing -> Editing -> Viewing`, leaving edit mode on save or cancel.
/// Saving sends the whole document; the last writer wins.
#[derive(Debug, Clone)]
pub struct ListEditor {
    list: MediaList,
    draft: Option<Draft>,
    modified: bool,
}

impl ListEditor {
    pub fn new(list: MediaList) -> Self {
        Self {
            list,
            draft: None,
            modified: false,
        }
    }

    pub async fn open<S: ListStore + ?Sized>(store: &S, id: &str) -> Result<Self> {
        let list = store.get_list(id).await.map_err(|e| {
            error!("Failed to load list {}: {}", id, e);
            e
        })?;
        debug!("Opened list {} with {} items", list.id, list.items.len());
        Ok(Self::new(list))
    }

    /// The last copy received from the server
    pub fn server_copy(&self) -> &MediaList {
        &self.list
    }

    pub fn mode(&self) -> EditorMode {
        if self.draft.is_some() {
            EditorMode::Editing
        } else {
            EditorMode::Viewing
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// The list as it would be written: server copy with the draft applied
    pub fn current(&self) -> MediaList {
        let mut list = self.list.clone();
        if let Some(draft) = &self.draft {
            list.description = draft.description.clone();
            list.items = draft.items.clone();
            list.is_public = draft.is_public;
            list.is_collaborative = draft.is_collaborative;
            list.collaborators = draft.collaborators.clone();
        }
        list
    }

    pub fn items(&self) -> &[MediaRef] {
        match &self.draft {
            Some(draft) => &draft.items,
            None => &self.list.items,
        }
    }

    pub fn collaborators(&self) -> &[String] {
        match &self.draft {
            Some(draft) => &draft.collaborators,
            None => &self.list.collaborators,
        }
    }

    /// Owners and collaborators may write
    pub fn can_edit(&self, username: Option<&str>) -> bool {
        username.map(|u| self.list.is_editable_by(u)).unwrap_or(false)
    }

    /// Closing is blocked while unsaved edits exist
    pub fn can_close(&self) -> bool {
        !(self.is_editing() && self.modified)
    }

    pub fn begin_edit(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(Draft::of(&self.list));
            self.modified = false;
        }
    }

    /// Discard the draft and go back to the server copy
    pub fn cancel(&mut self) {
        if self.modified {
            debug!("Discarding unsaved edits to list {}", self.list.id);
        }
        self.draft = None;
        self.modified = false;
    }

    fn draft_mut(&mut self) -> Result<&mut Draft> {
        self.draft.as_mut().ok_or(CoreError::NotEditing)
    }

    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.draft_mut()?.description = description.to_string();
        self.modified = true;
        Ok(())
    }

    pub fn set_public(&mut self, is_public: bool) -> Result<()> {
        self.draft_mut()?.is_public = is_public;
        self.modified = true;
        Ok(())
    }

    pub fn set_collaborative(&mut self, is_collaborative: bool) -> Result<()> {
        self.draft_mut()?.is_collaborative = is_collaborative;
        self.modified = true;
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<MediaRef> {
        let draft = self.draft_mut()?;
        let len = draft.items.len();
        if index >= len {
            return Err(CoreError::InvalidIndex { index, len });
        }
        let removed = draft.items.remove(index);
        self.modified = true;
        Ok(removed)
    }

    /// Splice the item at `from` into position `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let draft = self.draft_mut()?;
        let len = draft.items.len();
        if !manual_order::move_to(&mut draft.items, from, to) {
            return Err(CoreError::InvalidIndex {
                index: from.max(to),
                len,
            });
        }
        self.modified = true;
        Ok(())
    }

    /// Append an item. Outside edit mode the list is written immediately.
    pub async fn add_item<S: ListStore + ?Sized>(&mut self, store: &S, item: MediaRef) -> Result<()> {
        if let Some(draft) = self.draft.as_mut() {
            draft.items.push(item);
            self.modified = true;
            return Ok(());
        }

        let mut updated = self.list.clone();
        debug!("Adding {} to list {}", item.id, updated.id);
        updated.items.push(item);
        self.write(store, updated).await
    }

    /// Look the user up and add them to the draft; unknown users are refused
    pub async fn add_collaborator<S: ListStore + ?Sized>(&mut self, store: &S, username: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CoreError::CollaboratorNotFound(String::new()));
        }
        if self.list.owner.as_deref() == Some(username) {
            return Err(CoreError::OwnerAsCollaborator);
        }
        let draft = self.draft.as_ref().ok_or(CoreError::NotEditing)?;
        if draft.collaborators.iter().any(|c| c == username) {
            return Err(CoreError::DuplicateCollaborator(username.to_string()));
        }

        let found = match store.find_user(username).await {
            Ok(found) => found,
            Err(e) => {
                debug!("User lookup for {} failed: {}", username, e);
                None
            }
        };
        let user = found.ok_or_else(|| CoreError::CollaboratorNotFound(username.to_string()))?;

        self.draft_mut()?.collaborators.push(user.username);
        self.modified = true;
        Ok(())
    }

    pub fn remove_collaborator(&mut self, username: &str) -> Result<bool> {
        let draft = self.draft_mut()?;
        let before = draft.collaborators.len();
        draft.collaborators.retain(|c| c != username);
        let removed = draft.collaborators.len() != before;
        if removed {
            self.modified = true;
        }
        Ok(removed)
    }

    /// Write the full document and return to viewing
    pub async fn save<S: ListStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        if self.draft.is_none() {
            return Err(CoreError::NotEditing);
        }
        let updated = self.current();
        self.write(store, updated).await?;
        self.draft = None;
        self.modified = false;
        Ok(())
    }

    async fn write<S: ListStore + ?Sized>(&mut self, store: &S, mut updated: MediaList) -> Result<()> {
        updated.updated_at = Some(Utc::now());
        let saved = store.update_list(&updated).await.map_err(|e| {
            error!("Failed to save list {}: {}", updated.id, e);
            e
        })?;
        info!("Saved list {} ({} items)", saved.id, saved.items.len());
        self.list = saved;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{item, items, list, FakeStore, OWNER};

    fn store_with(items_count: usize) -> FakeStore {
        let mut l = list("l1", "Watch Next");
        l.items = items(items_count);
        FakeStore::with_lists(vec![l]).with_users(&["bob", "carol"])
    }

    fn ids(refs: &[MediaRef]) -> Vec<&str> {
        refs.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_while_viewing_persists_immediately() {
        let store = store_with(1);
        let mut editor = ListEditor::open(&store, "l1").await.unwrap();
        editor.add_item(&store, item(9)).await.unwrap();

        assert_eq!(editor.mode(), EditorMode::Viewing);
        assert!(!editor.is_modified());
        assert_eq!(ids(&store.stored("l1").unwrap().items), vec!["movie-1", "movie-9"]);
        assert!(store.stored("l1").unwrap().updated_at.is_some());
    }

    #[tokio::test]
    async fn test_edits_stay_local_until_save() {
        let store = store_with(3);
        let mut editor = ListEditor::open(&store, "l1").await.unwrap();
        editor.begin_edit();
        editor.move_item(0, 2).unwrap();
        editor.remove_item(0).unwrap();
        editor.add_item(&store, item(7)).await.unwrap();
        editor.set_description("tonight").unwrap();

        assert!(editor.is_modified());
        assert!(!editor.can_close());
        assert_eq!(store.writes(), 0);
        assert_eq!(ids(editor.items()), vec!["movie-3", "movie-1", "movie-7"]);

        editor.save(&store).await.unwrap();
        assert_eq!(editor.mode(), EditorMode::Viewing);
        assert!(editor.can_close());
        let stored = store.stored("l1").unwrap();
        assert_eq!(ids(&stored.items), vec!["movie-3", "movie-1", "movie-7"]);
        assert_eq!(stored.description, "tonight");
        assert_eq!(stored.name, "Watch Next");
    }

    #[tokio::test]
    async fn test_cancel_restores_server_copy() {
        let store = store_with(2);
        let mut editor = ListEditor::open(&store, "l1").await.unwrap();
        editor.begin_edit();
        editor.remove_item(1).unwrap();
        editor.set_public(true).unwrap();
        editor.cancel();

        assert_eq!(editor.mode(), EditorMode::Viewing);
        assert_eq!(editor.items().len(), 2);
        assert!(!editor.current().is_public);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_mutations_require_edit_mode() {
        let store = store_with(2);
        let mut editor = ListEditor::open(&store, "l1").await.unwrap();
        assert!(matches!(editor.remove_item(0), Err(CoreError::NotEditing)));
        assert!(matches!(editor.move_item(0, 1), Err(CoreError::NotEditing)));
        assert!(matches!(editor.save(&store).await, Err(CoreError::NotEditing)));

        editor.begin_edit();
        assert!(matches!(
            editor.remove_item(5),
            Err(CoreError::InvalidIndex { index: 5, len: 2 })
        ));
        assert!(editor.move_item(0, 2).is_err());
        assert!(!editor.is_modified());
    }

    #[tokio::test]
    async fn test_collaborators_fail_closed() {
        let store = store_with(0);
        let mut editor = ListEditor::open(&store, "l1").await.unwrap();
        editor.begin_edit();

        editor.add_collaborator(&store, "bob").await.unwrap();
        assert!(matches!(
            editor.add_collaborator(&store, "bob").await,
            Err(CoreError::DuplicateCollaborator(_))
        ));
        assert!(matches!(
            editor.add_collaborator(&store, "mallory").await,
            Err(CoreError::CollaboratorNotFound(_))
        ));
        assert!(matches!(
            editor.add_collaborator(&store, OWNER).await,
            Err(CoreError::OwnerAsCollaborator)
        ));
        editor.set_collaborative(true).unwrap();
        editor.save(&store).await.unwrap();

        let stored = store.stored("l1").unwrap();
        assert_eq!(stored.collaborators, vec!["bob"]);
        assert!(stored.is_collaborative);
        assert!(editor.can_edit(Some("bob")));
        assert!(editor.can_edit(Some(OWNER)));
        assert!(!editor.can_edit(Some("carol")));
        assert!(!editor.can_edit(None));
    }

    #[tokio::test]
    async fn test_remove_collaborator() {
        let mut l = list("l1", "Shared");
        l.collaborators = vec!["bob".to_string(), "carol".to_string()];
        let store = FakeStore::with_lists(vec![l]);
        let mut editor = ListEditor::open(&store, "l1").await.unwrap();
        editor.begin_edit();
        assert!(editor.remove_collaborator("bob").unwrap());
        assert!(!editor.remove_collaborator("zed").unwrap());
        assert_eq!(editor.collaborators(), &["carol".to_string()]);
    }

    #[tokio::test]
    async fn test_save_unchanged_is_idempotent() {
        let store = store_with(2);
        let mut editor = ListEditor::open(&store, "l1").await.unwrap();
        let before = editor.server_copy().clone();
        editor.begin_edit();
        editor.save(&store).await.unwrap();

        let reloaded = ListEditor::open(&store, "l1").await.unwrap();
        let mut after = reloaded.server_copy().clone();
        after.updated_at = before.updated_at;
        assert_eq!(after, before);
    }
}
