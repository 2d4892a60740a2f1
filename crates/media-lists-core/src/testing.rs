//! In-memory list store and fixtures for view-model tests.

use async_trait::async_trait;
use chrono::Utc;
use media_lists_models::timestamp::parse_timestamp;
use media_lists_models::{ListScope, MediaKind, MediaList, MediaRef, NewList, UserProfile};
use media_lists_sources::{ListStore, SourceError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const OWNER: &str = "alice";

pub fn list(id: &str, name: &str) -> MediaList {
    MediaList {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        items: Vec::new(),
        is_public: false,
        is_collaborative: false,
        collaborators: Vec::new(),
        owner: Some(OWNER.to_string()),
        created_at: None,
        updated_at: None,
    }
}

pub fn dated(mut list: MediaList, created: Option<&str>, updated: Option<&str>) -> MediaList {
    list.created_at = created.and_then(parse_timestamp);
    list.updated_at = updated.and_then(parse_timestamp);
    list
}

pub fn item(n: usize) -> MediaRef {
    MediaRef::new(format!("movie-{}", n), format!("Movie {}", n), MediaKind::Movie).with_year(Some(2000 + n as i32))
}

pub fn items(count: usize) -> Vec<MediaRef> {
    (1..=count).map(item).collect()
}

#[derive(Default)]
pub struct FakeStore {
    lists: Mutex<Vec<MediaList>>,
    users: Vec<String>,
    next_id: AtomicUsize,
    writes: AtomicUsize,
    fail_create: Mutex<Option<String>>,
}

impl FakeStore {
    pub fn with_lists(lists: Vec<MediaList>) -> Self {
        Self {
            lists: Mutex::new(lists),
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: &[&str]) -> Self {
        self.users = users.iter().map(|u| u.to_string()).collect();
        self
    }

    /// Make `create_list` fail for a list with this name
    pub fn failing_create(self, name: &str) -> Self {
        *self.fail_create.lock().unwrap() = Some(name.to_string());
        self
    }

    pub fn snapshot(&self) -> Vec<MediaList> {
        self.lists.lock().unwrap().clone()
    }

    pub fn stored(&self, id: &str) -> Option<MediaList> {
        self.lists.lock().unwrap().iter().find(|l| l.id == id).cloned()
    }

    /// Number of create/update/delete calls received
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListStore for FakeStore {
    async fn get_lists(&self, scope: ListScope) -> Result<Vec<MediaList>, SourceError> {
        let lists = self.lists.lock().unwrap();
        Ok(match scope {
            ListScope::Public => lists.iter().filter(|l| l.is_public).cloned().collect(),
            _ => lists.clone(),
        })
    }

    async fn get_list(&self, id: &str) -> Result<MediaList, SourceError> {
        self.stored(id)
            .ok_or_else(|| SourceError::NotFound(format!("list {}", id)))
    }

    async fn create_list(&self, new_list: &NewList) -> Result<MediaList, SourceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.lock().unwrap().as_deref() == Some(new_list.name.as_str()) {
            return Err(SourceError::Status {
                context: "Failed to create list".to_string(),
                status: 500,
                message: "boom".to_string(),
            });
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let created = MediaList {
            id: format!("new-{}", n),
            name: new_list.name.clone(),
            description: new_list.description.clone(),
            items: new_list.items.clone(),
            created_at: Some(now),
            updated_at: Some(now),
            ..list("", "")
        };
        self.lists.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_list(&self, list: &MediaList) -> Result<MediaList, SourceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut lists = self.lists.lock().unwrap();
        match lists.iter_mut().find(|l| l.id == list.id) {
            Some(existing) => {
                *existing = list.clone();
                Ok(existing.clone())
            }
            None => Err(SourceError::NotFound(format!("list {}", list.id))),
        }
    }

    async fn delete_list(&self, id: &str) -> Result<(), SourceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut lists = self.lists.lock().unwrap();
        let before = lists.len();
        lists.retain(|l| l.id != id);
        if lists.len() == before {
            return Err(SourceError::NotFound(format!("list {}", id)));
        }
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserProfile>, SourceError> {
        Ok(self.users.iter().find(|u| *u == username).map(|u| UserProfile {
            username: u.clone(),
            email: None,
        }))
    }
}
