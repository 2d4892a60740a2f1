use media_lists_models::MediaList;
use std::collections::HashMap;

/// Client-local display order of list IDs, used only in manual sort mode.
///
/// IDs that no longer match a fetched list are harmless; lists missing from
/// the order rank after every list that is present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualOrder {
    ids: Vec<String>,
}

impl ManualOrder {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Capture the order lists are currently displayed in
    pub fn from_lists<'a, I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a MediaList>,
    {
        Self {
            ids: lists.into_iter().map(|l| l.id.clone()).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position lookup; the first occurrence of a repeated ID wins
    pub fn ranks(&self) -> HashMap<&str, usize> {
        let mut ranks = HashMap::with_capacity(self.ids.len());
        for (index, id) in self.ids.iter().enumerate() {
            ranks.entry(id.as_str()).or_insert(index);
        }
        ranks
    }

    /// Drop an ID; returns whether it was present
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| i != id);
        self.ids.len() != before
    }
}

/// Swap the entry at `index` with its predecessor
pub fn move_up<T>(items: &mut [T], index: usize) -> bool {
    if index == 0 || index >= items.len() {
        return false;
    }
    items.swap(index, index - 1);
    true
}

/// Swap the entry at `index` with its successor
pub fn move_down<T>(items: &mut [T], index: usize) -> bool {
    if index + 1 >= items.len() {
        return false;
    }
    items.swap(index, index + 1);
    true
}

/// Remove the entry at `from` and insert it at `to`
pub fn move_to<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}
