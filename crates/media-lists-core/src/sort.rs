use media_lists_models::{MediaList, SortDirection, SortMethod};
use serde::Serialize;
use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::manual_order::ManualOrder;

/// Sort method and direction currently applied to a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortSelection {
    pub method: SortMethod,
    pub direction: SortDirection,
}

impl SortSelection {
    pub fn new(method: SortMethod, direction: SortDirection) -> Self {
        Self { method, direction }
    }

    /// Picking the active directional method flips its direction; picking a
    /// different method starts at that method's default direction.
    pub fn select(self, chosen: SortMethod) -> Self {
        if chosen == self.method && chosen.is_directional() {
            Self::new(chosen, self.direction.toggled())
        } else {
            Self::new(chosen, chosen.default_direction())
        }
    }

    pub fn label(&self) -> String {
        self.method.label(self.direction)
    }
}

fn compare_names(a: &MediaList, b: &MediaList) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn as_list<L: Borrow<MediaList>>(list: &L) -> &MediaList {
    list.borrow()
}

/// Stable in-place sort. Equal keys keep their incoming (fetch) order.
pub fn sort_lists<L: Borrow<MediaList>>(lists: &mut [L], selection: SortSelection, manual: &ManualOrder) {
    let direction = selection.direction;
    match selection.method {
        SortMethod::Alphabetical => {
            lists.sort_by(|a, b| directed(compare_names(as_list(a), as_list(b)), direction))
        }
        SortMethod::Date => lists.sort_by(|a, b| {
            directed(as_list(a).created_or_epoch().cmp(&as_list(b).created_or_epoch()), direction)
        }),
        SortMethod::Recent => lists.sort_by(|a, b| {
            directed(as_list(a).touched_or_epoch().cmp(&as_list(b).touched_or_epoch()), direction)
        }),
        SortMethod::Popularity => {
            lists.sort_by(|a, b| directed(as_list(a).item_count().cmp(&as_list(b).item_count()), direction))
        }
        SortMethod::Manual => {
            let ranks = manual.ranks();
            let rank = |l: &MediaList| ranks.get(l.id.as_str()).copied().unwrap_or(usize::MAX);
            lists.sort_by(|a, b| rank(as_list(a)).cmp(&rank(as_list(b))));
        }
        SortMethod::Default => lists.sort_by(|a, b| {
            as_list(b).created_or_epoch().cmp(&as_list(a).created_or_epoch())
        }),
    }
}

/// Lists whose name or description contains `term`, ignoring case
pub fn filter_lists<'a>(lists: &'a [MediaList], term: &str) -> Vec<&'a MediaList> {
    lists.iter().filter(|l| l.matches(term)).collect()
}
