pub mod legacy;
pub mod list;
pub mod media;
pub mod sort;
pub mod timestamp;
pub mod user;

pub use legacy::LegacyList;
pub use list::{ListScope, MediaList, NewList};
pub use media::{MediaKind, MediaRef, PLACEHOLDER_IMAGE};
pub use sort::{SortDirection, SortMethod};
pub use user::{LoginResponse, TokenStatus, UserProfile};
