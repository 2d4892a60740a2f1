pub mod collection;
pub mod editor;
pub mod error;
pub mod manual_order;
pub mod migrate;
pub mod session;
pub mod sort;

#[cfg(test)]
mod testing;

pub use collection::ListCollection;
pub use editor::{EditorMode, ListEditor};
pub use error::CoreError;
pub use manual_order::ManualOrder;
pub use migrate::{migrate_local_lists, MigrationReport};
pub use session::{decode_claims, Session, TokenClaims};
pub use sort::{filter_lists, sort_lists, SortSelection};
