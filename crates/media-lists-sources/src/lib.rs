pub mod backend;
pub mod error;
pub mod http;
pub mod openlibrary;
pub mod registry;
pub mod tmdb;
pub mod traits;

pub use backend::BackendClient;
pub use error::SourceError;
pub use openlibrary::OpenLibraryClient;
pub use registry::SearchRegistry;
pub use tmdb::TmdbClient;
pub use traits::{ListStore, MediaSearch};
