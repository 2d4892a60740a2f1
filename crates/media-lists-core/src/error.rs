use media_lists_sources::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("List name cannot be empty")]
    EmptyName,

    #[error("No list with id {0} in this collection")]
    UnknownList(String),

    #[error("Position {index} is out of range for {len} entries")]
    InvalidIndex { index: usize, len: usize },

    #[error("List is not in edit mode")]
    NotEditing,

    #[error("You do not have permission to edit this list")]
    NotPermitted,

    #[error("User {0} not found")]
    CollaboratorNotFound(String),

    #[error("{0} is already a collaborator")]
    DuplicateCollaborator(String),

    #[error("The list owner cannot be added as a collaborator")]
    OwnerAsCollaborator,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error(transparent)]
    Local(#[from] anyhow::Error),
}

impl CoreError {
    pub fn is_auth(&self) -> bool {
        match self {
            CoreError::Source(e) => e.is_auth(),
            CoreError::NotLoggedIn => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
