use thiserror::Error;

use crate::domain::StoryId;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed story feed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("story at position {position} has an empty id")]
    EmptyId { position: usize },
    #[error("duplicate story id '{id}' at positions {first} and {second}")]
    DuplicateId {
        id: StoryId,
        first: usize,
        second: usize,
    },
}
