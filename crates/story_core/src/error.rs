use std::path::PathBuf;

use story_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {location} failed: {source}")]
    Transport {
        location: String,
        source: reqwest::Error,
    },
    #[error("{location} answered with status {status}")]
    Status { location: String, status: u16 },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid story feed from {location}: {source}")]
    Invalid {
        location: String,
        source: ModelError,
    },
    #[error("unsupported resource location '{0}'")]
    UnsupportedLocation(String),
}
