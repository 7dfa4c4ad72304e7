//! Where stories and their images come from.
//!
//! A [`ResourceLocation`] is either an `http(s)` URL or a local file path. The
//! feed is read once through a [`StorySource`]; image references inside the feed
//! are resolved against the feed's own location.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use async_trait::async_trait;
use reqwest::Client;
use story_model::{parse_story_feed, Story};
use tracing::{debug, warn};
use url::Url;

use crate::error::FeedError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocation {
    Http(Url),
    File(PathBuf),
}

impl ResourceLocation {
    pub fn parse(raw: &str) -> Result<Self, FeedError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FeedError::UnsupportedLocation(raw.to_string()));
        }
        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Http(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::File)
                    .map_err(|()| FeedError::UnsupportedLocation(raw.to_string())),
                // `C:\stories.json` parses as a URL with scheme `c`.
                scheme if scheme.len() == 1 => Ok(Self::File(PathBuf::from(raw))),
                _ => Err(FeedError::UnsupportedLocation(raw.to_string())),
            },
            Err(_) => Ok(Self::File(PathBuf::from(raw))),
        }
    }

    /// Resolves a reference found inside a resource at this location.
    /// Absolute URLs and absolute paths are kept; anything else is relative to
    /// this location.
    pub fn resolve(&self, reference: &str) -> Result<Self, FeedError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(FeedError::UnsupportedLocation(reference.to_string()));
        }
        if matches!(Url::parse(reference), Ok(url) if url.scheme().len() > 1) {
            return Self::parse(reference);
        }
        match self {
            Self::Http(base) => base
                .join(reference)
                .map(Self::Http)
                .map_err(|_| FeedError::UnsupportedLocation(reference.to_string())),
            Self::File(feed_path) => {
                let candidate = Path::new(reference);
                if candidate.is_absolute() {
                    Ok(Self::File(candidate.to_path_buf()))
                } else {
                    let dir = feed_path.parent().unwrap_or_else(|| Path::new(""));
                    Ok(Self::File(dir.join(candidate)))
                }
            }
        }
    }
}

impl FromStr for ResourceLocation {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads the raw bytes behind a location.
pub async fn fetch_resource(client: &Client, location: &ResourceLocation) -> Result<Vec<u8>, FeedError> {
    match location {
        ResourceLocation::Http(url) => {
            let response = client
                .get(url.clone())
                .send()
                .await
                .map_err(|source| FeedError::Transport {
                    location: url.to_string(),
                    source,
                })?;
            let status = response.status();
            if !status.is_success() {
                return Err(FeedError::Status {
                    location: url.to_string(),
                    status: status.as_u16(),
                });
            }
            let body = response
                .bytes()
                .await
                .map_err(|source| FeedError::Transport {
                    location: url.to_string(),
                    source,
                })?;
            debug!(%url, bytes = body.len(), "fetched remote resource");
            Ok(body.to_vec())
        }
        ResourceLocation::File(path) => read_local(path).await,
    }
}

async fn read_local(path: &Path) -> Result<Vec<u8>, FeedError> {
    let body = tokio::fs::read(path).await.map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = body.len(), "read local resource");
    Ok(body)
}

#[async_trait]
pub trait StorySource: Send + Sync {
    fn location(&self) -> &ResourceLocation;

    async fn fetch_stories(&self) -> Result<Vec<Story>, FeedError>;
}

pub struct HttpStorySource {
    client: Client,
    location: ResourceLocation,
}

impl HttpStorySource {
    pub fn new(client: Client, url: Url) -> Self {
        Self {
            client,
            location: ResourceLocation::Http(url),
        }
    }
}

#[async_trait]
impl StorySource for HttpStorySource {
    fn location(&self) -> &ResourceLocation {
        &self.location
    }

    async fn fetch_stories(&self) -> Result<Vec<Story>, FeedError> {
        let body = fetch_resource(&self.client, &self.location).await?;
        decode_feed(&self.location, &body)
    }
}

pub struct FileStorySource {
    location: ResourceLocation,
}

impl FileStorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: ResourceLocation::File(path.into()),
        }
    }
}

#[async_trait]
impl StorySource for FileStorySource {
    fn location(&self) -> &ResourceLocation {
        &self.location
    }

    async fn fetch_stories(&self) -> Result<Vec<Story>, FeedError> {
        let ResourceLocation::File(path) = &self.location else {
            return Err(FeedError::UnsupportedLocation(self.location.to_string()));
        };
        let body = read_local(path).await?;
        decode_feed(&self.location, &body)
    }
}

pub fn source_for(location: ResourceLocation, client: Client) -> Box<dyn StorySource> {
    match location {
        ResourceLocation::Http(url) => Box::new(HttpStorySource::new(client, url)),
        ResourceLocation::File(path) => Box::new(FileStorySource::new(path)),
    }
}

fn decode_feed(location: &ResourceLocation, body: &[u8]) -> Result<Vec<Story>, FeedError> {
    let feed = parse_story_feed(body).map_err(|source| FeedError::Invalid {
        location: location.to_string(),
        source,
    })?;
    for problem in &feed.rejected {
        warn!(%location, "skipping story feed entry: {problem}");
    }
    Ok(feed.stories)
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
