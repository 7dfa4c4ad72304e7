//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    LoadFeed,
    /// `key` is the image reference exactly as it appears in the feed.
    FetchImage {
        key: String,
    },
    FetchImages {
        keys: Vec<String>,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadFeed => "load_feed",
            BackendCommand::FetchImage { .. } => "fetch_image",
            BackendCommand::FetchImages { .. } => "fetch_images",
        }
    }
}
