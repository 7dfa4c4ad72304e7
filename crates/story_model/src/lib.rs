pub mod domain;
pub mod error;
pub mod feed;

pub use domain::{Story, StoryId, User, DEFAULT_STORY_DURATION};
pub use error::ModelError;
pub use feed::{parse_story_feed, retain_valid_stories, DecodedFeed};
