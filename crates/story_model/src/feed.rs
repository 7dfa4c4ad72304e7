//! Decoding of the static story feed (a JSON array of [`Story`] records).

use std::collections::HashMap;

use crate::{
    domain::{Story, StoryId},
    error::ModelError,
};

/// A decoded feed: the playable stories plus the entries that were skipped.
#[derive(Debug, Default)]
pub struct DecodedFeed {
    pub stories: Vec<Story>,
    pub rejected: Vec<ModelError>,
}

/// Decodes a story feed body.
///
/// Order is preserved; it is the playback order. Entries with a blank id, or
/// repeating an id already seen, are dropped and reported in
/// [`DecodedFeed::rejected`]; only a body that is not a story array fails.
pub fn parse_story_feed(body: &[u8]) -> Result<DecodedFeed, ModelError> {
    let stories: Vec<Story> = serde_json::from_slice(body)?;
    Ok(retain_valid_stories(stories))
}

pub fn retain_valid_stories(stories: Vec<Story>) -> DecodedFeed {
    let mut seen: HashMap<StoryId, usize> = HashMap::with_capacity(stories.len());
    let mut feed = DecodedFeed::default();
    for (position, story) in stories.into_iter().enumerate() {
        if story.id.as_str().trim().is_empty() {
            feed.rejected.push(ModelError::EmptyId { position });
            continue;
        }
        if let Some(&first) = seen.get(&story.id) {
            feed.rejected.push(ModelError::DuplicateId {
                id: story.id,
                first,
                second: position,
            });
            continue;
        }
        seen.insert(story.id.clone(), position);
        feed.stories.push(story);
    }
    feed
}
