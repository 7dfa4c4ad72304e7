//! Headless story playback: the timed viewer state machine, the page-level host
//! that owns the view cursor, and the sources the story feed is read from.

pub mod clock;
pub mod error;
pub mod host;
pub mod scheduler;
pub mod source;
pub mod viewer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::FeedError;
pub use host::{FeedStatus, StoryHost};
pub use source::{fetch_resource, source_for, ResourceLocation, StorySource};
pub use viewer::{
    ImageOutcome, PlaybackPhase, StoryViewer, ViewerControls, ViewerError, ViewerRequest,
    PROGRESS_SAMPLE_INTERVAL,
};
