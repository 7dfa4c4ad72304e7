//! Page-level owner of the story list and the view cursor.
//!
//! The cursor is `None` while the viewer is closed and `Some(index)` with
//! `index < stories.len()` while it is open; a mounted [`StoryViewer`] exists
//! exactly when the cursor is `Some`. Transitions:
//!
//! * [`StoryHost::open`] sets the cursor (out-of-range indices close instead),
//! * [`StoryHost::navigate`] / [`StoryHost::navigate_by`] move it, closing when
//!   the target is outside the list,
//! * [`StoryHost::close`] resets it to `None` and unmounts the viewer.

use std::sync::Arc;

use story_model::Story;
use tracing::{error, info, warn};

use crate::{
    clock::Clock,
    error::FeedError,
    viewer::{StoryViewer, ViewerRequest},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Loading,
    Ready,
    /// The feed could not be read; the list is empty.
    Failed(String),
}

#[derive(Debug)]
pub struct StoryHost<C> {
    clock: C,
    stories: Arc<[Story]>,
    feed: FeedStatus,
    cursor: Option<usize>,
    viewer: Option<StoryViewer<C>>,
}

impl<C: Clock + Clone> StoryHost<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            stories: Arc::from(Vec::new()),
            feed: FeedStatus::Loading,
            cursor: None,
            viewer: None,
        }
    }

    pub fn feed_loaded(&mut self, result: Result<Vec<Story>, FeedError>) {
        self.close();
        match result {
            Ok(stories) => {
                info!(count = stories.len(), "story feed loaded");
                self.stories = Arc::from(stories);
                self.feed = FeedStatus::Ready;
            }
            Err(err) => {
                error!("failed to load story feed: {err}");
                self.stories = Arc::from(Vec::new());
                self.feed = FeedStatus::Failed(err.to_string());
            }
        }
    }

    pub fn feed_status(&self) -> &FeedStatus {
        &self.feed
    }

    pub fn is_loading(&self) -> bool {
        self.feed == FeedStatus::Loading
    }

    /// Loading finished (successfully or not) and there is nothing to show.
    pub fn is_empty_state(&self) -> bool {
        !self.is_loading() && self.stories.is_empty()
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_story(&self) -> Option<&Story> {
        self.cursor.and_then(|index| self.stories.get(index))
    }

    pub fn viewer(&self) -> Option<&StoryViewer<C>> {
        self.viewer.as_ref()
    }

    pub fn viewer_mut(&mut self) -> Option<&mut StoryViewer<C>> {
        self.viewer.as_mut()
    }

    pub fn open(&mut self, index: usize) {
        if index >= self.stories.len() {
            warn!(index, len = self.stories.len(), "open request outside story list");
            self.close();
            return;
        }
        self.set_cursor(index);
    }

    pub fn navigate(&mut self, index: usize) {
        if self.cursor.is_none() {
            warn!(index, "navigation request while viewer is closed");
            return;
        }
        if index >= self.stories.len() {
            info!(index, "navigation past the story list; closing viewer");
            self.close();
            return;
        }
        self.set_cursor(index);
    }

    pub fn navigate_by(&mut self, delta: isize) {
        let Some(current) = self.cursor else {
            return;
        };
        match current.checked_add_signed(delta) {
            Some(target) => self.navigate(target),
            None => {
                info!(current, delta, "navigation before the first story; closing viewer");
                self.close();
            }
        }
    }

    pub fn close(&mut self) {
        if let Some(mut viewer) = self.viewer.take() {
            viewer.unmount();
            info!(index = viewer.index(), "story viewer closed");
        }
        self.cursor = None;
    }

    pub fn apply(&mut self, request: ViewerRequest) {
        match request {
            ViewerRequest::Navigate(index) => self.navigate(index),
            ViewerRequest::Close => self.close(),
        }
    }

    /// Drives the open viewer's timers and applies whatever it requests.
    pub fn tick(&mut self) -> Option<ViewerRequest> {
        let request = self.viewer.as_mut()?.tick()?;
        self.apply(request);
        Some(request)
    }

    fn set_cursor(&mut self, index: usize) {
        let shown = if let Some(viewer) = self.viewer.as_mut() {
            viewer.show(index)
        } else {
            StoryViewer::new(Arc::clone(&self.stories), index, self.clock.clone()).map(|viewer| {
                info!(index, "story viewer opened");
                self.viewer = Some(viewer);
            })
        };
        match shown {
            Ok(()) => self.cursor = Some(index),
            Err(err) => {
                warn!("closing story viewer: {err}");
                self.close();
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
