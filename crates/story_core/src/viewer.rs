//! Auto-advancing story viewer state machine.
//!
//! The viewer plays one story at a time. A slide starts in
//! [`PlaybackPhase::Loading`]; once its image settles the countdown for the
//! story's duration is armed together with a 50 ms progress sampling cadence.
//! Pressing pauses (both timers cancelled, elapsed time kept), releasing resumes
//! from the kept elapsed time. When the countdown fires the viewer requests the
//! next index, or a close after the last story.
//!
//! The viewer never moves its own cursor: every navigation is a
//! [`ViewerRequest`] for the host, which answers with [`StoryViewer::show`].

use std::{sync::Arc, time::Duration};

use story_model::{Story, StoryId};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    scheduler::{Scheduler, TimerId},
};

pub const PROGRESS_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Waiting for the current slide's image; no timers armed.
    Loading,
    Playing,
    Paused,
    /// Countdown elapsed and a request was emitted; waiting for the host.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerRequest {
    Navigate(usize),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerControls {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerError {
    #[error("story index {index} is out of range for {len} stories")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Sample,
    Countdown,
}

#[derive(Debug)]
pub struct StoryViewer<C> {
    stories: Arc<[Story]>,
    index: usize,
    clock: C,
    timers: Scheduler<TimerKind>,
    sample_timer: Option<TimerId>,
    countdown_timer: Option<TimerId>,
    phase: PlaybackPhase,
    progress: f32,
    /// Elapsed playback of the current slide, as of `segment_started_at`.
    elapsed: Duration,
    segment_started_at: Duration,
}

impl<C: Clock> StoryViewer<C> {
    pub fn new(stories: Arc<[Story]>, index: usize, clock: C) -> Result<Self, ViewerError> {
        check_index(index, stories.len())?;
        debug!(index, len = stories.len(), "story viewer mounted");
        Ok(Self {
            stories,
            index,
            clock,
            timers: Scheduler::new(),
            sample_timer: None,
            countdown_timer: None,
            phase: PlaybackPhase::Loading,
            progress: 0.0,
            elapsed: Duration::ZERO,
            segment_started_at: Duration::ZERO,
        })
    }

    /// Switches to another slide. Pending timers of the previous slide are
    /// cancelled before anything else changes.
    pub fn show(&mut self, index: usize) -> Result<(), ViewerError> {
        check_index(index, self.stories.len())?;
        self.cancel_timers();
        self.index = index;
        self.phase = PlaybackPhase::Loading;
        self.progress = 0.0;
        self.elapsed = Duration::ZERO;
        debug!(index, "story viewer switched slide");
        Ok(())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn story(&self) -> &Story {
        &self.stories[self.index]
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_image_loading(&self) -> bool {
        self.phase == PlaybackPhase::Loading
    }

    pub fn is_paused(&self) -> bool {
        self.phase == PlaybackPhase::Paused
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.stories.len()
    }

    pub fn controls(&self) -> ViewerControls {
        ViewerControls {
            previous_enabled: self.index > 0,
            // Next at the last slide closes, the same as the countdown does.
            next_enabled: true,
        }
    }

    /// Fill of the progress segment for `position`: 100 for watched slides,
    /// live progress for the current one, 0 for upcoming ones.
    pub fn segment_progress(&self, position: usize) -> f32 {
        if position < self.index {
            100.0
        } else if position == self.index {
            self.progress
        } else {
            0.0
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.stories.len()).map(|position| self.segment_progress(position))
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown_timer
            .is_some_and(|timer| self.timers.is_pending(timer))
    }

    pub fn is_sampling(&self) -> bool {
        self.sample_timer
            .is_some_and(|timer| self.timers.is_pending(timer))
    }

    /// Time until the next armed timer, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        let due = self.timers.next_due()?;
        Some(due.saturating_sub(self.clock.now()))
    }

    /// Marks the current slide's image as displayable and starts its countdown.
    /// A failed load counts as settled. Notifications for any other story, or
    /// after the countdown already started, are ignored.
    pub fn image_settled(&mut self, story_id: &StoryId, outcome: ImageOutcome) -> bool {
        if story_id != &self.story().id {
            debug!(%story_id, current = %self.story().id, "ignoring image event for another slide");
            return false;
        }
        if self.phase != PlaybackPhase::Loading {
            return false;
        }
        if outcome == ImageOutcome::Failed {
            warn!(%story_id, "story image failed to load; playing slide anyway");
        }
        self.start_segment();
        true
    }

    /// Fires every timer due by now. Returns the navigation request produced by
    /// a completed countdown, if any.
    pub fn tick(&mut self) -> Option<ViewerRequest> {
        let now = self.clock.now();
        while let Some(fired) = self.timers.pop_due(now) {
            match fired.kind {
                TimerKind::Sample => {
                    self.sample(now);
                    let mut next = fired.due + PROGRESS_SAMPLE_INTERVAL;
                    if next <= now {
                        next = now + PROGRESS_SAMPLE_INTERVAL;
                    }
                    self.sample_timer = Some(self.timers.arm_at(next, TimerKind::Sample));
                }
                TimerKind::Countdown => {
                    self.countdown_timer = None;
                    return Some(self.finish());
                }
            }
        }
        None
    }

    /// Press-and-hold began. Only a playing slide can pause.
    pub fn press_start(&mut self) -> bool {
        if self.phase != PlaybackPhase::Playing {
            return false;
        }
        let now = self.clock.now();
        self.elapsed = self.elapsed_at(now);
        self.progress = percent(self.elapsed, self.story().duration());
        self.cancel_timers();
        self.phase = PlaybackPhase::Paused;
        debug!(index = self.index, progress = self.progress, "story paused");
        true
    }

    /// Press released: continue the countdown from the kept elapsed time.
    pub fn press_end(&mut self) -> bool {
        if self.phase != PlaybackPhase::Paused {
            return false;
        }
        debug!(index = self.index, progress = self.progress, "story resumed");
        self.start_segment();
        true
    }

    pub fn previous(&self) -> Option<ViewerRequest> {
        if self.index > 0 {
            Some(ViewerRequest::Navigate(self.index - 1))
        } else {
            None
        }
    }

    pub fn next(&self) -> ViewerRequest {
        self.request_after_current()
    }

    pub fn close(&self) -> ViewerRequest {
        ViewerRequest::Close
    }

    /// Cancels everything unconditionally; the viewer is about to be dropped.
    pub fn unmount(&mut self) {
        let cancelled = self.timers.len();
        self.timers.cancel_all();
        self.sample_timer = None;
        self.countdown_timer = None;
        debug!(index = self.index, cancelled, "story viewer unmounted");
    }

    fn start_segment(&mut self) {
        self.cancel_timers();
        let now = self.clock.now();
        let remaining = self.story().duration().saturating_sub(self.elapsed);
        self.segment_started_at = now;
        self.countdown_timer = Some(self.timers.arm_at(now + remaining, TimerKind::Countdown));
        self.sample_timer = Some(
            self.timers
                .arm_at(now + PROGRESS_SAMPLE_INTERVAL, TimerKind::Sample),
        );
        self.phase = PlaybackPhase::Playing;
    }

    fn elapsed_at(&self, now: Duration) -> Duration {
        let total = self.elapsed + now.saturating_sub(self.segment_started_at);
        total.min(self.story().duration())
    }

    fn sample(&mut self, now: Duration) {
        self.progress = percent(self.elapsed_at(now), self.story().duration());
    }

    fn finish(&mut self) -> ViewerRequest {
        self.cancel_timers();
        self.elapsed = self.story().duration();
        self.progress = 100.0;
        self.phase = PlaybackPhase::Completed;
        let request = self.request_after_current();
        info!(index = self.index, ?request, "story finished");
        request
    }

    fn request_after_current(&self) -> ViewerRequest {
        if self.is_last() {
            ViewerRequest::Close
        } else {
            ViewerRequest::Navigate(self.index + 1)
        }
    }

    fn cancel_timers(&mut self) {
        for timer in [self.sample_timer.take(), self.countdown_timer.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(timer);
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<(), ViewerError> {
    if index < len {
        Ok(())
    } else {
        Err(ViewerError::IndexOutOfRange { index, len })
    }
}

fn percent(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 100.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    (ratio * 100.0).min(100.0) as f32
}

#[cfg(test)]
#[path = "tests/viewer_tests.rs"]
mod tests;
