use std::{collections::HashSet, time::Duration};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use story_core::{ImageOutcome, MonotonicClock, StoryHost};
use story_model::Story;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::carousel::show_carousel;
use crate::ui::images::{ImageCache, ImageSlot};
use crate::ui::theme::{apply_theme, PALETTE};
use crate::ui::viewer_view::{show_viewer, PressTracker, ViewerIntent};

const IDLE_REPAINT: Duration = Duration::from_millis(100);

pub struct StoryFlowApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    host: StoryHost<MonotonicClock>,
    images: ImageCache,
    press: PressTracker,
    status: String,
    startup_error: Option<UiError>,
}

impl StoryFlowApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        apply_theme(&cc.egui_ctx);
        let mut app = Self {
            cmd_tx,
            ui_rx,
            host: StoryHost::new(MonotonicClock::new()),
            images: ImageCache::default(),
            press: PressTracker::default(),
            status: "Loading stories...".to_string(),
            startup_error: None,
        };
        dispatch_backend_command(&app.cmd_tx, BackendCommand::LoadFeed, &mut app.status);
        app
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::FeedLoaded(stories) => {
                    self.status = format!("{} stories", stories.len());
                    self.images.clear();
                    let keys = feed_image_keys(&stories);
                    self.host.feed_loaded(Ok(stories));
                    self.prefetch(keys);
                }
                UiEvent::FeedFailed { error, ui_error } => {
                    self.status = ui_error.status_line();
                    self.host.feed_loaded(Err(error));
                }
                UiEvent::ImageLoaded { key, image } => {
                    self.images.insert_decoded(ctx, key, image);
                }
                UiEvent::ImageFailed { key, reason } => {
                    let err = UiError::from_message(UiErrorContext::ImageLoad, reason);
                    tracing::debug!(%key, category = ?err.category(), reason = err.message(), "image unavailable");
                    self.images.mark_failed(key);
                }
                UiEvent::Error(err) => {
                    tracing::error!("{}", err.status_line());
                    self.status = err.status_line();
                    if err.context() == UiErrorContext::BackendStartup {
                        self.startup_error = Some(err);
                    }
                }
            }
        }
    }

    fn prefetch(&mut self, keys: Vec<String>) {
        let keys: Vec<String> = keys
            .into_iter()
            .filter(|key| self.images.request(key))
            .collect();
        if keys.is_empty() {
            return;
        }
        let batch = keys.clone();
        if !dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchImages { keys: batch },
            &mut self.status,
        ) {
            for key in keys {
                self.images.mark_failed(key);
            }
        }
    }

    fn request_image(&mut self, key: &str) {
        if !self.images.request(key) {
            return;
        }
        let cmd = BackendCommand::FetchImage {
            key: key.to_string(),
        };
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.images.mark_failed(key.to_string());
        }
    }

    /// Keeps the open viewer in step with the image cache: requests the
    /// current and next slide images and reports a settled current image.
    fn sync_viewer(&mut self) {
        let Some(viewer) = self.host.viewer() else {
            return;
        };
        let current = viewer.story().clone();
        let upcoming = self
            .host
            .stories()
            .get(viewer.index() + 1)
            .map(|story| story.image_url.clone());

        self.request_image(&current.image_url);
        self.request_image(&current.user.avatar_url);
        if let Some(key) = upcoming {
            self.request_image(&key);
        }

        let outcome = self
            .images
            .get(&current.image_url)
            .filter(|slot| slot.is_settled())
            .map(|slot| match slot {
                ImageSlot::Ready { .. } => ImageOutcome::Loaded,
                _ => ImageOutcome::Failed,
            });
        if let (Some(outcome), Some(viewer)) = (outcome, self.host.viewer_mut()) {
            if viewer.is_image_loading() {
                viewer.image_settled(&current.id, outcome);
            }
        }
    }

    fn apply_intent(&mut self, intent: ViewerIntent) {
        match intent {
            ViewerIntent::Previous => {
                if let Some(request) = self.host.viewer().and_then(|viewer| viewer.previous()) {
                    self.host.apply(request);
                }
            }
            ViewerIntent::Next => {
                if let Some(request) = self.host.viewer().map(|viewer| viewer.next()) {
                    self.host.apply(request);
                }
            }
            ViewerIntent::Close => self.host.close(),
            ViewerIntent::PressStart => {
                if let Some(viewer) = self.host.viewer_mut() {
                    viewer.press_start();
                }
            }
            ViewerIntent::PressEnd => {
                if let Some(viewer) = self.host.viewer_mut() {
                    viewer.press_end();
                }
            }
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(&self.status)
                            .small()
                            .color(PALETTE.muted_text),
                    )
                    .truncate(),
                );
            });
    }

    fn show_page(&mut self, ctx: &egui::Context) -> Option<usize> {
        self.show_status_bar(ctx);
        egui::CentralPanel::default()
            .show(ctx, |ui| {
                if self.host.is_loading() && self.startup_error.is_none() {
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Spinner::new().size(48.0).color(PALETTE.ring_end));
                    });
                    return None;
                }

                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("Stories")
                        .size(18.0)
                        .strong()
                        .color(PALETTE.heading_text),
                );
                ui.add_space(6.0);
                let opened = show_carousel(ui, self.host.stories(), &self.images);
                ui.separator();

                ui.vertical_centered(|ui| {
                    ui.add_space((ui.available_height() * 0.3).max(16.0));
                    ui.label(
                        egui::RichText::new("StoryFlow")
                            .size(30.0)
                            .strong()
                            .color(PALETTE.ring_end),
                    );
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new("Tap on a story preview above to start watching.")
                            .color(PALETTE.muted_text),
                    );
                    if self.host.is_empty_state() || self.startup_error.is_some() {
                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new("No stories available at the moment.")
                                .color(egui::Color32::from_rgb(230, 80, 80)),
                        );
                    }
                });
                opened
            })
            .inner
    }

    fn show_viewer_overlay(&mut self, ctx: &egui::Context) -> Vec<ViewerIntent> {
        let Some(viewer) = self.host.viewer() else {
            return Vec::new();
        };
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(PALETTE.viewer_background))
            .show(ctx, |ui| show_viewer(ui, viewer, &self.images, &mut self.press))
            .inner
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        let wait = self
            .host
            .viewer()
            .and_then(|viewer| viewer.next_deadline())
            .map_or(IDLE_REPAINT, |deadline| deadline.min(IDLE_REPAINT));
        ctx.request_repaint_after(wait);
    }
}

/// Every distinct thumbnail and avatar reference in feed order.
fn feed_image_keys(stories: &[Story]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keys = Vec::new();
    for story in stories {
        for key in [story.image_url.as_str(), story.user.avatar_url.as_str()] {
            if !key.is_empty() && seen.insert(key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

impl eframe::App for StoryFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events(ctx);
        self.host.tick();
        self.sync_viewer();

        if self.host.viewer().is_some() {
            for intent in self.show_viewer_overlay(ctx) {
                self.apply_intent(intent);
            }
        } else if let Some(index) = self.show_page(ctx) {
            self.press.reset();
            self.host.open(index);
        }
        if self.host.viewer().is_none() {
            self.press.reset();
        }
        self.sync_viewer();

        self.schedule_repaint(ctx);
    }
}

#[cfg(test)]
mod tests {
    use story_model::{StoryId, User};

    use super::*;

    fn story(id: &str, avatar: &str) -> Story {
        Story {
            id: StoryId::new(id),
            user: User {
                name: id.to_string(),
                avatar_url: avatar.to_string(),
            },
            image_url: format!("images/{id}.jpg"),
            duration: None,
        }
    }

    #[test]
    fn prefetch_keys_are_distinct_and_ordered() {
        let stories = vec![
            story("1", "avatars/ana.png"),
            story("2", "avatars/ana.png"),
            story("3", ""),
        ];
        assert_eq!(
            feed_image_keys(&stories),
            vec![
                "images/1.jpg".to_string(),
                "avatars/ana.png".to_string(),
                "images/2.jpg".to_string(),
                "images/3.jpg".to_string(),
            ]
        );
    }
}
