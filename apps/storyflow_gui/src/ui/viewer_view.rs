//! Full-window story viewer: progress segments, header, slide image, tap
//! zones, chevrons and keyboard handling. Drawing only; every state change is
//! returned as a [`ViewerIntent`] for the app to apply.

use eframe::egui;
use story_core::{Clock, StoryViewer};

use crate::ui::images::{contain_rect, ImageCache, ImageSlot};
use crate::ui::layout::{corner_radius, paint_vertical_gradient, ui_in_rect};
use crate::ui::preview_item::paint_avatar;
use crate::ui::theme::PALETTE;

const PROGRESS_TOP: f32 = 12.0;
const PROGRESS_HEIGHT: f32 = 4.0;
const PROGRESS_GAP: f32 = 4.0;
const SIDE_MARGIN: f32 = 12.0;
const HEADER_TOP: f32 = 24.0;
const HEADER_AVATAR: f32 = 32.0;
const CHEVRON_SIZE: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerIntent {
    Previous,
    Next,
    Close,
    PressStart,
    PressEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZone {
    Previous,
    Middle,
    Next,
}

/// Left third goes back, right third goes forward.
pub fn tap_zone(x: f32, width: f32) -> TapZone {
    if width <= 0.0 {
        return TapZone::Middle;
    }
    let third = width / 3.0;
    if x < third {
        TapZone::Previous
    } else if x >= width - third {
        TapZone::Next
    } else {
        TapZone::Middle
    }
}

/// Folds pointer and keyboard holds into pause/resume intents.
#[derive(Debug, Default)]
pub struct PressTracker {
    held: bool,
}

impl PressTracker {
    /// While held, `PressStart` is repeated every frame so a slide that
    /// starts playing under a held press pauses right away. The viewer ignores
    /// it unless playing.
    pub fn update(&mut self, pointer_held: bool, key_held: bool) -> Option<ViewerIntent> {
        let was_held = self.held;
        self.held = pointer_held || key_held;
        match (was_held, self.held) {
            (_, true) => Some(ViewerIntent::PressStart),
            (true, false) => Some(ViewerIntent::PressEnd),
            (false, false) => None,
        }
    }

    pub fn reset(&mut self) {
        self.held = false;
    }
}

struct KeyInput {
    previous: bool,
    next: bool,
    close: bool,
    hold: bool,
}

fn read_keys(ui: &egui::Ui) -> KeyInput {
    ui.input_mut(|i| {
        let hold = i.key_down(egui::Key::Space);
        i.consume_key(egui::Modifiers::NONE, egui::Key::Space);
        KeyInput {
            previous: i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowLeft),
            next: i.consume_key(egui::Modifiers::NONE, egui::Key::ArrowRight),
            close: i.consume_key(egui::Modifiers::NONE, egui::Key::Escape),
            hold,
        }
    })
}

pub fn show_viewer<C: Clock>(
    ui: &mut egui::Ui,
    viewer: &StoryViewer<C>,
    images: &ImageCache,
    press: &mut PressTracker,
) -> Vec<ViewerIntent> {
    let rect = ui.max_rect();
    let story = viewer.story();
    let mut intents = Vec::new();

    let keys = read_keys(ui);
    let surface = ui.interact(
        rect,
        ui.id().with("story_viewer_surface"),
        egui::Sense::click(),
    );

    if let Some(intent) = press.update(surface.is_pointer_button_down_on(), keys.hold) {
        intents.push(intent);
    }

    ui.painter().rect_filled(rect, 0.0, PALETTE.viewer_background);

    match images.get(&story.image_url) {
        Some(ImageSlot::Ready { texture, size }) => {
            let image_rect = contain_rect(*size, rect);
            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        Some(ImageSlot::Failed) => {
            let placeholder = egui::Rect::from_center_size(
                rect.center(),
                egui::vec2(rect.width() * 0.7, rect.width() * 0.7),
            );
            ui.painter()
                .rect_filled(placeholder, corner_radius(12.0), PALETTE.preview_fill);
            ui.painter().text(
                placeholder.center(),
                egui::Align2::CENTER_CENTER,
                "Image unavailable",
                egui::FontId::proportional(15.0),
                PALETTE.muted_text,
            );
        }
        Some(ImageSlot::Requested) | None => {}
    }

    if viewer.is_image_loading() {
        ui.painter().rect_filled(rect, 0.0, PALETTE.shade.gamma_multiply(0.5));
        let spinner_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(40.0, 40.0));
        egui::Spinner::new()
            .size(40.0)
            .color(PALETTE.overlay_text)
            .paint_at(ui, spinner_rect);
    }

    let header_band = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), 80.0));
    paint_vertical_gradient(
        ui.painter(),
        header_band,
        PALETTE.shade,
        egui::Color32::TRANSPARENT,
    );

    paint_progress(ui.painter(), rect, viewer);

    let avatar_rect = egui::Rect::from_min_size(
        egui::pos2(rect.left() + SIDE_MARGIN, rect.top() + HEADER_TOP),
        egui::vec2(HEADER_AVATAR, HEADER_AVATAR),
    );
    paint_avatar(
        ui,
        avatar_rect,
        images.get(&story.user.avatar_url),
        &story.user,
        PALETTE.overlay_text.gamma_multiply(0.8),
    );

    let close_rect = egui::Rect::from_min_size(
        egui::pos2(
            rect.right() - SIDE_MARGIN - HEADER_AVATAR,
            rect.top() + HEADER_TOP,
        ),
        egui::vec2(HEADER_AVATAR, HEADER_AVATAR),
    );
    let name_rect = egui::Rect::from_min_max(
        egui::pos2(avatar_rect.right() + 8.0, avatar_rect.top()),
        egui::pos2(close_rect.left() - 8.0, avatar_rect.bottom()),
    );
    ui_in_rect(ui, name_rect, |ui| {
        ui.add(
            egui::Label::new(
                egui::RichText::new(&story.user.name)
                    .color(PALETTE.overlay_text)
                    .strong()
                    .size(14.0),
            )
            .truncate()
            .selectable(false),
        );
    });

    let mut close_clicked = false;
    ui_in_rect(ui, close_rect, |ui| {
        close_clicked = ui
            .add_sized(close_rect.size(), overlay_button("✖", 18.0))
            .on_hover_text("Close stories")
            .clicked();
    });

    let controls = viewer.controls();
    let chevron_y = rect.center().y - CHEVRON_SIZE / 2.0;
    let previous_rect = egui::Rect::from_min_size(
        egui::pos2(rect.left() + 8.0, chevron_y),
        egui::vec2(CHEVRON_SIZE, CHEVRON_SIZE),
    );
    let next_rect = egui::Rect::from_min_size(
        egui::pos2(rect.right() - 8.0 - CHEVRON_SIZE, chevron_y),
        egui::vec2(CHEVRON_SIZE, CHEVRON_SIZE),
    );
    let mut previous_clicked = false;
    let mut next_clicked = false;
    ui_in_rect(ui, previous_rect, |ui| {
        previous_clicked = ui
            .add_enabled_ui(controls.previous_enabled, |ui| {
                ui.add_sized(previous_rect.size(), overlay_button("⏴", 26.0))
                    .on_hover_text("Previous story")
            })
            .inner
            .clicked();
    });
    ui_in_rect(ui, next_rect, |ui| {
        next_clicked = ui
            .add_enabled_ui(controls.next_enabled, |ui| {
                ui.add_sized(next_rect.size(), overlay_button("⏵", 26.0))
                    .on_hover_text("Next story")
            })
            .inner
            .clicked();
    });

    if surface.clicked() {
        if let Some(pos) = surface.interact_pointer_pos() {
            match tap_zone(pos.x - rect.left(), rect.width()) {
                TapZone::Previous => intents.push(ViewerIntent::Previous),
                TapZone::Next => intents.push(ViewerIntent::Next),
                TapZone::Middle => {}
            }
        }
    }
    if previous_clicked || keys.previous {
        intents.push(ViewerIntent::Previous);
    }
    if next_clicked || keys.next {
        intents.push(ViewerIntent::Next);
    }
    if close_clicked || keys.close {
        intents.push(ViewerIntent::Close);
    }

    intents
}

fn overlay_button(icon: &str, size: f32) -> egui::Button<'static> {
    egui::Button::new(
        egui::RichText::new(icon)
            .size(size)
            .color(PALETTE.overlay_text),
    )
    .frame(false)
    .corner_radius(corner_radius(CHEVRON_SIZE / 2.0))
}

fn paint_progress<C: Clock>(painter: &egui::Painter, rect: egui::Rect, viewer: &StoryViewer<C>) {
    let count = viewer.len();
    if count == 0 {
        return;
    }
    let available = rect.width() - 2.0 * SIDE_MARGIN - PROGRESS_GAP * (count - 1) as f32;
    let segment_width = (available / count as f32).max(1.0);
    let rounding = corner_radius(PROGRESS_HEIGHT / 2.0);

    for (position, fill) in viewer.segments().enumerate() {
        let left = rect.left() + SIDE_MARGIN + position as f32 * (segment_width + PROGRESS_GAP);
        let track = egui::Rect::from_min_size(
            egui::pos2(left, rect.top() + PROGRESS_TOP),
            egui::vec2(segment_width, PROGRESS_HEIGHT),
        );
        painter.rect_filled(track, rounding, PALETTE.progress_track);
        let filled = track.width() * (fill / 100.0).clamp(0.0, 1.0);
        if filled > 0.0 {
            let bar = egui::Rect::from_min_size(track.min, egui::vec2(filled, PROGRESS_HEIGHT));
            painter.rect_filled(bar, rounding, PALETTE.progress_fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use story_core::ManualClock;
    use story_model::{Story, StoryId, User};

    use super::*;

    fn stories(count: usize) -> Arc<[Story]> {
        (0..count)
            .map(|n| Story {
                id: StoryId::new(format!("s{n}")),
                user: User {
                    name: format!("user{n}"),
                    avatar_url: format!("avatars/{n}.png"),
                },
                image_url: format!("images/{n}.jpg"),
                duration: None,
            })
            .collect()
    }

    fn key(key: egui::Key, pressed: bool) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn run_frame(
        ctx: &egui::Context,
        viewer: &StoryViewer<ManualClock>,
        press: &mut PressTracker,
        events: Vec<egui::Event>,
    ) -> Vec<ViewerIntent> {
        let mut intents = Vec::new();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(400.0, 800.0),
            )),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    intents = show_viewer(ui, viewer, &ImageCache::default(), press);
                });
        });
        intents
    }

    fn pointer(pos: egui::Pos2, pressed: bool) -> Vec<egui::Event> {
        vec![
            egui::Event::PointerMoved(pos),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers: egui::Modifiers::NONE,
            },
        ]
    }

    fn tap(
        ctx: &egui::Context,
        viewer: &StoryViewer<ManualClock>,
        press: &mut PressTracker,
        pos: egui::Pos2,
    ) -> (Vec<ViewerIntent>, Vec<ViewerIntent>) {
        run_frame(ctx, viewer, press, Vec::new());
        let down = run_frame(ctx, viewer, press, pointer(pos, true));
        let up = run_frame(ctx, viewer, press, pointer(pos, false));
        (down, up)
    }

    #[test]
    fn thirds_split_the_surface() {
        assert_eq!(tap_zone(10.0, 300.0), TapZone::Previous);
        assert_eq!(tap_zone(150.0, 300.0), TapZone::Middle);
        assert_eq!(tap_zone(250.0, 300.0), TapZone::Next);
        assert_eq!(tap_zone(200.0, 300.0), TapZone::Next);
        assert_eq!(tap_zone(5.0, 0.0), TapZone::Middle);
    }

    #[test]
    fn press_tracker_repeats_start_and_releases_once() {
        let mut press = PressTracker::default();
        assert_eq!(press.update(false, false), None);
        assert_eq!(press.update(true, false), Some(ViewerIntent::PressStart));
        assert_eq!(press.update(true, true), Some(ViewerIntent::PressStart));
        assert_eq!(press.update(false, true), Some(ViewerIntent::PressStart));
        assert_eq!(press.update(false, false), Some(ViewerIntent::PressEnd));
        assert_eq!(press.update(false, false), None);

        press.update(true, false);
        press.reset();
        assert_eq!(press.update(false, false), None);
    }

    #[test]
    fn idle_frame_produces_no_intents() {
        let viewer = StoryViewer::new(stories(3), 1, ManualClock::new()).expect("viewer");
        let ctx = egui::Context::default();
        let mut press = PressTracker::default();
        assert!(run_frame(&ctx, &viewer, &mut press, Vec::new()).is_empty());
    }

    #[test]
    fn arrow_keys_and_escape_map_to_navigation() {
        let viewer = StoryViewer::new(stories(3), 1, ManualClock::new()).expect("viewer");
        let ctx = egui::Context::default();
        let mut press = PressTracker::default();

        let intents = run_frame(
            &ctx,
            &viewer,
            &mut press,
            vec![key(egui::Key::ArrowRight, true)],
        );
        assert_eq!(intents, vec![ViewerIntent::Next]);

        let intents = run_frame(
            &ctx,
            &viewer,
            &mut press,
            vec![key(egui::Key::ArrowLeft, true)],
        );
        assert_eq!(intents, vec![ViewerIntent::Previous]);

        let intents = run_frame(&ctx, &viewer, &mut press, vec![key(egui::Key::Escape, true)]);
        assert_eq!(intents, vec![ViewerIntent::Close]);
    }

    #[test]
    fn holding_space_pauses_until_released() {
        let viewer = StoryViewer::new(stories(2), 0, ManualClock::new()).expect("viewer");
        let ctx = egui::Context::default();
        let mut press = PressTracker::default();

        let intents = run_frame(&ctx, &viewer, &mut press, vec![key(egui::Key::Space, true)]);
        assert_eq!(intents, vec![ViewerIntent::PressStart]);

        let intents = run_frame(&ctx, &viewer, &mut press, vec![key(egui::Key::Space, false)]);
        assert_eq!(intents, vec![ViewerIntent::PressEnd]);
    }

    #[test]
    fn tap_in_right_third_goes_forward() {
        let viewer = StoryViewer::new(stories(3), 1, ManualClock::new()).expect("viewer");
        let ctx = egui::Context::default();
        let mut press = PressTracker::default();

        let (down, up) = tap(&ctx, &viewer, &mut press, egui::pos2(330.0, 600.0));
        assert_eq!(down, vec![ViewerIntent::PressStart]);
        assert_eq!(up, vec![ViewerIntent::PressEnd, ViewerIntent::Next]);
    }

    #[test]
    fn tap_in_left_third_goes_back() {
        let viewer = StoryViewer::new(stories(3), 1, ManualClock::new()).expect("viewer");
        let ctx = egui::Context::default();
        let mut press = PressTracker::default();

        let (down, up) = tap(&ctx, &viewer, &mut press, egui::pos2(70.0, 600.0));
        assert_eq!(down, vec![ViewerIntent::PressStart]);
        assert_eq!(up, vec![ViewerIntent::PressEnd, ViewerIntent::Previous]);
    }

    #[test]
    fn tap_in_middle_only_pauses_and_resumes() {
        let viewer = StoryViewer::new(stories(3), 1, ManualClock::new()).expect("viewer");
        let ctx = egui::Context::default();
        let mut press = PressTracker::default();

        let (down, up) = tap(&ctx, &viewer, &mut press, egui::pos2(200.0, 600.0));
        assert_eq!(down, vec![ViewerIntent::PressStart]);
        assert_eq!(up, vec![ViewerIntent::PressEnd]);
    }
}
