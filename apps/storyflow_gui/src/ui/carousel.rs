//! Horizontal strip of story previews.

use eframe::egui;
use story_model::Story;

use crate::ui::images::ImageCache;
use crate::ui::preview_item::{preview_item, PREVIEW_SIZE};

const ITEM_SPACING: f32 = 16.0;

/// Draws one preview per story and returns the index activated this frame.
pub fn show_carousel(ui: &mut egui::Ui, stories: &[Story], images: &ImageCache) -> Option<usize> {
    let mut activated = None;
    egui::ScrollArea::horizontal()
        .id_salt("story_carousel")
        .auto_shrink([false, true])
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = ITEM_SPACING;
                ui.set_min_height(PREVIEW_SIZE.y * 1.05 + 8.0);
                ui.add_space(4.0);
                for (index, story) in stories.iter().enumerate() {
                    let response = preview_item(
                        ui,
                        story,
                        images.get(&story.image_url),
                        images.get(&story.user.avatar_url),
                    );
                    if response.clicked() {
                        activated = Some(index);
                    }
                }
                ui.add_space(1.0);
            });
        });
    activated
}
