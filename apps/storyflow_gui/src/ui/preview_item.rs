//! One story preview card: cover-cropped thumbnail with the author badge.

use eframe::egui;
use story_model::{Story, User};

use crate::ui::images::{cover_uv, ImageSlot};
use crate::ui::layout::{corner_radius, paint_vertical_gradient, ui_in_rect};
use crate::ui::theme::PALETTE;

pub const PREVIEW_SIZE: egui::Vec2 = egui::vec2(96.0, 144.0);
const PREVIEW_ROUNDING: f32 = 8.0;
const BADGE_AVATAR: f32 = 24.0;

pub fn accessible_label(user: &User) -> String {
    format!("View {}'s story", user.name)
}

/// Draws a circular avatar, or the author's initial when the image is not
/// (yet) available.
pub fn paint_avatar(
    ui: &egui::Ui,
    rect: egui::Rect,
    avatar: Option<&ImageSlot>,
    user: &User,
    ring: egui::Color32,
) {
    let radius = rect.width().min(rect.height()) / 2.0;
    match avatar {
        Some(ImageSlot::Ready { texture, size }) => {
            egui::Image::new((texture.id(), rect.size()))
                .uv(cover_uv(*size, rect.size()))
                .corner_radius(corner_radius(radius))
                .paint_at(ui, rect);
        }
        _ => {
            ui.painter()
                .circle_filled(rect.center(), radius, PALETTE.avatar_fallback);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                user.initial(),
                egui::FontId::proportional(radius),
                PALETTE.overlay_text,
            );
        }
    }
    ui.painter()
        .circle_stroke(rect.center(), radius, egui::Stroke::new(2.0, ring));
}

pub fn preview_item(
    ui: &mut egui::Ui,
    story: &Story,
    thumbnail: Option<&ImageSlot>,
    avatar: Option<&ImageSlot>,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(PREVIEW_SIZE, egui::Sense::click());
    let enabled = ui.is_enabled();
    let label = accessible_label(&story.user);
    response.widget_info(|| {
        egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, label.clone())
    });

    if !ui.is_rect_visible(rect) {
        return response;
    }

    let highlighted = response.hovered() || response.has_focus();
    let emphasis = ui
        .ctx()
        .animate_bool_with_time(response.id, highlighted, 0.15);
    let scale = if response.is_pointer_button_down_on() {
        0.95
    } else {
        1.0 + 0.05 * emphasis
    };
    let card = egui::Rect::from_center_size(rect.center(), rect.size() * scale);
    let rounding = corner_radius(PREVIEW_ROUNDING);

    match thumbnail {
        Some(ImageSlot::Ready { texture, size }) => {
            let brightness = (255.0 - 25.0 * emphasis).round() as u8;
            egui::Image::new((texture.id(), card.size()))
                .uv(cover_uv(*size, card.size()))
                .corner_radius(rounding)
                .tint(egui::Color32::from_gray(brightness))
                .paint_at(ui, card);
        }
        _ => {
            ui.painter().rect_filled(card, rounding, PALETTE.preview_fill);
        }
    }

    let shade = egui::Rect::from_min_max(
        egui::pos2(card.left(), card.top() + card.height() * 0.4),
        card.max,
    )
    .shrink2(egui::vec2(0.0, PREVIEW_ROUNDING / 2.0));
    paint_vertical_gradient(
        ui.painter(),
        shade,
        egui::Color32::TRANSPARENT,
        PALETTE.shade,
    );

    let avatar_rect = egui::Rect::from_min_size(
        egui::pos2(card.left() + 8.0, card.bottom() - 8.0 - BADGE_AVATAR),
        egui::vec2(BADGE_AVATAR, BADGE_AVATAR),
    );
    let ring = if highlighted {
        PALETTE.ring_end
    } else {
        PALETTE.ring_start
    };
    paint_avatar(ui, avatar_rect, avatar, &story.user, ring);

    let name_rect = egui::Rect::from_min_max(
        egui::pos2(avatar_rect.right() + 6.0, avatar_rect.top()),
        egui::pos2(card.right() - 8.0, avatar_rect.bottom()),
    );
    ui_in_rect(ui, name_rect, |ui| {
        ui.add(
            egui::Label::new(
                egui::RichText::new(&story.user.name)
                    .color(PALETTE.preview_label)
                    .strong()
                    .size(11.0),
            )
            .truncate()
            .selectable(false),
        );
    });

    if response.has_focus() {
        ui.painter().rect_stroke(
            card,
            rounding,
            egui::Stroke::new(2.0, PALETTE.ring_end),
            egui::StrokeKind::Outside,
        );
    }

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_name_the_author() {
        let user = User {
            name: "Ana".to_string(),
            avatar_url: "https://example.test/a.png".to_string(),
        };
        assert_eq!(accessible_label(&user), "View Ana's story");
    }
}
