//! Colors and visuals shared by the page and the viewer.

use eframe::egui;

#[derive(Debug, Clone, Copy)]
pub struct StoryPalette {
    pub page_background: egui::Color32,
    pub heading_text: egui::Color32,
    pub muted_text: egui::Color32,
    pub ring_start: egui::Color32,
    pub ring_end: egui::Color32,
    pub preview_fill: egui::Color32,
    pub preview_label: egui::Color32,
    pub viewer_background: egui::Color32,
    pub progress_track: egui::Color32,
    pub progress_fill: egui::Color32,
    pub overlay_text: egui::Color32,
    pub avatar_fallback: egui::Color32,
    pub shade: egui::Color32,
}

pub const PALETTE: StoryPalette = StoryPalette {
    page_background: egui::Color32::from_rgb(18, 18, 20),
    heading_text: egui::Color32::from_rgb(240, 240, 242),
    muted_text: egui::Color32::from_rgb(150, 150, 158),
    ring_start: egui::Color32::from_rgb(249, 206, 52),
    ring_end: egui::Color32::from_rgb(238, 42, 123),
    preview_fill: egui::Color32::from_rgb(44, 44, 50),
    preview_label: egui::Color32::WHITE,
    viewer_background: egui::Color32::BLACK,
    progress_track: egui::Color32::from_rgba_premultiplied(90, 90, 90, 110),
    progress_fill: egui::Color32::WHITE,
    overlay_text: egui::Color32::WHITE,
    avatar_fallback: egui::Color32::from_rgb(96, 104, 130),
    shade: egui::Color32::from_rgba_premultiplied(0, 0, 0, 150),
};

pub fn story_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = PALETTE.page_background;
    visuals.window_fill = PALETTE.page_background;
    visuals.extreme_bg_color = egui::Color32::from_rgb(10, 10, 12);
    visuals.selection.bg_fill = PALETTE.ring_end;
    visuals.hyperlink_color = PALETTE.ring_end;
    visuals.widgets.hovered.bg_fill = PALETTE.ring_end.gamma_multiply(0.85);
    visuals.widgets.active.bg_fill = PALETTE.ring_end;
    visuals
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals = story_visuals();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    ctx.set_style(style);
}
