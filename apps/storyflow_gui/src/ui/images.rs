//! Story image decoding, the texture cache keyed by feed reference, and the
//! geometry used to fit images into their frames.

use std::collections::HashMap;

use eframe::egui;
use egui::TextureHandle;

const MAX_IMAGE_DIMENSION: u32 = 1024;

/// RGBA pixels ready for upload, produced off the UI thread.
pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub fn decode_story_image(bytes: &[u8]) -> Result<DecodedImage, String> {
    let dynamic =
        image::load_from_memory(bytes).map_err(|err| format!("failed to decode image: {err}"))?;
    let resized = dynamic
        .thumbnail(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(DecodedImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

pub enum ImageSlot {
    Requested,
    Ready {
        texture: TextureHandle,
        size: egui::Vec2,
    },
    Failed,
}

impl ImageSlot {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ImageSlot::Requested)
    }
}

#[derive(Default)]
pub struct ImageCache {
    slots: HashMap<String, ImageSlot>,
}

impl ImageCache {
    pub fn get(&self, key: &str) -> Option<&ImageSlot> {
        self.slots.get(key)
    }

    /// Marks `key` as in flight. Returns `false` when it was already requested
    /// or settled, so callers only queue a fetch once.
    pub fn request(&mut self, key: &str) -> bool {
        if self.slots.contains_key(key) {
            return false;
        }
        self.slots.insert(key.to_string(), ImageSlot::Requested);
        true
    }

    pub fn insert_decoded(&mut self, ctx: &egui::Context, key: String, image: DecodedImage) {
        let color_image =
            egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
        let texture = ctx.load_texture(
            format!("story-image:{key}"),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        let size = egui::vec2(image.width as f32, image.height as f32);
        self.slots.insert(key, ImageSlot::Ready { texture, size });
    }

    pub fn mark_failed(&mut self, key: String) {
        self.slots.insert(key, ImageSlot::Failed);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Texture coordinates that crop an image of `image` size to fill a frame of
/// `frame` size, centered.
pub fn cover_uv(image: egui::Vec2, frame: egui::Vec2) -> egui::Rect {
    let full = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    if image.x <= 0.0 || image.y <= 0.0 || frame.x <= 0.0 || frame.y <= 0.0 {
        return full;
    }
    let image_aspect = image.x / image.y;
    let frame_aspect = frame.x / frame.y;
    if image_aspect > frame_aspect {
        let visible = frame_aspect / image_aspect;
        let inset = (1.0 - visible) / 2.0;
        egui::Rect::from_min_max(egui::pos2(inset, 0.0), egui::pos2(1.0 - inset, 1.0))
    } else {
        let visible = image_aspect / frame_aspect;
        let inset = (1.0 - visible) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, inset), egui::pos2(1.0, 1.0 - inset))
    }
}

/// Largest rect with the image's aspect ratio that fits inside `frame`, centered.
pub fn contain_rect(image: egui::Vec2, frame: egui::Rect) -> egui::Rect {
    if image.x <= 0.0 || image.y <= 0.0 {
        return frame;
    }
    let scale = (frame.width() / image.x).min(frame.height() / image.y);
    egui::Rect::from_center_size(frame.center(), image * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 90, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_and_downscales_large_images() {
        let decoded = decode_story_image(&png_bytes(2048, 1024)).expect("decode");
        assert_eq!((decoded.width, decoded.height), (1024, 512));
        assert_eq!(decoded.rgba.len(), 1024 * 512 * 4);

        let small = decode_story_image(&png_bytes(40, 30)).expect("decode");
        assert_eq!((small.width, small.height), (40, 30));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = decode_story_image(b"<html>not found</html>").err().expect("error");
        assert!(err.starts_with("failed to decode image"));
    }

    #[test]
    fn cache_requests_each_key_once() {
        let mut cache = ImageCache::default();
        assert!(cache.request("a.jpg"));
        assert!(!cache.request("a.jpg"));
        assert!(!cache.get("a.jpg").expect("slot").is_settled());

        cache.mark_failed("a.jpg".to_string());
        assert!(cache.get("a.jpg").expect("slot").is_settled());
        assert!(!cache.request("a.jpg"));

        cache.clear();
        assert!(cache.get("a.jpg").is_none());
    }

    #[test]
    fn cover_crops_the_long_axis() {
        let wide = cover_uv(egui::vec2(200.0, 100.0), egui::vec2(100.0, 100.0));
        assert!((wide.min.x - 0.25).abs() < 1e-5);
        assert!((wide.max.x - 0.75).abs() < 1e-5);
        assert_eq!((wide.min.y, wide.max.y), (0.0, 1.0));

        let tall = cover_uv(egui::vec2(100.0, 400.0), egui::vec2(100.0, 100.0));
        assert!((tall.min.y - 0.375).abs() < 1e-5);
        assert_eq!((tall.min.x, tall.max.x), (0.0, 1.0));

        let degenerate = cover_uv(egui::vec2(0.0, 10.0), egui::vec2(10.0, 10.0));
        assert_eq!(degenerate.max, egui::pos2(1.0, 1.0));
    }

    #[test]
    fn contain_letterboxes_inside_the_frame() {
        let frame = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 800.0));
        let fitted = contain_rect(egui::vec2(1000.0, 500.0), frame);
        assert_eq!(fitted.size(), egui::vec2(400.0, 200.0));
        assert_eq!(fitted.center(), frame.center());

        let portrait = contain_rect(egui::vec2(100.0, 400.0), frame);
        assert_eq!(portrait.size(), egui::vec2(200.0, 800.0));
    }
}
