//! UI layer: app shell, story carousel, viewer overlay, images, theme and
//! layout primitives.

pub mod app;
pub mod carousel;
pub mod images;
pub mod layout;
pub mod preview_item;
pub mod theme;
pub mod viewer_view;

pub use app::StoryFlowApp;
