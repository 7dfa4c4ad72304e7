//! Worker-to-UI events and error classification for the desktop shell.

use story_core::FeedError;
use story_model::Story;

use crate::ui::images::DecodedImage;

pub enum UiEvent {
    Info(String),
    FeedLoaded(Vec<Story>),
    FeedFailed {
        error: FeedError,
        ui_error: UiError,
    },
    ImageLoaded {
        key: String,
        image: DecodedImage,
    },
    ImageFailed {
        key: String,
        reason: String,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Decode,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FeedLoad,
    ImageLoad,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_feed_error(context: UiErrorContext, err: &FeedError) -> Self {
        let category = match err {
            FeedError::Transport { .. } | FeedError::Status { .. } | FeedError::Io { .. } => {
                UiErrorCategory::Transport
            }
            FeedError::Invalid { .. } => UiErrorCategory::Decode,
            FeedError::UnsupportedLocation(_) => UiErrorCategory::Validation,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("disconnected")
            || message_lower.contains("status")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("decode")
            || message_lower.contains("malformed")
            || message_lower.contains("format")
        {
            UiErrorCategory::Decode
        } else if message_lower.contains("invalid")
            || message_lower.contains("unsupported")
            || message_lower.contains("missing")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short line for the status bar.
    pub fn status_line(&self) -> String {
        let what = match self.context {
            UiErrorContext::BackendStartup => "Background worker failed to start",
            UiErrorContext::FeedLoad => "Could not load stories",
            UiErrorContext::ImageLoad => "Image unavailable",
        };
        format!("{what} ({}): {}", err_label(self.category), self.message)
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "network",
        UiErrorCategory::Decode => "bad data",
        UiErrorCategory::Validation => "configuration",
        UiErrorCategory::Unknown => "unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_feed_errors_by_variant() {
        let status = FeedError::Status {
            location: "http://127.0.0.1:3000/stories.json".to_string(),
            status: 404,
        };
        let err = UiError::from_feed_error(UiErrorContext::FeedLoad, &status);
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::FeedLoad);
        assert!(err.message().contains("404"));

        let invalid = FeedError::Invalid {
            location: "demos/stories.json".to_string(),
            source: story_model::parse_story_feed(b"{").expect_err("malformed"),
        };
        assert_eq!(
            UiError::from_feed_error(UiErrorContext::FeedLoad, &invalid).category(),
            UiErrorCategory::Decode
        );

        let unsupported = FeedError::UnsupportedLocation("ftp://x".to_string());
        assert_eq!(
            UiError::from_feed_error(UiErrorContext::FeedLoad, &unsupported).category(),
            UiErrorCategory::Validation
        );
    }

    #[test]
    fn classifies_command_queue_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "Background worker disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn classifies_image_decode_failures() {
        let err = UiError::from_message(
            UiErrorContext::ImageLoad,
            "failed to decode image: unsupported format",
        );
        assert_eq!(err.category(), UiErrorCategory::Decode);
        assert!(err.status_line().starts_with("Image unavailable (bad data)"));
    }

    #[test]
    fn status_lines_name_each_context() {
        let startup = UiError::from_message(
            UiErrorContext::BackendStartup,
            "failed to build http client: tls backend missing",
        );
        assert!(startup
            .status_line()
            .starts_with("Background worker failed to start"));
        assert_eq!(startup.message(), "failed to build http client: tls backend missing");

        let feed = UiError::from_message(UiErrorContext::FeedLoad, "connection refused");
        assert_eq!(
            feed.status_line(),
            "Could not load stories (network): connection refused"
        );
    }
}
