use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Playback length used when a story does not carry its own duration.
pub const DEFAULT_STORY_DURATION: Duration = Duration::from_millis(5_000);

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(StoryId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub avatar_url: String,
}

impl User {
    /// Upper-cased first character of the name, drawn when the avatar is unavailable.
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub user: User,
    pub image_url: String,
    /// Milliseconds. `None` and `Some(0)` both fall back to [`DEFAULT_STORY_DURATION`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl Story {
    pub fn duration(&self) -> Duration {
        match self.duration {
            Some(ms) if ms > 0 => Duration::from_millis(ms),
            _ => DEFAULT_STORY_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(duration: Option<u64>) -> Story {
        Story {
            id: StoryId::new("s1"),
            user: User {
                name: "ana".to_string(),
                avatar_url: "https://example.test/a.png".to_string(),
            },
            image_url: "https://example.test/s1.jpg".to_string(),
            duration,
        }
    }

    #[test]
    fn missing_or_zero_duration_uses_default() {
        assert_eq!(story(None).duration(), DEFAULT_STORY_DURATION);
        assert_eq!(story(Some(0)).duration(), DEFAULT_STORY_DURATION);
        assert_eq!(story(Some(3_000)).duration(), Duration::from_millis(3_000));
    }

    #[test]
    fn decodes_camel_case_wire_shape() {
        let raw = r#"{
            "id": "42",
            "user": { "name": "Bo", "avatarUrl": "https://example.test/bo.png" },
            "imageUrl": "https://example.test/42.jpg",
            "duration": 7000,
            "caption": "ignored"
        }"#;
        let story: Story = serde_json::from_str(raw).expect("story");
        assert_eq!(story.id.as_str(), "42");
        assert_eq!(story.user.avatar_url, "https://example.test/bo.png");
        assert_eq!(story.image_url, "https://example.test/42.jpg");
        assert_eq!(story.duration(), Duration::from_millis(7_000));
    }

    #[test]
    fn serializes_without_absent_duration() {
        let json = serde_json::to_value(story(None)).expect("json");
        assert!(json.get("duration").is_none());
        assert_eq!(json["user"]["avatarUrl"], "https://example.test/a.png");
    }

    #[test]
    fn initial_is_uppercased_first_char() {
        let user = User {
            name: "élodie".to_string(),
            avatar_url: String::new(),
        };
        assert_eq!(user.initial(), "É");
        let nameless = User {
            name: String::new(),
            avatar_url: String::new(),
        };
        assert_eq!(nameless.initial(), "");
    }
}
