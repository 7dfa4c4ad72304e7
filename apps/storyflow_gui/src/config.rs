//! Startup configuration: defaults, then `storyflow.toml`, then environment,
//! then command line.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use story_core::ResourceLocation;

pub const DEFAULT_FEED: &str = "http://127.0.0.1:3000/stories.json";
pub const MIN_WINDOW_SIZE: [f32; 2] = [320.0, 480.0];
const CONFIG_FILE_NAME: &str = "storyflow.toml";

#[derive(Parser, Debug, Default)]
#[command(name = "storyflow", about = "Desktop viewer for short image stories")]
pub struct Args {
    /// Story feed: an http(s) URL or a path to a local JSON file.
    #[arg(long)]
    pub feed: Option<String>,
    /// TOML settings file (defaults to ./storyflow.toml when present).
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub width: Option<f32>,
    #[arg(long)]
    pub height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub feed: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub image_concurrency: Option<usize>,
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub feed: ResourceLocation,
    pub request_timeout: Duration,
    pub image_concurrency: usize,
    pub window_size: [f32; 2],
}

#[derive(Debug)]
struct Settings {
    feed: String,
    request_timeout_secs: u64,
    image_concurrency: usize,
    window_width: f32,
    window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FEED.into(),
            request_timeout_secs: 10,
            image_concurrency: 4,
            window_width: 420.0,
            window_height: 760.0,
        }
    }
}

impl StartupConfig {
    pub fn resolve(args: &Args) -> anyhow::Result<Self> {
        let file = read_config_file(args.config.as_deref())?;
        Self::layered(args, file, |name| std::env::var(name).ok())
    }

    fn layered(
        args: &Args,
        file: Option<FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut settings = Settings::default();

        if let Some(file) = file {
            if let Some(v) = file.feed {
                settings.feed = v;
            }
            if let Some(v) = file.request_timeout_secs {
                settings.request_timeout_secs = v;
            }
            if let Some(v) = file.image_concurrency {
                settings.image_concurrency = v;
            }
            if let Some(v) = file.window_width {
                settings.window_width = v;
            }
            if let Some(v) = file.window_height {
                settings.window_height = v;
            }
        }

        if let Some(v) = env("STORYFLOW_FEED") {
            settings.feed = v;
        }
        if let Some(v) = env("APP__FEED") {
            settings.feed = v;
        }
        if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) => settings.request_timeout_secs = parsed,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = env("APP__IMAGE_CONCURRENCY") {
            match v.parse::<usize>() {
                Ok(parsed) => settings.image_concurrency = parsed,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__IMAGE_CONCURRENCY"),
            }
        }

        if let Some(v) = &args.feed {
            settings.feed = v.clone();
        }
        if let Some(v) = args.width {
            settings.window_width = v;
        }
        if let Some(v) = args.height {
            settings.window_height = v;
        }

        let feed = ResourceLocation::parse(&settings.feed)
            .with_context(|| format!("invalid story feed location '{}'", settings.feed))?;

        Ok(Self {
            feed,
            request_timeout: Duration::from_secs(settings.request_timeout_secs.max(1)),
            image_concurrency: settings.image_concurrency.max(1),
            window_size: [
                settings.window_width.max(MIN_WINDOW_SIZE[0]),
                settings.window_height.max(MIN_WINDOW_SIZE[1]),
            ],
        })
    }
}

fn read_config_file(explicit: Option<&Path>) -> anyhow::Result<Option<FileConfig>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILE_NAME);
            if !default.exists() {
                return Ok(None);
            }
            default
        }
    };
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    let parsed = parse_file_config(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
    Ok(Some(parsed))
}

fn parse_file_config(raw: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(raw)
}
