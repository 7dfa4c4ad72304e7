mod backend_bridge;
mod config;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::{Args, StartupConfig, MIN_WINDOW_SIZE};
use crate::controller::events::UiEvent;
use crate::ui::StoryFlowApp;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let startup = StartupConfig::resolve(&args)?;
    tracing::info!(feed = %startup.feed, "starting storyflow");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let window_size = startup.window_size;
    backend_bridge::runtime::launch(cmd_rx, ui_tx, startup);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("StoryFlow")
            .with_inner_size(window_size)
            .with_min_inner_size(MIN_WINDOW_SIZE),
        ..Default::default()
    };
    eframe::run_native(
        "StoryFlow",
        options,
        Box::new(move |cc| Ok(Box::new(StoryFlowApp::new(cc, cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run window: {err}"))
}
