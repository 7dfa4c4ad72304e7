//! Background worker: owns the tokio runtime and the HTTP client, serves
//! commands from the UI and reports back through [`UiEvent`]s.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use reqwest::Client;
use story_core::{fetch_resource, source_for, ResourceLocation};
use tokio::sync::Semaphore;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::StartupConfig;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::images::decode_story_image;

struct Worker {
    client: Client,
    feed: ResourceLocation,
    image_permits: Semaphore,
    ui_tx: Sender<UiEvent>,
}

impl Worker {
    fn emit(&self, event: UiEvent) {
        if self.ui_tx.send(event).is_err() {
            tracing::debug!("ui event receiver dropped");
        }
    }

    async fn load_feed(&self) {
        let source = source_for(self.feed.clone(), self.client.clone());
        tracing::info!(location = %source.location(), "loading story feed");
        match source.fetch_stories().await {
            Ok(stories) => self.emit(UiEvent::FeedLoaded(stories)),
            Err(error) => {
                let ui_error = UiError::from_feed_error(UiErrorContext::FeedLoad, &error);
                self.emit(UiEvent::FeedFailed { error, ui_error });
            }
        }
    }

    async fn fetch_image(&self, key: String) {
        let Ok(_permit) = self.image_permits.acquire().await else {
            return;
        };
        let location = match self.feed.resolve(&key) {
            Ok(location) => location,
            Err(err) => {
                tracing::warn!(%key, "cannot resolve image reference: {err}");
                self.emit(UiEvent::ImageFailed {
                    key,
                    reason: err.to_string(),
                });
                return;
            }
        };

        let bytes = match fetch_resource(&self.client, &location).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%key, "image fetch failed: {err}");
                self.emit(UiEvent::ImageFailed {
                    key,
                    reason: err.to_string(),
                });
                return;
            }
        };

        match tokio::task::spawn_blocking(move || decode_story_image(&bytes)).await {
            Ok(Ok(image)) => {
                tracing::debug!(%key, width = image.width, height = image.height, "image decoded");
                self.emit(UiEvent::ImageLoaded { key, image });
            }
            Ok(Err(reason)) => {
                tracing::warn!(%key, "image decode failed: {reason}");
                self.emit(UiEvent::ImageFailed { key, reason });
            }
            Err(join_err) => {
                tracing::error!(%key, "image decode task failed: {join_err}");
                self.emit(UiEvent::ImageFailed {
                    key,
                    reason: join_err.to_string(),
                });
            }
        }
    }
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, config: StartupConfig) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Background worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match Client::builder().timeout(config.request_timeout).build() {
            Ok(client) => client,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build http client: {err}"),
                )));
                tracing::error!("failed to build http client: {err}");
                return;
            }
        };

        let worker = Arc::new(Worker {
            client,
            feed: config.feed,
            image_permits: Semaphore::new(config.image_concurrency),
            ui_tx,
        });

        runtime.block_on(async move {
            worker.emit(UiEvent::Info("Background worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                let worker = Arc::clone(&worker);
                match cmd {
                    BackendCommand::LoadFeed => {
                        tokio::spawn(async move { worker.load_feed().await });
                    }
                    BackendCommand::FetchImage { key } => {
                        tokio::spawn(async move { worker.fetch_image(key).await });
                    }
                    BackendCommand::FetchImages { keys } => {
                        tokio::spawn(async move {
                            let fetches = keys.into_iter().map(|key| worker.fetch_image(key));
                            futures::future::join_all(fetches).await;
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; background worker stopping");
        });
    });
}
