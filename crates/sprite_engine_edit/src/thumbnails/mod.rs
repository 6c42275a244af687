//! Background thumbnail rendering on a dedicated Tokio runtime.

use std::sync::Arc;

use image::RgbaImage;
use log::{debug, error, warn};
use sprite_engine::{Rectangle, placeholder_thumbnail, render_thumbnail};
use tokio::sync::mpsc;

/// One thumbnail to render during a rebuild pass.
#[derive(Clone, Debug)]
pub struct ThumbnailJob {
    pub key: String,
    pub bounds: Rectangle,
}

/// Completed work sent back from the loader.
#[derive(Debug)]
pub enum ThumbnailUpdate {
    /// A finished render for one sprite key.
    Rendered { key: String, image: RgbaImage },
    /// A rebuild pass delivered every job it was given.
    RebuildFinished,
}

/// Thumbnail loader that uses Tokio for async task management.
///
/// There is no cancellation: completions whose sprite no longer exists are
/// dropped on the receiving side when the result is applied.
pub struct ThumbnailLoader {
    /// Sender for results
    result_tx: mpsc::UnboundedSender<ThumbnailUpdate>,
    /// Tokio runtime handle
    runtime: Arc<tokio::runtime::Runtime>,
}

impl ThumbnailLoader {
    /// Spawn a new thumbnail loader.
    /// Returns the loader and the result receiver.
    pub fn spawn() -> (Self, mpsc::UnboundedReceiver<ThumbnailUpdate>) {
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("thumbnail-loader")
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime for thumbnail loader");

        (
            Self {
                result_tx,
                runtime: Arc::new(runtime),
            },
            result_rx,
        )
    }

    /// Queue one render. A `source` of `None` yields the placeholder.
    pub fn request(&self, key: String, source: Option<Arc<RgbaImage>>, bounds: Rectangle) {
        let result_tx = self.result_tx.clone();
        debug!("[ThumbnailLoader] Spawning render for key {key}");
        self.runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || render_job(source.as_deref(), bounds)).await;
            // Every dispatched render must report back, the receiver counts
            // them. A panicked render degrades to the placeholder.
            let image = match result {
                Ok(image) => image,
                Err(err) => {
                    error!("[ThumbnailLoader] Render panicked for key {key}: {err:?}");
                    placeholder_thumbnail()
                }
            };
            if let Err(err) = result_tx.send(ThumbnailUpdate::Rendered { key, image }) {
                warn!("[ThumbnailLoader] Failed to send result: {err}");
            }
        });
    }

    /// Render every job in order, then signal completion. Used after
    /// undo/redo and project loads, where the whole list is rebuilt.
    pub fn request_rebuild(&self, jobs: Vec<ThumbnailJob>, source: Option<Arc<RgbaImage>>) {
        let result_tx = self.result_tx.clone();
        debug!("[ThumbnailLoader] Rebuilding {} thumbnails", jobs.len());
        self.runtime.spawn(async move {
            for job in jobs {
                let job_source = source.clone();
                let bounds = job.bounds;
                let result = tokio::task::spawn_blocking(move || render_job(job_source.as_deref(), bounds)).await;
                let image = match result {
                    Ok(image) => image,
                    Err(err) => {
                        error!("[ThumbnailLoader] Render panicked for key {}: {err:?}", job.key);
                        placeholder_thumbnail()
                    }
                };
                if result_tx.send(ThumbnailUpdate::Rendered { key: job.key, image }).is_err() {
                    // Receiver is gone, no point rendering the rest.
                    return;
                }
            }
            if result_tx.send(ThumbnailUpdate::RebuildFinished).is_err() {
                warn!("[ThumbnailLoader] Failed to send rebuild completion");
            }
        });
    }
}

fn render_job(source: Option<&RgbaImage>, bounds: Rectangle) -> RgbaImage {
    match source {
        Some(image) => render_thumbnail(image, bounds),
        None => placeholder_thumbnail(),
    }
}
