// SPDX-License-Identifier: MPL-2.0
//! The single owner of [`GalleryState`].
//!
//! Every user intent reaches the gallery through this controller, either as a
//! direct method call or as a [`GalleryCommand`] passed to
//! [`GalleryController::dispatch`]. Remote calls go through the ports given at
//! construction time.

use super::autoplay::AutoplayTimer;
use super::command::{Effect, GalleryCommand, Notice};
use crate::application::port::{MetadataReader, MetadataWriter, ObjectLister, TransportError};
use crate::config::Config;
use crate::domain::gallery::{
    Direction, GalleryError, GalleryItem, GalleryState, ItemMetadata, SaveOutcome,
};
use crate::domain::storage::{has_extension, join_url};
use crate::error::{Error, Result};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Gallery behaviour taken from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySettings {
    /// Listing prefix of the gallery folder (`roster/`).
    pub prefix: String,
    /// Base URL items are displayed and read from.
    pub public_url: String,
    pub image_extensions: Vec<String>,
    pub autoplay_delay: Duration,
}

impl From<&Config> for GallerySettings {
    fn from(config: &Config) -> Self {
        Self {
            prefix: config.gallery.prefix(),
            public_url: config.storage.public_url.clone(),
            image_extensions: config.gallery.image_extensions.clone(),
            autoplay_delay: config.gallery.autoplay_delay(),
        }
    }
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Drives the gallery: loading, navigation, autoplay, reordering and saving.
pub struct GalleryController {
    state: GalleryState,
    settings: GallerySettings,
    lister: Arc<dyn ObjectLister>,
    reader: Arc<dyn MetadataReader>,
    writer: Arc<dyn MetadataWriter>,
    autoplay: AutoplayTimer,
}

impl GalleryController {
    #[must_use]
    pub fn new(
        settings: GallerySettings,
        lister: Arc<dyn ObjectLister>,
        reader: Arc<dyn MetadataReader>,
        writer: Arc<dyn MetadataWriter>,
    ) -> Self {
        Self {
            state: GalleryState::new(),
            settings,
            lister,
            reader,
            writer,
            autoplay: AutoplayTimer::new(),
        }
    }

    /// Current state, for rendering.
    #[must_use]
    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Lists the gallery folder, reads every image's metadata and installs
    /// the items ordered by position.
    ///
    /// Metadata reads run concurrently; the sort happens only once all of
    /// them have finished, so the order never depends on completion order.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the listing fails. The state is then
    /// [`LoadState::Failed`](crate::domain::gallery::LoadState::Failed).
    pub async fn load_gallery(&mut self) -> Result<&GalleryState> {
        self.state.begin_loading();

        match self.fetch_items().await {
            Ok(items) => {
                info!(count = items.len(), prefix = %self.settings.prefix, "gallery ready");
                self.state.finish_loading(items);
                Ok(&self.state)
            }
            Err(err) => {
                error!(prefix = %self.settings.prefix, "failed to load gallery: {err}");
                self.state
                    .fail_loading(format!("Failed to fetch images: {err}"));
                Err(err.into())
            }
        }
    }

    /// Loads again from scratch.
    ///
    /// # Errors
    ///
    /// Same as [`load_gallery`](Self::load_gallery).
    pub async fn retry(&mut self) -> Result<&GalleryState> {
        self.load_gallery().await
    }

    async fn fetch_items(&self) -> std::result::Result<Vec<GalleryItem>, TransportError> {
        let objects = self.lister.list_objects(&self.settings.prefix).await?;
        let images: Vec<_> = objects
            .into_iter()
            .filter(|object| has_extension(&object.key, &self.settings.image_extensions))
            .collect();
        debug!(count = images.len(), "reading image metadata");

        let reader = &self.reader;
        let public_url = &self.settings.public_url;
        let items = join_all(images.into_iter().map(|object| async move {
            let url = join_url(public_url, &object.key);
            let metadata = match reader.read_metadata(&url).await {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!(%url, "failed to fetch metadata, using defaults: {err}");
                    ItemMetadata::default()
                }
            };
            GalleryItem::from_summary(object, public_url, metadata)
        }))
        .await;

        Ok(items)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn next(&mut self) {
        self.state.next();
    }

    pub fn previous(&mut self) {
        self.state.previous();
    }

    /// Jumps to `index`; the caller is responsible for the bound.
    pub fn go_to(&mut self, index: usize) {
        self.state.go_to(index);
    }

    // =========================================================================
    // Autoplay
    // =========================================================================

    /// Starts (or restarts) the slideshow. Needs a Tokio runtime.
    pub fn start_autoplay(&mut self) {
        self.autoplay.start(self.settings.autoplay_delay);
        self.state.set_auto_playing(true);
    }

    pub fn stop_autoplay(&mut self) {
        self.autoplay.stop();
        self.state.set_auto_playing(false);
    }

    pub fn toggle_autoplay(&mut self) {
        if self.state.is_auto_playing() {
            self.stop_autoplay();
        } else {
            self.start_autoplay();
        }
    }

    /// Advances once per tick already queued by the autoplay timer.
    ///
    /// Returns the number of steps taken.
    pub fn apply_pending_ticks(&mut self) -> usize {
        let mut steps = 0;
        while self.autoplay.try_tick() {
            self.state.next();
            steps += 1;
        }
        steps
    }

    /// Waits for the next autoplay tick and advances.
    ///
    /// Returns `false` immediately when autoplay is stopped.
    pub async fn next_tick(&mut self) -> bool {
        if self.autoplay.tick().await {
            self.state.next();
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Reordering
    // =========================================================================

    /// Drag-and-drop move. See [`GalleryState::reorder`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range indices.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool> {
        Ok(self.state.reorder(from, to)?)
    }

    /// Pairwise exchange. See [`GalleryState::swap`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range indices.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<bool> {
        Ok(self.state.swap(a, b)?)
    }

    /// Keyboard move of the current item.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the current index is out of range.
    pub fn move_current(&mut self, direction: Direction) -> Result<bool> {
        Ok(self.state.move_current(direction)?)
    }

    // =========================================================================
    // Remote sync
    // =========================================================================

    /// Writes caption and position of every item, all updates concurrently.
    ///
    /// Failed updates are counted, logged and reported; they are never
    /// retried. Unsaved changes are cleared only when every update succeeded.
    ///
    /// # Errors
    ///
    /// Returns a validation error when there is nothing to save or a save is
    /// already running. A partial failure is *not* an error here; use
    /// [`SaveOutcome::into_result`] to treat it as one.
    pub async fn save_order(&mut self) -> Result<SaveOutcome> {
        let updates = self.state.begin_save()?;
        let attempted = updates.len();

        let writer = &self.writer;
        let results = join_all(updates.iter().map(|(key, metadata)| async move {
            let result = match metadata.validate() {
                Ok(()) => writer
                    .write_metadata(key, metadata)
                    .await
                    .map_err(Error::from),
                Err(err) => Err(Error::from(err)),
            };
            (key, result)
        }))
        .await;

        let failed: Vec<String> = results
            .into_iter()
            .filter_map(|(key, result)| match result {
                Ok(()) => None,
                Err(err) => {
                    warn!(%key, "metadata update failed: {err}");
                    Some(key.clone())
                }
            })
            .collect();

        let outcome = SaveOutcome { attempted, failed };
        self.state.finish_save(&outcome);
        info!(
            saved = outcome.saved(),
            attempted = outcome.attempted,
            "{}",
            outcome.summary()
        );
        Ok(outcome)
    }

    /// Writes a new caption for one item and applies it locally on success.
    ///
    /// The item's current local position is sent along with the caption.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown keys or unstorable captions
    /// (before any remote call) and a transport error if the write fails.
    pub async fn update_caption(&mut self, key: &str, caption: &str) -> Result<()> {
        let position = self
            .state
            .index_of(key)
            .map(|index| self.state.items()[index].position)
            .ok_or_else(|| GalleryError::UnknownItem(key.to_string()))?;

        let metadata = ItemMetadata::new(caption, position);
        metadata.validate()?;
        self.writer.write_metadata(key, &metadata).await?;
        self.state.set_caption(key, metadata.caption)?;
        info!(%key, "caption updated");
        Ok(())
    }

    // =========================================================================
    // Command dispatch
    // =========================================================================

    /// Applies one command. Failures are turned into error notices, so the
    /// caller only has to present the returned [`Effect`].
    pub async fn dispatch(&mut self, command: GalleryCommand) -> Effect {
        debug!(?command, "gallery command");
        match command {
            GalleryCommand::Next => {
                self.next();
                Effect::Render
            }
            GalleryCommand::Previous => {
                self.previous();
                Effect::Render
            }
            GalleryCommand::GoTo(index) => {
                self.go_to(index);
                Effect::Render
            }
            GalleryCommand::StartAutoplay => {
                self.start_autoplay();
                Effect::Render
            }
            GalleryCommand::StopAutoplay => {
                self.stop_autoplay();
                Effect::Render
            }
            GalleryCommand::ToggleAutoplay => {
                self.toggle_autoplay();
                Effect::Render
            }
            GalleryCommand::Reorder { from, to } => changed_effect(self.reorder(from, to)),
            GalleryCommand::Swap { a, b } => changed_effect(self.swap(a, b)),
            GalleryCommand::MoveCurrent(direction) => changed_effect(self.move_current(direction)),
            GalleryCommand::Save => match self.save_order().await {
                Ok(outcome) => match outcome.into_result() {
                    Ok(outcome) => Effect::Notify(Notice::success(outcome.summary())),
                    Err(err) => Effect::Notify(Notice::from(&err)),
                },
                Err(err) => Effect::Notify(Notice::from(&err)),
            },
            GalleryCommand::EditCaption { key, caption } => {
                match self.update_caption(&key, &caption).await {
                    Ok(()) => Effect::Notify(Notice::success(format!(
                        "Successfully updated metadata for {key}"
                    ))),
                    Err(err) => Effect::Notify(Notice::from(&err)),
                }
            }
            GalleryCommand::Retry => match self.retry().await {
                Ok(_) => Effect::Render,
                Err(err) => Effect::Notify(Notice::from(&err)),
            },
        }
    }
}

fn changed_effect(result: Result<bool>) -> Effect {
    match result {
        Ok(true) => Effect::Render,
        Ok(false) => Effect::None,
        Err(err) => Effect::Notify(Notice::from(&err)),
    }
}

impl std::fmt::Debug for GalleryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryController")
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("autoplay", &self.autoplay)
            .finish_non_exhaustive()
    }
}
