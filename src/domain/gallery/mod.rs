// SPDX-License-Identifier: MPL-2.0
//! Ordered image gallery: items, metadata records and the state machine that
//! keeps their order.

mod item;
mod state;

pub use item::{
    GalleryItem, ItemMetadata, Position, CAPTION_KEY, MAX_CAPTION_BYTES, POSITION_KEY,
};
pub use state::{Direction, GalleryState, LoadState, SaveOutcome};

use thiserror::Error;

/// Errors raised by gallery transitions. None of them touch remote state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// An index outside `0..len` was passed to a reorder operation.
    #[error("index {index} is out of bounds for {len} items")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Save was requested without local changes.
    #[error("there are no unsaved changes")]
    NothingToSave,

    /// Save was requested while another save is running.
    #[error("a save is already in progress")]
    SaveInProgress,

    /// No item carries the given key.
    #[error("no gallery item with key '{0}'")]
    UnknownItem(String),

    /// The caption cannot be stored as object metadata.
    #[error("invalid caption: {0}")]
    InvalidCaption(String),
}
