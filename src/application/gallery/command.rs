// SPDX-License-Identifier: MPL-2.0
//! Commands the presentation layer sends to the gallery, and what it should
//! do in response.

use crate::domain::gallery::Direction;
use crate::error::{Error, ErrorKind};

/// A user intent, already decoded from whatever input produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryCommand {
    Next,
    Previous,
    GoTo(usize),
    StartAutoplay,
    StopAutoplay,
    ToggleAutoplay,
    /// Drag and drop: move the item at `from` to `to`.
    Reorder { from: usize, to: usize },
    /// Exchange two items.
    Swap { a: usize, b: usize },
    /// Keyboard move of the current item.
    MoveCurrent(Direction),
    Save,
    EditCaption { key: String, caption: String },
    /// Reload after a failed (or stale) load.
    Retry,
}

/// Severity of a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A message the presentation layer shows to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        match err.kind() {
            ErrorKind::PartialFailure => Notice::info(err.to_string()),
            _ => Notice::error(err.to_string()),
        }
    }
}

/// What the presentation layer should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed.
    None,
    /// State changed; re-render from the controller's state.
    Render,
    /// State may have changed and a message should be shown.
    Notify(Notice),
}
