// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.
//!
//! Each layer keeps its own error enum ([`TreeError`], [`GalleryError`],
//! [`TransportError`]); they all fold into [`Error`] so callers can use `?`
//! across layer boundaries and still ask for the [`ErrorKind`] when deciding
//! how to present a failure.

use crate::application::port::TransportError;
use crate::domain::gallery::GalleryError;
use crate::domain::tree::TreeError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A list, fetch or update call failed on the wire.
    #[error("Transport Error: {0}")]
    Transport(#[from] TransportError),

    /// Input was rejected before any remote call was issued.
    #[error("Validation Error: {0}")]
    Validation(String),

    /// Some, but not all, per-item metadata updates of a save failed.
    #[error("Saved {saved} of {attempted}")]
    PartialFailure { saved: usize, attempted: usize },

    #[error("Gallery Error: {0}")]
    Gallery(#[from] GalleryError),

    #[error("Tree Error: {0}")]
    Tree(#[from] TreeError),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("I/O Error: {0}")]
    Io(String),
}

/// Coarse classification used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Validation,
    PartialFailure,
    Config,
    Io,
}

impl Error {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) => ErrorKind::Transport,
            Error::Validation(_) | Error::Gallery(_) | Error::Tree(_) => ErrorKind::Validation,
            Error::PartialFailure { .. } => ErrorKind::PartialFailure,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for building a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn partial_failure_reads_as_save_summary() {
        let err = Error::PartialFailure {
            saved: 1,
            attempted: 3,
        };
        assert_eq!(err.to_string(), "Saved 1 of 3");
        assert_eq!(err.kind(), ErrorKind::PartialFailure);
    }

    #[test]
    fn domain_errors_classify_as_validation() {
        let err: Error = GalleryError::NothingToSave.into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: Error = TreeError::Collision {
            path: "a/b".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn transport_error_keeps_http_status() {
        let err: Error = TransportError::Http {
            status: 503,
            message: "Service Unavailable".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("503"));
    }
}
