// SPDX-License-Identifier: MPL-2.0
//! Failure of a remote call, shared by every port.

use thiserror::Error;

/// Why a list, read, write or admin call did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never got an answer (DNS, TLS, connection reset...).
    #[error("network error: {0}")]
    Network(String),

    /// The answer arrived but could not be understood.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Returns the HTTP status, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            TransportError::Network(_) | TransportError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_only_for_http_failures() {
        let http = TransportError::Http {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(http.status(), Some(404));
        assert_eq!(http.to_string(), "HTTP 404: Not Found");
        assert_eq!(TransportError::Network("reset".into()).status(), None);
    }
}
