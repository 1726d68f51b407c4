//! Error types for the client library.

use reqwest::StatusCode;
use thiserror::Error;

use crate::storage::StorageError;
use crate::tokens::TokenScope;

/// Error surface of [`crate::connection::ConnectionInfo`].
///
/// The taxonomy is deliberate: transport failures and non-401 HTTP
/// statuses pass through unchanged, while a 401 that survived the
/// refresh-and-retry path collapses into [`ClientError::Unauthorized`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL and request path did not combine into a
    /// valid URL.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// Connection, timeout or body-decoding failure from the transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success, non-401 status.
    #[error("request failed with status {status}")]
    Http {
        status: StatusCode,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// A 401 with no viable refresh path. The scope's tokens have been
    /// cleared and an unauthorized event has been emitted.
    #[error("unauthorized ({scope} scope)")]
    Unauthorized { scope: TokenScope },

    /// The token storage medium failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Status code of the failure, when the backend produced one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Url(_) | Self::Transport(_) | Self::Storage(_) => None,
        }
    }
}
