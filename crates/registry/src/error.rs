//! Registry error types.

use thiserror::Error;

/// Registry and authorization errors.
///
/// The first four variants are the authorization failures raised by
/// [`Registry::authorize`](crate::Registry::authorize), ordered from the
/// least to the most specific.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The type was never declared a marker.
    #[error("unknown marker type: {0}")]
    UnknownMarkerType(String),

    /// The type was never declared markable.
    #[error("unknown markable type: {0}")]
    UnknownMarkableType(String),

    /// The mark is not declared on the markable type.
    #[error("unknown mark '{mark}' for markable type {markable_type}")]
    UnknownMark { markable_type: String, mark: String },

    /// The mark exists but the marker type is not in its allow-list.
    #[error("marker type {marker_type} is not allowed to mark {markable_type} as '{mark}'")]
    NotAllowedMarker {
        marker_type: String,
        markable_type: String,
        mark: String,
    },

    /// A declaration is malformed.
    #[error("invalid declaration: {0}")]
    Invalid(String),

    /// Failed to parse a declaration file.
    #[error("failed to parse declarations: {0}")]
    Parse(String),

    /// An I/O error occurred while reading declarations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is one of the authorization failures.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Error::UnknownMarkerType(_)
                | Error::UnknownMarkableType(_)
                | Error::UnknownMark { .. }
                | Error::NotAllowedMarker { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
