use storage::EntityRef;
use thiserror::Error;

/// Marking engine errors.
///
/// Authorization failures arrive unchanged inside [`Error::Registry`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A view received an entity of a different markable type.
    #[error("wrong markable type: expected {expected}, got {found}")]
    WrongMarkableType { expected: String, found: EntityRef },

    /// A view received an entity of a different marker type.
    #[error("wrong marker type: expected {expected}, got {found}")]
    WrongMarkerType { expected: String, found: EntityRef },

    #[error(transparent)]
    Registry(#[from] registry::Error),

    #[error(transparent)]
    Storage(#[from] storage::Error),
}

impl Error {
    /// The authorization failure behind this error, if any.
    pub fn as_authorization(&self) -> Option<&registry::Error> {
        match self {
            Error::Registry(e) if e.is_authorization() => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
