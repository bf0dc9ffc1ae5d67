//! Authorization checks against the registry.

use crate::{Error, Registry, Result};

/// A request to apply a mark, by type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkRequest<'a> {
    pub marker_type: &'a str,
    pub markable_type: &'a str,
    pub mark: &'a str,
}

impl<'a> MarkRequest<'a> {
    pub fn new(marker_type: &'a str, markable_type: &'a str, mark: &'a str) -> Self {
        Self {
            marker_type,
            markable_type,
            mark,
        }
    }
}

impl Registry {
    /// Check a mark request, failing with the most specific reason.
    ///
    /// Checks run in order: marker type, markable type, mark, allow-list.
    pub fn authorize(&self, request: &MarkRequest<'_>) -> Result<()> {
        let marker = self
            .marker(request.marker_type)
            .ok_or_else(|| Error::UnknownMarkerType(request.marker_type.to_string()))?;

        let allowed = self.mark(request.markable_type, request.mark)?;

        if allowed.permits(&marker.name) {
            Ok(())
        } else {
            Err(Error::NotAllowedMarker {
                marker_type: marker.name.clone(),
                markable_type: request.markable_type.to_string(),
                mark: request.mark.to_string(),
            })
        }
    }

    /// Boolean form of [`Registry::authorize`].
    pub fn can_mark(&self, request: &MarkRequest<'_>) -> bool {
        self.authorize(request).is_ok()
    }
}
