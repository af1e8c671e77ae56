#![forbid(unsafe_code)]

use fdoc_style::StyleId;
use thiserror::Error;

/// Boxed error returned by [`NodeSink`](crate::sink::NodeSink) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = CodecError> = std::result::Result<T, E>;

/// Failure of a whole decode or encode call.
///
/// No variant is recovered locally; callers decide whether to surface the
/// error or discard the edit.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A style id has no registry entry. `index` is the item being
    /// decoded, or the number of items already emitted when encoding.
    #[error("unknown style id {id} at item {index}")]
    UnknownStyle { id: StyleId, index: usize },

    /// A wrapper applies a style that an ancestor already applies, so the
    /// encoded path would repeat the id.
    #[error("style id {id} is nested inside itself at item {index}")]
    NestedStyle { id: StyleId, index: usize },

    #[error("item {index} is malformed: {reason}")]
    MalformedItem { index: usize, reason: &'static str },

    /// The output sink failed; the sink's own error is the source.
    #[error("output sink failed: {0}")]
    Sink(#[source] BoxError),
}

impl CodecError {
    #[must_use]
    pub fn sink(error: impl Into<BoxError>) -> Self {
        Self::Sink(error.into())
    }

    /// Style id that caused the failure, if any.
    #[must_use]
    pub fn style_id(&self) -> Option<StyleId> {
        match self {
            Self::UnknownStyle { id, .. } | Self::NestedStyle { id, .. } => Some(*id),
            _ => None,
        }
    }
}
