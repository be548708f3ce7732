//! Error types for the segmented control.

use horizon_segments_core::{PropertyError, RuntimeError};
use thiserror::Error;

/// Errors raised by the segmented control and its collaborators.
#[derive(Error, Debug)]
pub enum SegmentsError {
    /// A selected index outside `-1..len` was requested.
    #[error("selected index {index} is out of range for {len} segments")]
    IndexOutOfRange {
        /// The rejected index.
        index: i32,
        /// Number of segments at the time of the request.
        len: usize,
    },

    /// An item produced no display text.
    #[error("item at index {index} has no display text")]
    NullItem {
        /// Position of the offending item in the source.
        index: usize,
    },

    /// The requested selected item is not in the list.
    #[error("item is not present in the segment list")]
    ItemNotFound,

    /// The direct item list was modified while an items source is bound.
    #[error("items cannot be modified directly while an items source is bound")]
    ItemsSourceBound,

    /// A collection notification described positions the mirror doesn't have.
    #[error("change at {start} spanning {count} items does not fit a list of {len}")]
    ChangeOutOfRange {
        /// First position named by the change.
        start: usize,
        /// Number of items in the change.
        count: usize,
        /// Current mirror length.
        len: usize,
    },

    /// The control was used after `dispose`.
    #[error("segmented control has been disposed")]
    Disposed,

    /// A property rejected its new value.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The async runtime could not be created.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Result alias used throughout the crate.
pub type SegmentsResult<T> = Result<T, SegmentsError>;

/// Errors from loading segment images.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The image file could not be read.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The image data could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The source kind can't be loaded by this service.
    #[error("unsupported image source: {0}")]
    Unsupported(String),

    /// An HTTP fetch failed.
    #[error("failed to fetch image: {0}")]
    Fetch(String),

    /// The loading task ended without producing a result.
    #[error("image load was cancelled")]
    Cancelled,
}
