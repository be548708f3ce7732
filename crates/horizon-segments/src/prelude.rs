//! Commonly used types.
//!
//! ```ignore
//! use horizon_segments::prelude::*;
//! ```

// ============================================================================
// Signals and Properties
// ============================================================================

pub use horizon_segments_core::{ConnectionGuard, ConnectionId, Property, Signal};

// ============================================================================
// Element
// ============================================================================

pub use crate::config::SegmentsConfig;
pub use crate::error::{SegmentsError, SegmentsResult};
pub use crate::widget::{Segments, SegmentsProperty, SegmentsRenderer, SelectedIndexChanged};

// ============================================================================
// Items and Selection
// ============================================================================

pub use crate::model::{
    CollectionChange, DisplayBinding, InitialSelection, MirrorChange, ObservableList, SegmentItem, SelectedItem,
    SourceCollection, SourceHandle, StaticList,
};

// ============================================================================
// Styling and Platforms
// ============================================================================

pub use crate::image::{ImageFetcher, ImageSource};
pub use crate::platform::{AndroidSegmentHost, IosSegmentHost, NativeSegmentHost, PlatformViewSynchronizer};
pub use crate::style::{Color, DisplayMode, SegmentStyle};
