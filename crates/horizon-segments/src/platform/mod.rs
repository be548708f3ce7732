//! Native segment hosts and the synchronizer that drives them.
//!
//! A [`NativeSegmentHost`] is the platform's container of segment views:
//! a radio group of styled buttons on Android, a segmented control on iOS.
//! The [`PlatformViewSynchronizer`](synchronizer::PlatformViewSynchronizer)
//! keeps a host in step with a control's display entries and selection.

pub mod android;
pub mod ios;
pub mod synchronizer;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use horizon_segments_core::Signal;

use crate::image::{ImageResolver, ImageSource, NativeImage};
use crate::style::{DisplayMode, SegmentStyle};

pub use android::{AndroidSegmentHost, SegmentDrawable, ShapeStyle};
pub use ios::IosSegmentHost;
pub use synchronizer::PlatformViewSynchronizer;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a native segment view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    /// Allocate a fresh, process-unique view id.
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Edge class of a segment, which decides which corners are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentPosition {
    Left,
    Middle,
    Right,
}

impl SegmentPosition {
    /// Edge class of ordinal `index` in a control of `len` segments.
    ///
    /// A lone segment is classed `Left`.
    pub fn for_ordinal(index: usize, len: usize) -> Self {
        if index == 0 {
            SegmentPosition::Left
        } else if index + 1 == len {
            SegmentPosition::Right
        } else {
            SegmentPosition::Middle
        }
    }
}

/// Where an image sits relative to the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImagePlacement {
    /// The image is the only content.
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

/// What a single segment view shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentContent {
    pub label: Option<String>,
    pub image: Option<(ImageSource, ImagePlacement)>,
}

impl SegmentContent {
    /// A label-only segment.
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            image: None,
        }
    }

    /// Content for `text` under `mode`.
    ///
    /// Hosts without image placement show label-only segments for the
    /// combined modes.
    pub fn for_mode(text: &str, mode: DisplayMode, supports_placement: bool, resolver: &ImageResolver) -> Self {
        let placement = match mode {
            DisplayMode::Text => return Self::text(text),
            DisplayMode::Image => {
                return Self {
                    label: None,
                    image: resolver(text).map(|source| (source, ImagePlacement::Center)),
                };
            }
            _ if !supports_placement => return Self::text(text),
            DisplayMode::Both | DisplayMode::ImageLeft => ImagePlacement::Left,
            DisplayMode::ImageRight => ImagePlacement::Right,
            DisplayMode::ImageTop => ImagePlacement::Top,
            DisplayMode::ImageBottom => ImagePlacement::Bottom,
        };
        Self {
            label: Some(text.to_string()),
            image: resolver(text).map(|source| (source, placement)),
        }
    }

    pub fn image_source(&self) -> Option<&ImageSource> {
        self.image.as_ref().map(|(source, _)| source)
    }
}

/// A mutation performed on a host, recorded in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    Inserted { ordinal: usize, view: ViewId },
    Removed { ordinal: usize, view: ViewId },
    Cleared,
    Checked(ViewId),
    Unchecked(ViewId),
    Repositioned { view: ViewId, position: SegmentPosition },
    ImageSet { view: ViewId, loaded: bool },
    Enabled(bool),
    Restyled,
}

/// Number of operations a [`HostJournal`] holds before it sheds old ones.
pub const JOURNAL_CAPACITY: usize = 256;

/// A bounded record of host mutations, oldest first.
///
/// When full, the oldest half is dropped, so a long-lived host keeps only
/// its recent history.
#[derive(Debug, Clone, Default)]
pub struct HostJournal {
    ops: Vec<HostOp>,
}

impl HostJournal {
    pub fn record(&mut self, op: HostOp) {
        if self.ops.len() >= JOURNAL_CAPACITY {
            self.ops.drain(..JOURNAL_CAPACITY / 2);
        }
        self.ops.push(op);
    }

    pub fn as_slice(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

/// A platform container of segment views.
///
/// Hosts never change their own checked state; a touch only produces an
/// event on [`checked_events`](Self::checked_events) and the synchronizer
/// decides what to check.
pub trait NativeSegmentHost: Send + 'static {
    /// Platform name for log output.
    fn platform(&self) -> &'static str;

    /// Whether images can sit beside a label.
    fn supports_image_placement(&self) -> bool;

    /// Create a segment view at `ordinal`.
    fn insert_segment(
        &mut self,
        ordinal: usize,
        content: &SegmentContent,
        position: SegmentPosition,
        style: &SegmentStyle,
    ) -> ViewId;

    /// Destroy the segment view at `ordinal`.
    fn remove_segment(&mut self, ordinal: usize) -> Option<ViewId>;

    /// Destroy every segment view.
    fn remove_all(&mut self);

    fn segment_count(&self) -> usize;

    fn view_at(&self, ordinal: usize) -> Option<ViewId>;

    fn ordinal_of(&self, view: ViewId) -> Option<usize>;

    /// Change the edge class of a segment.
    fn set_position(&mut self, view: ViewId, position: SegmentPosition, style: &SegmentStyle);

    /// Set or clear the checked emphasis of a segment.
    fn set_checked(&mut self, view: ViewId, checked: bool, style: &SegmentStyle);

    fn is_checked(&self, view: ViewId) -> bool;

    /// Show a decoded image, or the placeholder for `None`.
    ///
    /// Returns `false` if the view no longer exists.
    fn set_image(&mut self, view: ViewId, image: Option<NativeImage>) -> bool;

    fn set_enabled(&mut self, enabled: bool, style: &SegmentStyle);

    /// Apply background and tint to the container and every segment.
    fn apply_container_style(&mut self, style: &SegmentStyle);

    /// Fires with the touched segment when the user selects one.
    fn checked_events(&self) -> Arc<Signal<ViewId>>;

    /// Recent mutations, oldest first. Bounded by [`JOURNAL_CAPACITY`].
    fn operations(&self) -> &[HostOp];

    fn clear_operations(&mut self);
}
