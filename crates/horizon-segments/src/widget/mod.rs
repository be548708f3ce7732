//! The segmented control element and its renderer.

mod renderer;
mod segments;

pub use renderer::SegmentsRenderer;
pub use segments::{Segments, SegmentsProperty, SelectedIndexChanged, WeakSegments};
