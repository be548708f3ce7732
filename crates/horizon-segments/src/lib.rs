//! Horizon Segments - a segmented control with live collection binding.
//!
//! A [`Segments`] control shows one segment per item of a bound source
//! collection (or of its own direct item list) and keeps exactly one of them
//! selected. A [`SegmentsRenderer`] mirrors the control into a native host,
//! either the Android radio-group host or the iOS segmented-control host.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_segments::prelude::*;
//!
//! let views = Arc::new(ObservableList::new(vec!["Day".to_string(), "Week".to_string()]));
//! let segments = Segments::<String>::new();
//! segments.set_items_source(Some(views.clone())).unwrap();
//!
//! let mut renderer = SegmentsRenderer::for_host(AndroidSegmentHost::new(2.0));
//! renderer.set_element(Some(segments.clone()));
//!
//! views.push("Month".to_string());
//! renderer.tap(2);
//! assert_eq!(segments.selected_index(), 2);
//! ```
//!
//! Logging goes through `tracing`; see
//! [`horizon_segments_core::logging`] for the targets.

pub mod config;
mod error;
pub mod image;
pub mod model;
pub mod platform;
pub mod prelude;
pub mod style;
pub mod widget;

pub use config::SegmentsConfig;
pub use error::{ImageError, SegmentsError, SegmentsResult};
pub use widget::{Segments, SegmentsProperty, SegmentsRenderer, SelectedIndexChanged, WeakSegments};
