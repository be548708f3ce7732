//! Core systems for Horizon Segments.
//!
//! This crate provides the small reactive foundation the segmented control
//! is built on:
//!
//! - **Signal/Slot System**: Type-safe observer notifications
//! - **Property System**: Values with change detection and validation
//! - **Async Runtime**: A Tokio runtime wrapper for background work
//! - **Logging**: `tracing` targets used across the workspace
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_segments_core::Signal;
//!
//! let index_changed = Signal::<i32>::new();
//!
//! let conn_id = index_changed.connect(|index| {
//!     println!("Selected index is now {}", index);
//! });
//!
//! index_changed.emit(2);
//! index_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use horizon_segments_core::{Property, Signal};
//!
//! struct Tint {
//!     value: Property<u32>,
//!     changed: Signal<u32>,
//! }
//!
//! impl Tint {
//!     fn set(&self, rgb: u32) {
//!         if self.value.set(rgb) {
//!             self.changed.emit(rgb);
//!         }
//!     }
//! }
//! ```

pub mod async_runtime;
mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use async_runtime::{AsyncRuntime, AsyncRuntimeConfig, AsyncTaskHandle, RuntimeType};
pub use error::{PropertyError, RuntimeError, SignalError};
pub use property::{Property, ReadOnlyProperty};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
