//! Logging targets for Horizon Segments.
//!
//! Horizon Segments uses the `tracing` crate for instrumentation. Install a
//! subscriber in the application to see the output:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_segments=debug")
//!     .init();
//! ```
//!
//! The constants below are the `target:` values used by each subsystem, so
//! filters like `RUST_LOG=horizon_segments::synchronizer=trace` select a
//! single layer.

/// Target names for log filtering.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_segments_core::signal";
    /// Property system target.
    pub const PROPERTY: &str = "horizon_segments_core::property";
    /// Async runtime target.
    pub const RUNTIME: &str = "horizon_segments_core::runtime";
    /// Source collection notifications.
    pub const COLLECTION: &str = "horizon_segments::collection";
    /// Display list mirror.
    pub const MIRROR: &str = "horizon_segments::mirror";
    /// Selection reconciliation.
    pub const SELECTION: &str = "horizon_segments::selection";
    /// Native view synchronization.
    pub const SYNCHRONIZER: &str = "horizon_segments::synchronizer";
    /// Async image fetching.
    pub const IMAGE: &str = "horizon_segments::image";
    /// Element/renderer wiring.
    pub const RENDERER: &str = "horizon_segments::renderer";
}

/// Span names used for the more expensive operations.
pub mod span_names {
    /// Full mirror re-projection.
    pub const MIRROR_RESET: &str = "horizon_segments::mirror_reset";
    /// Full native view rebuild.
    pub const VIEW_REBUILD: &str = "horizon_segments::view_rebuild";
}
