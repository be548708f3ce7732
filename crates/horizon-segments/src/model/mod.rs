//! Item model for segmented controls.
//!
//! - [`collection`]: source collections and their change notifications
//! - [`projector`]: item to display string projection
//! - [`mirror`]: the display-string list kept in step with a bound source
//! - [`selection`]: the selected index and item

pub mod collection;
pub mod mirror;
pub mod projector;
pub mod selection;

pub use collection::{CollectionChange, ObservableList, SegmentItem, SourceCollection, StaticList};
pub use mirror::{BoundListMirror, MirrorChange, SourceHandle};
pub use projector::{DisplayBinding, Projector};
pub use selection::{
    InitialSelection, ItemLookup, SelectedItem, SelectionChange, SelectionCheckpoint, SelectionReconciler,
};
