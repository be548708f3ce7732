//! The segmented control element.
//!
//! [`Segments<T>`] holds the display-string mirror, the selection, and the
//! control's styling properties. It is platform independent: a
//! [`SegmentsRenderer`](super::SegmentsRenderer) subscribes to its signals and
//! keeps native views in step.
//!
//! # Items
//!
//! Items come either from a bound [`SourceCollection`] (see
//! [`set_items_source`](Segments::set_items_source)) or from the direct item
//! list ([`add_item`](Segments::add_item) and friends). The direct list is
//! locked while a source is bound.
//!
//! # Notifications
//!
//! State is updated under the element's lock and signals are emitted after it
//! is released, in this order: [`items_changed`](Segments::items_changed) for
//! each mirror change, then at most one
//! [`selected_index_changed`](Segments::selected_index_changed) carrying the
//! net selection change. Slots may call back into the element.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_segments::prelude::*;
//!
//! let views = Arc::new(ObservableList::new(vec![
//!     "View A".to_string(),
//!     "View B".to_string(),
//! ]));
//! let segments = Segments::<String>::new();
//! segments.set_items_source(Some(views.clone())).unwrap();
//!
//! segments.selected_index_changed().connect(|event| {
//!     println!("selected {}", event.index);
//! });
//!
//! views.push("View C".to_string());
//! segments.set_selected_index(2).unwrap();
//! assert_eq!(segments.items(), vec!["View A", "View B", "View C"]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use horizon_segments_core::logging::targets;
use horizon_segments_core::{Property, Signal};
use parking_lot::Mutex;

use crate::config::SegmentsConfig;
use crate::error::{SegmentsError, SegmentsResult};
use crate::model::{
    BoundListMirror, CollectionChange, DisplayBinding, MirrorChange, SegmentItem, SelectedItem, SelectionChange,
    SelectionReconciler, SourceHandle,
};
use crate::style::{Color, DisplayMode, SegmentStyle, validate_corner_radius};

/// Payload of [`Segments::selected_index_changed`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedIndexChanged<T> {
    /// The new index, `-1` when nothing is selected.
    pub index: i32,
    /// The index before the change, `-1` when nothing was selected.
    pub previous: i32,
    /// The newly selected item.
    pub item: Option<SelectedItem<T>>,
}

impl<T> SelectedIndexChanged<T> {
    /// The new index as an option.
    pub fn selection(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }
}

impl<T> From<SelectionChange<T>> for SelectedIndexChanged<T> {
    fn from(change: SelectionChange<T>) -> Self {
        Self {
            index: change.selected_index(),
            previous: change.previous_index(),
            item: change.item,
        }
    }
}

/// Element properties reported through [`Segments::property_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentsProperty {
    Color,
    CornerRadius,
    BackgroundColor,
    DisplayMode,
    Style,
    Enabled,
}

struct SegmentsState<T: SegmentItem> {
    mirror: BoundListMirror<T>,
    selection: SelectionReconciler<T>,
}

impl<T: SegmentItem> SegmentsState<T> {
    /// Carry the selection through applied mirror changes.
    fn reconcile(&mut self, changes: &[MirrorChange]) {
        for change in changes {
            match change {
                MirrorChange::Inserted { index, .. } => {
                    self.selection.on_inserted(*index, 1, &self.mirror);
                }
                MirrorChange::Removed { index } => {
                    self.selection.on_removed(*index, 1, &self.mirror);
                }
                MirrorChange::Reset { .. } => {
                    self.selection.resolve_after_reset(&self.mirror);
                }
            }
        }
    }
}

struct SegmentsInner<T: SegmentItem> {
    state: Mutex<SegmentsState<T>>,
    style: Property<SegmentStyle>,
    color: Property<Option<Color>>,
    background_color: Property<Option<Color>>,
    corner_radius: Property<f64>,
    display_mode: Property<DisplayMode>,
    enabled: Property<bool>,
    disposed: AtomicBool,
    items_changed: Arc<Signal<MirrorChange>>,
    selected_index_changed: Arc<Signal<SelectedIndexChanged<T>>>,
    property_changed: Arc<Signal<SegmentsProperty>>,
    collection_error: Arc<Signal<Arc<SegmentsError>>>,
}

/// A segmented control.
///
/// `Segments` is a cheap, cloneable handle; clones refer to the same control.
pub struct Segments<T: SegmentItem> {
    inner: Arc<SegmentsInner<T>>,
}

impl<T: SegmentItem> Clone for Segments<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A weak handle to a [`Segments`] control.
pub struct WeakSegments<T: SegmentItem>(Weak<SegmentsInner<T>>);

impl<T: SegmentItem> WeakSegments<T> {
    pub fn upgrade(&self) -> Option<Segments<T>> {
        self.0.upgrade().map(|inner| Segments { inner })
    }
}

impl<T: SegmentItem> Clone for WeakSegments<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: SegmentItem> Default for Segments<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SegmentItem> Segments<T> {
    /// A control with default settings and no items.
    pub fn new() -> Self {
        Self::with_config(&SegmentsConfig::default())
    }

    /// A control configured from `config`.
    pub fn with_config(config: &SegmentsConfig) -> Self {
        Self::build(config, BoundListMirror::new())
    }

    /// An unbound control with the given direct items.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = items.into_iter().map(Into::into).collect();
        Self::build(&SegmentsConfig::default(), BoundListMirror::from_entries(entries))
    }

    fn build(config: &SegmentsConfig, mirror: BoundListMirror<T>) -> Self {
        let inner = SegmentsInner {
            state: Mutex::new(SegmentsState {
                mirror,
                selection: SelectionReconciler::new(config.initial_selection),
            }),
            style: Property::named("style", config.style.clone()),
            color: Property::named("color", None),
            background_color: Property::named("background_color", None),
            corner_radius: Property::named("corner_radius", f64::from(config.style.corner_radius)),
            display_mode: Property::named("display_mode", config.display_mode),
            enabled: Property::named("enabled", true),
            disposed: AtomicBool::new(false),
            items_changed: Arc::new(Signal::new()),
            selected_index_changed: Arc::new(Signal::new()),
            property_changed: Arc::new(Signal::new()),
            collection_error: Arc::new(Signal::new()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn downgrade(&self) -> WeakSegments<T> {
        WeakSegments(Arc::downgrade(&self.inner))
    }

    /// Whether two handles refer to the same control.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Signals
    // -------------------------------------------------------------------------

    /// Fires for every change to the display entries.
    pub fn items_changed(&self) -> &Arc<Signal<MirrorChange>> {
        &self.inner.items_changed
    }

    /// Fires when the selected index or item changes.
    pub fn selected_index_changed(&self) -> &Arc<Signal<SelectedIndexChanged<T>>> {
        &self.inner.selected_index_changed
    }

    /// Fires when a styling property changes.
    pub fn property_changed(&self) -> &Arc<Signal<SegmentsProperty>> {
        &self.inner.property_changed
    }

    /// Fires when a notification from the bound source could not be
    /// mirrored, for example because it added a null item.
    pub fn collection_error(&self) -> &Arc<Signal<Arc<SegmentsError>>> {
        &self.inner.collection_error
    }

    // -------------------------------------------------------------------------
    // State updates
    // -------------------------------------------------------------------------

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    fn ensure_alive(&self) -> SegmentsResult<()> {
        if self.is_disposed() {
            Err(SegmentsError::Disposed)
        } else {
            Ok(())
        }
    }

    /// Run `f` under the state lock, reconcile the selection with the
    /// mirror changes it reports, then emit notifications unlocked.
    fn update<R, F>(&self, attaching: bool, f: F) -> SegmentsResult<R>
    where
        F: FnOnce(&mut SegmentsState<T>) -> SegmentsResult<(R, Vec<MirrorChange>)>,
    {
        self.ensure_alive()?;

        let (result, mirror_changes, selection_change) = {
            let mut guard = self.inner.state.lock();
            let state = &mut *guard;
            let checkpoint = state.selection.checkpoint();
            let was_empty = state.mirror.is_empty();

            let (result, mirror_changes) = f(state)?;
            state.reconcile(&mirror_changes);
            if attaching || (was_empty && !mirror_changes.is_empty()) {
                state.selection.apply_initial(&state.mirror);
            }
            let selection_change = state.selection.changes_since(checkpoint);
            (result, mirror_changes, selection_change)
        };

        for change in mirror_changes {
            self.inner.items_changed.emit(change);
        }
        if let Some(change) = selection_change {
            self.inner.selected_index_changed.emit(change.into());
        }
        Ok(result)
    }

    fn on_source_changed(&self, change: &CollectionChange<T>) {
        if self.is_disposed() {
            return;
        }
        let result = self.update(false, |state| Ok(((), state.mirror.on_collection_changed(change)?)));
        if let Err(err) = result {
            tracing::warn!(target: targets::MIRROR, %err, kind = change.kind(), "collection change not mirrored");
            self.inner.collection_error.emit(Arc::new(err));
        }
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Bind to `source`, or unbind with `None`.
    ///
    /// Any previous source is unsubscribed first. Unbinding keeps the current
    /// entries as direct items. If `source` holds a null item the control
    /// ends up unbound and the error is returned.
    pub fn set_items_source(&self, source: Option<SourceHandle<T>>) -> SegmentsResult<()> {
        let Some(source) = source else {
            self.unbind_items_source();
            return self.ensure_alive();
        };
        let weak = Arc::downgrade(&self.inner);
        self.update(true, move |state| {
            let changes = state.mirror.attach(source, move |signal| {
                signal.connect_scoped(move |change| {
                    if let Some(inner) = weak.upgrade() {
                        Segments { inner }.on_source_changed(change);
                    }
                })
            })?;
            Ok(((), changes))
        })
    }

    /// Detach the source. The entries and selected index stay, so nothing
    /// visible changes and no notification fires; the selected item is
    /// re-read from the now direct entries.
    fn unbind_items_source(&self) {
        if self.is_disposed() {
            return;
        }
        let mut guard = self.inner.state.lock();
        let state = &mut *guard;
        if state.mirror.detach() {
            state.selection.resolve_after_reset(&state.mirror);
        }
    }

    /// The bound items source.
    pub fn items_source(&self) -> Option<SourceHandle<T>> {
        self.inner.state.lock().mirror.source().cloned()
    }

    pub fn is_bound(&self) -> bool {
        self.inner.state.lock().mirror.is_bound()
    }

    /// Replace the item display binding and re-project the bound source.
    pub fn set_item_display_binding(&self, binding: Option<DisplayBinding<T>>) -> SegmentsResult<()> {
        self.update(false, move |state| Ok(((), state.mirror.set_binding(binding)?)))
    }

    /// The display strings, in order.
    pub fn items(&self) -> Vec<String> {
        self.inner.state.lock().mirror.entries().to_vec()
    }

    pub fn item_count(&self) -> usize {
        self.inner.state.lock().mirror.len()
    }

    /// Append a direct item.
    pub fn add_item(&self, text: impl Into<String>) -> SegmentsResult<()> {
        let text = text.into();
        self.update(false, move |state| Ok(((), vec![state.mirror.push(text)?])))
    }

    /// Insert a direct item at `index`.
    pub fn insert_item(&self, index: usize, text: impl Into<String>) -> SegmentsResult<()> {
        let text = text.into();
        self.update(false, move |state| Ok(((), vec![state.mirror.insert_at(index, text)?])))
    }

    /// Remove the direct item at `index`.
    pub fn remove_item_at(&self, index: usize) -> SegmentsResult<String> {
        self.update(false, move |state| {
            let (text, change) = state.mirror.remove_at(index)?;
            Ok((text, vec![change]))
        })
    }

    /// Remove every direct item.
    pub fn clear_items(&self) -> SegmentsResult<()> {
        self.update(false, |state| Ok(((), vec![state.mirror.clear()?])))
    }

    /// Replace the direct items.
    pub fn set_items<I, S>(&self, items: I) -> SegmentsResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = items.into_iter().map(Into::into).collect();
        self.update(false, move |state| Ok(((), vec![state.mirror.set_entries(entries)?])))
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// The selected index, `-1` when nothing is selected.
    pub fn selected_index(&self) -> i32 {
        self.inner.state.lock().selection.selected_index()
    }

    /// The selected index as an option.
    pub fn selection(&self) -> Option<usize> {
        self.inner.state.lock().selection.selection()
    }

    pub fn selected_item(&self) -> Option<SelectedItem<T>> {
        self.inner.state.lock().selection.selected_item().cloned()
    }

    /// Select by index; `-1` clears the selection.
    pub fn set_selected_index(&self, index: i32) -> SegmentsResult<()> {
        self.update(false, |state| {
            state.selection.set_selected_index(index, &state.mirror)?;
            Ok(((), Vec::new()))
        })
    }

    /// Select by item; `None` clears the selection.
    pub fn set_selected_item(&self, item: Option<SelectedItem<T>>) -> SegmentsResult<()> {
        self.update(false, |state| {
            state.selection.set_selected_item(item.as_ref(), &state.mirror)?;
            Ok(((), Vec::new()))
        })
    }

    /// Select the segment showing `item`.
    pub fn select_item(&self, item: T) -> SegmentsResult<()> {
        self.set_selected_item(Some(SelectedItem::Source(item)))
    }

    /// Record a segment checked in the native view.
    pub fn on_segment_checked(&self, ordinal: usize) -> SegmentsResult<()> {
        tracing::trace!(target: targets::SELECTION, ordinal, "segment checked by user");
        self.update(false, |state| {
            state.selection.on_view_checked(ordinal, &state.mirror)?;
            Ok(((), Vec::new()))
        })
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn notify(&self, property: SegmentsProperty, changed: bool) {
        if changed {
            tracing::trace!(target: targets::RENDERER, ?property, "element property changed");
            self.inner.property_changed.emit(property);
        }
    }

    /// The tint override, if set.
    pub fn color(&self) -> Option<Color> {
        self.inner.color.get()
    }

    pub fn is_color_set(&self) -> bool {
        self.inner.color.with(Option::is_some)
    }

    pub fn set_color(&self, color: Color) {
        self.notify(SegmentsProperty::Color, self.inner.color.set(Some(color)));
    }

    pub fn clear_color(&self) {
        self.notify(SegmentsProperty::Color, self.inner.color.set(None));
    }

    /// The background override, if set.
    pub fn background_color(&self) -> Option<Color> {
        self.inner.background_color.get()
    }

    pub fn set_background_color(&self, color: Color) {
        self.notify(
            SegmentsProperty::BackgroundColor,
            self.inner.background_color.set(Some(color)),
        );
    }

    /// Corner radius of the end segments, in dp.
    pub fn corner_radius(&self) -> f64 {
        self.inner.corner_radius.get()
    }

    /// Set the corner radius. Must be finite and not negative.
    pub fn set_corner_radius(&self, radius: f64) -> SegmentsResult<()> {
        let changed = self
            .inner
            .corner_radius
            .set_validated(radius, validate_corner_radius)?;
        self.notify(SegmentsProperty::CornerRadius, changed);
        Ok(())
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.inner.display_mode.get()
    }

    pub fn set_display_mode(&self, mode: DisplayMode) {
        self.notify(SegmentsProperty::DisplayMode, self.inner.display_mode.set(mode));
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// Enable or disable the control. A disabled control ignores touches.
    pub fn set_enabled(&self, enabled: bool) {
        self.notify(SegmentsProperty::Enabled, self.inner.enabled.set(enabled));
    }

    /// The base style, before property overrides.
    pub fn style(&self) -> SegmentStyle {
        self.inner.style.get()
    }

    /// Replace the base style. The corner radius follows the new style.
    pub fn set_style(&self, style: SegmentStyle) {
        let radius = f64::from(style.corner_radius);
        let changed = self.inner.style.set(style);
        let radius_changed = self.inner.corner_radius.set(radius);
        self.notify(SegmentsProperty::Style, changed || radius_changed);
    }

    /// The base style with the color, background and corner radius
    /// overrides applied.
    pub fn effective_style(&self) -> SegmentStyle {
        let mut style = self.inner.style.get();
        if let Some(tint) = self.inner.color.get() {
            style.tint = tint;
        }
        if let Some(background) = self.inner.background_color.get() {
            style.background = background;
        }
        style.corner_radius = self.inner.corner_radius.get() as f32;
        style
    }

    // -------------------------------------------------------------------------
    // Lifetime
    // -------------------------------------------------------------------------

    /// Unsubscribe from the items source and disconnect every slot.
    ///
    /// Idempotent. Later mutations fail with [`SegmentsError::Disposed`].
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.state.lock().mirror.detach();
        self.inner.items_changed.disconnect_all();
        self.inner.selected_index_changed.disconnect_all();
        self.inner.property_changed.disconnect_all();
        self.inner.collection_error.disconnect_all();
        tracing::debug!(target: targets::RENDERER, "segments element disposed");
    }
}

impl<T: SegmentItem> fmt::Debug for Segments<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Segments")
            .field("mirror", &state.mirror)
            .field("selected_index", &state.selection.selected_index())
            .field("display_mode", &self.display_mode())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

static_assertions::assert_impl_all!(Segments<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InitialSelection, ObservableList, StaticList};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn record_selection(segments: &Segments<String>) -> Arc<Mutex<Vec<(i32, Option<SelectedItem<String>>)>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        segments.selected_index_changed().connect(move |event| {
            log_clone.lock().push((event.index, event.item.clone()));
        });
        log
    }

    #[test]
    fn test_bound_source_drives_items() {
        let source = Arc::new(ObservableList::new(strings(&["View A", "View B"])));
        let segments = Segments::<String>::new();
        segments.set_items_source(Some(source.clone())).unwrap();

        source.push("View C".into());
        assert_eq!(segments.items(), strings(&["View A", "View B", "View C"]));

        source.remove(0);
        assert_eq!(segments.items(), strings(&["View B", "View C"]));
    }

    #[test]
    fn test_selected_index_event_carries_source_item() {
        let source = Arc::new(ObservableList::new(strings(&["View A", "View B"])));
        let segments = Segments::<String>::new();
        segments.set_items_source(Some(source)).unwrap();
        let log = record_selection(&segments);

        segments.set_selected_index(1).unwrap();
        segments.set_selected_index(1).unwrap();

        assert_eq!(
            *log.lock(),
            vec![(1, Some(SelectedItem::Source("View B".to_string())))]
        );
    }

    #[test]
    fn test_out_of_range_index_is_rejected_silently() {
        let segments = Segments::<String>::from_items(["A", "B"]);
        let log = record_selection(&segments);

        assert!(matches!(
            segments.set_selected_index(5),
            Err(SegmentsError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert_eq!(segments.selected_index(), -1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_selection_follows_item_across_inserts() {
        let source = Arc::new(ObservableList::new(strings(&["A", "B", "C"])));
        let segments = Segments::<String>::new();
        segments.set_items_source(Some(source.clone())).unwrap();
        segments.set_selected_index(1).unwrap();
        let log = record_selection(&segments);

        source.insert(0, "N".into());
        assert_eq!(segments.selected_index(), 2);
        assert_eq!(segments.selected_item(), Some(SelectedItem::Source("B".to_string())));

        source.remove(2);
        assert_eq!(segments.selected_index(), -1);
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_reset_clamps_selection() {
        let source = Arc::new(ObservableList::new(strings(&["A", "B", "C"])));
        let segments = Segments::<String>::new();
        segments.set_items_source(Some(source.clone())).unwrap();
        segments.set_selected_index(2).unwrap();

        source.set_items(strings(&["X"]));
        assert_eq!(segments.selected_index(), 0);
        assert_eq!(segments.selected_item(), Some(SelectedItem::Source("X".to_string())));

        source.clear();
        assert_eq!(segments.selected_index(), -1);
    }

    #[test]
    fn test_unbinding_rereads_selected_item_from_entries() {
        let source = Arc::new(ObservableList::new(strings(&["A", "B"])));
        let segments = Segments::<String>::new();
        segments.set_items_source(Some(source)).unwrap();
        segments.set_selected_index(1).unwrap();
        let log = record_selection(&segments);

        segments.set_items_source(None).unwrap();
        assert_eq!(segments.selected_index(), 1);
        assert_eq!(segments.selected_item(), Some(SelectedItem::Text("B".to_string())));

        segments.set_selected_index(1).unwrap();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_direct_items_locked_while_bound() {
        let segments = Segments::<String>::from_items(["A"]);
        segments.add_item("B").unwrap();
        assert_eq!(segments.items(), strings(&["A", "B"]));

        segments
            .set_items_source(Some(Arc::new(StaticList::new(strings(&["X"])))))
            .unwrap();
        assert!(matches!(segments.add_item("C"), Err(SegmentsError::ItemsSourceBound)));

        segments.set_items_source(None).unwrap();
        segments.add_item("Y").unwrap();
        assert_eq!(segments.items(), strings(&["X", "Y"]));
    }

    #[test]
    fn test_null_item_surfaces_as_error() {
        let source = Arc::new(ObservableList::new(vec![Some("A".to_string())]));
        let segments = Segments::<Option<String>>::new();
        segments.set_items_source(Some(source.clone())).unwrap();

        let errors = Arc::new(Mutex::new(Vec::new()));
        let errors_clone = errors.clone();
        segments.collection_error().connect(move |err| {
            errors_clone.lock().push(err.to_string());
        });

        source.push(None);
        assert_eq!(segments.items(), strings(&["A"]));
        assert_eq!(errors.lock().len(), 1);
    }

    #[test]
    fn test_initial_selection_first() {
        let config = SegmentsConfig {
            initial_selection: InitialSelection::First,
            ..SegmentsConfig::default()
        };
        let segments = Segments::<String>::with_config(&config);
        assert_eq!(segments.selected_index(), -1);

        segments.add_item("A").unwrap();
        assert_eq!(segments.selected_index(), 0);

        segments.set_selected_index(-1).unwrap();
        segments.add_item("B").unwrap();
        assert_eq!(segments.selected_index(), -1);
    }

    #[test]
    fn test_set_selected_item() {
        let segments = Segments::<String>::from_items(["Tea", "Coffee"]);
        segments
            .set_selected_item(Some(SelectedItem::Text("Coffee".into())))
            .unwrap();
        assert_eq!(segments.selected_index(), 1);

        segments.select_item("Tea".to_string()).unwrap();
        assert_eq!(segments.selected_index(), 0);

        assert!(matches!(
            segments.set_selected_item(Some(SelectedItem::Text("Juice".into()))),
            Err(SegmentsError::ItemNotFound)
        ));
    }

    #[test]
    fn test_property_notifications() {
        let segments = Segments::<String>::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        segments.property_changed().connect(move |p| log_clone.lock().push(*p));

        let light_blue = Color::from_rgb8(0xAD, 0xD8, 0xE6);
        segments.set_color(light_blue);
        segments.set_color(light_blue);
        segments.set_corner_radius(8.0).unwrap();
        assert!(segments.set_corner_radius(-1.0).is_err());
        segments.set_enabled(false);

        assert_eq!(
            *log.lock(),
            vec![SegmentsProperty::Color, SegmentsProperty::CornerRadius, SegmentsProperty::Enabled]
        );
        let style = segments.effective_style();
        assert_eq!(style.tint, light_blue);
        assert_eq!(style.corner_radius, 8.0);
        assert_eq!(segments.corner_radius(), 8.0);
    }

    #[test]
    fn test_slot_may_reenter_element() {
        let segments = Segments::<String>::from_items(["A", "B"]);
        let handle = segments.clone();
        segments.selected_index_changed().connect(move |event| {
            if event.index == 0 {
                handle.set_selected_index(1).unwrap();
            }
        });

        segments.set_selected_index(0).unwrap();
        assert_eq!(segments.selected_index(), 1);
    }

    #[test]
    fn test_dispose_unsubscribes_and_rejects_mutation() {
        let source = Arc::new(ObservableList::new(strings(&["A"])));
        let segments = Segments::<String>::new();
        segments.set_items_source(Some(source.clone())).unwrap();
        assert_eq!(source.subscriber_count(), 1);

        segments.dispose();
        segments.dispose();
        assert_eq!(source.subscriber_count(), 0);
        assert!(matches!(segments.set_selected_index(0), Err(SegmentsError::Disposed)));

        source.push("B".into());
        assert_eq!(segments.items(), strings(&["A"]));
    }

    #[test]
    fn test_dropping_element_unsubscribes() {
        let source = Arc::new(ObservableList::new(strings(&["A"])));
        {
            let segments = Segments::<String>::new();
            segments.set_items_source(Some(source.clone())).unwrap();
        }
        assert_eq!(source.subscriber_count(), 0);
    }
}
