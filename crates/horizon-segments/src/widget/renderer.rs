//! Connects a [`Segments`] element to a native host.
//!
//! The renderer listens to the element's signals and forwards them to a
//! [`PlatformViewSynchronizer`]; native check events flow the other way,
//! into [`Segments::on_segment_checked`]. Swapping the element drops every
//! subscription held on the old one.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use horizon_segments_core::ConnectionGuard;
use horizon_segments_core::logging::targets;
use parking_lot::Mutex;

use super::segments::{SegmentsProperty, SelectedIndexChanged};
use super::{Segments, WeakSegments};
use crate::model::{MirrorChange, SegmentItem};
use crate::platform::{NativeSegmentHost, PlatformViewSynchronizer, ViewId};
use crate::style::SegmentStyle;

type SharedSynchronizer<H> = Arc<Mutex<PlatformViewSynchronizer<H>>>;

/// Subscriptions held on one element and its host.
struct ElementSubscriptions<T: SegmentItem> {
    _items: ConnectionGuard<MirrorChange>,
    _selection: ConnectionGuard<SelectedIndexChanged<T>>,
    _properties: ConnectionGuard<SegmentsProperty>,
    _native: ConnectionGuard<ViewId>,
}

/// Renders a [`Segments`] element through a native host.
pub struct SegmentsRenderer<T: SegmentItem, H: NativeSegmentHost> {
    synchronizer: SharedSynchronizer<H>,
    element: Option<Segments<T>>,
    subscriptions: Option<ElementSubscriptions<T>>,
    disposed: bool,
}

impl<T: SegmentItem, H: NativeSegmentHost> SegmentsRenderer<T, H> {
    pub fn new(synchronizer: PlatformViewSynchronizer<H>) -> Self {
        Self {
            synchronizer: Arc::new(Mutex::new(synchronizer)),
            element: None,
            subscriptions: None,
            disposed: false,
        }
    }

    /// A renderer over `host` without image loading.
    pub fn for_host(host: H) -> Self {
        Self::new(PlatformViewSynchronizer::new(host, SegmentStyle::default()))
    }

    /// The element being rendered.
    pub fn element(&self) -> Option<&Segments<T>> {
        self.element.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Render `element`, or detach with `None`.
    ///
    /// Native views are rebuilt from the new element's entries, selection
    /// and style. Subscriptions on the previous element are released first.
    pub fn set_element(&mut self, element: Option<Segments<T>>) {
        if self.disposed {
            return;
        }
        self.subscriptions = None;
        self.element = element;
        let Some(element) = self.element.clone() else {
            tracing::debug!(target: targets::RENDERER, "renderer detached from element");
            return;
        };

        let entries = element.items();
        let selected = element.selection();
        let checked_events = {
            let mut sync = self.synchronizer.lock();
            sync.configure(element.effective_style(), element.display_mode(), element.is_enabled());
            sync.populate(&entries, selected);
            sync.host().checked_events()
        };

        let weak_sync = Arc::downgrade(&self.synchronizer);
        let weak_element = element.downgrade();
        self.subscriptions = Some(ElementSubscriptions {
            _items: element
                .items_changed()
                .connect_scoped(items_slot(weak_sync.clone(), weak_element.clone())),
            _selection: element
                .selected_index_changed()
                .connect_scoped(selection_slot(weak_sync.clone())),
            _properties: element
                .property_changed()
                .connect_scoped(property_slot(weak_sync.clone(), weak_element.clone())),
            _native: checked_events.connect_scoped(native_slot(weak_sync, weak_element)),
        });
        tracing::debug!(target: targets::RENDERER, len = entries.len(), ?selected, "renderer attached to element");
    }

    /// Simulate the user touching the segment at `ordinal`.
    ///
    /// Returns `false` when no such segment exists.
    pub fn tap(&self, ordinal: usize) -> bool {
        if self.disposed {
            return false;
        }
        let (view, events) = {
            let sync = self.synchronizer.lock();
            (sync.view_at(ordinal), sync.host().checked_events())
        };
        match view {
            Some(view) => {
                events.emit(view);
                true
            }
            None => false,
        }
    }

    /// Run `f` against the synchronizer.
    pub fn with_synchronizer<R>(&self, f: impl FnOnce(&PlatformViewSynchronizer<H>) -> R) -> R {
        f(&self.synchronizer.lock())
    }

    /// Run `f` against the native host.
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(self.synchronizer.lock().host())
    }

    /// Apply finished image loads. Returns the number of views updated.
    pub fn process_images(&self) -> usize {
        self.synchronizer.lock().process_image_completions()
    }

    /// Wait up to `timeout` for image loads and apply them.
    pub fn wait_for_images(&self, timeout: Duration) -> usize {
        self.synchronizer.lock().wait_for_images(timeout)
    }

    /// Release the element and destroy native views. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.subscriptions = None;
        self.element = None;
        self.synchronizer.lock().dispose();
        tracing::debug!(target: targets::RENDERER, "renderer disposed");
    }
}

impl<T: SegmentItem, H: NativeSegmentHost> Drop for SegmentsRenderer<T, H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: SegmentItem, H: NativeSegmentHost> fmt::Debug for SegmentsRenderer<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentsRenderer")
            .field("synchronizer", &*self.synchronizer.lock())
            .field("has_element", &self.element.is_some())
            .field("disposed", &self.disposed)
            .finish()
    }
}

fn items_slot<T: SegmentItem, H: NativeSegmentHost>(
    sync: Weak<Mutex<PlatformViewSynchronizer<H>>>,
    element: WeakSegments<T>,
) -> impl Fn(&MirrorChange) + Send + Sync + 'static {
    move |change| {
        let Some(sync) = sync.upgrade() else { return };
        let selected = element.upgrade().and_then(|e| e.selection());
        sync.lock().apply_mirror_change(change, selected);
    }
}

fn selection_slot<T: SegmentItem, H: NativeSegmentHost>(
    sync: Weak<Mutex<PlatformViewSynchronizer<H>>>,
) -> impl Fn(&SelectedIndexChanged<T>) + Send + Sync + 'static {
    move |event| {
        if let Some(sync) = sync.upgrade() {
            sync.lock().apply_selection(event.selection());
        }
    }
}

fn property_slot<T: SegmentItem, H: NativeSegmentHost>(
    sync: Weak<Mutex<PlatformViewSynchronizer<H>>>,
    element: WeakSegments<T>,
) -> impl Fn(&SegmentsProperty) + Send + Sync + 'static {
    move |property| {
        let (Some(sync), Some(element)) = (sync.upgrade(), element.upgrade()) else {
            return;
        };
        let selected = element.selection();
        match property {
            SegmentsProperty::Color
            | SegmentsProperty::CornerRadius
            | SegmentsProperty::BackgroundColor
            | SegmentsProperty::Style => {
                let style = element.effective_style();
                sync.lock().apply_style(style, selected);
            }
            SegmentsProperty::DisplayMode => {
                let mode = element.display_mode();
                sync.lock().set_display_mode(mode, selected);
            }
            SegmentsProperty::Enabled => {
                let enabled = element.is_enabled();
                sync.lock().set_enabled(enabled);
            }
        }
    }
}

fn native_slot<T: SegmentItem, H: NativeSegmentHost>(
    sync: Weak<Mutex<PlatformViewSynchronizer<H>>>,
    element: WeakSegments<T>,
) -> impl Fn(&ViewId) + Send + Sync + 'static {
    move |view| {
        let ordinal = match sync.upgrade() {
            Some(sync) => sync.lock().check_from_native(*view),
            None => return,
        };
        let (Some(ordinal), Some(element)) = (ordinal, element.upgrade()) else {
            return;
        };
        if let Err(err) = element.on_segment_checked(ordinal) {
            tracing::warn!(target: targets::RENDERER, %err, ordinal, "native check not applied");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObservableList;
    use crate::platform::{AndroidSegmentHost, HostOp, IosSegmentHost, SegmentPosition};
    use crate::style::{Color, DisplayMode};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn android() -> SegmentsRenderer<String, AndroidSegmentHost> {
        SegmentsRenderer::for_host(AndroidSegmentHost::default())
    }

    #[test]
    fn test_set_element_populates_views() {
        let segments = Segments::<String>::from_items(["A", "B", "C"]);
        segments.set_selected_index(1).unwrap();
        let mut renderer = android();
        renderer.set_element(Some(segments));

        renderer.with_synchronizer(|sync| {
            assert_eq!(sync.texts(), strings(&["A", "B", "C"]));
            assert_eq!(
                sync.positions(),
                vec![SegmentPosition::Left, SegmentPosition::Middle, SegmentPosition::Right]
            );
            assert_eq!(sync.checked_ordinal(), Some(1));
        });
    }

    #[test]
    fn test_source_changes_reach_views() {
        let source = Arc::new(ObservableList::new(strings(&["A", "B"])));
        let segments = Segments::<String>::new();
        segments.set_items_source(Some(source.clone())).unwrap();
        segments.set_selected_index(1).unwrap();
        let mut renderer = android();
        renderer.set_element(Some(segments.clone()));

        source.insert(0, "N".into());
        renderer.with_synchronizer(|sync| {
            assert_eq!(sync.texts(), strings(&["N", "A", "B"]));
            assert_eq!(sync.checked_ordinal(), Some(2));
        });
    }

    #[test]
    fn test_tap_updates_element() {
        let segments = Segments::<String>::from_items(["A", "B"]);
        let mut renderer = android();
        renderer.set_element(Some(segments.clone()));

        assert!(renderer.tap(1));
        assert!(!renderer.tap(7));
        assert_eq!(segments.selected_index(), 1);
        let view = renderer.with_synchronizer(|sync| sync.view_at(1));
        assert_eq!(renderer.with_host(|host| host.checked_button_id()), view);
    }

    #[test]
    fn test_disabled_control_ignores_taps() {
        let segments = Segments::<String>::from_items(["A", "B"]);
        let mut renderer = android();
        renderer.set_element(Some(segments.clone()));
        segments.set_enabled(false);

        renderer.tap(0);
        assert_eq!(segments.selected_index(), -1);
        renderer.with_host(|host| assert!(!host.is_enabled()));
    }

    #[test]
    fn test_color_change_restyles() {
        let segments = Segments::<String>::from_items(["A", "B"]);
        let mut renderer = SegmentsRenderer::for_host(IosSegmentHost::new());
        renderer.set_element(Some(segments.clone()));

        let light_blue = Color::from_rgb8(0xAD, 0xD8, 0xE6);
        segments.set_color(light_blue);
        renderer.with_host(|host| assert_eq!(host.tint(), light_blue));
    }

    #[test]
    fn test_display_mode_change_rebuilds() {
        let segments = Segments::<String>::from_items(["A"]);
        let mut renderer = android();
        renderer.set_element(Some(segments.clone()));

        segments.set_display_mode(DisplayMode::Both);
        renderer.with_host(|host| {
            assert!(host.operations().contains(&HostOp::Cleared));
        });
    }

    #[test]
    fn test_swapping_element_releases_old_subscriptions() {
        let first = Segments::<String>::from_items(["A"]);
        let second = Segments::<String>::from_items(["X", "Y"]);
        let mut renderer = android();

        renderer.set_element(Some(first.clone()));
        assert_eq!(first.items_changed().connection_count(), 1);

        renderer.set_element(Some(second.clone()));
        assert_eq!(first.items_changed().connection_count(), 0);
        assert_eq!(first.selected_index_changed().connection_count(), 0);
        assert_eq!(second.items_changed().connection_count(), 1);

        first.add_item("B").unwrap();
        renderer.with_synchronizer(|sync| assert_eq!(sync.texts(), strings(&["X", "Y"])));
    }

    #[test]
    fn test_drop_disconnects() {
        let segments = Segments::<String>::from_items(["A"]);
        {
            let mut renderer = android();
            renderer.set_element(Some(segments.clone()));
            assert_eq!(segments.property_changed().connection_count(), 1);
        }
        assert_eq!(segments.property_changed().connection_count(), 0);
        segments.add_item("B").unwrap();
    }
}
