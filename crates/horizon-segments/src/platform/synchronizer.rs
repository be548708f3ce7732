//! Keeps a native host in step with a control's entries and selection.
//!
//! The synchronizer owns the host and a parallel list of segment records
//! (view id, display string, edge class). Mirror changes are applied
//! incrementally where possible: an insert or remove touches one view plus
//! the edge classes at the ends, and only a reset or a style change rebuilds
//! every view.
//!
//! Checked emphasis moves in a fixed order: the previously checked view is
//! unchecked before the new one is checked, so the host never shows two
//! checked segments.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use horizon_segments_core::logging::{span_names, targets};

use super::{NativeSegmentHost, SegmentContent, SegmentPosition, ViewId};
use crate::image::{ImageCompletion, ImageFetcher, ImageResolver, default_resolver};
use crate::model::MirrorChange;
use crate::style::{DisplayMode, SegmentStyle};

#[derive(Debug, Clone)]
struct SegmentRecord {
    view: ViewId,
    text: String,
    position: SegmentPosition,
}

/// Drives a [`NativeSegmentHost`] from mirror and selection changes.
pub struct PlatformViewSynchronizer<H: NativeSegmentHost> {
    host: H,
    records: Vec<SegmentRecord>,
    checked: Option<ViewId>,
    style: SegmentStyle,
    display_mode: DisplayMode,
    enabled: bool,
    resolver: ImageResolver,
    images: Option<ImageFetcher>,
    disposed: bool,
}

impl<H: NativeSegmentHost> PlatformViewSynchronizer<H> {
    pub fn new(host: H, style: SegmentStyle) -> Self {
        Self {
            host,
            records: Vec::new(),
            checked: None,
            style,
            display_mode: DisplayMode::default(),
            enabled: true,
            resolver: default_resolver(),
            images: None,
            disposed: false,
        }
    }

    /// Load images for image-mode segments with `fetcher`.
    pub fn with_images(mut self, fetcher: ImageFetcher) -> Self {
        self.images = Some(fetcher);
        self
    }

    /// Resolve display strings to images with `resolver`.
    pub fn with_image_resolver(mut self, resolver: ImageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn style(&self) -> &SegmentStyle {
        &self.style
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Edge classes of the segments in order.
    pub fn positions(&self) -> Vec<SegmentPosition> {
        self.records.iter().map(|r| r.position).collect()
    }

    /// Display strings of the segments in order.
    pub fn texts(&self) -> Vec<String> {
        self.records.iter().map(|r| r.text.clone()).collect()
    }

    pub fn view_ids(&self) -> Vec<ViewId> {
        self.records.iter().map(|r| r.view).collect()
    }

    pub fn view_at(&self, ordinal: usize) -> Option<ViewId> {
        self.records.get(ordinal).map(|r| r.view)
    }

    /// The view that currently has checked emphasis.
    pub fn checked_view(&self) -> Option<ViewId> {
        self.checked
    }

    pub fn checked_ordinal(&self) -> Option<usize> {
        let checked = self.checked?;
        self.records.iter().position(|r| r.view == checked)
    }

    /// Image loads still in flight.
    pub fn pending_images(&self) -> usize {
        self.images.as_ref().map_or(0, ImageFetcher::pending_count)
    }

    /// Build every view from scratch and style the container.
    pub fn populate(&mut self, entries: &[String], selected: Option<usize>) {
        if self.disposed {
            return;
        }
        self.host.apply_container_style(&self.style);
        self.host.set_enabled(self.enabled, &self.style);
        self.rebuild(entries, selected);
    }

    /// Apply one mirror change.
    ///
    /// `selected` is the control's selection after the change; it is used
    /// when the change forces a rebuild.
    pub fn apply_mirror_change(&mut self, change: &MirrorChange, selected: Option<usize>) {
        if self.disposed {
            return;
        }
        match change {
            MirrorChange::Inserted { index, text } => {
                let index = (*index).min(self.records.len());
                let position = SegmentPosition::for_ordinal(index, self.records.len() + 1);
                self.create_view(index, text, position);
                self.refresh_edges();
            }
            MirrorChange::Removed { index } => {
                self.remove_view(*index);
                self.refresh_edges();
            }
            MirrorChange::Reset { entries } => self.rebuild(entries, selected),
        }
    }

    /// Destroy every view and recreate one per entry.
    pub fn rebuild(&mut self, entries: &[String], selected: Option<usize>) {
        if self.disposed {
            return;
        }
        let _span = tracing::debug_span!(
            target: targets::SYNCHRONIZER,
            span_names::VIEW_REBUILD,
            platform = self.host.platform(),
            len = entries.len()
        )
        .entered();

        if let Some(images) = self.images.as_mut() {
            images.cancel_all();
        }
        self.host.remove_all();
        self.records.clear();
        self.checked = None;

        for (index, text) in entries.iter().enumerate() {
            let position = SegmentPosition::for_ordinal(index, entries.len());
            self.create_view(index, text, position);
        }
        self.apply_selection(selected);
    }

    fn create_view(&mut self, index: usize, text: &str, position: SegmentPosition) {
        let content = SegmentContent::for_mode(
            text,
            self.display_mode,
            self.host.supports_image_placement(),
            &self.resolver,
        );
        let view = self.host.insert_segment(index, &content, position, &self.style);
        self.records.insert(
            index,
            SegmentRecord {
                view,
                text: text.to_string(),
                position,
            },
        );

        if let (Some(source), Some(images)) = (content.image_source(), self.images.as_mut()) {
            images.request(view, source.clone());
        }
    }

    fn remove_view(&mut self, index: usize) {
        if index >= self.records.len() {
            tracing::warn!(
                target: targets::SYNCHRONIZER,
                index,
                len = self.records.len(),
                "remove for a segment that doesn't exist"
            );
            return;
        }
        let record = self.records.remove(index);
        if let Some(images) = self.images.as_mut() {
            images.cancel(record.view);
        }
        if self.checked == Some(record.view) {
            self.checked = None;
        }
        self.host.remove_segment(index);
    }

    /// Recompute edge classes where a length change can move them.
    fn refresh_edges(&mut self) {
        let len = self.records.len();
        let candidates: BTreeSet<usize> = [0, 1, len.saturating_sub(2), len.saturating_sub(1)]
            .into_iter()
            .filter(|&i| i < len)
            .collect();

        for index in candidates {
            let position = SegmentPosition::for_ordinal(index, len);
            let record = &mut self.records[index];
            if record.position != position {
                record.position = position;
                self.host.set_position(record.view, position, &self.style);
            }
        }
    }

    /// Move checked emphasis to `selected`.
    ///
    /// Touches at most the previously checked view and the new one.
    pub fn apply_selection(&mut self, selected: Option<usize>) {
        if self.disposed {
            return;
        }
        let target = selected.and_then(|index| self.records.get(index)).map(|r| r.view);
        if target == self.checked {
            return;
        }

        if let Some(previous) = self.checked.take() {
            self.host.set_checked(previous, false, &self.style);
        }
        if let Some(view) = target {
            self.host.set_checked(view, true, &self.style);
            self.checked = Some(view);
        }
        tracing::trace!(target: targets::SYNCHRONIZER, ?selected, "checked segment moved");
    }

    /// Handle a user touch on `view`.
    ///
    /// Returns the touched ordinal, or `None` when the touch is ignored
    /// because the control is disabled or the view is gone.
    pub fn check_from_native(&mut self, view: ViewId) -> Option<usize> {
        if self.disposed {
            return None;
        }
        if !self.enabled {
            tracing::debug!(target: targets::SYNCHRONIZER, ?view, "ignoring touch on disabled control");
            return None;
        }
        let ordinal = self.records.iter().position(|r| r.view == view)?;
        self.apply_selection(Some(ordinal));
        Some(ordinal)
    }

    /// Adopt an element's settings without touching existing views.
    ///
    /// Meant to be followed by [`populate`](Self::populate).
    pub fn configure(&mut self, style: SegmentStyle, mode: DisplayMode, enabled: bool) {
        self.style = style;
        self.display_mode = mode;
        self.enabled = enabled;
    }

    /// Switch to `style`, rebuilding every view if it differs.
    pub fn apply_style(&mut self, style: SegmentStyle, selected: Option<usize>) {
        if self.disposed || style == self.style {
            return;
        }
        self.style = style;
        self.host.apply_container_style(&self.style);
        let entries = self.texts();
        self.rebuild(&entries, selected);
    }

    /// Switch display mode, rebuilding every view if it differs.
    pub fn set_display_mode(&mut self, mode: DisplayMode, selected: Option<usize>) {
        if self.disposed || mode == self.display_mode {
            return;
        }
        self.display_mode = mode;
        let entries = self.texts();
        self.rebuild(&entries, selected);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.disposed || enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        self.host.set_enabled(enabled, &self.style);
    }

    /// Apply finished image loads without blocking.
    ///
    /// Returns the number of views updated.
    pub fn process_image_completions(&mut self) -> usize {
        let completions = match self.images.as_mut() {
            Some(images) => images.completed(),
            None => return 0,
        };
        self.apply_images(completions)
    }

    /// Wait up to `timeout` for image loads, then apply what arrived.
    pub fn wait_for_images(&mut self, timeout: Duration) -> usize {
        let completions = match self.images.as_mut() {
            Some(images) => images.wait_completed(timeout),
            None => return 0,
        };
        self.apply_images(completions)
    }

    fn apply_images(&mut self, completions: Vec<ImageCompletion>) -> usize {
        if self.disposed {
            return 0;
        }
        let mut applied = 0;
        for completion in completions {
            let view = completion.view;
            if !self.records.iter().any(|r| r.view == view) {
                tracing::debug!(target: targets::IMAGE, ?view, "image arrived for a destroyed segment");
                continue;
            }
            let image = match completion.result {
                Ok(image) => Some(image),
                Err(error) => {
                    tracing::warn!(target: targets::IMAGE, ?view, %error, "image failed, keeping placeholder");
                    None
                }
            };
            if self.host.set_image(view, image) {
                applied += 1;
            }
        }
        applied
    }

    /// Destroy every view and cancel image loads. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(mut images) = self.images.take() {
            images.cancel_all();
        }
        self.host.remove_all();
        self.records.clear();
        self.checked = None;
        tracing::debug!(target: targets::SYNCHRONIZER, platform = self.host.platform(), "synchronizer disposed");
    }
}

impl<H: NativeSegmentHost> fmt::Debug for PlatformViewSynchronizer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformViewSynchronizer")
            .field("platform", &self.host.platform())
            .field("records", &self.records)
            .field("checked", &self.checked)
            .field("display_mode", &self.display_mode)
            .field("enabled", &self.enabled)
            .field("disposed", &self.disposed)
            .finish()
    }
}
