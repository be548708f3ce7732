//! iOS host: a native segmented control.
//!
//! The segmented control draws its own rounded ends, so edge classes only
//! matter to the synchronizer's bookkeeping here. Selection is a single
//! `selected_segment` ordinal, `-1` when nothing is selected.

use std::sync::Arc;

use horizon_segments_core::Signal;

use super::{HostJournal, HostOp, NativeSegmentHost, SegmentContent, SegmentPosition, ViewId};
use crate::image::NativeImage;
use crate::style::{Color, SegmentStyle};

/// One segment of the native control.
#[derive(Debug, Clone)]
pub struct IosSegment {
    pub id: ViewId,
    pub title: Option<String>,
    pub image: Option<NativeImage>,
    /// Whether the segment was created for an image.
    pub wants_image: bool,
}

/// The iOS segmented-control host.
pub struct IosSegmentHost {
    segments: Vec<IosSegment>,
    selected_segment: i32,
    tint: Color,
    selected_segment_tint: Color,
    background: Color,
    corner_radius: f32,
    enabled: bool,
    value_changed: Arc<Signal<ViewId>>,
    operations: HostJournal,
}

impl IosSegmentHost {
    pub fn new() -> Self {
        let style = SegmentStyle::default();
        Self {
            segments: Vec::new(),
            selected_segment: -1,
            tint: style.tint,
            selected_segment_tint: style.tint,
            background: style.background,
            corner_radius: style.corner_radius,
            enabled: true,
            value_changed: Arc::new(Signal::new()),
            operations: HostJournal::default(),
        }
    }

    pub fn segment(&self, ordinal: usize) -> Option<&IosSegment> {
        self.segments.get(ordinal)
    }

    /// Titles in order; image-only segments report `None`.
    pub fn titles(&self) -> Vec<Option<String>> {
        self.segments.iter().map(|s| s.title.clone()).collect()
    }

    /// The selected ordinal, `-1` when nothing is selected.
    pub fn selected_segment(&self) -> i32 {
        self.selected_segment
    }

    pub fn tint(&self) -> Color {
        self.tint
    }

    pub fn selected_segment_tint(&self) -> Color {
        self.selected_segment_tint
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn selected_ordinal(&self) -> Option<usize> {
        usize::try_from(self.selected_segment).ok()
    }

    fn select_ordinal(&mut self, ordinal: Option<usize>) {
        self.selected_segment = ordinal
            .and_then(|o| i32::try_from(o).ok())
            .unwrap_or(-1);
    }
}

impl Default for IosSegmentHost {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeSegmentHost for IosSegmentHost {
    fn platform(&self) -> &'static str {
        "ios"
    }

    fn supports_image_placement(&self) -> bool {
        false
    }

    fn insert_segment(
        &mut self,
        ordinal: usize,
        content: &SegmentContent,
        _position: SegmentPosition,
        _style: &SegmentStyle,
    ) -> ViewId {
        let id = ViewId::next();
        let ordinal = ordinal.min(self.segments.len());
        self.segments.insert(
            ordinal,
            IosSegment {
                id,
                title: content.label.clone(),
                image: None,
                wants_image: content.image.is_some(),
            },
        );
        // The native control shifts its selection along with inserted segments.
        if let Some(selected) = self.selected_ordinal().filter(|s| *s >= ordinal) {
            self.select_ordinal(Some(selected + 1));
        }
        self.operations.record(HostOp::Inserted { ordinal, view: id });
        id
    }

    fn remove_segment(&mut self, ordinal: usize) -> Option<ViewId> {
        if ordinal >= self.segments.len() {
            return None;
        }
        let view = self.segments.remove(ordinal).id;
        match self.selected_ordinal() {
            Some(selected) if selected == ordinal => self.select_ordinal(None),
            Some(selected) if selected > ordinal => self.select_ordinal(Some(selected - 1)),
            _ => {}
        }
        self.operations.record(HostOp::Removed { ordinal, view });
        Some(view)
    }

    fn remove_all(&mut self) {
        self.segments.clear();
        self.selected_segment = -1;
        self.operations.record(HostOp::Cleared);
    }

    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn view_at(&self, ordinal: usize) -> Option<ViewId> {
        self.segments.get(ordinal).map(|s| s.id)
    }

    fn ordinal_of(&self, view: ViewId) -> Option<usize> {
        self.segments.iter().position(|s| s.id == view)
    }

    fn set_position(&mut self, view: ViewId, position: SegmentPosition, _style: &SegmentStyle) {
        if self.ordinal_of(view).is_some() {
            self.operations.record(HostOp::Repositioned { view, position });
        }
    }

    fn set_checked(&mut self, view: ViewId, checked: bool, _style: &SegmentStyle) {
        let Some(ordinal) = self.ordinal_of(view) else {
            return;
        };
        if checked {
            self.select_ordinal(Some(ordinal));
            self.operations.record(HostOp::Checked(view));
        } else {
            if self.selected_ordinal() == Some(ordinal) {
                self.select_ordinal(None);
            }
            self.operations.record(HostOp::Unchecked(view));
        }
    }

    fn is_checked(&self, view: ViewId) -> bool {
        self.selected_ordinal()
            .is_some_and(|selected| self.view_at(selected) == Some(view))
    }

    fn set_image(&mut self, view: ViewId, image: Option<NativeImage>) -> bool {
        let Some(segment) = self.segments.iter_mut().find(|s| s.id == view) else {
            return false;
        };
        let loaded = image.is_some();
        segment.image = image;
        self.operations.record(HostOp::ImageSet { view, loaded });
        true
    }

    fn set_enabled(&mut self, enabled: bool, style: &SegmentStyle) {
        self.enabled = enabled;
        self.tint = style.effective_tint(enabled);
        self.selected_segment_tint = self.tint;
        self.operations.record(HostOp::Enabled(enabled));
    }

    fn apply_container_style(&mut self, style: &SegmentStyle) {
        self.tint = style.effective_tint(self.enabled);
        self.selected_segment_tint = self.tint;
        self.background = style.background;
        self.corner_radius = style.corner_radius;
        self.operations.record(HostOp::Restyled);
    }

    fn checked_events(&self) -> Arc<Signal<ViewId>> {
        self.value_changed.clone()
    }

    fn operations(&self) -> &[HostOp] {
        self.operations.as_slice()
    }

    fn clear_operations(&mut self) {
        self.operations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with(titles: &[&str]) -> (IosSegmentHost, Vec<ViewId>) {
        let style = SegmentStyle::default();
        let mut host = IosSegmentHost::new();
        let views = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let position = SegmentPosition::for_ordinal(i, titles.len());
                host.insert_segment(i, &SegmentContent::text(*title), position, &style)
            })
            .collect();
        (host, views)
    }

    #[test]
    fn test_selected_segment_tracks_checks() {
        let style = SegmentStyle::default();
        let (mut host, views) = host_with(&["A", "B", "C"]);
        assert_eq!(host.selected_segment(), -1);

        host.set_checked(views[2], true, &style);
        assert_eq!(host.selected_segment(), 2);

        host.set_checked(views[1], false, &style);
        assert_eq!(host.selected_segment(), 2);

        host.set_checked(views[2], false, &style);
        assert_eq!(host.selected_segment(), -1);
    }

    #[test]
    fn test_removal_shifts_selection() {
        let style = SegmentStyle::default();
        let (mut host, views) = host_with(&["A", "B", "C"]);
        host.set_checked(views[2], true, &style);

        host.remove_segment(0);
        assert_eq!(host.selected_segment(), 1);
        assert!(host.is_checked(views[2]));

        host.remove_segment(1);
        assert_eq!(host.selected_segment(), -1);
    }

    #[test]
    fn test_tint_follows_style() {
        let mut host = IosSegmentHost::new();
        let style = SegmentStyle::default().with_tint(Color::BLACK);
        host.apply_container_style(&style);
        assert_eq!(host.selected_segment_tint(), Color::BLACK);

        host.set_enabled(false, &style);
        assert_eq!(host.tint(), Color::GRAY);
    }
}
