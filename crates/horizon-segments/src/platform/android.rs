//! Android host: a horizontal radio group of styled buttons.
//!
//! Each segment is a button whose background is a [`SegmentDrawable`], a pair
//! of rounded-rectangle shapes for the checked and unchecked states. The
//! corners that get rounded depend on the segment's [`SegmentPosition`], and
//! every segment after the first is inset left by the stroke width so
//! neighbouring outlines overlap instead of doubling up.
//!
//! Sizes in [`SegmentStyle`] are density-independent; the host converts them
//! to pixels with its display density.

use std::sync::Arc;

use horizon_segments_core::Signal;
use horizon_segments_core::logging::targets;

use super::{HostJournal, HostOp, ImagePlacement, NativeSegmentHost, SegmentContent, SegmentPosition, ViewId};
use crate::image::NativeImage;
use crate::style::{Color, SegmentStyle};

/// One state of a segment background.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    /// Top-left, top-right, bottom-right, bottom-left; x and y radius each.
    pub corner_radii: [f32; 8],
    pub inset_left: f32,
}

/// Checked and unchecked backgrounds of a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDrawable {
    pub checked: ShapeStyle,
    pub unchecked: ShapeStyle,
}

impl SegmentDrawable {
    /// Build the backgrounds for a segment at `position`, in pixels.
    pub fn new(position: SegmentPosition, style: &SegmentStyle, density: f32, enabled: bool) -> Self {
        let stroke_width = (style.stroke_width * density).trunc();
        let radius = (style.corner_radius * density).trunc();
        let corner_radii = match position {
            SegmentPosition::Left => [radius, radius, 0.0, 0.0, 0.0, 0.0, radius, radius],
            SegmentPosition::Right => [0.0, 0.0, radius, radius, radius, radius, 0.0, 0.0],
            SegmentPosition::Middle => [0.0; 8],
        };
        let inset_left = match position {
            SegmentPosition::Left => 0.0,
            SegmentPosition::Middle | SegmentPosition::Right => -stroke_width,
        };
        let stroke = style.effective_tint(enabled);
        let shape = |fill| ShapeStyle {
            fill,
            stroke,
            stroke_width,
            corner_radii,
            inset_left,
        };

        Self {
            checked: shape(style.fill(true, enabled)),
            unchecked: shape(style.fill(false, enabled)),
        }
    }

    /// The shape shown for the given checked state.
    pub fn current(&self, checked: bool) -> &ShapeStyle {
        if checked { &self.checked } else { &self.unchecked }
    }
}

/// A segment button inside the radio group.
#[derive(Debug, Clone)]
pub struct SegmentButton {
    pub id: ViewId,
    pub text: Option<String>,
    pub image: Option<NativeImage>,
    pub image_placement: Option<ImagePlacement>,
    pub position: SegmentPosition,
    pub drawable: SegmentDrawable,
    pub text_color: Color,
    pub checked: bool,
    pub height_px: f32,
    pub text_size_sp: f32,
    pub all_caps: bool,
    pub bold: bool,
}

/// The Android radio-group host.
pub struct AndroidSegmentHost {
    density: f32,
    buttons: Vec<SegmentButton>,
    background: Color,
    enabled: bool,
    checked_changed: Arc<Signal<ViewId>>,
    operations: HostJournal,
}

impl AndroidSegmentHost {
    /// A host for a display with the given density (pixels per dp).
    pub fn new(density: f32) -> Self {
        Self {
            density,
            buttons: Vec::new(),
            background: Color::WHITE,
            enabled: true,
            checked_changed: Arc::new(Signal::new()),
            operations: HostJournal::default(),
        }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    /// The button at `ordinal`.
    pub fn button(&self, ordinal: usize) -> Option<&SegmentButton> {
        self.buttons.get(ordinal)
    }

    pub fn buttons(&self) -> &[SegmentButton] {
        &self.buttons
    }

    /// The checked button, like `RadioGroup.CheckedRadioButtonId`.
    pub fn checked_button_id(&self) -> Option<ViewId> {
        self.buttons.iter().find(|b| b.checked).map(|b| b.id)
    }

    /// Container background color.
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn paint(button: &mut SegmentButton, style: &SegmentStyle, density: f32, enabled: bool) {
        button.drawable = SegmentDrawable::new(button.position, style, density, enabled);
        button.text_color = style.text_color(button.checked, enabled);
        button.height_px = (style.control_height * density).trunc();
        button.text_size_sp = style.text_size;
    }

    fn repaint_all(&mut self, style: &SegmentStyle) {
        let (density, enabled) = (self.density, self.enabled);
        for button in &mut self.buttons {
            Self::paint(button, style, density, enabled);
        }
    }
}

impl Default for AndroidSegmentHost {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl NativeSegmentHost for AndroidSegmentHost {
    fn platform(&self) -> &'static str {
        "android"
    }

    fn supports_image_placement(&self) -> bool {
        true
    }

    fn insert_segment(
        &mut self,
        ordinal: usize,
        content: &SegmentContent,
        position: SegmentPosition,
        style: &SegmentStyle,
    ) -> ViewId {
        let id = ViewId::next();
        let mut button = SegmentButton {
            id,
            text: content.label.clone(),
            image: None,
            image_placement: content.image.as_ref().map(|(_, placement)| *placement),
            position,
            drawable: SegmentDrawable::new(position, style, self.density, self.enabled),
            text_color: Color::TRANSPARENT,
            checked: false,
            height_px: 0.0,
            text_size_sp: 0.0,
            all_caps: true,
            bold: true,
        };
        Self::paint(&mut button, style, self.density, self.enabled);

        let ordinal = ordinal.min(self.buttons.len());
        self.buttons.insert(ordinal, button);
        self.operations.record(HostOp::Inserted { ordinal, view: id });
        tracing::trace!(target: targets::SYNCHRONIZER, ordinal, ?id, "android segment added");
        id
    }

    fn remove_segment(&mut self, ordinal: usize) -> Option<ViewId> {
        if ordinal >= self.buttons.len() {
            return None;
        }
        let view = self.buttons.remove(ordinal).id;
        self.operations.record(HostOp::Removed { ordinal, view });
        Some(view)
    }

    fn remove_all(&mut self) {
        self.buttons.clear();
        self.operations.record(HostOp::Cleared);
    }

    fn segment_count(&self) -> usize {
        self.buttons.len()
    }

    fn view_at(&self, ordinal: usize) -> Option<ViewId> {
        self.buttons.get(ordinal).map(|b| b.id)
    }

    fn ordinal_of(&self, view: ViewId) -> Option<usize> {
        self.buttons.iter().position(|b| b.id == view)
    }

    fn set_position(&mut self, view: ViewId, position: SegmentPosition, style: &SegmentStyle) {
        let (density, enabled) = (self.density, self.enabled);
        if let Some(button) = self.buttons.iter_mut().find(|b| b.id == view) {
            button.position = position;
            Self::paint(button, style, density, enabled);
            self.operations.record(HostOp::Repositioned { view, position });
        }
    }

    fn set_checked(&mut self, view: ViewId, checked: bool, style: &SegmentStyle) {
        let enabled = self.enabled;
        if let Some(button) = self.buttons.iter_mut().find(|b| b.id == view) {
            button.checked = checked;
            button.text_color = style.text_color(checked, enabled);
            self.operations.record(if checked {
                HostOp::Checked(view)
            } else {
                HostOp::Unchecked(view)
            });
        }
    }

    fn is_checked(&self, view: ViewId) -> bool {
        self.buttons.iter().any(|b| b.id == view && b.checked)
    }

    fn set_image(&mut self, view: ViewId, image: Option<NativeImage>) -> bool {
        let Some(button) = self.buttons.iter_mut().find(|b| b.id == view) else {
            return false;
        };
        let loaded = image.is_some();
        button.image = image;
        self.operations.record(HostOp::ImageSet { view, loaded });
        true
    }

    fn set_enabled(&mut self, enabled: bool, style: &SegmentStyle) {
        self.enabled = enabled;
        self.repaint_all(style);
        self.operations.record(HostOp::Enabled(enabled));
    }

    fn apply_container_style(&mut self, style: &SegmentStyle) {
        self.background = style.background;
        self.repaint_all(style);
        self.operations.record(HostOp::Restyled);
    }

    fn checked_events(&self) -> Arc<Signal<ViewId>> {
        self.checked_changed.clone()
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

    #[test]
    fn test_drawable_corners_follow_position() {
        let style = SegmentStyle::default();
        let left = SegmentDrawable::new(SegmentPosition::Left, &style, 2.0, true);
        assert_eq!(left.checked.corner_radii, [12.0, 12.0, 0.0, 0.0, 0.0, 0.0, 12.0, 12.0]);
        assert_eq!(left.checked.inset_left, 0.0);

        let middle = SegmentDrawable::new(SegmentPosition::Middle, &style, 2.0, true);
        assert_eq!(middle.unchecked.corner_radii, [0.0; 8]);
        assert_eq!(middle.unchecked.inset_left, -6.0);

        let right = SegmentDrawable::new(SegmentPosition::Right, &style, 2.0, true);
        assert_eq!(right.checked.corner_radii, [0.0, 0.0, 12.0, 12.0, 12.0, 12.0, 0.0, 0.0]);
    }

    #[test]
    fn test_drawable_colors() {
        let style = SegmentStyle::default();
        let drawable = SegmentDrawable::new(SegmentPosition::Middle, &style, 1.0, true);
        assert_eq!(drawable.current(true).fill, style.tint);
        assert_eq!(drawable.current(false).fill, Color::WHITE);
        assert_eq!(drawable.current(false).stroke, style.tint);

        let disabled = SegmentDrawable::new(SegmentPosition::Middle, &style, 1.0, false);
        assert_eq!(disabled.current(true).fill, Color::GRAY);
        assert_eq!(disabled.current(false).stroke, Color::GRAY);
    }

    #[test]
    fn test_check_updates_text_color() {
        let style = SegmentStyle::default();
        let mut host = AndroidSegmentHost::new(1.0);
        let view = host.insert_segment(0, &SegmentContent::text("View A"), SegmentPosition::Left, &style);

        assert_eq!(host.button(0).unwrap().text_color, style.tint);
        host.set_checked(view, true, &style);
        assert_eq!(host.button(0).unwrap().text_color, Color::WHITE);
        assert_eq!(host.checked_button_id(), Some(view));
        assert!(host.button(0).unwrap().all_caps);
    }

    #[test]
    fn test_removed_view_rejects_image() {
        let style = SegmentStyle::default();
        let mut host = AndroidSegmentHost::default();
        let view = host.insert_segment(0, &SegmentContent::text("A"), SegmentPosition::Left, &style);
        assert_eq!(host.remove_segment(0), Some(view));
        assert!(!host.set_image(view, None));
        assert_eq!(host.remove_segment(0), None);
    }
}
