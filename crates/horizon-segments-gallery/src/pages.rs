//! Gallery pages.
//!
//! Each page builds its controls, renders them through a native host and
//! drives them the way a user would, logging what the host ends up showing.

use std::sync::Arc;
use std::time::Duration;

use horizon_segments::image::ImageFetcher;
use horizon_segments::prelude::*;
use horizon_segments_core::{AsyncRuntime, ConnectionGuard};
use parking_lot::Mutex;

use crate::config::{AndroidPageConfig, GalleryConfig, GalleryError, Step, StepperConfig};

/// How long the image variant waits for its icons.
const IMAGE_WAIT: Duration = Duration::from_secs(5);

/// What the core page ended up showing.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreReport {
    pub color_tint: Color,
    pub image_segments: usize,
    pub images_applied: usize,
    pub selections: Vec<i32>,
}

/// The core gallery page: a color variant, an image variant and a
/// selected-index variant sharing one items list.
pub fn run_core_page(config: &GalleryConfig) -> Result<CoreReport, GalleryError> {
    let page = &config.core;
    let items = Arc::new(ObservableList::new(page.items.clone()));

    // Color
    let colored = Segments::<String>::with_config(&config.segments);
    colored.set_color(page.color.parse()?);
    colored.set_items_source(Some(items.clone()))?;
    let mut color_renderer = SegmentsRenderer::for_host(IosSegmentHost::new());
    color_renderer.set_element(Some(colored.clone()));
    let color_tint = color_renderer.with_host(|host| host.tint());
    tracing::info!(tint = %color_tint, "color variant rendered");

    // Image
    let icons = Segments::<String>::with_config(&config.segments);
    icons.set_display_mode(DisplayMode::Image);
    icons.set_items_source(Some(Arc::new(StaticList::new(page.icons.clone()))))?;
    let fetcher = ImageFetcher::with_default_service(AsyncRuntime::global()?.clone());
    let sync = PlatformViewSynchronizer::new(AndroidSegmentHost::default(), SegmentStyle::default()).with_images(fetcher);
    let mut image_renderer = SegmentsRenderer::new(sync);
    image_renderer.set_element(Some(icons));
    let mut images_applied = 0;
    while image_renderer.with_synchronizer(|sync| sync.pending_images()) > 0 {
        let applied = image_renderer.wait_for_images(IMAGE_WAIT);
        if applied == 0 {
            tracing::warn!("icons did not arrive in time");
            break;
        }
        images_applied += applied;
    }
    let image_segments = image_renderer.with_synchronizer(|sync| sync.len());
    tracing::info!(image_segments, images_applied, "image variant rendered");

    // SelectedIndexChanged
    let selectable = Segments::<String>::with_config(&config.segments);
    selectable.set_items_source(Some(items))?;
    let selections = Arc::new(Mutex::new(Vec::new()));
    let selections_clone = selections.clone();
    selectable.selected_index_changed().connect(move |event| {
        tracing::info!(index = event.index, previous = event.previous, "selected index changed");
        selections_clone.lock().push(event.index);
    });
    let mut select_renderer = SegmentsRenderer::for_host(AndroidSegmentHost::default());
    select_renderer.set_element(Some(selectable));
    for &ordinal in &page.taps {
        if !select_renderer.tap(ordinal) {
            tracing::warn!(ordinal, "no segment to tap");
        }
    }

    let selections = selections.lock().clone();
    Ok(CoreReport {
        color_tint,
        image_segments,
        images_applied,
        selections,
    })
}

/// A numeric up/down control.
pub struct Stepper {
    minimum: f64,
    maximum: f64,
    increment: f64,
    value: Property<f64>,
    value_changed: Arc<Signal<f64>>,
}

impl Stepper {
    pub fn new(config: StepperConfig) -> Self {
        let value = config.value.clamp(config.minimum, config.maximum);
        Self {
            minimum: config.minimum,
            maximum: config.maximum,
            increment: config.increment,
            value: Property::named("value", value),
            value_changed: Arc::new(Signal::new()),
        }
    }

    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn value_changed(&self) -> &Arc<Signal<f64>> {
        &self.value_changed
    }

    /// Set the value, clamped to the stepper's range.
    pub fn set_value(&self, value: f64) {
        let value = value.clamp(self.minimum, self.maximum);
        if self.value.set(value) {
            self.value_changed.emit(value);
        }
    }

    pub fn press(&self, step: Step) {
        let delta = match step {
            Step::Up => self.increment,
            Step::Down => -self.increment,
        };
        self.set_value(self.value() + delta);
    }
}

/// The Android corner-radius page: a stepper driving the control's corner
/// radius, with a label echoing the value.
pub struct AndroidPage {
    element: Segments<String>,
    renderer: SegmentsRenderer<String, AndroidSegmentHost>,
    stepper: Stepper,
    radius_label: Arc<Mutex<String>>,
    connection: Option<ConnectionGuard<f64>>,
}

impl AndroidPage {
    pub fn new(config: &AndroidPageConfig) -> Self {
        let element = Segments::<String>::from_items(config.items.iter().cloned());
        let mut renderer = SegmentsRenderer::for_host(AndroidSegmentHost::new(config.density));
        renderer.set_element(Some(element.clone()));

        let stepper = Stepper::new(config.stepper);
        let radius_label = Arc::new(Mutex::new(String::new()));
        let label = radius_label.clone();
        let target = element.downgrade();
        let connection = stepper.value_changed().connect_scoped(move |&radius| {
            let Some(element) = target.upgrade() else { return };
            if let Err(err) = element.set_corner_radius(radius) {
                tracing::warn!(%err, radius, "corner radius rejected");
                return;
            }
            *label.lock() = radius.to_string();
        });

        Self {
            element,
            renderer,
            stepper,
            radius_label,
            connection: Some(connection),
        }
    }

    pub fn element(&self) -> &Segments<String> {
        &self.element
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    pub fn radius_label(&self) -> String {
        self.radius_label.lock().clone()
    }

    /// Top-left corner radius of the first segment, in pixels.
    pub fn first_segment_radius(&self) -> Option<f32> {
        self.renderer
            .with_host(|host| host.button(0).map(|b| b.drawable.unchecked.corner_radii[0]))
    }

    /// Press the stepper through `steps`, returning the rendered radius
    /// after each press.
    pub fn run(&self, steps: &[Step]) -> Vec<Option<f32>> {
        steps
            .iter()
            .map(|&step| {
                self.stepper.press(step);
                let radius = self.first_segment_radius();
                tracing::info!(label = %self.radius_label(), ?radius, "corner radius stepped");
                radius
            })
            .collect()
    }

    /// Stop listening to the stepper.
    pub fn on_disappearing(&mut self) {
        self.connection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> GalleryConfig {
        GalleryConfig::default()
    }

    #[test]
    fn test_core_page_without_icons() {
        let mut config = quiet_config();
        config.core.taps = vec![1, 2, 9];

        let report = run_core_page(&config).unwrap();
        assert_eq!(report.color_tint, Color::from_rgb8(0xAD, 0xD8, 0xE6));
        assert_eq!(report.image_segments, 0);
        assert_eq!(report.selections, vec![1, 2]);
    }

    #[test]
    fn test_stepper_clamps() {
        let stepper = Stepper::new(StepperConfig {
            minimum: 0.0,
            maximum: 2.0,
            value: 1.0,
            increment: 1.0,
        });
        stepper.press(Step::Up);
        stepper.press(Step::Up);
        assert_eq!(stepper.value(), 2.0);
        stepper.set_value(-5.0);
        assert_eq!(stepper.value(), 0.0);
    }

    #[test]
    fn test_android_page_steps_corner_radius() {
        let config = AndroidPageConfig {
            density: 2.0,
            ..AndroidPageConfig::default()
        };
        let mut page = AndroidPage::new(&config);
        assert_eq!(page.first_segment_radius(), Some(12.0));

        let radii = page.run(&[Step::Up, Step::Up, Step::Down]);
        assert_eq!(radii, vec![Some(18.0), Some(20.0), Some(18.0)]);
        assert_eq!(page.radius_label(), "9");
        assert_eq!(page.element().corner_radius(), 9.0);

        page.on_disappearing();
        page.stepper().press(Step::Up);
        assert_eq!(page.element().corner_radius(), 9.0);
    }
}
