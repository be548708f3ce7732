//! Gallery configuration.

use std::path::Path;

use horizon_segments::SegmentsConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("failed to read gallery configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid gallery configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Segments(#[from] horizon_segments::SegmentsError),

    #[error(transparent)]
    Runtime(#[from] horizon_segments_core::RuntimeError),

    #[error(transparent)]
    Color(#[from] horizon_segments::style::ParseColorError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub core: CorePageConfig,
    pub android: AndroidPageConfig,
    pub segments: SegmentsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorePageConfig {
    pub items: Vec<String>,
    /// Tint of the color variant, `#RRGGBB`.
    pub color: String,
    /// Image descriptors shown by the image variant.
    pub icons: Vec<String>,
    /// Ordinals tapped on the selected-index variant.
    pub taps: Vec<usize>,
}

impl Default for CorePageConfig {
    fn default() -> Self {
        Self {
            items: vec!["View A".into(), "View B".into(), "View C".into()],
            color: "#ADD8E6".into(),
            icons: Vec::new(),
            taps: vec![1],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AndroidPageConfig {
    pub items: Vec<String>,
    pub density: f32,
    pub stepper: StepperConfig,
    pub steps: Vec<Step>,
}

impl Default for AndroidPageConfig {
    fn default() -> Self {
        Self {
            items: vec!["Item 1".into(), "Item 2".into(), "Item 3".into()],
            density: 1.0,
            stepper: StepperConfig::default(),
            steps: vec![Step::Up, Step::Down],
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    pub minimum: f64,
    pub maximum: f64,
    pub value: f64,
    pub increment: f64,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            minimum: 0.0,
            maximum: 100.0,
            value: 8.0,
            increment: 1.0,
        }
    }
}

/// A scripted stepper press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Up,
    Down,
}

impl GalleryConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, GalleryError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GalleryError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
