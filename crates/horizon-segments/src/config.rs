//! TOML configuration for segmented controls.
//!
//! ```toml
//! display_mode = "text"
//! initial_selection = "first"
//!
//! [style]
//! tint = "#0E62FF"
//! corner_radius = 8.0
//! ```
//!
//! Every key is optional; missing keys take the [`SegmentStyle`] defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SegmentsResult;
use crate::model::InitialSelection;
use crate::style::{DisplayMode, SegmentStyle};

/// Construction-time settings for a [`Segments`](crate::Segments) control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentsConfig {
    pub style: SegmentStyle,
    pub display_mode: DisplayMode,
    pub initial_selection: InitialSelection,
}

impl SegmentsConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> SegmentsResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> SegmentsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded segments configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::SegmentsError;
    use crate::style::Color;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SegmentsConfig::from_toml_str("").unwrap();
        assert_eq!(config, SegmentsConfig::default());
        assert_eq!(config.initial_selection, InitialSelection::None);
    }

    #[test]
    fn test_partial_style() {
        let config = SegmentsConfig::from_toml_str(
            r##"
            display_mode = "image_left"
            initial_selection = "first"

            [style]
            tint = "#ADD8E6"
            corner_radius = 8.0
            "##,
        )
        .unwrap();

        assert_eq!(config.display_mode, DisplayMode::ImageLeft);
        assert_eq!(config.initial_selection, InitialSelection::First);
        assert_eq!(config.style.tint, Color::from_rgb8(0xAD, 0xD8, 0xE6));
        assert_eq!(config.style.corner_radius, 8.0);
        assert_eq!(config.style.stroke_width, 3.0);
    }

    #[test]
    fn test_bad_color_is_config_error() {
        let err = SegmentsConfig::from_toml_str("[style]\ntint = \"teal\"").unwrap_err();
        assert!(matches!(err, SegmentsError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "display_mode = \"both\"").unwrap();

        let config = SegmentsConfig::load(file.path()).unwrap();
        assert_eq!(config.display_mode, DisplayMode::Both);

        let missing = SegmentsConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(SegmentsError::Io(_))));
    }
}
