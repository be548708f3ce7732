//! Colors, display modes and the per-instance segment style.
//!
//! A [`SegmentStyle`] carries everything the platform hosts need to paint a
//! segment. Each control owns its own style, so two controls on the same page
//! can be tinted independently.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An RGBA color with non-premultiplied components in the `0.0..=1.0` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// A color string that isn't `#RRGGBB` or `#RRGGBBAA`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color `{0}`, expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError(pub String);

impl Color {
    /// Create a color from RGBA components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from 8-bit RGBA components.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Create an opaque color from 8-bit RGB components.
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Create a color from a hex string (e.g., "#FF0000" or "#FF0000FF").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let len = hex.len();

        if (len != 6 && len != 8) || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        let a = if len == 8 {
            u8::from_str_radix(&hex[6..8], 16).ok()?
        } else {
            255
        };

        Some(Self::from_rgba8(r, g, b, a))
    }

    /// Convert to 8-bit RGBA components.
    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Return a new color with modified alpha.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::from_rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GRAY: Self = Self::from_rgb(0.75, 0.75, 0.75);
    /// The default segment tint, `#0E62FF`.
    pub const TINT_BLUE: Self = Self::from_rgb(14.0 / 255.0, 98.0 / 255.0, 1.0);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim()).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// How each segment presents its display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// The display string is the label.
    #[default]
    Text,
    /// The display string is an image descriptor; no label.
    Image,
    /// Label plus image, image placed at the platform's default side.
    Both,
    /// Label with the image to its left.
    ImageLeft,
    /// Label with the image to its right.
    ImageRight,
    /// Label with the image above it.
    ImageTop,
    /// Label with the image below it.
    ImageBottom,
}

impl DisplayMode {
    /// Whether segments in this mode load an image.
    pub fn shows_image(self) -> bool {
        !matches!(self, DisplayMode::Text)
    }

    /// Whether segments in this mode show a text label.
    pub fn shows_label(self) -> bool {
        !matches!(self, DisplayMode::Image)
    }
}

/// Visual parameters shared by every segment of one control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentStyle {
    /// Fill of the selected segment and the outline stroke.
    pub tint: Color,
    /// Fill of unselected segments and the control background.
    pub background: Color,
    /// Label color of the selected segment.
    pub selected_text: Color,
    /// Label color of unselected segments; the tint when unset.
    pub unselected_text: Option<Color>,
    /// Replaces the tint while the control is disabled.
    pub disabled: Color,
    pub stroke_width: f32,
    pub corner_radius: f32,
    pub control_height: f32,
    pub text_size: f32,
}

impl Default for SegmentStyle {
    fn default() -> Self {
        Self {
            tint: Color::TINT_BLUE,
            background: Color::WHITE,
            selected_text: Color::WHITE,
            unselected_text: None,
            disabled: Color::GRAY,
            stroke_width: 3.0,
            corner_radius: 6.0,
            control_height: 30.0,
            text_size: 15.0,
        }
    }
}

impl SegmentStyle {
    /// The tint in effect for the given enabled state.
    pub fn effective_tint(&self, enabled: bool) -> Color {
        if enabled { self.tint } else { self.disabled }
    }

    /// Fill color of a segment.
    pub fn fill(&self, checked: bool, enabled: bool) -> Color {
        if checked {
            self.effective_tint(enabled)
        } else {
            self.background
        }
    }

    /// Label color of a segment.
    pub fn text_color(&self, checked: bool, enabled: bool) -> Color {
        if checked {
            self.selected_text
        } else if !enabled {
            self.disabled
        } else {
            self.unselected_text.unwrap_or(self.tint)
        }
    }

    /// Copy of this style with a different tint.
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Copy of this style with a different corner radius.
    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }
}

/// Checks that a corner radius is finite and not negative.
pub fn validate_corner_radius(radius: &f64) -> Result<(), String> {
    if !radius.is_finite() {
        Err(format!("{radius} is not a finite number"))
    } else if *radius < 0.0 {
        Err(format!("{radius} is negative"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let tint = Color::from_hex("#0E62FF").unwrap();
        assert_eq!(tint.to_rgba8(), [14, 98, 255, 255]);
        assert_eq!(tint.to_hex(), "#0E62FF");

        let translucent: Color = "#FFFFFF80".parse().unwrap();
        assert_eq!(translucent.to_rgba8()[3], 128);
        assert_eq!(translucent.to_hex(), "#FFFFFF80");

        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#GG0000").is_none());
        assert!("blue".parse::<Color>().is_err());
    }

    #[test]
    fn test_default_style() {
        let style = SegmentStyle::default();
        assert_eq!(style.tint.to_hex(), "#0E62FF");
        assert_eq!(style.text_color(false, true), style.tint);
        assert_eq!(style.text_color(true, true), Color::WHITE);
        assert_eq!(style.fill(true, false), Color::GRAY);
        assert_eq!(style.fill(false, true), Color::WHITE);
        assert_eq!(style.corner_radius, 6.0);
    }

    #[test]
    fn test_unselected_text_follows_tint() {
        let light_blue = Color::from_rgb8(0xAD, 0xD8, 0xE6);
        let style = SegmentStyle::default().with_tint(light_blue);
        assert_eq!(style.text_color(false, true), light_blue);

        let style = SegmentStyle {
            unselected_text: Some(Color::BLACK),
            ..style
        };
        assert_eq!(style.text_color(false, true), Color::BLACK);
    }

    #[test]
    fn test_display_mode_content() {
        assert!(!DisplayMode::Text.shows_image());
        assert!(DisplayMode::Image.shows_image());
        assert!(!DisplayMode::Image.shows_label());
        assert!(DisplayMode::ImageTop.shows_label());
    }

    #[test]
    fn test_corner_radius_validation() {
        assert!(validate_corner_radius(&0.0).is_ok());
        assert!(validate_corner_radius(&100.0).is_ok());
        assert!(validate_corner_radius(&-1.0).is_err());
        assert!(validate_corner_radius(&f64::INFINITY).is_err());
        assert!(validate_corner_radius(&f64::NAN).is_err());
    }
}
