//! Host configuration.
//!
//! ```
//! use cropframe::{Color, CropConfig};
//!
//! let config = CropConfig::new()
//!     .aspect_ratio(16.0 / 9.0)
//!     .zoom_range(1.0, 4.0)
//!     .dim_color(Color::BLACK.with_alpha(0.4));
//!
//! assert_eq!(config.max_zoom_scale, 4.0);
//! assert_eq!(config.dim_color.a, 102);
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::MIN_CROP_SIZE;

/// sRGB color with alpha, 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Transparent black `[0, 0, 0, 0]`.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// White, fully opaque.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Black, fully opaque.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Same color with alpha set from a `0.0..=1.0` fraction.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Self { a, ..self }
    }

    /// Alpha as a `0.0..=1.0` fraction.
    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }
}

/// `#rrggbb`; alpha is not included.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Appearance and behaviour of a [`CropPicker`](crate::CropPicker).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CropConfig {
    /// Crop outline and corner handles.
    pub line_color: Color,
    /// Behind the scrollable content.
    pub scroll_background: Color,
    /// Behind the image inside the content (letterbox bars).
    pub image_background: Color,
    /// Overlay outside the crop frame.
    pub dim_color: Color,
    pub min_zoom_scale: f64,
    pub max_zoom_scale: f64,
    /// Locked width / height ratio. `None` lets the crop take any shape.
    pub aspect_ratio: Option<f64>,
    /// Smallest crop width and height in display units.
    pub min_crop_size: f64,
    /// Enable the top/left/right/bottom handles.
    pub side_handles: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            line_color: Color::WHITE,
            scroll_background: Color::BLACK,
            image_background: Color::BLACK,
            dim_color: Color::rgba(0, 0, 0, 153),
            min_zoom_scale: 1.0,
            max_zoom_scale: 5.0,
            aspect_ratio: None,
            min_crop_size: MIN_CROP_SIZE,
            side_handles: false,
        }
    }
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self
    }

    pub fn scroll_background(mut self, color: Color) -> Self {
        self.scroll_background = color;
        self
    }

    pub fn image_background(mut self, color: Color) -> Self {
        self.image_background = color;
        self
    }

    pub fn dim_color(mut self, color: Color) -> Self {
        self.dim_color = color;
        self
    }

    /// Set the zoom limits. The bounds may be given in either order.
    pub fn zoom_range(mut self, min: f64, max: f64) -> Self {
        self.min_zoom_scale = min.min(max);
        self.max_zoom_scale = min.max(max);
        self
    }

    /// Lock the crop to `ratio` (width / height).
    pub fn aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Let the crop take any shape.
    pub fn free_aspect(mut self) -> Self {
        self.aspect_ratio = None;
        self
    }

    pub fn min_crop_size(mut self, size: f64) -> Self {
        self.min_crop_size = size;
        self
    }

    pub fn side_handles(mut self, enabled: bool) -> Self {
        self.side_handles = enabled;
        self
    }

    /// The aspect lock, ignoring ratios that are zero, negative or not finite.
    pub fn effective_aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0)
    }

    /// The minimum crop side, falling back to [`MIN_CROP_SIZE`] when the
    /// configured value is zero, negative or not finite.
    pub fn effective_min_crop_size(&self) -> f64 {
        if self.min_crop_size.is_finite() && self.min_crop_size > 0.0 {
            self.min_crop_size
        } else {
            MIN_CROP_SIZE
        }
    }

    /// Clamp `zoom` into the configured range. Invalid input gives the minimum.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let min = self.min_zoom_scale;
        let max = self.max_zoom_scale.max(min);
        if !(zoom.is_finite() && zoom > 0.0) {
            return min;
        }
        zoom.min(max).max(min)
    }
}
