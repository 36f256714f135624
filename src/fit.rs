//! Initial crop placement and zoom/pan fitting.
//!
//! # Example
//!
//! ```
//! use cropframe::fit::{default_zoom_rect, fit_offsets};
//! use cropframe::{PixelSize, Point, Rect, Size};
//!
//! // Portrait display, square lock: centred square at 80% of the width.
//! let r = default_zoom_rect(Rect::new(50.0, 0.0, 300.0, 600.0), Some(1.0));
//! assert!((r.y1 - 0.3).abs() < 1e-9 && (r.y2 - 0.7).abs() < 1e-9);
//!
//! // A tall image in a square viewport fills the width at 2× zoom.
//! let fit = fit_offsets(PixelSize::new(1000, 2000), Size::new(400.0, 400.0)).unwrap();
//! assert_eq!(fit.zoom_scale, 2.0);
//! assert_eq!(fit.pan_offset, Point::new(200.0, 200.0));
//! ```

use crate::geometry::{Axis, PixelSize, Point, Rect, Size, UnitRect, ViewportState, aspect_fit, fill_axis};

/// Fraction of the shorter display dimension covered by the default crop.
const DEFAULT_COVERAGE: f64 = 0.8;

/// Default crop for a freshly assigned image.
///
/// The shorter display dimension is the seed axis and is covered at 80%
/// (`0.1..0.9`); the other axis follows `aspect_ratio`. If that would
/// overflow the display, the rect shrinks until it fits. The result is
/// always centred. Without a ratio, or without a usable display rect, the
/// default is `{0.1, 0.1, 0.9, 0.9}`.
pub fn default_zoom_rect(display: Rect, aspect_ratio: Option<f64>) -> UnitRect {
    let Some(ratio) = aspect_ratio.filter(|r| r.is_finite() && *r > 0.0) else {
        return UnitRect::default();
    };
    if display.is_empty() {
        return UnitRect::default();
    }
    let (w, h) = (display.width, display.height);
    let (width, height) = if h > w {
        let width = DEFAULT_COVERAGE * w;
        (width, width / ratio)
    } else {
        let height = DEFAULT_COVERAGE * h;
        (height * ratio, height)
    };
    let shrink = (w / width).min(h / height).min(1.0);
    let (width, height) = (width * shrink, height * shrink);
    let x1 = (w - width) / 2.0 / w;
    let y1 = (h - height) / 2.0 / h;
    UnitRect::new(x1, y1, 1.0 - x1, 1.0 - y1)
}

/// Zoom and pan that make an image fill the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitOffsets {
    pub zoom_scale: f64,
    pub pan_offset: Point,
}

/// Zoom so the aspect-fitted image covers the whole viewport, centred.
///
/// The scale is the larger of the viewport/display ratios on each axis, so
/// the letterboxed axis grows until it touches the viewport edges. Returns
/// `None` for an empty image or viewport.
pub fn fit_offsets(image: PixelSize, viewport: Size) -> Option<FitOffsets> {
    let display = aspect_fit(image, viewport)?;
    let width_rate = viewport.width / display.width;
    let height_rate = viewport.height / display.height;
    let zoom_scale = width_rate.max(height_rate);
    let content = viewport.scaled(zoom_scale);
    Some(FitOffsets {
        zoom_scale,
        pan_offset: Point::new(
            (content.width - viewport.width) / 2.0,
            (content.height - viewport.height) / 2.0,
        ),
    })
}

/// Scroll content inset, per side.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };
}

/// Content inset for the scroll view at `zoom`.
///
/// Zoomed out (`zoom <= 1`), the content is smaller than the viewport and
/// the inset centres it. Zoomed in, the inset is negative on the letterboxed
/// axis so the empty bars scroll out of reach, until the image itself is
/// smaller than the viewport on that axis, in which case it stays centred.
pub fn centering_inset(viewport: Size, display: Rect, zoom: f64) -> Insets {
    let content = viewport.scaled(zoom);
    if zoom <= 1.0 {
        return Insets {
            top: ((viewport.height - content.height) * 0.5).max(0.0),
            left: ((viewport.width - content.width) * 0.5).max(0.0),
            bottom: 0.0,
            right: 0.0,
        };
    }
    if display.is_empty() {
        return Insets::ZERO;
    }
    match fill_axis(viewport, display.size()) {
        Axis::Horizontal => {
            let image_offset = -display.y * zoom;
            let scroll_offset = (viewport.height - content.height) * 0.5;
            let v = image_offset.max(scroll_offset);
            Insets {
                top: v,
                left: 0.0,
                bottom: v,
                right: 0.0,
            }
        }
        Axis::Vertical => {
            let image_offset = -display.x * zoom;
            let scroll_offset = (viewport.width - content.width) * 0.5;
            let h = image_offset.max(scroll_offset);
            Insets {
                top: 0.0,
                left: h,
                bottom: 0.0,
                right: h,
            }
        }
    }
}

/// Smallest and largest pan offsets the scroll view allows.
pub fn pan_range(state: &ViewportState) -> (Point, Point) {
    let inset = centering_inset(state.viewport, state.image_display, state.zoom_scale);
    let content = state.content_size();
    let min = Point::new(-inset.left, -inset.top);
    let max = Point::new(
        (content.width - state.viewport.width + inset.right).max(min.x),
        (content.height - state.viewport.height + inset.bottom).max(min.y),
    );
    (min, max)
}

/// Clamp `pan` into [`pan_range`].
pub fn clamp_pan(state: &ViewportState, pan: Point) -> Point {
    let (min, max) = pan_range(state);
    Point::new(pan.x.min(max.x).max(min.x), pan.y.min(max.y).max(min.y))
}

/// Midpoint of [`pan_range`]: content centred in the viewport.
pub fn centered_pan(state: &ViewportState) -> Point {
    let (min, max) = pan_range(state);
    Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
}

/// Largest rect of `ratio` (width / height) centred inside `bounds`.
pub fn crop_to_aspect(bounds: Rect, ratio: f64) -> Rect {
    if !(ratio.is_finite() && ratio > 0.0) || bounds.is_empty() {
        return bounds;
    }
    let source_ratio = bounds.width / bounds.height;
    if source_ratio > ratio {
        // Bounds are wider: crop width, keep full height.
        let w = bounds.height * ratio;
        Rect::new(bounds.x + (bounds.width - w) / 2.0, bounds.y, w, bounds.height)
    } else {
        // Bounds are taller: crop height, keep full width.
        let h = bounds.width / ratio;
        Rect::new(bounds.x, bounds.y + (bounds.height - h) / 2.0, bounds.width, h)
    }
}

/// Move `frame` inside `bounds`, shrinking it about its centre first if it
/// is too large. Shrinking is uniform, so the aspect ratio survives.
pub fn fit_within(frame: Rect, bounds: Rect) -> Rect {
    if frame.is_empty() || bounds.is_empty() {
        return frame;
    }
    let mut f = frame;
    if f.width > bounds.width || f.height > bounds.height {
        let scale = (bounds.width / f.width).min(bounds.height / f.height);
        let c = f.center();
        let (w, h) = (f.width * scale, f.height * scale);
        f = Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h);
    }
    f.x = f.x.min(bounds.max_x() - f.width).max(bounds.x);
    f.y = f.y.min(bounds.max_y() - f.height).max(bounds.y);
    f
}
