//! Coordinate spaces of the crop picker and the conversions between them.
//!
//! Three spaces are in play:
//!
//! - **Unit space**: the crop region as fractions of the image frame,
//!   `[0, 1] × [0, 1]`. This is the form hosts persist and exchange
//!   ([`UnitRect`]).
//! - **Layout space**: display units relative to the viewport's top-left
//!   corner. The crop region is stored as four edge offsets
//!   ([`LayoutEdges`]), the same way a host view pins an overlay with
//!   leading/trailing/top/bottom constraints.
//! - **Pixel space**: coordinates in the source image ([`PixelSize`],
//!   [`PixelRect`]). Only the extractor touches it.
//!
//! ```text
//!   viewport (0,0) ───────────────────────────┐
//!   │        image frame                       │
//!   │   ┌───────────────────────┐              │
//!   │   │   crop  ┌─────┐       │              │
//!   │   │  x1,y1 ─┤     │       │              │
//!   │   │         └─────┴ x2,y2 │              │
//!   │   └───────────────────────┘              │
//!   └──────────────────────────────────────────┘
//! ```

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum crop width and height in display units.
pub const MIN_CROP_SIZE: f64 = 40.0;

/// A point (or a displacement) in layout space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `other` to `self`.
    pub fn delta_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Width × height in display units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Multiply both dimensions by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// Axis-aligned rectangle in layout space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rect of `size` anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rect has no area (or is not a number).
    pub fn is_empty(&self) -> bool {
        !self.size().is_positive()
    }

    /// Overlapping region, or `None` when the rects share no area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        let r = Rect::new(x, y, max_x - x, max_y - y);
        if r.is_empty() { None } else { Some(r) }
    }

    /// Smallest rect containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(x, y, max_x - x, max_y - y)
    }

    /// Half-open containment: the min edges are inside, the max edges are not.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.max_x() && p.y >= self.y && p.y < self.max_y()
    }

    /// Whether `other` lies inside `self`, allowing `tolerance` of overshoot.
    pub fn contains_rect(&self, other: &Rect, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.max_x() <= self.max_x() + tolerance
            && other.max_y() <= self.max_y() + tolerance
    }
}

/// Native image dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The same dimensions as a float [`Size`].
    pub fn to_size(self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp this rect to fit within `(0, 0, max_w, max_h)`.
    /// Width and height are clamped to at least 1.
    pub fn clamp_to(self, max_w: u32, max_h: u32) -> Self {
        let x = self.x.min(max_w.saturating_sub(1));
        let y = self.y.min(max_h.saturating_sub(1));
        let w = self.width.min(max_w.saturating_sub(x)).max(1);
        let h = self.height.min(max_h.saturating_sub(y)).max(1);
        Self {
            x,
            y,
            width: w,
            height: h,
        }
    }

    /// Whether this rect covers the whole image.
    pub fn is_full(&self, image: PixelSize) -> bool {
        self.x == 0 && self.y == 0 && self.width == image.width && self.height == image.height
    }
}

/// Crop region as fractions of the image frame.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right corner.
/// A valid rect has `0 <= x1 < x2 <= 1` and `0 <= y1 < y2 <= 1`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Default for UnitRect {
    /// 10% margins on every side.
    fn default() -> Self {
        Self::new(0.1, 0.1, 0.9, 0.9)
    }
}

impl UnitRect {
    /// The whole image.
    pub const FULL: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Create a unit rect from its corners. No validation; see [`clamped`](Self::clamped).
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn is_valid(&self) -> bool {
        let finite =
            self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite();
        finite
            && (0.0..=1.0).contains(&self.x1)
            && (0.0..=1.0).contains(&self.x2)
            && (0.0..=1.0).contains(&self.y1)
            && (0.0..=1.0).contains(&self.y2)
            && self.x1 < self.x2
            && self.y1 < self.y2
    }

    /// Clamp every coordinate into `[0, 1]`.
    ///
    /// Returns `None` for non-finite input or when the clamped rect has no area.
    pub fn clamped(self) -> Option<Self> {
        if !(self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite())
        {
            return None;
        }
        let r = Self::new(
            self.x1.clamp(0.0, 1.0),
            self.y1.clamp(0.0, 1.0),
            self.x2.clamp(0.0, 1.0),
            self.y2.clamp(0.0, 1.0),
        );
        if r.x1 < r.x2 && r.y1 < r.y2 { Some(r) } else { None }
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &UnitRect, tolerance: f64) -> bool {
        Float::abs(self.x1 - other.x1) <= tolerance
            && Float::abs(self.y1 - other.y1) <= tolerance
            && Float::abs(self.x2 - other.x2) <= tolerance
            && Float::abs(self.y2 - other.y2) <= tolerance
    }
}

/// Crop region as signed offsets from the viewport's four sides.
///
/// Follows the sign convention of a view pinned by constraints: the crop
/// frame starts at `x = -leading`, `y = -top` and ends at
/// `viewport.width - trailing`, `viewport.height - bottom`. All-zero edges
/// cover the whole viewport; an inset crop has `leading <= 0 <= trailing`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LayoutEdges {
    pub leading: f64,
    pub trailing: f64,
    pub top: f64,
    pub bottom: f64,
}

impl LayoutEdges {
    /// Crop covers the whole viewport.
    pub const ZERO: Self = Self {
        leading: 0.0,
        trailing: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    /// Edges that place the crop at `frame` inside a viewport of `viewport` size.
    pub fn from_frame(frame: Rect, viewport: Size) -> Self {
        Self {
            leading: -frame.x,
            trailing: viewport.width - frame.max_x(),
            top: -frame.y,
            bottom: viewport.height - frame.max_y(),
        }
    }

    /// The crop frame in layout space.
    pub fn frame(&self, viewport: Size) -> Rect {
        Rect::new(
            -self.leading,
            -self.top,
            viewport.width + self.leading - self.trailing,
            viewport.height + self.top - self.bottom,
        )
    }

    pub fn width(&self, viewport: Size) -> f64 {
        viewport.width + self.leading - self.trailing
    }

    pub fn height(&self, viewport: Size) -> f64 {
        viewport.height + self.top - self.bottom
    }
}

/// The axis along which an aspect-fitted image touches the viewport.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Image spans the full viewport width (letterboxed top and bottom).
    Horizontal,
    /// Image spans the full viewport height (pillarboxed left and right).
    Vertical,
}

/// Which axis an image of `display` size fills inside `viewport`.
///
/// Compares the viewport-to-image ratio on each axis; the smaller ratio is
/// the one that constrained the aspect fit.
pub fn fill_axis(viewport: Size, display: Size) -> Axis {
    let width_rate = viewport.width / display.width;
    let height_rate = viewport.height / display.height;
    if width_rate < height_rate {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Fit an image inside `container` preserving its aspect ratio, centred.
///
/// Returns `None` for an empty image or a non-positive container.
pub fn aspect_fit(image: PixelSize, container: Size) -> Option<Rect> {
    if image.is_empty() || !container.is_positive() {
        return None;
    }
    let iw = image.width as f64;
    let ih = image.height as f64;
    let scale = (container.width / iw).min(container.height / ih);
    let w = iw * scale;
    let h = ih * scale;
    Some(Rect::new(
        (container.width - w) / 2.0,
        (container.height - h) / 2.0,
        w,
        h,
    ))
}

/// Everything the geometry needs to know about the scroll viewport.
///
/// `image_display` is the aspect-fit rect of the image at zoom 1. Zoom and
/// pan move it around; [`image_frame`](Self::image_frame) is where it ends up.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ViewportState {
    /// Viewport size in display units.
    pub viewport: Size,
    /// Aspect-fit rect of the image at zoom 1. Empty when no image is set.
    pub image_display: Rect,
    /// Magnification, 1.0 = fit size.
    pub zoom_scale: f64,
    /// Scroll offset of the zoomed content.
    pub pan_offset: Point,
}

impl ViewportState {
    /// A viewport with no image, unzoomed.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            image_display: Rect::default(),
            zoom_scale: 1.0,
            pan_offset: Point::ZERO,
        }
    }

    /// A viewport showing `image` aspect-fitted, unzoomed.
    pub fn with_image(viewport: Size, image: PixelSize) -> Self {
        Self {
            image_display: aspect_fit(image, viewport).unwrap_or_default(),
            ..Self::new(viewport)
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.viewport)
    }

    /// Size of the scrollable content at the current zoom.
    pub fn content_size(&self) -> Size {
        self.viewport.scaled(self.zoom_scale)
    }

    /// The image rect in layout space after zoom and pan.
    pub fn image_frame(&self) -> Rect {
        let z = self.zoom_scale;
        Rect::new(
            self.image_display.x * z - self.pan_offset.x,
            self.image_display.y * z - self.pan_offset.y,
            self.image_display.width * z,
            self.image_display.height * z,
        )
    }

    /// The part of the image frame inside the viewport.
    pub fn visible_image(&self) -> Option<Rect> {
        self.image_frame().intersection(&self.bounds())
    }
}

/// Place `unit` onto the image rect `display` and express it as edges of `viewport`.
///
/// With an aspect ratio, one axis follows the other: on a portrait display
/// the height is derived from the width (`y2` is ignored), otherwise the width
/// is derived from the height (`x2` is ignored). Returns `None` when
/// `display` has no area.
pub fn to_layout_edges(
    unit: &UnitRect,
    display: Rect,
    viewport: Size,
    aspect_ratio: Option<f64>,
) -> Option<LayoutEdges> {
    if display.is_empty() {
        return None;
    }
    let left = display.x + unit.x1 * display.width;
    let top = display.y + unit.y1 * display.height;
    let mut right = display.x + unit.x2 * display.width;
    let mut bottom = display.y + unit.y2 * display.height;
    match aspect_ratio.filter(|r| r.is_finite() && *r > 0.0) {
        Some(ratio) if display.height > display.width => {
            bottom = top + (right - left) / ratio;
        }
        Some(ratio) => {
            right = left + (bottom - top) * ratio;
        }
        None => {}
    }
    let frame = Rect::new(left, top, right - left, bottom - top);
    Some(LayoutEdges::from_frame(frame, viewport))
}

/// Express the crop described by `edges` as fractions of `display`.
///
/// Returns `None` when `display` has no area.
pub fn to_unit_rect(edges: &LayoutEdges, display: Rect, viewport: Size) -> Option<UnitRect> {
    if display.is_empty() {
        return None;
    }
    let f = edges.frame(viewport);
    Some(UnitRect::new(
        (f.x - display.x) / display.width,
        (f.y - display.y) / display.height,
        (f.max_x() - display.x) / display.width,
        (f.max_y() - display.y) / display.height,
    ))
}
