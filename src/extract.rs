//! Mapping the crop frame back to source pixels.
//!
//! The crop frame lives in layout space, on top of an image that has been
//! aspect-fitted, zoomed and panned. Undoing those three steps gives the
//! region of the source image to cut out:
//!
//! ```text
//! factor = native / display        (on the axis the image fills)
//! scale  = 1 / zoom
//! origin = (pan + crop.origin - display.origin × zoom) × scale × factor
//! size   = crop.size × scale × factor
//! ```
//!
//! The display origin is scaled by zoom because the content, centering
//! margin included, is zoomed about the scroll origin. At zoom 1 the term is
//! the plain display origin.
//!
//! Extraction is handed out as a [`CropJob`]: a snapshot of the state at the
//! time of the request that can be run later, on another thread, or awaited.

use core::fmt;
use core::future::{IntoFuture, Ready, ready};

use log::debug;
use num_traits::Float;

use crate::geometry::{Axis, LayoutEdges, PixelRect, PixelSize, ViewportState, fill_axis};

/// Why a crop could not be produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CropError {
    /// No image is assigned.
    NoImage,
    /// The crop frame does not overlap the image's pixels.
    EmptyCropRegion,
}

impl fmt::Display for CropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImage => f.write_str("no image to crop"),
            Self::EmptyCropRegion => f.write_str("crop region contains no image pixels"),
        }
    }
}

impl core::error::Error for CropError {}

/// The crop frame in source pixel coordinates, before rounding or clipping.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelCropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelCropRect {
    /// Whole pixels covered by this rect, clipped to `image`.
    ///
    /// The origin rounds down and the far edge rounds up, so every partially
    /// covered pixel is included. Values within a millionth of a whole pixel
    /// snap to it first. Returns `None` when nothing of the image is covered.
    pub fn integral_within(&self, image: PixelSize) -> Option<PixelRect> {
        if !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
        {
            return None;
        }
        let x0 = Float::floor(snap(self.x)).max(0.0);
        let y0 = Float::floor(snap(self.y)).max(0.0);
        let x1 = Float::ceil(snap(self.x + self.width)).min(image.width as f64);
        let y1 = Float::ceil(snap(self.y + self.height)).min(image.height as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }
}

fn snap(v: f64) -> f64 {
    let r = Float::round(v);
    if Float::abs(v - r) < 1e-6 { r } else { v }
}

/// A successful extraction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CroppedRegion {
    /// Exact region in source pixels.
    pub requested: PixelCropRect,
    /// Whole pixels to cut, clipped to the image.
    pub pixels: PixelRect,
}

/// Compute the source pixels under the crop frame.
///
/// The image's display origin is subtracted after scaling by the zoom, so
/// the result matches the pixels visible under the frame at any zoom.
pub fn extract(
    state: &ViewportState,
    edges: &LayoutEdges,
    image: Option<PixelSize>,
) -> Result<CroppedRegion, CropError> {
    let image = image.filter(|i| !i.is_empty()).ok_or(CropError::NoImage)?;
    let display = state.image_display;
    let zoom = state.zoom_scale;
    if display.is_empty() || !(zoom.is_finite() && zoom > 0.0) {
        return Err(CropError::EmptyCropRegion);
    }

    let factor = match fill_axis(state.viewport, display.size()) {
        Axis::Horizontal => image.width as f64 / display.width,
        Axis::Vertical => image.height as f64 / display.height,
    };
    let scale = 1.0 / zoom;
    let crop = edges.frame(state.viewport);

    let requested = PixelCropRect {
        x: (state.pan_offset.x + crop.x - display.x * zoom) * scale * factor,
        y: (state.pan_offset.y + crop.y - display.y * zoom) * scale * factor,
        width: crop.width * scale * factor,
        height: crop.height * scale * factor,
    };
    let pixels = requested
        .integral_within(image)
        .ok_or(CropError::EmptyCropRegion)?;
    Ok(CroppedRegion { requested, pixels })
}

/// A pending crop: the state captured when it was requested.
///
/// Running it never touches the picker, so later drags neither block nor
/// disturb it. Each job carries the generation it was issued under; hosts
/// compare it with [`CropPicker::is_current`](crate::CropPicker::is_current)
/// to drop results that a newer request has superseded.
#[must_use = "a crop job does nothing until it is run or awaited"]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CropJob {
    state: ViewportState,
    edges: LayoutEdges,
    image: Option<PixelSize>,
    generation: u64,
}

impl CropJob {
    pub fn new(
        state: ViewportState,
        edges: LayoutEdges,
        image: Option<PixelSize>,
        generation: u64,
    ) -> Self {
        Self {
            state,
            edges,
            image,
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Compute the crop.
    pub fn run(self) -> Result<CroppedRegion, CropError> {
        let result = extract(&self.state, &self.edges, self.image);
        match &result {
            Ok(region) => debug!(
                "crop #{}: {}×{} at ({}, {})",
                self.generation,
                region.pixels.width,
                region.pixels.height,
                region.pixels.x,
                region.pixels.y
            ),
            Err(e) => debug!("crop #{} failed: {e}", self.generation),
        }
        result
    }

    /// Compute the crop and cut it out of `image`.
    #[cfg(feature = "image")]
    pub fn run_on(self, image: &image::DynamicImage) -> Result<image::DynamicImage, CropError> {
        self.run().map(|region| region.apply(image))
    }
}

impl IntoFuture for CropJob {
    type Output = Result<CroppedRegion, CropError>;
    type IntoFuture = Ready<Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        ready(self.run())
    }
}

#[cfg(feature = "image")]
impl CroppedRegion {
    /// Cut this region out of `image`.
    ///
    /// The region is clamped to the image's actual dimensions in case they
    /// differ from the size the picker was given.
    pub fn apply(&self, image: &image::DynamicImage) -> image::DynamicImage {
        let r = self.pixels.clamp_to(image.width(), image.height());
        image.crop_imm(r.x, r.y, r.width, r.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect, Size};

    const VIEWPORT: Size = Size::new(400.0, 400.0);
    const TALL: PixelSize = PixelSize::new(1000, 2000);

    fn close(a: f64, b: f64) -> bool {
        Float::abs(a - b) < 1e-6
    }

    #[test]
    fn full_display_maps_to_full_image() {
        let state = ViewportState::with_image(VIEWPORT, TALL);
        let edges = LayoutEdges::from_frame(state.image_display, VIEWPORT);
        let region = extract(&state, &edges, Some(TALL)).unwrap();
        let r = region.requested;
        assert!(close(r.x, 0.0) && close(r.y, 0.0), "{r:?}");
        assert!(close(r.width, 1000.0) && close(r.height, 2000.0), "{r:?}");
        assert_eq!(region.pixels, PixelRect::new(0, 0, 1000, 2000));
        assert!(region.pixels.is_full(TALL));
    }

    #[test]
    fn zoomed_and_panned_viewport() {
        // Filled: 2× zoom, pan (200, 200). The viewport shows the middle square.
        let mut state = ViewportState::with_image(VIEWPORT, TALL);
        state.zoom_scale = 2.0;
        state.pan_offset = Point::new(200.0, 200.0);
        let region = extract(&state, &LayoutEdges::ZERO, Some(TALL)).unwrap();
        assert_eq!(region.pixels, PixelRect::new(0, 500, 1000, 1000));
    }

    #[test]
    fn wide_image_uses_width_factor() {
        let image = PixelSize::new(4000, 1000);
        let state = ViewportState::with_image(VIEWPORT, image);
        // Display is 400×100 at y=150; factor is 10.
        let crop = Rect::new(40.0, 160.0, 100.0, 50.0);
        let edges = LayoutEdges::from_frame(crop, VIEWPORT);
        let region = extract(&state, &edges, Some(image)).unwrap();
        assert_eq!(region.pixels, PixelRect::new(400, 100, 1000, 500));
    }

    #[test]
    fn partial_overlap_is_clipped() {
        let state = ViewportState::with_image(VIEWPORT, TALL);
        // Starts 50 units left of the image.
        let crop = Rect::new(50.0, 0.0, 100.0, 100.0);
        let edges = LayoutEdges::from_frame(crop, VIEWPORT);
        let region = extract(&state, &edges, Some(TALL)).unwrap();
        assert!(close(region.requested.x, -250.0));
        assert_eq!(region.pixels, PixelRect::new(0, 0, 250, 500));
    }

    #[test]
    fn no_image() {
        let state = ViewportState::new(VIEWPORT);
        assert_eq!(
            extract(&state, &LayoutEdges::ZERO, None),
            Err(CropError::NoImage)
        );
        assert_eq!(
            extract(&state, &LayoutEdges::ZERO, Some(PixelSize::new(0, 10))),
            Err(CropError::NoImage)
        );
    }

    #[test]
    fn crop_outside_image() {
        let mut state = ViewportState::with_image(VIEWPORT, TALL);
        state.pan_offset = Point::new(5000.0, 0.0);
        let edges = LayoutEdges::from_frame(Rect::new(100.0, 0.0, 200.0, 400.0), VIEWPORT);
        assert_eq!(
            extract(&state, &edges, Some(TALL)),
            Err(CropError::EmptyCropRegion)
        );
    }

    #[test]
    fn integral_rounds_outward_and_snaps() {
        let image = PixelSize::new(100, 100);
        let r = PixelCropRect {
            x: 10.4,
            y: 19.9999999,
            width: 5.2,
            height: 10.0,
        };
        assert_eq!(r.integral_within(image), Some(PixelRect::new(10, 20, 6, 10)));
        let nan = PixelCropRect {
            x: f64::NAN,
            ..r
        };
        assert_eq!(nan.integral_within(image), None);
    }

    #[test]
    fn job_snapshots_state() {
        let state = ViewportState::with_image(VIEWPORT, TALL);
        let edges = LayoutEdges::from_frame(state.image_display, VIEWPORT);
        let job = CropJob::new(state, edges, Some(TALL), 7);
        assert_eq!(job.generation(), 7);
        assert_eq!(job.run().unwrap().pixels, PixelRect::new(0, 0, 1000, 2000));
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_messages() {
        assert_eq!(CropError::NoImage.to_string(), "no image to crop");
        assert_eq!(
            CropError::EmptyCropRegion.to_string(),
            "crop region contains no image pixels"
        );
    }

    #[cfg(feature = "image")]
    #[test]
    fn apply_cuts_pixels() {
        let img = image::DynamicImage::new_rgba8(1000, 2000);
        let state = ViewportState::with_image(VIEWPORT, TALL);
        let edges = LayoutEdges::from_frame(Rect::new(100.0, 0.0, 100.0, 200.0), VIEWPORT);
        let job = CropJob::new(state, edges, Some(TALL), 1);
        let out = job.run_on(&img).unwrap();
        assert_eq!((out.width(), out.height()), (500, 1000));
    }
}
