//! Geometry and state engine for an interactive image crop picker.
//!
//! Pure geometry: no rendering, no event loop, `no_std` compatible. A host
//! view forwards pointer events and property writes to a [`CropPicker`] and
//! draws what it reports back. Pixel extraction is the only part that can
//! touch image data, and only with the `image` feature.
//!
//! # Modules
//!
//! - [`geometry`]: Coordinate spaces (unit, layout, pixel) and conversions between them
//! - [`drag`]: Handle drags under limit, viewport, minimum-size and aspect-lock rules
//! - [`fit`]: Default crop placement, zoom-to-fill, pan range
//! - [`extract`]: Crop frame back to source pixels, async crop jobs
//! - [`mask`]: Dimmed overlay around the crop frame
//! - [`config`]: Colors, zoom limits and aspect lock
//! - [`picker`]: The widget state tying it all together
//! - `svg`: SVG snapshot of a picker (`svg` feature)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod config;
pub mod drag;
pub mod extract;
pub mod fit;
pub mod geometry;
pub mod mask;
pub mod picker;
#[cfg(feature = "svg")]
pub mod svg;

pub use config::{Color, CropConfig};
pub use drag::{DragSession, DragState, Handle, apply_drag};
pub use extract::{CropError, CropJob, CroppedRegion, PixelCropRect, extract};
pub use fit::{FitOffsets, default_zoom_rect, fit_offsets};
pub use geometry::{
    LayoutEdges, MIN_CROP_SIZE, PixelRect, PixelSize, Point, Rect, Size, UnitRect, ViewportState,
    to_layout_edges, to_unit_rect,
};
pub use mask::{MaskRegion, compute_mask};
pub use picker::CropPicker;
