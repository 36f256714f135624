//! The crop picker: one owned value holding all widget state.
//!
//! A host view forwards its events here and reads back what to draw:
//!
//! ```
//! use cropframe::{CropConfig, CropPicker, Handle, PixelSize, Point, Rect, Size};
//!
//! let mut picker = CropPicker::new(Size::new(400.0, 400.0), CropConfig::new());
//! picker.set_image(Some(PixelSize::new(1000, 2000)));
//!
//! // The image is pillarboxed to 200×400; the crop starts at 10% margins.
//! assert_eq!(picker.crop_frame(), Rect::new(120.0, 40.0, 160.0, 320.0));
//!
//! assert!(picker.begin_drag(Handle::RightBottom, Point::new(280.0, 360.0)));
//! assert!(picker.drag_to(Point::new(270.0, 340.0)));
//! picker.end_drag();
//! assert_eq!(picker.crop_frame(), Rect::new(120.0, 40.0, 150.0, 300.0));
//!
//! let region = picker.crop_now().unwrap();
//! assert_eq!(region.pixels.width, 750);
//! ```

use log::debug;

use crate::config::CropConfig;
use crate::drag::{DragSession, Handle};
use crate::extract::{CropError, CropJob, CroppedRegion};
use crate::fit::{centered_pan, clamp_pan, crop_to_aspect, default_zoom_rect, fit_offsets, fit_within};
use crate::geometry::{
    LayoutEdges, PixelSize, Point, Rect, Size, UnitRect, ViewportState, aspect_fit,
    to_layout_edges, to_unit_rect,
};
use crate::mask::{MaskRegion, compute_mask};

/// Interactive crop state for one image in one viewport.
///
/// Every mutation is synchronous. [`crop`](Self::crop) hands out a
/// [`CropJob`] snapshot so pixel work can happen elsewhere.
#[derive(Clone, Debug)]
pub struct CropPicker {
    config: CropConfig,
    state: ViewportState,
    image: Option<PixelSize>,
    edges: LayoutEdges,
    /// Last crop region requested in unit space; reapplied on relayout.
    zoom_rect: UnitRect,
    /// Rect set while no image was loaded; used by the next `set_image`.
    pending_zoom_rect: Option<UnitRect>,
    session: Option<DragSession>,
    crop_enabled: bool,
    generation: u64,
}

impl CropPicker {
    /// A picker with no image in a viewport of `viewport` size.
    pub fn new(viewport: Size, config: CropConfig) -> Self {
        Self {
            config,
            state: ViewportState::new(viewport),
            image: None,
            edges: LayoutEdges::ZERO,
            zoom_rect: UnitRect::default(),
            pending_zoom_rect: None,
            session: None,
            crop_enabled: true,
            generation: 0,
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn viewport_state(&self) -> &ViewportState {
        &self.state
    }

    /// Native size of the current image.
    pub fn image(&self) -> Option<PixelSize> {
        self.image
    }

    /// Where the image currently sits in layout space.
    pub fn image_frame(&self) -> Rect {
        self.state.image_frame()
    }

    // ── image and layout ────────────────────────────────────────────────

    /// Assign a new image, or clear it with `None`.
    ///
    /// Zoom and pan are reset and any drag in progress is dropped. The crop
    /// goes to the rect set while no image was loaded, if there was one, and
    /// otherwise to the default rect for the current aspect lock.
    pub fn set_image(&mut self, image: Option<PixelSize>) {
        self.image = image.filter(|i| !i.is_empty());
        self.session = None;
        self.state.zoom_scale = 1.0;
        self.state.image_display = self
            .image
            .and_then(|i| aspect_fit(i, self.state.viewport))
            .unwrap_or_default();
        self.state.pan_offset = centered_pan(&self.state);

        let display = self.state.image_display;
        if display.is_empty() {
            self.edges = LayoutEdges::ZERO;
            debug!("image cleared");
            return;
        }
        self.edges = LayoutEdges::from_frame(self.state.image_frame(), self.state.viewport);
        self.zoom_rect = self
            .pending_zoom_rect
            .take()
            .unwrap_or_else(|| default_zoom_rect(display, self.config.effective_aspect_ratio()));
        self.apply_zoom_rect();
        if let Some(i) = self.image {
            debug!(
                "image {}×{} displayed at {:.1}×{:.1}",
                i.width, i.height, display.width, display.height
            );
        }
    }

    /// Resize the viewport. The crop keeps covering the same part of the image.
    pub fn set_viewport_size(&mut self, viewport: Size) {
        if !viewport.is_positive() || viewport == self.state.viewport {
            return;
        }
        let current = self.zoom_rect().unwrap_or(self.zoom_rect);
        self.session = None;
        self.state.viewport = viewport;
        self.state.image_display = self
            .image
            .and_then(|i| aspect_fit(i, viewport))
            .unwrap_or_default();
        self.state.pan_offset = clamp_pan(&self.state, self.state.pan_offset);
        self.zoom_rect = current;
        if !self.apply_zoom_rect() {
            self.edges = LayoutEdges::ZERO;
        }
    }

    /// Place the crop at `rect`, given as fractions of the image.
    ///
    /// Coordinates are clamped into `[0, 1]`. Returns `false` (and changes
    /// nothing) when the rect has no area after clamping. Without an image
    /// the rect is held and applied by the next [`set_image`](Self::set_image).
    pub fn set_zoom_rect(&mut self, rect: UnitRect) -> bool {
        let Some(rect) = rect.clamped() else {
            return false;
        };
        if self.state.image_frame().is_empty() {
            self.pending_zoom_rect = Some(rect);
            debug!("zoom rect held until an image is set");
            return true;
        }
        self.zoom_rect = rect;
        self.session = None;
        self.apply_zoom_rect();
        true
    }

    /// The crop as fractions of the image, or `None` without an image.
    pub fn zoom_rect(&self) -> Option<UnitRect> {
        to_unit_rect(&self.edges, self.state.image_frame(), self.state.viewport)
    }

    /// Lock the crop to `ratio` (width / height), or unlock it with `None`.
    ///
    /// The current crop region is reapplied under the new lock.
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) {
        if let Some(current) = self.zoom_rect() {
            self.zoom_rect = current;
        }
        self.config.aspect_ratio = ratio;
        self.session = None;
        self.apply_zoom_rect();
    }

    fn apply_zoom_rect(&mut self) -> bool {
        let image_frame = self.state.image_frame();
        let viewport = self.state.viewport;
        let Some(edges) = to_layout_edges(
            &self.zoom_rect,
            image_frame,
            viewport,
            self.config.effective_aspect_ratio(),
        ) else {
            return false;
        };
        let frame = fit_within(edges.frame(viewport), image_frame);
        self.edges = LayoutEdges::from_frame(frame, viewport);
        debug!(
            "zoom rect ({:.3}, {:.3})-({:.3}, {:.3}) -> frame {:.1}×{:.1} at ({:.1}, {:.1})",
            self.zoom_rect.x1,
            self.zoom_rect.y1,
            self.zoom_rect.x2,
            self.zoom_rect.y2,
            frame.width,
            frame.height,
            frame.x,
            frame.y
        );
        true
    }

    // ── zoom and pan ────────────────────────────────────────────────────

    /// Zoom about the viewport centre. The scale is clamped to the
    /// configured range; the crop frame stays where it is on screen.
    /// A drag in progress is dropped.
    pub fn set_zoom_scale(&mut self, zoom: f64) {
        let zoom = self.config.clamp_zoom(zoom);
        let old = self.state.zoom_scale;
        if !(zoom > 0.0 && old > 0.0) {
            return;
        }
        self.session = None;
        let half = Point::new(self.state.viewport.width / 2.0, self.state.viewport.height / 2.0);
        let anchor = Point::new(
            (self.state.pan_offset.x + half.x) / old,
            (self.state.pan_offset.y + half.y) / old,
        );
        self.state.zoom_scale = zoom;
        let pan = Point::new(anchor.x * zoom - half.x, anchor.y * zoom - half.y);
        self.state.pan_offset = clamp_pan(&self.state, pan);
    }

    /// Scroll to `pan`, clamped to the reachable range. Returns the offset
    /// applied. A drag in progress is dropped.
    pub fn set_pan_offset(&mut self, pan: Point) -> Point {
        self.session = None;
        self.state.pan_offset = clamp_pan(&self.state, pan);
        self.state.pan_offset
    }

    /// Zoom until the image fills the viewport and snap the crop to the
    /// visible image (the largest centred rect of the locked ratio, if any).
    ///
    /// Returns `false` without an image.
    pub fn zoom_to_fill(&mut self) -> bool {
        let Some(fit) = self.image.and_then(|i| fit_offsets(i, self.state.viewport)) else {
            return false;
        };
        let zoom = self.config.clamp_zoom(fit.zoom_scale);
        self.state.zoom_scale = zoom;
        self.state.pan_offset = if zoom == fit.zoom_scale {
            clamp_pan(&self.state, fit.pan_offset)
        } else {
            centered_pan(&self.state)
        };
        self.session = None;
        self.snap_to_visible_image();
        debug!("zoom to fill: scale {zoom:.3}");
        true
    }

    /// Back to scale 1 with the crop covering the whole image.
    pub fn reset_zoom(&mut self) {
        self.state.zoom_scale = 1.0;
        self.state.pan_offset = centered_pan(&self.state);
        self.session = None;
        self.snap_to_visible_image();
    }

    fn snap_to_visible_image(&mut self) {
        let Some(visible) = self.state.visible_image() else {
            return;
        };
        let frame = match self.config.effective_aspect_ratio() {
            Some(ratio) => crop_to_aspect(visible, ratio),
            None => visible,
        };
        self.edges = LayoutEdges::from_frame(frame, self.state.viewport);
        if let Some(unit) = self.zoom_rect() {
            self.zoom_rect = unit;
        }
    }

    // ── affordances ─────────────────────────────────────────────────────

    /// Show or hide the crop affordances. Hidden, the picker is a plain
    /// zoom/pan viewer; the crop region is kept.
    pub fn set_crop_enabled(&mut self, enabled: bool) {
        self.crop_enabled = enabled;
        if !enabled {
            self.session = None;
        }
    }

    pub fn is_crop_enabled(&self) -> bool {
        self.crop_enabled
    }

    /// Whether the crop outline and handles are drawn.
    pub fn crop_lines_visible(&self) -> bool {
        self.crop_enabled && self.image.is_some()
    }

    /// Whether the thirds guides are drawn. They are hidden during a drag.
    pub fn guides_visible(&self) -> bool {
        self.crop_lines_visible() && self.session.is_none()
    }

    /// Handles a host should hit-test, in priority order.
    pub fn enabled_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        let sides: &[Handle] = if self.config.side_handles {
            &Handle::SIDES
        } else {
            &[]
        };
        Handle::CORNERS
            .iter()
            .chain(sides)
            .copied()
            .chain(core::iter::once(Handle::Center))
            .filter(|_| self.crop_lines_visible())
    }

    // ── drags ───────────────────────────────────────────────────────────

    /// Pointer down on `handle` at `point`.
    ///
    /// Refused while another drag is active, while the crop lines are
    /// hidden, and for side handles unless they are enabled.
    pub fn begin_drag(&mut self, handle: Handle, point: Point) -> bool {
        if self.session.is_some() || !self.crop_lines_visible() {
            return false;
        }
        if handle.is_side() && !self.config.side_handles {
            return false;
        }
        self.session = Some(DragSession::begin(
            handle,
            point,
            self.edges,
            self.state.image_frame(),
            self.state.viewport,
        ));
        debug!("drag {handle:?} began at ({:.1}, {:.1})", point.x, point.y);
        true
    }

    /// Pointer moved to `point`. Returns whether the crop changed.
    pub fn drag_to(&mut self, point: Point) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let moved = session.update(
            point,
            self.edges,
            self.state.viewport,
            self.config.effective_aspect_ratio(),
            self.config.effective_min_crop_size(),
        );
        match moved {
            Some(edges) => {
                self.edges = edges;
                true
            }
            None => false,
        }
    }

    /// Pointer up. Returns the handle that was being dragged.
    pub fn end_drag(&mut self) -> Option<Handle> {
        let session = self.session.take()?;
        if let Some(unit) = self.zoom_rect() {
            self.zoom_rect = unit;
        }
        let d = session.total_delta();
        debug!("drag {:?} ended, moved ({:.1}, {:.1})", session.handle(), d.x, d.y);
        Some(session.handle())
    }

    pub fn active_handle(&self) -> Option<Handle> {
        self.session.map(|s| s.handle())
    }

    // ── output ──────────────────────────────────────────────────────────

    pub fn edges(&self) -> LayoutEdges {
        self.edges
    }

    /// The crop frame in layout space.
    pub fn crop_frame(&self) -> Rect {
        self.edges.frame(self.state.viewport)
    }

    /// The dimmed overlay, or `None` when nothing should be dimmed.
    pub fn mask(&self) -> Option<MaskRegion> {
        if !self.crop_lines_visible() {
            return None;
        }
        Some(compute_mask(self.state.viewport, &self.edges))
    }

    /// Snapshot the current crop for extraction.
    ///
    /// Each call supersedes the previous one; see [`is_current`](Self::is_current).
    pub fn crop(&mut self) -> CropJob {
        self.generation += 1;
        CropJob::new(self.state, self.edges, self.image, self.generation)
    }

    /// Extract immediately.
    pub fn crop_now(&mut self) -> Result<CroppedRegion, CropError> {
        self.crop().run()
    }

    /// Whether a job of `generation` is the latest one issued.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
