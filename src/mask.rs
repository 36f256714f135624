//! The dimmed overlay around the crop frame.

use crate::geometry::{LayoutEdges, Point, Rect, Size};

/// Viewport minus the crop frame.
///
/// Renderers either fill `bounds` with `hole` punched out (even-odd), or
/// fill the four [`bands`](Self::bands).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MaskRegion {
    /// The whole viewport.
    pub bounds: Rect,
    /// The clear part. `None` when the crop frame has no visible area, in
    /// which case the whole viewport is dimmed.
    pub hole: Option<Rect>,
}

/// Derive the mask for `edges` inside a viewport of `viewport` size.
pub fn compute_mask(viewport: Size, edges: &LayoutEdges) -> MaskRegion {
    let bounds = Rect::from_size(viewport);
    MaskRegion {
        bounds,
        hole: edges.frame(viewport).intersection(&bounds),
    }
}

impl MaskRegion {
    /// Whether `p` is drawn dimmed.
    pub fn is_dimmed(&self, p: Point) -> bool {
        self.bounds.contains(p) && !self.hole.is_some_and(|h| h.contains(p))
    }

    /// The dimmed area as up to four non-overlapping rects: top, bottom,
    /// left, right. Top and bottom span the full width.
    pub fn bands(&self) -> [Option<Rect>; 4] {
        let b = self.bounds;
        let Some(h) = self.hole else {
            return [non_empty(b), None, None, None];
        };
        [
            non_empty(Rect::new(b.x, b.y, b.width, h.y - b.y)),
            non_empty(Rect::new(b.x, h.max_y(), b.width, b.max_y() - h.max_y())),
            non_empty(Rect::new(b.x, h.y, h.x - b.x, h.height)),
            non_empty(Rect::new(h.max_x(), h.y, b.max_x() - h.max_x(), h.height)),
        ]
    }

    /// Total dimmed area in square display units.
    pub fn dimmed_area(&self) -> f64 {
        let hole = self.hole.map_or(0.0, |h| h.width * h.height);
        self.bounds.width * self.bounds.height - hole
    }
}

fn non_empty(r: Rect) -> Option<Rect> {
    if r.is_empty() { None } else { Some(r) }
}
