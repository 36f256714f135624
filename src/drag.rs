//! Handle drags and the rules that keep the crop frame valid.
//!
//! Every pointer move is turned into a delta and run through [`apply_drag`],
//! which either returns the new [`LayoutEdges`] or rejects the move outright.
//! A rejected move leaves the crop untouched; the pointer simply keeps going
//! and the next delta is judged on its own.
//!
//! Rules, checked per moving edge:
//!
//! 1. **Limit**: an edge never passes its limit, which is the image frame
//!    (widened to include the crop frame as it was when the drag began).
//! 2. **Viewport**: an edge may sit outside the viewport only while the
//!    current delta carries it back towards the centre.
//! 3. **Minimum size**: width and height stay at or above the minimum.
//!
//! All three comparisons are inclusive.

use log::trace;
use num_traits::Float;

use crate::geometry::{LayoutEdges, Point, Rect, Size};

/// Interactive handle on the crop frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    LeftTop,
    RightTop,
    LeftBottom,
    RightBottom,
    /// Moves the whole frame.
    Center,
    Top,
    Left,
    Right,
    Bottom,
}

impl Handle {
    /// The four corner handles.
    pub const CORNERS: [Handle; 4] = [
        Handle::LeftTop,
        Handle::RightTop,
        Handle::LeftBottom,
        Handle::RightBottom,
    ];

    /// The four side handles. Disabled unless the host opts in.
    pub const SIDES: [Handle; 4] = [Handle::Top, Handle::Left, Handle::Right, Handle::Bottom];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::LeftTop | Self::RightTop | Self::LeftBottom | Self::RightBottom
        )
    }

    pub fn is_side(self) -> bool {
        matches!(self, Self::Top | Self::Left | Self::Right | Self::Bottom)
    }

    fn h_edge(self) -> Option<HEdge> {
        match self {
            Self::LeftTop | Self::LeftBottom | Self::Left => Some(HEdge::Left),
            Self::RightTop | Self::RightBottom | Self::Right => Some(HEdge::Right),
            _ => None,
        }
    }

    fn v_edge(self) -> Option<VEdge> {
        match self {
            Self::LeftTop | Self::RightTop | Self::Top => Some(VEdge::Top),
            Self::LeftBottom | Self::RightBottom | Self::Bottom => Some(VEdge::Bottom),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum HEdge {
    Left,
    Right,
}

#[derive(Copy, Clone, Debug)]
enum VEdge {
    Top,
    Bottom,
}

/// Which rule rejected a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Violation {
    Limit,
    Viewport,
    MinSize,
}

/// Inputs to one constrained drag step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragState {
    /// Current committed edges.
    pub edges: LayoutEdges,
    /// Outermost positions the edges may reach.
    pub limits: LayoutEdges,
    /// Viewport size in display units.
    pub viewport: Size,
    /// Locked width / height ratio, if any.
    pub aspect_ratio: Option<f64>,
    /// Minimum crop width and height.
    pub min_size: f64,
}

/// Apply a pointer delta on `handle` to the crop described by `state`.
///
/// Returns the new edges, or `None` when the move is rejected. Corner and
/// side moves are all-or-nothing. A centre move checks the horizontal and
/// vertical translation separately and keeps whichever passes; it returns
/// `None` only if neither does.
pub fn apply_drag(handle: Handle, delta: Point, state: &DragState) -> Option<LayoutEdges> {
    let viewport = state.viewport;
    let frame = state.edges.frame(viewport);
    if frame.is_empty() || !(delta.x.is_finite() && delta.y.is_finite()) {
        return None;
    }
    let limit = state.limits.frame(viewport);
    let (h_bounds, v_bounds) = AxisBounds::pair(limit, viewport, state.min_size);
    let (h_span, v_span) = Span::pair(frame);
    let ratio = state.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0);

    let moved = match handle {
        Handle::Center => translate(h_span, v_span, delta, &h_bounds, &v_bounds),
        Handle::LeftTop | Handle::RightTop | Handle::LeftBottom | Handle::RightBottom => {
            let delta = match ratio {
                Some(r) => locked_corner_delta(handle, delta, frame, r),
                None => delta,
            };
            resize_corner(handle, h_span, v_span, delta, &h_bounds, &v_bounds)
        }
        Handle::Left | Handle::Right | Handle::Top | Handle::Bottom => {
            resize_side(handle, h_span, v_span, delta, ratio, &h_bounds, &v_bounds)
        }
    };

    match moved {
        Ok((h, v)) => Some(LayoutEdges::from_frame(
            Rect::new(h.start, v.start, h.len(), v.len()),
            viewport,
        )),
        Err(violation) => {
            trace!(
                "drag on {handle:?} by ({:.2}, {:.2}) rejected: {violation:?}",
                delta.x,
                delta.y
            );
            None
        }
    }
}

/// Derive the minor axis of a corner drag from the major one so the frame keeps `ratio`.
///
/// The major axis is the one whose movement is larger relative to the
/// current frame extent on that axis.
fn locked_corner_delta(handle: Handle, delta: Point, frame: Rect, ratio: f64) -> Point {
    // LeftTop and RightBottom grow both axes in the same direction.
    let sign = match handle {
        Handle::LeftTop | Handle::RightBottom => 1.0,
        _ => -1.0,
    };
    let h_ratio = Float::abs(delta.x) / frame.width;
    let v_ratio = Float::abs(delta.y) / frame.height;
    if h_ratio > v_ratio {
        Point::new(delta.x, sign * delta.x / ratio)
    } else {
        Point::new(sign * delta.y * ratio, delta.y)
    }
}

fn resize_corner(
    handle: Handle,
    h: Span,
    v: Span,
    delta: Point,
    hb: &AxisBounds,
    vb: &AxisBounds,
) -> Result<(Span, Span), Violation> {
    let h = match handle.h_edge() {
        Some(HEdge::Left) => h.move_start(delta.x, hb)?,
        Some(HEdge::Right) => h.move_end(delta.x, hb)?,
        None => h,
    };
    let v = match handle.v_edge() {
        Some(VEdge::Top) => v.move_start(delta.y, vb)?,
        Some(VEdge::Bottom) => v.move_end(delta.y, vb)?,
        None => v,
    };
    Ok((h, v))
}

/// One edge follows the pointer. With a ratio, the far perpendicular edge
/// (bottom for left/right, right for top/bottom) follows the new extent.
fn resize_side(
    handle: Handle,
    h: Span,
    v: Span,
    delta: Point,
    ratio: Option<f64>,
    hb: &AxisBounds,
    vb: &AxisBounds,
) -> Result<(Span, Span), Violation> {
    if handle.h_edge().is_some() {
        let h = match handle.h_edge() {
            Some(HEdge::Left) => h.move_start(delta.x, hb)?,
            _ => h.move_end(delta.x, hb)?,
        };
        let v = match ratio {
            Some(r) => v.move_end(h.len() / r - v.len(), vb)?,
            None => v,
        };
        Ok((h, v))
    } else {
        let v = match handle.v_edge() {
            Some(VEdge::Top) => v.move_start(delta.y, vb)?,
            _ => v.move_end(delta.y, vb)?,
        };
        let h = match ratio {
            Some(r) => h.move_end(v.len() * r - h.len(), hb)?,
            None => h,
        };
        Ok((h, v))
    }
}

fn translate(
    h: Span,
    v: Span,
    delta: Point,
    hb: &AxisBounds,
    vb: &AxisBounds,
) -> Result<(Span, Span), Violation> {
    match (h.shift(delta.x, hb), v.shift(delta.y, vb)) {
        (Err(e), Err(_)) => Err(e),
        (h2, v2) => Ok((h2.unwrap_or(h), v2.unwrap_or(v))),
    }
}

/// The crop frame projected onto one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Span {
    start: f64,
    end: f64,
}

impl Span {
    fn pair(frame: Rect) -> (Span, Span) {
        (
            Span {
                start: frame.x,
                end: frame.max_x(),
            },
            Span {
                start: frame.y,
                end: frame.max_y(),
            },
        )
    }

    fn len(&self) -> f64 {
        self.end - self.start
    }

    fn move_start(self, d: f64, b: &AxisBounds) -> Result<Span, Violation> {
        let start = self.start + d;
        if start < b.limit_start {
            return Err(Violation::Limit);
        }
        if start < 0.0 && d <= 0.0 {
            return Err(Violation::Viewport);
        }
        if self.end - start < b.min_len {
            return Err(Violation::MinSize);
        }
        Ok(Span {
            start,
            end: self.end,
        })
    }

    fn move_end(self, d: f64, b: &AxisBounds) -> Result<Span, Violation> {
        let end = self.end + d;
        if end > b.limit_end {
            return Err(Violation::Limit);
        }
        if end > b.view_len && d >= 0.0 {
            return Err(Violation::Viewport);
        }
        if end - self.start < b.min_len {
            return Err(Violation::MinSize);
        }
        Ok(Span {
            start: self.start,
            end,
        })
    }

    fn shift(self, d: f64, b: &AxisBounds) -> Result<Span, Violation> {
        let start = self.start + d;
        let end = self.end + d;
        if start < b.limit_start || end > b.limit_end {
            return Err(Violation::Limit);
        }
        if (start < 0.0 && d <= 0.0) || (end > b.view_len && d >= 0.0) {
            return Err(Violation::Viewport);
        }
        Ok(Span { start, end })
    }
}

/// Bounds for one axis.
#[derive(Copy, Clone, Debug)]
struct AxisBounds {
    limit_start: f64,
    limit_end: f64,
    /// Viewport extent; the viewport starts at 0.
    view_len: f64,
    min_len: f64,
}

impl AxisBounds {
    fn pair(limit: Rect, viewport: Size, min_len: f64) -> (AxisBounds, AxisBounds) {
        (
            AxisBounds {
                limit_start: limit.x,
                limit_end: limit.max_x(),
                view_len: viewport.width,
                min_len,
            },
            AxisBounds {
                limit_start: limit.y,
                limit_end: limit.max_y(),
                view_len: viewport.height,
                min_len,
            },
        )
    }
}

/// State of one pointer gesture on a handle, from pointer-down to pointer-up.
///
/// Everything the constrained recompute needs is captured by
/// [`begin`](Self::begin), so updates never have to check for missing state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragSession {
    handle: Handle,
    start: Point,
    last: Point,
    initial_edges: LayoutEdges,
    limits: LayoutEdges,
}

impl DragSession {
    /// Start a drag on `handle` at `point`.
    ///
    /// The limits are the union of `image_frame` and the crop frame at this
    /// moment, so a crop that already hangs over the image edge can still be
    /// moved back.
    pub fn begin(
        handle: Handle,
        point: Point,
        edges: LayoutEdges,
        image_frame: Rect,
        viewport: Size,
    ) -> Self {
        let frame = edges.frame(viewport);
        let limits = LayoutEdges::from_frame(image_frame.union(&frame), viewport);
        Self {
            handle,
            start: point,
            last: point,
            initial_edges: edges,
            limits,
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn start_point(&self) -> Point {
        self.start
    }

    pub fn last_point(&self) -> Point {
        self.last
    }

    /// Edges when the drag began.
    pub fn initial_edges(&self) -> LayoutEdges {
        self.initial_edges
    }

    pub fn limits(&self) -> LayoutEdges {
        self.limits
    }

    /// Pointer displacement since the drag began.
    pub fn total_delta(&self) -> Point {
        self.last.delta_from(self.start)
    }

    /// Feed the next pointer position.
    ///
    /// The delta since the previous position is applied to `edges`. The
    /// session advances to `point` whether or not the move is accepted.
    pub fn update(
        &mut self,
        point: Point,
        edges: LayoutEdges,
        viewport: Size,
        aspect_ratio: Option<f64>,
        min_size: f64,
    ) -> Option<LayoutEdges> {
        let delta = point.delta_from(self.last);
        self.last = point;
        apply_drag(
            self.handle,
            delta,
            &DragState {
                edges,
                limits: self.limits,
                viewport,
                aspect_ratio,
                min_size,
            },
        )
    }
}
