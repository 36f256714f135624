//! SVG snapshot of a crop picker.
//!
//! Draws what the host view would show: the viewport, the image frame, the
//! dimmed mask with the crop punched out, the crop outline with its thirds
//! guides and corner handles, and a label with the source pixel region.
//!
//! # Example
//!
//! ```
//! use cropframe::{CropConfig, CropPicker, PixelSize, Size, svg::render_crop_svg};
//!
//! let mut picker = CropPicker::new(Size::new(400.0, 300.0), CropConfig::new());
//! picker.set_image(Some(PixelSize::new(1600, 900)));
//!
//! let svg = render_crop_svg(&picker);
//! // svg is a complete SVG document string
//! assert!(svg.contains("1600×900"));
//! ```

use crate::config::Color;
use crate::drag::Handle;
use crate::extract::extract;
use crate::geometry::{Rect, Size};
use crate::picker::CropPicker;

/// Maximum pixel width of the viewport panel.
const MAX_PANEL_W: f64 = 480.0;
/// Maximum pixel height of the viewport panel.
const MAX_PANEL_H: f64 = 360.0;
/// Horizontal margin.
const MARGIN_X: f64 = 30.0;
/// Top margin.
const MARGIN_TOP: f64 = 20.0;
/// Height of label text area above and below the panel.
const LABEL_H: f64 = 22.0;
/// Corner handle arm length, in panel pixels.
const HANDLE_LEN: f64 = 14.0;

/// Scale a viewport to fit within MAX_PANEL_W × MAX_PANEL_H, preserving aspect ratio.
fn scale_to_fit(size: Size) -> (f64, f64, f64) {
    if !size.is_positive() {
        return (1.0, 1.0, 1.0);
    }
    let scale = (MAX_PANEL_W / size.width).min(MAX_PANEL_H / size.height);
    (size.width * scale, size.height * scale, scale)
}

/// Render a complete SVG document of the picker's current state.
pub fn render_crop_svg(picker: &CropPicker) -> String {
    let config = picker.config();
    let state = picker.viewport_state();
    let (pw, ph, scale) = scale_to_fit(state.viewport);
    let total_w = pw + 2.0 * MARGIN_X;
    let total_h = MARGIN_TOP + LABEL_H + ph + LABEL_H + MARGIN_TOP;
    let ox = MARGIN_X;
    let oy = MARGIN_TOP + LABEL_H;
    let place = |r: Rect| Rect::new(ox + r.x * scale, oy + r.y * scale, r.width * scale, r.height * scale);

    let mut svg = String::with_capacity(4096);

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    svg.push_str(r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .annotation { font-size: 11px; fill: #666; }
  .image { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  .guide { stroke-width: 0.75; stroke-opacity: 0.6; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .annotation { fill: #aaa; }
    .image { fill: #3a72a4; stroke: #5a9fd4; }
  }
</style>
"##);

    let label = match picker.image() {
        Some(i) => format!("Image  {}×{}  zoom {:.2}", i.width, i.height, state.zoom_scale),
        None => String::from("No image"),
    };
    svg.push_str(&format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
        total_w / 2.0,
        MARGIN_TOP + 14.0,
        escape_xml(&label)
    ));
    svg.push('\n');

    // Viewport, clipped so the zoomed image does not spill over the margins.
    svg.push_str(&format!(
        r#"<clipPath id="viewport"><rect x="{ox:.1}" y="{oy:.1}" width="{pw:.1}" height="{ph:.1}"/></clipPath>"#
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"<rect x="{ox:.1}" y="{oy:.1}" width="{pw:.1}" height="{ph:.1}" {}/>"#,
        fill(config.scroll_background)
    ));
    svg.push('\n');
    svg.push_str(r#"<g clip-path="url(#viewport)">"#);
    svg.push('\n');

    if picker.image().is_some() {
        let content = place(Rect::new(
            -state.pan_offset.x,
            -state.pan_offset.y,
            state.content_size().width,
            state.content_size().height,
        ));
        svg.push_str(&rect_tag(content, &fill(config.image_background)));
        svg.push_str(&rect_tag(place(picker.image_frame()), r#"class="image""#));
    }

    if let Some(mask) = picker.mask() {
        let b = place(mask.bounds);
        let mut d = subpath(b);
        if let Some(hole) = mask.hole {
            d.push(' ');
            d.push_str(&subpath(place(hole)));
        }
        svg.push_str(&format!(
            r#"<path d="{d}" fill-rule="evenodd" {}/>"#,
            fill(config.dim_color)
        ));
        svg.push('\n');
    }

    if picker.crop_lines_visible() {
        let crop = place(picker.crop_frame());
        let stroke = format!(
            r#"fill="none" stroke="{}" stroke-opacity="{:.3}""#,
            config.line_color,
            config.line_color.opacity()
        );
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" {stroke} stroke-width="1.5"/>"#,
            crop.x, crop.y, crop.width, crop.height
        ));
        svg.push('\n');

        if picker.guides_visible() {
            for i in 1..3 {
                let t = i as f64 / 3.0;
                let gx = crop.x + crop.width * t;
                let gy = crop.y + crop.height * t;
                svg.push_str(&format!(
                    r#"<line x1="{gx:.1}" y1="{:.1}" x2="{gx:.1}" y2="{:.1}" class="guide" {stroke}/>"#,
                    crop.y,
                    crop.max_y()
                ));
                svg.push_str(&format!(
                    r#"<line x1="{:.1}" y1="{gy:.1}" x2="{:.1}" y2="{gy:.1}" class="guide" {stroke}/>"#,
                    crop.x,
                    crop.max_x()
                ));
                svg.push('\n');
            }
        }

        for handle in Handle::CORNERS {
            let width = if picker.active_handle() == Some(handle) { 5.0 } else { 3.0 };
            svg.push_str(&format!(
                r#"<path d="{}" {stroke} stroke-width="{width}"/>"#,
                corner_path(crop, handle)
            ));
            svg.push('\n');
        }
    }

    svg.push_str("</g>\n");

    let annotation = match extract(state, &picker.edges(), picker.image()) {
        Ok(region) => {
            let p = region.pixels;
            format!("crop {}×{} at ({}, {})", p.width, p.height, p.x, p.y)
        }
        Err(e) => format!("{e}"),
    };
    svg.push_str(&format!(
        r#"<text x="{}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
        total_w / 2.0,
        oy + ph + 15.0,
        escape_xml(&annotation)
    ));
    svg.push('\n');

    svg.push_str("</svg>\n");
    svg
}

fn fill(color: Color) -> String {
    format!(r#"fill="{color}" fill-opacity="{:.3}""#, color.opacity())
}

fn rect_tag(r: Rect, attrs: &str) -> String {
    format!(
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" {attrs}/>\n",
        r.x, r.y, r.width, r.height
    )
}

fn subpath(r: Rect) -> String {
    format!(
        "M{:.1},{:.1} H{:.1} V{:.1} H{:.1} Z",
        r.x,
        r.y,
        r.max_x(),
        r.max_y(),
        r.x
    )
}

/// L-shaped marker hugging the crop corner for `handle`.
fn corner_path(crop: Rect, handle: Handle) -> String {
    let (x, dx) = match handle {
        Handle::LeftTop | Handle::LeftBottom => (crop.x, HANDLE_LEN),
        _ => (crop.max_x(), -HANDLE_LEN),
    };
    let (y, dy) = match handle {
        Handle::LeftTop | Handle::RightTop => (crop.y, HANDLE_LEN),
        _ => (crop.max_y(), -HANDLE_LEN),
    };
    format!(
        "M{:.1},{:.1} L{:.1},{:.1} L{:.1},{:.1}",
        x + dx,
        y,
        x,
        y,
        x,
        y + dy
    )
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
