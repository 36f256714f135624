//! End-to-end behaviour of the crop picker, driven the way a host view would
//! drive it: assign an image, program or drag the crop, then extract.
//!
//! Sweeps collect every failing case before asserting so one run shows the
//! whole picture.

use core::future::{Future, IntoFuture};
use core::pin::pin;
use core::task::{Context, Poll, Waker};

use cropframe::*;

/// Drive a crop job to completion.
fn block_on<F: IntoFuture>(f: F) -> F::Output {
    let mut fut = pin!(f.into_future());
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
    }
}

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Uniform in `[-range, range]`.
    fn delta(&mut self, range: f64) -> f64 {
        (self.next() % 10_000) as f64 / 10_000.0 * 2.0 * range - range
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next() as usize) % items.len()]
    }
}

const VIEWPORTS: [Size; 3] = [
    Size::new(400.0, 400.0),
    Size::new(640.0, 360.0),
    Size::new(375.0, 667.0),
];

const IMAGES: [PixelSize; 4] = [
    PixelSize::new(1000, 2000),
    PixelSize::new(3000, 1000),
    PixelSize::new(800, 800),
    PixelSize::new(4032, 3024),
];

/// Where a pointer would grab `handle` on `frame`.
fn grab_point(frame: Rect, handle: Handle) -> Point {
    match handle {
        Handle::LeftTop => frame.origin(),
        Handle::RightTop => Point::new(frame.max_x(), frame.y),
        Handle::LeftBottom => Point::new(frame.x, frame.max_y()),
        Handle::RightBottom => Point::new(frame.max_x(), frame.max_y()),
        Handle::Top => Point::new(frame.center().x, frame.y),
        Handle::Bottom => Point::new(frame.center().x, frame.max_y()),
        Handle::Left => Point::new(frame.x, frame.center().y),
        Handle::Right => Point::new(frame.max_x(), frame.center().y),
        Handle::Center => frame.center(),
    }
}

// ============================================================================
// Unit ↔ layout round trip
// ============================================================================

#[test]
fn unit_rect_round_trips_through_layout_edges() {
    let displays = [
        Rect::new(100.0, 0.0, 200.0, 400.0),
        Rect::new(0.0, 93.75, 640.0, 172.5),
        Rect::new(-250.0, -120.0, 900.0, 700.0),
        Rect::new(12.5, 7.25, 33.0, 1.5),
    ];
    let steps = [0.0, 0.05, 0.1, 0.333, 0.5, 0.75, 0.9, 1.0];
    let viewport = Size::new(400.0, 400.0);
    let mut failures = Vec::new();
    for display in displays {
        for &x1 in &steps {
            for &x2 in steps.iter().filter(|&&x2| x2 > x1) {
                for &y1 in &steps {
                    for &y2 in steps.iter().filter(|&&y2| y2 > y1) {
                        let unit = UnitRect::new(x1, y1, x2, y2);
                        let back = to_layout_edges(&unit, display, viewport, None)
                            .and_then(|e| to_unit_rect(&e, display, viewport));
                        match back {
                            Some(b) if b.approx_eq(&unit, 1e-9) => {}
                            other => failures.push(format!("{display:?} {unit:?} -> {other:?}")),
                        }
                    }
                }
            }
        }
    }
    assert!(
        failures.is_empty(),
        "{} round-trip failures:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn set_then_get_zoom_rect_is_identity() {
    let rect = UnitRect::new(0.1, 0.1, 0.9, 0.9);
    let mut failures = Vec::new();
    for viewport in VIEWPORTS {
        for image in IMAGES {
            let mut picker = CropPicker::new(viewport, CropConfig::new());
            picker.set_image(Some(image));
            picker.set_zoom_rect(rect);
            match picker.zoom_rect() {
                Some(r) if r.approx_eq(&rect, 1e-9) => {}
                other => failures.push(format!("{image:?} in {viewport:?}: {other:?}")),
            }
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

// ============================================================================
// Drag invariants
// ============================================================================

#[test]
fn random_drags_respect_minimum_size_and_image() {
    let handles = [
        Handle::LeftTop,
        Handle::RightTop,
        Handle::LeftBottom,
        Handle::RightBottom,
        Handle::Center,
        Handle::Top,
        Handle::Left,
        Handle::Right,
        Handle::Bottom,
    ];
    let mut rng = Lcg(0x5eed);
    let mut failures = Vec::new();
    let mut accepted = 0usize;
    for viewport in VIEWPORTS {
        for image in IMAGES {
            let mut picker = CropPicker::new(viewport, CropConfig::new().side_handles(true));
            picker.set_image(Some(image));
            let bounds = picker.image_frame();
            for gesture in 0..60 {
                let handle = rng.pick(&handles);
                let mut pointer = grab_point(picker.crop_frame(), handle);
                assert!(picker.begin_drag(handle, pointer));
                for step in 0..8 {
                    pointer = Point::new(pointer.x + rng.delta(60.0), pointer.y + rng.delta(60.0));
                    if !picker.drag_to(pointer) {
                        continue;
                    }
                    accepted += 1;
                    let f = picker.crop_frame();
                    if f.width < MIN_CROP_SIZE - 1e-9 || f.height < MIN_CROP_SIZE - 1e-9 {
                        failures.push(format!(
                            "{image:?}/{viewport:?} #{gesture}.{step} {handle:?}: too small {f:?}"
                        ));
                    }
                    if !bounds.contains_rect(&f, 1e-9) {
                        failures.push(format!(
                            "{image:?}/{viewport:?} #{gesture}.{step} {handle:?}: {f:?} outside {bounds:?}"
                        ));
                    }
                }
                assert_eq!(picker.end_drag(), Some(handle));
            }
        }
    }
    assert!(accepted > 0, "no drag was ever accepted");
    assert!(
        failures.is_empty(),
        "{} failures:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn corner_drags_preserve_locked_ratio() {
    let ratios = [0.5, 1.0, 1.5, 16.0 / 9.0];
    let mut rng = Lcg(42);
    let mut failures = Vec::new();
    for ratio in ratios {
        for viewport in VIEWPORTS {
            for image in IMAGES {
                let mut picker = CropPicker::new(viewport, CropConfig::new().aspect_ratio(ratio));
                picker.set_image(Some(image));
                for gesture in 0..40 {
                    let handle = rng.pick(&Handle::CORNERS);
                    let mut pointer = grab_point(picker.crop_frame(), handle);
                    picker.begin_drag(handle, pointer);
                    for _ in 0..6 {
                        pointer = Point::new(pointer.x + rng.delta(40.0), pointer.y + rng.delta(40.0));
                        picker.drag_to(pointer);
                    }
                    picker.end_drag();
                    let f = picker.crop_frame();
                    let actual = f.width / f.height;
                    if (actual - ratio).abs() > 1e-6 * ratio {
                        failures.push(format!(
                            "R={ratio} {image:?}/{viewport:?} after #{gesture} {handle:?}: {actual} ({f:?})"
                        ));
                    }
                }
            }
        }
    }
    assert!(
        failures.is_empty(),
        "{} failures:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn rejected_drag_leaves_crop_untouched() {
    let mut picker = CropPicker::new(Size::new(400.0, 400.0), CropConfig::new());
    picker.set_image(Some(PixelSize::new(1000, 2000)));
    let before = picker.edges();
    let frame = picker.crop_frame();
    assert!(picker.begin_drag(Handle::LeftTop, frame.origin()));
    // Far past the image's left edge.
    assert!(!picker.drag_to(Point::new(frame.x - 100.0, frame.y)));
    assert_eq!(picker.edges(), before);
    picker.end_drag();
}

// ============================================================================
// Defaults and extraction
// ============================================================================

#[test]
fn default_zoom_rect_portrait_square() {
    let r = default_zoom_rect(Rect::new(0.0, 0.0, 300.0, 600.0), Some(1.0));
    let expected = UnitRect::new(0.1, 0.3, 0.9, 0.7);
    assert!(r.approx_eq(&expected, 1e-12), "{r:?}");
    // Square in display units: 240 × 240.
    assert!((r.width() * 300.0 - 240.0).abs() < 1e-9);
    assert!((r.height() * 600.0 - 240.0).abs() < 1e-9);
}

#[test]
fn crop_without_image_is_no_image() {
    let mut picker = CropPicker::new(Size::new(400.0, 400.0), CropConfig::new());
    assert_eq!(block_on(picker.crop()), Err(CropError::NoImage));
    // Safe to call again once an image is assigned.
    picker.set_image(Some(PixelSize::new(10, 10)));
    assert!(block_on(picker.crop()).is_ok());
}

#[test]
fn full_display_crop_extracts_whole_image() {
    let mut picker = CropPicker::new(Size::new(400.0, 400.0), CropConfig::new());
    picker.set_image(Some(PixelSize::new(1000, 2000)));
    assert!(picker.set_zoom_rect(UnitRect::FULL));
    let region = block_on(picker.crop()).unwrap();
    let r = region.requested;
    assert!(r.x.abs() < 1e-6 && r.y.abs() < 1e-6, "{r:?}");
    assert!((r.width - 1000.0).abs() < 1e-6 && (r.height - 2000.0).abs() < 1e-6, "{r:?}");
    assert_eq!(region.pixels, PixelRect::new(0, 0, 1000, 2000));
}

#[test]
fn extracted_region_matches_zoom_rect() {
    let mut failures = Vec::new();
    let rect = UnitRect::new(0.25, 0.2, 0.75, 0.6);
    for viewport in VIEWPORTS {
        for image in IMAGES {
            let mut picker = CropPicker::new(viewport, CropConfig::new());
            picker.set_image(Some(image));
            picker.set_zoom_rect(rect);
            let r = match picker.crop_now() {
                Ok(region) => region.requested,
                Err(e) => {
                    failures.push(format!("{image:?}/{viewport:?}: {e}"));
                    continue;
                }
            };
            let w = image.width as f64;
            let h = image.height as f64;
            let ok = (r.x - rect.x1 * w).abs() < 1e-6
                && (r.y - rect.y1 * h).abs() < 1e-6
                && (r.width - rect.width() * w).abs() < 1e-6
                && (r.height - rect.height() * h).abs() < 1e-6;
            if !ok {
                failures.push(format!("{image:?}/{viewport:?}: {r:?}"));
            }
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn zoom_rect_survives_zoom_and_pan() {
    let mut picker = CropPicker::new(Size::new(400.0, 400.0), CropConfig::new());
    picker.set_image(Some(PixelSize::new(1000, 2000)));
    let before = picker.crop_now().unwrap().pixels;
    picker.zoom_to_fill();
    picker.set_zoom_rect(UnitRect::default());
    let after = picker.crop_now().unwrap().pixels;
    assert_eq!(before, after);
}

#[test]
fn jobs_are_send() {
    fn assert_send<T: Send + 'static>(_: &T) {}
    let mut picker = CropPicker::new(Size::new(400.0, 400.0), CropConfig::new());
    picker.set_image(Some(PixelSize::new(1000, 2000)));
    let job = picker.crop();
    assert_send(&job);
    let generation = job.generation();
    let handle = std::thread::spawn(move || job.run());
    let region = handle.join().unwrap().unwrap();
    assert!(picker.is_current(generation));
    assert_eq!(region.pixels, PixelRect::new(100, 200, 800, 1600));
}

// ============================================================================
// Serialization
// ============================================================================

#[cfg(feature = "serde")]
#[test]
fn unit_rect_json_shape() {
    let r = UnitRect::new(0.1, 0.2, 0.9, 0.8);
    let json = serde_json::to_value(r).unwrap();
    assert_eq!(json, serde_json::json!({"x1": 0.1, "y1": 0.2, "x2": 0.9, "y2": 0.8}));
    let back: UnitRect = serde_json::from_value(json).unwrap();
    assert_eq!(back, r);
}
