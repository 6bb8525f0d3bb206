// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planar projections for pre-projected or lon/lat geometry.

use std::fmt::Debug;

use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Maps geometry coordinates onto the canvas.
pub trait Projection: Debug + Send + Sync {
    /// Projects one point.
    fn project(&self, p: Point) -> Point;
}

/// Passes coordinates through, shifted by a fixed offset.
///
/// Suits topologies that are already projected to screen units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Identity {
    /// Translation applied to every point.
    pub offset: Vec2,
}

impl Identity {
    /// An identity projection shifted by `offset`.
    pub fn new(offset: Vec2) -> Self {
        Self { offset }
    }
}

impl Projection for Identity {
    fn project(&self, p: Point) -> Point {
        p + self.offset
    }
}

/// Scales and centers a bounding box into a target rectangle, keeping the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    transform: Affine,
}

impl Fit {
    /// Fits `bounds` into `target`. With `flip_y`, larger y values end up higher on the canvas
    /// (latitude-style input).
    pub fn new(bounds: Rect, target: Rect, flip_y: bool) -> Self {
        let bw = bounds.width();
        let bh = bounds.height();
        let k = match (bw > 0.0, bh > 0.0) {
            (true, true) => (target.width() / bw).min(target.height() / bh),
            (true, false) => target.width() / bw,
            (false, true) => target.height() / bh,
            (false, false) => 1.0,
        };
        let sy = if flip_y { -k } else { k };
        let center = bounds.center();
        let transform = Affine::translate(target.center().to_vec2())
            * Affine::scale_non_uniform(k, sy)
            * Affine::translate(-center.to_vec2());
        Self { transform }
    }
}

impl Projection for Fit {
    fn project(&self, p: Point) -> Point {
        self.transform * p
    }
}

/// Closed path through every ring.
pub fn rings_to_path(rings: &[Vec<Point>], projection: &dyn Projection) -> BezPath {
    build_path(rings, projection, true)
}

/// Open path through every line.
pub fn lines_to_path(lines: &[Vec<Point>], projection: &dyn Projection) -> BezPath {
    build_path(lines, projection, false)
}

fn build_path(lines: &[Vec<Point>], projection: &dyn Projection, close: bool) -> BezPath {
    let mut path = BezPath::new();
    for line in lines {
        let mut points = line.iter().map(|p| projection.project(*p));
        let Some(first) = points.next() else {
            continue;
        };
        path.move_to(first);
        for p in points {
            path.line_to(p);
        }
        if close {
            path.close_path();
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use kurbo::{PathEl, Shape};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn identity_offsets() {
        let p = Identity::new(Vec2::new(50.0, 50.0)).project(Point::new(1.0, 2.0));
        assert_eq!(p, Point::new(51.0, 52.0));
    }

    #[test]
    fn fit_centers_and_keeps_aspect() {
        let fit = Fit::new(
            Rect::new(0.0, 0.0, 10.0, 5.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            false,
        );
        assert_eq!(fit.project(Point::new(5.0, 2.5)), Point::new(50.0, 50.0));
        assert_eq!(fit.project(Point::new(0.0, 0.0)), Point::new(0.0, 25.0));
        assert_eq!(fit.project(Point::new(10.0, 5.0)), Point::new(100.0, 75.0));
    }

    #[test]
    fn fit_flips_latitude() {
        let fit = Fit::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            true,
        );
        assert_eq!(fit.project(Point::new(0.0, 10.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn rings_close_each_subpath() {
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        let path = rings_to_path(&[ring.clone(), ring], &Identity::default());
        let closes = path
            .elements()
            .iter()
            .filter(|e| matches!(e, PathEl::ClosePath))
            .count();
        assert_eq!(closes, 2);
        assert!((path.area().abs() - 1.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn fit_keeps_bounds_inside_target(
            x0 in -1000.0_f64..1000.0,
            y0 in -1000.0_f64..1000.0,
            w in 0.1_f64..500.0,
            h in 0.1_f64..500.0,
            flip in any::<bool>(),
        ) {
            let bounds = Rect::new(x0, y0, x0 + w, y0 + h);
            let target = Rect::new(50.0, 50.0, 1050.0, 850.0);
            let fit = Fit::new(bounds, target, flip);
            for corner in [bounds.origin(), Point::new(bounds.x1, bounds.y1)] {
                let p = fit.project(corner);
                prop_assert!(p.x >= target.x0 - 1e-6 && p.x <= target.x1 + 1e-6);
                prop_assert!(p.y >= target.y0 - 1e-6 && p.y <= target.y1 + 1e-6);
            }
        }
    }
}
