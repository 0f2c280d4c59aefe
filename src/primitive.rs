// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-form intersections of lines and circles.

use crate::epsilon::{at_end, in_unit_interval, snap_unit, EPSILON};
use crate::{Intersection, Line, ParamCurve, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Intersect two line segments.
///
/// Parallel segments only meet when they are collinear; a non-empty overlap
/// is then reported once, at the midpoint of the overlap, as a tangent
/// contact. Otherwise the crossing is reported when it lies on both segments,
/// and it is tangent when it lands on an end point of either. Segments of
/// zero length never intersect.
pub fn line_line(a: Line, b: Line) -> Option<Intersection> {
    let da = a.direction();
    let db = b.direction();
    let len_a = da.hypot();
    let len_b = db.hypot();
    if len_a <= EPSILON || len_b <= EPSILON {
        return None;
    }

    let div = da.cross(db);
    if div.abs() / (len_a * len_b) <= EPSILON {
        return collinear_overlap(a, b);
    }

    let w = b.p0 - a.p0;
    let t_a = w.cross(db) / div;
    let t_b = w.cross(da) / div;
    if !in_unit_interval(t_a) || !in_unit_interval(t_b) {
        return None;
    }
    let t_a = snap_unit(t_a);
    let t_b = snap_unit(t_b);
    let tangent = at_end(t_a) || at_end(t_b);
    let point = if at_end(t_a) {
        a.eval(t_a)
    } else if at_end(t_b) {
        b.eval(t_b)
    } else {
        a.eval(t_a)
    };
    Some(Intersection::new(point, t_a, t_b, tangent))
}

/// The midpoint of the shared part of two parallel segments, if they are
/// collinear and overlap.
fn collinear_overlap(a: Line, b: Line) -> Option<Intersection> {
    if a.signed_distance(b.p0).abs() > EPSILON {
        return None;
    }
    let s0 = a.project(b.p0);
    let s1 = a.project(b.p1);
    let lo = s0.min(s1).max(0.0);
    let hi = s0.max(s1).min(1.0);
    if lo > hi + EPSILON {
        return None;
    }
    let t_a = snap_unit(0.5 * (lo + hi));
    let point = a.eval(t_a);
    let t_b = snap_unit(b.project(point));
    Some(Intersection::new(point, t_a, t_b, true))
}

/// Intersect the infinite line through `l0` and `l1` with a circle.
///
/// Returns `None` when the line misses the circle or `l0 == l1`. A line
/// touching the circle (discriminant within [`EPSILON`] of zero) returns
/// the touching point twice. The order of the two points follows the sign
/// of the line's y direction, as in the classical chord formula.
pub fn ray_circle(l0: Point, l1: Point, center: Point, radius: f64) -> Option<(Point, Point)> {
    let dir = l1 - l0;
    if dir.hypot2() == 0.0 {
        return None;
    }
    let d = dir.normalize();
    let big_d = (l0 - center).cross(d);
    let mut disc = radius * radius - big_d * big_d;
    if disc.abs() <= EPSILON {
        disc = 0.0;
    } else if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let sgn = if d.y < 0.0 { -1.0 } else { 1.0 };
    let a = Vec2::new(big_d * d.y, -big_d * d.x);
    let b = Vec2::new(sgn * d.x * root, d.y.abs() * root);
    Some((center + (a + b), center + (a - b)))
}

/// Intersect two circles.
///
/// Returns `None` for concentric circles, when the circles are too far apart
/// to meet, or when one lies inside the other. Touching circles return the
/// touching point twice.
pub fn circle_circle(c0: Point, r0: f64, c1: Point, r1: f64) -> Option<(Point, Point)> {
    let dist = c0.distance(c1);
    if dist <= EPSILON || dist < (r0 - r1).abs() - EPSILON || r0 + r1 + EPSILON < dist {
        return None;
    }
    let dist2 = dist * dist;
    let k = r0 * r0 - r1 * r1;
    let along = 0.5 * k / dist2;
    let across =
        0.5 * (2.0 * (r0 * r0 + r1 * r1) / dist2 - k * k / (dist2 * dist2) - 1.0).max(0.0).sqrt();
    let mid = c0.midpoint(c1) + (c1 - c0) * along;
    let perp = Vec2::new(c1.y - c0.y, c0.x - c1.x) * across;
    Some((mid + perp, mid - perp))
}
