// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersections between lines and curves, and between two curves.
//!
//! A line meets a Bézier curve where the curve's signed distance from the
//! line vanishes; that distance is a polynomial in the curve parameter, so
//! line/curve intersections reduce to root finding. Arcs are mapped into the
//! frame where their ellipse is the unit circle. Two curves are intersected by
//! cutting one into chords, intersecting the chords with the other, and
//! polishing the hits with Newton's method.

use arrayvec::ArrayVec;

use crate::common::{solve_cubic, solve_quadratic, Root};
use crate::epsilon::{at_end, in_unit_interval, snap_unit, EPSILON};
use crate::intersection::sort_and_dedup;
use crate::primitive::{line_line, ray_circle};
use crate::{
    Arc, CubicBez, Intersection, IntersectionList, Line, ParamCurve, PathSeg, Point, QuadBez,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Maximum distance between a curve and the chords that stand in for it.
///
/// Used for curve/curve intersection and for winding numbers of curved
/// segments.
pub const FLATTEN_TOLERANCE: f64 = 1e-3;

const NEWTON_STEPS: usize = 16;

/// Curve/curve hits closer than this in both parameters are one hit.
const MERGE_DISTANCE: f64 = 1e-5;

/// Points closer than this count as lying on a curve when matching end
/// points and overlaps.
const ON_CURVE_DISTANCE: f64 = 1e-7;

/// Parameter offset at which to sample which side of a tangent line a curve is on.
const SIDE_STEP: f64 = 1e-4;

/// Intersect a line segment with a quadratic Bézier.
///
/// The records hold the line parameter in `t_a` and the curve parameter in
/// `t_b`. A contact is tangent when it is a double root of the distance
/// polynomial or lies at an end point of either segment. A curve lying on the
/// line is reported once, as a tangent contact at the midpoint of the shared
/// stretch.
pub fn line_quad(line: Line, quad: QuadBez) -> IntersectionList {
    let mut result = IntersectionList::new();
    let d = line.direction();
    if d.hypot() <= EPSILON {
        return result;
    }
    let (a, b, c) = quad.power_basis();
    let c = c - line.p0.to_vec2();
    if on_line(line, &[quad.p0, quad.p1, quad.p2]) {
        let d2 = d.hypot2();
        let along = [d.dot(c) / d2, d.dot(b) / d2, d.dot(a) / d2, 0.0];
        result.extend(collinear_curve(line, &quad, along));
        return result;
    }
    for root in solve_quadratic(d.cross(c), d.cross(b), d.cross(a)) {
        push_line_hit(&mut result, line, &quad, root);
    }
    sort_and_dedup(&mut result);
    result
}

/// Intersect a line segment with a cubic Bézier.
///
/// Records are laid out and classified as for [`line_quad`].
pub fn line_cubic(line: Line, cubic: CubicBez) -> IntersectionList {
    let mut result = IntersectionList::new();
    let d = line.direction();
    if d.hypot() <= EPSILON {
        return result;
    }
    let (a, b, c, p) = cubic.power_basis();
    let p = p - line.p0.to_vec2();
    if on_line(line, &[cubic.p0, cubic.p1, cubic.p2, cubic.p3]) {
        let d2 = d.hypot2();
        let along = [d.dot(p) / d2, d.dot(c) / d2, d.dot(b) / d2, d.dot(a) / d2];
        result.extend(collinear_curve(line, &cubic, along));
        return result;
    }
    for root in solve_cubic(d.cross(p), d.cross(c), d.cross(b), d.cross(a)) {
        push_line_hit(&mut result, line, &cubic, root);
    }
    sort_and_dedup(&mut result);
    result
}

/// Whether all control points lie on the infinite line.
fn on_line(line: Line, points: &[Point]) -> bool {
    points
        .iter()
        .all(|&p| line.signed_distance(p).abs() <= EPSILON)
}

/// The midpoint of the stretch a curve lying on `line` shares with it.
///
/// `along` holds the coefficients, lowest degree first, of the line
/// parameter of the point `curve(t)`.
fn collinear_curve(line: Line, curve: &impl ParamCurve, along: [f64; 4]) -> Option<Intersection> {
    let [c0, c1, c2, c3] = along;
    let s_at = |t: f64| ((c3 * t + c2) * t + c1) * t + c0;
    // The curve's extent along the line is reached at an end or where it
    // turns back.
    let mut ts: ArrayVec<f64, 8> = ArrayVec::new();
    ts.push(0.0);
    ts.push(1.0);
    for root in solve_quadratic(c1, 2.0 * c2, 3.0 * c3) {
        if root.value > 0.0 && root.value < 1.0 {
            ts.push(root.value);
        }
    }
    let lo = ts.iter().map(|&t| s_at(t)).fold(f64::INFINITY, f64::min);
    let hi = ts.iter().map(|&t| s_at(t)).fold(f64::NEG_INFINITY, f64::max);
    let lo = lo.max(0.0);
    let hi = hi.min(1.0);
    if lo > hi + EPSILON {
        return None;
    }
    let s = snap_unit(0.5 * (lo + hi));

    for root in solve_cubic(c0 - s, c1, c2, c3) {
        if in_unit_interval(root.value) && ts.len() < ts.capacity() {
            ts.push(snap_unit(root.value));
        }
    }
    let t = ts
        .iter()
        .copied()
        .min_by(|&t0, &t1| (s_at(t0) - s).abs().total_cmp(&(s_at(t1) - s).abs()))?;
    let point = if s == 0.0 {
        line.p0
    } else if s == 1.0 {
        line.p1
    } else {
        curve.eval(t)
    };
    Some(Intersection::new(point, s, t, true))
}

/// Record a root of the distance polynomial of `curve` if it lies on both
/// segments.
fn push_line_hit(out: &mut IntersectionList, line: Line, curve: &impl ParamCurve, root: Root) {
    if !in_unit_interval(root.value) {
        return;
    }
    let t = snap_unit(root.value);
    let on_curve = if t == 0.0 {
        curve.start()
    } else if t == 1.0 {
        curve.end()
    } else {
        curve.eval(t)
    };
    let s = line.project(on_curve);
    if !in_unit_interval(s) {
        return;
    }
    let s = snap_unit(s);
    let point = if s == 0.0 {
        line.p0
    } else if s == 1.0 {
        line.p1
    } else {
        on_curve
    };
    let tangent = root.multiple || at_end(t) || at_end(s);
    out.push(Intersection::new(point, s, t, tangent));
}

/// Intersect a line segment with an elliptical arc in center form.
///
/// The line is moved into the frame where the arc's ellipse is the unit
/// circle and intersected there with [`ray_circle`]. Hits are kept when they
/// lie within the arc's sweep and on the segment. The records hold the line
/// parameter in `t_a` and the arc parameter in `t_b`. A contact is tangent
/// when the line touches the ellipse or the hit lies at an end point of either
/// segment.
///
/// An arc with zero sweep or a zero radius has no intersections here; callers
/// treat the latter as a line.
pub fn line_ellipse(line: Line, arc: Arc) -> IntersectionList {
    let mut result = IntersectionList::new();
    if arc.sweep_angle == 0.0
        || arc.radii.x.abs() <= EPSILON
        || arc.radii.y.abs() <= EPSILON
        || line.length() <= EPSILON
    {
        return result;
    }
    let to_unit = |p: Point| {
        let v = (p - arc.center).rotate(-arc.x_rotation);
        Point::new(v.x / arc.radii.x, v.y / arc.radii.y)
    };
    let Some((p, q)) = ray_circle(to_unit(line.p0), to_unit(line.p1), Point::ORIGIN, 1.0) else {
        return result;
    };
    let touch = p == q;
    let count = if touch { 1 } else { 2 };
    for u in [p, q].into_iter().take(count) {
        let t = arc.param_of_angle(u.to_vec2().atan2());
        if !in_unit_interval(t) {
            continue;
        }
        let t = snap_unit(t);
        let on_arc = arc.eval(t);
        let s = line.project(on_arc);
        if !in_unit_interval(s) {
            continue;
        }
        let s = snap_unit(s);
        let point = if s == 0.0 {
            line.p0
        } else if s == 1.0 {
            line.p1
        } else {
            on_arc
        };
        let tangent = touch || at_end(t) || at_end(s);
        result.push(Intersection::new(point, s, t, tangent));
    }
    sort_and_dedup(&mut result);
    result
}

/// Intersect a line segment with any segment; `t_a` is on the line.
fn line_segment(line: Line, seg: &PathSeg) -> IntersectionList {
    match *seg {
        PathSeg::Line(other) => line_line(line, other).into_iter().collect(),
        PathSeg::Quad(quad) => line_quad(line, quad),
        PathSeg::Cubic(cubic) => line_cubic(line, cubic),
        PathSeg::Arc(svg) => match Arc::from_svg_arc(&svg) {
            Some(arc) => line_ellipse(line, arc),
            None => line_line(line, Line::new(svg.from, svg.to))
                .into_iter()
                .collect(),
        },
    }
}

/// Intersect two curved segments.
///
/// `a` is replaced by chords within [`FLATTEN_TOLERANCE`], every chord is
/// intersected with `b`, and each hit is polished with a bounded Newton
/// iteration on `a(t_a) = b(t_b)`. End points of either curve that lie on the
/// other are added as contacts. Hits that do not converge to within the
/// flattening tolerance are dropped, and hits closer than `1e-5` in both
/// parameters are merged.
///
/// Where the curves run along each other, the consecutive hits on the shared
/// stretch collapse into one tangent contact at its middle.
///
/// A contact is tangent when it lies at an end point, or when near the hit
/// one curve stays on one side of the other's tangent line. A touch where
/// both curves bend away from each other can fall between the chords and go
/// unreported.
pub fn curve_curve(a: &PathSeg, b: &PathSeg) -> IntersectionList {
    let mut candidates = IntersectionList::new();
    for (t_a, p) in [(0.0, a.start()), (1.0, a.end())] {
        if let Some(t_b) = locate(b, p) {
            candidates.push(Intersection::new(p, t_a, t_b, true));
        }
    }
    for (t_b, p) in [(0.0, b.start()), (1.0, b.end())] {
        if let Some(t_a) = locate(a, p) {
            candidates.push(Intersection::new(p, t_a, t_b, true));
        }
    }
    let mut u0 = 0.0;
    let mut p0 = a.start();
    for u1 in a.chord_params(FLATTEN_TOLERANCE).skip(1) {
        let p1 = if u1 == 1.0 { a.end() } else { a.eval(u1) };
        for hit in line_segment(Line::new(p0, p1), b) {
            let u = u0 + hit.t_a * (u1 - u0);
            if let Some((u, v)) = refine(a, b, u, hit.t_b) {
                let tangent = at_end(u)
                    || at_end(v)
                    || stays_on_one_side(a, u, b, v)
                    || stays_on_one_side(b, v, a, u);
                candidates.push(Intersection::new(a.eval(u), u, v, tangent));
            }
        }
        u0 = u1;
        p0 = p1;
    }

    candidates.sort_by(Intersection::cmp_a);
    let mut merged = IntersectionList::new();
    for candidate in candidates {
        let existing = merged.iter_mut().find(|r| {
            (r.t_a - candidate.t_a).abs() <= MERGE_DISTANCE
                && (r.t_b - candidate.t_b).abs() <= MERGE_DISTANCE
        });
        if let Some(existing) = existing {
            existing.tangent |= candidate.tangent;
            if at_end(candidate.t_a) || at_end(candidate.t_b) {
                *existing = Intersection {
                    tangent: existing.tangent,
                    ..candidate
                };
            }
        } else {
            merged.push(candidate);
        }
    }
    collapse_overlaps(a, b, merged)
}

/// The parameter at which `seg` passes through `p`, if it does.
fn locate(seg: &PathSeg, p: Point) -> Option<f64> {
    let mut t = seg
        .chord_params(FLATTEN_TOLERANCE)
        .min_by(|&t0, &t1| {
            seg.eval(t0)
                .distance(p)
                .total_cmp(&seg.eval(t1).distance(p))
        })?;
    for _ in 0..NEWTON_STEPS {
        let f = seg.eval(t) - p;
        let d = seg.tangent(t);
        let d2 = d.hypot2();
        if f.hypot() <= EPSILON || d2 == 0.0 {
            break;
        }
        t = (t - f.dot(d) / d2).clamp(0.0, 1.0);
    }
    let t = snap_unit(t);
    (seg.eval(t).distance(p) <= ON_CURVE_DISTANCE).then_some(t)
}

/// Replace each run of hits along which `a` and `b` coincide by a single
/// tangent record halfway along the run.
fn collapse_overlaps(a: &PathSeg, b: &PathSeg, hits: IntersectionList) -> IntersectionList {
    let coincide = |h0: &Intersection, h1: &Intersection| {
        [0.25, 0.5, 0.75].iter().all(|&f| {
            let u = h0.t_a + f * (h1.t_a - h0.t_a);
            let v = h0.t_b + f * (h1.t_b - h0.t_b);
            a.eval(u).distance(b.eval(v)) <= ON_CURVE_DISTANCE
        })
    };
    let mut result = IntersectionList::new();
    let mut i = 0;
    while i < hits.len() {
        let mut j = i;
        while j + 1 < hits.len() && coincide(&hits[j], &hits[j + 1]) {
            j += 1;
        }
        if j == i {
            result.push(hits[i]);
        } else {
            let u = 0.5 * (hits[i].t_a + hits[j].t_a);
            let v = 0.5 * (hits[i].t_b + hits[j].t_b);
            result.push(Intersection::new(a.eval(u), u, v, true));
        }
        i = j + 1;
    }
    result
}

/// Newton iteration for `a(u) - b(v) = 0`, starting from a chord hit.
fn refine(a: &PathSeg, b: &PathSeg, mut u: f64, mut v: f64) -> Option<(f64, f64)> {
    for _ in 0..NEWTON_STEPS {
        let f = a.eval(u) - b.eval(v);
        if f.hypot() <= EPSILON {
            break;
        }
        let da = a.tangent(u);
        let db = b.tangent(v);
        let det = da.cross(db);
        // Parallel tangents: the chord hit is as good as it gets.
        if det.abs() <= EPSILON * da.hypot() * db.hypot() {
            break;
        }
        u = (u - f.cross(db) / det).clamp(0.0, 1.0);
        v = (v + da.cross(f) / det).clamp(0.0, 1.0);
    }
    if a.eval(u).distance(b.eval(v)) > FLATTEN_TOLERANCE {
        return None;
    }
    Some((snap_unit(u), snap_unit(v)))
}

/// Whether `b` stays on one side of the tangent line of `a` at `a(u)` around
/// parameter `v`.
fn stays_on_one_side(a: &PathSeg, u: f64, b: &PathSeg, v: f64) -> bool {
    let origin = a.eval(u);
    let dir = a.tangent(u);
    let side = |w: f64| dir.cross(b.eval(w) - origin);
    let before = side((v - SIDE_STEP).max(0.0));
    let after = side((v + SIDE_STEP).min(1.0));
    before * after >= 0.0
}

/// Intersect two path segments of any kind.
///
/// Dispatches on the pair of segment kinds; arcs that degenerate to a
/// straight line are intersected as lines. Swapping the arguments yields the
/// same points with the parameters swapped. Records on a segment end point
/// carry that end point exactly.
pub fn segment_intersections(a: &PathSeg, b: &PathSeg) -> IntersectionList {
    let mut result = match (a.as_line(), b.as_line()) {
        (Some(la), Some(lb)) => line_line(la, lb).into_iter().collect(),
        (Some(la), None) => line_segment(la, b),
        (None, Some(lb)) => line_segment(lb, a)
            .iter()
            .map(Intersection::swapped)
            .collect(),
        (None, None) => curve_curve(a, b),
    };
    for record in &mut result {
        pin_end_point(record, a, b);
    }
    sort_and_dedup(&mut result);
    result
}

fn pin_end_point(record: &mut Intersection, a: &PathSeg, b: &PathSeg) {
    if record.t_a == 0.0 {
        record.point = a.start();
    } else if record.t_a == 1.0 {
        record.point = a.end();
    } else if record.t_b == 0.0 {
        record.point = b.start();
    } else if record.t_b == 1.0 {
        record.point = b.end();
    }
}
