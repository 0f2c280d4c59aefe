// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic Bézier segments.

use core::ops::Range;

use crate::{Line, ParamCurve, ParamCurveDeriv, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single quadratic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadBez {
    /// The start point.
    pub p0: Point,
    /// The control point.
    pub p1: Point,
    /// The end point.
    pub p2: Point,
}

impl QuadBez {
    /// Create a new quadratic Bézier segment.
    #[inline(always)]
    pub fn new<V: Into<Point>>(p0: V, p1: V, p2: V) -> QuadBez {
        QuadBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
        }
    }

    /// Returns a new `QuadBez` with the points reversed.
    #[must_use]
    #[inline]
    pub fn reversed(&self) -> QuadBez {
        QuadBez {
            p0: self.p2,
            p1: self.p1,
            p2: self.p0,
        }
    }

    /// Coefficients of the curve in the power basis.
    ///
    /// Returns `(a, b, c)` such that `eval(t) = a t² + b t + c`.
    #[inline]
    pub fn power_basis(&self) -> (Vec2, Vec2, Vec2) {
        let p0 = self.p0.to_vec2();
        let p1 = self.p1.to_vec2();
        let p2 = self.p2.to_vec2();
        (p0 - 2.0 * p1 + p2, 2.0 * (p1 - p0), p0)
    }

    /// Number of chords needed to approximate the curve within `tolerance`.
    ///
    /// Uses the bound `|B''| / (8 n²)` on the distance between a curve and
    /// its chords over `n` equal parameter steps.
    pub fn chord_count(&self, tolerance: f64) -> usize {
        let dd = 2.0 * (self.p0.to_vec2() - 2.0 * self.p1.to_vec2() + self.p2.to_vec2()).hypot();
        chord_count_from_bound(dd, tolerance)
    }
}

/// Subdivision count for a curve with second derivative bounded by `dd`.
pub(crate) fn chord_count_from_bound(dd: f64, tolerance: f64) -> usize {
    const MAX_CHORDS: f64 = 1024.0;
    let n = (dd / (8.0 * tolerance)).sqrt().ceil();
    if n.is_finite() {
        n.clamp(1.0, MAX_CHORDS) as usize
    } else {
        1
    }
}

impl ParamCurve for QuadBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        (self.p0.to_vec2() * (mt * mt)
            + (self.p1.to_vec2() * (mt * 2.0) + self.p2.to_vec2() * t) * t)
            .to_point()
    }

    fn subsegment(&self, range: Range<f64>) -> QuadBez {
        let (t0, t1) = (range.start, range.end);
        let p0 = self.eval(t0);
        let p2 = self.eval(t1);
        let p1 = p0 + (self.p1 - self.p0).lerp(self.p2 - self.p1, t0) * (t1 - t0);
        QuadBez { p0, p1, p2 }
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p2
    }
}

impl ParamCurveDeriv for QuadBez {
    type DerivResult = Line;

    #[inline]
    fn deriv(&self) -> Line {
        Line::new(
            (2.0 * (self.p1.to_vec2() - self.p0.to_vec2())).to_point(),
            (2.0 * (self.p2.to_vec2() - self.p1.to_vec2())).to_point(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{ParamCurve, ParamCurveDeriv, Point, QuadBez};

    fn assert_near(p0: Point, p1: Point) {
        assert!((p1 - p0).hypot() < 1e-9, "{p0:?} != {p1:?}");
    }

    #[test]
    fn quadbez_deriv() {
        let q = QuadBez::new((0.0, 0.0), (0.0, 0.5), (1.0, 1.0));
        let deriv = q.deriv();

        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            let delta = 1e-6;
            let p = q.eval(t);
            let p1 = q.eval(t + delta);
            let d_approx = (p1 - p) * delta.recip();
            let d = deriv.eval(t).to_vec2();
            assert!((d - d_approx).hypot() < delta * 2.0);
        }
    }

    #[test]
    fn quadbez_subsegment() {
        let q = QuadBez::new((3.1, 4.1), (5.9, 2.6), (5.3, 5.8));
        let t0 = 0.1;
        let t1 = 0.8;
        let qs = q.subsegment(t0..t1);
        let epsilon = 1e-12;
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            let ts = t0 + t * (t1 - t0);
            assert!(q.eval(ts).distance(qs.eval(t)) < epsilon);
        }
    }

    #[test]
    fn quadbez_power_basis() {
        let q = QuadBez::new((0.0, 0.0), (10.0, 5.0), (0.0, 10.0));
        let (a, b, c) = q.power_basis();
        for t in [0.0, 0.3, 0.5, 1.0] {
            let p = (a * (t * t) + b * t + c).to_point();
            assert_near(p, q.eval(t));
        }
    }

    #[test]
    fn quadbez_reversed() {
        let q = QuadBez::new((0.0, 0.0), (10.0, 5.0), (0.0, 10.0));
        let r = q.reversed();
        assert_near(q.eval(0.25), r.eval(0.75));
        assert_eq!(r.reversed(), q);
    }

    #[test]
    fn quadbez_chord_count() {
        let straight = QuadBez::new((0.0, 0.0), (5.0, 0.0), (10.0, 0.0));
        assert_eq!(straight.chord_count(1e-3), 1);
        let bent = QuadBez::new((0.0, 0.0), (10.0, 5.0), (0.0, 10.0));
        // |B''| = 40, so 40 / (8 n²) <= 1e-3 needs n >= 71.
        assert_eq!(bent.chord_count(1e-3), 71);
    }
}
