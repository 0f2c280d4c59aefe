// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use core::ops::Range;

use crate::{ParamCurve, ParamCurveDeriv, Point, Vec2};

/// A single line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline(always)]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Returns a copy of this `Line` with the end points swapped so that it
    /// points in the opposite direction.
    #[must_use]
    #[inline(always)]
    pub fn reversed(&self) -> Line {
        Self {
            p0: self.p1,
            p1: self.p0,
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(self) -> f64 {
        (self.p1 - self.p0).hypot()
    }

    /// The midpoint of the line.
    #[must_use]
    #[inline]
    pub fn midpoint(&self) -> Point {
        self.p0.midpoint(self.p1)
    }

    /// The vector from the start point to the end point.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.p1 - self.p0
    }

    /// The parameter of the orthogonal projection of `p` onto the infinite
    /// line through this segment.
    ///
    /// Returns 0 for a line of zero length.
    #[inline]
    pub fn project(&self, p: Point) -> f64 {
        let d = self.direction();
        let d2 = d.hypot2();
        if d2 == 0.0 {
            return 0.0;
        }
        (p - self.p0).dot(d) / d2
    }

    /// Signed distance of `p` from the infinite line through this segment.
    ///
    /// Positive values lie to the left when looking along the line in a
    /// y-up coordinate system.
    #[inline]
    pub fn signed_distance(&self, p: Point) -> f64 {
        let d = self.direction();
        d.cross(p - self.p0) / d.hypot()
    }

    /// Winding number contribution of this line.
    ///
    /// Cast a ray to the left and count intersections. Horizontal lines
    /// contribute nothing; the lower end point is included and the upper
    /// one excluded so that a ray through a vertex is counted once.
    pub fn winding(&self, p: Point) -> i32 {
        let start = self.p0;
        let end = self.p1;
        let sign = if end.y > start.y {
            if p.y < start.y || p.y >= end.y {
                return 0;
            }
            -1
        } else if end.y < start.y {
            if p.y < end.y || p.y >= start.y {
                return 0;
            }
            1
        } else {
            return 0;
        };
        if p.x < start.x.min(end.x) {
            return 0;
        }
        if p.x >= start.x.max(end.x) {
            return sign;
        }
        // line equation ax + by = c
        let a = end.y - start.y;
        let b = start.x - end.x;
        let c = a * start.x + b * start.y;
        if (a * p.x + b * p.y - c) * (sign as f64) <= 0.0 {
            sign
        } else {
            0
        }
    }
}

impl From<(Point, Point)> for Line {
    #[inline(always)]
    fn from((from, to): (Point, Point)) -> Self {
        Line::new(from, to)
    }
}

impl ParamCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> Line {
        Line {
            p0: self.eval(range.start),
            p1: self.eval(range.end),
        }
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p1
    }
}

impl ParamCurveDeriv for Line {
    type DerivResult = ConstPoint;

    #[inline]
    fn deriv(&self) -> ConstPoint {
        ConstPoint((self.p1 - self.p0).to_point())
    }
}

/// A trivial "curve" that is just a constant.
#[derive(Clone, Copy, Debug)]
pub struct ConstPoint(Point);

impl ParamCurve for ConstPoint {
    #[inline(always)]
    fn eval(&self, _t: f64) -> Point {
        self.0
    }

    #[inline(always)]
    fn subsegment(&self, _range: Range<f64>) -> ConstPoint {
        *self
    }
}

#[cfg(test)]
mod tests {
    use crate::{Line, ParamCurve, ParamCurveDeriv, Point, Vec2};

    #[test]
    fn line_reversed() {
        let l = Line::new((0.0, 0.0), (1.0, 1.0));
        let f = l.reversed();

        assert_eq!(l.p0, f.p1);
        assert_eq!(l.p1, f.p0);

        // Reversing it again should result in the original line
        assert_eq!(l, f.reversed());
    }

    #[test]
    fn line_midpoint() {
        let l = Line::new((0.0, 0.0), (2.0, 4.0));
        assert_eq!(l.midpoint(), Point::new(1.0, 2.0));
    }

    #[test]
    fn line_subsegment() {
        let l = Line::new((0.0, 0.0), (4.0, 8.0));
        let s = l.subsegment(0.25..0.5);
        assert_eq!(s, Line::new((1.0, 2.0), (2.0, 4.0)));
        assert_eq!(l.tangent(0.3), Vec2::new(4.0, 8.0));
    }

    #[test]
    fn line_project() {
        let l = Line::new((0.0, 0.0), (4.0, 0.0));
        assert_eq!(l.project(Point::new(1.0, 5.0)), 0.25);
        assert_eq!(l.project(Point::new(-4.0, 1.0)), -1.0);
        assert_eq!(Line::new((1.0, 1.0), (1.0, 1.0)).project(Point::ZERO), 0.0);
        assert_eq!(l.signed_distance(Point::new(2.0, 3.0)), 3.0);
    }

    #[test]
    fn line_winding() {
        let up = Line::new((0.0, 0.0), (0.0, 10.0));
        assert_eq!(up.winding(Point::new(5.0, 5.0)), -1);
        assert_eq!(up.winding(Point::new(-5.0, 5.0)), 0);
        // Lower end included, upper end excluded.
        assert_eq!(up.winding(Point::new(5.0, 0.0)), -1);
        assert_eq!(up.winding(Point::new(5.0, 10.0)), 0);
        assert_eq!(up.reversed().winding(Point::new(5.0, 5.0)), 1);
        assert_eq!(Line::new((0.0, 0.0), (10.0, 0.0)).winding(Point::ZERO), 0);

        let diagonal = Line::new((0.0, 0.0), (10.0, 10.0));
        assert_eq!(diagonal.winding(Point::new(8.0, 5.0)), -1);
        assert_eq!(diagonal.winding(Point::new(2.0, 5.0)), 0);
    }
}
