// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Points.

use core::fmt;
use core::ops::{Add, Sub};

use crate::epsilon::EPSILON;
use crate::Vec2;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A point in the plane.
///
/// Intersection points, path vertices and curve control points are all
/// `Point`s. The difference of two points is a [`Vec2`].
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The x coordinate.
    pub x: f64,
    /// The y coordinate.
    pub y: f64,
}

impl Point {
    /// The point (0, 0).
    pub const ZERO: Point = Point::new(0., 0.);

    /// The origin, where a path without a leading `MoveTo` starts.
    pub const ORIGIN: Point = Point::new(0., 0.);

    /// Create a point.
    #[inline(always)]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// The vector from the origin to this point.
    #[inline(always)]
    pub const fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The point a fraction `t` of the way from `self` to `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }

    /// The point halfway between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).hypot()
    }

    /// Whether both coordinates are within [`EPSILON`](crate::EPSILON) of `other`.
    ///
    /// This is the equality used throughout the intersection code.
    #[inline]
    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }
}

impl From<(f64, f64)> for Point {
    #[inline(always)]
    fn from((x, y): (f64, f64)) -> Point {
        Point { x, y }
    }
}

impl From<Point> for (f64, f64) {
    #[inline(always)]
    fn from(p: Point) -> (f64, f64) {
        (p.x, p.y)
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    #[inline]
    fn add(self, v: Vec2) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl Sub<Vec2> for Point {
    type Output = Point;

    #[inline]
    fn sub(self, v: Vec2) -> Point {
        Point::new(self.x - v.x, self.y - v.y)
    }
}

impl Sub<Point> for Point {
    type Output = Vec2;

    #[inline]
    fn sub(self, other: Point) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        fmt::Display::fmt(&self.x, f)?;
        write!(f, ", ")?;
        fmt::Display::fmt(&self.y, f)?;
        write!(f, ")")
    }
}

#[cfg(feature = "mint")]
impl From<Point> for mint::Point2<f64> {
    #[inline(always)]
    fn from(p: Point) -> mint::Point2<f64> {
        mint::Point2 { x: p.x, y: p.y }
    }
}

#[cfg(feature = "mint")]
impl From<mint::Point2<f64>> for Point {
    #[inline(always)]
    fn from(p: mint::Point2<f64>) -> Point {
        Point { x: p.x, y: p.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets() {
        let p = Point::new(2.5, 5.0);
        assert_eq!(p - Point::new(10.0, 0.0), Vec2::new(-7.5, 5.0));
        assert_eq!(p + Vec2::new(5.0, 0.0), Point::new(7.5, 5.0));
        assert_eq!(p - Vec2::new(2.5, 5.0), Point::ORIGIN);
    }

    #[test]
    fn lerp_and_midpoint() {
        let a = Point::new(10.0, 0.0);
        let b = Point::new(5.0, 10.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(7.5, 5.0));
        assert_eq!(a.midpoint(b), a.lerp(b, 0.5));
        assert_eq!(a.lerp(b, 0.0), a);
    }

    #[test]
    fn distance() {
        assert_eq!(Point::new(-11., 1.).distance(Point::new(-7., -2.)), 5.);
    }

    #[test]
    fn approx_eq() {
        let p = Point::new(7.5, 5.0);
        assert!(p.approx_eq(Point::new(7.5 + 1e-11, 5.0 - 1e-11)));
        assert!(!p.approx_eq(Point::new(7.5 + 1e-9, 5.0)));
    }

    #[test]
    fn display() {
        let p = Point::new(7.4999, 0.023935);
        assert_eq!(format!("{p:.2}"), "(7.50, 0.02)");
        assert_eq!(format!("{:?}", Point::new(1.0, -2.5)), "(1.0, -2.5)");
    }
}
