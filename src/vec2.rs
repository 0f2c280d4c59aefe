// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vectors.

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::Point;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A 2D vector.
///
/// This is used for directions and offsets between [`Point`]s, and for the
/// radii of elliptical arcs.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// The x component.
    pub x: f64,
    /// The y component.
    pub y: f64,
}

impl Vec2 {
    /// Create a vector.
    #[inline(always)]
    pub const fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    /// The point this vector reaches from the origin.
    #[inline(always)]
    pub const fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product, signed so that `(1, 0) × (0, 1) = 1`.
    ///
    /// For a direction `d` and an offset `v`, the sign of `d.cross(v)` tells
    /// which side of the line along `d` the offset lies on. Two directions
    /// are parallel when their cross product vanishes.
    #[inline]
    pub fn cross(self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Length.
    #[inline]
    pub fn hypot(self) -> f64 {
        self.hypot2().sqrt()
    }

    /// Squared length.
    #[inline]
    pub fn hypot2(self) -> f64 {
        self.dot(self)
    }

    /// The angle from the positive x axis, in `(-π, π]`.
    #[inline]
    pub fn atan2(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// The vector a fraction `t` of the way from `self` to `other`.
    #[inline]
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        self + (other - self) * t
    }

    /// The unit vector in the same direction.
    ///
    /// The zero vector has no direction and yields `NaN` components.
    #[inline]
    pub fn normalize(self) -> Vec2 {
        self / self.hypot()
    }

    /// Rotate counterclockwise by `th` radians.
    #[inline]
    pub fn rotate(self, th: f64) -> Vec2 {
        let (s, c) = th.sin_cos();
        Vec2::new(c * self.x - s * self.y, s * self.x + c * self.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    #[inline(always)]
    fn from((x, y): (f64, f64)) -> Vec2 {
        Vec2 { x, y }
    }
}

impl From<Vec2> for (f64, f64) {
    #[inline(always)]
    fn from(v: Vec2) -> (f64, f64) {
        (v.x, v.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

impl Mul<Vec2> for f64 {
    type Output = Vec2;

    #[inline]
    fn mul(self, v: Vec2) -> Vec2 {
        v * self
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn div(self, s: f64) -> Vec2 {
        Vec2::new(self.x / s, self.y / s)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "𝐯=(")?;
        fmt::Display::fmt(&self.x, f)?;
        write!(f, ", ")?;
        fmt::Display::fmt(&self.y, f)?;
        write!(f, ")")
    }
}

#[cfg(feature = "mint")]
impl From<Vec2> for mint::Vector2<f64> {
    #[inline(always)]
    fn from(v: Vec2) -> mint::Vector2<f64> {
        mint::Vector2 { x: v.x, y: v.y }
    }
}

#[cfg(feature = "mint")]
impl From<mint::Vector2<f64>> for Vec2 {
    #[inline(always)]
    fn from(v: mint::Vector2<f64>) -> Vec2 {
        Vec2 { x: v.x, y: v.y }
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    #[test]
    fn cross_sign() {
        let x = Vec2::new(1., 0.);
        let y = Vec2::new(0., 1.);
        assert_eq!(x.cross(y), 1.);
        assert_eq!(y.cross(x), -1.);
        assert_eq!(x.cross(-x * 3.0), 0.);
    }

    #[test]
    fn length_and_direction() {
        let v = Vec2::new(3.0, -4.0);
        assert_eq!(v.hypot(), 5.0);
        assert_eq!(v.hypot2(), 25.0);
        let u = v.normalize();
        assert!((u.hypot() - 1.0).abs() < 1e-12);
        assert!(Vec2::new(0.0, 0.0).normalize().x.is_nan());
        assert_eq!(Vec2::new(-1.0, 0.0).atan2(), PI);
    }

    #[test]
    fn rotate() {
        let u = Vec2::new(2.0, 0.0).rotate(FRAC_PI_2);
        assert!(u.x.abs() < 1e-12);
        assert!((u.y - 2.0).abs() < 1e-12);
        let v = Vec2::new(0.3, -0.4);
        assert!((v.rotate(1.2).rotate(-1.2) - v).hypot() < 1e-12);
    }

    #[test]
    fn display() {
        let v = Vec2::new(1.2332421, 532.10721213123);
        assert_eq!(format!("{v:.2}"), "𝐯=(1.23, 532.11)");
    }
}
