// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An ellipse arc.

use core::f64::consts::{FRAC_PI_2, TAU};
use core::ops::Range;

use crate::epsilon::EPSILON;
use crate::quadbez::chord_count_from_bound;
use crate::{ParamCurve, ParamCurveDeriv, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single elliptical arc segment in center parametrization.
///
/// The point at angle `θ` is `center + R(x_rotation) (radii.x cos θ, radii.y sin θ)`,
/// and the curve parameter `t` maps to the angle `start_angle + t * sweep_angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    /// The arc's centre point.
    pub center: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// The start angle in radians.
    pub start_angle: f64,
    /// The angle between the start and end of the arc, in radians.
    pub sweep_angle: f64,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
}

impl Arc {
    /// Create a new `Arc`.
    #[inline(always)]
    pub fn new(
        center: impl Into<Point>,
        radii: impl Into<Vec2>,
        start_angle: f64,
        sweep_angle: f64,
        x_rotation: f64,
    ) -> Self {
        Self {
            center: center.into(),
            radii: radii.into(),
            start_angle,
            sweep_angle,
            x_rotation,
        }
    }

    /// Returns a copy of this `Arc` in the opposite direction.
    ///
    /// The new `Arc` will sweep towards the original `Arc`s
    /// start angle.
    #[must_use]
    #[inline]
    pub fn reversed(&self) -> Arc {
        Self {
            center: self.center,
            radii: self.radii,
            start_angle: self.end_angle(),
            sweep_angle: -self.sweep_angle,
            x_rotation: self.x_rotation,
        }
    }

    /// The angle at which the arc ends.
    #[inline]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    /// The point on the full ellipse at angle `th`.
    #[inline]
    pub fn point_at_angle(&self, th: f64) -> Point {
        let (s, c) = th.sin_cos();
        self.center + Vec2::new(self.radii.x * c, self.radii.y * s).rotate(self.x_rotation)
    }

    /// The curve parameter of the angle `th`.
    ///
    /// The angle is unwrapped in the direction of the sweep, so the result
    /// lies in `[0, TAU / |sweep_angle|)`; values above 1 are off the arc.
    /// An angle within [`EPSILON`] short of a full turn past the start maps
    /// to 0.
    pub fn param_of_angle(&self, th: f64) -> f64 {
        if self.sweep_angle == 0.0 {
            return 0.0;
        }
        let mut d = if self.sweep_angle > 0.0 {
            (th - self.start_angle).rem_euclid(TAU)
        } else {
            (self.start_angle - th).rem_euclid(TAU)
        };
        if TAU - d <= EPSILON {
            d = 0.0;
        }
        d / self.sweep_angle.abs()
    }

    /// Number of chords needed to approximate the arc within `tolerance`.
    pub fn chord_count(&self, tolerance: f64) -> usize {
        let r = self.radii.x.abs().max(self.radii.y.abs());
        chord_count_from_bound(self.sweep_angle * self.sweep_angle * r, tolerance)
    }
}

impl ParamCurve for Arc {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.point_at_angle(self.start_angle + t * self.sweep_angle)
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> Arc {
        Arc {
            start_angle: self.start_angle + range.start * self.sweep_angle,
            sweep_angle: (range.end - range.start) * self.sweep_angle,
            ..*self
        }
    }
}

impl ParamCurveDeriv for Arc {
    type DerivResult = Arc;

    /// The derivative of an arc is an arc about the origin, a quarter turn
    /// ahead and scaled by the sweep angle.
    fn deriv(&self) -> Arc {
        Arc {
            center: Point::ORIGIN,
            radii: self.radii * self.sweep_angle,
            start_angle: self.start_angle + FRAC_PI_2,
            sweep_angle: self.sweep_angle,
            x_rotation: self.x_rotation,
        }
    }
}
