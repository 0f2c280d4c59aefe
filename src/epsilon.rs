// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared numeric tolerance.
//!
//! Every solver in this crate compares coordinates and curve parameters with
//! the same absolute tolerance, so that a contact classified as tangent by one
//! solver is classified the same way by all others.

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Absolute tolerance for coordinate and parameter comparisons.
pub const EPSILON: f64 = 1e-10;

/// Whether `a` and `b` are within [`EPSILON`] of each other.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// Whether `t` lies in `[0, 1]`, allowing [`EPSILON`] of slack on both ends.
#[inline]
pub fn in_unit_interval(t: f64) -> bool {
    (-EPSILON..=1.0 + EPSILON).contains(&t)
}

/// Clamp a parameter into `[0, 1]`, snapping values within [`EPSILON`] of
/// either end exactly onto it.
#[inline]
pub fn snap_unit(t: f64) -> f64 {
    if t <= EPSILON {
        0.0
    } else if t >= 1.0 - EPSILON {
        1.0
    } else {
        t
    }
}

/// Whether `t` is within [`EPSILON`] of 0 or of 1.
#[inline]
pub fn at_end(t: f64) -> bool {
    t.abs() <= EPSILON || (t - 1.0).abs() <= EPSILON
}
