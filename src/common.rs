// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(
    missing_docs,
    reason = "the float functions are documented by their std counterparts"
)]

use arrayvec::ArrayVec;

use crate::epsilon::EPSILON;

#[cfg(not(feature = "std"))]
mod sealed {
    /// A [sealed trait](https://predr.ag/blog/definitive-guide-to-sealed-traits-in-rust/)
    /// which stops [`super::FloatFuncs`] from being implemented outside pathsect.
    pub trait FloatFuncsSealed {}
}

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident/$lfname:ident;
    )+) => {

        /// Since core doesn't depend upon libm, this provides libm implementations
        /// of float functions which are typically provided by the std library, when
        /// the `std` feature is not enabled.
        ///
        /// For documentation see the respective functions in the std library.
        #[cfg(not(feature = "std"))]
        pub trait FloatFuncs : Sized + sealed::FloatFuncsSealed {
            /// Special implementation, because libm doesn't have it.
            fn rem_euclid(self, rhs: Self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl sealed::FloatFuncsSealed for f64 {}

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn rem_euclid(self, rhs: Self) -> Self {
                let r = self % rhs;
                if r < 0.0 {
                    r + rhs.abs()
                } else {
                    r
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("pathsect requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs/fabsf;
    fn acos(self) -> Self => acos/acosf;
    fn atan2(self, other: Self) -> Self => atan2/atan2f;
    fn ceil(self) -> Self => ceil/ceilf;
    fn copysign(self, sign: Self) -> Self => copysign/copysignf;
    fn hypot(self, other: Self) -> Self => hypot/hypotf;
    fn log2(self) -> Self => log2/log2f;
    fn powi(self, n: i32) -> Self => pow/powf;
    fn sin_cos(self) -> (Self, Self) => sincos/sincosf;
    fn sqrt(self) -> Self => sqrt/sqrtf;
}

/// A real root of a polynomial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Root {
    /// The value of x at which the polynomial vanishes.
    pub value: f64,
    /// Whether this is a repeated root, where the polynomial touches zero
    /// without changing sign (or at least has a vanishing derivative).
    pub multiple: bool,
}

impl Root {
    #[inline]
    fn simple(value: f64) -> Root {
        Root {
            value,
            multiple: false,
        }
    }

    #[inline]
    fn double(value: f64) -> Root {
        Root {
            value,
            multiple: true,
        }
    }
}

/// Divide all coefficients by the one with the largest magnitude.
///
/// Returns `None` when all coefficients are zero.
fn normalize<const N: usize>(coeffs: [f64; N]) -> Option<[f64; N]> {
    let scale = coeffs.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    if !(scale > 0.0) || !scale.is_finite() {
        return None;
    }
    Some(coeffs.map(|c| c / scale))
}

/// Find real roots of quadratic equation.
///
/// Return values of x for which c0 + c1 x + c2 x² = 0, in increasing order.
///
/// The coefficients are normalized so the largest has magnitude 1. A leading
/// coefficient within [`EPSILON`] of zero reduces the equation to a linear one.
/// When the value at the vertex is within [`EPSILON`] of zero the equation has
/// a double root, which is reported once with [`Root::multiple`] set. If all
/// coefficients are zero (so that every x is a solution) no root is returned;
/// callers have to treat that case themselves.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<Root, 2> {
    let mut result = ArrayVec::new();
    let Some([c0, c1, c2]) = normalize([c0, c1, c2]) else {
        return result;
    };
    if c2.abs() <= EPSILON {
        if c1.abs() > EPSILON {
            result.push(Root::simple(-c0 / c1));
        }
        return result;
    }
    let vertex = -0.5 * c1 / c2;
    let disc = c1 * c1 - 4.0 * c0 * c2;
    // p(vertex) = -disc / (4 c2)
    if (disc / (4.0 * c2)).abs() <= EPSILON {
        result.push(Root::double(vertex));
        return result;
    }
    if disc < 0.0 {
        return result;
    }
    // See https://math.stackexchange.com/questions/866331
    let root1 = -0.5 * (c1 + disc.sqrt().copysign(c1)) / c2;
    let root2 = c0 / (c2 * root1);
    let (lo, hi) = if root1 < root2 {
        (root1, root2)
    } else {
        (root2, root1)
    };
    if root2.is_finite() {
        result.push(Root::simple(lo));
        result.push(Root::simple(hi));
    } else {
        result.push(Root::simple(root1));
    }
    result
}

/// Find real roots of cubic equation.
///
/// Return values of x for which c0 + c1 x + c2 x² + c3 x³ = 0, in increasing
/// order.
///
/// The critical points come from the closed-form derivative. Each monotone
/// piece between them is bracketed inside the Cauchy bound and a sign change
/// is refined with [`solve_itp`], so the number of iterations is bounded. A
/// critical point where the cubic is within [`EPSILON`] of zero is a repeated
/// root. A leading coefficient within [`EPSILON`] of zero (after normalization)
/// reduces the equation to a quadratic.
pub fn solve_cubic(c0: f64, c1: f64, c2: f64, c3: f64) -> ArrayVec<Root, 3> {
    let mut result = ArrayVec::new();
    let Some([c0, c1, c2, c3]) = normalize([c0, c1, c2, c3]) else {
        return result;
    };
    if c3.abs() <= EPSILON {
        result.extend(solve_quadratic(c0, c1, c2));
        return result;
    }
    let eval = |x: f64| ((c3 * x + c2) * x + c1) * x + c0;
    // Cauchy bound: every real root lies in [-bound, bound].
    let bound = 1.0 + (c0.abs().max(c1.abs()).max(c2.abs()) / c3.abs());

    let mut breaks: ArrayVec<f64, 4> = ArrayVec::new();
    breaks.push(-bound);
    for crit in solve_quadratic(c1, 2.0 * c2, 3.0 * c3) {
        if crit.value > -bound && crit.value < bound {
            breaks.push(crit.value);
        }
    }
    breaks.push(bound);

    for (i, pair) in breaks.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let (ya, yb) = (eval(a), eval(b));
        // Interior breakpoints are critical points.
        if i > 0 && ya.abs() <= EPSILON {
            push_distinct(&mut result, Root::double(a));
        }
        if ya.abs() <= EPSILON || yb.abs() <= EPSILON || (ya < 0.0) == (yb < 0.0) {
            continue;
        }
        // Relative to the bracket so that the iteration count stays below 64.
        let epsilon = 1e-15 * (b - a).max(1.0);
        let mut root = if ya < 0.0 {
            solve_itp(eval, a, b, epsilon, 1, 0.2 / (b - a), ya, yb)
        } else {
            solve_itp(|x| -eval(x), a, b, epsilon, 1, 0.2 / (b - a), -ya, -yb)
        };
        for _ in 0..3 {
            let deriv = (3.0 * c3 * root + 2.0 * c2) * root + c1;
            if deriv == 0.0 {
                break;
            }
            let next = root - eval(root) / deriv;
            if !(next > a && next < b) {
                break;
            }
            root = next;
        }
        push_distinct(&mut result, Root::simple(root));
    }
    result
}

fn push_distinct<const N: usize>(roots: &mut ArrayVec<Root, N>, root: Root) {
    if let Some(last) = roots.last_mut() {
        if (last.value - root.value).abs() <= EPSILON {
            last.multiple |= root.multiple;
            return;
        }
    }
    if !roots.is_full() {
        roots.push(root);
    }
}

/// Solve an arbitrary function for a zero-crossing.
///
/// This uses the [ITP method], as described in the paper
/// [An Enhancement of the Bisection Method Average Performance Preserving Minmax Optimality].
///
/// The values of `ya` and `yb` are given as arguments rather than
/// computed from `f`, as the values may already be known, or they may
/// be less expensive to compute as special cases.
///
/// It is assumed that `ya < 0.0` and `yb > 0.0`, otherwise unexpected
/// results may occur.
///
/// The value of `epsilon` must be larger than 2^-63 times `b - a`,
/// otherwise integer overflow may occur. The `a` and `b` parameters
/// represent the lower and upper bounds of the bracket searched for a
/// solution.
///
/// The ITP method has tuning parameters. This implementation hardwires
/// k2 to 2, both because it avoids an expensive floating point
/// exponentiation, and because this value has been tested to work well
/// with curve fitting problems.
///
/// The `n0` parameter controls the relative impact of the bisection and
/// secant components. When it is 0, the number of iterations is
/// guaranteed to be no more than the number required by bisection (thus,
/// this method is strictly superior to bisection). However, when the
/// function is smooth, a value of 1 gives the secant method more of a
/// chance to engage, so the average number of iterations is likely
/// lower, though there can be one more iteration than bisection in the
/// worst case.
///
/// The `k1` parameter is harder to characterize, and interested users
/// are referred to the paper, as well as encouraged to do empirical
/// testing. To match the paper, a value of `0.2 / (b - a)` is
/// suggested, and this is confirmed to give good results.
///
/// When the function is monotonic, the returned result is guaranteed to
/// be within `epsilon` of the zero crossing.
///
/// [ITP method]: https://en.wikipedia.org/wiki/ITP_Method
/// [An Enhancement of the Bisection Method Average Performance Preserving Minmax Optimality]: https://dl.acm.org/doi/10.1145/3423597
#[allow(
    clippy::too_many_arguments,
    reason = "the parameters are the tuning constants of the ITP method"
)]
pub fn solve_itp(
    mut f: impl FnMut(f64) -> f64,
    mut a: f64,
    mut b: f64,
    epsilon: f64,
    n0: usize,
    k1: f64,
    mut ya: f64,
    mut yb: f64,
) -> f64 {
    let n1_2 = (((b - a) / epsilon).log2().ceil() - 1.0).max(0.0) as usize;
    let nmax = n0 + n1_2;
    let mut scaled_epsilon = epsilon * (1u64 << nmax) as f64;
    while b - a > 2.0 * epsilon {
        let x1_2 = 0.5 * (a + b);
        let r = scaled_epsilon - 0.5 * (b - a);
        let xf = (yb * a - ya * b) / (yb - ya);
        let sigma = x1_2 - xf;
        // This has k2 = 2 hardwired for efficiency.
        let delta = k1 * (b - a).powi(2);
        let xt = if delta <= (x1_2 - xf).abs() {
            xf + delta.copysign(sigma)
        } else {
            x1_2
        };
        let xitp = if (xt - x1_2).abs() <= r {
            xt
        } else {
            x1_2 - r.copysign(sigma)
        };
        let yitp = f(xitp);
        if yitp > 0.0 {
            b = xitp;
            yb = yitp;
        } else if yitp < 0.0 {
            a = xitp;
            ya = yitp;
        } else {
            return xitp;
        }
        scaled_epsilon *= 0.5;
    }
    0.5 * (a + b)
}

#[cfg(test)]
mod tests {
    use crate::common::*;

    fn verify<const N: usize>(roots: ArrayVec<Root, N>, expected: &[f64]) {
        assert_eq!(expected.len(), roots.len(), "roots: {roots:?}");
        let epsilon = 1e-9;
        for (root, want) in roots.iter().zip(expected) {
            assert!(
                (root.value - want).abs() < epsilon,
                "got {}, expected {want}",
                root.value
            );
        }
    }

    #[test]
    fn test_solve_quadratic() {
        verify(
            solve_quadratic(-5.0, 0.0, 1.0),
            &[-(5.0f64.sqrt()), 5.0f64.sqrt()],
        );
        verify(solve_quadratic(5.0, 0.0, 1.0), &[]);
        verify(solve_quadratic(5.0, 1.0, 0.0), &[-5.0]);
        verify(solve_quadratic(0.0, 0.0, 0.0), &[]);
    }

    #[test]
    fn test_quadratic_double_root() {
        let roots = solve_quadratic(1.0, 2.0, 1.0);
        verify(roots.clone(), &[-1.0]);
        assert!(roots[0].multiple);

        // 20t - 20t² - 5, a line touching a quadratic Bézier at its apex.
        let roots = solve_quadratic(-5.0, 20.0, -20.0);
        verify(roots.clone(), &[0.5]);
        assert!(roots[0].multiple);

        let roots = solve_quadratic(-1.0, 0.0, 1.0);
        assert!(roots.iter().all(|r| !r.multiple));
    }

    #[test]
    fn test_solve_cubic() {
        verify(solve_cubic(-5.0, 0.0, 0.0, 1.0), &[5.0f64.powf(1.0 / 3.0)]);
        verify(solve_cubic(-5.0, -1.0, 0.0, 1.0), &[1.90416085913492]);
        verify(solve_cubic(0.0, -1.0, 0.0, 1.0), &[-1.0, 0.0, 1.0]);
        verify(solve_cubic(2.0, -3.0, 0.0, 1.0), &[-2.0, 1.0]);
        verify(solve_cubic(-6.0, 11.0, -6.0, 1.0), &[1.0, 2.0, 3.0]);
        // Degenerates to a quadratic.
        verify(solve_cubic(-6.0, 5.0, 1.0, 0.0), &[-6.0, 1.0]);
    }

    #[test]
    fn test_cubic_double_root() {
        // (x - 1)²(x + 2)
        let roots = solve_cubic(2.0, -3.0, 0.0, 1.0);
        assert!(!roots[0].multiple);
        assert!(roots[1].multiple);
        // x³ touches zero only at the origin, a triple root.
        let roots = solve_cubic(0.0, 0.0, 0.0, 1.0);
        verify(roots.clone(), &[0.0]);
        assert!(roots[0].multiple);
    }

    #[test]
    fn test_solve_itp() {
        let f = |x: f64| x.powi(3) - x - 2.0;
        let x = solve_itp(f, 1., 2., 1e-12, 0, 0.2, f(1.), f(2.));
        assert!(f(x).abs() < 6e-12);
    }
}
