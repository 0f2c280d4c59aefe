// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersections of 2D vector paths.
//!
//! The pathsect library finds where two paths made of lines, quadratic and
//! cubic Béziers and elliptical arcs cross or touch. It reports every contact
//! as an [`Intersection`] record, links the records of two paths into an
//! [`IntersectionGraph`] that can be walked along either path, and cuts paths
//! into fragments at their intersections. These are the building blocks of
//! path boolean operations; deciding which fragments to keep for a union or a
//! difference is left to the caller.
//!
//! All comparisons use the single absolute tolerance [`EPSILON`], so a
//! contact classified as tangent by one solver is classified the same way by
//! every other.
//!
//! # Examples
//!
//! Two overlapping triangles cross twice:
//!
//! ```
//! use pathsect::{Path, Point};
//!
//! let p = Path::from_svg("L10 0L5 10z").unwrap();
//! let q = Path::from_svg("M0 5L10 5L5 15z").unwrap();
//!
//! let records = p.intersections(&q);
//! assert_eq!(records.len(), 2);
//! assert!(records[0].point.distance(Point::new(7.5, 5.0)) < 1e-9);
//! assert!(!records[0].tangent);
//!
//! let fragments = p.cut(&q);
//! assert_eq!(fragments.len(), 2);
//! assert_eq!(fragments[1].to_svg(), "M7.5 5L5 10L2.5 5");
//! ```
//!
//! The segment solvers can be used on their own:
//!
//! ```
//! use pathsect::{circle_circle, line_line, Line, Point};
//!
//! let hit = line_line(Line::new((2.0, 0.0), (2.0, 3.0)), Line::new((1.0, 2.0), (3.0, 2.0)));
//! assert_eq!(hit.map(|h| h.t_b), Some(0.5));
//!
//! let (a, b) = circle_circle(Point::new(0.0, 0.0), 1.0, Point::new(2.0, 0.0), 1.0).unwrap();
//! assert_eq!(a, b);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. The crate uses the `alloc` crate regardless.
//!
//! Diagnostics go through the [`log`] facade; no logger is installed.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
#![allow(
    missing_debug_implementations,
    single_use_lifetimes,
    unnameable_types,
    clippy::use_self,
    clippy::return_self_not_must_use,
    clippy::cast_possible_truncation,
    clippy::wildcard_imports,
    clippy::shadow_unrelated,
    clippy::missing_assert_message,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::exhaustive_enums,
    clippy::match_same_arms,
    clippy::partial_pub_fields,
    clippy::unseparated_literal_suffix,
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason
)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("pathsect requires either the `std` or `libm` feature");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use libm as _;

extern crate alloc;

mod arc;
pub mod common;
mod cubicbez;
mod curve_intersections;
mod cut;
pub mod epsilon;
mod graph;
mod intersection;
mod line;
mod param_curve;
mod path;
mod point;
mod primitive;
mod quadbez;
mod svg;
mod vec2;

pub use crate::arc::*;
pub use crate::cubicbez::*;
pub use crate::curve_intersections::*;
pub use crate::cut::*;
pub use crate::epsilon::EPSILON;
pub use crate::graph::*;
pub use crate::intersection::*;
pub use crate::line::*;
pub use crate::param_curve::*;
pub use crate::path::*;
pub use crate::point::*;
pub use crate::primitive::*;
pub use crate::quadbez::*;
pub use crate::svg::*;
pub use crate::vec2::*;
