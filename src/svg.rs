// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG path representation.

use core::f64::consts::{PI, TAU};
use core::fmt;
use core::ops::Range;

use crate::epsilon::EPSILON;
use crate::{Arc, ParamCurve, Path, PathEl, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A single SVG arc segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvgArc {
    /// The arc's start point.
    pub from: Point,
    /// The arc's end point.
    pub to: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
    /// Does this arc sweep through more than π radians?
    pub large_arc: bool,
    /// Determines if the arc should begin moving at positive angles.
    pub sweep: bool,
}

impl SvgArc {
    /// Checks that arc is actually a straight line.
    ///
    /// In this case, it can be replaced with a `LineTo`. An arc whose end
    /// points coincide counts as a (zero length) line as well.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x.abs() <= EPSILON
            || self.radii.y.abs() <= EPSILON
            || self.from.approx_eq(self.to)
    }

    /// Returns the same arc traversed from `to` to `from`.
    #[must_use]
    pub fn reversed(&self) -> SvgArc {
        SvgArc {
            from: self.to,
            to: self.from,
            sweep: !self.sweep,
            ..*self
        }
    }

    /// The part of the arc between the given curve parameters, in endpoint
    /// form.
    ///
    /// The radii of the result are the corrected radii of this arc.
    #[must_use]
    pub fn subsegment(&self, range: Range<f64>) -> SvgArc {
        match Arc::from_svg_arc(self) {
            Some(arc) => {
                let sub = arc.subsegment(range);
                SvgArc {
                    from: sub.start(),
                    to: sub.end(),
                    radii: arc.radii,
                    x_rotation: self.x_rotation,
                    large_arc: sub.sweep_angle.abs() > PI,
                    sweep: sub.sweep_angle > 0.0,
                }
            }
            None => SvgArc {
                from: self.from.lerp(self.to, range.start),
                to: self.from.lerp(self.to, range.end),
                ..*self
            },
        }
    }
}

/// Convert an arc in SVG endpoint form to center form.
///
/// Radii too small to connect the end points are scaled up uniformly, and
/// negative radii are taken by absolute value. The sweep angle is positive
/// for `sweep == true` and its magnitude exceeds π exactly when `large_arc`
/// is set (up to the semicircle case, where both choices coincide).
///
/// This never fails. Coincident end points give a zero sweep centred on the
/// start point, and a zero radius gives a zero sweep centred between the
/// end points.
pub fn ellipse_to_center(
    from: Point,
    radii: Vec2,
    x_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Arc {
    let mut rx = radii.x.abs();
    let mut ry = radii.y.abs();

    if from.approx_eq(to) {
        return Arc::new(from, (rx, ry), 0.0, 0.0, x_rotation);
    }
    if rx <= EPSILON || ry <= EPSILON {
        return Arc::new(from.midpoint(to), (rx, ry), 0.0, 0.0, x_rotation);
    }

    let xr = x_rotation % TAU;
    let (sin_phi, cos_phi) = xr.sin_cos();
    let hd_x = (from.x - to.x) * 0.5;
    let hd_y = (from.y - to.y) * 0.5;
    let hs_x = (from.x + to.x) * 0.5;
    let hs_y = (from.y + to.y) * 0.5;

    // The half difference of the end points in the ellipse's own frame.
    let p = Vec2::new(
        cos_phi * hd_x + sin_phi * hd_y,
        -sin_phi * hd_x + cos_phi * hd_y,
    );

    // If rf > 1 the radii are too small for the arc to connect the end
    // points, so scale them up.
    let rf = p.x * p.x / (rx * rx) + p.y * p.y / (ry * ry);
    if rf > 1.0 {
        let scale = rf.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rxry = rx * ry;
    let rxpy = rx * p.y;
    let rypx = ry * p.x;
    let sum_of_sq = rxpy * rxpy + rypx * rypx;

    let sign_coe = if large_arc == sweep { -1.0 } else { 1.0 };
    let coe = sign_coe * ((rxry * rxry - sum_of_sq) / sum_of_sq).max(0.0).sqrt();
    let transformed_cx = coe * rxpy / ry;
    let transformed_cy = -coe * rypx / rx;

    let center = Point::new(
        cos_phi * transformed_cx - sin_phi * transformed_cy + hs_x,
        sin_phi * transformed_cx + cos_phi * transformed_cy + hs_y,
    );

    let start_v = Vec2::new((p.x - transformed_cx) / rx, (p.y - transformed_cy) / ry);
    let end_v = Vec2::new((-p.x - transformed_cx) / rx, (-p.y - transformed_cy) / ry);

    let start_angle = start_v.atan2();

    let mut sweep_angle = (end_v.atan2() - start_angle) % TAU;

    if sweep && sweep_angle < 0.0 {
        sweep_angle += TAU;
    } else if !sweep && sweep_angle > 0.0 {
        sweep_angle -= TAU;
    }

    Arc {
        center,
        radii: Vec2::new(rx, ry),
        start_angle,
        sweep_angle,
        x_rotation,
    }
}

impl Arc {
    /// Creates an `Arc` from a `SvgArc`.
    ///
    /// Returns `None` if `arc` is actually a straight line.
    pub fn from_svg_arc(arc: &SvgArc) -> Option<Arc> {
        if arc.is_straight_line() {
            return None;
        }
        Some(ellipse_to_center(
            arc.from,
            arc.radii,
            arc.x_rotation,
            arc.large_arc,
            arc.sweep,
            arc.to,
        ))
    }
}

impl Path {
    /// Convert the path to an SVG path string representation.
    ///
    /// The current implementation doesn't take any special care to produce a
    /// short string (reducing precision, using relative movement).
    pub fn to_svg(&self) -> alloc::string::String {
        alloc::format!("{self}")
    }

    /// Try to parse a string as SVG path data.
    ///
    /// All commands of the SVG path grammar except the smooth curve commands
    /// (`S`, `T`) are supported. Data that does not start with a moveto gets
    /// an implicit `M0 0`.
    ///
    /// # Errors
    ///
    /// Returns an [`SvgParseError`] if the data is malformed.
    pub fn from_svg(data: &str) -> Result<Path, SvgParseError> {
        let mut lexer = SvgLexer::new(data);
        let mut path = Path::new();
        let mut last_cmd = 0;
        while let Some(c) = lexer.get_cmd(last_cmd)? {
            if path.elements().is_empty() && !(c == b'm' || c == b'M') {
                path.move_to(Point::ORIGIN);
            }
            match c {
                b'm' | b'M' => {
                    let pt = lexer.get_maybe_relative(c)?;
                    path.move_to(pt);
                    lexer.last_pt = pt;
                    lexer.start_pt = pt;
                    last_cmd = c - (b'M' - b'L');
                }
                b'l' | b'L' => {
                    let pt = lexer.get_maybe_relative(c)?;
                    path.line_to(pt);
                    lexer.last_pt = pt;
                    last_cmd = c;
                }
                b'h' | b'H' => {
                    let mut x = lexer.get_number()?;
                    lexer.opt_comma();
                    if c == b'h' {
                        x += lexer.last_pt.x;
                    }
                    let pt = Point::new(x, lexer.last_pt.y);
                    path.line_to(pt);
                    lexer.last_pt = pt;
                    last_cmd = c;
                }
                b'v' | b'V' => {
                    let mut y = lexer.get_number()?;
                    lexer.opt_comma();
                    if c == b'v' {
                        y += lexer.last_pt.y;
                    }
                    let pt = Point::new(lexer.last_pt.x, y);
                    path.line_to(pt);
                    lexer.last_pt = pt;
                    last_cmd = c;
                }
                b'q' | b'Q' => {
                    let p1 = lexer.get_maybe_relative(c)?;
                    let p2 = lexer.get_maybe_relative(c)?;
                    path.quad_to(p1, p2);
                    lexer.last_pt = p2;
                    last_cmd = c;
                }
                b'c' | b'C' => {
                    let p1 = lexer.get_maybe_relative(c)?;
                    let p2 = lexer.get_maybe_relative(c)?;
                    let p3 = lexer.get_maybe_relative(c)?;
                    path.curve_to(p1, p2, p3);
                    lexer.last_pt = p3;
                    last_cmd = c;
                }
                b'a' | b'A' => {
                    let radii = lexer.get_number_pair()?;
                    let x_rotation = lexer.get_number()?.to_radians();
                    lexer.opt_comma();
                    let large_arc = lexer.get_flag()?;
                    let sweep = lexer.get_flag()?;
                    let to = lexer.get_maybe_relative(c)?;
                    path.arc_to(radii.to_vec2(), x_rotation, large_arc, sweep, to);
                    lexer.last_pt = to;
                    last_cmd = c;
                }
                b'z' | b'Z' => {
                    path.close_path();
                    lexer.last_pt = lexer.start_pt;
                    last_cmd = 0;
                }
                other => return Err(SvgParseError::UnknownCommand(other as char)),
            }
        }
        Ok(path)
    }
}

impl fmt::Display for Path {
    /// Writes the path as SVG path data, with absolute coordinates.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for el in self.elements() {
            match *el {
                PathEl::MoveTo(p) => write!(f, "M{} {}", p.x, p.y)?,
                PathEl::LineTo(p) => write!(f, "L{} {}", p.x, p.y)?,
                PathEl::QuadTo(p1, p2) => write!(f, "Q{} {} {} {}", p1.x, p1.y, p2.x, p2.y)?,
                PathEl::CurveTo(p1, p2, p3) => write!(
                    f,
                    "C{} {} {} {} {} {}",
                    p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
                )?,
                PathEl::ArcTo(arc) => write!(
                    f,
                    "A{} {} {} {} {} {} {}",
                    arc.radii.x,
                    arc.radii.y,
                    arc.x_rotation.to_degrees(),
                    u8::from(arc.large_arc),
                    u8::from(arc.sweep),
                    arc.to.x,
                    arc.to.y
                )?,
                PathEl::ClosePath => write!(f, "Z")?,
            }
        }
        Ok(())
    }
}

/// An error which can be returned when parsing an SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgParseError {
    /// A number was expected.
    Wrong,
    /// The input string ended while still expecting input.
    UnexpectedEof,
    /// Encountered an unknown command letter.
    UnknownCommand(char),
}

impl fmt::Display for SvgParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgParseError::Wrong => write!(f, "Unable to parse a number"),
            SvgParseError::UnexpectedEof => write!(f, "Unexpected EOF"),
            SvgParseError::UnknownCommand(letter) => write!(f, "Unknown command, \"{letter}\""),
        }
    }
}

impl core::error::Error for SvgParseError {}

struct SvgLexer<'a> {
    data: &'a str,
    ix: usize,
    last_pt: Point,
    start_pt: Point,
}

impl SvgLexer<'_> {
    fn new(data: &str) -> SvgLexer<'_> {
        SvgLexer {
            data,
            ix: 0,
            last_pt: Point::ORIGIN,
            start_pt: Point::ORIGIN,
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&c) = self.data.as_bytes().get(self.ix) {
            if !(c == b' ' || c == 9 || c == 10 || c == 12 || c == 13) {
                break;
            }
            self.ix += 1;
        }
    }

    fn get_cmd(&mut self, last_cmd: u8) -> Result<Option<u8>, SvgParseError> {
        self.skip_ws();
        let Some(c) = self.get_byte() else {
            return Ok(None);
        };
        if c.is_ascii_alphabetic() {
            return Ok(Some(c));
        }
        self.unget();
        if last_cmd != 0 && (c == b'-' || c == b'+' || c == b'.' || c.is_ascii_digit()) {
            // Plausible number start, repeat the last command.
            Ok(Some(last_cmd))
        } else {
            Err(SvgParseError::Wrong)
        }
    }

    fn get_byte(&mut self) -> Option<u8> {
        self.data.as_bytes().get(self.ix).map(|&c| {
            self.ix += 1;
            c
        })
    }

    fn unget(&mut self) {
        self.ix -= 1;
    }

    fn get_number(&mut self) -> Result<f64, SvgParseError> {
        self.skip_ws();
        let start = self.ix;
        let c = self.get_byte().ok_or(SvgParseError::UnexpectedEof)?;
        if !(c == b'-' || c == b'+') {
            self.unget();
        }
        let mut digit_count = 0;
        let mut seen_period = false;
        while let Some(c) = self.get_byte() {
            if c.is_ascii_digit() {
                digit_count += 1;
            } else if c == b'.' && !seen_period {
                seen_period = true;
            } else {
                self.unget();
                break;
            }
        }
        if digit_count == 0 {
            return Err(SvgParseError::Wrong);
        }
        // Optional exponent, only taken when digits follow.
        let mantissa_end = self.ix;
        if let Some(b'e' | b'E') = self.get_byte() {
            if let Some(c) = self.get_byte() {
                if !(c == b'-' || c == b'+') {
                    self.unget();
                }
            }
            let mut exp_digits = 0;
            while let Some(c) = self.get_byte() {
                if c.is_ascii_digit() {
                    exp_digits += 1;
                } else {
                    self.unget();
                    break;
                }
            }
            if exp_digits == 0 {
                self.ix = mantissa_end;
            }
        } else {
            self.ix = mantissa_end;
        }
        self.data[start..self.ix]
            .parse()
            .map_err(|_| SvgParseError::Wrong)
    }

    fn get_flag(&mut self) -> Result<bool, SvgParseError> {
        self.skip_ws();
        let flag = match self.get_byte().ok_or(SvgParseError::UnexpectedEof)? {
            b'0' => false,
            b'1' => true,
            _ => return Err(SvgParseError::Wrong),
        };
        self.opt_comma();
        Ok(flag)
    }

    fn get_number_pair(&mut self) -> Result<Point, SvgParseError> {
        let x = self.get_number()?;
        self.opt_comma();
        let y = self.get_number()?;
        self.opt_comma();
        Ok(Point::new(x, y))
    }

    fn get_maybe_relative(&mut self, cmd: u8) -> Result<Point, SvgParseError> {
        let pt = self.get_number_pair()?;
        if cmd.is_ascii_lowercase() {
            Ok(self.last_pt + pt.to_vec2())
        } else {
            Ok(pt)
        }
    }

    fn opt_comma(&mut self) {
        self.skip_ws();
        if let Some(c) = self.get_byte() {
            if c != b',' {
                self.unget();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use crate::{ellipse_to_center, Arc, ParamCurve, Path, PathEl, Point, SvgArc, SvgParseError};

    #[test]
    fn test_parse_svg() {
        let path = Path::from_svg("m10 10 100 0 0 100 -100 0z").unwrap();
        assert_eq!(path.segments().count(), 4);
        assert_eq!(
            path.elements()[2],
            PathEl::LineTo(Point::new(110.0, 110.0))
        );
    }

    #[test]
    fn implicit_moveto() {
        let path = Path::from_svg("L10 0L5 10z").unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0)),
                PathEl::LineTo(Point::new(5.0, 10.0)),
                PathEl::ClosePath,
            ]
        );
    }

    #[test]
    fn parse_all_commands() {
        let path = Path::from_svg("V50H10V0z M30 10v30h-40 Q1 2 3 4 q1 1 2 2 C1 1 2 2 3 3 c1e1 0 1 1 2 2")
            .unwrap();
        let els = path.elements();
        assert_eq!(els[1], PathEl::LineTo(Point::new(0.0, 50.0)));
        assert_eq!(els[2], PathEl::LineTo(Point::new(10.0, 50.0)));
        assert_eq!(els[6], PathEl::LineTo(Point::new(30.0, 40.0)));
        assert_eq!(els[7], PathEl::LineTo(Point::new(-10.0, 40.0)));
        assert_eq!(
            els[9],
            PathEl::QuadTo(Point::new(4.0, 5.0), Point::new(5.0, 6.0))
        );
        assert_eq!(
            els[11],
            PathEl::CurveTo(
                Point::new(13.0, 3.0),
                Point::new(4.0, 4.0),
                Point::new(5.0, 5.0)
            )
        );
    }

    #[test]
    fn parse_arc() {
        let path = Path::from_svg("M0 -5L10 -5A5 5 90 0 1 0 -5").unwrap();
        let PathEl::ArcTo(arc) = path.elements()[2] else {
            panic!("expected an arc, got {:?}", path.elements()[2]);
        };
        assert_eq!(arc.to, Point::new(0.0, -5.0));
        assert!((arc.x_rotation - FRAC_PI_2).abs() < 1e-12);
        assert!(!arc.large_arc);
        assert!(arc.sweep);

        // Compact flags.
        let path = Path::from_svg("M0 0a5 5 0 01 0 10").unwrap();
        let PathEl::ArcTo(arc) = path.elements()[1] else {
            panic!("expected an arc");
        };
        assert!(!arc.large_arc);
        assert!(arc.sweep);
        assert_eq!(arc.to, Point::new(0.0, 10.0));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Path::from_svg("M0"), Err(SvgParseError::UnexpectedEof));
        assert_eq!(Path::from_svg("M0 0 X1 2"), Err(SvgParseError::UnknownCommand('X')));
        assert_eq!(Path::from_svg("M0 0 L- 1"), Err(SvgParseError::Wrong));
        assert_eq!(Path::from_svg("M0 0 A1 1 0 2 0 3 3"), Err(SvgParseError::Wrong));
        assert_eq!(Path::from_svg(""), Ok(Path::new()));
    }

    #[test]
    fn write_svg() {
        let path = Path::from_svg("L10 0Q10 5 0 10A5 5 0 1 0 -10 0z").unwrap();
        assert_eq!(path.to_svg(), "M0 0L10 0Q10 5 0 10A5 5 0 1 0 -10 0Z");
        assert_eq!(Path::from_svg(&path.to_svg()).unwrap(), path);
    }

    #[test]
    fn center_semicircle() {
        let arc = ellipse_to_center(
            Point::new(0.0, 0.0),
            (5.0, 5.0).into(),
            0.0,
            false,
            true,
            Point::new(0.0, 10.0),
        );
        assert!(arc.center.distance(Point::new(0.0, 5.0)) < 1e-12);
        assert!((arc.start_angle + FRAC_PI_2).abs() < 1e-12);
        assert!((arc.sweep_angle - PI).abs() < 1e-12);
        assert!(arc.eval(0.5).distance(Point::new(5.0, 5.0)) < 1e-12);
    }

    #[test]
    fn center_flags_select_arc() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(10.0, 0.0);
        for (large_arc, sweep) in [(false, false), (false, true), (true, false), (true, true)] {
            let arc = ellipse_to_center(from, (10.0, 10.0).into(), 0.0, large_arc, sweep, to);
            assert!(arc.eval(0.0).distance(from) < 1e-9);
            assert!(arc.eval(1.0).distance(to) < 1e-9);
            assert_eq!(arc.sweep_angle > 0.0, sweep);
            assert_eq!(arc.sweep_angle.abs() > PI, large_arc);
        }
    }

    #[test]
    fn center_scales_radii() {
        // Radii far too small to span the end points.
        let arc = ellipse_to_center(
            Point::new(0.0, 0.0),
            (1.0, 1.0).into(),
            0.0,
            false,
            true,
            Point::new(10.0, 0.0),
        );
        assert!((arc.radii.x - 5.0).abs() < 1e-9);
        assert!(arc.center.distance(Point::new(5.0, 0.0)) < 1e-9);
        assert!((arc.sweep_angle.abs() - PI).abs() < 1e-9);
    }

    #[test]
    fn center_degenerate() {
        let p = Point::new(3.0, 4.0);
        let arc = ellipse_to_center(p, (-2.0, 1.0).into(), 0.0, true, true, p);
        assert_eq!(arc.center, p);
        assert_eq!(arc.sweep_angle, 0.0);
        assert_eq!(arc.radii.x, 2.0);

        let svg = SvgArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            radii: (0.0, 5.0).into(),
            x_rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        assert!(svg.is_straight_line());
        assert_eq!(Arc::from_svg_arc(&svg), None);
    }

    #[test]
    fn svg_arc_subsegment() {
        let svg = SvgArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, 10.0),
            radii: (5.0, 5.0).into(),
            x_rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        let arc = Arc::from_svg_arc(&svg).unwrap();
        let sub = svg.subsegment(0.25..0.75);
        assert!(sub.from.distance(arc.eval(0.25)) < 1e-9);
        assert!(sub.to.distance(arc.eval(0.75)) < 1e-9);
        let sub_arc = Arc::from_svg_arc(&sub).unwrap();
        assert!(sub_arc.eval(0.5).distance(Point::new(5.0, 5.0)) < 1e-9);

        let back = svg.reversed();
        let back_arc = Arc::from_svg_arc(&back).unwrap();
        assert!(back_arc.eval(0.3).distance(arc.eval(0.7)) < 1e-9);
    }
}
