// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paths of lines, Bézier curves and elliptical arcs.

use core::ops::Range;

use alloc::vec::Vec;

use crate::{Arc, CubicBez, Line, ParamCurve, ParamCurveDeriv, Point, QuadBez, SvgArc, Vec2};

/// A path made of lines, Bézier curves and elliptical arcs, possibly with
/// multiple subpaths.
///
/// Elements are addressed by their index in [`Path::elements`]; the leading
/// `MoveTo` is element 0. Intersection records use the same indices, so
/// [`Path::get_seg`] recovers the segment a record refers to.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path(Vec<PathEl>);

/// The element of a path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a quadratic Bézier using the current location and the two points.
    QuadTo(Point, Point),
    /// Draw a cubic Bézier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Draw an elliptical arc from the current location.
    ArcTo(ArcTo),
    /// Close off the path.
    ClosePath,
}

/// The parameters of an elliptical arc element, in SVG endpoint form.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcTo {
    /// The arc's end point.
    pub to: Point,
    /// The arc's radii.
    pub radii: Vec2,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
    /// Does this arc sweep through more than π radians?
    pub large_arc: bool,
    /// Determines if the arc should begin moving at positive angles.
    pub sweep: bool,
}

/// A segment of a path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A quadratic Bézier segment.
    Quad(QuadBez),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
    /// An elliptical arc segment.
    Arc(SvgArc),
}

impl Path {
    /// Create a new path.
    #[inline]
    pub fn new() -> Path {
        Path::default()
    }

    /// Create a path from a vector of path elements.
    #[inline]
    pub fn from_vec(v: Vec<PathEl>) -> Path {
        Path(v)
    }

    /// Push a generic path element onto the path.
    #[inline]
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "quad to" element onto the path.
    pub fn quad_to<P: Into<Point>>(&mut self, p1: P, p2: P) {
        self.push(PathEl::QuadTo(p1.into(), p2.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push an "arc to" element onto the path.
    ///
    /// `x_rotation` is in radians.
    pub fn arc_to(
        &mut self,
        radii: impl Into<Vec2>,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: impl Into<Point>,
    ) {
        self.push(PathEl::ArcTo(ArcTo {
            to: to.into(),
            radii: radii.into(),
            x_rotation,
            large_arc,
            sweep,
        }));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Get the path elements.
    #[inline]
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Returns `true` if the path contains no segments.
    pub fn is_empty(&self) -> bool {
        self.segments().next().is_none()
    }

    /// Iterate over the path segments.
    ///
    /// A `ClosePath` yields the closing line unless it has zero length.
    pub fn segments(&self) -> impl Iterator<Item = PathSeg> + '_ {
        self.indexed_segments().map(|(_, seg)| seg)
    }

    /// Iterate over the path segments together with their element indices.
    pub fn indexed_segments(&self) -> impl Iterator<Item = (usize, PathSeg)> + '_ {
        let mut cursor = Cursor::default();
        self.0
            .iter()
            .enumerate()
            .filter_map(move |(ix, el)| cursor.advance(el).map(|seg| (ix, seg)))
    }

    /// Get the segment at the given element index.
    ///
    /// The element index counts [`PathEl`] elements, so for example includes
    /// an initial `MoveTo`. Returns `None` for `MoveTo` elements, for a
    /// `ClosePath` that draws nothing, and for indices out of range.
    pub fn get_seg(&self, ix: usize) -> Option<PathSeg> {
        let el = self.0.get(ix)?;
        let mut cursor = Cursor::default();
        for prev in &self.0[..ix] {
            cursor.advance(prev);
        }
        cursor.advance(el)
    }

    /// Returns a new path with the direction of every subpath reversed.
    ///
    /// The order of subpaths is kept. A closed subpath stays closed; its
    /// closing segment is emitted as an explicit element.
    #[must_use]
    pub fn reverse_subpaths(&self) -> Path {
        let table = SegmentTable::new(self);
        let mut reversed = Path::new();
        for subpath in &table.subpaths {
            let segs = &table.segs[subpath.segments.clone()];
            let Some(last) = segs.last() else {
                continue;
            };
            reversed.move_to(last.seg.end());
            for entry in segs.iter().rev() {
                reversed.push(entry.seg.reverse().as_path_el());
            }
            if subpath.closed {
                reversed.close_path();
            }
        }
        reversed
    }

    /// Compute the winding number of the path around a point.
    ///
    /// Curved segments are replaced by chords within [`FLATTEN_TOLERANCE`],
    /// and open subpaths are closed implicitly, as for filling.
    ///
    /// [`FLATTEN_TOLERANCE`]: crate::FLATTEN_TOLERANCE
    pub fn winding(&self, pt: Point) -> i32 {
        let table = SegmentTable::new(self);
        let mut winding = 0;
        for subpath in &table.subpaths {
            let segs = &table.segs[subpath.segments.clone()];
            for entry in segs {
                winding += entry.seg.winding(pt);
            }
            if let Some(last) = segs.last() {
                if !subpath.closed {
                    winding += Line::new(last.seg.end(), subpath.start).winding(pt);
                }
            }
        }
        winding
    }
}

impl From<Vec<PathEl>> for Path {
    fn from(v: Vec<PathEl>) -> Self {
        Path(v)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = PathEl;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements().iter().copied()
    }
}

/// The state threaded through the elements while turning them into segments.
#[derive(Default)]
struct Cursor {
    start: Point,
    last: Point,
}

impl Cursor {
    fn advance(&mut self, el: &PathEl) -> Option<PathSeg> {
        let (seg, last) = match *el {
            PathEl::MoveTo(p) => {
                self.start = p;
                self.last = p;
                return None;
            }
            PathEl::LineTo(p) => (PathSeg::Line(Line::new(self.last, p)), p),
            PathEl::QuadTo(p1, p2) => (PathSeg::Quad(QuadBez::new(self.last, p1, p2)), p2),
            PathEl::CurveTo(p1, p2, p3) => {
                (PathSeg::Cubic(CubicBez::new(self.last, p1, p2, p3)), p3)
            }
            PathEl::ArcTo(arc) => (
                PathSeg::Arc(SvgArc {
                    from: self.last,
                    to: arc.to,
                    radii: arc.radii,
                    x_rotation: arc.x_rotation,
                    large_arc: arc.large_arc,
                    sweep: arc.sweep,
                }),
                arc.to,
            ),
            PathEl::ClosePath => {
                if self.last == self.start {
                    return None;
                }
                (PathSeg::Line(Line::new(self.last, self.start)), self.start)
            }
        };
        self.last = last;
        Some(seg)
    }
}

/// A segment together with its element index and owning subpath.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IndexedSeg {
    pub(crate) ix: usize,
    pub(crate) seg: PathSeg,
    pub(crate) subpath: usize,
}

/// A run of segments between two `MoveTo`s, or ended by a `ClosePath`.
#[derive(Clone, Debug)]
pub(crate) struct Subpath {
    /// Positions in [`SegmentTable::segs`].
    pub(crate) segments: Range<usize>,
    pub(crate) start: Point,
    pub(crate) closed: bool,
}

/// Segments of a path grouped by subpath.
///
/// Segments that draw a single point are left out, so the successor of a
/// segment is always the next one with extent. Subpaths without segments are
/// omitted.
#[derive(Clone, Debug)]
pub(crate) struct SegmentTable {
    pub(crate) segs: Vec<IndexedSeg>,
    pub(crate) subpaths: Vec<Subpath>,
}

impl SegmentTable {
    pub(crate) fn new(path: &Path) -> SegmentTable {
        let mut segs = Vec::new();
        let mut subpaths = Vec::new();
        let mut cursor = Cursor::default();
        let mut current: Option<Subpath> = None;
        for (ix, el) in path.elements().iter().enumerate() {
            let seg = cursor.advance(el);
            match el {
                PathEl::MoveTo(p) => {
                    Self::finish(&mut subpaths, current.take());
                    current = Some(Subpath {
                        segments: segs.len()..segs.len(),
                        start: *p,
                        closed: false,
                    });
                }
                PathEl::ClosePath => {
                    if let Some(seg) = seg.filter(|seg| !seg.is_degenerate()) {
                        Self::push_seg(&mut segs, &mut current, &subpaths, cursor.start, ix, seg);
                    }
                    if let Some(mut sp) = current.take() {
                        sp.closed = true;
                        Self::finish(&mut subpaths, Some(sp));
                    }
                }
                _ => {
                    if let Some(seg) = seg.filter(|seg| !seg.is_degenerate()) {
                        Self::push_seg(&mut segs, &mut current, &subpaths, cursor.start, ix, seg);
                    }
                }
            }
        }
        Self::finish(&mut subpaths, current);
        SegmentTable { segs, subpaths }
    }

    fn push_seg(
        segs: &mut Vec<IndexedSeg>,
        current: &mut Option<Subpath>,
        subpaths: &[Subpath],
        start: Point,
        ix: usize,
        seg: PathSeg,
    ) {
        // Drawing after a ClosePath, or without any MoveTo, starts an
        // implicit subpath at the current start point.
        let sp = current.get_or_insert_with(|| Subpath {
            segments: segs.len()..segs.len(),
            start,
            closed: false,
        });
        segs.push(IndexedSeg {
            ix,
            seg,
            subpath: subpaths.len(),
        });
        sp.segments.end = segs.len();
    }

    fn finish(subpaths: &mut Vec<Subpath>, subpath: Option<Subpath>) {
        if let Some(sp) = subpath {
            if !sp.segments.is_empty() {
                subpaths.push(sp);
            }
        }
    }

    /// Position in `segs` of the segment drawn by element `ix`.
    pub(crate) fn position(&self, ix: usize) -> Option<usize> {
        self.segs.binary_search_by_key(&ix, |entry| entry.ix).ok()
    }

    /// Element index of the segment following element `ix` in its subpath.
    ///
    /// The last segment of a closed subpath is followed by the first one.
    pub(crate) fn next_of(&self, ix: usize) -> Option<usize> {
        let pos = self.position(ix)?;
        let subpath = &self.subpaths[self.segs[pos].subpath];
        if pos + 1 < subpath.segments.end {
            Some(self.segs[pos + 1].ix)
        } else if subpath.closed {
            Some(self.segs[subpath.segments.start].ix)
        } else {
            None
        }
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match *self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Quad(quad) => quad.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
            PathSeg::Arc(arc) => match Arc::from_svg_arc(&arc) {
                Some(center) => center.eval(t),
                None => arc.from.lerp(arc.to, t),
            },
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match *self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Quad(quad) => PathSeg::Quad(quad.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
            PathSeg::Arc(arc) => PathSeg::Arc(arc.subsegment(range)),
        }
    }

    fn start(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p0,
            PathSeg::Quad(quad) => quad.p0,
            PathSeg::Cubic(cubic) => cubic.p0,
            PathSeg::Arc(arc) => arc.from,
        }
    }

    fn end(&self) -> Point {
        match *self {
            PathSeg::Line(line) => line.p1,
            PathSeg::Quad(quad) => quad.p2,
            PathSeg::Cubic(cubic) => cubic.p3,
            PathSeg::Arc(arc) => arc.to,
        }
    }
}

impl PathSeg {
    /// Returns a new `PathSeg` describing the same path as `self`, but with
    /// the points reversed.
    #[must_use]
    pub fn reverse(&self) -> PathSeg {
        match self {
            PathSeg::Line(line) => PathSeg::Line(line.reversed()),
            PathSeg::Quad(q) => PathSeg::Quad(q.reversed()),
            PathSeg::Cubic(c) => PathSeg::Cubic(c.reversed()),
            PathSeg::Arc(a) => PathSeg::Arc(a.reversed()),
        }
    }

    /// The tangent vector (first derivative) at parameter `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        match *self {
            PathSeg::Line(line) => line.tangent(t),
            PathSeg::Quad(quad) => quad.tangent(t),
            PathSeg::Cubic(cubic) => cubic.tangent(t),
            PathSeg::Arc(arc) => match Arc::from_svg_arc(&arc) {
                Some(center) => center.tangent(t),
                None => arc.to - arc.from,
            },
        }
    }

    /// Whether the segment draws nothing but a single point.
    ///
    /// This holds when all control points coincide within [`EPSILON`](crate::EPSILON), and
    /// for arcs whose end points coincide.
    pub fn is_degenerate(&self) -> bool {
        let p0 = self.start();
        match *self {
            PathSeg::Line(line) => p0.approx_eq(line.p1),
            PathSeg::Quad(q) => p0.approx_eq(q.p1) && p0.approx_eq(q.p2),
            PathSeg::Cubic(c) => p0.approx_eq(c.p1) && p0.approx_eq(c.p2) && p0.approx_eq(c.p3),
            PathSeg::Arc(arc) => p0.approx_eq(arc.to),
        }
    }

    /// The segment as a line, if it is one.
    ///
    /// Arcs that degenerate to a straight line count as lines.
    pub fn as_line(&self) -> Option<Line> {
        match *self {
            PathSeg::Line(line) => Some(line),
            PathSeg::Arc(arc) if arc.is_straight_line() => Some(Line::new(arc.from, arc.to)),
            _ => None,
        }
    }

    /// Convert this segment into a path element, dropping its start point.
    pub fn as_path_el(&self) -> PathEl {
        match *self {
            PathSeg::Line(line) => PathEl::LineTo(line.p1),
            PathSeg::Quad(q) => PathEl::QuadTo(q.p1, q.p2),
            PathSeg::Cubic(c) => PathEl::CurveTo(c.p1, c.p2, c.p3),
            PathSeg::Arc(a) => PathEl::ArcTo(ArcTo {
                to: a.to,
                radii: a.radii,
                x_rotation: a.x_rotation,
                large_arc: a.large_arc,
                sweep: a.sweep,
            }),
        }
    }

    /// Number of equal parameter steps whose chords stay within `tolerance`
    /// of the segment.
    pub fn chord_count(&self, tolerance: f64) -> usize {
        match *self {
            PathSeg::Line(_) => 1,
            PathSeg::Quad(quad) => quad.chord_count(tolerance),
            PathSeg::Cubic(cubic) => cubic.chord_count(tolerance),
            PathSeg::Arc(arc) => Arc::from_svg_arc(&arc).map_or(1, |a| a.chord_count(tolerance)),
        }
    }

    /// The parameters of the chord end points approximating this segment,
    /// from 0 to 1 inclusive.
    pub fn chord_params(&self, tolerance: f64) -> impl Iterator<Item = f64> {
        let n = self.chord_count(tolerance);
        let step = (n as f64).recip();
        (0..=n).map(move |i| if i == n { 1.0 } else { i as f64 * step })
    }

    /// Winding number contribution of this segment.
    ///
    /// Cast a ray to the left and count crossings with the chords of the
    /// segment.
    pub fn winding(&self, p: Point) -> i32 {
        if let PathSeg::Line(line) = self {
            return line.winding(p);
        }
        let mut last = self.start();
        let mut winding = 0;
        for t in self.chord_params(crate::FLATTEN_TOLERANCE).skip(1) {
            let next = if t == 1.0 { self.end() } else { self.eval(t) };
            winding += Line::new(last, next).winding(p);
            last = next;
        }
        winding
    }
}

#[cfg(test)]
mod tests {
    use crate::{Line, ParamCurve, Path, PathEl, PathSeg, Point, QuadBez};

    use super::SegmentTable;

    fn triangle() -> Path {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((5.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn get_seg_indices() {
        let path = triangle();
        assert_eq!(path.get_seg(0), None);
        assert_eq!(
            path.get_seg(1),
            Some(PathSeg::Line(Line::new((0.0, 0.0), (10.0, 0.0))))
        );
        assert_eq!(
            path.get_seg(3),
            Some(PathSeg::Line(Line::new((5.0, 10.0), (0.0, 0.0))))
        );
        assert_eq!(path.get_seg(4), None);
        assert_eq!(path.segments().count(), 3);
        let ixs: Vec<usize> = path.indexed_segments().map(|(ix, _)| ix).collect();
        assert_eq!(ixs, [1, 2, 3]);
    }

    #[test]
    fn zero_length_close() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((0.0, 0.0));
        path.close_path();
        assert_eq!(path.get_seg(3), None);
        assert_eq!(path.segments().count(), 2);

        let table = SegmentTable::new(&path);
        assert_eq!(table.subpaths.len(), 1);
        assert!(table.subpaths[0].closed);
        assert_eq!(table.next_of(2), Some(1));
    }

    #[test]
    fn point_segments_are_skipped() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 0.0));
        path.quad_to((10.0, 0.0), (10.0, 0.0));
        path.line_to((10.0, 10.0));
        assert!(path.get_seg(2).unwrap().is_degenerate());
        assert!(path.get_seg(3).unwrap().is_degenerate());
        assert!(!path.get_seg(4).unwrap().is_degenerate());

        let table = SegmentTable::new(&path);
        let ixs: Vec<usize> = table.segs.iter().map(|entry| entry.ix).collect();
        assert_eq!(ixs, [1, 4]);
        assert_eq!(table.next_of(1), Some(4));
        assert_eq!(table.next_of(2), None);
    }

    #[test]
    fn segment_table_successors() {
        let mut path = triangle();
        path.move_to((20.0, 0.0));
        path.line_to((30.0, 0.0));
        path.line_to((30.0, 10.0));
        let table = SegmentTable::new(&path);
        assert_eq!(table.subpaths.len(), 2);
        assert_eq!(table.next_of(1), Some(2));
        assert_eq!(table.next_of(3), Some(1));
        assert_eq!(table.next_of(5), Some(6));
        assert_eq!(table.next_of(6), None);
        assert_eq!(table.next_of(4), None);
        assert_eq!(table.segs[3].subpath, 1);
    }

    #[test]
    fn implicit_subpath_after_close() {
        let mut path = triangle();
        path.line_to((5.0, -10.0));
        let table = SegmentTable::new(&path);
        assert_eq!(table.subpaths.len(), 2);
        assert_eq!(table.subpaths[1].start, Point::new(0.0, 0.0));
        assert_eq!(
            path.get_seg(4),
            Some(PathSeg::Line(Line::new((0.0, 0.0), (5.0, -10.0))))
        );
    }

    #[test]
    fn winding_triangle() {
        let path = triangle();
        assert_eq!(path.winding(Point::new(5.0, 3.0)).abs(), 1);
        assert_eq!(path.winding(Point::new(-5.0, 3.0)), 0);
        assert_eq!(path.winding(Point::new(5.0, 20.0)), 0);
        assert_eq!(
            path.reverse_subpaths().winding(Point::new(5.0, 3.0)),
            -path.winding(Point::new(5.0, 3.0))
        );
    }

    #[test]
    fn winding_curved() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.quad_to((10.0, 5.0), (0.0, 10.0));
        // Open subpath, closed implicitly along x = 0.
        assert_eq!(path.winding(Point::new(4.0, 5.0)).abs(), 1);
        assert_eq!(path.winding(Point::new(5.5, 5.0)), 0);
        assert_eq!(path.winding(Point::new(4.0, 1.0)), 0);
    }

    #[test]
    fn reverse_subpaths() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.quad_to((10.0, 5.0), (0.0, 10.0));
        path.line_to((-5.0, 5.0));
        let reversed = path.reverse_subpaths();
        assert_eq!(
            reversed.elements(),
            &[
                PathEl::MoveTo(Point::new(-5.0, 5.0)),
                PathEl::LineTo(Point::new(0.0, 10.0)),
                PathEl::QuadTo(Point::new(10.0, 5.0), Point::new(0.0, 0.0)),
            ]
        );
        let seg = PathSeg::Quad(QuadBez::new((0.0, 0.0), (10.0, 5.0), (0.0, 10.0)));
        assert!(seg.reverse().eval(0.3).distance(seg.eval(0.7)) < 1e-12);
    }
}
