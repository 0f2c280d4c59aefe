// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cutting paths at their intersections.

use alloc::vec::Vec;
use core::mem;

use crate::epsilon::EPSILON;
use crate::path::{IndexedSeg, SegmentTable, Subpath};
use crate::{IntersectionGraph, ParamCurve, Path, PathEl, PathSeg};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Where a fragment lies relative to another path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// The other path has a non-zero winding number around the fragment.
    Inside,
    /// The other path does not wind around the fragment.
    Outside,
}

impl Path {
    /// Cut this path at every intersection with `other`.
    ///
    /// Returns the fragments in traversal order, each a single open subpath
    /// running from one cut point to the next (or from a subpath boundary to
    /// the nearest cut point). A closed subpath cut at `k` points yields `k`
    /// fragments; the piece running through its start point is emitted first.
    /// A subpath without cuts is returned unchanged.
    ///
    /// Fragments never contain [`PathEl::ClosePath`]: the part of a closing
    /// segment that ends up in a fragment becomes a [`PathEl::LineTo`].
    /// Fragments of zero length are dropped.
    ///
    /// This path is not modified.
    pub fn cut(&self, other: &Path) -> Vec<Path> {
        let graph = IntersectionGraph::new(self, other);
        let table = SegmentTable::new(self);
        let mut cuts: Vec<(usize, f64)> = Vec::with_capacity(graph.len());
        for node in graph.nodes() {
            let pos = (node.record.segment_a, node.record.t_a);
            match cuts.last() {
                Some(&(seg, t)) if seg == pos.0 && (t - pos.1).abs() <= EPSILON => {}
                _ => cuts.push(pos),
            }
        }

        let mut fragments = Vec::new();
        for (i, subpath) in table.subpaths.iter().enumerate() {
            let segs = &table.segs[subpath.segments.clone()];
            let before = fragments.len();
            let n_cuts = cut_subpath(self, subpath, segs, &cuts, &mut fragments);
            log::trace!(
                "subpath {i}: {n_cuts} cuts, {} fragments",
                fragments.len() - before
            );
        }
        fragments
    }
}

/// Cut one subpath, appending its fragments to `out`. Returns the number of
/// cut points on the subpath.
fn cut_subpath(
    path: &Path,
    subpath: &Subpath,
    segs: &[IndexedSeg],
    cuts: &[(usize, f64)],
    out: &mut Vec<Path>,
) -> usize {
    let mut builder = FragmentBuilder::default();
    let mut n_cuts = 0;
    for entry in segs {
        let mut prev_t = 0.0;
        for &(_, t) in cuts.iter().filter(|(seg, _)| *seg == entry.ix) {
            n_cuts += 1;
            if t - prev_t > EPSILON {
                builder.push_seg(entry.seg.subsegment(prev_t..t));
            }
            builder.split();
            prev_t = t;
        }
        if 1.0 - prev_t > EPSILON {
            if prev_t == 0.0 {
                builder.push_seg(entry.seg);
            } else {
                builder.push_seg(entry.seg.subsegment(prev_t..1.0));
            }
        }
    }
    builder.split();

    if n_cuts == 0 {
        out.push(uncut_subpath(path, subpath, segs));
        return 0;
    }

    let mut pieces = builder.pieces;
    // Join the pieces on both sides of the start point, unless it is a cut
    // point itself.
    if subpath.closed && pieces.len() > 1 && !pieces[0].is_empty() {
        let first = pieces.remove(0);
        if let Some(last) = pieces.pop() {
            pieces.insert(0, join(last, first));
        }
    }
    out.extend(pieces.into_iter().filter(has_extent));
    n_cuts
}

/// Whether some segment of the piece draws more than a point.
fn has_extent(piece: &Path) -> bool {
    piece.segments().any(|seg| !seg.is_degenerate())
}

/// `a` followed by `b`, where `b` starts where `a` ends.
fn join(a: Path, b: Path) -> Path {
    if a.is_empty() {
        return b;
    }
    let mut joined = a;
    for &el in b.elements().iter().skip(1) {
        joined.push(el);
    }
    joined
}

/// A subpath without cuts, as a path of its own.
fn uncut_subpath(path: &Path, subpath: &Subpath, segs: &[IndexedSeg]) -> Path {
    let mut result = Path::new();
    result.move_to(subpath.start);
    for entry in segs {
        match path.elements()[entry.ix] {
            PathEl::ClosePath => result.close_path(),
            _ => result.push(entry.seg.as_path_el()),
        }
    }
    if subpath.closed && result.elements().last() != Some(&PathEl::ClosePath) {
        result.close_path();
    }
    result
}

#[derive(Default)]
struct FragmentBuilder {
    pieces: Vec<Path>,
    current: Path,
}

impl FragmentBuilder {
    fn push_seg(&mut self, seg: PathSeg) {
        if self.current.elements().is_empty() {
            self.current.move_to(seg.start());
        }
        self.current.push(seg.as_path_el());
    }

    /// End the current piece; an empty piece is kept as a placeholder so that
    /// the first and last pieces stay identifiable.
    fn split(&mut self) {
        self.pieces.push(mem::take(&mut self.current));
    }
}

/// Classify a fragment against another path.
///
/// The fragment is sampled halfway along its middle segment, and the sample
/// is inside when `other` winds around it. An empty fragment is outside.
pub fn classify_fragment(fragment: &Path, other: &Path) -> Side {
    let segs: Vec<PathSeg> = fragment.segments().collect();
    let Some(seg) = segs.get(segs.len() / 2) else {
        return Side::Outside;
    };
    if other.winding(seg.eval(0.5)) != 0 {
        Side::Inside
    } else {
        Side::Outside
    }
}
