// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection records.

use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::epsilon::EPSILON;
use crate::Point;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A point where two segments cross or touch.
///
/// Segment indices are element indices into the two paths (see
/// [`Path::get_seg`](crate::Path::get_seg)); the segment-level solvers leave
/// them at 0. The parameters are positions on the segments, in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    /// The intersection point.
    pub point: Point,
    /// Element index of the segment in the first path.
    pub segment_a: usize,
    /// Element index of the segment in the second path.
    pub segment_b: usize,
    /// Parameter on the first segment.
    pub t_a: f64,
    /// Parameter on the second segment.
    pub t_b: f64,
    /// Whether the contact is not a transversal crossing.
    ///
    /// This is set for contacts at a segment end point, for collinear
    /// overlaps (reported at the midpoint of the overlap) and where the two
    /// curves share a tangent direction.
    pub tangent: bool,
}

/// The intersections between two segments or paths.
pub type IntersectionList = SmallVec<[Intersection; 4]>;

impl Intersection {
    /// Create a record for a segment pair, with both segment indices 0.
    #[inline]
    pub fn new(point: Point, t_a: f64, t_b: f64, tangent: bool) -> Intersection {
        Intersection {
            point,
            segment_a: 0,
            segment_b: 0,
            t_a,
            t_b,
            tangent,
        }
    }

    /// The same contact seen from the other path.
    #[must_use]
    #[inline]
    pub fn swapped(&self) -> Intersection {
        Intersection {
            point: self.point,
            segment_a: self.segment_b,
            segment_b: self.segment_a,
            t_a: self.t_b,
            t_b: self.t_a,
            tangent: self.tangent,
        }
    }

    /// Returns the record with its segment indices set.
    #[must_use]
    #[inline]
    pub fn with_segments(self, segment_a: usize, segment_b: usize) -> Intersection {
        Intersection {
            segment_a,
            segment_b,
            ..self
        }
    }

    /// Order along the first path, then along the second.
    pub fn cmp_a(&self, other: &Intersection) -> Ordering {
        self.segment_a
            .cmp(&other.segment_a)
            .then(self.t_a.total_cmp(&other.t_a))
            .then(self.segment_b.cmp(&other.segment_b))
            .then(self.t_b.total_cmp(&other.t_b))
    }

    /// Order along the second path, then along the first.
    pub fn cmp_b(&self, other: &Intersection) -> Ordering {
        self.segment_b
            .cmp(&other.segment_b)
            .then(self.t_b.total_cmp(&other.t_b))
            .then(self.segment_a.cmp(&other.segment_a))
            .then(self.t_a.total_cmp(&other.t_a))
    }

    /// Whether both records name the same segments at parameters within
    /// [`EPSILON`].
    pub fn same_position(&self, other: &Intersection) -> bool {
        self.segment_a == other.segment_a
            && self.segment_b == other.segment_b
            && (self.t_a - other.t_a).abs() <= EPSILON
            && (self.t_b - other.t_b).abs() <= EPSILON
    }
}

/// Sort records along the first path and collapse duplicates.
///
/// Records at the same position (see [`Intersection::same_position`]) are
/// merged into the first one, which becomes tangent if any of them was.
pub fn sort_and_dedup(list: &mut IntersectionList) {
    list.sort_by(Intersection::cmp_a);
    // Duplicates need not be adjacent after sorting; compare against every
    // kept record on the same segment of A.
    let mut kept = IntersectionList::new();
    for record in list.drain(..) {
        let existing = kept
            .iter_mut()
            .rev()
            .take_while(|k| k.segment_a == record.segment_a)
            .find(|k| k.same_position(&record));
        if let Some(existing) = existing {
            existing.tangent |= record.tangent;
        } else {
            kept.push(record);
        }
    }
    *list = kept;
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    fn rec(seg_a: usize, t_a: f64, seg_b: usize, t_b: f64, tangent: bool) -> Intersection {
        Intersection::new(Point::ORIGIN, t_a, t_b, tangent).with_segments(seg_a, seg_b)
    }

    #[test]
    fn swapped_is_involution() {
        let r = rec(2, 0.25, 5, 0.75, false);
        let s = r.swapped();
        assert_eq!(s.segment_a, 5);
        assert_eq!(s.t_a, 0.75);
        assert_eq!(s.swapped(), r);
    }

    #[test]
    fn orders() {
        let a = rec(1, 0.5, 3, 0.1, false);
        let b = rec(2, 0.1, 1, 0.9, false);
        assert_eq!(a.cmp_a(&b), Ordering::Less);
        assert_eq!(a.cmp_b(&b), Ordering::Greater);
    }

    #[test]
    fn dedup_merges_tangent_flags() {
        let mut list: IntersectionList = smallvec![
            rec(2, 0.5, 1, 0.5, false),
            rec(1, 0.0, 1, 0.0, false),
            rec(2, 0.5 + 0.1 * EPSILON, 1, 0.5, true),
            rec(2, 0.5, 3, 0.5, false),
        ];
        sort_and_dedup(&mut list);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].segment_a, 1);
        assert!(list[1].tangent);
        assert_eq!(list[2].segment_b, 3);
    }
}
