// Copyright 2025 the Pathsect Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersections between whole paths, and the graph linking them.

use alloc::vec::Vec;
use core::iter;

use crate::intersection::sort_and_dedup;
use crate::path::SegmentTable;
use crate::{segment_intersections, Intersection, IntersectionList, Path};

impl Path {
    /// Find all intersections between this path and `other`.
    ///
    /// Every segment of `self` is tested against every segment of `other`.
    /// The records carry element indices (see [`Path::get_seg`]) and are
    /// sorted along `self`, then along `other`.
    ///
    /// A hit at the very end of a segment is reported at the start of the
    /// segment that follows it in the same subpath (wrapping around in a
    /// closed subpath), so that a shared vertex yields a single record.
    pub fn intersections(&self, other: &Path) -> IntersectionList {
        let table_a = SegmentTable::new(self);
        let table_b = SegmentTable::new(other);
        let mut records = IntersectionList::new();
        for ea in &table_a.segs {
            for eb in &table_b.segs {
                for record in segment_intersections(&ea.seg, &eb.seg) {
                    let mut record = record.with_segments(ea.ix, eb.ix);
                    if record.t_a == 1.0 {
                        if let Some(next) = table_a.next_of(ea.ix) {
                            record.segment_a = next;
                            record.t_a = 0.0;
                        }
                    }
                    if record.t_b == 1.0 {
                        if let Some(next) = table_b.next_of(eb.ix) {
                            record.segment_b = next;
                            record.t_b = 0.0;
                        }
                    }
                    records.push(record);
                }
            }
        }
        sort_and_dedup(&mut records);
        log::debug!(
            "{} x {} segments: {} intersections",
            table_a.segs.len(),
            table_b.segs.len(),
            records.len()
        );
        records
    }
}

/// Index of a node in an [`IntersectionGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The position of the node in the order along the first path.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// An intersection record linked to its neighbours along both paths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionNode {
    /// The intersection.
    pub record: Intersection,
    /// The next intersection along the first path.
    pub next_a: NodeId,
    /// The previous intersection along the first path.
    pub prev_a: NodeId,
    /// The next intersection along the second path.
    pub next_b: NodeId,
    /// The previous intersection along the second path.
    pub prev_b: NodeId,
}

/// The intersections of two paths, linked into two rings.
///
/// The `a` links visit the nodes in the order they are met walking the first
/// path, the `b` links in the order they are met walking the second one.
/// Both rings are circular. Nodes live in an arena and refer to each other by
/// [`NodeId`]; the graph is immutable once built.
#[derive(Clone, Debug, Default)]
pub struct IntersectionGraph {
    nodes: Vec<IntersectionNode>,
    closes_a: bool,
    closes_b: bool,
}

impl IntersectionGraph {
    /// Build the graph of the intersections of `a` and `b`.
    pub fn new(a: &Path, b: &Path) -> IntersectionGraph {
        let records = a.intersections(b);
        IntersectionGraph::from_intersections(&records, all_closed(a), all_closed(b))
    }

    /// Build the graph from intersection records.
    ///
    /// The records need not be sorted. `closes_a` and `closes_b` tell whether
    /// the respective path is closed, see [`IntersectionGraph::closes_a`].
    pub fn from_intersections(
        records: &[Intersection],
        closes_a: bool,
        closes_b: bool,
    ) -> IntersectionGraph {
        let mut sorted = records.to_vec();
        sorted.sort_by(Intersection::cmp_a);
        let n = sorted.len();
        let mut nodes: Vec<IntersectionNode> = sorted
            .iter()
            .enumerate()
            .map(|(i, &record)| IntersectionNode {
                record,
                next_a: NodeId((i + 1) % n),
                prev_a: NodeId((i + n - 1) % n),
                next_b: NodeId(i),
                prev_b: NodeId(i),
            })
            .collect();

        let mut order_b: Vec<usize> = (0..n).collect();
        order_b.sort_by(|&i, &j| sorted[i].cmp_b(&sorted[j]));
        for (k, &i) in order_b.iter().enumerate() {
            nodes[i].next_b = NodeId(order_b[(k + 1) % n]);
            nodes[i].prev_b = NodeId(order_b[(k + n - 1) % n]);
        }

        IntersectionGraph {
            nodes,
            closes_a,
            closes_b,
        }
    }

    /// The first intersection along the first path, if there is any.
    #[inline]
    pub fn head(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId(0))
    }

    /// The node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id belongs to another graph with more nodes.
    #[inline]
    pub fn node(&self, id: NodeId) -> &IntersectionNode {
        &self.nodes[id.0]
    }

    /// The number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the paths do not intersect.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in order along the first path.
    pub fn nodes(&self) -> &[IntersectionNode] {
        &self.nodes
    }

    /// Walk the first path's ring from `start`, visiting every node once.
    pub fn iter_a(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(start), |&id| Some(self.node(id).next_a)).take(self.len())
    }

    /// Walk the second path's ring from `start`, visiting every node once.
    pub fn iter_b(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(start), |&id| Some(self.node(id).next_b)).take(self.len())
    }

    /// Whether the first path is closed.
    ///
    /// If it is not, the link from the last node back to the first one only
    /// exists so that the ring can be walked from any node; it does not follow
    /// the path.
    #[inline]
    pub fn closes_a(&self) -> bool {
        self.closes_a
    }

    /// Whether the second path is closed.
    #[inline]
    pub fn closes_b(&self) -> bool {
        self.closes_b
    }
}

/// Whether the path has segments and all of its subpaths are closed.
fn all_closed(path: &Path) -> bool {
    let table = SegmentTable::new(path);
    !table.subpaths.is_empty() && table.subpaths.iter().all(|sp| sp.closed)
}

/// Build the intersection graph of two paths.
///
/// Start walking from [`IntersectionGraph::head`].
pub fn path_intersections(a: &Path, b: &Path) -> IntersectionGraph {
    IntersectionGraph::new(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn path(data: &str) -> Path {
        Path::from_svg(data).unwrap()
    }

    type Expected = ((f64, f64), usize, usize, f64, f64, bool);

    fn assert_records(got: &[Intersection], expected: &[Expected]) {
        assert_eq!(got.len(), expected.len(), "{got:?}");
        for (rec, &(point, seg_a, seg_b, t_a, t_b, tangent)) in got.iter().zip(expected) {
            assert!(rec.point.distance(point.into()) < 1e-9, "{rec:?}");
            assert_eq!((rec.segment_a, rec.segment_b), (seg_a, seg_b), "{rec:?}");
            assert!((rec.t_a - t_a).abs() < 1e-9, "{rec:?}");
            assert!((rec.t_b - t_b).abs() < 1e-9, "{rec:?}");
            assert_eq!(rec.tangent, tangent, "{rec:?}");
        }
    }

    #[test]
    fn triangles() {
        let p = path("L10 0L5 10z");
        let q = path("M0 5L10 5L5 15z");
        assert_records(
            &p.intersections(&q),
            &[
                ((7.5, 5.0), 2, 1, 0.5, 0.75, false),
                ((2.5, 5.0), 3, 1, 0.5, 0.25, false),
            ],
        );
    }

    #[test]
    fn triangle_touching_arc() {
        let p = path("L10 0L5 10z");
        let q = path("M0 -5L10 -5A5 5 0 0 1 0 -5");
        assert_records(
            &p.intersections(&q),
            &[((5.0, 0.0), 1, 2, 0.5, 0.5, true)],
        );
    }

    #[test]
    fn shared_vertex() {
        let p = path("L10 6L20 0");
        let q = path("M0 10L10 6L20 10");
        assert_records(
            &p.intersections(&q),
            &[((10.0, 6.0), 2, 2, 0.0, 0.0, true)],
        );
    }

    #[test]
    fn seam_of_closed_subpath() {
        // The square's start vertex lies on the line; the hit at the end of
        // the closing segment moves to the start of the first segment.
        let p = path("M0 0L10 0L10 10L0 10z");
        let q = path("M-5 5L5 -5");
        let records = p.intersections(&q);
        assert_records(&records, &[((0.0, 0.0), 1, 1, 0.0, 0.5, true)]);
    }

    #[test]
    fn disjoint_paths() {
        let graph = path_intersections(&path("L10 0L5 10z"), &path("M20 20L30 20L25 30z"));
        assert!(graph.is_empty());
        assert_eq!(graph.head(), None);
        assert!(graph.closes_a());
    }

    fn assert_ring(
        graph: &IntersectionGraph,
        ids: impl Iterator<Item = NodeId>,
        expected: &[(f64, f64)],
    ) {
        let got: Vec<Point> = ids.map(|id| graph.node(id).record.point).collect();
        assert_eq!(got.len(), expected.len(), "{got:?}");
        for (p, &q) in got.iter().zip(expected) {
            assert!(p.distance(q.into()) < 1e-9, "{got:?} != {expected:?}");
        }
    }

    #[test]
    fn graph_orders() {
        let p = path("V50H10V0z");
        let q = path("M30 10V40H-10V30H20V20H-10V10z");
        let graph = path_intersections(&p, &q);
        let head = graph.head().unwrap();
        assert_ring(
            &graph,
            graph.iter_a(head),
            &[
                (0., 10.),
                (0., 20.),
                (0., 30.),
                (0., 40.),
                (10., 40.),
                (10., 30.),
                (10., 20.),
                (10., 10.),
            ],
        );
        assert_ring(
            &graph,
            graph.iter_b(head),
            &[
                (0., 10.),
                (10., 10.),
                (10., 40.),
                (0., 40.),
                (0., 30.),
                (10., 30.),
                (10., 20.),
                (0., 20.),
            ],
        );
        assert!(graph.closes_a() && graph.closes_b());

        for (i, node) in graph.nodes().iter().enumerate() {
            let id = NodeId(i);
            assert_eq!(graph.node(node.next_a).prev_a, id);
            assert_eq!(graph.node(node.prev_a).next_a, id);
            assert_eq!(graph.node(node.next_b).prev_b, id);
            assert_eq!(graph.node(node.prev_b).next_b, id);
            assert!(!node.record.tangent);
        }
        // Walking back visits the same ring in reverse.
        let back: Vec<NodeId> = iter::successors(Some(head), |&id| Some(graph.node(id).prev_b))
            .take(graph.len())
            .collect();
        let mut forward: Vec<NodeId> = graph.iter_b(head).collect();
        forward[1..].reverse();
        assert_eq!(back, forward);
    }

    #[test]
    fn open_paths_still_form_rings() {
        let p = path("M0 0L30 0");
        let q = path("M5 -5L5 5M15 -5L15 5M25 -5L25 5");
        let graph = path_intersections(&p, &q);
        assert_eq!(graph.len(), 3);
        assert!(!graph.closes_a());
        assert!(!graph.closes_b());
        let head = graph.head().unwrap();
        let last = graph.node(head).prev_a;
        assert!(graph.node(last).record.point.distance(Point::new(25.0, 0.0)) < 1e-9);
        assert_eq!(graph.node(last).next_a, head);
        assert_eq!(graph.node(head).record.segment_b, 1);
        assert_eq!(graph.node(last).record.segment_b, 5);
    }
}
