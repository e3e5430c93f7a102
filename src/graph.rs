//! Weighted complete graph over room anchor points.
//!
//! Vertices are addressed by their index in the anchor list; edges store those
//! indices rather than positions, so lookups never scan by value.

use glam::Vec3;
use serde::Serialize;

use crate::constants::{
    GRAPH_VERTICAL_DOMINANCE_DIVISOR, GRAPH_VERTICAL_PENALTY_OFFSET, GRAPH_VERTICAL_PENALTY_SCALE,
};
use crate::geometry::Footprint;
use crate::spanning_tree;
use crate::volume::{Volume, VolumeId};

/// A graph vertex: a position optionally tied to the volume it sits on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnchorPoint {
    pub position: Vec3,
    pub volume: Option<VolumeId>,
    /// Bottom footprint of the owning volume, where corridors attach
    pub footprint: Option<Footprint>,
    /// Connection positions already taken by a corridor
    #[serde(skip)]
    used: Vec<Vec3>,
}

impl AnchorPoint {
    /// An anchor with no owning volume
    pub fn free(position: Vec3) -> Self {
        Self {
            position,
            volume: None,
            footprint: None,
            used: Vec::new(),
        }
    }

    /// Anchor at the center of a volume's bottom footprint
    pub fn for_volume(volume: &Volume) -> Self {
        let footprint = volume.bottom();
        Self {
            position: footprint.center,
            volume: Some(volume.id),
            footprint: Some(footprint),
            used: Vec::new(),
        }
    }

    pub fn is_used(&self, point: Vec3) -> bool {
        self.used.contains(&point)
    }

    pub fn mark_used(&mut self, point: Vec3) {
        if !self.is_used(point) {
            self.used.push(point);
        }
    }

    /// Give a connection point back, e.g. when a corridor moves its end.
    pub fn release(&mut self, point: Vec3) {
        self.used.retain(|p| *p != point);
    }

    pub fn used(&self) -> &[Vec3] {
        &self.used
    }
}

/// Weighted connection between two anchors, by index.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f32,
}

impl Edge {
    /// Edge weighted by the Euclidean distance between its anchors
    pub fn new(anchors: &[AnchorPoint], a: usize, b: usize) -> Self {
        Self {
            a,
            b,
            weight: anchors[a].position.distance(anchors[b].position),
        }
    }

    pub fn with_weight(a: usize, b: usize, weight: f32) -> Self {
        Self { a, b, weight }
    }
}

/// Distance between two anchors, inflated when the vertical offset dominates.
///
/// Steep connections stay eligible but are heavily disfavored so the tree does
/// not grow ladders between rooms stacked on top of each other.
pub fn edge_weight(from: Vec3, to: Vec3) -> f32 {
    let y_dist = (from.y - to.y).abs();
    let dist = from.distance(to);
    let remaining = dist - y_dist;

    let mut weight = dist;
    if y_dist > remaining / GRAPH_VERTICAL_DOMINANCE_DIVISOR {
        weight *= (y_dist.abs() + GRAPH_VERTICAL_PENALTY_OFFSET) * GRAPH_VERTICAL_PENALTY_SCALE;
    }
    weight
}

/// Every unordered pair `(i, j)`, `i < j`, in row-major order. Unsorted.
pub fn build_edges(anchors: &[AnchorPoint]) -> Vec<Edge> {
    let count = anchors.len();
    let mut edges = Vec::with_capacity(count * count.saturating_sub(1) / 2);

    for i in 0..count {
        for j in (i + 1)..count {
            let weight = edge_weight(anchors[i].position, anchors[j].position);
            edges.push(Edge::with_weight(i, j, weight));
        }
    }

    tracing::debug!(
        target: "dungeon::graph",
        anchors = count,
        edges = edges.len(),
        "graph.complete"
    );
    edges
}

/// Vertex and edge set for one generation pass
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub anchors: Vec<AnchorPoint>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn complete(anchors: Vec<AnchorPoint>) -> Self {
        let edges = build_edges(&anchors);
        Self { anchors, edges }
    }

    /// Minimum spanning tree over this graph, plus optional branch edges.
    pub fn spanning_tree(&self, add_branching: bool, branch_count: usize) -> Vec<Edge> {
        spanning_tree::solve(self.anchors.len(), &self.edges, add_branching, branch_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(points: &[Vec3]) -> Vec<AnchorPoint> {
        points.iter().copied().map(AnchorPoint::free).collect()
    }

    #[test]
    fn test_flat_weight_is_distance() {
        let w = edge_weight(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0));
        assert!((w - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_penalty_applies() {
        let from = Vec3::ZERO;
        let to = Vec3::new(1.0, 6.0, 0.0);
        let dist = from.distance(to);
        let w = edge_weight(from, to);
        assert!(w > dist);
        assert!((w - dist * (6.0 + 5.0) * 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_mild_slope_is_not_penalized() {
        let from = Vec3::ZERO;
        let to = Vec3::new(10.0, 1.0, 0.0);
        assert_eq!(edge_weight(from, to), from.distance(to));
    }

    #[test]
    fn test_build_edges_covers_all_pairs() {
        let points = anchors(&[
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(5.0, 0.0, 5.0),
        ]);
        let edges = build_edges(&points);
        assert_eq!(edges.len(), 6);
        let pairs: Vec<(usize, usize)> = edges.iter().map(|e| (e.a, e.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_build_edges_degenerate() {
        assert!(build_edges(&[]).is_empty());
        assert!(build_edges(&anchors(&[Vec3::ONE])).is_empty());
    }

    #[test]
    fn test_anchor_marks_used_once() {
        let mut anchor = AnchorPoint::free(Vec3::ZERO);
        anchor.mark_used(Vec3::X);
        anchor.mark_used(Vec3::X);
        assert!(anchor.is_used(Vec3::X));
        assert_eq!(anchor.used().len(), 1);
    }

    #[test]
    fn test_volume_anchor_sits_on_bottom_center() {
        let volume = Volume::new(3, Vec3::new(2.0, 4.0, 6.0), Vec3::new(2.0, 2.0, 2.0));
        let anchor = AnchorPoint::for_volume(&volume);
        assert_eq!(anchor.position, Vec3::new(2.0, 3.0, 6.0));
        assert_eq!(anchor.volume, Some(3));
        assert_eq!(anchor.footprint, Some(volume.bottom()));
    }

    #[test]
    fn test_edge_new_uses_distance() {
        let points = anchors(&[Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)]);
        let edge = Edge::new(&points, 0, 1);
        assert_eq!(edge.weight, 2.0);
    }
}
