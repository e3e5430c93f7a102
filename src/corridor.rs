//! Corridor routing: turns spanning tree edges into straight corridor segments.
//!
//! Each edge becomes one to three segments. Connection points are picked on
//! each room's bottom footprint, and a corner is inserted when the run is long
//! enough. Routing is driven purely by distance thresholds; corridors are not
//! checked against other rooms or corridors, and the result depends on edge
//! order because connection points are claimed as edges are processed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::RoutingConfig;
use crate::constants::CORRIDOR_MIN_VERTICAL_SPAN;
use crate::geometry::horizontal_distance;
use crate::graph::{AnchorPoint, Edge};
use crate::volume::VolumeId;

/// Where on a footprint corridors may attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPoints {
    /// The four footprint corners
    #[default]
    Corners,
    /// The midpoints of the four footprint edges
    SideCenters,
}

/// One end of a routed segment. Synthetic corner points have no volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentPoint {
    pub position: Vec3,
    pub volume: Option<VolumeId>,
}

impl SegmentPoint {
    pub fn on_volume(position: Vec3, volume: Option<VolumeId>) -> Self {
        Self { position, volume }
    }

    pub fn corner(position: Vec3) -> Self {
        Self {
            position,
            volume: None,
        }
    }
}

/// A straight corridor piece ready for triangulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutedSegment {
    pub start: SegmentPoint,
    pub end: SegmentPoint,
    /// Path width the corridor is built with
    pub weight: f32,
}

impl RoutedSegment {
    pub fn length(&self) -> f32 {
        self.start.position.distance(self.end.position)
    }

    /// Display name, `0` standing in for endpoints without a volume
    pub fn name(&self) -> String {
        format!(
            "Path | {} - {}",
            self.start.volume.unwrap_or(0),
            self.end.volume.unwrap_or(0)
        )
    }
}

/// Corner geometry for one edge
#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    corner: Vec3,
    secondary: Vec3,
}

#[derive(Debug, Clone)]
pub struct CorridorRouter {
    path_width: f32,
    min_length_for_path: f32,
    min_length_for_corner: f32,
    connection_points: ConnectionPoints,
    align_tolerance: f32,
}

impl CorridorRouter {
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            path_width: config.path_width,
            min_length_for_path: config.min_length_for_path,
            min_length_for_corner: config.min_length_for_corner,
            connection_points: config.connection_points,
            align_tolerance: config.align_tolerance,
        }
    }

    /// Route every edge in order. Marks connection points used on `anchors`.
    pub fn route(&self, anchors: &mut [AnchorPoint], edges: &[Edge]) -> Vec<RoutedSegment> {
        puffin::profile_function!();

        let mut segments = Vec::with_capacity(edges.len() * 2);
        let mut dropped = 0usize;
        for edge in edges {
            let before = segments.len();
            self.route_edge(anchors, edge, &mut segments);
            if segments.len() == before {
                dropped += 1;
            }
        }

        tracing::debug!(
            target: "dungeon::route",
            edges = edges.len(),
            segments = segments.len(),
            dropped,
            "route.done"
        );
        segments
    }

    fn route_edge(&self, anchors: &mut [AnchorPoint], edge: &Edge, out: &mut Vec<RoutedSegment>) {
        if edge.a == edge.b {
            return;
        }

        let end_center = attach_target(&anchors[edge.b]);
        let s = self.closest_point(&mut anchors[edge.a], end_center, true);
        let claimed_before = anchors[edge.b].used().len();
        let e = self.closest_point(&mut anchors[edge.b], s, true);
        let e_is_ours = anchors[edge.b].used().len() > claimed_before;

        let start = SegmentPoint::on_volume(s, anchors[edge.a].volume);
        let end = SegmentPoint::on_volume(e, anchors[edge.b].volume);

        if horizontal_distance(s, e) < self.min_length_for_path {
            return;
        }

        let Some(Corner { corner, secondary }) = self.corner_for(s, e) else {
            out.push(self.segment(start, end));
            return;
        };

        if horizontal_distance(s, corner) < self.min_length_for_corner {
            out.push(self.segment(start, end));
            return;
        }

        let corner_point = SegmentPoint::corner(corner);
        out.push(self.segment(start, corner_point));

        let y_start = (s.y - corner.y).abs();
        let y_end = (secondary.y - e.y).abs();
        let splits = y_start >= self.min_length_for_corner
            && y_end >= self.min_length_for_corner
            && y_start + y_end >= CORRIDOR_MIN_VERTICAL_SPAN;

        if splits {
            // The end moves to the unused point nearest the secondary corner
            if e_is_ours {
                anchors[edge.b].release(e);
            }
            let secondary_point = SegmentPoint::corner(secondary);
            let e = self.closest_point(&mut anchors[edge.b], secondary, true);
            out.push(self.segment(corner_point, secondary_point));
            out.push(self.segment(
                secondary_point,
                SegmentPoint::on_volume(e, anchors[edge.b].volume),
            ));
        } else {
            out.push(self.segment(corner_point, end));
        }
    }

    /// Corner between `s` and `e`, or `None` when they are aligned on x.
    ///
    /// The corner takes one point's x and the other's z at their mean height.
    /// The secondary corner sits one path width further along x.
    fn corner_for(&self, s: Vec3, e: Vec3) -> Option<Corner> {
        if (s.x - e.x).abs() <= self.align_tolerance {
            return None;
        }

        let y = (s.y + e.y) / 2.0;
        let (corner, secondary) = if s.x < e.x {
            let corner = Vec3::new(s.x, y, e.z);
            (corner, Vec3::new(corner.x + self.path_width, y, e.z))
        } else {
            let corner = Vec3::new(e.x, y, s.z);
            (corner, Vec3::new(corner.x - self.path_width, y, s.z))
        };
        Some(Corner { corner, secondary })
    }

    /// Connection point on `anchor` nearest to `target`.
    ///
    /// With `claim`, points already used by another corridor are skipped and the
    /// chosen point is marked used. When every point is taken the nearest one
    /// is reused. Anchors without a footprint connect at their own position.
    fn closest_point(&self, anchor: &mut AnchorPoint, target: Vec3, claim: bool) -> Vec3 {
        let Some(footprint) = anchor.footprint else {
            return anchor.position;
        };
        let candidates = match self.connection_points {
            ConnectionPoints::Corners => footprint.corners(),
            ConnectionPoints::SideCenters => footprint.side_centers(),
        };

        let nearest = |skip_used: bool| {
            let mut closest: Option<(Vec3, f32)> = None;
            for p in candidates {
                let dist = p.distance(target);
                if closest.is_some_and(|(_, best)| dist > best) {
                    continue;
                }
                if skip_used && anchor.is_used(p) {
                    continue;
                }
                closest = Some((p, dist));
            }
            closest.map(|(p, _)| p)
        };

        let chosen = nearest(claim)
            .or_else(|| nearest(false))
            .unwrap_or(footprint.center);
        if claim {
            anchor.mark_used(chosen);
        }
        chosen
    }

    fn segment(&self, start: SegmentPoint, end: SegmentPoint) -> RoutedSegment {
        RoutedSegment {
            start,
            end,
            weight: self.path_width,
        }
    }
}

/// Point corridors aim for on an anchor: its footprint center when it has one
fn attach_target(anchor: &AnchorPoint) -> Vec3 {
    anchor
        .footprint
        .map(|footprint| footprint.center)
        .unwrap_or(anchor.position)
}
