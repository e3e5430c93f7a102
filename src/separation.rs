//! Headless overlap resolvers.
//!
//! Stand-ins for an engine's physics so the pipeline can run on its own: from
//! the CLI, in tests, or in a server without a scene.

use glam::Vec3;

use crate::constants::SEPARATION_FORCE_MULTIPLIER;
use crate::scatter::OverlapResolver;
use crate::volume::Volume;

/// Pushes intersecting boxes apart along the line between their centers.
///
/// Every step each intersecting pair is displaced by
/// `force_multiplier * dt * dt` (unit mass), then the overlap flags are
/// recomputed from the new positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AabbSeparation {
    pub force_multiplier: f32,
}

impl Default for AabbSeparation {
    fn default() -> Self {
        Self {
            force_multiplier: SEPARATION_FORCE_MULTIPLIER,
        }
    }
}

impl AabbSeparation {
    pub fn new(force_multiplier: f32) -> Self {
        Self { force_multiplier }
    }
}

impl OverlapResolver for AabbSeparation {
    fn step(&mut self, volumes: &mut [Volume], dt: f32) {
        puffin::profile_function!();

        let push = self.force_multiplier * dt * dt;
        let mut offsets = vec![Vec3::ZERO; volumes.len()];

        for i in 0..volumes.len() {
            for j in (i + 1)..volumes.len() {
                if !volumes[i].intersects(&volumes[j]) {
                    continue;
                }
                let mut direction = (volumes[i].position - volumes[j].position).normalize_or_zero();
                if direction == Vec3::ZERO {
                    direction = Vec3::X;
                }
                offsets[i] += direction * push;
                offsets[j] -= direction * push;
            }
        }

        for (volume, offset) in volumes.iter_mut().zip(offsets) {
            volume.position += offset;
        }
        refresh_overlaps(volumes);
    }
}

/// Resolver for callers that already know nothing overlaps: clears every flag
/// without moving anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoOverlap;

impl OverlapResolver for NoOverlap {
    fn step(&mut self, volumes: &mut [Volume], _dt: f32) {
        for volume in volumes {
            volume.overlapping = false;
        }
    }
}

/// Set each volume's flag from pairwise box intersection.
pub fn refresh_overlaps(volumes: &mut [Volume]) {
    let mut flags = vec![false; volumes.len()];
    for i in 0..volumes.len() {
        for j in (i + 1)..volumes.len() {
            if volumes[i].intersects(&volumes[j]) {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }
    for (volume, flag) in volumes.iter_mut().zip(flags) {
        volume.overlapping = flag;
    }
}
