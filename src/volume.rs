use glam::Vec3;
use serde::Serialize;

use crate::geometry::Footprint;

/// Identifier assigned in placement order
pub type VolumeId = u32;

/// Size class of a scattered volume
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SizeClass {
    /// Small filler volume
    Regular,
    /// Larger than the mean-derived threshold; a primary room
    Main,
    /// Highest volume of the pass
    StaircaseUp,
    /// Lowest volume of the pass
    StaircaseDown,
}

impl SizeClass {
    pub fn is_staircase(self) -> bool {
        matches!(self, SizeClass::StaircaseUp | SizeClass::StaircaseDown)
    }
}

/// A room candidate: an axis-aligned box in world space.
///
/// `position` is the center of the box and `scale` its full extent per axis.
/// `overlapping` is owned by the external overlap resolver; the core only reads it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Volume {
    pub id: VolumeId,
    pub position: Vec3,
    pub scale: Vec3,
    pub class: SizeClass,
    pub overlapping: bool,
}

impl Volume {
    pub fn new(id: VolumeId, position: Vec3, scale: Vec3) -> Self {
        Self {
            id,
            position,
            scale,
            class: SizeClass::Regular,
            overlapping: false,
        }
    }

    /// Sum of the three extents, compared against the mean to pick Main volumes
    pub fn collective_size(&self) -> f32 {
        self.scale.x + self.scale.y + self.scale.z
    }

    pub fn top(&self) -> Footprint {
        let half = self.scale / 2.0;
        Footprint::new(self.position + Vec3::new(0.0, half.y, 0.0), half)
    }

    pub fn bottom(&self) -> Footprint {
        let half = self.scale / 2.0;
        Footprint::new(self.position - Vec3::new(0.0, half.y, 0.0), half)
    }

    pub fn highest_point(&self) -> f32 {
        self.top().height()
    }

    pub fn lowest_point(&self) -> f32 {
        self.bottom().height()
    }

    pub fn min(&self) -> Vec3 {
        self.position - self.scale / 2.0
    }

    pub fn max(&self) -> Vec3 {
        self.position + self.scale / 2.0
    }

    /// Strict box intersection; touching faces do not overlap.
    pub fn intersects(&self, other: &Volume) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x
            && a_max.x > b_min.x
            && a_min.y < b_max.y
            && a_max.y > b_min.y
            && a_min.z < b_max.z
            && a_max.z > b_min.z
    }

    pub fn is_staircase(&self) -> bool {
        self.class.is_staircase()
    }
}
