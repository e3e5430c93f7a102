use glam::{Vec2, Vec3};
use serde::Serialize;

/// Which corner of a footprint a point sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FootprintSide {
    BottomLeft,
    TopLeft,
    TopRight,
    BottomRight,
}

impl FootprintSide {
    pub const ALL: [FootprintSide; 4] = [
        FootprintSide::BottomLeft,
        FootprintSide::TopLeft,
        FootprintSide::TopRight,
        FootprintSide::BottomRight,
    ];
}

/// A horizontal, axis-aligned rectangle at a fixed height: the top or bottom
/// face of a volume.
///
/// Corners are always derived from center and half extents, never stored
/// independently of them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Footprint {
    /// Bottom left point
    pub a: Vec3,
    /// Top left point
    pub b: Vec3,
    /// Top right point
    pub c: Vec3,
    /// Bottom right point
    pub d: Vec3,
    pub center: Vec3,
}

impl Footprint {
    /// Build a footprint around `center` spanning `half.x` and `half.z` either side.
    pub fn new(center: Vec3, half: Vec3) -> Self {
        let Vec3 { x, y, z } = center;
        Self {
            a: Vec3::new(x - half.x, y, z + half.z),
            b: Vec3::new(x + half.x, y, z + half.z),
            c: Vec3::new(x + half.x, y, z - half.z),
            d: Vec3::new(x - half.x, y, z - half.z),
            center,
        }
    }

    pub fn corners(&self) -> [Vec3; 4] {
        [self.a, self.b, self.c, self.d]
    }

    pub fn corner(&self, side: FootprintSide) -> Vec3 {
        match side {
            FootprintSide::BottomLeft => self.a,
            FootprintSide::TopLeft => self.b,
            FootprintSide::TopRight => self.c,
            FootprintSide::BottomRight => self.d,
        }
    }

    pub fn left_center(&self) -> Vec3 {
        (self.a + self.b) / 2.0
    }

    pub fn right_center(&self) -> Vec3 {
        (self.c + self.d) / 2.0
    }

    pub fn top_center(&self) -> Vec3 {
        (self.b + self.c) / 2.0
    }

    pub fn bottom_center(&self) -> Vec3 {
        (self.a + self.d) / 2.0
    }

    /// Midpoints of the four edges: left, right, top, bottom.
    pub fn side_centers(&self) -> [Vec3; 4] {
        [
            self.left_center(),
            self.right_center(),
            self.top_center(),
            self.bottom_center(),
        ]
    }

    pub fn height(&self) -> f32 {
        self.center.y
    }
}

/// Horizontal (x, z) projection of a point
#[inline]
pub fn xz(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}

/// Distance between two points ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    xz(a).distance(xz(b))
}
