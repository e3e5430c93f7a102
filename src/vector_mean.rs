use glam::Vec3;

/// Running mean/min/max over the summed extents (`x + y + z`) of size vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VectorMean {
    pub total: f32,
    pub min: f32,
    pub max: f32,
    count: usize,
}

impl VectorMean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, vector: Vec3) {
        let collective = vector.x + vector.y + vector.z;
        if self.count == 0 || collective < self.min {
            self.min = collective;
        }
        if self.count == 0 || collective > self.max {
            self.max = collective;
        }

        self.total += collective;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean summed extent, or 0 when nothing was added.
    pub fn mean(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.total / self.count as f32
    }
}
