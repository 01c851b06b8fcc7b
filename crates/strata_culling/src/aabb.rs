//! Axis-aligned bounding boxes of chunk contents.

use strata_world::Chunk;

/// Axis-aligned bounding box for culling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Aabb {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// World-space box around every occupied cell of `chunk`.
    ///
    /// Each block fills the unit cube from its integer corner, so the box
    /// reaches one past the highest occupied cell. Returns `None` for an
    /// empty chunk.
    #[must_use]
    pub fn of_chunk(chunk: &Chunk) -> Option<Self> {
        let (min, max) = chunk.local_bounds()?;
        let origin = [chunk.coord.world_x(), 0, chunk.coord.world_z()];
        let world = |local: [i32; 3]| {
            [
                (origin[0] + local[0]) as f32,
                (origin[1] + local[1]) as f32,
                (origin[2] + local[2]) as f32,
            ]
        };
        Some(Self::new(world(min), world(max)))
    }

    /// The eight corners, min corner first.
    #[must_use]
    pub fn corners(&self) -> [[f32; 3]; 8] {
        let [x0, y0, z0] = self.min;
        let [x1, y1, z1] = self.max;
        [
            [x0, y0, z0],
            [x1, y0, z0],
            [x0, y1, z0],
            [x1, y1, z0],
            [x0, y0, z1],
            [x1, y0, z1],
            [x0, y1, z1],
            [x1, y1, z1],
        ]
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// Returns true if the point lies inside or on the box.
    #[must_use]
    pub fn contains_point(&self, point: [f32; 3]) -> bool {
        (0..3).all(|axis| (self.min[axis]..=self.max[axis]).contains(&point[axis]))
    }
}
