//! Frustum planes and the box-versus-frustum test.
//!
//! Planes are extracted from a view-projection matrix. A point is inside a
//! plane when its signed distance is non-negative.

use bytemuck::{Pod, Zeroable};

use crate::aabb::Aabb;

/// A plane in 3D space (Ax + By + Cz + D = 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Plane {
    /// Normal X component.
    pub a: f32,
    /// Normal Y component.
    pub b: f32,
    /// Normal Z component.
    pub c: f32,
    /// Distance from origin.
    pub d: f32,
}

impl Plane {
    /// Creates a new plane.
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Normalizes the plane. Degenerate planes are returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if len > 0.0 {
            Self {
                a: self.a / len,
                b: self.b / len,
                c: self.c / len,
                d: self.d / len,
            }
        } else {
            self
        }
    }

    /// Returns the signed distance from a point to the plane.
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, [x, y, z]: [f32; 3]) -> f32 {
        self.a * x + self.b * y + self.c * z + self.d
    }

    /// Returns true if the point lies on the outer side.
    #[inline]
    #[must_use]
    pub fn is_outside(&self, point: [f32; 3]) -> bool {
        self.distance_to_point(point) < 0.0
    }

    /// Converts to array format.
    #[must_use]
    pub const fn as_array(&self) -> [f32; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

/// View frustum for culling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far planes.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Left plane index.
    pub const LEFT: usize = 0;
    /// Right plane index.
    pub const RIGHT: usize = 1;
    /// Bottom plane index.
    pub const BOTTOM: usize = 2;
    /// Top plane index.
    pub const TOP: usize = 3;
    /// Near plane index.
    pub const NEAR: usize = 4;
    /// Far plane index.
    pub const FAR: usize = 5;

    /// Extracts frustum planes from a view-projection matrix.
    ///
    /// The matrix is column-major (`m[column][row]`) with clip-space Z in
    /// `[-w, w]`.
    #[must_use]
    pub fn from_view_projection(m: &[[f32; 4]; 4]) -> Self {
        // Plane i is row 3 plus or minus row (i / 2).
        let row_plane = |row: usize, sign: f32| {
            Plane::new(
                m[0][3] + sign * m[0][row],
                m[1][3] + sign * m[1][row],
                m[2][3] + sign * m[2][row],
                m[3][3] + sign * m[3][row],
            )
            .normalized()
        };

        let mut planes = [Plane::default(); 6];
        planes[Self::LEFT] = row_plane(0, 1.0);
        planes[Self::RIGHT] = row_plane(0, -1.0);
        planes[Self::BOTTOM] = row_plane(1, 1.0);
        planes[Self::TOP] = row_plane(1, -1.0);
        planes[Self::NEAR] = row_plane(2, 1.0);
        planes[Self::FAR] = row_plane(2, -1.0);

        Self { planes }
    }

    /// Tests a box against this frustum. See [`is_visible`].
    #[must_use]
    pub fn contains_box(&self, aabb: &Aabb) -> bool {
        is_visible(aabb, &self.planes)
    }

    /// Converts planes to array format for GPU upload.
    #[must_use]
    pub fn as_arrays(&self) -> [[f32; 4]; 6] {
        self.planes.map(|plane| plane.as_array())
    }
}

/// Conservative box visibility.
///
/// The box is hidden only if all eight of its corners lie outside one and
/// the same plane. Boxes straddling a plane, or crossing a frustum corner
/// diagonally, count as visible.
#[must_use]
pub fn is_visible(aabb: &Aabb, planes: &[Plane; 6]) -> bool {
    let corners = aabb.corners();
    !planes
        .iter()
        .any(|plane| corners.iter().all(|corner| plane.is_outside(*corner)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frustum of the axis-aligned cube `[-s, s]^3` centred at `c`.
    fn cube_frustum(c: [f32; 3], s: f32) -> Frustum {
        let m = [
            [1.0 / s, 0.0, 0.0, 0.0],
            [0.0, 1.0 / s, 0.0, 0.0],
            [0.0, 0.0, 1.0 / s, 0.0],
            [-c[0] / s, -c[1] / s, -c[2] / s, 1.0],
        ];
        Frustum::from_view_projection(&m)
    }

    #[test]
    fn test_plane_normalization() {
        let plane = Plane::new(3.0, 4.0, 0.0, 10.0);
        let normalized = plane.normalized();

        // 3-4-5 triangle, so length is 5
        assert!((normalized.a - 0.6).abs() < 0.001);
        assert!((normalized.b - 0.8).abs() < 0.001);
        assert!((normalized.d - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_identity_planes_bound_unit_cube() {
        let frustum = Frustum::from_view_projection(&[
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(frustum.planes[Frustum::LEFT], Plane::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(frustum.planes[Frustum::FAR], Plane::new(0.0, 0.0, -1.0, 1.0));
        for plane in &frustum.planes {
            assert!(!plane.is_outside([0.0, 0.0, 0.0]));
            assert!(!plane.is_outside([1.0, 1.0, 1.0]));
        }
    }

    #[test]
    fn test_box_outside_one_plane_is_hidden() {
        let frustum = cube_frustum([0.0, 0.0, 0.0], 10.0);
        let beyond_right = Aabb::new([11.0, -1.0, -1.0], [12.0, 1.0, 1.0]);
        let below = Aabb::new([-1.0, -30.0, -1.0], [1.0, -20.0, 1.0]);
        assert!(!frustum.contains_box(&beyond_right));
        assert!(!frustum.contains_box(&below));
    }

    #[test]
    fn test_box_containing_camera_is_visible() {
        let frustum = cube_frustum([50.0, 10.0, -5.0], 4.0);
        let around = Aabb::new([40.0, 0.0, -15.0], [60.0, 20.0, 5.0]);
        assert!(frustum.contains_box(&around));
    }

    #[test]
    fn test_straddling_box_is_visible() {
        let frustum = cube_frustum([0.0, 0.0, 0.0], 10.0);
        let straddle = Aabb::new([9.0, 0.0, 0.0], [11.0, 1.0, 1.0]);
        assert!(frustum.contains_box(&straddle));
    }
}
