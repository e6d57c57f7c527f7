//! Math utilities and helpers.

use glam::{BVec3, Vec3};

/// Ray for raycasting operations.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    ///
    /// Returns `None` when the direction has zero length or the inputs are
    /// not finite, so NaN never reaches a traversal loop.
    #[inline]
    pub fn try_new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            return None;
        }
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Get a point along the ray at distance t
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray/box slab test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlabHit {
    /// Whether the ray overlaps the box in front of its origin
    pub hit: bool,
    /// Parametric entry distance (negative when the origin is inside)
    pub t_min: f32,
    /// Parametric exit distance
    pub t_max: f32,
    /// Axes whose near plane produced `t_min`
    pub entry_mask: BVec3,
}

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB spanning `[0, extent]` on every axis
    #[inline]
    pub const fn from_extent(extent: Vec3) -> Self {
        Self {
            min: Vec3::ZERO,
            max: extent,
        }
    }

    /// Get the size of the AABB
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside the AABB (max faces exclusive)
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max).all()
    }

    /// Slab intersection of a ray with this box.
    ///
    /// `direction` need not be normalized; distances are in units of its
    /// length. A zero component makes that axis unbounded while the origin
    /// lies within the slab and empty otherwise.
    pub fn slab(&self, origin: Vec3, direction: Vec3) -> SlabHit {
        let (near_x, far_x) = axis_interval(origin.x, direction.x, self.min.x, self.max.x);
        let (near_y, far_y) = axis_interval(origin.y, direction.y, self.min.y, self.max.y);
        let (near_z, far_z) = axis_interval(origin.z, direction.z, self.min.z, self.max.z);

        let t_min = near_x.max(near_y).max(near_z);
        let t_max = far_x.min(far_y).min(far_z);

        SlabHit {
            hit: t_max > t_min.max(0.0),
            t_min,
            t_max,
            entry_mask: BVec3::new(near_x == t_min, near_y == t_min, near_z == t_min),
        }
    }

    /// Ray-AABB intersection test, returns (t_near, t_far) or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let slab = self.slab(ray.origin, ray.direction);
        slab.hit.then_some((slab.t_min.max(0.0), slab.t_max))
    }
}

#[inline]
fn axis_interval(origin: f32, direction: f32, min: f32, max: f32) -> (f32, f32) {
    if direction == 0.0 {
        return if origin >= min && origin <= max {
            (f32::NEG_INFINITY, f32::INFINITY)
        } else {
            (f32::INFINITY, f32::NEG_INFINITY)
        };
    }
    let t_bottom = (min - origin) / direction;
    let t_top = (max - origin) / direction;
    (t_bottom.min(t_top), t_bottom.max(t_top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_at() {
        let ray = Ray::try_new(Vec3::ZERO, Vec3::X * 3.0).unwrap();
        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(5.0), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn degenerate_ray_is_rejected() {
        assert!(Ray::try_new(Vec3::ZERO, Vec3::ZERO).is_none());
        assert!(Ray::try_new(Vec3::ZERO, Vec3::new(f32::NAN, 1.0, 0.0)).is_none());
        assert!(Ray::try_new(Vec3::splat(f32::INFINITY), Vec3::X).is_none());
    }

    #[test]
    fn aabb_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(aabb.contains_point(Vec3::ZERO));
        assert!(!aabb.contains_point(Vec3::ONE));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.5, 0.5)));
    }

    #[test]
    fn slab_entry_from_outside() {
        let aabb = Aabb::from_extent(Vec3::splat(8.0));
        let slab = aabb.slab(Vec3::new(4.0, 4.0, -1.0), Vec3::Z);
        assert!(slab.hit);
        assert_relative_eq!(slab.t_min, 1.0);
        assert_relative_eq!(slab.t_max, 9.0);
        assert_eq!(slab.entry_mask, BVec3::new(false, false, true));
    }

    #[test]
    fn slab_origin_inside_has_negative_entry() {
        let aabb = Aabb::from_extent(Vec3::splat(8.0));
        let slab = aabb.slab(Vec3::splat(4.0), Vec3::NEG_X);
        assert!(slab.hit);
        assert!(slab.t_min < 0.0);
        assert_relative_eq!(slab.t_max, 4.0);
    }

    #[test]
    fn slab_miss_parallel_outside() {
        let aabb = Aabb::from_extent(Vec3::splat(8.0));
        // Parallel to the x slab but outside it.
        let slab = aabb.slab(Vec3::new(-1.0, 4.0, 4.0), Vec3::Z);
        assert!(!slab.hit);
    }

    #[test]
    fn slab_miss_pointing_away() {
        let aabb = Aabb::from_extent(Vec3::ONE);
        let slab = aabb.slab(Vec3::new(-1.0, 0.5, 0.5), Vec3::NEG_X);
        assert!(!slab.hit);
        let slab = aabb.slab(Vec3::new(-1.0, 2.0, 0.5), Vec3::X);
        assert!(!slab.hit);
    }

    #[test]
    fn slab_origin_on_boundary_plane_is_not_nan() {
        let aabb = Aabb::from_extent(Vec3::splat(8.0));
        // Origin exactly on the x = 0 plane, travelling parallel to it.
        let slab = aabb.slab(Vec3::new(0.0, 4.0, -1.0), Vec3::Z);
        assert!(slab.hit);
        assert!(!slab.t_min.is_nan());
        assert_relative_eq!(slab.t_min, 1.0);
    }

    #[test]
    fn aabb_ray_intersection() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);

        let ray = Ray::try_new(Vec3::new(-1.0, 0.5, 0.5), Vec3::X).unwrap();
        let (t_near, t_far) = aabb.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t_near, 1.0);
        assert_relative_eq!(t_far, 2.0);

        let ray = Ray::try_new(Vec3::new(-1.0, 2.0, 0.5), Vec3::X).unwrap();
        assert!(aabb.intersect_ray(&ray).is_none());
    }
}
