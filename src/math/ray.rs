//! Ray type for pointer picking

use crate::core::types::Vec3;
use super::aabb::Aabb;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-AABB intersection using slab method
    /// Returns Some((t_near, t_far)) if intersection, None otherwise
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        let t1 = (aabb.min - self.origin) * self.inv_direction;
        let t2 = (aabb.max - self.origin) * self.inv_direction;

        let t_min = t1.min(t2);
        let t_max = t1.max(t2);

        let t_near = t_min.x.max(t_min.y).max(t_min.z);
        let t_far = t_max.x.min(t_max.y).min(t_max.z);

        if t_near <= t_far && t_far >= 0.0 {
            Some((t_near.max(0.0), t_far))
        } else {
            None
        }
    }

    /// Where the ray crosses the horizontal plane at height `y`.
    /// `None` for rays parallel to or pointing away from the plane.
    pub fn intersect_plane_y(&self, y: f32) -> Option<Vec3> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (y - self.origin.y) / self.direction.y;
        (t >= 0.0).then(|| self.at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.at(5.0), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_hits_building_box_from_above() {
        let ray = Ray::new(Vec3::new(0.5, 50.0, 0.5), Vec3::NEG_Y);
        let building = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        let (t_near, t_far) = ray.intersects_aabb(&building).unwrap();
        assert!((t_near - 40.0).abs() < 1e-3);
        assert!((t_far - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_misses_box_beside_ray() {
        let ray = Ray::new(Vec3::new(5.0, 50.0, 0.5), Vec3::NEG_Y);
        let building = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert!(ray.intersects_aabb(&building).is_none());
    }

    #[test]
    fn test_intersect_ground_plane() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, -1.0, 0.0).normalize());
        let hit = ray.intersect_plane_y(0.0).unwrap();
        assert!((hit - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);

        let upward = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(upward.intersect_plane_y(0.0).is_none());

        let flat = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::X);
        assert!(flat.intersect_plane_y(0.0).is_none());
    }
}
