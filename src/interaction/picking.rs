//! Ray picking against building bounds

use crate::city::{Building, NormalizedLayout};
use crate::core::types::{Vec2, Vec3};
use crate::math::{Aabb, Ray};

/// World-space bounds of a building placed at its normalized position
pub fn building_bounds(building: &Building, ground: Vec2) -> Aabb {
    let d = building.dimensions;
    Aabb::new(
        Vec3::new(ground.x - d.width * 0.5, 0.0, ground.y - d.depth * 0.5),
        Vec3::new(ground.x + d.width * 0.5, d.height, ground.y + d.depth * 0.5),
    )
}

/// Index of the nearest building hit by `ray`
pub fn pick_building(ray: &Ray, buildings: &[Building], layout: &NormalizedLayout) -> Option<usize> {
    buildings
        .iter()
        .enumerate()
        .filter_map(|(i, b)| {
            let ground = layout.building(i)?;
            let (t_near, _) = ray.intersects_aabb(&building_bounds(b, ground))?;
            Some((i, t_near))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
