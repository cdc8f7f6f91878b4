//! Top-down projection of the normalized layout onto a square 2D surface.
//!
//! The padded bounding box of all building positions is mapped with one
//! uniform scale onto a `size x size` surface, centered. World `x` maps to
//! minimap `x` and world `z` to minimap `y`.

use serde::{Deserialize, Serialize};

use crate::city::{CitySnapshot, NormalizedLayout};
use crate::core::camera::Camera;
use crate::core::types::{Vec2, Vec3};
use crate::generation::palette;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Side length of the minimap surface
    pub size: f32,
    /// World units added around the building bounds
    pub padding: f32,
    /// Maximum click distance (surface units) for a hit
    pub hit_radius: f32,
    pub point_size_per_height: f32,
    pub min_point_size: f32,
    pub max_point_size: f32,
    pub district_base_radius: f32,
    pub district_radius_per_building: f32,
    pub max_district_radius: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            size: 150.0,
            padding: 20.0,
            hit_radius: 8.0,
            point_size_per_height: 0.15,
            min_point_size: 2.0,
            max_point_size: 6.0,
            district_base_radius: 6.0,
            district_radius_per_building: 1.5,
            max_district_radius: 30.0,
        }
    }
}

impl MinimapConfig {
    /// Dot size for a building of the given height
    pub fn point_size(&self, height: f32) -> f32 {
        (height * self.point_size_per_height).clamp(self.min_point_size, self.max_point_size)
    }

    /// Circle radius for a district with `building_count` buildings
    pub fn district_radius(&self, building_count: u32) -> f32 {
        (self.district_base_radius + self.district_radius_per_building * building_count as f32)
            .min(self.max_district_radius)
    }
}

/// Uniform world-to-minimap mapping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapProjection {
    /// World point mapped to the surface center
    pub world_center: Vec2,
    /// Surface units per world unit
    pub scale: f32,
    pub size: f32,
}

impl MinimapProjection {
    /// Fit `layout` (padded) onto the configured surface
    pub fn fit(layout: &NormalizedLayout, config: &MinimapConfig) -> Self {
        let size = config.size.max(0.0);
        let Some(bounds) = layout.bounds else {
            return Self { world_center: Vec2::ZERO, scale: 1.0, size };
        };
        let padded = bounds.padded(config.padding.max(0.0));
        let extent = padded.size().max_element();
        let scale = if extent > f32::EPSILON { size / extent } else { 1.0 };
        Self { world_center: padded.center(), scale, size }
    }

    pub fn to_minimap(&self, world: Vec2) -> Vec2 {
        (world - self.world_center) * self.scale + Vec2::splat(self.size * 0.5)
    }

    pub fn to_world(&self, minimap: Vec2) -> Vec2 {
        (minimap - Vec2::splat(self.size * 0.5)) / self.scale + self.world_center
    }

    /// Where the camera sits on the minimap
    pub fn camera_marker(&self, camera: &Camera) -> Vec2 {
        self.to_minimap(camera.ground_position())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapPoint {
    /// Index into the snapshot's buildings
    pub building: usize,
    pub position: Vec2,
    pub size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapDistrict {
    /// Index into the snapshot's districts
    pub district: usize,
    pub center: Vec2,
    pub radius: f32,
    pub color: Vec3,
}

/// Projected minimap contents
#[derive(Clone, Debug, PartialEq)]
pub struct Minimap {
    pub projection: MinimapProjection,
    pub points: Vec<MinimapPoint>,
    pub districts: Vec<MinimapDistrict>,
    hit_radius: f32,
}

impl Minimap {
    pub fn project(snapshot: &CitySnapshot, layout: &NormalizedLayout, config: &MinimapConfig) -> Self {
        let projection = MinimapProjection::fit(layout, config);

        let points = snapshot
            .buildings
            .iter()
            .zip(&layout.buildings)
            .enumerate()
            .map(|(i, (b, &p))| MinimapPoint {
                building: i,
                position: projection.to_minimap(p),
                size: config.point_size(b.dimensions.height),
            })
            .collect();

        let districts = snapshot
            .districts
            .iter()
            .zip(&layout.district_centers)
            .enumerate()
            .map(|(i, (d, &c))| MinimapDistrict {
                district: i,
                center: projection.to_minimap(c),
                radius: config.district_radius(d.building_count),
                color: palette::district_color(&d.color),
            })
            .collect();

        Self { projection, points, districts, hit_radius: config.hit_radius }
    }

    /// Building whose point is closest to `click`, if within the hit radius
    pub fn hit_test(&self, click: Vec2) -> Option<usize> {
        self.points
            .iter()
            .map(|p| (p.building, p.position.distance(click)))
            .filter(|&(_, d)| d <= self.hit_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{demo_city, normalize, Building, Dimensions, GroundPosition};

    fn vec2_approx_eq(a: Vec2, b: Vec2, eps: f32) -> bool {
        (a - b).abs().max_element() < eps
    }

    fn two_buildings() -> CitySnapshot {
        CitySnapshot {
            buildings: vec![
                Building::new("a", GroundPosition::new(0.0, 0.0), Dimensions::new(3.0, 4.0, 3.0)),
                Building::new("b", GroundPosition::new(100.0, 0.0), Dimensions::new(3.0, 100.0, 3.0)),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_fits_inside_surface() {
        let city = demo_city();
        let layout = normalize(&city);
        let config = MinimapConfig::default();
        let minimap = Minimap::project(&city, &layout, &config);
        assert_eq!(minimap.points.len(), city.buildings.len());
        for p in &minimap.points {
            assert!(p.position.min_element() >= 0.0);
            assert!(p.position.max_element() <= config.size);
        }
    }

    #[test]
    fn test_padding_keeps_points_off_edge() {
        let city = two_buildings();
        let layout = normalize(&city);
        let minimap = Minimap::project(&city, &layout, &MinimapConfig::default());
        // 100 wide + 2 x 20 padding onto 150 units
        let scale = 150.0 / 140.0;
        assert!((minimap.projection.scale - scale).abs() < 1e-4);
        assert!((minimap.points[0].position.x - 20.0 * scale).abs() < 1e-3);
        assert!((minimap.points[1].position.x - 120.0 * scale).abs() < 1e-3);
    }

    #[test]
    fn test_round_trip_between_spaces() {
        let city = demo_city();
        let layout = normalize(&city);
        let projection = MinimapProjection::fit(&layout, &MinimapConfig::default());
        let world = Vec2::new(12.5, -40.0);
        assert!(vec2_approx_eq(projection.to_world(projection.to_minimap(world)), world, 1e-3));
    }

    #[test]
    fn test_point_size_clamped() {
        let city = two_buildings();
        let layout = normalize(&city);
        let minimap = Minimap::project(&city, &layout, &MinimapConfig::default());
        assert_eq!(minimap.points[0].size, 2.0);
        assert_eq!(minimap.points[1].size, 6.0);
    }

    #[test]
    fn test_hit_exactly_on_point() {
        let city = demo_city();
        let layout = normalize(&city);
        let minimap = Minimap::project(&city, &layout, &MinimapConfig::default());
        for p in &minimap.points {
            let hit = minimap.hit_test(p.position).unwrap();
            // Coincident points can shadow each other; the hit must be at zero distance
            assert!(minimap.points[hit].position.distance(p.position) < 1e-6);
        }
    }

    #[test]
    fn test_miss_far_away() {
        let city = two_buildings();
        let layout = normalize(&city);
        let minimap = Minimap::project(&city, &layout, &MinimapConfig::default());
        assert_eq!(minimap.hit_test(Vec2::new(75.0, 140.0)), None);
        assert_eq!(minimap.hit_test(Vec2::new(-500.0, -500.0)), None);
    }

    #[test]
    fn test_hit_prefers_closest() {
        let city = two_buildings();
        let layout = normalize(&city);
        let config = MinimapConfig { hit_radius: 1000.0, ..Default::default() };
        let minimap = Minimap::project(&city, &layout, &config);
        let near_b = minimap.points[1].position - Vec2::new(3.0, 0.0);
        assert_eq!(minimap.hit_test(near_b), Some(1));
    }

    #[test]
    fn test_empty_snapshot() {
        let city = CitySnapshot::empty();
        let layout = normalize(&city);
        let minimap = Minimap::project(&city, &layout, &MinimapConfig::default());
        assert!(minimap.points.is_empty());
        assert_eq!(minimap.hit_test(Vec2::splat(75.0)), None);
        assert_eq!(minimap.projection.to_minimap(Vec2::ZERO), Vec2::splat(75.0));
    }

    #[test]
    fn test_single_building_without_padding() {
        let city = CitySnapshot {
            buildings: vec![Building::new("solo", GroundPosition::new(5.0, 5.0), Dimensions::default())],
            ..Default::default()
        };
        let layout = normalize(&city);
        let config = MinimapConfig { padding: 0.0, ..Default::default() };
        let minimap = Minimap::project(&city, &layout, &config);
        assert!(minimap.projection.scale.is_finite());
        assert!(vec2_approx_eq(minimap.points[0].position, Vec2::splat(75.0), 1e-4));
        assert_eq!(minimap.hit_test(Vec2::splat(75.0)), Some(0));
    }

    #[test]
    fn test_districts_projected() {
        let city = demo_city();
        let layout = normalize(&city);
        let config = MinimapConfig::default();
        let minimap = Minimap::project(&city, &layout, &config);
        assert_eq!(minimap.districts.len(), 5);
        for d in &minimap.districts {
            assert!(d.radius >= config.district_base_radius);
            assert!(d.radius <= config.max_district_radius);
        }
    }

    #[test]
    fn test_camera_marker_at_center_for_origin_camera() {
        let city = demo_city();
        let layout = normalize(&city);
        let projection = MinimapProjection::fit(&layout, &MinimapConfig::default());
        let camera = Camera::look_at(Vec3::new(0.0, 200.0, 0.01), Vec3::ZERO, Vec3::Y);
        let marker = projection.camera_marker(&camera);
        let expected = projection.to_minimap(Vec2::new(0.0, 0.01));
        assert!(vec2_approx_eq(marker, expected, 1e-4));
    }
}
