//! District ground regions

use crate::city::{CitySnapshot, NormalizedLayout};
use crate::core::types::{Vec2, Vec3};
use crate::generation::palette;

/// Half-size of the fallback square for a district without a boundary
const FALLBACK_BASE: f32 = 30.0;
const FALLBACK_PER_BUILDING: f32 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct DistrictRegion {
    /// Index into the snapshot's districts
    pub district: usize,
    /// Closed polygon in the scene frame (last point connects to first)
    pub polygon: Vec<Vec2>,
    pub center: Vec2,
    pub color: Vec3,
}

/// Regions for all districts. A boundary with at least three points is
/// used as given (moved into the scene frame); otherwise a square sized by
/// building count is placed around the district center.
pub fn build_regions(snapshot: &CitySnapshot, layout: &NormalizedLayout) -> Vec<DistrictRegion> {
    snapshot
        .districts
        .iter()
        .zip(&layout.district_centers)
        .enumerate()
        .map(|(i, (district, &center))| {
            let polygon = if district.boundary.len() >= 3 {
                district.boundary.iter().map(|p| layout.to_scene(p.to_vec2())).collect()
            } else {
                let half = FALLBACK_BASE + FALLBACK_PER_BUILDING * district.building_count as f32;
                vec![
                    center + Vec2::new(-half, -half),
                    center + Vec2::new(half, -half),
                    center + Vec2::new(half, half),
                    center + Vec2::new(-half, half),
                ]
            };
            DistrictRegion {
                district: i,
                polygon,
                center,
                color: palette::district_color(&district.color),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{normalize, Building, Dimensions, District, GroundPosition, PlanePoint};

    fn city(districts: Vec<District>) -> CitySnapshot {
        CitySnapshot {
            buildings: vec![
                Building::new("a", GroundPosition::new(10.0, 10.0), Dimensions::default()),
                Building::new("b", GroundPosition::new(30.0, 10.0), Dimensions::default()),
            ],
            districts,
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_square() {
        let snapshot = city(vec![District::new("d", "#ff0000", PlanePoint::new(20.0, 10.0), 5)]);
        let regions = build_regions(&snapshot, &normalize(&snapshot));
        let region = &regions[0];
        assert_eq!(region.center, Vec2::ZERO);
        assert_eq!(region.polygon.len(), 4);
        assert_eq!(region.polygon[2], Vec2::new(40.0, 40.0));
        assert_eq!(region.color, Vec3::X);
    }

    #[test]
    fn test_boundary_translated_to_scene() {
        let mut district = District::new("d", "bogus", PlanePoint::new(20.0, 10.0), 2);
        district.boundary = vec![
            PlanePoint::new(0.0, 0.0),
            PlanePoint::new(40.0, 0.0),
            PlanePoint::new(40.0, 20.0),
        ];
        let snapshot = city(vec![district]);
        let regions = build_regions(&snapshot, &normalize(&snapshot));
        assert_eq!(regions[0].polygon, vec![Vec2::new(-20.0, -10.0), Vec2::new(20.0, -10.0), Vec2::new(20.0, 10.0)]);
        assert_eq!(regions[0].color, palette::NEUTRAL_GREY);
    }

    #[test]
    fn test_short_boundary_falls_back() {
        let mut district = District::new("d", "#00f", PlanePoint::new(20.0, 10.0), 0);
        district.boundary = vec![PlanePoint::new(0.0, 0.0), PlanePoint::new(1.0, 1.0)];
        let snapshot = city(vec![district]);
        let regions = build_regions(&snapshot, &normalize(&snapshot));
        assert_eq!(regions[0].polygon[2], Vec2::new(30.0, 30.0));
    }

    #[test]
    fn test_no_districts() {
        let snapshot = CitySnapshot::empty();
        assert!(build_regions(&snapshot, &normalize(&snapshot)).is_empty());
    }
}
