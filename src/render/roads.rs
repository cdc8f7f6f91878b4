//! Road paths between buildings.
//!
//! Intra-district roads run straight along the ground. Cross-district
//! roads arc over the city so long dependencies read as bridges.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::city::{CitySnapshot, NormalizedLayout};
use crate::core::types::{Vec2, Vec3};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Height of intra-district roads
    pub ground_height: f32,
    /// Height of cross-district arcs at their endpoints
    pub arc_end_height: f32,
    /// Height of cross-district arcs at their midpoint
    pub arc_peak_height: f32,
    /// Points per arc, endpoints included
    pub arc_points: usize,
    pub base_width: f32,
    pub width_per_weight: f32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            ground_height: 0.5,
            arc_end_height: 2.0,
            arc_peak_height: 15.0,
            arc_points: 9,
            base_width: 0.3,
            width_per_weight: 0.4,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoadPath {
    /// Index into the snapshot's roads
    pub road: usize,
    pub source: usize,
    pub target: usize,
    pub points: Vec<Vec3>,
    pub width: f32,
    pub is_cross_district: bool,
    /// Touches the selected building
    pub highlighted: bool,
}

/// Resolved roads plus how many were dropped
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoadNetwork {
    pub paths: Vec<RoadPath>,
    pub skipped: usize,
}

impl RoadNetwork {
    /// Resolve every road against the id index. Roads with an unknown
    /// endpoint are skipped and counted.
    pub fn build(
        snapshot: &CitySnapshot,
        index: &HashMap<String, usize>,
        layout: &NormalizedLayout,
        config: &RoadConfig,
    ) -> Self {
        let mut network = Self::default();
        for (i, road) in snapshot.roads.iter().enumerate() {
            let (Some(&source), Some(&target)) = (index.get(&road.source), index.get(&road.target)) else {
                network.skipped += 1;
                continue;
            };
            let (Some(a), Some(b)) = (layout.building(source), layout.building(target)) else {
                network.skipped += 1;
                continue;
            };
            let points = if road.is_cross_district {
                arc(a, b, config)
            } else {
                vec![
                    Vec3::new(a.x, config.ground_height, a.y),
                    Vec3::new(b.x, config.ground_height, b.y),
                ]
            };
            network.paths.push(RoadPath {
                road: i,
                source,
                target,
                points,
                width: config.base_width + config.width_per_weight * road.weight,
                is_cross_district: road.is_cross_district,
                highlighted: false,
            });
        }

        if network.skipped > 0 {
            log::debug!(
                "Skipped {} of {} roads with unresolved endpoints",
                network.skipped,
                snapshot.roads.len()
            );
        }
        network
    }

    /// Flag roads touching `selected` (a building index)
    pub fn set_selection(&mut self, selected: Option<usize>) {
        for path in &mut self.paths {
            path.highlighted = selected.is_some_and(|s| path.source == s || path.target == s);
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Parabolic lift between `a` and `b`: end height at both ends, peak
/// height at the midpoint
fn arc(a: Vec2, b: Vec2, config: &RoadConfig) -> Vec<Vec3> {
    let n = config.arc_points.max(3);
    (0..n)
        .map(|k| {
            let t = k as f32 / (n - 1) as f32;
            let p = a.lerp(b, t);
            let lift = 4.0 * t * (1.0 - t);
            let y = config.arc_end_height + (config.arc_peak_height - config.arc_end_height) * lift;
            Vec3::new(p.x, y, p.y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{demo_city, normalize, Building, Dimensions, GroundPosition, Road};

    fn city_with_roads(roads: Vec<Road>) -> CitySnapshot {
        CitySnapshot {
            buildings: vec![
                Building::new("a", GroundPosition::new(0.0, 0.0), Dimensions::default()),
                Building::new("b", GroundPosition::new(20.0, 0.0), Dimensions::default()),
            ],
            roads,
            ..Default::default()
        }
    }

    #[test]
    fn test_unresolved_roads_skipped() {
        let city = city_with_roads(vec![
            Road::new("a", "b"),
            Road::new("a", "missing"),
            Road::new("gone", "b"),
        ]);
        let network = RoadNetwork::build(&city, &city.index_by_id(), &normalize(&city), &RoadConfig::default());
        assert_eq!(network.len(), 1);
        assert_eq!(network.skipped, 2);
    }

    #[test]
    fn test_intra_district_road_is_flat() {
        let city = city_with_roads(vec![Road::new("a", "b")]);
        let network = RoadNetwork::build(&city, &city.index_by_id(), &normalize(&city), &RoadConfig::default());
        let path = &network.paths[0];
        assert_eq!(path.points.len(), 2);
        assert!(path.points.iter().all(|p| p.y == 0.5));
        assert_eq!(path.points[0], Vec3::new(-10.0, 0.5, 0.0));
    }

    #[test]
    fn test_cross_district_arc_heights() {
        let city = city_with_roads(vec![Road::new("a", "b").cross_district(true)]);
        let network = RoadNetwork::build(&city, &city.index_by_id(), &normalize(&city), &RoadConfig::default());
        let points = &network.paths[0].points;
        assert_eq!(points.len(), 9);
        assert!((points[0].y - 2.0).abs() < 1e-5);
        assert!((points[8].y - 2.0).abs() < 1e-5);
        assert!((points[4].y - 15.0).abs() < 1e-5);
        assert!((points[4].x - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_width_scales_with_weight() {
        let city = city_with_roads(vec![Road::new("a", "b"), Road::new("b", "a").with_weight(3.0)]);
        let network = RoadNetwork::build(&city, &city.index_by_id(), &normalize(&city), &RoadConfig::default());
        assert!(network.paths[1].width > network.paths[0].width);
    }

    #[test]
    fn test_selection_highlights_touching_roads() {
        let city = demo_city();
        let index = city.index_by_id();
        let mut network = RoadNetwork::build(&city, &index, &normalize(&city), &RoadConfig::default());
        assert_eq!(network.len(), 23);

        network.set_selection(Some(index["utils/helpers.py"]));
        let highlighted = network.paths.iter().filter(|p| p.highlighted).count();
        assert_eq!(highlighted, 7);

        network.set_selection(None);
        assert!(network.paths.iter().all(|p| !p.highlighted));
    }
}
