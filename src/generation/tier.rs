//! Geometry tier selection.
//!
//! A building's tier is a pure function of its size metrics and hotspot
//! flag. Each tier is also the recipe that builds its geometry (see
//! `recipe.rs`), so the decision is made exactly once.

use serde::{Deserialize, Serialize};

use crate::city::BuildingMetrics;

/// Visual size class, ordered from smallest to largest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Tier {
    Shop = 1,
    Apartment = 2,
    OfficeTower = 3,
    Skyscraper = 4,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Shop, Tier::Apartment, Tier::OfficeTower, Tier::Skyscraper];

    /// Numeric tier in 1..=4
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Tier::Shop),
            2 => Some(Tier::Apartment),
            3 => Some(Tier::OfficeTower),
            4 => Some(Tier::Skyscraper),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Shop => "shop",
            Tier::Apartment => "apartment",
            Tier::OfficeTower => "office_tower",
            Tier::Skyscraper => "skyscraper",
        }
    }
}

/// Strict lower bounds for each tier. A building reaches a tier when
/// either its `loc` or its `complexity` exceeds that tier's bound.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub skyscraper_loc: u32,
    pub skyscraper_complexity: u32,
    pub office_loc: u32,
    pub office_complexity: u32,
    pub apartment_loc: u32,
    pub apartment_complexity: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            skyscraper_loc: 500,
            skyscraper_complexity: 20,
            office_loc: 200,
            office_complexity: 12,
            apartment_loc: 80,
            apartment_complexity: 6,
        }
    }
}

/// Pick the tier for a building. Hotspots are always skyscrapers.
pub fn select_tier(metrics: &BuildingMetrics, is_hotspot: bool, thresholds: &TierThresholds) -> Tier {
    let exceeds = |loc: u32, complexity: u32| metrics.loc > loc || metrics.complexity > complexity;

    if is_hotspot || exceeds(thresholds.skyscraper_loc, thresholds.skyscraper_complexity) {
        Tier::Skyscraper
    } else if exceeds(thresholds.office_loc, thresholds.office_complexity) {
        Tier::OfficeTower
    } else if exceeds(thresholds.apartment_loc, thresholds.apartment_complexity) {
        Tier::Apartment
    } else {
        Tier::Shop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(loc: u32, complexity: u32) -> BuildingMetrics {
        BuildingMetrics { loc, complexity, ..Default::default() }
    }

    fn tier(loc: u32, complexity: u32, hotspot: bool) -> Tier {
        select_tier(&metrics(loc, complexity), hotspot, &TierThresholds::default())
    }

    #[test]
    fn test_tier_boundaries_are_strict() {
        assert_eq!(tier(500, 0, false), Tier::OfficeTower);
        assert_eq!(tier(501, 0, false), Tier::Skyscraper);
        assert_eq!(tier(0, 20, false), Tier::OfficeTower);
        assert_eq!(tier(0, 21, false), Tier::Skyscraper);
        assert_eq!(tier(200, 0, false), Tier::Apartment);
        assert_eq!(tier(201, 0, false), Tier::OfficeTower);
        assert_eq!(tier(0, 13, false), Tier::OfficeTower);
        assert_eq!(tier(80, 6, false), Tier::Shop);
        assert_eq!(tier(81, 0, false), Tier::Apartment);
        assert_eq!(tier(0, 7, false), Tier::Apartment);
    }

    #[test]
    fn test_hotspot_forces_skyscraper() {
        assert_eq!(tier(0, 0, true), Tier::Skyscraper);
        assert_eq!(tier(10, 1, true), Tier::Skyscraper);
    }

    #[test]
    fn test_zero_metrics_is_shop() {
        assert_eq!(tier(0, 0, false), Tier::Shop);
    }

    #[test]
    fn test_tier_range() {
        for loc in (0..1000).step_by(37) {
            for complexity in 0..30 {
                for hotspot in [false, true] {
                    let t = tier(loc, complexity, hotspot);
                    assert!((1..=4).contains(&t.level()));
                    if hotspot {
                        assert_eq!(t, Tier::Skyscraper);
                    }
                }
            }
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = TierThresholds { skyscraper_loc: 100, ..Default::default() };
        assert_eq!(select_tier(&metrics(150, 0), false, &thresholds), Tier::Skyscraper);
    }

    #[test]
    fn test_level_roundtrip() {
        for t in Tier::ALL {
            assert_eq!(Tier::from_level(t.level()), Some(t));
        }
        assert_eq!(Tier::from_level(0), None);
        assert_eq!(Tier::from_level(5), None);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Shop < Tier::Apartment);
        assert!(Tier::OfficeTower < Tier::Skyscraper);
    }
}
