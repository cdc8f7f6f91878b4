//! Composite health score.
//!
//! Starts at 100 and subtracts one deduction per rule. Within a rule only
//! the highest tier that applies counts, and every rule reads the raw
//! metrics, so the order of evaluation does not matter.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::city::Building;

/// A tiered rule: among the `(threshold, penalty)` tiers whose threshold is
/// strictly exceeded, the one with the highest threshold applies. Tier
/// order in the list does not matter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deduction<T> {
    pub tiers: Vec<(T, u32)>,
}

impl<T: PartialOrd + Copy> Deduction<T> {
    pub fn new(tiers: &[(T, u32)]) -> Self {
        Self { tiers: tiers.to_vec() }
    }

    pub fn penalty(&self, value: T) -> u32 {
        self.tiers
            .iter()
            .filter(|(threshold, _)| value > *threshold)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
            .map(|&(_, penalty)| penalty)
            .unwrap_or(0)
    }

    /// Largest penalty any tier can take
    pub fn max_penalty(&self) -> u32 {
        self.tiers.iter().map(|&(_, penalty)| penalty).max().unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthRules {
    pub complexity: Deduction<u32>,
    pub churn: Deduction<u32>,
    pub decay: Deduction<f32>,
    pub dependencies_in: Deduction<u32>,
    pub hotspot_penalty: u32,
    /// Lower bound (inclusive) of the healthy grade
    pub healthy_min: u8,
    /// Lower bound (inclusive) of the fair grade
    pub fair_min: u8,
}

impl Default for HealthRules {
    fn default() -> Self {
        Self {
            complexity: Deduction::new(&[(25, 30), (15, 20), (10, 10)]),
            churn: Deduction::new(&[(15, 20), (8, 10)]),
            decay: Deduction::new(&[(0.8, 15), (0.5, 8)]),
            dependencies_in: Deduction::new(&[(20, 15), (10, 8)]),
            hotspot_penalty: 20,
            healthy_min: 80,
            fair_min: 50,
        }
    }
}

/// Legend bucket for a score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGrade {
    Healthy,
    Fair,
    Critical,
}

impl HealthGrade {
    pub fn from_score(score: u8, rules: &HealthRules) -> Self {
        if score >= rules.healthy_min {
            HealthGrade::Healthy
        } else if score >= rules.fair_min {
            HealthGrade::Fair
        } else {
            HealthGrade::Critical
        }
    }
}

/// Health score in [0, 100]
pub fn score(building: &Building, rules: &HealthRules) -> u8 {
    let m = &building.metrics;
    let total = [
        rules.complexity.penalty(m.complexity),
        rules.churn.penalty(m.churn),
        rules.decay.penalty(building.decay_level),
        rules.dependencies_in.penalty(m.dependencies_in),
        if building.is_hotspot { rules.hotspot_penalty } else { 0 },
    ]
    .into_iter()
    .fold(0u32, u32::saturating_add);
    100u32.saturating_sub(total).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{BuildingMetrics, Dimensions, GroundPosition};

    fn building(complexity: u32, churn: u32, decay: f32, deps_in: u32, hotspot: bool) -> Building {
        Building::new("a.py", GroundPosition::default(), Dimensions::default())
            .with_metrics(BuildingMetrics {
                complexity,
                churn,
                dependencies_in: deps_in,
                ..Default::default()
            })
            .with_decay(decay)
            .with_hotspot(hotspot)
    }

    fn s(complexity: u32, churn: u32, decay: f32, deps_in: u32, hotspot: bool) -> u8 {
        score(&building(complexity, churn, decay, deps_in, hotspot), &HealthRules::default())
    }

    #[test]
    fn test_worst_case_clamps_to_zero() {
        assert_eq!(s(30, 20, 0.9, 25, true), 0);
    }

    #[test]
    fn test_clean_building_is_perfect() {
        assert_eq!(s(0, 0, 0.0, 0, false), 100);
    }

    #[test]
    fn test_only_highest_tier_per_rule() {
        assert_eq!(s(30, 0, 0.0, 0, false), 70);
        assert_eq!(s(16, 0, 0.0, 0, false), 80);
        assert_eq!(s(11, 0, 0.0, 0, false), 90);
        assert_eq!(s(10, 0, 0.0, 0, false), 100);
    }

    #[test]
    fn test_each_rule() {
        assert_eq!(s(0, 16, 0.0, 0, false), 80);
        assert_eq!(s(0, 9, 0.0, 0, false), 90);
        assert_eq!(s(0, 0, 0.81, 0, false), 85);
        assert_eq!(s(0, 0, 0.6, 0, false), 92);
        assert_eq!(s(0, 0, 0.5, 0, false), 100);
        assert_eq!(s(0, 0, 0.0, 21, false), 85);
        assert_eq!(s(0, 0, 0.0, 11, false), 92);
        assert_eq!(s(0, 0, 0.0, 0, true), 80);
    }

    #[test]
    fn test_deductions_are_additive() {
        // -20 complexity, -10 churn, -8 decay, -8 deps
        assert_eq!(s(20, 10, 0.7, 15, false), 54);
    }

    #[test]
    fn test_score_always_in_range() {
        for complexity in [0, 11, 16, 26, 1000] {
            for churn in [0, 9, 16] {
                for decay in [0.0, 0.6, 0.9, 1.0] {
                    for deps in [0, 11, 21] {
                        for hotspot in [false, true] {
                            assert!(s(complexity, churn, decay, deps, hotspot) <= 100);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_grades() {
        let rules = HealthRules::default();
        assert_eq!(HealthGrade::from_score(100, &rules), HealthGrade::Healthy);
        assert_eq!(HealthGrade::from_score(80, &rules), HealthGrade::Healthy);
        assert_eq!(HealthGrade::from_score(79, &rules), HealthGrade::Fair);
        assert_eq!(HealthGrade::from_score(50, &rules), HealthGrade::Fair);
        assert_eq!(HealthGrade::from_score(49, &rules), HealthGrade::Critical);
    }

    #[test]
    fn test_rules_from_partial_json() {
        let rules: HealthRules = serde_json::from_str(r#"{"hotspot_penalty": 5}"#).unwrap();
        assert_eq!(rules.hotspot_penalty, 5);
        assert_eq!(rules.complexity, HealthRules::default().complexity);
    }

    #[test]
    fn test_tier_order_does_not_matter() {
        let rules = HealthRules {
            complexity: Deduction::new(&[(10, 10), (15, 20), (25, 30)]),
            ..Default::default()
        };
        assert_eq!(score(&building(30, 0, 0.0, 0, false), &rules), 70);
        assert_eq!(score(&building(16, 0, 0.0, 0, false), &rules), 80);
        assert_eq!(score(&building(11, 0, 0.0, 0, false), &rules), 90);
        assert_eq!(score(&building(10, 0, 0.0, 0, false), &rules), 100);
    }

    #[test]
    fn test_huge_penalties_saturate() {
        let rules = HealthRules {
            hotspot_penalty: u32::MAX,
            complexity: Deduction::new(&[(0, u32::MAX)]),
            ..Default::default()
        };
        assert_eq!(score(&building(30, 20, 0.9, 25, true), &rules), 0);
    }

    #[test]
    fn test_max_penalty() {
        let rules = HealthRules::default();
        assert_eq!(rules.complexity.max_penalty(), 30);
        assert_eq!(Deduction::<u32>::new(&[]).max_penalty(), 0);
    }
}
