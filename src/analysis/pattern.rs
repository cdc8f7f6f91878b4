//! Design-smell classification.
//!
//! Rules are evaluated in a fixed priority order and the first match wins,
//! so a building carries at most one pattern. Thresholds come from
//! `PatternRules` so they can be tuned without touching the rule order.

use serde::{Deserialize, Serialize};

use crate::city::BuildingMetrics;

/// Display severity. Consumers use it for legends and sorting; the
/// classifier itself never looks at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignPattern {
    GodClass,
    DataClass,
    LazyClass,
    BrainClass,
    Blob,
}

impl DesignPattern {
    /// Priority order used by `classify`
    pub const PRIORITY: [DesignPattern; 5] = [
        DesignPattern::GodClass,
        DesignPattern::DataClass,
        DesignPattern::LazyClass,
        DesignPattern::BrainClass,
        DesignPattern::Blob,
    ];

    pub fn severity(self) -> Severity {
        match self {
            DesignPattern::GodClass | DesignPattern::BrainClass => Severity::Critical,
            DesignPattern::DataClass | DesignPattern::Blob => Severity::Warning,
            DesignPattern::LazyClass => Severity::Info,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DesignPattern::GodClass => "god_class",
            DesignPattern::DataClass => "data_class",
            DesignPattern::LazyClass => "lazy_class",
            DesignPattern::BrainClass => "brain_class",
            DesignPattern::Blob => "blob",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DesignPattern::GodClass => "Too large and complex; does too much",
            DesignPattern::DataClass => "Mostly data with little behavior, heavily depended on",
            DesignPattern::LazyClass => "Too small to justify its existence",
            DesignPattern::BrainClass => "Centralizes too much logic",
            DesignPattern::Blob => "Very large file that should be split",
        }
    }

    /// Whether this pattern's rule holds. Rules are independent; priority
    /// is applied by `classify`.
    fn matches(self, metrics: &BuildingMetrics, is_hotspot: bool, rules: &PatternRules) -> bool {
        match self {
            DesignPattern::GodClass => {
                (metrics.loc > rules.god_class_loc && metrics.complexity > rules.god_class_complexity)
                    || is_hotspot
            }
            DesignPattern::DataClass => {
                metrics.dependencies_in > rules.data_class_dependencies_in
                    && metrics.complexity < rules.data_class_max_complexity
            }
            DesignPattern::LazyClass => {
                metrics.loc < rules.lazy_class_loc
                    && metrics.complexity < rules.lazy_class_max_complexity
                    && !is_hotspot
            }
            DesignPattern::BrainClass => metrics.complexity > rules.brain_class_complexity,
            DesignPattern::Blob => metrics.loc > rules.blob_loc,
        }
    }
}

/// Classification result with its severity attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: DesignPattern,
    pub severity: Severity,
}

/// Classifier thresholds. Comparisons are strict except where the field
/// name says `max`, which is an exclusive upper bound.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternRules {
    pub god_class_loc: u32,
    pub god_class_complexity: u32,
    pub data_class_dependencies_in: u32,
    pub data_class_max_complexity: u32,
    pub lazy_class_loc: u32,
    pub lazy_class_max_complexity: u32,
    pub brain_class_complexity: u32,
    pub blob_loc: u32,
}

impl Default for PatternRules {
    fn default() -> Self {
        Self {
            god_class_loc: 400,
            god_class_complexity: 20,
            data_class_dependencies_in: 10,
            data_class_max_complexity: 3,
            lazy_class_loc: 50,
            lazy_class_max_complexity: 3,
            brain_class_complexity: 25,
            blob_loc: 800,
        }
    }
}

/// First matching pattern in priority order, if any
pub fn classify(metrics: &BuildingMetrics, is_hotspot: bool, rules: &PatternRules) -> Option<PatternMatch> {
    DesignPattern::PRIORITY
        .into_iter()
        .find(|p| p.matches(metrics, is_hotspot, rules))
        .map(|pattern| PatternMatch { pattern, severity: pattern.severity() })
}
