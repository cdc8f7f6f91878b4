//! Scene configuration: every tunable threshold in one serde tree.
//!
//! All sections default individually, so a JSON file only needs the
//! values it overrides:
//!
//! ```json
//! { "render": { "instancing_threshold": 500 }, "lod": { "hysteresis": 10.0 } }
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{HealthRules, PatternRules};
use crate::core::error::Error;
use crate::core::types::Result;
use crate::generation::TierThresholds;
use crate::minimap::MinimapConfig;
use crate::render::{RenderConfig, RoadConfig};

use super::lod::LodConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub render: RenderConfig,
    pub lod: LodConfig,
    pub tiers: TierThresholds,
    pub patterns: PatternRules,
    pub health: HealthRules,
    pub minimap: MinimapConfig,
    pub roads: RoadConfig,
}

impl SceneConfig {
    /// Parse and validate
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        log::info!(
            "Loaded scene config from {}: instancing above {}, LOD {}/{} (floor {}, hysteresis {})",
            path.display(),
            config.render.instancing_threshold,
            config.lod.medium_distance,
            config.lod.low_distance,
            config.lod.activation_floor,
            config.lod.hysteresis,
        );
        Ok(config)
    }

    /// Reject combinations the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        let lod = &self.lod;
        if !(lod.medium_distance.is_finite() && lod.low_distance.is_finite()) {
            return Err(Error::Config("LOD distances must be finite".into()));
        }
        if lod.medium_distance > lod.low_distance {
            return Err(Error::Config(format!(
                "LOD medium distance {} exceeds low distance {}",
                lod.medium_distance, lod.low_distance
            )));
        }
        if lod.hysteresis.is_nan() || lod.hysteresis < 0.0 {
            return Err(Error::Config(format!("LOD hysteresis must be non-negative, got {}", lod.hysteresis)));
        }
        if self.minimap.size.is_nan() || self.minimap.size <= 0.0 {
            return Err(Error::Config(format!("minimap size must be positive, got {}", self.minimap.size)));
        }
        if self.minimap.min_point_size > self.minimap.max_point_size {
            return Err(Error::Config("minimap min point size exceeds max point size".into()));
        }
        let health = &self.health;
        let penalties = [
            ("complexity", health.complexity.max_penalty()),
            ("churn", health.churn.max_penalty()),
            ("decay", health.decay.max_penalty()),
            ("dependencies_in", health.dependencies_in.max_penalty()),
            ("hotspot", health.hotspot_penalty),
        ];
        if let Some((rule, penalty)) = penalties.iter().find(|(_, penalty)| *penalty > 100) {
            return Err(Error::Config(format!("health {} penalty {} exceeds 100", rule, penalty)));
        }
        if self.health.fair_min > self.health.healthy_min {
            return Err(Error::Config("health fair grade bound exceeds healthy bound".into()));
        }
        Ok(())
    }

    /// Hash of the sections that feed cached derived data (tiers, patterns,
    /// scores and render mode)
    pub fn derived_fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        serde_json::to_string(&(&self.render, &self.tiers, &self.patterns, &self.health))
            .unwrap_or_default()
            .hash(&mut hasher);
        hasher.finish()
    }
}
