//! Choice between per-building meshes and one instanced draw

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One tiered mesh per building, with full ornamentation
    Discrete,
    /// One draw of a unit cube with per-instance transform and color.
    /// Windows, spires and other ornaments are omitted.
    Instanced,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Entity counts above this switch to instanced rendering
    pub instancing_threshold: usize,
    /// Extra ground beyond the outermost building
    pub ground_margin: f32,
    /// Smallest ground half-size, used for empty and tiny cities
    pub min_ground_half_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            instancing_threshold: 200,
            ground_margin: 60.0,
            min_ground_half_size: 100.0,
        }
    }
}

/// Mode for a snapshot with `entity_count` buildings. Fixed for the
/// lifetime of the snapshot.
pub fn select_render_mode(entity_count: usize, config: &RenderConfig) -> RenderMode {
    if entity_count > config.instancing_threshold {
        RenderMode::Instanced
    } else {
        RenderMode::Discrete
    }
}
