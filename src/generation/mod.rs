//! Procedural building generation.
//!
//! The pipeline per building:
//! 1. Tier selection from metrics (`tier.rs`)
//! 2. Body color from language and decay (`palette.rs`)
//! 3. The tier's recipe composes primitive parts (`recipe.rs`)
//! 4. Parts are tessellated into vertex/index data (`mesh.rs`)

pub mod tier;
pub mod palette;
pub mod recipe;
pub mod mesh;

pub use tier::{select_tier, Tier, TierThresholds};
pub use recipe::{BuildingGeometry, Part, PartKind, RecipeInput, Shape};
pub use mesh::{MeshData, Vertex};

use crate::city::Building;

/// Select the tier for a building and run its recipe
pub fn generate_building(building: &Building, thresholds: &TierThresholds) -> BuildingGeometry {
    let tier = select_tier(&building.metrics, building.is_hotspot, thresholds);
    tier.build(&RecipeInput::from_building(building))
}
