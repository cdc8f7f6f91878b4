//! What the renderer draws this frame.
//!
//! A `SceneFrame` borrows the manager's retained geometry; building it is
//! cheap and happens once per frame after the LOD step.

use crate::city::NormalizedLayout;
use crate::core::types::Vec3;
use crate::render::{DistrictRegion, DrawList, InstanceBatch, RenderConfig, RenderMode, RoadPath};

use super::lod::LodSettings;

/// Square ground plane centered on the origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPlane {
    pub half_size: f32,
}

impl GroundPlane {
    /// Covers every building plus a margin; empty cities get the minimum
    pub fn for_layout(layout: &NormalizedLayout, config: &RenderConfig) -> Self {
        let half_size = (layout.radius() + config.ground_margin).max(config.min_ground_half_size);
        Self { half_size }
    }
}

/// Building geometry in whichever form the render mode calls for
#[derive(Clone, Copy, Debug)]
pub enum BuildingsFrame<'a> {
    Discrete(&'a DrawList),
    Instanced(&'a InstanceBatch),
}

impl BuildingsFrame<'_> {
    pub fn mode(&self) -> RenderMode {
        match self {
            Self::Discrete(_) => RenderMode::Discrete,
            Self::Instanced(_) => RenderMode::Instanced,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Discrete(list) => list.len(),
            Self::Instanced(batch) => batch.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current (highlighted) body color of a building, by snapshot index
    pub fn color_of(&self, building: usize) -> Option<Vec3> {
        match self {
            Self::Discrete(list) => list
                .items
                .iter()
                .find(|item| item.building == building)
                .map(|item| item.color),
            Self::Instanced(batch) => batch
                .buildings
                .iter()
                .position(|&b| b == building)
                .map(|slot| batch.colors[slot].rgb()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneFrame<'a> {
    pub buildings: BuildingsFrame<'a>,
    /// Empty when the LOD level hides districts
    pub districts: &'a [DistrictRegion],
    /// Empty when the LOD level hides roads
    pub roads: &'a [RoadPath],
    pub ground: GroundPlane,
    pub lod: LodSettings,
}

impl SceneFrame<'_> {
    pub fn mode(&self) -> RenderMode {
        self.buildings.mode()
    }

    pub fn visible_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn color_of(&self, building: usize) -> Option<Vec3> {
        self.buildings.color_of(building)
    }

    /// Only the ground plane
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.districts.is_empty() && self.roads.is_empty()
    }
}
