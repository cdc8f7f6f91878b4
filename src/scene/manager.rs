//! Scene manager: the single owned state of a code city view.
//!
//! Holds the current snapshot and its id index, the derived-data cache, the
//! retained render geometry, interaction and LOD state, and the queue of
//! events for the surrounding UI. Everything runs on the frame thread;
//! input events and snapshot replacement are the only writers.

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

use crate::analysis::{DesignPattern, HealthGrade, Severity};
use crate::city::CitySnapshot;
use crate::core::camera::Camera;
use crate::core::types::{Result, Vec2};
use crate::generation::Tier;
use crate::interaction::{pick_building, InteractionState};
use crate::minimap::Minimap;
use crate::render::{
    build_regions, select_render_mode, DistrictRegion, DrawList, InstanceBatch, RecipeLibrary,
    RenderMode, RoadNetwork,
};

use super::cache::{DerivedCache, DerivedData, DerivedKey};
use super::config::SceneConfig;
use super::frame::{BuildingsFrame, GroundPlane, SceneFrame};
use super::lod::{LodLevel, LodSettings, LodState};

/// Notifications for the surrounding UI, drained once per frame
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    /// Hovered building changed; `None` when the pointer left it
    Hover(Option<String>),
    /// Selected building changed; `None` when the selection was cleared
    Select(Option<String>),
    SnapshotReplaced { buildings: usize, mode: RenderMode },
    LodChanged { from: LodLevel, to: LodLevel },
}

/// Read-only derived fields of one building, for panels and legends
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildingView {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub pattern: Option<DesignPattern>,
    pub severity: Option<Severity>,
    pub health_score: u8,
    pub health_grade: HealthGrade,
    pub is_hotspot: bool,
    pub decay_level: f32,
    pub is_selected: bool,
    pub is_hovered: bool,
    pub is_connected: bool,
}

enum BuildingsGeometry {
    Discrete(DrawList),
    Instanced(InstanceBatch),
}

/// Render data retained between frames, rebuilt after a snapshot or
/// config change
struct SceneGeometry {
    buildings: BuildingsGeometry,
    roads: RoadNetwork,
    districts: Vec<DistrictRegion>,
    minimap: Minimap,
    ground: GroundPlane,
}

impl SceneGeometry {
    fn build(
        snapshot: &CitySnapshot,
        index: &HashMap<String, usize>,
        config: &SceneConfig,
        derived: &DerivedData,
        recipes: &mut RecipeLibrary,
    ) -> Self {
        let start = Instant::now();
        let buildings = match derived.render_mode {
            RenderMode::Discrete => BuildingsGeometry::Discrete(DrawList::new(
                &snapshot.buildings,
                &derived.tiers,
                &derived.layout,
                recipes,
            )),
            RenderMode::Instanced => {
                BuildingsGeometry::Instanced(InstanceBatch::new(&snapshot.buildings, &derived.layout))
            }
        };
        let geometry = Self {
            buildings,
            roads: RoadNetwork::build(snapshot, index, &derived.layout, &config.roads),
            districts: build_regions(snapshot, &derived.layout),
            minimap: Minimap::project(snapshot, &derived.layout, &config.minimap),
            ground: GroundPlane::for_layout(&derived.layout, &config.render),
        };
        log::debug!(
            "Built scene geometry: {} buildings ({:?}), {} roads, {} districts in {:.2}ms",
            snapshot.buildings.len(),
            derived.render_mode,
            geometry.roads.len(),
            geometry.districts.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        geometry
    }
}

pub struct SceneManager {
    config: SceneConfig,
    config_fingerprint: u64,
    snapshot: CitySnapshot,
    fingerprint: u64,
    index: HashMap<String, usize>,
    cache: DerivedCache,
    recipes: RecipeLibrary,
    geometry: Option<SceneGeometry>,
    interaction: InteractionState,
    lod: LodState,
    events: Vec<SceneEvent>,
}

impl SceneManager {
    /// Manager with an empty scene
    pub fn new(config: SceneConfig) -> Self {
        let snapshot = CitySnapshot::empty();
        Self {
            config_fingerprint: config.derived_fingerprint(),
            config,
            fingerprint: snapshot.fingerprint(),
            snapshot,
            index: HashMap::new(),
            cache: DerivedCache::new(),
            recipes: RecipeLibrary::new(),
            geometry: None,
            interaction: InteractionState::new(),
            lod: LodState::new(),
            events: Vec::new(),
        }
    }

    pub fn with_snapshot(config: SceneConfig, snapshot: CitySnapshot) -> Self {
        let mut manager = Self::new(config);
        manager.load_snapshot(Some(snapshot));
        manager
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Replace the configuration. Derived data and geometry are rebuilt
    /// lazily; interaction state is kept.
    pub fn set_config(&mut self, config: SceneConfig) -> Result<()> {
        config.validate()?;
        self.config_fingerprint = config.derived_fingerprint();
        self.config = config;
        self.geometry = None;
        self.recipes.clear();
        log::info!("Scene configuration replaced");
        Ok(())
    }

    /// Swap in a new snapshot. `None` gives an empty scene. Every cache,
    /// the selection and the hover referring to the old snapshot are
    /// dropped together.
    pub fn load_snapshot(&mut self, snapshot: Option<CitySnapshot>) {
        let snapshot = snapshot.unwrap_or_else(CitySnapshot::empty);
        let had_selection = self.interaction.selected().is_some();
        let had_hover = self.interaction.hovered().is_some();

        self.index = snapshot.index_by_id();
        self.fingerprint = snapshot.fingerprint();
        self.snapshot = snapshot;
        self.cache.invalidate();
        self.recipes.clear();
        self.geometry = None;
        self.interaction.reset();
        self.lod = LodState::new();

        if had_hover {
            self.events.push(SceneEvent::Hover(None));
        }
        if had_selection {
            self.events.push(SceneEvent::Select(None));
        }

        let buildings = self.snapshot.buildings.len();
        let mode = select_render_mode(buildings, &self.config.render);
        log::info!(
            "Loaded snapshot '{}': {} buildings, {} districts, {} roads ({:?} rendering)",
            self.snapshot.name,
            buildings,
            self.snapshot.districts.len(),
            self.snapshot.roads.len(),
            mode
        );
        self.events.push(SceneEvent::SnapshotReplaced { buildings, mode });
    }

    pub fn snapshot(&self) -> &CitySnapshot {
        &self.snapshot
    }

    /// Index of a building in the current snapshot
    pub fn building_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    fn derived_key(&self) -> DerivedKey {
        DerivedKey { snapshot: self.fingerprint, config: self.config_fingerprint }
    }

    /// Tiers, patterns, scores and layout for the current snapshot
    pub fn derived(&mut self) -> &DerivedData {
        let key = self.derived_key();
        self.cache.get_or_rebuild(key, &self.snapshot, &self.config)
    }

    pub fn render_mode(&mut self) -> RenderMode {
        self.derived().render_mode
    }

    pub fn building_view(&mut self, id: &str) -> Option<BuildingView> {
        let index = self.building_index(id)?;
        Some(self.view_at(index))
    }

    /// Views for every building, in snapshot order
    pub fn building_views(&mut self) -> Vec<BuildingView> {
        (0..self.snapshot.buildings.len()).map(|i| self.view_at(i)).collect()
    }

    fn view_at(&mut self, index: usize) -> BuildingView {
        let key = self.derived_key();
        let derived = self.cache.get_or_rebuild(key, &self.snapshot, &self.config);
        let building = &self.snapshot.buildings[index];
        let pattern = derived.patterns[index];
        let health_score = derived.health[index];
        BuildingView {
            index,
            id: building.id.clone(),
            name: building.name.clone(),
            tier: derived.tiers[index],
            pattern: pattern.map(|p| p.pattern),
            severity: pattern.map(|p| p.severity),
            health_score,
            health_grade: HealthGrade::from_score(health_score, &self.config.health),
            is_hotspot: building.is_hotspot,
            decay_level: building.decay_level,
            is_selected: self.interaction.is_selected(&building.id),
            is_hovered: self.interaction.is_hovered(&building.id),
            is_connected: self.interaction.is_connected(&building.id),
        }
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Pointer entered a building. Unknown ids are ignored.
    pub fn pointer_over(&mut self, id: &str) {
        if !self.index.contains_key(id) {
            return;
        }
        if self.interaction.pointer_over(id) {
            self.events.push(SceneEvent::Hover(Some(id.to_string())));
        }
    }

    pub fn pointer_out(&mut self, id: &str) {
        if self.interaction.pointer_out(id) {
            self.events.push(SceneEvent::Hover(None));
        }
    }

    /// Select a building. Ids not in the current snapshot are ignored, so a
    /// click that raced a snapshot swap never selects a stale building.
    pub fn click(&mut self, id: &str) {
        if !self.index.contains_key(id) {
            log::debug!("Ignoring click on unknown building '{}'", id);
            return;
        }
        if self.interaction.click(id, &self.snapshot.roads, &self.index) {
            self.events.push(SceneEvent::Select(Some(id.to_string())));
        }
    }

    pub fn clear_selection(&mut self) {
        if self.interaction.clear_selection() {
            self.events.push(SceneEvent::Select(None));
        }
    }

    /// Building under a screen point (normalized device coordinates)
    pub fn pick(&mut self, camera: &Camera, ndc: Vec2) -> Option<String> {
        let ray = camera.screen_ray(ndc);
        let key = self.derived_key();
        let derived = self.cache.get_or_rebuild(key, &self.snapshot, &self.config);
        let index = pick_building(&ray, &self.snapshot.buildings, &derived.layout)?;
        Some(self.snapshot.buildings[index].id.clone())
    }

    pub fn minimap(&mut self) -> &Minimap {
        let key = self.derived_key();
        let geometry = self.geometry.get_or_insert_with(|| {
            let derived = self.cache.get_or_rebuild(key, &self.snapshot, &self.config);
            SceneGeometry::build(&self.snapshot, &self.index, &self.config, derived, &mut self.recipes)
        });
        &geometry.minimap
    }

    /// Hit-test a click in minimap coordinates and select the building
    /// under it. A miss leaves the selection unchanged.
    pub fn minimap_click(&mut self, point: Vec2) -> Option<String> {
        let index = self.minimap().hit_test(point)?;
        let id = self.snapshot.buildings[index].id.clone();
        self.click(&id);
        Some(id)
    }

    pub fn lod_state(&self) -> LodState {
        self.lod
    }

    /// Per-frame LOD step from the camera's distance to the city center
    pub fn advance_frame(&mut self, camera: &Camera) -> LodSettings {
        let distance = camera.distance_from_origin();
        let next = self.lod.advance(distance, self.snapshot.buildings.len(), &self.config.lod);
        if next.level != self.lod.level {
            log::debug!("LOD {:?} -> {:?} at distance {:.1}", self.lod.level, next.level, distance);
            self.events.push(SceneEvent::LodChanged { from: self.lod.level, to: next.level });
        }
        self.lod = next;
        next.settings(&self.config.lod)
    }

    /// Assemble this frame's draw data. Highlight colors and road flags are
    /// brought up to date with the interaction state first.
    pub fn build_frame(&mut self) -> SceneFrame<'_> {
        let key = self.derived_key();
        let lod = self.lod.settings(&self.config.lod);
        let selected = self.interaction.selected().and_then(|id| self.index.get(id).copied());

        let geometry = self.geometry.get_or_insert_with(|| {
            let derived = self.cache.get_or_rebuild(key, &self.snapshot, &self.config);
            SceneGeometry::build(&self.snapshot, &self.index, &self.config, derived, &mut self.recipes)
        });
        match &mut geometry.buildings {
            BuildingsGeometry::Discrete(list) => {
                list.update_highlights(&self.snapshot.buildings, &self.interaction);
            }
            BuildingsGeometry::Instanced(batch) => {
                batch.update_colors(&self.snapshot.buildings, &self.interaction);
            }
        }
        geometry.roads.set_selection(selected);

        let geometry = &*geometry;
        SceneFrame {
            buildings: match &geometry.buildings {
                BuildingsGeometry::Discrete(list) => BuildingsFrame::Discrete(list),
                BuildingsGeometry::Instanced(batch) => BuildingsFrame::Instanced(batch),
            },
            districts: if lod.render_districts { geometry.districts.as_slice() } else { &[] },
            roads: if lod.render_roads { geometry.roads.paths.as_slice() } else { &[] },
            ground: geometry.ground,
            lod,
        }
    }

    /// Instance color bytes changed since the last upload (instanced mode)
    pub fn instance_color_upload(&mut self) -> Option<&[u8]> {
        match &mut self.geometry.as_mut()?.buildings {
            BuildingsGeometry::Instanced(batch) => batch.take_color_upload(),
            BuildingsGeometry::Discrete(_) => None,
        }
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}
