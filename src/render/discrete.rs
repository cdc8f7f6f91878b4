//! Discrete rendering: one tiered recipe mesh per building.
//!
//! Recipes are shared through a `RecipeLibrary` keyed by the full recipe
//! input, so identical buildings reuse one geometry description.

use std::collections::HashMap;
use std::sync::Arc;

use crate::city::{Building, NormalizedLayout};
use crate::core::types::{Mat4, Vec3};
use crate::generation::{BuildingGeometry, MeshData, PartKind, RecipeInput, Tier};
use crate::interaction::InteractionState;

use super::highlight::Highlight;

/// Everything a recipe's output depends on, with floats compared by bits
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecipeKey {
    pub tier: Tier,
    pub dimensions: [u32; 3],
    pub language: String,
    pub decay_level: u32,
    pub is_hotspot: bool,
}

impl RecipeKey {
    pub fn new(tier: Tier, input: &RecipeInput) -> Self {
        let d = input.dimensions;
        Self {
            tier,
            dimensions: [d.width.to_bits(), d.height.to_bits(), d.depth.to_bits()],
            language: input.language.to_string(),
            decay_level: input.decay_level.to_bits(),
            is_hotspot: input.is_hotspot,
        }
    }
}

/// Memoized recipe outputs
#[derive(Debug, Default)]
pub struct RecipeLibrary {
    recipes: HashMap<RecipeKey, Arc<BuildingGeometry>>,
    hits: usize,
    misses: usize,
}

impl RecipeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, tier: Tier, input: &RecipeInput) -> Arc<BuildingGeometry> {
        let key = RecipeKey::new(tier, input);
        if let Some(geometry) = self.recipes.get(&key) {
            self.hits += 1;
            return Arc::clone(geometry);
        }
        self.misses += 1;
        let geometry = Arc::new(tier.build(input));
        self.recipes.insert(key, Arc::clone(&geometry));
        geometry
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// One building to draw
#[derive(Clone, Debug)]
pub struct DrawItem {
    pub building: usize,
    pub geometry: Arc<BuildingGeometry>,
    /// Ground position in the scene frame
    pub translation: Vec3,
    pub highlight: Highlight,
    /// Body color after highlight tinting
    pub color: Vec3,
}

impl DrawItem {
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }

    /// Tessellated mesh in world space. Body parts take the highlight tint
    /// over their own shade; ornaments keep their colors.
    pub fn mesh(&self) -> MeshData {
        let mut mesh = MeshData::new();
        for part in &self.geometry.parts {
            let mut part = *part;
            if part.kind == PartKind::Body {
                part.color = self.highlight.apply(part.color);
            }
            mesh.push_part(&part, self.translation);
        }
        mesh
    }
}

/// Per-building draw list for the discrete path
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
}

impl DrawList {
    /// `tiers` is parallel to `buildings`
    pub fn new(
        buildings: &[Building],
        tiers: &[Tier],
        layout: &NormalizedLayout,
        library: &mut RecipeLibrary,
    ) -> Self {
        let items = buildings
            .iter()
            .zip(tiers)
            .enumerate()
            .filter_map(|(i, (building, &tier))| {
                let ground = layout.building(i)?;
                let geometry = library.get_or_build(tier, &RecipeInput::from_building(building));
                let color = geometry.body_color;
                Some(DrawItem {
                    building: i,
                    geometry,
                    translation: Vec3::new(ground.x, 0.0, ground.y),
                    highlight: Highlight::None,
                    color,
                })
            })
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-tint items whose interaction state changed; returns how many did
    pub fn update_highlights(&mut self, buildings: &[Building], interaction: &InteractionState) -> usize {
        let mut changed = 0;
        for item in &mut self.items {
            let highlight = Highlight::of(&buildings[item.building].id, interaction);
            if highlight != item.highlight {
                item.highlight = highlight;
                item.color = highlight.apply(item.geometry.body_color);
                changed += 1;
            }
        }
        changed
    }

    pub fn triangle_count(&self) -> usize {
        self.items.iter().map(|item| item.mesh().triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{demo_city, normalize, Dimensions, GroundPosition};
    use crate::generation::{select_tier, TierThresholds};

    fn tiers(buildings: &[Building]) -> Vec<Tier> {
        buildings
            .iter()
            .map(|b| select_tier(&b.metrics, b.is_hotspot, &TierThresholds::default()))
            .collect()
    }

    #[test]
    fn test_library_reuses_identical_recipes() {
        let mut library = RecipeLibrary::new();
        let input = RecipeInput { dimensions: Dimensions::default(), language: "go", decay_level: 0.0, is_hotspot: false };
        let a = library.get_or_build(Tier::Shop, &input);
        let b = library.get_or_build(Tier::Shop, &input);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(library.stats(), (1, 1));

        let c = library.get_or_build(Tier::Apartment, &input);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(library.len(), 2);

        library.clear();
        assert!(library.is_empty());
    }

    #[test]
    fn test_draw_list_covers_every_building() {
        let city = demo_city();
        let layout = normalize(&city);
        let mut library = RecipeLibrary::new();
        let list = DrawList::new(&city.buildings, &tiers(&city.buildings), &layout, &mut library);
        assert_eq!(list.len(), city.buildings.len());
        for item in &list.items {
            let p = layout.building(item.building).unwrap();
            assert_eq!(item.translation, Vec3::new(p.x, 0.0, p.y));
            assert_eq!(item.transform().transform_point3(Vec3::ZERO), item.translation);
        }
        assert!(list.triangle_count() > 0);
    }

    #[test]
    fn test_identical_buildings_share_geometry() {
        let buildings = vec![
            Building::new("a", GroundPosition::new(0.0, 0.0), Dimensions::new(3.0, 3.0, 3.0)),
            Building::new("b", GroundPosition::new(10.0, 0.0), Dimensions::new(3.0, 3.0, 3.0)),
        ];
        let snapshot = crate::city::CitySnapshot { buildings, ..Default::default() };
        let layout = normalize(&snapshot);
        let mut library = RecipeLibrary::new();
        let list = DrawList::new(&snapshot.buildings, &tiers(&snapshot.buildings), &layout, &mut library);
        assert!(Arc::ptr_eq(&list.items[0].geometry, &list.items[1].geometry));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_highlight_tints_body_parts() {
        let city = demo_city();
        let layout = normalize(&city);
        let known = city.index_by_id();
        let mut library = RecipeLibrary::new();
        let mut list = DrawList::new(&city.buildings, &tiers(&city.buildings), &layout, &mut library);

        let mut state = InteractionState::new();
        state.click("models/user.py", &city.roads, &known);
        assert_eq!(list.update_highlights(&city.buildings, &state), 3);

        let selected = &list.items[known["models/user.py"]];
        assert_eq!(selected.highlight, Highlight::Selected);
        assert_ne!(selected.color, selected.geometry.body_color);
        let mesh = selected.mesh();
        let tinted = selected.color.extend(0.0).to_array();
        assert!(mesh.vertices.iter().any(|v| v.color == tinted));
    }

    #[test]
    fn test_only_body_parts_take_tint() {
        let building = Building::new("a.rs", GroundPosition::new(0.0, 0.0), Dimensions::new(10.0, 30.0, 10.0))
            .with_language("rust");
        let mut library = RecipeLibrary::new();
        let geometry = library.get_or_build(Tier::OfficeTower, &RecipeInput::from_building(&building));

        // An ornament sharing the body color must not be tinted
        let mut parts = geometry.parts.clone();
        let crown = parts.iter().position(|p| p.kind == PartKind::Crown).unwrap();
        parts[crown].color = geometry.body_color;
        let geometry = Arc::new(BuildingGeometry { parts, ..(*geometry).clone() });

        let highlight = Highlight::Selected;
        let item = DrawItem {
            building: 0,
            color: highlight.apply(geometry.body_color),
            geometry: Arc::clone(&geometry),
            translation: Vec3::ZERO,
            highlight,
        };
        let mesh = item.mesh();
        let untinted = geometry.body_color.extend(0.0).to_array();
        let tinted = item.color.extend(0.0).to_array();
        assert!(mesh.vertices.iter().any(|v| v.color == untinted));
        assert!(mesh.vertices.iter().any(|v| v.color == tinted));
    }
}
