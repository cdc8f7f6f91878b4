//! Snapshot types produced by the external analysis engine.
//!
//! Everything here is immutable for the lifetime of a snapshot. Numeric
//! fields are sanitized while deserializing: negative, fractional or `null`
//! metrics become non-negative integers, `decay_level` is clamped to [0,1]
//! and dimensions are kept strictly positive, so nothing downstream has to
//! re-check them.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::Error;
use crate::core::types::{Result, Vec2};

/// Smallest extent a building dimension may have
pub const MIN_DIMENSION: f32 = 0.1;

/// Language tag used when the analyzer could not determine one
pub const UNKNOWN_LANGUAGE: &str = "unknown";

// ---------------------------------------------------------------------------
// Lenient field parsing
// ---------------------------------------------------------------------------

fn sanitize_count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.min(u64::MAX as f64) as u64,
        _ => 0,
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(sanitize_count(value).min(u32::MAX as u64) as u32)
}

fn lenient_total<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    Ok(sanitize_count(Option::<f64>::deserialize(deserializer)?))
}

fn lenient_unit<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0) as f32,
        _ => 0.0,
    })
}

fn lenient_coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0) as f32)
}

fn lenient_extent<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v.is_finite() => (v as f32).max(MIN_DIMENSION),
        _ => MIN_DIMENSION,
    })
}

fn lenient_weight<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v.is_finite() && v >= 0.0 => v as f32,
        _ => 1.0,
    })
}

/// `null` for a whole object or flag reads as its default
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn lenient_language<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_language(value.as_deref().unwrap_or(UNKNOWN_LANGUAGE)))
}

fn normalize_language(raw: &str) -> String {
    let tag = raw.trim().to_lowercase();
    if tag.is_empty() {
        UNKNOWN_LANGUAGE.to_string()
    } else {
        tag
    }
}

fn default_language() -> String {
    UNKNOWN_LANGUAGE.to_string()
}

fn default_extent() -> f32 {
    1.0
}

fn default_weight() -> f32 {
    1.0
}

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

/// Building position on the ground plane. `y` is derived from height and
/// ignored if present in the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundPosition {
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub x: f32,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub z: f32,
}

impl GroundPosition {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// 2D point in the district layout plane (`y` maps to world z)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub x: f32,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub y: f32,
}

impl PlanePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Building extents in world units; always at least [`MIN_DIMENSION`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default = "default_extent", deserialize_with = "lenient_extent")]
    pub width: f32,
    #[serde(default = "default_extent", deserialize_with = "lenient_extent")]
    pub height: f32,
    #[serde(default = "default_extent", deserialize_with = "lenient_extent")]
    pub depth: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width: width.max(MIN_DIMENSION),
            height: height.max(MIN_DIMENSION),
            depth: depth.max(MIN_DIMENSION),
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Raw per-file metrics. Missing or malformed values read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingMetrics {
    #[serde(deserialize_with = "lenient_count")]
    pub loc: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub complexity: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub churn: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub age_days: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub dependencies_in: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub dependencies_out: u32,
}

/// One source file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Stable identifier (the file path in practice)
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_language", deserialize_with = "lenient_language")]
    pub language: String,
    /// Cluster assignment from the external clustering stage
    #[serde(default)]
    pub district_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: GroundPosition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: Dimensions,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: BuildingMetrics,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_hotspot: bool,
    #[serde(default, deserialize_with = "lenient_unit")]
    pub decay_level: f32,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Building {
    /// Minimal building for programmatic construction
    pub fn new(id: impl Into<String>, position: GroundPosition, dimensions: Dimensions) -> Self {
        let id = id.into();
        let name = id.rsplit('/').next().unwrap_or(&id).to_string();
        Self {
            name,
            path: id.clone(),
            id,
            language: UNKNOWN_LANGUAGE.to_string(),
            district_id: None,
            position,
            dimensions,
            metrics: BuildingMetrics::default(),
            is_hotspot: false,
            decay_level: 0.0,
            summary: None,
        }
    }

    pub fn with_metrics(mut self, metrics: BuildingMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = normalize_language(language);
        self
    }

    pub fn with_hotspot(mut self, is_hotspot: bool) -> Self {
        self.is_hotspot = is_hotspot;
        self
    }

    pub fn with_decay(mut self, decay_level: f32) -> Self {
        self.decay_level = if decay_level.is_finite() { decay_level.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    pub fn with_district(mut self, district_id: impl Into<String>) -> Self {
        self.district_id = Some(district_id.into());
        self
    }
}

/// A cluster of related files, rendered as a ground region
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Hex color (`#rrggbb` or `#rgb`)
    #[serde(default)]
    pub color: String,
    /// Advisory layout center; building positions are authoritative
    #[serde(default)]
    pub center: PlanePoint,
    #[serde(default, deserialize_with = "lenient_count")]
    pub building_count: u32,
    #[serde(default)]
    pub boundary: Vec<PlanePoint>,
    #[serde(default)]
    pub description: Option<String>,
}

impl District {
    pub fn new(id: impl Into<String>, color: impl Into<String>, center: PlanePoint, building_count: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            color: color.into(),
            center,
            building_count,
            boundary: Vec::new(),
            description: None,
        }
    }
}

/// Dependency edge between two buildings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub source: String,
    pub target: String,
    #[serde(default = "default_weight", deserialize_with = "lenient_weight")]
    pub weight: f32,
    #[serde(default)]
    pub is_cross_district: bool,
}

impl Road {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: 1.0,
            is_cross_district: false,
        }
    }

    pub fn cross_district(mut self, is_cross_district: bool) -> Self {
        self.is_cross_district = is_cross_district;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    /// The endpoint opposite `id`, if this road touches `id`
    pub fn other_endpoint(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(&self.target)
        } else if self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// Aggregate counters from the analysis engine. Display-only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityStats {
    #[serde(deserialize_with = "lenient_total")]
    pub total_files: u64,
    #[serde(deserialize_with = "lenient_total")]
    pub total_loc: u64,
    #[serde(deserialize_with = "lenient_total")]
    pub total_districts: u64,
    #[serde(deserialize_with = "lenient_total")]
    pub total_dependencies: u64,
    #[serde(deserialize_with = "lenient_total")]
    pub hotspots: u64,
    /// Counters this engine does not interpret (e.g. `god_classes`)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CityStats {
    /// Recompute the standard counters from snapshot contents
    pub fn from_snapshot(snapshot: &CitySnapshot) -> Self {
        Self {
            total_files: snapshot.buildings.len() as u64,
            total_loc: snapshot.buildings.iter().map(|b| b.metrics.loc as u64).sum(),
            total_districts: snapshot.districts.len() as u64,
            total_dependencies: snapshot.roads.len() as u64,
            hotspots: snapshot.buildings.iter().filter(|b| b.is_hotspot).count() as u64,
            extra: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One complete analysis result. Replaced wholesale, never edited.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitySnapshot {
    pub name: String,
    pub buildings: Vec<Building>,
    pub districts: Vec<District>,
    pub roads: Vec<Road>,
    pub stats: CityStats,
}

impl CitySnapshot {
    /// Snapshot with no entities; renders as the ground plane only
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse analysis JSON. A `null` document yields the empty snapshot.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: Option<CitySnapshot> = serde_json::from_str(json)?;
        let mut snapshot = parsed.unwrap_or_default();
        if snapshot.stats.total_files == 0 && !snapshot.buildings.is_empty() {
            let extra = std::mem::take(&mut snapshot.stats.extra);
            snapshot.stats = CityStats { extra, ..CityStats::from_snapshot(&snapshot) };
        }
        Ok(snapshot)
    }

    /// Load analysis JSON from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&data)
            .map_err(|e| Error::Snapshot(format!("{}: {}", path.display(), e)))?;
        log::info!(
            "Loaded snapshot '{}' from {}: {} buildings, {} districts, {} roads",
            snapshot.name,
            path.display(),
            snapshot.buildings.len(),
            snapshot.districts.len(),
            snapshot.roads.len()
        );
        Ok(snapshot)
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.districts.is_empty() && self.roads.is_empty()
    }

    /// Map from building id to index. Duplicate ids keep their first
    /// occurrence.
    pub fn index_by_id(&self) -> HashMap<String, usize> {
        let mut index = HashMap::with_capacity(self.buildings.len());
        for (i, building) in self.buildings.iter().enumerate() {
            if index.contains_key(&building.id) {
                log::warn!("Duplicate building id '{}' at index {}; keeping first", building.id, i);
                continue;
            }
            index.insert(building.id.clone(), i);
        }
        index
    }

    /// Hash of every field that influences derived scene data. Used as the
    /// cache key for tiers, patterns, scores and layout.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.buildings.len().hash(&mut hasher);
        for b in &self.buildings {
            b.id.hash(&mut hasher);
            b.language.hash(&mut hasher);
            b.district_id.hash(&mut hasher);
            b.position.x.to_bits().hash(&mut hasher);
            b.position.z.to_bits().hash(&mut hasher);
            b.dimensions.width.to_bits().hash(&mut hasher);
            b.dimensions.height.to_bits().hash(&mut hasher);
            b.dimensions.depth.to_bits().hash(&mut hasher);
            b.metrics.hash(&mut hasher);
            b.is_hotspot.hash(&mut hasher);
            b.decay_level.to_bits().hash(&mut hasher);
        }
        self.districts.len().hash(&mut hasher);
        for d in &self.districts {
            d.id.hash(&mut hasher);
            d.color.hash(&mut hasher);
            d.center.x.to_bits().hash(&mut hasher);
            d.center.y.to_bits().hash(&mut hasher);
            d.building_count.hash(&mut hasher);
            d.boundary.len().hash(&mut hasher);
            for p in &d.boundary {
                p.x.to_bits().hash(&mut hasher);
                p.y.to_bits().hash(&mut hasher);
            }
        }
        self.roads.len().hash(&mut hasher);
        for r in &self.roads {
            r.source.hash(&mut hasher);
            r.target.hash(&mut hasher);
            r.weight.to_bits().hash(&mut hasher);
            r.is_cross_district.hash(&mut hasher);
        }
        hasher.finish()
    }
}
