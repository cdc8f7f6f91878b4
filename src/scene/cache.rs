//! Memoized per-snapshot derived data.
//!
//! Tiers, patterns, health scores, the normalized layout and the render
//! mode are pure functions of the snapshot and a few config sections. They
//! are computed once and reused until the key changes.

use std::time::Instant;

use crate::analysis::{self, PatternMatch};
use crate::city::{self, CitySnapshot, NormalizedLayout};
use crate::generation::{select_tier, Tier};
use crate::render::{select_render_mode, RenderMode};

use super::config::SceneConfig;

/// Cache key: snapshot fingerprint plus derived-config fingerprint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DerivedKey {
    pub snapshot: u64,
    pub config: u64,
}

/// Derived attributes, parallel to `snapshot.buildings`
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedData {
    pub tiers: Vec<Tier>,
    pub patterns: Vec<Option<PatternMatch>>,
    pub health: Vec<u8>,
    pub layout: NormalizedLayout,
    pub render_mode: RenderMode,
}

impl DerivedData {
    pub fn compute(snapshot: &CitySnapshot, config: &SceneConfig) -> Self {
        let buildings = &snapshot.buildings;
        Self {
            tiers: buildings
                .iter()
                .map(|b| select_tier(&b.metrics, b.is_hotspot, &config.tiers))
                .collect(),
            patterns: buildings
                .iter()
                .map(|b| analysis::classify(&b.metrics, b.is_hotspot, &config.patterns))
                .collect(),
            health: buildings.iter().map(|b| analysis::score(b, &config.health)).collect(),
            layout: city::normalize(snapshot),
            render_mode: select_render_mode(buildings.len(), &config.render),
        }
    }
}

#[derive(Debug, Default)]
pub struct DerivedCache {
    entry: Option<(DerivedKey, DerivedData)>,
    rebuilds: usize,
}

impl DerivedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached data for `key`, recomputing if the key changed
    pub fn get_or_rebuild(&mut self, key: DerivedKey, snapshot: &CitySnapshot, config: &SceneConfig) -> &DerivedData {
        if self.entry.as_ref().is_some_and(|(cached, _)| *cached != key) {
            self.entry = None;
        }
        let (_, data) = self.entry.get_or_insert_with(|| {
            let start = Instant::now();
            let data = DerivedData::compute(snapshot, config);
            self.rebuilds += 1;
            log::debug!(
                "Rebuilt derived data for snapshot {:016x} ({} buildings) in {:.2}ms",
                key.snapshot,
                snapshot.buildings.len(),
                start.elapsed().as_secs_f64() * 1000.0
            );
            (key, data)
        });
        data
    }

    /// Cached data without recomputing
    pub fn peek(&self, key: DerivedKey) -> Option<&DerivedData> {
        self.entry.as_ref().filter(|(cached, _)| *cached == key).map(|(_, data)| data)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of recomputations since creation
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DesignPattern;
    use crate::city::demo_city;

    fn key(snapshot: &CitySnapshot, config: &SceneConfig) -> DerivedKey {
        DerivedKey { snapshot: snapshot.fingerprint(), config: config.derived_fingerprint() }
    }

    #[test]
    fn test_compute_parallel_to_buildings() {
        let city = demo_city();
        let data = DerivedData::compute(&city, &SceneConfig::default());
        assert_eq!(data.tiers.len(), 27);
        assert_eq!(data.patterns.len(), 27);
        assert_eq!(data.health.len(), 27);
        assert_eq!(data.layout.buildings.len(), 27);
        assert_eq!(data.render_mode, RenderMode::Discrete);
    }

    #[test]
    fn test_demo_god_classes() {
        let city = demo_city();
        let data = DerivedData::compute(&city, &SceneConfig::default());
        let gods: Vec<&str> = city
            .buildings
            .iter()
            .zip(&data.patterns)
            .filter(|(_, p)| p.map(|p| p.pattern) == Some(DesignPattern::GodClass))
            .map(|(b, _)| b.id.as_str())
            .collect();
        assert_eq!(gods, vec!["services/user_service.py", "services/legacy_billing.py"]);
    }

    #[test]
    fn test_rebuild_only_on_key_change() {
        let city = demo_city();
        let config = SceneConfig::default();
        let mut cache = DerivedCache::new();
        let k = key(&city, &config);

        cache.get_or_rebuild(k, &city, &config);
        cache.get_or_rebuild(k, &city, &config);
        assert_eq!(cache.rebuilds(), 1);
        assert!(cache.peek(k).is_some());

        let mut changed = config.clone();
        changed.tiers.skyscraper_loc = 10;
        let k2 = key(&city, &changed);
        let data = cache.get_or_rebuild(k2, &city, &changed);
        assert!(data.tiers.iter().all(|&t| t == Tier::Skyscraper));
        assert_eq!(cache.rebuilds(), 2);
        assert!(cache.peek(k).is_none());
    }

    #[test]
    fn test_invalidate() {
        let city = demo_city();
        let config = SceneConfig::default();
        let mut cache = DerivedCache::new();
        let k = key(&city, &config);
        cache.get_or_rebuild(k, &city, &config);
        cache.invalidate();
        assert!(cache.peek(k).is_none());
        cache.get_or_rebuild(k, &city, &config);
        assert_eq!(cache.rebuilds(), 2);
    }

    #[test]
    fn test_empty_snapshot() {
        let data = DerivedData::compute(&CitySnapshot::empty(), &SceneConfig::default());
        assert!(data.tiers.is_empty());
        assert!(data.layout.is_empty());
        assert_eq!(data.render_mode, RenderMode::Discrete);
    }
}
