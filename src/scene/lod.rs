//! Level of Detail (LOD) state machine for camera-distance-based fidelity
//!
//! Three levels gate shadow quality, district regions and roads. The level
//! is recomputed every frame from the camera's distance to the scene
//! origin, but only for datasets larger than the activation floor; smaller
//! cities always render at full detail.
//!
//! - High: full-resolution shadows, districts and roads - 0-150m
//! - Medium: reduced shadows, districts, no roads - 150-250m
//! - Low: no shadows, no districts, no roads - 250m+

use serde::{Deserialize, Serialize};

/// Detail level, ordered from finest to coarsest
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LodLevel {
    #[default]
    High,
    Medium,
    Low,
}

/// Configuration for LOD behavior
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Distances above this are at least Medium
    pub medium_distance: f32,
    /// Distances above this are Low
    pub low_distance: f32,
    /// LOD only engages when the entity count exceeds this
    pub activation_floor: usize,
    /// Extra distance required to cross a breakpoint. 0 = level-triggered.
    pub hysteresis: f32,
    /// Shadow map resolution at High
    pub full_shadow_map_size: u32,
    /// Shadow map resolution at Medium
    pub reduced_shadow_map_size: u32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            medium_distance: 150.0,
            low_distance: 250.0,
            activation_floor: 100,
            hysteresis: 0.0,
            full_shadow_map_size: 2048,
            reduced_shadow_map_size: 1024,
        }
    }
}

/// Calculate LOD level from camera distance and entity count
///
/// # Examples
/// ```
/// use codecity::scene::lod::{lod_from_distance, LodConfig, LodLevel};
///
/// let config = LodConfig::default();
/// assert_eq!(lod_from_distance(50.0, 500, &config), LodLevel::High);
/// assert_eq!(lod_from_distance(200.0, 500, &config), LodLevel::Medium);
/// assert_eq!(lod_from_distance(300.0, 500, &config), LodLevel::Low);
/// assert_eq!(lod_from_distance(400.0, 50, &config), LodLevel::High); // below floor
/// ```
pub fn lod_from_distance(distance: f32, entity_count: usize, config: &LodConfig) -> LodLevel {
    if entity_count <= config.activation_floor {
        return LodLevel::High;
    }
    if distance > config.low_distance {
        LodLevel::Low
    } else if distance > config.medium_distance {
        LodLevel::Medium
    } else {
        LodLevel::High
    }
}

/// Rendering parameters a level implies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LodSettings {
    pub level: LodLevel,
    pub cast_shadows: bool,
    /// 0 when shadows are off
    pub shadow_map_size: u32,
    pub render_districts: bool,
    pub render_roads: bool,
}

impl LodSettings {
    pub fn for_level(level: LodLevel, config: &LodConfig) -> Self {
        match level {
            LodLevel::High => Self {
                level,
                cast_shadows: true,
                shadow_map_size: config.full_shadow_map_size,
                render_districts: true,
                render_roads: true,
            },
            LodLevel::Medium => Self {
                level,
                cast_shadows: true,
                shadow_map_size: config.reduced_shadow_map_size,
                render_districts: true,
                render_roads: false,
            },
            LodLevel::Low => Self {
                level,
                cast_shadows: false,
                shadow_map_size: 0,
                render_districts: false,
                render_roads: false,
            },
        }
    }
}

/// Current LOD level. Starts at High.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LodState {
    pub level: LodLevel,
}

impl LodState {
    pub fn new() -> Self {
        Self::default()
    }

    /// One frame step. With zero hysteresis this is exactly
    /// `lod_from_distance`; otherwise a breakpoint must be overshot by the
    /// margin before the level changes, in either direction.
    pub fn advance(self, distance: f32, entity_count: usize, config: &LodConfig) -> Self {
        let margin = config.hysteresis.max(0.0);
        if margin == 0.0 || entity_count <= config.activation_floor {
            return Self { level: lod_from_distance(distance, entity_count, config) };
        }

        let coarser = lod_from_distance(distance - margin, entity_count, config);
        let finer = lod_from_distance(distance + margin, entity_count, config);
        let level = if coarser > self.level {
            coarser
        } else if finer < self.level {
            finer
        } else {
            self.level
        };
        Self { level }
    }

    pub fn settings(&self, config: &LodConfig) -> LodSettings {
        LodSettings::for_level(self.level, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lod(distance: f32, count: usize) -> LodLevel {
        lod_from_distance(distance, count, &LodConfig::default())
    }

    #[test]
    fn test_lod_from_distance() {
        assert_eq!(lod(0.0, 500), LodLevel::High);
        assert_eq!(lod(150.0, 500), LodLevel::High);
        assert_eq!(lod(150.1, 500), LodLevel::Medium);
        assert_eq!(lod(250.0, 500), LodLevel::Medium);
        assert_eq!(lod(250.1, 500), LodLevel::Low);
        assert_eq!(lod(300.0, 500), LodLevel::Low);
        assert_eq!(lod(10_000.0, 500), LodLevel::Low);
    }

    #[test]
    fn test_activation_floor() {
        assert_eq!(lod(400.0, 50), LodLevel::High);
        assert_eq!(lod(400.0, 100), LodLevel::High);
        assert_eq!(lod(400.0, 101), LodLevel::Low);
        assert_eq!(lod(400.0, 0), LodLevel::High);
    }

    #[test]
    fn test_non_finite_distance_is_high() {
        assert_eq!(lod(f32::NAN, 500), LodLevel::High);
    }

    #[test]
    fn test_settings_per_level() {
        let config = LodConfig::default();
        let high = LodSettings::for_level(LodLevel::High, &config);
        assert!(high.cast_shadows && high.render_districts && high.render_roads);
        assert_eq!(high.shadow_map_size, 2048);

        let medium = LodSettings::for_level(LodLevel::Medium, &config);
        assert!(medium.cast_shadows && medium.render_districts && !medium.render_roads);
        assert!(medium.shadow_map_size < high.shadow_map_size);

        let low = LodSettings::for_level(LodLevel::Low, &config);
        assert!(!low.cast_shadows && !low.render_districts && !low.render_roads);
        assert_eq!(low.shadow_map_size, 0);
    }

    #[test]
    fn test_state_starts_high() {
        assert_eq!(LodState::new().level, LodLevel::High);
    }

    #[test]
    fn test_level_triggered_without_hysteresis() {
        let config = LodConfig::default();
        let mut state = LodState::new();
        for (distance, expected) in [(300.0, LodLevel::Low), (200.0, LodLevel::Medium), (100.0, LodLevel::High), (251.0, LodLevel::Low)] {
            state = state.advance(distance, 500, &config);
            assert_eq!(state.level, expected, "distance {}", distance);
        }
    }

    #[test]
    fn test_hysteresis_holds_near_breakpoint() {
        let config = LodConfig { hysteresis: 10.0, ..Default::default() };
        let mut state = LodState::new();

        // Just past the breakpoint is not enough
        state = state.advance(155.0, 500, &config);
        assert_eq!(state.level, LodLevel::High);
        state = state.advance(161.0, 500, &config);
        assert_eq!(state.level, LodLevel::Medium);

        // Coming back, must drop below 140
        state = state.advance(145.0, 500, &config);
        assert_eq!(state.level, LodLevel::Medium);
        state = state.advance(139.0, 500, &config);
        assert_eq!(state.level, LodLevel::High);
    }

    #[test]
    fn test_hysteresis_allows_large_jumps() {
        let config = LodConfig { hysteresis: 10.0, ..Default::default() };
        let state = LodState::new().advance(1000.0, 500, &config);
        assert_eq!(state.level, LodLevel::Low);
        let state = state.advance(0.0, 500, &config);
        assert_eq!(state.level, LodLevel::High);
    }

    #[test]
    fn test_hysteresis_ignored_below_floor() {
        let config = LodConfig { hysteresis: 10.0, ..Default::default() };
        let state = LodState { level: LodLevel::Low }.advance(1000.0, 10, &config);
        assert_eq!(state.level, LodLevel::High);
    }

    #[test]
    fn test_lod_ordering() {
        assert!(LodLevel::High < LodLevel::Medium);
        assert!(LodLevel::Medium < LodLevel::Low);
    }
}
