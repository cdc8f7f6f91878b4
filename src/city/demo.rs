//! Built-in demo city: a small web application with five districts, one
//! runaway hotspot, a legacy billing module and a helper god class. Used by
//! the binary when no snapshot is given, by benches and by tests.

use super::model::{
    Building, BuildingMetrics, CitySnapshot, CityStats, Dimensions, District, GroundPosition,
    PlanePoint, Road,
};

/// Per-building inputs: (path, district, x, z, loc, complexity, decay, hotspot, churn, deps_in)
type BuildingSpec = (&'static str, &'static str, f32, f32, u32, u32, f32, bool, u32, u32);

const DEFAULT_CHURN: u32 = 5;
const DEFAULT_DEPS_IN: u32 = 3;

#[rustfmt::skip]
const BUILDINGS: &[BuildingSpec] = &[
    // API gateway
    ("api/routes.py",                "api_district",      -100.0, -20.0, 150, 12, 0.1, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("api/middleware.py",            "api_district",       -80.0, -20.0,  80,  8, 0.3, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("api/validators.py",            "api_district",       -60.0, -20.0, 120,  6, 0.2, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("api/responses.py",             "api_district",      -100.0,  10.0,  60,  4, 0.0, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("api/errors.py",                "api_district",       -80.0,  10.0,  45,  3, 0.4, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    // Business services, including a churning hotspot and legacy billing
    ("services/user_service.py",     "services_district",  -20.0, -40.0, 280, 18, 0.2, true,  25, DEFAULT_DEPS_IN),
    ("services/order_service.py",    "services_district",   10.0, -40.0, 220, 14, 0.1, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("services/payment_service.py",  "services_district",  -20.0, -10.0, 180, 16, 0.3, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("services/notification.py",     "services_district",   10.0, -10.0, 100,  8, 0.5, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("services/analytics.py",        "services_district",  -20.0,  20.0, 140, 10, 0.1, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("services/cache.py",            "services_district",   10.0,  20.0,  90,  6, 0.4, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("services/scheduler.py",        "services_district",   -5.0,  40.0, 110,  7, 0.2, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("services/legacy_billing.py",   "services_district",   20.0,  40.0, 450, 25, 0.9, true,  5, DEFAULT_DEPS_IN),
    // Data layer
    ("models/user.py",               "data_district",       60.0, -20.0, 120,  8, 0.2, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("models/order.py",              "data_district",       90.0, -20.0, 150, 10, 0.1, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("repositories/user_repo.py",    "data_district",       60.0,  10.0, 180, 12, 0.3, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("repositories/order_repo.py",   "data_district",       90.0,  10.0, 200, 14, 0.2, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    // Utilities, with the helper god class everyone imports
    ("utils/helpers.py",             "utils_district",     -20.0,  70.0, 320, 20, 0.7, false, DEFAULT_CHURN, 18),
    ("utils/validators.py",          "utils_district",      10.0,  70.0,  80,  5, 0.4, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("utils/formatters.py",          "utils_district",     -20.0,  85.0,  60,  4, 0.5, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("utils/constants.py",           "utils_district",      10.0,  85.0,  40,  2, 0.2, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("utils/logger.py",              "utils_district",      -5.0,  95.0, 100,  6, 0.3, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("utils/config.py",              "utils_district",      20.0,  75.0,  55,  3, 0.1, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    // Authentication
    ("auth/login.py",                "auth_district",      -20.0, -85.0, 160, 12, 0.2, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("auth/register.py",             "auth_district",       10.0, -85.0, 140, 10, 0.2, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("auth/jwt.py",                  "auth_district",      -20.0, -70.0, 100,  8, 0.4, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
    ("auth/permissions.py",          "auth_district",       10.0, -70.0, 120,  9, 0.3, false, DEFAULT_CHURN, DEFAULT_DEPS_IN),
];

/// (source, target, cross-district, weight)
#[rustfmt::skip]
const ROADS: &[(&str, &str, bool, f32)] = &[
    ("api/routes.py", "services/user_service.py", true, 1.0),
    ("api/routes.py", "services/order_service.py", true, 1.0),
    ("api/routes.py", "services/payment_service.py", true, 1.0),
    ("api/middleware.py", "auth/jwt.py", true, 1.0),
    ("services/user_service.py", "repositories/user_repo.py", true, 1.0),
    ("services/order_service.py", "repositories/order_repo.py", true, 1.0),
    ("services/user_service.py", "models/user.py", true, 1.0),
    ("services/order_service.py", "models/order.py", true, 1.0),
    ("services/user_service.py", "utils/helpers.py", true, 2.0),
    ("services/order_service.py", "utils/helpers.py", true, 2.0),
    ("services/payment_service.py", "utils/helpers.py", true, 2.0),
    ("services/notification.py", "utils/helpers.py", true, 1.0),
    ("services/analytics.py", "utils/helpers.py", true, 1.0),
    ("api/routes.py", "utils/helpers.py", true, 1.0),
    ("auth/login.py", "utils/helpers.py", true, 1.0),
    ("services/user_service.py", "auth/permissions.py", true, 1.0),
    ("api/routes.py", "auth/login.py", true, 1.0),
    ("services/order_service.py", "services/payment_service.py", false, 1.0),
    ("services/payment_service.py", "services/notification.py", false, 1.0),
    ("auth/login.py", "auth/jwt.py", false, 1.0),
    ("auth/register.py", "auth/jwt.py", false, 1.0),
    ("repositories/user_repo.py", "models/user.py", false, 1.0),
    ("repositories/order_repo.py", "models/order.py", false, 1.0),
];

fn square(center: PlanePoint, half_x: f32, half_y: f32) -> Vec<PlanePoint> {
    vec![
        PlanePoint::new(center.x - half_x, center.y - half_y),
        PlanePoint::new(center.x + half_x, center.y - half_y),
        PlanePoint::new(center.x + half_x, center.y + half_y),
        PlanePoint::new(center.x - half_x, center.y + half_y),
    ]
}

fn district(
    id: &str,
    name: &str,
    color: &str,
    center: PlanePoint,
    half: (f32, f32),
    description: &str,
) -> District {
    let building_count = BUILDINGS.iter().filter(|spec| spec.1 == id).count() as u32;
    District {
        name: name.to_string(),
        boundary: square(center, half.0, half.1),
        description: Some(description.to_string()),
        ..District::new(id, color, center, building_count)
    }
}

fn building(index: usize, spec: &BuildingSpec) -> Building {
    let &(path, district_id, x, z, loc, complexity, decay, is_hotspot, churn, deps_in) = spec;
    let dimensions = Dimensions::new(
        (loc as f32 / 40.0).max(3.0),
        (complexity as f32 * 0.8).max(2.0),
        (loc as f32 / 40.0).max(3.0),
    );
    let metrics = BuildingMetrics {
        loc,
        complexity,
        churn,
        age_days: (decay * 730.0) as u32,
        dependencies_in: deps_in,
        dependencies_out: (index % 5) as u32 + 1,
    };

    let mut b = Building::new(path, GroundPosition::new(x, z), dimensions)
        .with_metrics(metrics)
        .with_language("python")
        .with_decay(decay)
        .with_hotspot(is_hotspot)
        .with_district(district_id);
    b.summary = Some(format!("Module in {}: {}", district_id, b.name));
    b
}

/// The demo dataset
pub fn demo_city() -> CitySnapshot {
    let districts = vec![
        district("api_district", "API Gateway", "#45B7D1", PlanePoint::new(-80.0, 0.0), (40.0, 40.0),
            "Entry points and route handlers"),
        district("services_district", "Business Services", "#FF6B6B", PlanePoint::new(0.0, 0.0), (40.0, 60.0),
            "Core business logic"),
        district("data_district", "Data Layer", "#4ECDC4", PlanePoint::new(80.0, 0.0), (40.0, 40.0),
            "Database models and repositories"),
        district("utils_district", "Utilities", "#96CEB4", PlanePoint::new(0.0, 80.0), (40.0, 20.0),
            "Shared utilities and helpers"),
        district("auth_district", "Authentication", "#DDA0DD", PlanePoint::new(0.0, -80.0), (40.0, 20.0),
            "User authentication and authorization"),
    ];

    let buildings: Vec<Building> = BUILDINGS
        .iter()
        .enumerate()
        .map(|(i, spec)| building(i, spec))
        .collect();

    let roads = ROADS
        .iter()
        .map(|&(source, target, cross, weight)| {
            Road::new(source, target).cross_district(cross).with_weight(weight)
        })
        .collect();

    let mut snapshot = CitySnapshot {
        name: "Demo Web Application".to_string(),
        buildings,
        districts,
        roads,
        stats: CityStats::default(),
    };
    let mut stats = CityStats::from_snapshot(&snapshot);
    stats.extra.insert("god_classes".into(), serde_json::json!(1));
    stats.extra.insert("legacy_modules".into(), serde_json::json!(2));
    snapshot.stats = stats;
    snapshot
}

/// Synthetic city of `count` buildings on a square grid, for scale tests and
/// benchmarks. Metrics cycle deterministically so every tier, pattern and
/// health band shows up; each building depends on its grid neighbour.
pub fn grid_city(count: usize) -> CitySnapshot {
    const SPACING: f32 = 12.0;
    const LANGUAGES: [&str; 4] = ["rust", "python", "typescript", "go"];

    let side = (count as f32).sqrt().ceil().max(1.0) as usize;
    let buildings: Vec<Building> = (0..count)
        .map(|i| {
            let (row, col) = (i / side, i % side);
            let loc = 20 + (i * 37 % 900) as u32;
            let complexity = 1 + (i * 13 % 35) as u32;
            let decay = (i % 10) as f32 / 10.0;
            let metrics = BuildingMetrics {
                loc,
                complexity,
                churn: (i * 7 % 30) as u32,
                age_days: (decay * 730.0) as u32,
                dependencies_in: (i * 11 % 25) as u32,
                dependencies_out: (i % 6) as u32,
            };
            let dimensions = Dimensions::new(
                (loc as f32 / 40.0).max(3.0),
                (complexity as f32 * 0.8).max(2.0),
                (loc as f32 / 40.0).max(3.0),
            );
            Building::new(
                format!("pkg{}/module_{}.{}", i / 100, i, LANGUAGES[i % 4]),
                GroundPosition::new(col as f32 * SPACING, row as f32 * SPACING),
                dimensions,
            )
            .with_metrics(metrics)
            .with_language(LANGUAGES[i % 4])
            .with_decay(decay)
            .with_hotspot(complexity > 30 && metrics.churn > 20)
            .with_district(format!("pkg{}", i / 100))
        })
        .collect();

    let roads = buildings
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Road::new(pair[0].id.clone(), pair[1].id.clone()).cross_district(i % 100 == 99))
        .collect();

    let mut snapshot = CitySnapshot {
        name: format!("Grid city ({} buildings)", count),
        buildings,
        districts: Vec::new(),
        roads,
        stats: CityStats::default(),
    };
    snapshot.stats = CityStats::from_snapshot(&snapshot);
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_counts() {
        let city = demo_city();
        assert_eq!(city.buildings.len(), 27);
        assert_eq!(city.districts.len(), 5);
        assert_eq!(city.roads.len(), 23);
        assert_eq!(city.stats.hotspots, 2);
        assert_eq!(city.stats.total_files, 27);
    }

    #[test]
    fn test_every_road_resolves() {
        let city = demo_city();
        let index = city.index_by_id();
        for road in &city.roads {
            assert!(index.contains_key(&road.source), "unknown source {}", road.source);
            assert!(index.contains_key(&road.target), "unknown target {}", road.target);
        }
    }

    #[test]
    fn test_district_counts_match_buildings() {
        let city = demo_city();
        let total: u32 = city.districts.iter().map(|d| d.building_count).sum();
        assert_eq!(total as usize, city.buildings.len());
        for b in &city.buildings {
            let district = b.district_id.as_deref().unwrap();
            assert!(city.districts.iter().any(|d| d.id == district));
        }
    }

    #[test]
    fn test_demo_is_deterministic() {
        assert_eq!(demo_city().fingerprint(), demo_city().fingerprint());
    }

    #[test]
    fn test_cross_district_flags_agree_with_assignment() {
        let city = demo_city();
        let index = city.index_by_id();
        for road in &city.roads {
            let a = &city.buildings[index[&road.source]];
            let b = &city.buildings[index[&road.target]];
            assert_eq!(road.is_cross_district, a.district_id != b.district_id);
        }
    }

    #[test]
    fn test_grid_city() {
        let city = grid_city(250);
        assert_eq!(city.buildings.len(), 250);
        assert_eq!(city.roads.len(), 249);
        assert_eq!(city.index_by_id().len(), 250);
        assert_eq!(grid_city(250).fingerprint(), city.fingerprint());
        assert!(grid_city(0).buildings.is_empty());
    }
}
