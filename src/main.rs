//! Code city scene report.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --snapshot <FILE>   Analysis snapshot JSON (default: built-in demo city)
//!   --config <FILE>     Scene configuration JSON (default: built-in defaults)
//!   --distance <D>      Camera distance from the city center (default: 200)
//!   --select <ID>       Building to select before building the frame
//!
//! Loads the snapshot, runs one frame at the given camera distance and
//! prints what would be drawn along with the derived code-quality data.

use std::collections::BTreeMap;
use std::time::Instant;

use codecity::city::{demo_city, CitySnapshot};
use codecity::core::camera::Camera;
use codecity::core::types::{Result, Vec3};
use codecity::scene::{BuildingView, SceneConfig, SceneManager};

/// Buildings listed in the lowest-health section
const WORST_HEALTH_COUNT: usize = 5;

fn main() {
    codecity::core::logging::try_init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let snapshot_path = parse_str_arg(&args, "--snapshot");
    let config_path = parse_str_arg(&args, "--config");
    let distance = parse_f32_arg(&args, "--distance").unwrap_or(200.0);
    let select = parse_str_arg(&args, "--select");

    let config = match &config_path {
        Some(path) => SceneConfig::from_json_file(path)?,
        None => SceneConfig::default(),
    };
    let snapshot = match &snapshot_path {
        Some(path) => CitySnapshot::from_json_file(path)?,
        None => demo_city(),
    };

    let start = Instant::now();
    let mut manager = SceneManager::with_snapshot(config, snapshot);

    if let Some(id) = &select {
        if manager.building_index(id).is_none() {
            log::warn!("No building '{}' in snapshot; nothing selected", id);
        }
        manager.click(id);
    }

    let camera = Camera::look_at(Vec3::new(0.0, distance * 0.6, distance * 0.8), Vec3::ZERO, Vec3::Y);
    manager.advance_frame(&camera);
    let (mode, visible, districts, roads, ground, lod) = {
        let frame = manager.build_frame();
        (frame.mode(), frame.visible_count(), frame.districts.len(), frame.roads.len(), frame.ground, frame.lod)
    };
    let frame_ms = start.elapsed().as_secs_f64() * 1000.0;

    let snapshot = manager.snapshot();
    println!("=== Code City ===");
    println!("Snapshot:  {}", if snapshot.name.is_empty() { "(unnamed)" } else { snapshot.name.as_str() });
    println!(
        "Input:     {} buildings, {} districts, {} roads",
        snapshot.buildings.len(),
        snapshot.districts.len(),
        snapshot.roads.len()
    );
    println!("Render:    {:?}, {} buildings visible", mode, visible);
    println!(
        "LOD:       {:?} at distance {:.0} (shadows {}, districts {}, roads {})",
        lod.level,
        distance,
        if lod.cast_shadows { format!("{}px", lod.shadow_map_size) } else { "off".to_string() },
        districts,
        roads
    );
    println!("Ground:    {:.0} x {:.0}", ground.half_size * 2.0, ground.half_size * 2.0);
    println!("Frame:     {:.2}ms", frame_ms);
    println!();

    let views = manager.building_views();
    print_tiers(&views);
    print_patterns(&views);
    print_health(&views);

    if let Some(selected) = manager.interaction().selected() {
        println!("Selected: {}", selected);
        let connected = manager.interaction().connected();
        if connected.is_empty() {
            println!("  no connected buildings");
        }
        for id in connected {
            println!("  -> {}", id);
        }
    }
    Ok(())
}

fn print_tiers(views: &[BuildingView]) {
    let mut histogram = BTreeMap::new();
    for view in views {
        *histogram.entry(view.tier).or_insert(0usize) += 1;
    }
    println!("Tiers:");
    for (tier, count) in &histogram {
        println!("  {:<12} {}", tier.name(), count);
    }
    println!();
}

fn print_patterns(views: &[BuildingView]) {
    println!("Patterns:");
    let mut any = false;
    for view in views {
        if let (Some(pattern), Some(severity)) = (view.pattern, view.severity) {
            println!("  {:<40} {:<12} {:?}", view.id, pattern.name(), severity);
            any = true;
        }
    }
    if !any {
        println!("  none");
    }
    println!();
}

fn print_health(views: &[BuildingView]) {
    let mut worst: Vec<&BuildingView> = views.iter().collect();
    worst.sort_by_key(|v| (v.health_score, v.index));
    println!("Lowest health:");
    for view in worst.iter().take(WORST_HEALTH_COUNT) {
        println!("  {:<40} {:>3} {:?}", view.id, view.health_score, view.health_grade);
    }
    println!();
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
