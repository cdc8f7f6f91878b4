//! Scene orchestration: configuration, derived-data caching, LOD and the
//! per-frame assembly of render data.
//!
//! `SceneManager` is the entry point for an embedding application: feed it
//! snapshots and pointer input, call `advance_frame` and `build_frame`
//! once per frame, and drain its events.

pub mod config;
pub mod lod;
pub mod cache;
pub mod frame;
pub mod manager;

pub use config::SceneConfig;
pub use lod::{lod_from_distance, LodConfig, LodLevel, LodSettings, LodState};
pub use cache::{DerivedCache, DerivedData, DerivedKey};
pub use frame::{BuildingsFrame, GroundPlane, SceneFrame};
pub use manager::{BuildingView, SceneEvent, SceneManager};
