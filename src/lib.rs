//! Codecity - procedural scene generation and code-quality classification
//! for 3D code cities
//!
//! Turns an analysis snapshot (files as buildings, folders as districts,
//! imports as roads) into render-ready scene data: tiered building
//! recipes, instanced batches, LOD settings, highlight colors and a
//! minimap, plus design-smell and health classification per building.

pub mod core;
pub mod math;
pub mod city;
pub mod generation;
pub mod analysis;
pub mod render;
pub mod scene;
pub mod interaction;
pub mod minimap;
