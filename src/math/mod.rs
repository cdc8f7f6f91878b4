//! Mathematical utilities: bounding boxes and rays

pub mod aabb;
pub mod ray;

pub use aabb::{Aabb, Rect};
pub use ray::Ray;
