//! City data model: the analysis snapshot this engine renders, its
//! normalization to the scene origin, and a built-in demo dataset.

pub mod model;
pub mod normalize;
pub mod demo;

pub use model::{
    Building, BuildingMetrics, CitySnapshot, CityStats, Dimensions, District, GroundPosition,
    PlanePoint, Road,
};
pub use normalize::{normalize, NormalizedLayout};
pub use demo::{demo_city, grid_city};
