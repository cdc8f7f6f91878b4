//! 2D overview map: projection of the city layout and click hit testing

pub mod projector;

pub use projector::{Minimap, MinimapConfig, MinimapDistrict, MinimapPoint, MinimapProjection};
