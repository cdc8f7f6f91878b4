//! Scene data for the renderer: the render-mode switch, the discrete and
//! instanced building paths, highlight tinting, roads and districts.
//!
//! Nothing here talks to a GPU device. The embedding renderer uploads the
//! vertex, index and instance data using the layouts exposed here.

pub mod mode;
pub mod highlight;
pub mod discrete;
pub mod instancing;
pub mod roads;
pub mod districts;

pub use mode::{select_render_mode, RenderConfig, RenderMode};
pub use highlight::Highlight;
pub use discrete::{DrawItem, DrawList, RecipeKey, RecipeLibrary};
pub use instancing::{InstanceBatch, InstanceColor, InstanceTransform};
pub use roads::{RoadConfig, RoadNetwork, RoadPath};
pub use districts::{build_regions, DistrictRegion};
