//! Pointer interaction: hover/selection state and ray picking

pub mod state;
pub mod picking;

pub use state::{connected_set, CursorHint, InteractionState};
pub use picking::{building_bounds, pick_building};
