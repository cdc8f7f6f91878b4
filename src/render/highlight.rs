//! Interaction tinting shared by both render paths

use crate::core::types::Vec3;
use crate::generation::palette::shade;
use crate::interaction::InteractionState;

const SELECTED_TINT: Vec3 = Vec3::new(1.0, 0.9, 0.55);
const CONNECTED_TINT: Vec3 = Vec3::new(0.2, 0.9, 1.0);

/// Strongest interaction state of a building. Selected beats hovered beats
/// connected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Highlight {
    #[default]
    None,
    Connected,
    Hovered,
    Selected,
}

impl Highlight {
    pub fn of(id: &str, interaction: &InteractionState) -> Self {
        if interaction.is_selected(id) {
            Highlight::Selected
        } else if interaction.is_hovered(id) {
            Highlight::Hovered
        } else if interaction.is_connected(id) {
            Highlight::Connected
        } else {
            Highlight::None
        }
    }

    /// Tinted version of a base color
    pub fn apply(self, base: Vec3) -> Vec3 {
        match self {
            Highlight::None => base,
            Highlight::Connected => base.lerp(CONNECTED_TINT, 0.4),
            Highlight::Hovered => shade(base, 1.3),
            Highlight::Selected => base.lerp(SELECTED_TINT, 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::Road;
    use std::collections::HashMap;

    #[test]
    fn test_priority() {
        let known: HashMap<String, usize> = [("a".to_string(), 0), ("b".to_string(), 1)].into();
        let mut state = InteractionState::new();
        state.click("a", &[Road::new("a", "b")], &known);
        state.pointer_over("a");
        assert_eq!(Highlight::of("a", &state), Highlight::Selected);
        assert_eq!(Highlight::of("b", &state), Highlight::Connected);

        state.pointer_over("b");
        assert_eq!(Highlight::of("b", &state), Highlight::Hovered);
        assert_eq!(Highlight::of("c", &state), Highlight::None);
    }

    #[test]
    fn test_none_is_identity() {
        let c = Vec3::new(0.2, 0.4, 0.6);
        assert_eq!(Highlight::None.apply(c), c);
        assert_ne!(Highlight::Selected.apply(c), c);
        assert_ne!(Highlight::Connected.apply(c), c);
        assert_ne!(Highlight::Hovered.apply(c), c);
    }
}
