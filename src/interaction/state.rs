//! Hover and selection state, and the connected set derived from it.
//!
//! Single selection, single hover. The connected set is recomputed only
//! when the selection changes.

use std::collections::{BTreeSet, HashMap};

use crate::city::Road;

/// Cursor the embedding app should show
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    Pointer,
}

/// Ids of buildings one road away from `selected`. Roads whose other
/// endpoint is not a known building are skipped, as are self-loops.
pub fn connected_set(selected: &str, roads: &[Road], known: &HashMap<String, usize>) -> BTreeSet<String> {
    roads
        .iter()
        .filter_map(|road| road.other_endpoint(selected))
        .filter(|other| *other != selected && known.contains_key(*other))
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    hovered: Option<String>,
    selected: Option<String>,
    connected: BTreeSet<String>,
    cursor: CursorHint,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn connected(&self) -> &BTreeSet<String> {
        &self.connected
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.as_deref() == Some(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn is_connected(&self, id: &str) -> bool {
        self.connected.contains(id)
    }

    /// Pointer entered a building. Returns true if the hover changed.
    pub fn pointer_over(&mut self, id: &str) -> bool {
        self.cursor = CursorHint::Pointer;
        if self.is_hovered(id) {
            return false;
        }
        self.hovered = Some(id.to_string());
        true
    }

    /// Pointer left a building. Only clears the hover if it still refers
    /// to `id`, so a late pointer-out from a neighbour is ignored.
    pub fn pointer_out(&mut self, id: &str) -> bool {
        if !self.is_hovered(id) {
            return false;
        }
        self.hovered = None;
        self.cursor = CursorHint::Default;
        true
    }

    /// Select a building, replacing any previous selection. Returns true if
    /// the selection changed.
    pub fn click(&mut self, id: &str, roads: &[Road], known: &HashMap<String, usize>) -> bool {
        if self.is_selected(id) {
            return false;
        }
        self.selected = Some(id.to_string());
        self.connected = connected_set(id, roads, known);
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.selected = None;
        self.connected.clear();
        true
    }

    /// Forget everything, e.g. when the snapshot is replaced
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
