//! Batch selection scoped to the visible list

use std::collections::HashSet;

use super::types::EntityId;

/// What the renderer needs to draw selection affordances
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub selected_ids: Vec<EntityId>,
    pub selected_count: usize,
    pub has_selection: bool,
}

/// Selected ids of one list view.
///
/// With `prune_on_filter_change` every selected id is also visible. Without it,
/// selections made under an earlier filter survive until cleared.
#[derive(Clone, Debug, Default)]
pub struct SelectionSet {
    selected: HashSet<EntityId>,
    visible: Vec<EntityId>,
    prune_on_filter_change: bool,
}

impl SelectionSet {
    pub fn new(prune_on_filter_change: bool) -> Self {
        Self {
            selected: HashSet::new(),
            visible: Vec::new(),
            prune_on_filter_change,
        }
    }

    /// Rescope to a new visible list
    pub fn set_visible(&mut self, ids: Vec<EntityId>) {
        self.visible = ids;
        if self.prune_on_filter_change {
            let visible: HashSet<_> = self.visible.iter().copied().collect();
            let before = self.selected.len();
            self.selected.retain(|id| visible.contains(id));
            let pruned = before - self.selected.len();
            if pruned > 0 {
                tracing::debug!(pruned, remaining = self.selected.len(), "Pruned hidden selections");
            }
        }
    }

    pub fn is_visible(&self, id: EntityId) -> bool {
        self.visible.contains(&id)
    }

    /// Flip one id. Ids outside the visible list are ignored; returns whether
    /// the id is selected afterwards.
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if !self.selected.remove(&id) {
            if !self.is_visible(id) {
                tracing::debug!(id, "Ignoring toggle of id outside the visible list");
                return false;
            }
            self.selected.insert(id);
            return true;
        }
        false
    }

    /// Select exactly the visible ids
    pub fn select_all(&mut self) {
        self.selected = self.visible.iter().copied().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Keep only the given ids selected
    pub fn retain_only(&mut self, ids: &[EntityId]) {
        let keep: HashSet<_> = ids.iter().copied().collect();
        self.selected.retain(|id| keep.contains(id));
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in visible order, followed by retained hidden ones in id order
    pub fn selected_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self
            .visible
            .iter()
            .copied()
            .filter(|id| self.selected.contains(id))
            .collect();
        let mut hidden: Vec<_> = self
            .selected
            .iter()
            .copied()
            .filter(|id| !self.visible.contains(id))
            .collect();
        hidden.sort_unstable();
        ids.extend(hidden);
        ids
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected_ids: self.selected_ids(),
            selected_count: self.selected_count(),
            has_selection: self.has_selection(),
        }
    }
}
