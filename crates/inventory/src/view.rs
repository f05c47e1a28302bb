//! In-memory item list plus the transient selection used by bulk actions.

use std::collections::HashSet;

use homestock_core::{Cost, Entity, ItemId};

use crate::item::Item;

/// The list the user currently sees, and which of its items are marked.
///
/// Invariants:
/// - selection only ever contains ids present in `items`
/// - selection is empty right after `replace` and after leaving select mode
/// - nothing can be selected outside select mode
#[derive(Debug, Clone, Default)]
pub struct InventoryView {
    items: Vec<Item>,
    selected: HashSet<ItemId>,
    select_mode: bool,
    revision: u64,
}

impl InventoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly parsed list. Selection never survives this.
    pub fn replace(&mut self, items: Vec<Item>) -> u64 {
        self.items = items;
        self.selected.clear();
        self.revision += 1;
        self.revision
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Incremented on every `replace`; 0 until the first snapshot lands.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sum of all item costs, `None` on overflow.
    pub fn total_cost(&self) -> Option<Cost> {
        self.items
            .iter()
            .try_fold(Cost::ZERO, |acc, item| acc.checked_add(item.cost()))
    }

    pub fn in_select_mode(&self) -> bool {
        self.select_mode
    }

    pub fn enter_select_mode(&mut self) {
        self.select_mode = true;
    }

    /// Leave select mode and unmark everything.
    pub fn exit_select_mode(&mut self) {
        self.select_mode = false;
        self.selected.clear();
    }

    /// Flip one item's mark. Returns the new state; unknown ids and calls
    /// outside select mode leave the selection untouched and return `false`.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        let selected = !self.selected.contains(id);
        self.set_selected(id, selected)
    }

    /// Mark or unmark one item. Returns whether it is selected afterwards.
    pub fn set_selected(&mut self, id: &ItemId, selected: bool) -> bool {
        if !self.select_mode || self.get(id).is_none() {
            return false;
        }
        if selected {
            self.selected.insert(id.clone());
        } else {
            self.selected.remove(id);
        }
        selected
    }

    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected items, in list order. Empty is a normal answer.
    pub fn selected_items(&self) -> Vec<Item> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(item.id()))
            .cloned()
            .collect()
    }

    /// Unmark everything without leaving select mode.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}
