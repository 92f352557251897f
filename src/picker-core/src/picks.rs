//! The ordered list of picked items and its de-dupe index.

use indexmap::IndexSet;

use crate::item::Item;

/// Picked items plus an index of their value keys.
///
/// The index always holds exactly the value keys of the picked items; every
/// mutation rebuilds it before returning.
#[derive(Debug, Clone)]
pub struct PickSet {
    picks: Vec<Item>,
    index: IndexSet<String>,
    value_field: String,
    multiple: bool,
}

impl PickSet {
    pub fn new(value_field: impl Into<String>, multiple: bool) -> Self {
        Self {
            picks: Vec::new(),
            index: IndexSet::new(),
            value_field: value_field.into(),
            multiple,
        }
    }

    /// Adds a pick. Single-pick mode replaces the whole set.
    ///
    /// Returns `false` without changing anything if multi-pick mode already
    /// holds an item with the same value.
    pub fn add(&mut self, item: Item) -> bool {
        if self.multiple {
            if self.contains(&item) {
                return false;
            }
            self.picks.push(item);
        } else {
            self.picks = vec![item];
        }
        self.rebuild_index();
        true
    }

    /// Removes the pick at `index`, if there is one.
    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index >= self.picks.len() {
            return None;
        }
        let removed = self.picks.remove(index);
        self.rebuild_index();
        Some(removed)
    }

    /// Whether an item with the same value is already picked.
    pub fn contains(&self, item: &Item) -> bool {
        item.key(&self.value_field)
            .is_some_and(|key| self.index.contains(&key))
    }

    /// Whether `key` is the value of a picked item.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    /// Drops every candidate that is already picked.
    pub fn retain_unpicked(&self, choices: &mut Vec<Item>) {
        choices.retain(|item| !self.contains(item));
    }

    pub fn items(&self) -> &[Item] {
        &self.picks
    }

    /// Value keys of the picks, in pick order.
    pub fn selections(&self) -> Vec<String> {
        self.index.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .picks
            .iter()
            .filter_map(|item| item.key(&self.value_field))
            .collect();
    }
}
