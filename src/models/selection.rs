// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Set of record ids the user marked for a selective download.

use std::collections::HashSet;

/// Selected record ids. Order is irrelevant; ids are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    /// Add `id` when `selected`, remove it otherwise. Repeating a toggle is a no-op.
    pub fn toggle(&mut self, id: &str, selected: bool) {
        if selected {
            if !self.ids.contains(id) {
                self.ids.insert(id.to_string());
            }
        } else {
            self.ids.remove(id);
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop every id not yielded by `known`. Returns how many were dropped.
    pub fn retain_known<'a>(&mut self, known: impl IntoIterator<Item = &'a str>) -> usize {
        let known: HashSet<&str> = known.into_iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| known.contains(id.as_str()));
        before - self.ids.len()
    }
}
