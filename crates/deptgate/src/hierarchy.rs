#![forbid(unsafe_code)]

//! Department selector state.
//!
//! Expansion and selection are two independent [`ToggleMap`]s keyed by
//! different id types. Collapsing a department hides its children but never
//! touches their checked flags.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use deptgate_widgets::check_tree::TreeRow;

use crate::domain::{DepartmentId, DepartmentTree, SubDepartmentId};

/// Boolean flags keyed by id; unseen ids read as `false`.
///
/// Entries are only ever added or flipped, never removed.
#[derive(Debug, Clone)]
pub struct ToggleMap<K> {
    entries: HashMap<K, bool>,
}

impl<K> Default for ToggleMap<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ToggleMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: K) -> bool {
        self.entries.get(&key).copied().unwrap_or(false)
    }

    /// Flip `key` and return its new value.
    pub fn toggle(&mut self, key: K) -> bool {
        let entry = self.entries.entry(key).or_insert(false);
        *entry = !*entry;
        *entry
    }

    /// Number of keys that have ever been toggled.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type ExpansionState = ToggleMap<DepartmentId>;
pub type SelectionState = ToggleMap<SubDepartmentId>;

/// A row the selector currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleRow {
    Department(DepartmentId),
    SubDepartment {
        parent: DepartmentId,
        id: SubDepartmentId,
    },
}

/// Tree plus expansion, selection, and a cursor over visible rows.
#[derive(Debug, Clone)]
pub struct HierarchySelector {
    tree: Arc<DepartmentTree>,
    expansion: ExpansionState,
    selection: SelectionState,
    cursor: usize,
}

impl HierarchySelector {
    /// Everything collapsed and unchecked, cursor on the first row.
    pub fn new(tree: Arc<DepartmentTree>) -> Self {
        Self {
            tree,
            expansion: ExpansionState::new(),
            selection: SelectionState::new(),
            cursor: 0,
        }
    }

    pub fn tree(&self) -> &DepartmentTree {
        &self.tree
    }

    pub fn is_expanded(&self, id: DepartmentId) -> bool {
        self.expansion.get(id)
    }

    pub fn is_selected(&self, id: SubDepartmentId) -> bool {
        self.selection.get(id)
    }

    /// Flip a department's expansion. Selection is untouched.
    pub fn toggle_department(&mut self, id: DepartmentId) -> bool {
        let expanded = self.expansion.toggle(id);
        tracing::debug!(%id, expanded, "department toggled");
        self.clamp_cursor();
        expanded
    }

    /// Flip one sub-department's checked flag. Expansion is untouched.
    pub fn toggle_sub_department(&mut self, id: SubDepartmentId) -> bool {
        let checked = self.selection.toggle(id);
        tracing::debug!(%id, checked, "sub-department toggled");
        checked
    }

    /// Rows in display order: each department, then its children if expanded.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        for dept in self.tree.departments() {
            rows.push(VisibleRow::Department(dept.id));
            if self.expansion.get(dept.id) {
                rows.extend(dept.children.iter().map(|sub| VisibleRow::SubDepartment {
                    parent: dept.id,
                    id: sub.id,
                }));
            }
        }
        rows
    }

    /// Visible rows as widget rows with labels and markers.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for dept in self.tree.departments() {
            let expanded = self.expansion.get(dept.id);
            rows.push(TreeRow::group(dept.name.clone(), expanded));
            if expanded {
                rows.extend(
                    dept.children
                        .iter()
                        .map(|sub| TreeRow::item(sub.name.clone(), self.selection.get(sub.id))),
                );
            }
        }
        rows
    }

    /// Checked sub-departments in tree order, including hidden ones.
    pub fn selected(&self) -> Vec<SubDepartmentId> {
        self.tree
            .departments()
            .iter()
            .flat_map(|d| d.children.iter())
            .map(|s| s.id)
            .filter(|id| self.selection.get(*id))
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn row_at_cursor(&self) -> Option<VisibleRow> {
        self.visible_rows().get(self.cursor).copied()
    }

    pub fn cursor_up(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn cursor_down(&mut self) -> bool {
        if self.cursor + 1 >= self.visible_rows().len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Toggle whatever row the cursor is on.
    pub fn toggle_at_cursor(&mut self) -> bool {
        match self.row_at_cursor() {
            Some(VisibleRow::Department(id)) => {
                self.toggle_department(id);
                true
            }
            Some(VisibleRow::SubDepartment { id, .. }) => {
                self.toggle_sub_department(id);
                true
            }
            None => false,
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> HierarchySelector {
        HierarchySelector::new(Arc::new(DepartmentTree::standard()))
    }

    #[test]
    fn starts_collapsed() {
        let sel = selector();
        assert_eq!(
            sel.visible_rows(),
            vec![
                VisibleRow::Department(DepartmentId(1)),
                VisibleRow::Department(DepartmentId(2)),
            ]
        );
        assert!(sel.selected().is_empty());
    }

    #[test]
    fn expanding_shows_children() {
        let mut sel = selector();
        assert!(sel.toggle_department(DepartmentId(2)));
        let rows = sel.visible_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[2],
            VisibleRow::SubDepartment {
                parent: DepartmentId(2),
                id: SubDepartmentId(3)
            }
        );
    }

    #[test]
    fn selection_survives_collapse() {
        let mut sel = selector();
        sel.toggle_department(DepartmentId(1));
        sel.toggle_sub_department(SubDepartmentId(2));
        sel.toggle_department(DepartmentId(1));
        assert!(!sel.is_expanded(DepartmentId(1)));
        assert!(sel.is_selected(SubDepartmentId(2)));
        sel.toggle_department(DepartmentId(1));
        assert!(sel.is_selected(SubDepartmentId(2)));
        assert_eq!(sel.selected(), vec![SubDepartmentId(2)]);
    }

    #[test]
    fn cursor_toggles_rows() {
        let mut sel = selector();
        assert!(sel.toggle_at_cursor());
        assert!(sel.is_expanded(DepartmentId(1)));
        assert!(sel.cursor_down());
        assert!(sel.toggle_at_cursor());
        assert!(sel.is_selected(SubDepartmentId(1)));
        assert!(!sel.is_expanded(DepartmentId(2)));
    }

    #[test]
    fn cursor_is_clamped_after_collapse() {
        let mut sel = selector();
        sel.toggle_department(DepartmentId(2));
        while sel.cursor_down() {}
        assert_eq!(sel.cursor(), 3);
        sel.toggle_department(DepartmentId(2));
        assert_eq!(sel.cursor(), 1);
        assert!(!sel.cursor_down());
    }

    #[test]
    fn tree_rows_carry_markers() {
        let mut sel = selector();
        sel.toggle_department(DepartmentId(1));
        sel.toggle_sub_department(SubDepartmentId(1));
        let rows = sel.tree_rows();
        assert_eq!(rows[0], TreeRow::group("Human Resources", true));
        assert_eq!(rows[1], TreeRow::item("Recruitment", true));
        assert_eq!(rows[2], TreeRow::item("Employee Relations", false));
        assert_eq!(rows[3], TreeRow::group("IT Department", false));
    }

    #[test]
    fn toggle_map_defaults_false() {
        let mut map: ToggleMap<u8> = ToggleMap::new();
        assert!(!map.get(7));
        assert!(map.toggle(7));
        assert!(!map.toggle(7));
        assert_eq!(map.len(), 1);
    }
}
