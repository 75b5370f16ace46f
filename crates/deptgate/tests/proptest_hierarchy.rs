//! Property tests for expansion and selection independence.

use std::sync::Arc;

use deptgate::domain::{DepartmentId, DepartmentTree, SubDepartmentId};
use deptgate::hierarchy::HierarchySelector;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Department(u32),
    Sub(u32),
    Up,
    Down,
    Cursor,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..=2).prop_map(Op::Department),
        (1u32..=4).prop_map(Op::Sub),
        Just(Op::Up),
        Just(Op::Down),
        Just(Op::Cursor),
    ]
}

fn apply(sel: &mut HierarchySelector, op: Op) {
    match op {
        Op::Department(id) => {
            sel.toggle_department(DepartmentId(id));
        }
        Op::Sub(id) => {
            sel.toggle_sub_department(SubDepartmentId(id));
        }
        Op::Up => {
            sel.cursor_up();
        }
        Op::Down => {
            sel.cursor_down();
        }
        Op::Cursor => {
            sel.toggle_at_cursor();
        }
    }
}

fn snapshot(sel: &HierarchySelector) -> (Vec<bool>, Vec<bool>) {
    let expanded = (1..=2).map(|i| sel.is_expanded(DepartmentId(i))).collect();
    let selected = (1..=4).map(|i| sel.is_selected(SubDepartmentId(i))).collect();
    (expanded, selected)
}

fn selector() -> HierarchySelector {
    HierarchySelector::new(Arc::new(DepartmentTree::standard()))
}

proptest! {
    #[test]
    fn double_toggle_restores_selection(
        ops in proptest::collection::vec(op(), 0..40),
        target in 1u32..=4,
    ) {
        let mut sel = selector();
        for o in ops {
            apply(&mut sel, o);
        }
        let before = snapshot(&sel);
        sel.toggle_sub_department(SubDepartmentId(target));
        sel.toggle_sub_department(SubDepartmentId(target));
        prop_assert_eq!(snapshot(&sel), before);
    }

    #[test]
    fn toggle_changes_only_its_target(
        ops in proptest::collection::vec(op(), 0..40),
        target in 1u32..=4,
    ) {
        let mut sel = selector();
        for o in ops {
            apply(&mut sel, o);
        }
        let (expanded, selected) = snapshot(&sel);
        sel.toggle_sub_department(SubDepartmentId(target));
        let (expanded_after, selected_after) = snapshot(&sel);
        prop_assert_eq!(expanded, expanded_after);
        for (i, (a, b)) in selected.iter().zip(&selected_after).enumerate() {
            if i as u32 + 1 == target {
                prop_assert_ne!(a, b);
            } else {
                prop_assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn department_toggles_never_touch_selection(
        ops in proptest::collection::vec(op(), 0..40),
        dept in 1u32..=2,
        flips in 1usize..5,
    ) {
        let mut sel = selector();
        for o in ops {
            apply(&mut sel, o);
        }
        let (_, selected) = snapshot(&sel);
        for _ in 0..flips {
            sel.toggle_department(DepartmentId(dept));
        }
        prop_assert_eq!(snapshot(&sel).1, selected);
    }

    #[test]
    fn cursor_stays_on_a_visible_row(ops in proptest::collection::vec(op(), 0..60)) {
        let mut sel = selector();
        for o in ops {
            apply(&mut sel, o);
            prop_assert!(sel.cursor() < sel.visible_rows().len());
            prop_assert_eq!(sel.tree_rows().len(), sel.visible_rows().len());
        }
    }
}
