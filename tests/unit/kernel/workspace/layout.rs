use super::*;

fn row0(layout: &TabLayout) -> RowId {
    layout.rows()[0].id
}

#[test]
fn new_layout_has_one_current_empty_row() {
    let layout = TabLayout::new();
    assert_eq!(layout.rows().len(), 1);
    assert_eq!(layout.current_row_id(), Some(row0(&layout)));
    assert_eq!(layout.current_tab_id(), None);
    layout.check_invariants().unwrap();
}

#[test]
fn add_tab_appends_and_focuses() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let a = layout.add_tab(row, "/p/a.rs", false);
    let b = layout.add_tab(row, "/p/b.rs", false);

    assert_eq!(layout.row(row).unwrap().tab_ids, vec![a, b]);
    assert_eq!(layout.current_tab_id(), Some(b));
    assert_eq!(layout.tab(a).unwrap().row_id, row);
    layout.check_invariants().unwrap();
}

#[test]
fn add_tab_to_unknown_row_creates_current_row() {
    let mut layout = TabLayout::new();
    let first = row0(&layout);
    let tab = layout.add_tab(RowId::new(999), "/p/a.rs", false);

    assert_eq!(layout.rows().len(), 2);
    let new_row = layout.rows()[1].id;
    assert_ne!(new_row, first);
    assert_eq!(layout.current_row_id(), Some(new_row));
    assert_eq!(layout.tab(tab).unwrap().row_id, new_row);
    layout.check_invariants().unwrap();
}

#[test]
fn removing_only_tab_of_only_row_keeps_an_empty_row() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let tab = layout.add_tab(row, "/p/a.rs", false);

    assert!(layout.remove_tab(tab));

    assert_eq!(layout.rows().len(), 1);
    assert!(layout.rows()[0].tab_ids.is_empty());
    assert_eq!(layout.current_tab_id(), None);
    assert!(layout.current_row_id().is_some());
    layout.check_invariants().unwrap();
}

#[test]
fn removing_only_tab_of_a_row_deletes_that_row() {
    let mut layout = TabLayout::new();
    let first = row0(&layout);
    layout.add_tab(first, "/p/a.rs", false);
    let second = layout.add_row();
    let lone = layout.add_tab(second, "/p/b.rs", false);
    layout.set_current_row(second);

    layout.remove_tab(lone);

    assert!(layout.row(second).is_none());
    assert_eq!(layout.rows().len(), 1);
    assert_eq!(layout.current_row_id(), Some(first));
    layout.check_invariants().unwrap();
}

#[test]
fn removing_current_tab_focuses_first_remaining_in_row() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let a = layout.add_tab(row, "/p/a.rs", false);
    let _b = layout.add_tab(row, "/p/b.rs", false);
    let c = layout.add_tab(row, "/p/c.rs", false);

    layout.remove_tab(c);
    assert_eq!(layout.current_tab_id(), Some(a));
}

#[test]
fn removing_other_tab_keeps_focus() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let a = layout.add_tab(row, "/p/a.rs", false);
    let b = layout.add_tab(row, "/p/b.rs", false);

    layout.remove_tab(a);
    assert_eq!(layout.current_tab_id(), Some(b));
}

#[test]
fn removing_unknown_tab_is_a_noop() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let a = layout.add_tab(row, "/p/a.rs", false);

    assert!(!layout.remove_tab(TabId::new(42)));
    assert_eq!(layout.current_tab_id(), Some(a));
    assert_eq!(layout.tab_count(), 1);
}

#[test]
fn remove_row_drops_its_tabs() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let a = layout.add_tab(row, "/p/a.rs", false);

    assert!(layout.remove_row(row));

    assert!(layout.tab(a).is_none());
    assert_eq!(layout.rows().len(), 1);
    assert_eq!(layout.current_tab_id(), None);
    layout.check_invariants().unwrap();
}

#[test]
fn tab_cycling_wraps_and_inverts() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let ids: Vec<_> = (0..4)
        .map(|i| layout.add_tab(row, format!("/p/{i}.rs"), false))
        .collect();

    let mut cursor = ids[1];
    for _ in 0..ids.len() {
        cursor = layout.next_tab(cursor).unwrap();
    }
    assert_eq!(cursor, ids[1]);

    assert_eq!(layout.next_tab(ids[3]), Some(ids[0]));
    assert_eq!(layout.prev_tab(ids[0]), Some(ids[3]));
    for id in &ids {
        let next = layout.next_tab(*id).unwrap();
        assert_eq!(layout.prev_tab(next), Some(*id));
    }
}

#[test]
fn single_tab_cycles_to_itself_and_unknown_is_none() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let a = layout.add_tab(row, "/p/a.rs", false);

    assert_eq!(layout.next_tab(a), Some(a));
    assert_eq!(layout.prev_tab(a), Some(a));
    assert_eq!(layout.next_tab(TabId::new(77)), None);
}

#[test]
fn row_navigation_wraps_and_focuses_first_tab() {
    let mut layout = TabLayout::new();
    let first = row0(&layout);
    let a = layout.add_tab(first, "/p/a.rs", false);
    let second = layout.add_row();
    let b = layout.add_tab(second, "/p/b.rs", false);
    layout.add_tab(second, "/p/c.rs", false);
    let third = layout.add_row();

    assert_eq!(
        layout.next_row(first),
        RowNavigation::Row {
            row: second,
            focus: Some(b)
        }
    );
    assert_eq!(layout.current_row_id(), Some(second));
    assert_eq!(layout.current_tab_id(), Some(b));

    // An empty target row keeps the previous tab focus.
    assert_eq!(
        layout.next_row(second),
        RowNavigation::Row {
            row: third,
            focus: None
        }
    );
    assert_eq!(layout.current_tab_id(), Some(b));

    assert_eq!(
        layout.next_row(third),
        RowNavigation::Row {
            row: first,
            focus: Some(a)
        }
    );
    assert_eq!(
        layout.prev_row(first),
        RowNavigation::Row {
            row: third,
            focus: None
        }
    );
    layout.check_invariants().unwrap();
}

#[test]
fn single_row_navigation_is_configurable() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let a = layout.add_tab(row, "/p/a.rs", false);

    assert_eq!(layout.next_row(row), RowNavigation::Overview);
    assert_eq!(layout.prev_row(row), RowNavigation::Overview);

    layout.set_single_row_navigation(SingleRowNavigation::Stay);
    assert_eq!(
        layout.next_row(row),
        RowNavigation::Row {
            row,
            focus: Some(a)
        }
    );
    assert_eq!(layout.next_row(RowId::new(999)), RowNavigation::None);
}

#[test]
fn find_tab_by_path_and_set_current() {
    let mut layout = TabLayout::new();
    let row = row0(&layout);
    let a = layout.add_tab(row, "/p/a.rs", false);
    layout.add_tab(row, "/p/b.rs", true);

    assert_eq!(layout.find_tab_by_path(Path::new("/p/a.rs")).unwrap().id, a);
    assert!(layout.find_tab_by_path(Path::new("/p/z.rs")).is_none());
    assert!(layout.set_current_tab(a));
    assert_eq!(layout.current_tab_id(), Some(a));
    assert!(!layout.set_current_tab(TabId::new(1000)));
    assert!(!layout.set_current_row(RowId::new(1000)));
}

#[test]
fn invariants_hold_across_random_sequences() {
    // Small xorshift so the sequence is reproducible.
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let mut layout = TabLayout::new();
    let mut live: Vec<TabId> = Vec::new();
    for step in 0..2000 {
        match next() % 5 {
            0 | 1 => {
                let rows = layout.rows();
                let row = if next() % 7 == 0 {
                    RowId::new(10_000 + step)
                } else {
                    rows[(next() as usize) % rows.len()].id
                };
                live.push(layout.add_tab(row, format!("/p/{step}.rs"), false));
            }
            2 if !live.is_empty() => {
                let index = (next() as usize) % live.len();
                let id = live.swap_remove(index);
                assert!(layout.remove_tab(id));
            }
            3 => {
                layout.add_row();
            }
            _ => {
                let from = layout.current_row_id().unwrap();
                layout.next_row(from);
            }
        }
        layout.check_invariants().unwrap_or_else(|e| panic!("step {step}: {e}"));
        assert_eq!(layout.tab_count(), live.len());
    }
}
