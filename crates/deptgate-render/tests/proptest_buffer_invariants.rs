//! Property tests for buffer writes and the row-diffing presenter.

use deptgate_render::buffer::Buffer;
use deptgate_render::cell::Cell;
use deptgate_render::presenter::Presenter;
use proptest::prelude::*;

fn glyph() -> impl Strategy<Value = char> {
    prop_oneof![
        proptest::char::range('a', 'z'),
        Just('漢'),
        Just('─'),
    ]
}

proptest! {
    #[test]
    fn writes_never_escape_bounds(
        w in 0u16..20,
        h in 0u16..10,
        writes in proptest::collection::vec((0u16..30, 0u16..15, glyph()), 0..40),
    ) {
        let mut buf = Buffer::new(w, h);
        for (x, y, ch) in writes {
            buf.set(x, y, Cell::from_char(ch));
        }
        prop_assert_eq!(buf.width(), w);
        prop_assert_eq!(buf.height(), h);
        for y in 0..h {
            prop_assert_eq!(buf.row_cells(y).len(), w as usize);
        }
    }

    #[test]
    fn rows_written_matches_changed_rows(
        writes in proptest::collection::vec((0u16..8, 0u16..6, proptest::char::range('a', 'z')), 0..20),
    ) {
        let prev = Buffer::new(8, 6);
        let mut next = prev.clone();
        for (x, y, ch) in writes {
            next.set(x, y, Cell::from_char(ch));
        }
        let changed = (0..6).filter(|&y| prev.row_cells(y) != next.row_cells(y)).count();
        let mut presenter = Presenter::new(Vec::new());
        let rows = presenter.present(&next, Some(&prev), None).expect("present");
        prop_assert_eq!(rows, changed);
    }
}
