use super::*;

#[test]
fn new_checks_cell_count() {
    assert!(GlyphGrid::new(2, 3, vec!['a'; 6]).is_ok());
    assert!(GlyphGrid::new(2, 3, vec!['a'; 5]).is_err());
}

#[test]
fn row_major_access() {
    let g = GlyphGrid::new(2, 2, vec!['a', 'b', 'c', 'd']).unwrap();
    assert_eq!(g.get(0, 1), Some('b'));
    assert_eq!(g.get(1, 0), Some('c'));
    assert_eq!(g.get(2, 0), None);
    assert_eq!(g.row(1), Some(&['c', 'd'][..]));
}

#[test]
fn text_keeps_trailing_spaces_and_newline() {
    let g = GlyphGrid::new(2, 3, vec!['#', ' ', ' ', ' ', ' ', ' ']).unwrap();
    assert_eq!(g.to_text(), "#  \n   \n");
    assert_eq!(g.to_text().lines().count(), g.rows());
}
