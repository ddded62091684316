use crate::foundation::error::{GlyphError, GlyphResult};

/// Row-major grid of glyphs, one per source pixel block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    rows: usize,
    cols: usize,
    cells: Vec<char>,
}

impl GlyphGrid {
    pub fn new(rows: usize, cols: usize, cells: Vec<char>) -> GlyphResult<Self> {
        if rows.checked_mul(cols) != Some(cells.len()) {
            return Err(GlyphError::validation(format!(
                "glyph grid {rows}x{cols} does not match {} cells",
                cells.len()
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[char]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Each row as a `String`, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| row.iter().collect::<String>())
    }

    /// Rows joined by `\n` with a trailing newline; whitespace is kept as-is.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.rows);
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/grid.rs"]
mod tests;
