use std::fmt;

use crate::cell::Cell;

/// A maze grid in cell units (walls included): `2*W+1` columns by `2*H+1` rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    rows: Vec<Vec<Cell>>,
}

impl Layout {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Reads the line-delimited text encoding. No validation happens here.
    pub fn decode(text: &str) -> Self {
        let rows = text
            .split('\n')
            .map(|line| line.chars().map(Cell::from_symbol).collect())
            .collect();
        Self { rows }
    }

    pub fn encode(&self) -> String {
        let mut text = String::with_capacity(self.height() * (self.width() + 1));
        for (idx, row) in self.rows.iter().enumerate() {
            if idx > 0 {
                text.push('\n');
            }
            text.extend(row.iter().map(|cell| cell.symbol()));
        }
        text
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Size in play squares as `(width, height)`.
    pub fn play_size(&self) -> (usize, usize) {
        (
            self.width().saturating_sub(1) / 2,
            self.height().saturating_sub(1) / 2,
        )
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Replaces a cell, returning the previous one, or `None` when out of bounds.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Option<Cell> {
        let slot = self.rows.get_mut(row)?.get_mut(col)?;
        Some(std::mem::replace(slot, cell))
    }

    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.height() || col + 1 == self.width()
    }

    pub fn find(&self, target: Cell) -> Option<(usize, usize)> {
        for (row, cells) in self.rows.iter().enumerate() {
            if let Some(col) = cells.iter().position(|c| *c == target) {
                return Some((row, col));
            }
        }
        None
    }

    pub fn count(&self, target: Cell) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|c| **c == target)
            .count()
    }

    pub fn has_start(&self) -> bool {
        self.find(Cell::Start).is_some()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = ".....\n.x *.\n.....";

    #[test]
    fn decode_then_encode_is_lossless() {
        let layout = Layout::decode(SMALL);
        assert_eq!(layout.height(), 3);
        assert_eq!(layout.width(), 5);
        assert_eq!(layout.get(1, 1), Some(Cell::Start));
        assert_eq!(layout.get(1, 3), Some(Cell::Goal));
        assert_eq!(layout.encode(), SMALL);
    }

    #[test]
    fn no_trailing_line_break() {
        assert!(!Layout::decode(SMALL).encode().ends_with('\n'));
    }

    #[test]
    fn foreign_symbols_decode_as_walls() {
        let layout = Layout::decode("...\n.#.\n...");
        assert_eq!(layout.get(1, 1), Some(Cell::Wall));
    }

    #[test]
    fn set_reports_previous_cell() {
        let mut layout = Layout::decode(SMALL);
        assert_eq!(layout.set(1, 2, Cell::Wall), Some(Cell::Space));
        assert_eq!(layout.set(9, 9, Cell::Wall), None);
        assert_eq!(layout.encode(), ".....\n.x.*.\n.....");
    }

    #[test]
    fn play_size_and_lookups() {
        let layout = Layout::decode(SMALL);
        assert_eq!(layout.play_size(), (2, 1));
        assert_eq!(layout.find(Cell::Start), Some((1, 1)));
        assert_eq!(layout.count(Cell::Goal), 1);
        assert!(layout.is_border(2, 3));
        assert!(!layout.is_border(1, 2));
    }
}
