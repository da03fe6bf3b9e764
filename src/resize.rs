use log::debug;

use crate::cell::{is_wall_line, SPACE, WALL};
use crate::error::LayoutError;
use crate::layout::Layout;
use crate::size::MazeSize;
use crate::validate::{validate, Mode};

/// Builds a `width` x `height` (play squares) layout from `existing`, keeping
/// every cell that still fits and sealing the new outer wall. `None` or empty
/// text yields a blank maze.
pub fn resize(existing: Option<&str>, width: usize, height: usize) -> Result<String, LayoutError> {
    let size = MazeSize::new(width, height)?;
    resize_to(existing, size)
}

pub fn resize_to(existing: Option<&str>, size: MazeSize) -> Result<String, LayoutError> {
    let rows: Vec<Vec<char>> = match existing.filter(|text| !text.is_empty()) {
        Some(text) => {
            validate(text, Mode::Edit)?;
            text.split('\n').map(|row| row.chars().collect()).collect()
        }
        None => Vec::new(),
    };
    // a single wall line has no separate top/bottom or left/right edge to reopen
    let rows = if rows.len() < 3 || rows.iter().any(|row| row.len() < 3) {
        Vec::new()
    } else {
        rows
    };
    Ok(join(rebuild(rows, size)))
}

pub fn resize_layout(existing: &Layout, size: MazeSize) -> Result<Layout, LayoutError> {
    let text = existing.encode();
    resize_to(Some(&text), size).map(|resized| Layout::decode(&resized))
}

impl Layout {
    /// A sealed maze with no interior walls.
    pub fn blank(size: MazeSize) -> Layout {
        Layout::decode(&join(rebuild(Vec::new(), size)))
    }
}

fn rebuild(mut rows: Vec<Vec<char>>, size: MazeSize) -> Vec<Vec<char>> {
    let new_width = size.cell_width();
    let new_height = size.cell_height();
    debug!(
        "resizing {}x{} cells to {}x{} cells",
        rows.first().map_or(0, Vec::len),
        rows.len(),
        new_width,
        new_height
    );

    fit_rows(&mut rows, new_width, new_height);
    for (index, row) in rows.iter_mut().enumerate() {
        fit_columns(row, index, new_width, new_height);
    }
    rows
}

fn fit_rows(rows: &mut Vec<Vec<char>>, new_width: usize, new_height: usize) {
    if rows.len() > new_height {
        rows.truncate(new_height);
        if let Some(last) = rows.last_mut() {
            last.iter_mut().for_each(|cell| *cell = WALL);
        }
    } else if rows.len() < new_height {
        // The old bottom wall becomes an ordinary interior row.
        match rows.last_mut() {
            Some(last) => *last = gate_row(new_width),
            None => rows.push(sealed_row(new_width)),
        }
        while rows.len() < new_height - 1 {
            let row = if is_wall_line(rows.len()) {
                gate_row(new_width)
            } else {
                open_row(new_width)
            };
            rows.push(row);
        }
        rows.push(sealed_row(new_width));
    }
}

fn fit_columns(row: &mut Vec<char>, index: usize, new_width: usize, new_height: usize) {
    if row.len() > new_width {
        row.truncate(new_width - 1);
        row.push(WALL);
    } else if row.len() < new_width {
        if index == 0 || index + 1 == new_height {
            row.resize(new_width, WALL);
            return;
        }
        // Replace the old right-hand wall rather than extending past it.
        row.pop();
        let wall_row = is_wall_line(index);
        while row.len() < new_width - 1 {
            let post = wall_row && is_wall_line(row.len());
            row.push(if post { WALL } else { SPACE });
        }
        row.push(WALL);
    }
}

fn sealed_row(width: usize) -> Vec<char> {
    vec![WALL; width]
}

/// Posts on wall columns, open gates between them.
fn gate_row(width: usize) -> Vec<char> {
    (0..width)
        .map(|col| if is_wall_line(col) { WALL } else { SPACE })
        .collect()
}

/// Walls only at the two ends.
fn open_row(width: usize) -> Vec<char> {
    (0..width)
        .map(|col| if col == 0 || col + 1 == width { WALL } else { SPACE })
        .collect()
}

fn join(rows: Vec<Vec<char>>) -> String {
    rows.iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
