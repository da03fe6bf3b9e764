use crate::cell::{is_wall_line, GOAL, SPACE, START, WALL};
use crate::error::LayoutError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Incomplete mazes (no start or goal yet) are accepted.
    #[default]
    Edit,
    /// Exactly one start and at least one goal are required.
    Play,
}

/// Checks a text encoding and reports the first failure in a fixed order:
/// marker counts (play mode only), row count, column count, row lengths,
/// outer wall, then cell placement.
pub fn validate(text: &str, mode: Mode) -> Result<(), LayoutError> {
    if mode == Mode::Play {
        let starts = text.chars().filter(|c| *c == START).count();
        let goals = text.chars().filter(|c| *c == GOAL).count();
        if starts != 1 || goals == 0 {
            return Err(LayoutError::InvalidStartOrGoalCount);
        }
    }

    let rows: Vec<Vec<char>> = text.split('\n').map(|r| r.chars().collect()).collect();
    let height = rows.len();
    if height < 1 || height % 2 == 0 {
        return Err(LayoutError::InvalidRowCount);
    }

    let width = rows[0].len();
    if width < 1 || width % 2 == 0 {
        return Err(LayoutError::InvalidColumnCount);
    }

    if rows.iter().any(|row| row.len() != width) {
        return Err(LayoutError::InconsistentRowLength);
    }

    for (i, row) in rows.iter().enumerate() {
        for (j, symbol) in row.iter().enumerate() {
            let border = i == 0 || j == 0 || i == height - 1 || j == width - 1;
            if border && *symbol != WALL {
                return Err(LayoutError::BrokenOuterWall);
            }
        }
    }

    for (i, row) in rows.iter().enumerate() {
        let wall_row = is_wall_line(i);
        for (j, symbol) in row.iter().enumerate() {
            let wall_col = is_wall_line(j);
            let misplaced = match *symbol {
                WALL => !wall_row && !wall_col,
                SPACE => wall_row && wall_col,
                START | GOAL => wall_row || wall_col,
                _ => true,
            };
            if misplaced {
                return Err(LayoutError::InvalidCellPlacement);
            }
        }
    }

    Ok(())
}

pub fn is_valid(text: &str, mode: Mode) -> bool {
    validate(text, mode).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYABLE: &str = ".......\n.x    .\n. ... .\n.   .*.\n.......";

    #[test]
    fn playable_layout_passes_both_modes() {
        assert_eq!(validate(PLAYABLE, Mode::Play), Ok(()));
        assert_eq!(validate(PLAYABLE, Mode::Edit), Ok(()));
    }

    #[test]
    fn marker_counts_only_checked_in_play_mode() {
        let no_goal = PLAYABLE.replace('*', " ");
        assert_eq!(validate(&no_goal, Mode::Edit), Ok(()));
        assert_eq!(
            validate(&no_goal, Mode::Play),
            Err(LayoutError::InvalidStartOrGoalCount)
        );

        let two_starts = PLAYABLE.replacen("    ", "   x", 1);
        assert_eq!(
            validate(&two_starts, Mode::Play),
            Err(LayoutError::InvalidStartOrGoalCount)
        );
    }

    #[test]
    fn even_row_count_rejected() {
        assert_eq!(
            validate("...\n. .\n. .\n...", Mode::Edit),
            Err(LayoutError::InvalidRowCount)
        );
    }

    #[test]
    fn even_or_empty_column_count_rejected() {
        assert_eq!(validate("", Mode::Edit), Err(LayoutError::InvalidColumnCount));
        assert_eq!(
            validate("....\n.  .\n....", Mode::Edit),
            Err(LayoutError::InvalidColumnCount)
        );
    }

    #[test]
    fn ragged_rows_rejected() {
        assert_eq!(
            validate(".....\n.   .\n....", Mode::Edit),
            Err(LayoutError::InconsistentRowLength)
        );
    }

    #[test]
    fn gap_in_outer_wall_rejected() {
        let gap = PLAYABLE.replacen(".x", " x", 1);
        assert_eq!(validate(&gap, Mode::Edit), Err(LayoutError::BrokenOuterWall));
    }

    #[test]
    fn misplaced_cells_rejected() {
        // wall on a play square
        assert_eq!(
            validate(".....\n.. ..\n.....", Mode::Edit),
            Err(LayoutError::InvalidCellPlacement)
        );
        // space on a post
        assert_eq!(
            validate(".....\n.   .\n.. ..\n.   .\n.....", Mode::Edit),
            Err(LayoutError::InvalidCellPlacement)
        );
        // goal on a gate
        assert_eq!(
            validate(".....\n. * .\n.....", Mode::Edit),
            Err(LayoutError::InvalidCellPlacement)
        );
        // unknown symbol
        assert_eq!(
            validate(".....\n. # .\n.....", Mode::Edit),
            Err(LayoutError::InvalidCellPlacement)
        );
    }

    #[test]
    fn length_checked_before_border() {
        assert_eq!(
            validate(".....\n    .\n...", Mode::Edit),
            Err(LayoutError::InconsistentRowLength)
        );
    }
}
