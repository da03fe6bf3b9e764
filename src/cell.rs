use serde::{Deserialize, Serialize};

pub const WALL: char = '.';
pub const SPACE: char = ' ';
pub const START: char = 'x';
pub const GOAL: char = '*';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Space,
    Start,
    Goal,
}

impl Cell {
    /// Unknown symbols classify as walls.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            SPACE => Cell::Space,
            START => Cell::Start,
            GOAL => Cell::Goal,
            _ => Cell::Wall,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Wall => WALL,
            Cell::Space => SPACE,
            Cell::Start => START,
            Cell::Goal => GOAL,
        }
    }

    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }

    pub fn is_marker(self) -> bool {
        matches!(self, Cell::Start | Cell::Goal)
    }
}

/// Structural role of a grid position, fixed by the parity of its coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Wall-row and wall-column: always a wall.
    Post,
    /// Exactly one wall coordinate: open or closed passage between two squares.
    Gate,
    /// Neither coordinate on a wall line: a square the player can stand on.
    Square,
}

pub fn is_wall_line(index: usize) -> bool {
    index % 2 == 0
}

pub fn role(row: usize, col: usize) -> Role {
    match (is_wall_line(row), is_wall_line(col)) {
        (true, true) => Role::Post,
        (false, false) => Role::Square,
        _ => Role::Gate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_symbols_are_walls() {
        assert_eq!(Cell::from_symbol('#'), Cell::Wall);
        assert_eq!(Cell::from_symbol('s'), Cell::Wall);
        assert_eq!(Cell::from_symbol(' '), Cell::Space);
    }

    #[test]
    fn roles_follow_parity() {
        assert_eq!(role(0, 0), Role::Post);
        assert_eq!(role(2, 4), Role::Post);
        assert_eq!(role(1, 1), Role::Square);
        assert_eq!(role(1, 2), Role::Gate);
        assert_eq!(role(2, 1), Role::Gate);
    }
}
