use log::debug;

use crate::cell::{role, Cell, Role};
use crate::error::EditError;
use crate::history::History;
use crate::layout::Layout;
use crate::resize::resize_layout;
use crate::size::MazeSize;

/// Edit-mode state: the layout being drawn plus its undo history.
/// Every mutation snapshots the previous layout first.
#[derive(Clone, Debug)]
pub struct Editor {
    layout: Layout,
    history: History<Layout>,
    markers_locked: bool,
}

impl Editor {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            history: History::default(),
            markers_locked: false,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Swaps in a different maze; the undo history belongs to the old one.
    pub fn load(&mut self, layout: Layout) {
        self.layout = layout;
        self.history.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn markers_locked(&self) -> bool {
        self.markers_locked
    }

    pub fn set_markers_locked(&mut self, locked: bool) {
        self.markers_locked = locked;
    }

    /// Gates flip between wall and space, play squares cycle their marker.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<Cell, EditError> {
        match self.editable_role(row, col)? {
            Role::Gate => self.toggle_gate(row, col),
            Role::Square => self.toggle_marker(row, col),
            Role::Post => Err(EditError::NotEditable { row, col }),
        }
    }

    pub fn toggle_gate(&mut self, row: usize, col: usize) -> Result<Cell, EditError> {
        if self.editable_role(row, col)? != Role::Gate {
            return Err(EditError::NotEditable { row, col });
        }
        let next = match self.cell(row, col)? {
            Cell::Wall => Cell::Space,
            _ => Cell::Wall,
        };
        self.apply(row, col, next);
        Ok(next)
    }

    /// Space becomes the start if there is none yet, otherwise a goal.
    /// Start and goal both go back to space.
    pub fn toggle_marker(&mut self, row: usize, col: usize) -> Result<Cell, EditError> {
        if self.editable_role(row, col)? != Role::Square {
            return Err(EditError::NotEditable { row, col });
        }
        if self.markers_locked {
            return Err(EditError::MarkersLocked);
        }
        let next = match self.cell(row, col)? {
            Cell::Start | Cell::Goal => Cell::Space,
            Cell::Space if self.layout.has_start() => Cell::Goal,
            Cell::Space => Cell::Start,
            Cell::Wall => return Err(EditError::NotEditable { row, col }),
        };
        self.apply(row, col, next);
        Ok(next)
    }

    pub fn clear(&mut self, size: MazeSize) {
        self.history.push(self.layout.clone());
        self.layout = Layout::blank(size);
        debug!("cleared maze to blank {size}");
    }

    /// On failure the layout and history are left as they were.
    pub fn resize(&mut self, size: MazeSize) -> Result<(), EditError> {
        let resized = resize_layout(&self.layout, size)?;
        self.history.push(std::mem::replace(&mut self.layout, resized));
        debug!("resized maze to {size}");
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), EditError> {
        let previous = self.history.pop().ok_or(EditError::NothingToUndo)?;
        self.layout = previous;
        debug!("undo, {} steps left", self.history.len());
        Ok(())
    }

    fn cell(&self, row: usize, col: usize) -> Result<Cell, EditError> {
        self.layout
            .get(row, col)
            .ok_or(EditError::OutOfBounds { row, col })
    }

    fn editable_role(&self, row: usize, col: usize) -> Result<Role, EditError> {
        self.cell(row, col)?;
        if self.layout.is_border(row, col) {
            return Err(EditError::NotEditable { row, col });
        }
        Ok(role(row, col))
    }

    fn apply(&mut self, row: usize, col: usize, cell: Cell) {
        self.history.push(self.layout.clone());
        self.layout.set(row, col, cell);
        debug!("cell {row}-{col} set to {:?}", cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::UNDO_CAPACITY;

    fn editor() -> Editor {
        Editor::new(Layout::blank(MazeSize::new(3, 3).unwrap()))
    }

    #[test]
    fn gate_toggles_between_wall_and_space() {
        let mut editor = editor();
        assert_eq!(editor.toggle(1, 2), Ok(Cell::Wall));
        assert_eq!(editor.toggle(1, 2), Ok(Cell::Space));
        assert_eq!(editor.undo_depth(), 2);
    }

    #[test]
    fn first_marker_is_start_then_goals() {
        let mut editor = editor();
        assert_eq!(editor.toggle(1, 1), Ok(Cell::Start));
        assert_eq!(editor.toggle(3, 3), Ok(Cell::Goal));
        assert_eq!(editor.toggle(5, 5), Ok(Cell::Goal));
        assert_eq!(editor.toggle(1, 1), Ok(Cell::Space));
        // start removed, so the next empty square becomes the start again
        assert_eq!(editor.toggle(1, 3), Ok(Cell::Start));
        assert_eq!(editor.toggle(3, 3), Ok(Cell::Space));
    }

    #[test]
    fn border_and_posts_are_not_editable() {
        let mut editor = editor();
        assert_eq!(
            editor.toggle(0, 1),
            Err(EditError::NotEditable { row: 0, col: 1 })
        );
        assert_eq!(
            editor.toggle(2, 2),
            Err(EditError::NotEditable { row: 2, col: 2 })
        );
        assert_eq!(
            editor.toggle(40, 1),
            Err(EditError::OutOfBounds { row: 40, col: 1 })
        );
        assert!(!editor.can_undo());
    }

    #[test]
    fn locked_markers_reject_square_edits_but_not_gates() {
        let mut editor = editor();
        editor.set_markers_locked(true);
        assert_eq!(editor.toggle(1, 1), Err(EditError::MarkersLocked));
        assert_eq!(editor.toggle(2, 1), Ok(Cell::Wall));
    }

    #[test]
    fn undo_restores_previous_layouts() {
        let mut editor = editor();
        let blank = editor.layout().clone();
        editor.toggle(1, 2).unwrap();
        editor.toggle(1, 1).unwrap();
        editor.undo().unwrap();
        assert_eq!(editor.layout().get(1, 1), Some(Cell::Space));
        assert_eq!(editor.layout().get(1, 2), Some(Cell::Wall));
        editor.undo().unwrap();
        assert_eq!(editor.layout(), &blank);
        assert_eq!(editor.undo(), Err(EditError::NothingToUndo));
    }

    #[test]
    fn history_is_bounded() {
        let mut editor = editor();
        for _ in 0..UNDO_CAPACITY + 4 {
            editor.toggle(1, 2).unwrap();
        }
        assert_eq!(editor.undo_depth(), UNDO_CAPACITY);
    }

    #[test]
    fn failed_resize_leaves_state_untouched() {
        let mut editor = editor();
        editor.toggle(1, 2).unwrap();
        let before = editor.layout().clone();
        let mut broken = before.clone();
        broken.set(0, 1, Cell::Space);
        editor.load(broken.clone());
        assert!(editor.resize(MazeSize::new(5, 5).unwrap()).is_err());
        assert_eq!(editor.layout(), &broken);
        assert!(!editor.can_undo());
    }

    #[test]
    fn resize_and_clear_are_undoable() {
        let mut editor = editor();
        editor.toggle(1, 1).unwrap();
        editor.resize(MazeSize::new(5, 4).unwrap()).unwrap();
        assert_eq!(editor.layout().play_size(), (5, 4));
        assert_eq!(editor.layout().get(1, 1), Some(Cell::Start));
        editor.clear(MazeSize::DEFAULT);
        assert_eq!(editor.layout().play_size(), (8, 8));
        editor.undo().unwrap();
        assert_eq!(editor.layout().play_size(), (5, 4));
        editor.undo().unwrap();
        assert_eq!(editor.layout().play_size(), (3, 3));
    }
}
