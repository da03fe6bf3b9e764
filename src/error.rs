use thiserror::Error;

/// Why a layout (or a requested size) was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error("You must have 1 start and at least 1 goal.")]
    InvalidStartOrGoalCount,

    #[error("Invalid number of rows.")]
    InvalidRowCount,

    #[error("Invalid number of columns.")]
    InvalidColumnCount,

    #[error("Not all rows are the same length.")]
    InconsistentRowLength,

    #[error("The outside walls must not have any gaps.")]
    BrokenOuterWall,

    #[error("Invalid layout.")]
    InvalidCellPlacement,

    #[error("Invalid size. Maximum = 30x30, Minimum = 1x2")]
    InvalidDimensions,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    #[error("could not read '{input}' as <width>x<height>")]
    Malformed { input: String },

    #[error(transparent)]
    OutOfBounds(#[from] LayoutError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    #[error("cell {row}-{col} is outside the maze")]
    OutOfBounds { row: usize, col: usize },

    #[error("cell {row}-{col} cannot be edited")]
    NotEditable { row: usize, col: usize },

    #[error("start and goals are locked")]
    MarkersLocked,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("maze store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("maze store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no maze named '{0}'")]
    NotFound(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Size(#[from] SizeError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("You must enter a name")]
    EmptyName,

    #[error("the maze has not been saved yet; save it under a name first")]
    Unnamed,

    #[error("switch to edit mode to change the maze")]
    NotEditing,
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
