//! Text-encoded mazes: the codec, the validator, the resizer, and the
//! editing, playing and storage layers built on top of them.
//!
//! A maze of `W` x `H` play squares is a grid of `2*H+1` lines, each `2*W+1`
//! characters long: `.` wall, ` ` open, `x` start, `*` goal. Even rows and
//! columns are wall lines; squares sit where both indices are odd.

pub mod cell;
pub mod config;
pub mod defaults;
pub mod edit;
pub mod error;
pub mod history;
pub mod layout;
pub mod play;
pub mod resize;
pub mod session;
pub mod size;
pub mod store;
pub mod transfer;
pub mod validate;

pub use cell::Cell;
pub use config::Settings;
pub use edit::Editor;
pub use error::{EditError, LayoutError, SessionError, SizeError, StoreError};
pub use layout::Layout;
pub use play::{Dir, Game, MoveOutcome, Status};
pub use resize::{resize, resize_layout, resize_to};
pub use session::{Confirm, Outcome, Prompt, Session};
pub use size::MazeSize;
pub use store::{FileStore, MazeRecord, MazeStore, MemoryStore};
pub use validate::{is_valid, validate, Mode};
