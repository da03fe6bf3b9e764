use std::time::Duration;

use log::{info, warn};

use crate::cell::Cell;
use crate::defaults::seed_if_empty;
use crate::edit::Editor;
use crate::error::{SessionError, SessionResult, StoreError};
use crate::layout::Layout;
use crate::play::Game;
use crate::size::MazeSize;
use crate::store::{MazeRecord, MazeStore};
use crate::transfer::{export_file_name, name_from_file, normalize};
use crate::validate::{validate, Mode};

pub const UNTITLED: &str = "untitled";

/// The user's answer to a [`Prompt`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// The current maze has unsaved changes. Yes saves, No discards.
    SaveChanges,
    /// A maze with this name already exists.
    Overwrite(String),
    /// Delete the named maze, or the unsaved one when `None`.
    Delete(Option<String>),
    /// Delete every maze and restore the starter set.
    Flush,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Nothing changed; ask the user and call again with the answer.
    NeedsConfirm(Prompt),
    Cancelled,
}

/// Everything the editor and game need besides the screen: the store, the
/// maze being worked on and whether it differs from its saved copy.
pub struct Session<S: MazeStore> {
    store: S,
    editor: Editor,
    name: Option<String>,
    saved_name: Option<String>,
    saved_layout: Option<Layout>,
    mode: Mode,
    default_size: MazeSize,
}

impl<S: MazeStore> Session<S> {
    /// Seeds the starter mazes into an empty store and opens the first maze.
    pub fn open(store: S, default_size: MazeSize) -> SessionResult<Self> {
        let mut session = Self {
            store,
            editor: Editor::new(Layout::blank(default_size)),
            name: None,
            saved_name: None,
            saved_layout: None,
            mode: Mode::Play,
            default_size,
        };
        session.reload_or_blank()?;
        Ok(session)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn layout(&self) -> &Layout {
        self.editor.layout()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn saved_name(&self) -> Option<&str> {
        self.saved_name.as_deref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn default_size(&self) -> MazeSize {
        self.default_size
    }

    pub fn fastest_time(&self) -> Option<Duration> {
        let name = self.saved_name.as_deref()?;
        let millis = self.store.load(name)?.fastest_time?;
        Some(Duration::from_millis(millis))
    }

    pub fn is_dirty(&self) -> bool {
        self.saved_layout.as_ref() != Some(self.layout()) || self.saved_name != self.name
    }

    pub fn set_mode(&mut self, mode: Mode) -> SessionResult<()> {
        if mode == Mode::Play {
            validate(&self.layout().encode(), Mode::Play)?;
        }
        self.mode = mode;
        Ok(())
    }

    pub fn start_game(&self) -> SessionResult<Game> {
        Ok(Game::new(self.layout().clone())?)
    }

    pub fn toggle(&mut self, row: usize, col: usize) -> SessionResult<Cell> {
        self.require_edit()?;
        Ok(self.editor.toggle(row, col)?)
    }

    pub fn undo(&mut self) -> SessionResult<()> {
        self.require_edit()?;
        Ok(self.editor.undo()?)
    }

    pub fn clear(&mut self) -> SessionResult<()> {
        self.require_edit()?;
        self.editor.clear(self.default_size);
        Ok(())
    }

    pub fn resize(&mut self, size: MazeSize) -> SessionResult<()> {
        self.require_edit()?;
        self.editor.resize(size)?;
        self.default_size = size;
        Ok(())
    }

    pub fn set_markers_locked(&mut self, locked: bool) {
        self.editor.set_markers_locked(locked);
    }

    /// Changes the current name only; the store sees it on the next save.
    pub fn rename(&mut self, name: &str) -> SessionResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        self.name = Some(name.to_string());
        Ok(())
    }

    /// Saves over the maze that was loaded, under the current name.
    pub fn save(&mut self, confirm: Option<Confirm>) -> SessionResult<Outcome> {
        let saved_name = self.saved_name.clone().ok_or(SessionError::Unnamed)?;
        let text = self.layout().encode();
        validate(&text, Mode::Play)?;

        let name = self.name.clone().unwrap_or_else(|| saved_name.clone());
        if name != saved_name && self.store.contains(&name) {
            match confirm {
                None => return Ok(Outcome::NeedsConfirm(Prompt::Overwrite(name))),
                Some(Confirm::Yes) => {}
                Some(_) => return Ok(Outcome::Cancelled),
            }
        }

        // A best time only stands for the layout it was set on.
        let fastest_time = self
            .store
            .load(&saved_name)
            .filter(|r| r.layout == text)
            .and_then(|r| r.fastest_time);
        let record = MazeRecord {
            name: name.clone(),
            fastest_time,
            layout: text,
        };
        self.store.replace(&saved_name, record)?;
        info!("saved maze '{name}'");
        self.mark_saved(name);
        Ok(Outcome::Done)
    }

    pub fn save_as(&mut self, name: &str, confirm: Option<Confirm>) -> SessionResult<Outcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        let text = self.layout().encode();
        validate(&text, Mode::Play)?;

        if self.store.contains(name) {
            match confirm {
                None => return Ok(Outcome::NeedsConfirm(Prompt::Overwrite(name.to_string()))),
                Some(Confirm::Yes) => {}
                Some(_) => return Ok(Outcome::Cancelled),
            }
        }

        self.store.save(MazeRecord::new(name, text))?;
        info!("saved maze as '{name}'");
        self.mark_saved(name.to_string());
        Ok(Outcome::Done)
    }

    pub fn new_maze(&mut self, confirm: Option<Confirm>) -> SessionResult<Outcome> {
        if let Some(outcome) = self.settle_changes(confirm)? {
            return Ok(outcome);
        }
        let blank = Layout::blank(self.default_size);
        self.editor.load(blank.clone());
        self.name = None;
        self.saved_name = None;
        self.saved_layout = Some(blank);
        self.mode = Mode::Edit;
        info!("new {} maze", self.default_size);
        Ok(Outcome::Done)
    }

    pub fn select(&mut self, name: &str, confirm: Option<Confirm>) -> SessionResult<Outcome> {
        if !self.store.contains(name) {
            return Err(StoreError::NotFound(name.to_string()).into());
        }
        if let Some(outcome) = self.settle_changes(confirm)? {
            return Ok(outcome);
        }
        self.reload(Some(name))?;
        Ok(Outcome::Done)
    }

    /// Removes the saved maze (if any) and falls back to the first stored one.
    pub fn delete(&mut self, confirm: Option<Confirm>) -> SessionResult<Outcome> {
        match confirm {
            None => Ok(Outcome::NeedsConfirm(Prompt::Delete(self.saved_name.clone()))),
            Some(Confirm::Yes) => {
                if let Some(name) = self.saved_name.clone() {
                    if self.store.delete(&name)? {
                        info!("deleted maze '{name}'");
                    }
                }
                self.reload_or_blank()?;
                Ok(Outcome::Done)
            }
            Some(_) => Ok(Outcome::Cancelled),
        }
    }

    pub fn flush(&mut self, confirm: Option<Confirm>) -> SessionResult<Outcome> {
        match confirm {
            None => Ok(Outcome::NeedsConfirm(Prompt::Flush)),
            Some(Confirm::Yes) => {
                self.store.clear()?;
                info!("deleted all saved mazes");
                self.reload_or_blank()?;
                Ok(Outcome::Done)
            }
            Some(_) => Ok(Outcome::Cancelled),
        }
    }

    /// Stores a `.maze` file's contents under its file stem and opens it.
    /// `save_changes` answers [`Prompt::SaveChanges`], `overwrite` answers
    /// [`Prompt::Overwrite`]; nothing changes until both are settled.
    pub fn import(
        &mut self,
        file_name: &str,
        contents: &str,
        save_changes: Option<Confirm>,
        overwrite: Option<Confirm>,
    ) -> SessionResult<Outcome> {
        let name = name_from_file(file_name).trim().to_string();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        let text = normalize(contents);
        validate(&text, Mode::Play)?;

        if self.is_dirty() {
            match save_changes {
                None => return Ok(Outcome::NeedsConfirm(Prompt::SaveChanges)),
                Some(Confirm::Cancel) => return Ok(Outcome::Cancelled),
                Some(_) => {}
            }
        }
        if self.store.contains(&name) {
            match overwrite {
                None => return Ok(Outcome::NeedsConfirm(Prompt::Overwrite(name))),
                Some(Confirm::Yes) => {}
                Some(_) => return Ok(Outcome::Cancelled),
            }
        }
        if let Some(outcome) = self.settle_changes(save_changes)? {
            return Ok(outcome);
        }

        self.store.save(MazeRecord::new(name.as_str(), text))?;
        info!("imported maze '{name}'");
        self.reload(Some(&name))?;
        Ok(Outcome::Done)
    }

    /// `(file name, contents)` for writing the current maze out.
    pub fn export(&self) -> (String, String) {
        let name = self.name.as_deref().unwrap_or(UNTITLED);
        (export_file_name(name), self.layout().encode())
    }

    /// Keeps `elapsed` as the saved maze's best time if it beats the old one.
    pub fn record_time(&mut self, elapsed: Duration) -> SessionResult<bool> {
        let Some(name) = self.saved_name.clone() else {
            return Ok(false);
        };
        if self.saved_layout.as_ref() != Some(self.layout()) {
            return Ok(false);
        }
        let Some(record) = self.store.load(&name) else {
            return Ok(false);
        };
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if record.fastest_time.is_some_and(|best| best <= millis) {
            return Ok(false);
        }
        let record = MazeRecord {
            fastest_time: Some(millis),
            ..record.clone()
        };
        self.store.save(record)?;
        info!("new best time for '{name}': {millis}ms");
        Ok(true)
    }

    /// `Some(outcome)` means stop and report it; `None` means carry on.
    fn settle_changes(&mut self, confirm: Option<Confirm>) -> SessionResult<Option<Outcome>> {
        if !self.is_dirty() {
            return Ok(None);
        }
        match confirm {
            None => Ok(Some(Outcome::NeedsConfirm(Prompt::SaveChanges))),
            Some(Confirm::Cancel) => Ok(Some(Outcome::Cancelled)),
            Some(Confirm::No) => Ok(None),
            Some(Confirm::Yes) => match self.save(Some(Confirm::Yes))? {
                Outcome::Done => Ok(None),
                other => Ok(Some(other)),
            },
        }
    }

    /// Opens `selected` if stored, else the first maze, else a blank one.
    fn reload(&mut self, selected: Option<&str>) -> SessionResult<()> {
        seed_if_empty(&mut self.store)?;
        let record = selected
            .and_then(|name| self.store.load(name))
            .or_else(|| self.store.records().first())
            .cloned();

        let Some(record) = record else {
            self.load_blank();
            return Ok(());
        };

        validate(&record.layout, Mode::Edit)?;
        let layout = Layout::decode(&record.layout);
        if self.mode == Mode::Play && validate(&record.layout, Mode::Play).is_err() {
            warn!("'{}' is not playable yet, switching to edit mode", record.name);
            self.mode = Mode::Edit;
        }
        self.editor.load(layout.clone());
        self.name = Some(record.name.clone());
        self.saved_name = Some(record.name);
        self.saved_layout = Some(layout);
        Ok(())
    }

    /// Opens the first stored maze, or a blank one when that record is unusable.
    fn reload_or_blank(&mut self) -> SessionResult<()> {
        match self.reload(None) {
            Ok(()) => Ok(()),
            Err(SessionError::Layout(reason)) => {
                warn!("first stored maze is unusable ({reason}), starting blank");
                self.load_blank();
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn load_blank(&mut self) {
        self.editor.load(Layout::blank(self.default_size));
        self.name = None;
        self.saved_name = None;
        self.saved_layout = None;
        self.mode = Mode::Edit;
    }

    fn mark_saved(&mut self, name: String) {
        self.name = Some(name.clone());
        self.saved_name = Some(name);
        self.saved_layout = Some(self.layout().clone());
    }

    fn require_edit(&self) -> SessionResult<()> {
        match self.mode {
            Mode::Edit => Ok(()),
            Mode::Play => Err(SessionError::NotEditing),
        }
    }
}
