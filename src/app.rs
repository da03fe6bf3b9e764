use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};

use draw_the_maze::error::SessionResult;
use draw_the_maze::play::{format_clock, Cheat, Dir, Game, MoveOutcome, Status};
use draw_the_maze::{Confirm, MazeSize, MazeStore, Mode, Outcome, Prompt, Session, SessionError};

/// An action waiting on the user's answer to a prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pending {
    Quit,
    NewMaze,
    Select(String),
    Save,
    SaveAs(String),
    Delete,
    Flush,
    Import {
        file_name: String,
        contents: String,
        save_changes: Option<Confirm>,
        overwrite: Option<Confirm>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextField {
    SaveAs,
    Rename,
    Resize,
    Import,
}

impl TextField {
    pub fn label(self) -> &'static str {
        match self {
            TextField::SaveAs => "Save as",
            TextField::Rename => "New name",
            TextField::Resize => "New size (WxH)",
            TextField::Import => "Import file",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Idle,
    Confirm { prompt: Prompt, pending: Pending },
    Text { field: TextField, buffer: String },
}

pub fn question(prompt: &Prompt) -> String {
    match prompt {
        Prompt::SaveChanges => "Save changes to the current maze?".to_string(),
        Prompt::Overwrite(name) => format!("A maze named '{name}' already exists. Overwrite it?"),
        Prompt::Delete(Some(name)) => format!("Delete '{name}'?"),
        Prompt::Delete(None) => "Discard this unsaved maze?".to_string(),
        Prompt::Flush => "Delete ALL saved mazes and restore the starter set?".to_string(),
    }
}

pub struct App<S: MazeStore> {
    session: Session<S>,
    game: Option<Game>,
    cursor: (usize, usize),
    input: Input,
    message: String,
    export_dir: PathBuf,
    quit: bool,
}

impl<S: MazeStore> App<S> {
    pub fn new(session: Session<S>, export_dir: PathBuf) -> Self {
        let mut app = Self {
            session,
            game: None,
            cursor: (1, 1),
            input: Input::Idle,
            message: String::new(),
            export_dir,
            quit: false,
        };
        app.refresh();
        app
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn clock(&self, now: Instant) -> String {
        let elapsed = self.game.as_ref().map(|g| g.elapsed(now)).unwrap_or_default();
        format_clock(elapsed)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return;
        }
        match std::mem::replace(&mut self.input, Input::Idle) {
            Input::Idle => self.on_key(key, now),
            Input::Confirm { prompt, pending } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.answer(prompt, pending, Confirm::Yes),
                KeyCode::Char('n') | KeyCode::Char('N') => self.answer(prompt, pending, Confirm::No),
                KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => {
                    self.answer(prompt, pending, Confirm::Cancel)
                }
                _ => self.input = Input::Confirm { prompt, pending },
            },
            Input::Text { field, mut buffer } => match key.code {
                KeyCode::Enter => self.submit(field, buffer),
                KeyCode::Esc => self.message = "Cancelled".to_string(),
                KeyCode::Backspace => {
                    buffer.pop();
                    self.input = Input::Text { field, buffer };
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    buffer.push(c);
                    self.input = Input::Text { field, buffer };
                }
                _ => self.input = Input::Text { field, buffer },
            },
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('q') => return self.run(Pending::Quit, None),
            KeyCode::Tab => return self.toggle_mode(),
            KeyCode::Char('[') => return self.select_relative(-1),
            KeyCode::Char(']') => return self.select_relative(1),
            _ => {}
        }
        match self.session.mode() {
            Mode::Edit => self.on_edit_key(key),
            Mode::Play => self.on_play_key(key, now),
        }
    }

    fn on_edit_key(&mut self, key: KeyEvent) {
        if let Some(dir) = direction(key.code, false) {
            return self.move_cursor(dir);
        }
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                let (row, col) = self.cursor;
                match self.session.toggle(row, col) {
                    Ok(cell) => self.message = format!("{row}-{col} is now {cell:?}"),
                    Err(err) => self.message = err.to_string(),
                }
            }
            KeyCode::Char('u') => match self.session.undo() {
                Ok(()) => self.message = "Undone".to_string(),
                Err(err) => self.message = err.to_string(),
            },
            KeyCode::Char('c') => {
                if let Err(err) = self.session.clear() {
                    self.message = err.to_string();
                }
                self.clamp_cursor();
            }
            KeyCode::Char('g') => {
                let locked = !self.session.editor().markers_locked();
                self.session.set_markers_locked(locked);
                self.message = if locked { "Start and goals locked" } else { "Start and goals unlocked" }
                    .to_string();
            }
            KeyCode::Char('r') => self.ask_text(TextField::Resize),
            KeyCode::Char('a') => self.ask_text(TextField::SaveAs),
            KeyCode::Char('t') => self.ask_text(TextField::Rename),
            KeyCode::Char('i') => self.ask_text(TextField::Import),
            KeyCode::Char('n') => self.run(Pending::NewMaze, None),
            KeyCode::Char('s') => self.run(Pending::Save, None),
            KeyCode::Char('d') => self.run(Pending::Delete, None),
            KeyCode::Char('F') => self.run(Pending::Flush, None),
            KeyCode::Char('o') => self.export(),
            _ => {}
        }
    }

    fn on_play_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if let Some(dir) = direction(key.code, true) {
            match game.step(dir, now) {
                MoveOutcome::Collected { remaining } => {
                    self.message = format!("Goal! {remaining} to go");
                }
                MoveOutcome::Won { elapsed } => {
                    self.message = format!("Solved in {}", format_clock(elapsed));
                    match self.session.record_time(elapsed) {
                        Ok(true) => self.message.push_str("  new best time!"),
                        Ok(false) => {}
                        Err(err) => {
                            warn!("could not record time: {err}");
                            self.message = err.to_string();
                        }
                    }
                }
                _ => {}
            }
            return;
        }
        let cheat = match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.message = match game.start_or_pause(now) {
                    Status::Running => "Go!",
                    Status::Paused => "Paused",
                    _ => "",
                }
                .to_string();
                return;
            }
            KeyCode::Char('1') => Cheat::WalkThroughWalls,
            KeyCode::Char('2') => Cheat::RevealMaze,
            KeyCode::Char('3') => Cheat::InvisibleWalls,
            KeyCode::Char('4') => Cheat::ResetTimer,
            _ => return,
        };
        if game.cheat(cheat, now) {
            self.message = format!("Cheat: {cheat:?}");
        }
    }

    fn answer(&mut self, prompt: Prompt, mut pending: Pending, confirm: Confirm) {
        if let Pending::Import {
            save_changes,
            overwrite,
            ..
        } = &mut pending
        {
            match prompt {
                Prompt::SaveChanges => *save_changes = Some(confirm),
                _ => *overwrite = Some(confirm),
            }
            return self.run(pending, None);
        }
        self.run(pending, Some(confirm));
    }

    fn run(&mut self, pending: Pending, confirm: Option<Confirm>) {
        let result = self.dispatch(&pending, confirm);
        match result {
            Ok(Outcome::Done) => self.finish(pending),
            Ok(Outcome::NeedsConfirm(prompt)) => {
                self.message.clear();
                self.input = Input::Confirm { prompt, pending };
            }
            Ok(Outcome::Cancelled) => self.message = "Cancelled".to_string(),
            // the save-as prompt would drop the file, so ask again instead
            Err(SessionError::Unnamed) => match pending {
                Pending::Import {
                    file_name,
                    contents,
                    overwrite,
                    ..
                } => {
                    self.message = "This maze has no name yet, so it cannot be saved".to_string();
                    self.input = Input::Confirm {
                        prompt: Prompt::SaveChanges,
                        pending: Pending::Import {
                            file_name,
                            contents,
                            save_changes: None,
                            overwrite,
                        },
                    };
                }
                _ => {
                    self.message = "Name the maze to save it".to_string();
                    self.ask_text(TextField::SaveAs);
                }
            },
            Err(err) => {
                warn!("{pending:?} failed: {err}");
                self.message = err.to_string();
            }
        }
    }

    fn dispatch(&mut self, pending: &Pending, confirm: Option<Confirm>) -> SessionResult<Outcome> {
        match pending {
            Pending::Quit => self.quit_flow(confirm),
            Pending::NewMaze => self.session.new_maze(confirm),
            Pending::Select(name) => self.session.select(name, confirm),
            Pending::Save => self.session.save(confirm),
            Pending::SaveAs(name) => self.session.save_as(name, confirm),
            Pending::Delete => self.session.delete(confirm),
            Pending::Flush => self.session.flush(confirm),
            Pending::Import {
                file_name,
                contents,
                save_changes,
                overwrite,
            } => self
                .session
                .import(file_name, contents, *save_changes, *overwrite),
        }
    }

    fn quit_flow(&mut self, confirm: Option<Confirm>) -> SessionResult<Outcome> {
        if !self.session.is_dirty() {
            return Ok(Outcome::Done);
        }
        match confirm {
            None => Ok(Outcome::NeedsConfirm(Prompt::SaveChanges)),
            Some(Confirm::Yes) => self.session.save(Some(Confirm::Yes)),
            Some(Confirm::No) => Ok(Outcome::Done),
            Some(Confirm::Cancel) => Ok(Outcome::Cancelled),
        }
    }

    fn finish(&mut self, pending: Pending) {
        let name = self.session.name().unwrap_or("(unsaved)").to_string();
        self.message = match pending {
            Pending::Quit => {
                self.quit = true;
                return;
            }
            Pending::NewMaze => "New maze".to_string(),
            Pending::Select(_) => format!("Loaded '{name}'"),
            Pending::Save | Pending::SaveAs(_) => format!("Saved '{name}'"),
            Pending::Delete => format!("Deleted; now showing '{name}'"),
            Pending::Flush => "Restored the starter mazes".to_string(),
            Pending::Import { .. } => format!("Imported '{name}'"),
        };
        self.refresh();
    }

    fn submit(&mut self, field: TextField, buffer: String) {
        match field {
            TextField::SaveAs => self.run(Pending::SaveAs(buffer.trim().to_string()), None),
            TextField::Rename => match self.session.rename(&buffer) {
                Ok(()) => self.message = "Renamed; save to keep it".to_string(),
                Err(err) => self.message = err.to_string(),
            },
            TextField::Resize => {
                let resized = buffer
                    .parse::<MazeSize>()
                    .map_err(SessionError::from)
                    .and_then(|size| self.session.resize(size));
                match resized {
                    Ok(()) => {
                        self.clamp_cursor();
                        self.message = format!("Resized to {}", self.session.default_size());
                    }
                    Err(err) => self.message = err.to_string(),
                }
            }
            TextField::Import => {
                let file_name = buffer.trim().to_string();
                match fs::read_to_string(&file_name) {
                    Ok(contents) => self.run(
                        Pending::Import {
                            file_name,
                            contents,
                            save_changes: None,
                            overwrite: None,
                        },
                        None,
                    ),
                    Err(err) => self.message = format!("Could not read {file_name}: {err}"),
                }
            }
        }
    }

    fn ask_text(&mut self, field: TextField) {
        let buffer = match field {
            TextField::Rename | TextField::SaveAs => self.session.name().unwrap_or_default().to_string(),
            TextField::Resize => self.session.default_size().to_string(),
            TextField::Import => String::new(),
        };
        self.input = Input::Text { field, buffer };
    }

    fn toggle_mode(&mut self) {
        let next = match self.session.mode() {
            Mode::Edit => Mode::Play,
            Mode::Play => Mode::Edit,
        };
        match self.session.set_mode(next) {
            Ok(()) => {
                self.message = match next {
                    Mode::Play => "Play mode: enter to start",
                    Mode::Edit => "Edit mode",
                }
                .to_string();
                self.refresh();
            }
            Err(err) => self.message = err.to_string(),
        }
    }

    fn select_relative(&mut self, step: isize) {
        let names = self.session.store().names();
        if names.is_empty() {
            return;
        }
        let current = self
            .session
            .saved_name()
            .and_then(|name| names.iter().position(|n| n == name));
        let len = names.len() as isize;
        let next = match current {
            Some(idx) => (idx as isize + step).rem_euclid(len),
            None if step < 0 => len - 1,
            None => 0,
        };
        self.run(Pending::Select(names[next as usize].clone()), None);
    }

    fn export(&mut self) {
        let (file_name, text) = self.session.export();
        let path = self.export_dir.join(file_name);
        match fs::write(&path, text) {
            Ok(()) => {
                info!("exported {}", path.display());
                self.message = format!("Exported to {}", path.display());
            }
            Err(err) => self.message = format!("Could not write {}: {err}", path.display()),
        }
    }

    fn move_cursor(&mut self, dir: Dir) {
        let (row, col) = self.cursor;
        self.cursor = match dir {
            Dir::Up => (row.saturating_sub(1), col),
            Dir::Down => (row + 1, col),
            Dir::Left => (row, col.saturating_sub(1)),
            Dir::Right => (row, col + 1),
        };
        self.clamp_cursor();
    }

    /// Keeps the cursor inside the outer wall.
    fn clamp_cursor(&mut self) {
        let layout = self.session.layout();
        let max_row = layout.height().saturating_sub(2).max(1);
        let max_col = layout.width().saturating_sub(2).max(1);
        self.cursor = (self.cursor.0.clamp(1, max_row), self.cursor.1.clamp(1, max_col));
    }

    /// Rebuilds the game for the current maze and mode.
    fn refresh(&mut self) {
        self.game = match self.session.mode() {
            Mode::Play => self.session.start_game().ok(),
            Mode::Edit => None,
        };
        self.clamp_cursor();
    }
}

fn direction(code: KeyCode, wasd: bool) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Dir::Right),
        KeyCode::Char('w') if wasd => Some(Dir::Up),
        KeyCode::Char('s') if wasd => Some(Dir::Down),
        KeyCode::Char('a') if wasd => Some(Dir::Left),
        KeyCode::Char('d') if wasd => Some(Dir::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draw_the_maze::{MazeStore, MemoryStore};

    const TINY: &str = ".....\n.x *.\n.....";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App<MemoryStore>, codes: &[KeyCode]) {
        let now = Instant::now();
        for code in codes {
            app.handle_key(key(*code), now);
        }
    }

    fn app() -> App<MemoryStore> {
        let session = Session::open(MemoryStore::new(), MazeSize::DEFAULT).unwrap();
        App::new(session, std::env::temp_dir())
    }

    fn tiny_app() -> App<MemoryStore> {
        let mut session = Session::open(MemoryStore::new(), MazeSize::DEFAULT).unwrap();
        session.import("tiny.maze", TINY, None, None).unwrap();
        App::new(session, std::env::temp_dir())
    }

    #[test]
    fn starts_playing_the_first_maze() {
        let app = app();
        assert_eq!(app.session().mode(), Mode::Play);
        assert!(app.game().is_some());
    }

    #[test]
    fn quitting_clean_session_needs_no_prompt() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(app.should_quit());
    }

    #[test]
    fn quitting_with_changes_asks_first() {
        let mut app = app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('l'), KeyCode::Char(' ')]);
        assert!(app.session().is_dirty());
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(matches!(
            app.input(),
            Input::Confirm {
                prompt: Prompt::SaveChanges,
                ..
            }
        ));
        press(&mut app, &[KeyCode::Char('c')]);
        assert!(!app.should_quit());
        assert_eq!(app.input(), &Input::Idle);
        press(&mut app, &[KeyCode::Char('q'), KeyCode::Char('n')]);
        assert!(app.should_quit());
    }

    #[test]
    fn cursor_stays_inside_outer_wall() {
        let mut app = tiny_app();
        press(&mut app, &[KeyCode::Tab]);
        press(&mut app, &[KeyCode::Up, KeyCode::Left, KeyCode::Left]);
        assert_eq!(app.cursor(), (1, 1));
        press(&mut app, &[KeyCode::Right; 6]);
        assert_eq!(app.cursor(), (1, 3));
    }

    #[test]
    fn solving_records_best_time() {
        let mut app = tiny_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('d')]);
        assert_eq!(app.game().map(Game::status), Some(Status::Won));
        assert!(app.message().starts_with("Solved in"));
        assert!(app
            .session()
            .store()
            .load("tiny")
            .and_then(|r| r.fastest_time)
            .is_some());
    }

    #[test]
    fn save_as_prompt_collects_a_name() {
        let mut app = tiny_app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('a')]);
        assert_eq!(
            app.input(),
            &Input::Text {
                field: TextField::SaveAs,
                buffer: "tiny".to_string()
            }
        );
        press(&mut app, &[KeyCode::Char('2'), KeyCode::Enter]);
        assert_eq!(app.session().name(), Some("tiny2"));
        assert!(app.session().store().contains("tiny2"));
        assert!(app.session().store().contains("tiny"));
    }

    #[test]
    fn save_as_existing_name_asks_to_overwrite() {
        let mut app = tiny_app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('a'), KeyCode::Enter]);
        assert_eq!(
            app.input(),
            &Input::Confirm {
                prompt: Prompt::Overwrite("tiny".to_string()),
                pending: Pending::SaveAs("tiny".to_string()),
            }
        );
        press(&mut app, &[KeyCode::Char('y')]);
        assert_eq!(app.message(), "Saved 'tiny'");
    }

    #[test]
    fn saving_a_new_maze_asks_for_a_name() {
        let mut app = app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('n'), KeyCode::Char('s')]);
        assert!(matches!(
            app.input(),
            Input::Text {
                field: TextField::SaveAs,
                ..
            }
        ));
    }

    #[test]
    fn import_over_unnamed_maze_stays_pending() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("other.maze");
        std::fs::write(&file, TINY).unwrap();

        let mut app = app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('n'), KeyCode::Char('l'), KeyCode::Char(' ')]);
        assert!(app.session().is_dirty());
        assert_eq!(app.session().name(), None);

        press(&mut app, &[KeyCode::Char('i')]);
        let typed: Vec<KeyCode> = file.to_string_lossy().chars().map(KeyCode::Char).collect();
        press(&mut app, &typed);
        press(&mut app, &[KeyCode::Enter]);
        assert!(matches!(
            app.input(),
            Input::Confirm {
                prompt: Prompt::SaveChanges,
                ..
            }
        ));

        // yes cannot save an unnamed maze, the import is still waiting
        press(&mut app, &[KeyCode::Char('y')]);
        assert!(matches!(
            app.input(),
            Input::Confirm {
                prompt: Prompt::SaveChanges,
                pending: Pending::Import { save_changes: None, .. },
            }
        ));
        assert!(app.message().contains("no name"));

        press(&mut app, &[KeyCode::Char('n')]);
        assert!(matches!(app.input(), Input::Idle));
        assert_eq!(app.session().name(), Some("other"));
        assert_eq!(app.message(), "Imported 'other'");
    }

    #[test]
    fn resize_prompt_changes_dimensions() {
        let mut app = tiny_app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('r')]);
        press(&mut app, &[KeyCode::Backspace; 3]);
        for c in "4x3".chars() {
            press(&mut app, &[KeyCode::Char(c)]);
        }
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.session().layout().play_size(), (4, 3));
        assert_eq!(app.message(), "Resized to 4x3");
    }

    #[test]
    fn brackets_cycle_through_mazes() {
        let mut app = app();
        let names = app.session().store().names();
        press(&mut app, &[KeyCode::Char(']')]);
        assert_eq!(app.session().name(), Some(names[1].as_str()));
        press(&mut app, &[KeyCode::Char('['), KeyCode::Char('[')]);
        assert_eq!(app.session().name(), names.last().map(String::as_str));
    }

    #[test]
    fn unplayable_maze_stays_in_edit_mode() {
        let mut app = app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('n'), KeyCode::Tab]);
        assert_eq!(app.session().mode(), Mode::Edit);
        assert_eq!(app.message(), "You must have 1 start and at least 1 goal.");
    }
}
