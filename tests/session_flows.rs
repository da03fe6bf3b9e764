use std::fs;
use std::time::{Duration, Instant};

use draw_the_maze::defaults::DEFAULT_MAZES;
use draw_the_maze::play::{Dir, MoveOutcome, Status};
use draw_the_maze::transfer::{read_maze_file, write_maze_file};
use draw_the_maze::{
    Confirm, FileStore, MazeSize, MazeStore, MemoryStore, Mode, Outcome, Prompt, Session,
    SessionError,
};

const CORRIDOR: &str = ".......\n.x * *.\n.......";

#[test]
fn draw_save_and_play_a_new_maze() {
    let mut session = Session::open(MemoryStore::new(), MazeSize::new(3, 1).unwrap()).unwrap();
    assert_eq!(session.new_maze(None).unwrap(), Outcome::Done);
    assert_eq!(session.layout().encode(), ".......\n.     .\n.......");

    session.toggle(1, 1).unwrap();
    session.toggle(1, 5).unwrap();
    session.toggle(1, 4).unwrap();
    assert_eq!(session.layout().encode(), ".......\n.x  .*.\n.......");

    assert_eq!(session.save_as("blocked", None).unwrap(), Outcome::Done);
    session.set_mode(Mode::Play).unwrap();
    let mut game = session.start_game().unwrap();
    let t0 = Instant::now();
    game.start_or_pause(t0);
    assert_eq!(game.step(Dir::Right, t0), MoveOutcome::Moved);
    assert_eq!(game.step(Dir::Right, t0), MoveOutcome::Blocked);

    session.set_mode(Mode::Edit).unwrap();
    session.toggle(1, 4).unwrap();
    assert!(session.is_dirty());
    assert_eq!(session.save(None).unwrap(), Outcome::Done);

    session.set_mode(Mode::Play).unwrap();
    let mut game = session.start_game().unwrap();
    game.start_or_pause(t0);
    game.step(Dir::Right, t0);
    let done = t0 + Duration::from_millis(1500);
    assert_eq!(
        game.step(Dir::Right, done),
        MoveOutcome::Won {
            elapsed: Duration::from_millis(1500)
        }
    );
    assert!(session.record_time(Duration::from_millis(1500)).unwrap());
    assert_eq!(session.store().load("blocked").unwrap().fastest_time, Some(1500));
}

#[test]
fn collecting_every_goal_wins() {
    let mut session = Session::open(MemoryStore::new(), MazeSize::DEFAULT).unwrap();
    session.import("corridor.maze", CORRIDOR, None, None).unwrap();
    let mut game = session.start_game().unwrap();
    let t0 = Instant::now();
    assert_eq!(game.step(Dir::Right, t0), MoveOutcome::Ignored);
    game.start_or_pause(t0);
    assert_eq!(
        game.step(Dir::Right, t0),
        MoveOutcome::Collected { remaining: 1 }
    );
    assert!(matches!(game.step(Dir::Right, t0), MoveOutcome::Won { .. }));
    assert_eq!(game.status(), Status::Won);
    assert!(game.shows_full_maze());
}

#[test]
fn file_store_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mazes.json");

    {
        let store = FileStore::open(&path).unwrap();
        let mut session = Session::open(store, MazeSize::DEFAULT).unwrap();
        session.import("corridor.maze", CORRIDOR, None, None).unwrap();
        session.record_time(Duration::from_millis(4321)).unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.names().len(), DEFAULT_MAZES.len() + 1);
    let record = store.load("corridor").unwrap();
    assert_eq!(record.layout, CORRIDOR);
    assert_eq!(record.fastest_time, Some(4321));

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"FastestTime\": 4321"));
    assert!(json.contains("\"Name\": \"corridor\""));
}

#[test]
fn file_store_reads_legacy_null_slots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mazes.json");
    fs::write(
        &path,
        r#"{"mazes":[null,{"Name":"kept","FastestTime":null,"Layout":".....\n.x *.\n....."}]}"#,
    )
    .unwrap();

    let session = Session::open(FileStore::open(&path).unwrap(), MazeSize::DEFAULT).unwrap();
    assert_eq!(session.store().names(), ["kept"]);
    assert_eq!(session.name(), Some("kept"));
}

#[test]
fn corrupt_store_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mazes.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(FileStore::open(&path).is_err());
}

#[test]
fn export_then_import_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::open(MemoryStore::new(), MazeSize::DEFAULT).unwrap();
    let (file_name, text) = session.export();
    let name = session.name().unwrap().to_string();
    let written = write_maze_file(dir.path(), &name, &text).unwrap();
    assert_eq!(written.file_name().unwrap().to_string_lossy(), file_name);

    // windows line endings and a trailing newline come back clean
    fs::write(&written, format!("{}\r\n", text.replace('\n', "\r\n"))).unwrap();
    let (read_name, read_text) = read_maze_file(&written).unwrap();
    assert_eq!(read_name, name);
    assert_eq!(read_text, text);

    let mut other = Session::open(MemoryStore::with_records(Vec::new()), MazeSize::DEFAULT).unwrap();
    other.flush(Some(Confirm::Yes)).unwrap();
    assert_eq!(
        other
            .import(&file_name, &read_text, None, None)
            .unwrap(),
        Outcome::NeedsConfirm(Prompt::Overwrite(name.clone()))
    );
}

#[test]
fn rename_then_delete_round_trip() {
    let mut session = Session::open(MemoryStore::new(), MazeSize::DEFAULT).unwrap();
    let first = DEFAULT_MAZES[0].0;
    session.rename("").unwrap_err();
    session.rename("warmup").unwrap();
    session.save(None).unwrap();
    assert!(!session.store().contains(first));

    assert_eq!(
        session.delete(None).unwrap(),
        Outcome::NeedsConfirm(Prompt::Delete(Some("warmup".to_string())))
    );
    session.delete(Some(Confirm::Yes)).unwrap();
    assert!(!session.store().contains("warmup"));
    assert_eq!(session.name(), Some(DEFAULT_MAZES[1].0));
}

#[test]
fn unsaved_new_maze_can_be_discarded() {
    let mut session = Session::open(MemoryStore::new(), MazeSize::DEFAULT).unwrap();
    session.new_maze(None).unwrap();
    session.toggle(2, 1).unwrap();
    assert_eq!(
        session.select(DEFAULT_MAZES[3].0, Some(Confirm::Yes)).map_err(|e| e.to_string()),
        Err(SessionError::Unnamed.to_string())
    );
    assert_eq!(session.delete(None).unwrap(), Outcome::NeedsConfirm(Prompt::Delete(None)));
    session.delete(Some(Confirm::Yes)).unwrap();
    assert_eq!(session.name(), Some(DEFAULT_MAZES[0].0));
    assert!(!session.is_dirty());
}
