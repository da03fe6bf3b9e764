mod app;
mod render;

use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::info;

use draw_the_maze::play::format_clock;
use draw_the_maze::transfer::{read_maze_file, write_maze_file};
use draw_the_maze::{
    resize_to, validate, Confirm, FileStore, MazeSize, MazeStore, Mode, Outcome, Session, Settings,
};

use crate::app::App;
use crate::render::{render, Renderer};

#[derive(Parser, Debug)]
#[command(author, version, about = "Draw, check, resize and play text mazes", long_about = None)]
struct Cli {
    /// JSON file holding the saved mazes
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Size for new and cleared mazes, e.g. 12x8
    #[arg(long, global = true)]
    size: Option<MazeSize>,

    /// Screen refresh rate of the full-screen UI
    #[arg(long, global = true)]
    fps: Option<u64>,

    /// Write log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full-screen editor and game (the default)
    Tui {
        /// Open this saved maze instead of the first one
        #[arg(long)]
        maze: Option<String>,
    },
    /// Print a blank maze
    New { size: MazeSize },
    /// Print a maze file resized to a new size
    Resize { file: PathBuf, size: MazeSize },
    /// Check a maze file; exits with 1 when it is not valid
    Validate {
        file: PathBuf,
        /// Only check the grid, not the start and goals
        #[arg(long)]
        edit: bool,
    },
    /// List saved mazes
    List,
    /// Print a saved maze
    Show { name: String },
    /// Save a .maze file under its file name
    Import {
        file: PathBuf,
        /// Replace a saved maze with the same name
        #[arg(long)]
        force: bool,
    },
    /// Write a saved maze to <name>.maze
    Export {
        name: String,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Delete a saved maze
    Delete { name: String },
    /// Rename a saved maze
    Rename { old: String, new: String },
    /// Delete every saved maze and restore the starter set
    Flush,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = settings(&cli);
    let command = cli.command.unwrap_or(Command::Tui { maze: None });
    let tui = matches!(command, Command::Tui { .. });
    init_logging(tui, settings.log_file.as_deref())?;
    info!("starting with {settings:?}");

    match command {
        Command::Tui { maze } => {
            let mut session = open_session(&settings)?;
            if let Some(name) = maze {
                session
                    .select(&name, Some(Confirm::No))
                    .with_context(|| format!("Failed to open maze '{name}'"))?;
            }
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            let mut app = App::new(session, cwd);

            let mut stdout = io::stdout();
            terminal::enable_raw_mode()?;
            stdout.execute(EnterAlternateScreen)?;
            stdout.execute(Hide)?;

            let result = run(&mut stdout, &mut app, settings.frame_time());

            stdout.execute(Show)?;
            stdout.execute(LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
            result?;
        }
        Command::New { size } => println!("{}", resize_to(None, size)?),
        Command::Resize { file, size } => {
            let (_, text) = read_file(&file)?;
            println!("{}", resize_to(Some(&text), size)?);
        }
        Command::Validate { file, edit } => {
            let (_, text) = read_file(&file)?;
            let mode = if edit { Mode::Edit } else { Mode::Play };
            if let Err(err) = validate(&text, mode) {
                println!("{}: {err}", file.display());
                return Ok(ExitCode::FAILURE);
            }
            println!("{}: ok", file.display());
        }
        Command::List => {
            let session = open_session(&settings)?;
            for record in session.store().records() {
                let best = record
                    .fastest_time
                    .map(|ms| format_clock(Duration::from_millis(ms)))
                    .unwrap_or_else(|| "--:--.---".to_string());
                println!("{best}  {}", record.name);
            }
        }
        Command::Show { name } => {
            let session = open_session(&settings)?;
            let record = session
                .store()
                .load(&name)
                .with_context(|| format!("No maze named '{name}'"))?;
            println!("{}", record.layout);
        }
        Command::Import { file, force } => {
            let mut session = open_session(&settings)?;
            let contents = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let overwrite = force.then_some(Confirm::Yes);
            let file_name = file.to_string_lossy();
            match session.import(&file_name, &contents, Some(Confirm::No), overwrite)? {
                Outcome::Done => println!("imported '{}'", session.name().unwrap_or_default()),
                Outcome::NeedsConfirm(_) => {
                    bail!("A maze with that name already exists; pass --force to replace it")
                }
                Outcome::Cancelled => {}
            }
        }
        Command::Export { name, dir } => {
            let session = open_session(&settings)?;
            let record = session
                .store()
                .load(&name)
                .with_context(|| format!("No maze named '{name}'"))?;
            let path = write_maze_file(&dir, &record.name, &record.layout)
                .with_context(|| format!("Failed to write into {}", dir.display()))?;
            println!("{}", path.display());
        }
        Command::Delete { name } => {
            let mut session = open_session(&settings)?;
            session.select(&name, Some(Confirm::No))?;
            session.delete(Some(Confirm::Yes))?;
            println!("deleted '{name}'");
        }
        Command::Rename { old, new } => {
            let mut session = open_session(&settings)?;
            session.select(&old, Some(Confirm::No))?;
            session.rename(&new)?;
            if let Outcome::NeedsConfirm(_) = session.save(None)? {
                bail!("A maze named '{}' already exists", new.trim());
            }
            println!("renamed '{old}' to '{}'", new.trim());
        }
        Command::Flush => {
            let mut session = open_session(&settings)?;
            session.flush(Some(Confirm::Yes))?;
            println!("restored {} starter mazes", session.store().records().len());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run(stdout: &mut Stdout, app: &mut App<FileStore>, frame_time: Duration) -> Result<()> {
    let mut renderer = Renderer::new();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key, Instant::now()),
                Event::Resize(_, _) => renderer.invalidate(),
                _ => {}
            }
        }
        if app.should_quit() {
            return Ok(());
        }

        render(stdout, app, &mut renderer, Instant::now())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

/// Environment first, then flags.
fn settings(cli: &Cli) -> Settings {
    let mut settings = Settings::from_env();
    if let Some(store) = &cli.store {
        settings.store = store.clone();
    }
    if let Some(size) = cli.size {
        settings.size = size;
    }
    if let Some(fps) = cli.fps.filter(|fps| *fps > 0) {
        settings.fps = fps;
    }
    if let Some(log_file) = &cli.log_file {
        settings.log_file = Some(log_file.clone());
    }
    settings
}

/// The full-screen UI owns the terminal, so it only logs to a file.
fn init_logging(tui: bool, log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None if tui => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }
    builder.init();
    Ok(())
}

fn open_session(settings: &Settings) -> Result<Session<FileStore>> {
    let store = FileStore::open(&settings.store)
        .with_context(|| format!("Failed to open maze store {}", settings.store.display()))?;
    Ok(Session::open(store, settings.size)?)
}

fn read_file(path: &Path) -> Result<(String, String)> {
    if fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false) {
        bail!("{} is a directory", path.display());
    }
    read_maze_file(path).with_context(|| format!("Failed to read {}", path.display()))
}
