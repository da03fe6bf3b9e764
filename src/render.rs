use std::io::{self, Stdout, Write};
use std::time::Instant;

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use draw_the_maze::play::{format_clock, Dir, Game, Status, Tile, VIEW_RADIUS, VIEW_SIZE};
use draw_the_maze::{Cell as MazeCell, Layout, MazeStore, Mode};

use crate::app::{App, Input};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Wall,
    Empty,
    Start,
    Goal,
    Collected,
    Player,
    Fog,
    Arrow(Dir),
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
    cursor: bool,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: Glyph::Empty,
        color: Color::Reset,
        cursor: false,
    };

    fn new(glyph: Glyph, color: Color) -> Self {
        Self {
            glyph,
            color,
            cursor: false,
        }
    }
}

struct Frame {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

pub struct Renderer {
    last: Vec<Cell>,
    last_dims: (usize, usize),
    last_hud: String,
    last_status: String,
    last_help: &'static str,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_dims: (0, 0),
            last_hud: String::new(),
            last_status: String::new(),
            last_help: "",
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

pub fn render<S: MazeStore>(
    stdout: &mut Stdout,
    app: &App<S>,
    renderer: &mut Renderer,
    now: Instant,
) -> io::Result<()> {
    let frame = build_frame(app);
    let needed_h = (frame.height + 3) as u16;
    let needed_w = (frame.width * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    if (frame.width, frame.height) != renderer.last_dims {
        renderer.last_dims = (frame.width, frame.height);
        renderer.last = vec![Cell::BLANK; frame.width * frame.height];
        renderer.needs_full = true;
    }
    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = hud_line(app, now);
    if renderer.needs_full || hud != renderer.last_hud {
        draw_line(stdout, renderer.origin_y - 1, &hud, Color::White)?;
        renderer.last_hud = hud;
    }

    for y in 0..frame.height {
        for x in 0..frame.width {
            let idx = y * frame.width + x;
            let cell = frame.cells[idx];
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }

    let status = status_line(app);
    let status_y = renderer.origin_y + frame.height as u16;
    if renderer.needs_full || status != renderer.last_status {
        draw_line(stdout, status_y, &status, Color::Yellow)?;
        renderer.last_status = status;
    }
    let help = help_line(app.session().mode());
    if renderer.needs_full || help != renderer.last_help {
        draw_line(stdout, status_y + 1, help, Color::DarkGrey)?;
        renderer.last_help = help;
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn build_frame<S: MazeStore>(app: &App<S>) -> Frame {
    match (app.session().mode(), app.game()) {
        (Mode::Play, Some(game)) if game.shows_full_maze() => full_game_frame(game),
        (Mode::Play, Some(game)) => viewport_frame(game),
        (mode, _) => {
            let cursor = (mode == Mode::Edit).then(|| app.cursor());
            layout_frame(app.session().layout(), cursor)
        }
    }
}

fn layout_frame(layout: &Layout, cursor: Option<(usize, usize)>) -> Frame {
    let (width, height) = (layout.width(), layout.height());
    let mut cells = Vec::with_capacity(width * height);
    for (r, row) in layout.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let mut cell = match cell {
                MazeCell::Wall => Cell::new(Glyph::Wall, Color::Blue),
                MazeCell::Space => Cell::BLANK,
                MazeCell::Start => Cell::new(Glyph::Start, Color::Green),
                MazeCell::Goal => Cell::new(Glyph::Goal, Color::Yellow),
            };
            if cursor == Some((r, c)) {
                cell.cursor = true;
                if cell.glyph == Glyph::Wall {
                    cell.color = Color::DarkCyan;
                }
            }
            cells.push(cell);
        }
        // short rows in a malformed layout
        cells.resize((r + 1) * width, Cell::BLANK);
    }
    Frame {
        width,
        height,
        cells,
    }
}

fn full_game_frame(game: &Game) -> Frame {
    let layout = game.layout();
    let (width, height) = (layout.width(), layout.height());
    let mut cells = Vec::with_capacity(width * height);
    for r in 0..height {
        for c in 0..width {
            cells.push(tile_cell(game.tile_at(r as isize, c as isize)));
        }
    }
    Frame {
        width,
        height,
        cells,
    }
}

fn viewport_frame(game: &Game) -> Frame {
    let mut cells: Vec<Cell> = game
        .viewport()
        .iter()
        .flat_map(|line| line.iter().map(|tile| tile_cell(*tile)))
        .collect();
    if game.status() == Status::Running {
        for dir in game.open_directions() {
            let (row, col) = arrow_slot(dir);
            cells[row * VIEW_SIZE + col] = Cell::new(Glyph::Arrow(dir), Color::Cyan);
        }
    }
    Frame {
        width: VIEW_SIZE,
        height: VIEW_SIZE,
        cells,
    }
}

/// Arrow hints sit on the square a move would land on, past the gate.
fn arrow_slot(dir: Dir) -> (usize, usize) {
    match dir {
        Dir::Up => (VIEW_RADIUS - 2, VIEW_RADIUS),
        Dir::Down => (VIEW_RADIUS + 2, VIEW_RADIUS),
        Dir::Left => (VIEW_RADIUS, VIEW_RADIUS - 2),
        Dir::Right => (VIEW_RADIUS, VIEW_RADIUS + 2),
    }
}

fn tile_cell(tile: Tile) -> Cell {
    match tile {
        Tile::Outside { wall_line: true } => Cell::new(Glyph::Fog, Color::DarkGrey),
        Tile::Outside { wall_line: false } => Cell::BLANK,
        Tile::Wall => Cell::new(Glyph::Wall, Color::Blue),
        Tile::Space => Cell::BLANK,
        Tile::Start => Cell::new(Glyph::Start, Color::Green),
        Tile::Goal => Cell::new(Glyph::Goal, Color::Yellow),
        Tile::Collected => Cell::new(Glyph::Collected, Color::DarkYellow),
        Tile::Player => Cell::new(Glyph::Player, Color::Yellow),
    }
}

fn hud_line<S: MazeStore>(app: &App<S>, now: Instant) -> String {
    let session = app.session();
    let name = session.name().unwrap_or("(unsaved)");
    let dirty = if session.is_dirty() { "*" } else { "" };
    let (w, h) = session.layout().play_size();
    let mut hud = format!("{name}{dirty}  {w}x{h}");
    match (session.mode(), app.game()) {
        (Mode::Edit, _) => {
            hud.push_str("  EDIT");
            if session.editor().markers_locked() {
                hud.push_str(" (markers locked)");
            }
        }
        (Mode::Play, Some(game)) => {
            hud.push_str(&format!(
                "  PLAY  {}  goals left: {}",
                app.clock(now),
                game.goals_left()
            ));
        }
        (Mode::Play, None) => hud.push_str("  PLAY"),
    }
    if let Some(best) = session.fastest_time() {
        hud.push_str(&format!("  best: {}", format_clock(best)));
    }
    hud
}

fn status_line<S: MazeStore>(app: &App<S>) -> String {
    match app.input() {
        Input::Idle => app.message().to_string(),
        Input::Confirm { prompt, .. } => {
            let ask = format!("{}  [y]es / [n]o / [c]ancel", crate::app::question(prompt));
            match app.message() {
                "" => ask,
                message => format!("{message}  {ask}"),
            }
        }
        Input::Text { field, buffer } => format!("{}: {buffer}_", field.label()),
    }
}

fn help_line(mode: Mode) -> &'static str {
    match mode {
        Mode::Edit => {
            "hjkl/arrows move  space toggle  u undo  c clear  r resize  n new  s save  a save as  t rename  g lock  d delete  i import  o export  F flush  [ ] mazes  tab play  q quit"
        }
        Mode::Play => {
            "enter start/pause  hjkl/wasd/arrows move  [ ] mazes  tab edit  q quit"
        }
    }
}

fn draw_line(stdout: &mut Stdout, y: u16, text: &str, color: Color) -> io::Result<()> {
    stdout.queue(MoveTo(0, y))?;
    stdout.queue(Clear(ClearType::CurrentLine))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    stdout.queue(ResetColor)?;
    Ok(())
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Wall => "██",
        Glyph::Empty => "  ",
        Glyph::Start => "⚑ ",
        Glyph::Goal => "★ ",
        Glyph::Collected => "· ",
        Glyph::Player => "😃",
        Glyph::Fog => "░░",
        Glyph::Arrow(Dir::Up) => "↑ ",
        Glyph::Arrow(Dir::Down) => "↓ ",
        Glyph::Arrow(Dir::Left) => "← ",
        Glyph::Arrow(Dir::Right) => "→ ",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    if cell.cursor {
        stdout.queue(SetBackgroundColor(Color::DarkGrey))?;
    }
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_mark_the_target_squares() {
        assert_eq!(arrow_slot(Dir::Up), (0, 2));
        assert_eq!(arrow_slot(Dir::Down), (4, 2));
        assert_eq!(arrow_slot(Dir::Left), (2, 0));
        assert_eq!(arrow_slot(Dir::Right), (2, 4));
    }

    #[test]
    fn running_viewport_leaves_gates_visible() {
        let layout = Layout::decode(".......\n.x   *.\n.......");
        let mut game = Game::new(layout).unwrap();
        game.start_or_pause(Instant::now());
        let frame = viewport_frame(&game);
        let at = |row: usize, col: usize| frame.cells[row * VIEW_SIZE + col].glyph;
        assert!(at(2, 4) == Glyph::Arrow(Dir::Right));
        assert!(at(2, 3) == Glyph::Empty);
        assert!(at(2, 2) == Glyph::Player);
        assert!(at(2, 1) == Glyph::Wall);
    }
}
