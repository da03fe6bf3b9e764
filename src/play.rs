use std::time::{Duration, Instant};

use log::{debug, info};

use crate::cell::{is_wall_line, Cell};
use crate::error::LayoutError;
use crate::layout::Layout;
use crate::validate::{validate, Mode};

/// Cells visible on each side of the player.
pub const VIEW_RADIUS: usize = 2;
pub const VIEW_SIZE: usize = VIEW_RADIUS * 2 + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ready,
    Running,
    Paused,
    Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The clock is not running.
    Ignored,
    Blocked,
    Moved,
    Collected { remaining: usize },
    Won { elapsed: Duration },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cheat {
    WalkThroughWalls,
    RevealMaze,
    InvisibleWalls,
    ResetTimer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cheats {
    pub walk_through_walls: bool,
    pub reveal_maze: bool,
    pub invisible_walls: bool,
}

/// What the player sees at one grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    /// Beyond the edge of the maze; `wall_line` marks wall-row/column positions.
    Outside { wall_line: bool },
    Wall,
    Space,
    Start,
    Goal,
    Collected,
    Player,
}

pub struct Game {
    layout: Layout,
    board: Layout,
    collected: Vec<Pos>,
    player: Pos,
    goals_left: usize,
    status: Status,
    started_at: Option<Instant>,
    banked: Duration,
    cheats: Cheats,
}

impl Game {
    /// The layout must pass play-mode validation.
    pub fn new(layout: Layout) -> Result<Self, LayoutError> {
        validate(&layout.encode(), Mode::Play)?;
        let (row, col) = layout
            .find(Cell::Start)
            .ok_or(LayoutError::InvalidStartOrGoalCount)?;
        let goals_left = layout.count(Cell::Goal);
        Ok(Self {
            board: layout.clone(),
            layout,
            collected: Vec::new(),
            player: Pos { row, col },
            goals_left,
            status: Status::Ready,
            started_at: None,
            banked: Duration::ZERO,
            cheats: Cheats::default(),
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn goals_left(&self) -> usize {
        self.goals_left
    }

    pub fn cheats(&self) -> Cheats {
        self.cheats
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn shows_full_maze(&self) -> bool {
        self.cheats.reveal_maze || self.status == Status::Won
    }

    /// Start, pause or resume, like a single Start!/Pause/Resume button.
    pub fn start_or_pause(&mut self, now: Instant) -> Status {
        match self.status {
            Status::Ready | Status::Won => {
                self.reset();
                self.started_at = Some(now);
                self.status = Status::Running;
                info!("game started, {} goals to collect", self.goals_left);
            }
            Status::Running => {
                self.banked = self.elapsed(now);
                self.started_at = None;
                self.status = Status::Paused;
            }
            Status::Paused => {
                self.started_at = Some(now);
                self.status = Status::Running;
            }
        }
        self.status
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .started_at
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
        self.banked + running
    }

    pub fn step(&mut self, dir: Dir, now: Instant) -> MoveOutcome {
        if self.status != Status::Running {
            return MoveOutcome::Ignored;
        }
        let Some(gate) = offset(self.player, dir, 1) else {
            return MoveOutcome::Blocked;
        };
        match self.board.get(gate.row, gate.col) {
            None => return MoveOutcome::Blocked,
            Some(Cell::Wall) if !self.cheats.walk_through_walls => return MoveOutcome::Blocked,
            Some(_) => {}
        }
        let Some(target) = offset(self.player, dir, 2) else {
            return MoveOutcome::Blocked;
        };
        let Some(cell) = self.board.get(target.row, target.col) else {
            return MoveOutcome::Blocked;
        };

        self.player = target;
        if cell != Cell::Goal {
            return MoveOutcome::Moved;
        }

        self.board.set(target.row, target.col, Cell::Space);
        self.collected.push(target);
        self.goals_left = self.goals_left.saturating_sub(1);
        debug!("goal collected at {}-{}", target.row, target.col);
        if self.goals_left > 0 {
            return MoveOutcome::Collected {
                remaining: self.goals_left,
            };
        }

        self.banked = self.elapsed(now);
        self.started_at = None;
        self.status = Status::Won;
        info!("maze solved in {}", format_clock(self.banked));
        MoveOutcome::Won {
            elapsed: self.banked,
        }
    }

    /// Cheats only apply while the clock is running.
    pub fn cheat(&mut self, cheat: Cheat, now: Instant) -> bool {
        if self.status != Status::Running {
            return false;
        }
        match cheat {
            Cheat::WalkThroughWalls => self.cheats.walk_through_walls = true,
            Cheat::RevealMaze => self.cheats.reveal_maze = true,
            Cheat::InvisibleWalls => self.cheats.invisible_walls = true,
            Cheat::ResetTimer => {
                self.banked = Duration::ZERO;
                self.started_at = Some(now);
            }
        }
        debug!("cheat enabled: {:?}", cheat);
        true
    }

    pub fn tile_at(&self, row: isize, col: isize) -> Tile {
        if row < 0 || col < 0 {
            return outside(row, col);
        }
        let pos = Pos {
            row: row as usize,
            col: col as usize,
        };
        let Some(cell) = self.board.get(pos.row, pos.col) else {
            return outside(row, col);
        };
        if pos == self.player {
            return Tile::Player;
        }
        if self.collected.contains(&pos) {
            return Tile::Collected;
        }
        match cell {
            Cell::Wall if self.cheats.invisible_walls => Tile::Space,
            Cell::Wall => Tile::Wall,
            Cell::Space => Tile::Space,
            Cell::Start => Tile::Start,
            Cell::Goal => Tile::Goal,
        }
    }

    /// The window of cells around the player, row by row.
    pub fn viewport(&self) -> [[Tile; VIEW_SIZE]; VIEW_SIZE] {
        let mut view = [[Tile::Outside { wall_line: false }; VIEW_SIZE]; VIEW_SIZE];
        let radius = VIEW_RADIUS as isize;
        for (i, line) in view.iter_mut().enumerate() {
            for (j, tile) in line.iter_mut().enumerate() {
                let row = self.player.row as isize + i as isize - radius;
                let col = self.player.col as isize + j as isize - radius;
                *tile = self.tile_at(row, col);
            }
        }
        view
    }

    /// Directions with an open gate and a square behind it.
    pub fn open_directions(&self) -> Vec<Dir> {
        Dir::ALL
            .into_iter()
            .filter(|dir| {
                let gate_open = offset(self.player, *dir, 1)
                    .and_then(|p| self.board.get(p.row, p.col))
                    .is_some_and(|cell| cell != Cell::Wall);
                let has_target = offset(self.player, *dir, 2)
                    .and_then(|p| self.board.get(p.row, p.col))
                    .is_some();
                gate_open && has_target
            })
            .collect()
    }

    fn reset(&mut self) {
        self.board = self.layout.clone();
        self.collected.clear();
        self.goals_left = self.layout.count(Cell::Goal);
        if let Some((row, col)) = self.layout.find(Cell::Start) {
            self.player = Pos { row, col };
        }
        self.banked = Duration::ZERO;
        self.started_at = None;
        self.cheats = Cheats::default();
    }
}

fn offset(pos: Pos, dir: Dir, distance: isize) -> Option<Pos> {
    let (dr, dc) = dir.delta();
    let row = pos.row as isize + dr * distance;
    let col = pos.col as isize + dc * distance;
    if row < 0 || col < 0 {
        return None;
    }
    Some(Pos {
        row: row as usize,
        col: col as usize,
    })
}

fn outside(row: isize, col: isize) -> Tile {
    Tile::Outside {
        wall_line: is_wall_line(row.unsigned_abs()) || is_wall_line(col.unsigned_abs()),
    }
}

/// `mm:ss.mmm`
pub fn format_clock(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    format!(
        "{:02}:{:02}.{:03}",
        millis / 60_000,
        (millis / 1000) % 60,
        millis % 1000
    )
}
