//! Session state and core simulation types
//!
//! A `GameState` is one complete playthrough: maze, player, hazards, timer
//! and status, all derived deterministically from a single seed. Restarting
//! builds a fresh value rather than patching the old one.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::maze::Maze;
use super::player::Player;
use crate::cell_center;
use crate::consts::*;

/// Current status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }

    /// Terminal states admit no transitions short of a full restart
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// A stationary hazard: step inside its radius and the run ends
#[derive(Debug, Clone, Copy)]
pub struct Hazard {
    pub pos: Vec2,
    pub radius: f32,
}

/// Why a session was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossCause {
    Timeout,
    Hazard,
}

/// Effects a tick asks the session layer to realize as audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Sonar ray hit a wall; spawn a ping at the hit point
    SonarPing { pos: Vec2, distance: f32 },
    /// Local feedback ping at the player position, fired on every sonar use
    LocalPing { pos: Vec2 },
    Won,
    Lost(LossCause),
}

/// Complete per-session simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed this session was derived from
    pub seed: u64,
    pub maze: Maze,
    pub player: Player,
    pub hazards: Vec<Hazard>,
    pub status: GameStatus,
    /// Countdown in seconds; hitting zero loses the run
    pub time_left: f32,
}

impl GameState {
    /// Build a session with the default maze dimensions
    pub fn new(seed: u64) -> Self {
        Self::with_dimensions(seed, MAZE_WIDTH, MAZE_HEIGHT, TIME_BUDGET)
    }

    /// Build a session with explicit maze dimensions and time budget
    pub fn with_dimensions(seed: u64, width: usize, height: usize, time_budget: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let maze = Maze::generate(width, height, &mut rng);
        let player = Player::new(&maze);
        let hazards = place_hazards(&maze, &mut rng);

        log::info!(
            "session seed {seed}: {width}x{height} maze, {} hazards",
            hazards.len()
        );

        Self {
            seed,
            maze,
            player,
            hazards,
            status: GameStatus::Playing,
            time_left: time_budget,
        }
    }

    /// World-space center of the exit cell
    pub fn exit_center(&self) -> Vec2 {
        self.maze.exit_center()
    }
}

/// Pick hazard cells uniformly from the cells that qualify: open, outside
/// the start keepout square (Chebyshev distance), and never the exit cell.
/// Small mazes may have no qualifying cell at the full keepout, so it
/// shrinks until candidates appear.
fn place_hazards(maze: &Maze, rng: &mut impl Rng) -> Vec<Hazard> {
    let mut keepout = HAZARD_KEEPOUT;
    let candidates = loop {
        let cells = eligible_cells(maze, keepout);
        if !cells.is_empty() {
            break cells;
        }
        if keepout == 0 {
            log::warn!("no cell qualifies for hazards, spawning none");
            return Vec::new();
        }
        keepout -= 1;
    };

    (0..HAZARD_COUNT)
        .map(|_| {
            let (hx, hy) = candidates[rng.random_range(0..candidates.len())];
            Hazard {
                pos: cell_center(hx, hy),
                radius: HAZARD_RADIUS,
            }
        })
        .collect()
}

fn eligible_cells(maze: &Maze, keepout: i64) -> Vec<(usize, usize)> {
    let start = maze.start();
    let exit = maze.exit();
    let mut cells = Vec::new();

    for hy in 0..maze.height() {
        for hx in 0..maze.width() {
            if maze.is_wall_cell(hx as i64, hy as i64) || (hx, hy) == exit {
                continue;
            }
            let cheb = (hx as i64 - start.0 as i64)
                .abs()
                .max((hy as i64 - start.1 as i64).abs());
            if cheb >= keepout {
                cells.push((hx, hy));
            }
        }
    }
    cells
}
