//! Echo Maze - an audio-only maze navigation game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, raycasting, movement, game state)
//! - `audio`: Spatial audio service abstraction + Web Audio backend
//! - `session`: Glues simulation to audio, drives a full game session
//! - `settings`: Player preferences

pub mod audio;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Maze dimensions in cells (odd numbers, required by the carving algorithm)
    pub const MAZE_WIDTH: usize = 15;
    pub const MAZE_HEIGHT: usize = 15;

    /// Player movement speed (cells/s) and turn speed (radians/s)
    pub const MOVE_SPEED: f32 = 3.0;
    pub const TURN_SPEED: f32 = 2.0;
    /// Collision radius used for leading-edge wall probes
    pub const PLAYER_RADIUS: f32 = 0.3;

    /// Session time budget in seconds
    pub const TIME_BUDGET: f32 = 120.0;
    /// Distance to the exit-cell center that counts as a win
    pub const WIN_RADIUS: f32 = 0.8;

    /// Hazard placement and collision
    pub const HAZARD_COUNT: usize = 3;
    pub const HAZARD_RADIUS: f32 = 0.6;
    /// Minimum Chebyshev distance (cells) between a hazard and the start cell
    pub const HAZARD_KEEPOUT: i64 = 3;

    /// Sonar ray range in cells
    pub const SONAR_RANGE: f32 = 8.0;
    /// Raycast march step (world units)
    pub const RAY_STEP: f32 = 0.5;

    /// Drone frequencies: high hum marks the goal, low growl marks hazards
    pub const GOAL_DRONE_HZ: f32 = 660.0;
    pub const HAZARD_DRONE_HZ: f32 = 55.0;
}

/// Center of cell (cx, cy) in world coordinates
#[inline]
pub fn cell_center(cx: usize, cy: usize) -> Vec2 {
    Vec2::new(cx as f32 + 0.5, cy as f32 + 0.5)
}

/// Unit vector for a heading angle (radians, 0 = +x)
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
