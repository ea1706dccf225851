//! Player pose integration and wall collision
//!
//! Movement is resolved one axis at a time against leading-edge probes, so a
//! diagonal push into a corner degrades into a slide along the open axis
//! instead of a dead stop. Forward and strafe contributions are additive and
//! deliberately not normalized; diagonal input is faster and the game is
//! balanced around that.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use super::maze::Maze;
use super::tick::TickInput;
use crate::consts::{MOVE_SPEED, PLAYER_RADIUS, TURN_SPEED};
use crate::heading_vector;

/// Listener up vector - the player only yaws, never pitches or rolls
pub const PLAYER_UP: Vec3 = Vec3::Z;

/// The player's pose: continuous position plus heading
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Heading in radians, 0 = +x
    pub heading: f32,
}

impl Player {
    /// Spawn at the center of the maze's start cell, facing +x
    pub fn new(maze: &Maze) -> Self {
        Self {
            pos: maze.start_center(),
            heading: 0.0,
        }
    }

    /// Forward vector in the world plane
    pub fn forward(&self) -> Vec2 {
        heading_vector(self.heading)
    }

    /// Right vector (heading + 90 degrees) - the strafe axis
    pub fn right(&self) -> Vec2 {
        heading_vector(self.heading + FRAC_PI_2)
    }

    /// Position lifted into listener space (z = 0)
    pub fn position3(&self) -> Vec3 {
        self.pos.extend(0.0)
    }

    /// Forward vector lifted into listener space (z = 0)
    pub fn forward3(&self) -> Vec3 {
        self.forward().extend(0.0)
    }

    /// Integrate one tick of input
    pub fn update(&mut self, maze: &Maze, input: &TickInput, dt: f32) {
        if input.turn_left {
            self.heading -= TURN_SPEED * dt;
        }
        if input.turn_right {
            self.heading += TURN_SPEED * dt;
        }

        let forward = self.forward();
        let right = self.right();

        let mut delta = Vec2::ZERO;
        if input.forward {
            delta += forward * MOVE_SPEED * dt;
        }
        if input.backward {
            delta -= forward * MOVE_SPEED * dt;
        }
        if input.strafe_left {
            delta -= right * MOVE_SPEED * dt;
        }
        if input.strafe_right {
            delta += right * MOVE_SPEED * dt;
        }

        let next = self.pos + delta;

        // X first, probing at the leading edge with the *current* y; then y
        // against the possibly-updated x. The asymmetry is what produces
        // wall sliding.
        let edge_x = next.x + if delta.x > 0.0 { PLAYER_RADIUS } else { -PLAYER_RADIUS };
        if !maze.is_wall(edge_x, self.pos.y) {
            self.pos.x = next.x;
        }

        let edge_y = next.y + if delta.y > 0.0 { PLAYER_RADIUS } else { -PLAYER_RADIUS };
        if !maze.is_wall(self.pos.x, edge_y) {
            self.pos.y = next.y;
        }
    }
}
