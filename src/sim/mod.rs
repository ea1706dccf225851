//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, injected at generation time
//! - Frame-source-agnostic: driven entirely through `tick(state, input, dt)`
//! - No audio or platform dependencies; effects surface as `GameEvent`s

pub mod maze;
pub mod player;
pub mod raycast;
pub mod state;
pub mod tick;

pub use maze::{Cell, Maze};
pub use player::{PLAYER_UP, Player};
pub use raycast::{RaycastHit, SONAR_DIRECTIONS, raycast};
pub use state::{GameEvent, GameState, GameStatus, Hazard, LossCause};
pub use tick::{TickInput, tick};
