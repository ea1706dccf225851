//! Per-frame simulation step
//!
//! `tick` advances one session by one frame and reports the audio-relevant
//! effects as events. It is frame-source-agnostic: tests drive it with
//! synthetic dt values, the browser glue drives it from rAF deltas.

use super::raycast::{SONAR_DIRECTIONS, raycast};
use super::state::{GameEvent, GameState, GameStatus, LossCause};
use crate::consts::*;

/// Input snapshot for a single frame. Movement flags are level-triggered
/// (held keys); `sonar` is edge-triggered and the glue clears it after the
/// frame that consumed it.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Fire the sonar this frame
    pub sonar: bool,
}

/// Advance the session by `dt` seconds.
///
/// Evaluation order within a frame is a deliberate tie-break: movement, then
/// sonar, then win, then timeout, then hazards. If the player reaches the
/// exit and touches a hazard on the same frame, the win stands. Terminal
/// states make this a no-op, so a loss can only fire once.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.status.is_terminal() {
        return events;
    }

    state.player.update(&state.maze, input, dt);

    if input.sonar {
        fire_sonar(state, &mut events);
    }

    // Win: close enough to the exit-cell center
    let dist_to_exit = state.player.pos.distance(state.exit_center());
    if dist_to_exit < WIN_RADIUS {
        state.status = GameStatus::Won;
        events.push(GameEvent::Won);
        log::info!("session won with {:.1}s left", state.time_left);
        return events;
    }

    // Timeout
    state.time_left -= dt;
    if state.time_left <= 0.0 {
        state.status = GameStatus::Lost;
        events.push(GameEvent::Lost(LossCause::Timeout));
        log::info!("session lost: out of time");
        return events;
    }

    // Hazards, in setup order
    for hazard in &state.hazards {
        if state.player.pos.distance(hazard.pos) < hazard.radius {
            state.status = GameStatus::Lost;
            events.push(GameEvent::Lost(LossCause::Hazard));
            log::info!("session lost: hazard at {:?}", hazard.pos);
            return events;
        }
    }

    events
}

/// Cast the eight fixed rays and report a ping per wall hit, plus the local
/// feedback ping that always fires. No cooldown: rapid presses stack
/// concurrent pings, bounded only by their own decay.
fn fire_sonar(state: &GameState, events: &mut Vec<GameEvent>) {
    let origin = state.player.pos;

    for dir in SONAR_DIRECTIONS {
        let hit = raycast(&state.maze, origin, dir, SONAR_RANGE);
        if hit.hit {
            events.push(GameEvent::SonarPing {
                pos: hit.point,
                distance: hit.distance,
            });
        }
    }

    events.push(GameEvent::LocalPing { pos: origin });
}
