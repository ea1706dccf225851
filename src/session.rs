//! Game session orchestration
//!
//! A `Session` binds one simulation state to one sound scene: it drives the
//! per-frame tick, keeps the audio listener glued to the player's pose, and
//! translates tick events into emitter traffic. It is the only place the
//! simulation and the audio stack meet.

use glam::Vec2;

use crate::audio::{AudioService, DroneProfile, PingProfile, SoundScene};
use crate::consts::{MAZE_HEIGHT, MAZE_WIDTH, TIME_BUDGET};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, GameStatus, PLAYER_UP, TickInput, tick};

/// Optional per-frame observability hook. The session works identically with
/// no sink attached.
pub trait StatusSink {
    fn publish(&mut self, status: GameStatus, time_left: f32, player_pos: Vec2);
}

pub struct Session<A: AudioService> {
    state: GameState,
    scene: SoundScene<A>,
    /// False once a terminal transition has been handled; the host loop
    /// observes this to stop scheduling frames
    running: bool,
    sink: Option<Box<dyn StatusSink>>,
    /// World parameters reused by `restart`
    maze_width: usize,
    maze_height: usize,
    time_budget: f32,
}

impl<A: AudioService> Session<A> {
    /// Start a session with the default world parameters
    pub fn new(audio: A, seed: u64) -> Self {
        Self::with_dimensions(audio, seed, MAZE_WIDTH, MAZE_HEIGHT, TIME_BUDGET)
    }

    /// Start a session honoring the player's settings
    pub fn with_settings(audio: A, seed: u64, settings: &Settings) -> Self {
        Self::with_dimensions(
            audio,
            seed,
            settings.maze_width,
            settings.maze_height,
            settings.time_budget,
        )
    }

    /// Generate the world from `seed` and bring up the ambient soundscape
    /// (goal drone + one drone per hazard).
    pub fn with_dimensions(
        audio: A,
        seed: u64,
        maze_width: usize,
        maze_height: usize,
        time_budget: f32,
    ) -> Self {
        let mut session = Self {
            state: GameState::with_dimensions(seed, maze_width, maze_height, time_budget),
            scene: SoundScene::new(audio),
            running: true,
            sink: None,
            maze_width,
            maze_height,
            time_budget,
        };
        session.spawn_world_drones();
        session
    }

    pub fn with_sink(mut self, sink: Box<dyn StatusSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Tear down the old world and start over with a fresh seed. The only
    /// way out of a terminal status.
    pub fn restart(&mut self, seed: u64) {
        self.scene.stop_drones();
        self.state = GameState::with_dimensions(
            seed,
            self.maze_width,
            self.maze_height,
            self.time_budget,
        );
        self.spawn_world_drones();
        self.running = true;
        log::info!("session restarted with seed {seed}");
    }

    fn spawn_world_drones(&mut self) {
        let exit = self.state.exit_center();
        self.scene.spawn_drone(exit, DroneProfile::goal());
        for hazard in &self.state.hazards {
            self.scene.spawn_drone(hazard.pos, DroneProfile::hazard());
        }
    }

    /// Advance one frame. `dt` is the wall-clock delta from the host loop.
    pub fn frame(&mut self, input: &TickInput, dt: f32) {
        let events = tick(&mut self.state, input, dt);

        // The listener follows the post-integration pose, including on the
        // frame that ends the session
        self.scene.update_listener(
            self.state.player.position3(),
            self.state.player.forward3(),
            PLAYER_UP,
        );

        for event in events {
            self.apply(event);
        }

        if let Some(sink) = &mut self.sink {
            sink.publish(self.state.status, self.state.time_left, self.state.player.pos);
        }
    }

    fn apply(&mut self, event: GameEvent) {
        match event {
            GameEvent::SonarPing { pos, distance } => {
                self.scene.spawn_ping(pos, PingProfile::for_distance(distance));
            }
            GameEvent::LocalPing { pos } => {
                self.scene.spawn_ping(pos, PingProfile::default());
            }
            GameEvent::Won | GameEvent::Lost(_) => self.end_session(),
        }
    }

    /// Terminal transition: silence the world, leave one last ping at the
    /// player's position, and stop the loop.
    fn end_session(&mut self) {
        self.scene.stop_drones();
        self.scene
            .spawn_ping(self.state.player.pos, PingProfile::default());
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn time_left(&self) -> f32 {
        self.state.time_left
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio_mut(&mut self) -> &mut A {
        self.scene.audio_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{Call, RecordingAudio};
    use crate::consts::{HAZARD_COUNT, HAZARD_RADIUS};
    use crate::sim::Hazard;

    const DT: f32 = 1.0 / 60.0;

    fn recording_session(seed: u64) -> Session<RecordingAudio> {
        Session::new(RecordingAudio::new(), seed)
    }

    fn drone_starts(s: &Session<RecordingAudio>) -> usize {
        s.scene.audio().count(|c| matches!(c, Call::Drone(..)))
    }

    #[test]
    fn test_start_spawns_goal_and_hazard_drones() {
        let session = recording_session(1);
        assert_eq!(drone_starts(&session), 1 + HAZARD_COUNT);
        assert!(session.is_running());
        assert_eq!(session.status(), GameStatus::Playing);
    }

    #[test]
    fn test_frame_updates_listener() {
        let mut session = recording_session(1);
        session.frame(&TickInput::default(), DT);
        session.frame(&TickInput::default(), DT);
        assert_eq!(
            session.scene.audio().count(|c| matches!(c, Call::Listener(..))),
            2
        );
    }

    #[test]
    fn test_sonar_frame_spawns_transients() {
        let mut session = recording_session(1);
        session.state.hazards.clear();

        let input = TickInput {
            sonar: true,
            ..Default::default()
        };
        session.frame(&input, DT);

        let transients = session
            .scene
            .audio()
            .count(|c| matches!(c, Call::Transient(..)));
        // At least the local ping plus the border-wall echoes near the start
        assert!(transients >= 3, "expected >= 3 transients, got {transients}");
    }

    #[test]
    fn test_terminal_frame_stops_drones_once() {
        let mut session = recording_session(1);

        // Drop a hazard on the player to force a loss this frame
        session.state.hazards = vec![Hazard {
            pos: session.state.player.pos,
            radius: HAZARD_RADIUS,
        }];
        session.frame(&TickInput::default(), DT);

        assert_eq!(session.status(), GameStatus::Lost);
        assert!(!session.is_running());
        // Every drone spawned at start gets exactly one stop
        let stops = session.scene.audio().count(|c| matches!(c, Call::Stop(_)));
        assert_eq!(stops, 1 + HAZARD_COUNT);
        // One terminal feedback ping at the player position
        assert_eq!(
            session
                .scene
                .audio()
                .count(|c| matches!(c, Call::Transient(..))),
            1
        );

        // Further frames are inert: no new stops, no new transients
        session.frame(&TickInput::default(), DT);
        assert_eq!(
            session.scene.audio().count(|c| matches!(c, Call::Stop(_))),
            stops
        );
    }

    #[test]
    fn test_restart_rebuilds_world_and_drones() {
        let mut session = recording_session(1);
        session.state.hazards = vec![Hazard {
            pos: session.state.player.pos,
            radius: HAZARD_RADIUS,
        }];
        session.frame(&TickInput::default(), DT);
        assert!(!session.is_running());

        session.restart(2);
        assert!(session.is_running());
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.time_left(), crate::consts::TIME_BUDGET);
        // Initial 4 drones + 4 more after restart
        assert_eq!(drone_starts(&session), 2 * (1 + HAZARD_COUNT));
    }

    #[test]
    fn test_sink_receives_each_frame() {
        use std::cell::RefCell;
        use std::rc::Rc;

        #[derive(Default)]
        struct Capture {
            frames: Rc<RefCell<Vec<(GameStatus, f32)>>>,
        }
        impl StatusSink for Capture {
            fn publish(&mut self, status: GameStatus, time_left: f32, _pos: Vec2) {
                self.frames.borrow_mut().push((status, time_left));
            }
        }

        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = Capture {
            frames: frames.clone(),
        };
        let mut session = recording_session(1).with_sink(Box::new(sink));
        session.state.hazards.clear();

        session.frame(&TickInput::default(), DT);
        session.frame(&TickInput::default(), DT);

        let seen = frames.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, GameStatus::Playing);
        assert!(seen[1].1 < seen[0].1);
    }
}
