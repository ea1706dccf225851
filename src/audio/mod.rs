//! Spatial audio service abstraction
//!
//! The simulation never wires a signal graph. It speaks this small
//! vocabulary - emitters with 3D positions, drones, transient pings, a
//! listener pose - and a backend realizes it. The Web Audio backend owns the
//! whole panner/gain/convolver graph; the null backend drops everything on
//! the floor for headless runs and tests.

pub mod null;
pub mod scene;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use null::NullAudio;
pub use scene::SoundScene;
#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

use std::fmt;

use glam::Vec3;

use crate::consts::{GOAL_DRONE_HZ, HAZARD_DRONE_HZ, SONAR_RANGE};

/// Oscillator waveform for drones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

/// A looping, positioned ambient tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneProfile {
    pub waveform: Waveform,
    pub freq: f32,
}

impl DroneProfile {
    /// High triangle hum marking the goal
    pub fn goal() -> Self {
        Self {
            waveform: Waveform::Triangle,
            freq: GOAL_DRONE_HZ,
        }
    }

    /// Low sawtooth growl marking a hazard
    pub fn hazard() -> Self {
        Self {
            waveform: Waveform::Sawtooth,
            freq: HAZARD_DRONE_HZ,
        }
    }
}

/// A short self-terminating ping: frequency sweep with a gain decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingProfile {
    pub start_hz: f32,
    pub end_hz: f32,
    pub gain: f32,
    /// Seconds until the scheduled stop
    pub duration: f32,
}

impl Default for PingProfile {
    fn default() -> Self {
        Self {
            start_hz: 800.0,
            end_hz: 400.0,
            gain: 0.5,
            duration: 0.5,
        }
    }
}

impl PingProfile {
    /// Pitch tracks proximity: a wall half a cell away rings near 1 kHz, one
    /// at the edge of sonar range sits down around 400 Hz.
    pub fn for_distance(distance: f32) -> Self {
        let t = (distance / SONAR_RANGE).clamp(0.0, 1.0);
        let start_hz = 1000.0 - 600.0 * t;
        Self {
            start_hz,
            end_hz: start_hz * 0.5,
            ..Self::default()
        }
    }
}

/// Opaque handle to an emitter owned by the audio service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmitterId(pub u32);

/// The audio backend could not be brought up - typically the platform's
/// autoplay policy refusing a context without a user gesture. Retrying after
/// a gesture is the expected recovery.
#[derive(Debug)]
pub struct AudioInitError(pub String);

impl fmt::Display for AudioInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio service unavailable: {}", self.0)
    }
}

impl std::error::Error for AudioInitError {}

/// Contract between the game session and an audio backend.
///
/// Every parameter change is stamped by the implementation against its own
/// render clock, read fresh at call time - callers never pass timestamps and
/// never cache them.
pub trait AudioService {
    /// Allocate an emitter at a world position
    fn create_emitter(&mut self, pos: Vec3) -> EmitterId;

    /// Move an emitter. Unknown handles are ignored.
    fn set_emitter_position(&mut self, id: EmitterId, pos: Vec3);

    /// Update the listener position and orientation basis
    fn set_listener_pose(&mut self, pos: Vec3, forward: Vec3, up: Vec3);

    /// Begin a looping drone on an emitter
    fn start_drone(&mut self, id: EmitterId, profile: DroneProfile);

    /// Fire a one-shot ping on an emitter; the sound stops itself
    fn play_transient(&mut self, id: EmitterId, profile: PingProfile);

    /// Stop an emitter's sounds. Idempotent: stopping an emitter whose sound
    /// already ended (or stopping twice) is a no-op.
    fn stop(&mut self, id: EmitterId);

    /// Monotonic render-clock time in seconds
    fn current_time(&self) -> f64;
}

/// Recording backend for tests: remembers every call so assertions can check
/// the session's audio traffic.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Create(EmitterId, Vec3),
        SetPosition(EmitterId, Vec3),
        Listener(Vec3, Vec3, Vec3),
        Drone(EmitterId, DroneProfile),
        Transient(EmitterId, PingProfile),
        Stop(EmitterId),
    }

    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub calls: Vec<Call>,
        pub clock: f64,
        next_id: u32,
    }

    impl RecordingAudio {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl AudioService for RecordingAudio {
        fn create_emitter(&mut self, pos: Vec3) -> EmitterId {
            let id = EmitterId(self.next_id);
            self.next_id += 1;
            self.calls.push(Call::Create(id, pos));
            id
        }

        fn set_emitter_position(&mut self, id: EmitterId, pos: Vec3) {
            self.calls.push(Call::SetPosition(id, pos));
        }

        fn set_listener_pose(&mut self, pos: Vec3, forward: Vec3, up: Vec3) {
            self.calls.push(Call::Listener(pos, forward, up));
        }

        fn start_drone(&mut self, id: EmitterId, profile: DroneProfile) {
            self.calls.push(Call::Drone(id, profile));
        }

        fn play_transient(&mut self, id: EmitterId, profile: PingProfile) {
            self.calls.push(Call::Transient(id, profile));
        }

        fn stop(&mut self, id: EmitterId) {
            // Stopping a finished or already-stopped emitter must not fail
            self.calls.push(Call::Stop(id));
        }

        fn current_time(&self) -> f64 {
            self.clock
        }
    }
}
