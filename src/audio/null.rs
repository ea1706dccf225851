//! No-op audio backend
//!
//! Used by the native headless demo and anywhere a session must run without
//! sound hardware. Carries its own clock, advanced by whoever drives the
//! loop, so `current_time` stays monotonic without a platform timer.

use glam::Vec3;

use super::{AudioService, DroneProfile, EmitterId, PingProfile};

#[derive(Debug, Default)]
pub struct NullAudio {
    clock: f64,
    next_id: u32,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the fake render clock
    pub fn advance(&mut self, dt: f64) {
        self.clock += dt;
    }
}

impl AudioService for NullAudio {
    fn create_emitter(&mut self, _pos: Vec3) -> EmitterId {
        let id = EmitterId(self.next_id);
        self.next_id += 1;
        id
    }

    fn set_emitter_position(&mut self, _id: EmitterId, _pos: Vec3) {}

    fn set_listener_pose(&mut self, _pos: Vec3, _forward: Vec3, _up: Vec3) {}

    fn start_drone(&mut self, _id: EmitterId, _profile: DroneProfile) {}

    fn play_transient(&mut self, _id: EmitterId, _profile: PingProfile) {}

    fn stop(&mut self, _id: EmitterId) {}

    fn current_time(&self) -> f64 {
        self.clock
    }
}
