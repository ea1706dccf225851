//! Pose-to-audio synchronization and emitter lifecycle
//!
//! `SoundScene` is the bridge between 2D game space and the 3D listener
//! model: world positions lift to z = 0, the listener up vector is +z. It
//! also owns the persistent drones so a session can tear them all down on a
//! terminal transition without tracking handles itself.

use glam::{Vec2, Vec3};

use super::{AudioService, DroneProfile, EmitterId, PingProfile};

pub struct SoundScene<A: AudioService> {
    audio: A,
    /// Persistent emitters, stopped as a group at session end
    drones: Vec<EmitterId>,
}

impl<A: AudioService> SoundScene<A> {
    pub fn new(audio: A) -> Self {
        Self {
            audio,
            drones: Vec::new(),
        }
    }

    /// Push the listener pose for this frame
    pub fn update_listener(&mut self, pos: Vec3, forward: Vec3, up: Vec3) {
        self.audio.set_listener_pose(pos, forward, up);
    }

    /// Spawn a persistent looping drone at a world position
    pub fn spawn_drone(&mut self, pos: Vec2, profile: DroneProfile) -> EmitterId {
        let id = self.audio.create_emitter(pos.extend(0.0));
        self.audio.start_drone(id, profile);
        self.drones.push(id);
        id
    }

    /// Spawn a transient ping. Fire-and-forget: the backend owns the emitter
    /// until its scheduled stop elapses.
    pub fn spawn_ping(&mut self, pos: Vec2, profile: PingProfile) {
        let id = self.audio.create_emitter(pos.extend(0.0));
        self.audio.play_transient(id, profile);
    }

    /// Stop every persistent drone. Safe to call repeatedly and safe against
    /// drones whose sound already finished.
    pub fn stop_drones(&mut self) {
        for id in self.drones.drain(..) {
            self.audio.stop(id);
        }
    }

    pub fn drone_count(&self) -> usize {
        self.drones.len()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}
