//! Web Audio backend (wasm32)
//!
//! Owns the whole signal graph: one HRTF panner per emitter feeding a master
//! gain plus a convolver "cave" reverb send, oscillators per sound. All
//! parameter changes are scheduled against the context's render clock, read
//! fresh at each call. Individual node failures degrade to silence for that
//! sound rather than breaking the frame.

use std::collections::HashMap;

use glam::Vec3;
use js_sys::Math;
use wasm_bindgen::JsValue;
use web_sys::{
    AudioContext, AudioContextState, AudioParam, ConvolverNode, DistanceModelType, GainNode,
    OscillatorNode, OscillatorType, PannerNode, PanningModelType,
};

use super::{AudioInitError, AudioService, DroneProfile, EmitterId, PingProfile, Waveform};

const MASTER_GAIN: f32 = 0.8;
const REVERB_WET: f32 = 0.3;
const REVERB_SECONDS: f64 = 2.0;
const REVERB_DECAY: f64 = 2.0;
/// Slow vibrato so drones breathe instead of sounding like test tones
const DRONE_VIBRATO_HZ: f32 = 0.5;
const DRONE_VIBRATO_DEPTH: f32 = 10.0;

struct Emitter {
    panner: PannerNode,
    /// Every oscillator feeding this panner, including LFOs, so `stop` can
    /// silence the lot
    oscillators: Vec<OscillatorNode>,
}

pub struct WebAudio {
    ctx: AudioContext,
    master: GainNode,
    reverb: ConvolverNode,
    reverb_gain: GainNode,
    emitters: HashMap<EmitterId, Emitter>,
    next_id: u32,
}

impl WebAudio {
    /// Bring up the context and the master/reverb graph. Fails when the
    /// platform refuses a context (autoplay policy); the caller is expected
    /// to retry after a user gesture.
    pub fn new() -> Result<Self, AudioInitError> {
        let ctx = AudioContext::new().map_err(init_err)?;

        let master = ctx.create_gain().map_err(init_err)?;
        master.gain().set_value(MASTER_GAIN);
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(init_err)?;

        let (reverb, reverb_gain) = build_reverb(&ctx, &master)?;

        log::info!("audio context up at {} Hz", ctx.sample_rate());
        Ok(Self {
            ctx,
            master,
            reverb,
            reverb_gain,
            emitters: HashMap::new(),
            next_id: 0,
        })
    }

    /// Resume a context suspended by autoplay policy. Call from a user
    /// gesture; harmless when already running.
    pub fn resume(&self) {
        if self.ctx.state() == AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }
    }

    pub fn set_master_volume(&self, volume: f32) {
        self.master.gain().set_value(volume.clamp(0.0, 1.0));
    }

    pub fn set_reverb_mix(&self, wet: f32) {
        self.reverb_gain.gain().set_value(wet.clamp(0.0, 1.0));
    }
}

/// Synthesize a stereo noise-decay impulse response and wire
/// convolver -> wet gain -> master
fn build_reverb(
    ctx: &AudioContext,
    master: &GainNode,
) -> Result<(ConvolverNode, GainNode), AudioInitError> {
    let convolver = ctx.create_convolver().map_err(init_err)?;

    let sample_rate = ctx.sample_rate();
    let length = (f64::from(sample_rate) * REVERB_SECONDS) as u32;
    let impulse = ctx
        .create_buffer(2, length, sample_rate)
        .map_err(init_err)?;

    let mut channel = vec![0.0f32; length as usize];
    for ch in 0..2 {
        for (i, sample) in channel.iter_mut().enumerate() {
            let n = i as f64 / length as f64;
            *sample = ((Math::random() * 2.0 - 1.0) * (1.0 - n).powf(REVERB_DECAY)) as f32;
        }
        impulse.copy_to_channel(&mut channel, ch).map_err(init_err)?;
    }
    convolver.set_buffer(Some(&impulse));

    let wet = ctx.create_gain().map_err(init_err)?;
    wet.gain().set_value(REVERB_WET);
    convolver.connect_with_audio_node(&wet).map_err(init_err)?;
    wet.connect_with_audio_node(master).map_err(init_err)?;

    Ok((convolver, wet))
}

fn init_err(e: JsValue) -> AudioInitError {
    AudioInitError(format!("{e:?}"))
}

/// Schedule a param value at the context clock; false means this engine
/// lacks fine-grained automation and the caller should fall back to the
/// immediate setter.
fn schedule(param: &AudioParam, value: f32, at: f64) -> bool {
    param.set_value_at_time(value, at).is_ok()
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Triangle => OscillatorType::Triangle,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Square => OscillatorType::Square,
    }
}

impl AudioService for WebAudio {
    fn create_emitter(&mut self, pos: Vec3) -> EmitterId {
        let id = EmitterId(self.next_id);
        self.next_id += 1;

        let Ok(panner) = self.ctx.create_panner() else {
            log::warn!("panner creation failed, emitter {id:?} will be silent");
            return id;
        };
        panner.set_panning_model(PanningModelType::Hrtf);
        panner.set_distance_model(DistanceModelType::Inverse);
        panner.set_ref_distance(1.0);
        panner.set_max_distance(10_000.0);
        panner.set_rolloff_factor(1.0);

        // Dry send plus reverb send
        let _ = panner.connect_with_audio_node(&self.master);
        let _ = panner.connect_with_audio_node(&self.reverb);

        self.emitters.insert(
            id,
            Emitter {
                panner,
                oscillators: Vec::new(),
            },
        );
        self.set_emitter_position(id, pos);
        id
    }

    fn set_emitter_position(&mut self, id: EmitterId, pos: Vec3) {
        let Some(em) = self.emitters.get(&id) else {
            return;
        };
        let t = self.ctx.current_time();
        let p = &em.panner;

        let scheduled = schedule(&p.position_x(), pos.x, t)
            && schedule(&p.position_y(), pos.y, t)
            && schedule(&p.position_z(), pos.z, t);
        if !scheduled {
            p.set_position(f64::from(pos.x), f64::from(pos.y), f64::from(pos.z));
        }
    }

    fn set_listener_pose(&mut self, pos: Vec3, forward: Vec3, up: Vec3) {
        let listener = self.ctx.listener();
        let t = self.ctx.current_time();

        let scheduled = schedule(&listener.position_x(), pos.x, t)
            && schedule(&listener.position_y(), pos.y, t)
            && schedule(&listener.position_z(), pos.z, t)
            && schedule(&listener.forward_x(), forward.x, t)
            && schedule(&listener.forward_y(), forward.y, t)
            && schedule(&listener.forward_z(), forward.z, t)
            && schedule(&listener.up_x(), up.x, t)
            && schedule(&listener.up_y(), up.y, t)
            && schedule(&listener.up_z(), up.z, t);
        if !scheduled {
            listener.set_position(f64::from(pos.x), f64::from(pos.y), f64::from(pos.z));
            listener.set_orientation(
                f64::from(forward.x),
                f64::from(forward.y),
                f64::from(forward.z),
                f64::from(up.x),
                f64::from(up.y),
                f64::from(up.z),
            );
        }
    }

    fn start_drone(&mut self, id: EmitterId, profile: DroneProfile) {
        let t = self.ctx.current_time();
        let Some(em) = self.emitters.get_mut(&id) else {
            return;
        };
        let Ok(osc) = self.ctx.create_oscillator() else {
            return;
        };
        osc.set_type(oscillator_type(profile.waveform));
        let _ = osc.frequency().set_value_at_time(profile.freq, t);

        if let (Ok(lfo), Ok(lfo_gain)) = (self.ctx.create_oscillator(), self.ctx.create_gain()) {
            lfo.frequency().set_value(DRONE_VIBRATO_HZ);
            lfo_gain.gain().set_value(DRONE_VIBRATO_DEPTH);
            let _ = lfo.connect_with_audio_node(&lfo_gain);
            let _ = lfo_gain.connect_with_audio_param(&osc.frequency());
            let _ = lfo.start();
            em.oscillators.push(lfo);
        }

        let _ = osc.connect_with_audio_node(&em.panner);
        let _ = osc.start();
        em.oscillators.push(osc);
    }

    fn play_transient(&mut self, id: EmitterId, profile: PingProfile) {
        let t = self.ctx.current_time();
        let Some(em) = self.emitters.get_mut(&id) else {
            return;
        };
        let Ok(osc) = self.ctx.create_oscillator() else {
            return;
        };
        let Ok(gain) = self.ctx.create_gain() else {
            return;
        };
        let dur = f64::from(profile.duration);

        osc.set_type(OscillatorType::Sine);
        let _ = osc.frequency().set_value_at_time(profile.start_hz, t);
        let _ = osc
            .frequency()
            .exponential_ramp_to_value_at_time(profile.end_hz, t + dur * 0.2);

        let _ = gain.gain().set_value_at_time(profile.gain, t);
        let _ = gain.gain().exponential_ramp_to_value_at_time(0.01, t + dur);

        let _ = osc.connect_with_audio_node(&gain);
        let _ = gain.connect_with_audio_node(&em.panner);
        let _ = osc.start();
        let _ = osc.stop_with_when(t + dur);
        em.oscillators.push(osc);
    }

    fn stop(&mut self, id: EmitterId) {
        // Remove-and-silence: a repeat stop finds nothing, and oscillators
        // that already ran out throw InvalidStateError which we swallow.
        if let Some(em) = self.emitters.remove(&id) {
            for osc in em.oscillators {
                let _ = osc.stop();
            }
        }
    }

    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }
}
