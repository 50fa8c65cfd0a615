//! Sound cues
//!
//! The simulation never makes noise itself. Hosts drain its events and hand
//! them to an [`AudioSink`]; on the web that is a Web Audio oscillator per
//! cue, no sample files needed.

use crate::sim::events::GameEvent;
use crate::tuning::Faction;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Fire-and-forget tone output. Implementations must tolerate being
/// unavailable and do nothing in that case.
pub trait AudioSink {
    fn play_sound(&mut self, freq_hz: f32, duration_s: f32, waveform: Waveform);
}

/// Sink that swallows everything
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedAudio;

impl AudioSink for MutedAudio {
    fn play_sound(&mut self, _freq_hz: f32, _duration_s: f32, _waveform: Waveform) {}
}

/// A tone tied to a gameplay moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub freq_hz: f32,
    pub duration_s: f32,
    pub waveform: Waveform,
}

impl SoundCue {
    pub const PLAYER_SHOT: SoundCue = SoundCue::new(800.0, 0.1, Waveform::Square);
    pub const SPECIAL: SoundCue = SoundCue::new(400.0, 0.3, Waveform::Sawtooth);
    pub const ENEMY_SHOT: SoundCue = SoundCue::new(600.0, 0.08, Waveform::Square);
    pub const EXPLOSION: SoundCue = SoundCue::new(200.0, 0.5, Waveform::Triangle);
    pub const HIT: SoundCue = SoundCue::new(300.0, 0.05, Waveform::Triangle);

    pub const fn new(freq_hz: f32, duration_s: f32, waveform: Waveform) -> Self {
        Self {
            freq_hz,
            duration_s,
            waveform,
        }
    }

    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::Fired {
                faction: Faction::Player,
                ..
            } => Some(Self::PLAYER_SHOT),
            GameEvent::Fired {
                faction: Faction::Enemy,
                ..
            } => Some(Self::ENEMY_SHOT),
            GameEvent::Special => Some(Self::SPECIAL),
            GameEvent::ShipDestroyed {
                faction: Faction::Enemy,
                ..
            } => Some(Self::EXPLOSION),
            GameEvent::ShipHit { .. }
            | GameEvent::ShipDestroyed {
                faction: Faction::Player,
                ..
            } => Some(Self::HIT),
            GameEvent::WaveCleared { .. }
            | GameEvent::WaveSpawned { .. }
            | GameEvent::GameOver { .. } => None,
        }
    }

    pub fn play(&self, sink: &mut impl AudioSink) {
        sink.play_sound(self.freq_hz, self.duration_s, self.waveform);
    }
}

/// Play the cue of every event, in order
pub fn dispatch_events(sink: &mut impl AudioSink, events: &[GameEvent]) {
    for cue in events.iter().filter_map(SoundCue::for_event) {
        cue.play(sink);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Waveform};
    use crate::settings::Settings;

    /// Peak gain of a cue at full volume
    const CUE_GAIN: f32 = 0.1;
    /// Tail the envelope decays to
    const CUE_FLOOR: f32 = 0.01;

    /// Web Audio output
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Browsers only allow audio after a user gesture
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    impl AudioSink for WebAudio {
        fn play_sound(&mut self, freq_hz: f32, duration_s: f32, waveform: Waveform) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let osc_type = match waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            };
            let Some((osc, gain)) = Self::create_osc(ctx, freq_hz, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + f64::from(duration_s);

            gain.gain().set_value_at_time(CUE_GAIN * self.volume, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(CUE_FLOOR * self.volume, end)
                .ok();

            osc.start().ok();
            osc.stop_with_when(end).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::Outcome;
    use crate::tuning::BulletKind;

    #[derive(Default)]
    struct Tape(Vec<(f32, f32, Waveform)>);

    impl AudioSink for Tape {
        fn play_sound(&mut self, freq_hz: f32, duration_s: f32, waveform: Waveform) {
            self.0.push((freq_hz, duration_s, waveform));
        }
    }

    #[test]
    fn test_cues_follow_event_order() {
        let events = [
            GameEvent::Fired {
                faction: Faction::Player,
                kind: BulletKind::Bullet,
            },
            GameEvent::WaveCleared { wave: 1, bonus: 2000 },
            GameEvent::ShipDestroyed {
                faction: Faction::Enemy,
                boss: false,
            },
            GameEvent::Fired {
                faction: Faction::Enemy,
                kind: BulletKind::Bullet,
            },
        ];
        let mut tape = Tape::default();
        dispatch_events(&mut tape, &events);
        assert_eq!(
            tape.0,
            vec![
                (800.0, 0.1, Waveform::Square),
                (200.0, 0.5, Waveform::Triangle),
                (600.0, 0.08, Waveform::Square),
            ]
        );
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(
            SoundCue::for_event(&GameEvent::GameOver {
                outcome: Outcome::Defeat
            }),
            None
        );
        assert_eq!(SoundCue::for_event(&GameEvent::Special), Some(SoundCue::SPECIAL));
        assert_eq!(
            SoundCue::for_event(&GameEvent::ShipHit {
                faction: Faction::Enemy
            }),
            Some(SoundCue::HIT)
        );
    }

    #[test]
    fn test_muted_sink_is_harmless() {
        let mut sink = MutedAudio;
        dispatch_events(&mut sink, &[GameEvent::Special]);
    }
}
