//! Audio cues
//!
//! The simulation never plays sound itself: hosts map `GameEvent`s to
//! `SoundCue`s and hand them to an `AudioSink`. Every cue is fire-and-forget;
//! a sink that fails to play must swallow the failure.
//!
//! Cues are described as short procedural tone sequences, so the web backend
//! needs no sample files.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Ball destroyed a brick
    BrickHit,
    /// Ball bounced off a wall or the paddle
    Bounce,
    LifeLost,
    GameOver,
    Win,
    PowerUpCaught,
    /// Finished session beat the stored high score
    HighScore,
    ButtonHover,
    ButtonClick,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator voice: frequency sweep with an exponential gain decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub freq_start: f32,
    pub freq_end: f32,
    /// Peak gain before master/sfx volume
    pub gain: f32,
    /// Start offset from the cue trigger (seconds)
    pub delay: f64,
    /// Length of the voice (seconds)
    pub duration: f64,
}

const fn tone(
    wave: Wave,
    freq_start: f32,
    freq_end: f32,
    gain: f32,
    delay: f64,
    duration: f64,
) -> Tone {
    Tone {
        wave,
        freq_start,
        freq_end,
        gain,
        delay,
        duration,
    }
}

const BRICK_HIT: &[Tone] = &[
    tone(Wave::Triangle, 520.0, 380.0, 0.3, 0.0, 0.08),
    tone(Wave::Sine, 90.0, 60.0, 0.2, 0.0, 0.06),
];
const BOUNCE: &[Tone] = &[tone(Wave::Sine, 150.0, 60.0, 0.5, 0.0, 0.12)];
const LIFE_LOST: &[Tone] = &[
    tone(Wave::Sawtooth, 440.0, 110.0, 0.35, 0.0, 0.4),
    tone(Wave::Sine, 80.0, 40.0, 0.4, 0.0, 0.5),
];
const GAME_OVER: &[Tone] = &[
    tone(Wave::Square, 392.0, 392.0, 0.25, 0.0, 0.2),
    tone(Wave::Square, 311.0, 311.0, 0.25, 0.22, 0.2),
    tone(Wave::Square, 196.0, 98.0, 0.3, 0.44, 0.6),
];
// Rising major arpeggio
const WIN: &[Tone] = &[
    tone(Wave::Triangle, 523.0, 523.0, 0.3, 0.0, 0.12),
    tone(Wave::Triangle, 659.0, 659.0, 0.3, 0.12, 0.12),
    tone(Wave::Triangle, 784.0, 784.0, 0.3, 0.24, 0.12),
    tone(Wave::Triangle, 1047.0, 1047.0, 0.35, 0.36, 0.4),
];
const POWERUP_CAUGHT: &[Tone] = &[
    tone(Wave::Sine, 600.0, 1200.0, 0.3, 0.0, 0.15),
    tone(Wave::Sine, 900.0, 1800.0, 0.2, 0.08, 0.15),
];
// Fanfare: two quick notes then a held high one
const HIGH_SCORE: &[Tone] = &[
    tone(Wave::Square, 784.0, 784.0, 0.2, 0.0, 0.1),
    tone(Wave::Square, 988.0, 988.0, 0.2, 0.1, 0.1),
    tone(Wave::Triangle, 1319.0, 1319.0, 0.3, 0.2, 0.5),
];
const BUTTON_HOVER: &[Tone] = &[tone(Wave::Sine, 880.0, 880.0, 0.08, 0.0, 0.04)];
const BUTTON_CLICK: &[Tone] = &[tone(Wave::Square, 660.0, 440.0, 0.15, 0.0, 0.06)];

impl SoundCue {
    /// Voices making up this cue
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundCue::BrickHit => BRICK_HIT,
            SoundCue::Bounce => BOUNCE,
            SoundCue::LifeLost => LIFE_LOST,
            SoundCue::GameOver => GAME_OVER,
            SoundCue::Win => WIN,
            SoundCue::PowerUpCaught => POWERUP_CAUGHT,
            SoundCue::HighScore => HIGH_SCORE,
            SoundCue::ButtonHover => BUTTON_HOVER,
            SoundCue::ButtonClick => BUTTON_CLICK,
        }
    }
}

/// Cue for a simulation event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::BrickDestroyed { .. } => Some(SoundCue::BrickHit),
        GameEvent::WallHit | GameEvent::PaddleHit => Some(SoundCue::Bounce),
        GameEvent::PowerUpCaught { .. } => Some(SoundCue::PowerUpCaught),
        GameEvent::LifeLost { .. } => Some(SoundCue::LifeLost),
        GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
        GameEvent::Win { .. } => Some(SoundCue::Win),
        GameEvent::NewHighScore { .. } => Some(SoundCue::HighScore),
        GameEvent::PhaseChanged { .. }
        | GameEvent::PowerUpSpawned { .. }
        | GameEvent::BallDrained { .. } => None,
    }
}

/// Consumer of sound cues
pub trait AudioSink {
    /// Play a cue. Must not block and must not fail.
    fn play(&mut self, cue: SoundCue);

    /// Apply volume/mute preferences
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Discards every cue
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Logs cues at trace level (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio {
    played: u64,
}

impl LogAudio {
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        self.played += 1;
        log::trace!("cue {:?}", cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue, Tone, Wave};
    use crate::settings::Settings;

    /// Web Audio backend; procedurally generated voices
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: Settings::default().effective_volume(),
            }
        }

        fn voice(&self, ctx: &AudioContext, wave: Wave) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Triangle => OscillatorType::Triangle,
                Wave::Sawtooth => OscillatorType::Sawtooth,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let Some((osc, gain)) = self.voice(ctx, tone.wave) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;
            let end = t + tone.duration;

            gain.gain().set_value_at_time(tone.gain * self.volume, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            osc.frequency().set_value_at_time(tone.freq_start, t).ok();
            if tone.freq_end != tone.freq_start {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.freq_end, end)
                    .ok();
            }
            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.02).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            for tone in cue.tones() {
                self.play_tone(ctx, tone);
            }
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }
    }
}
