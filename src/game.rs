//! Game façade
//!
//! Owns one session and its collaborators and routes everything between
//! them: logical input into the state machine, frames into the tick pipeline,
//! events out to audio, persistence and presentation. After every call the
//! frame scheduler is brought in line with the resulting phase, so at most
//! one frame is ever in flight and only while PLAYING.

use crate::audio::{AudioSink, SilentAudio, SoundCue, cue_for};
use crate::highscores::{HighScoreStore, MemoryStore};
use crate::platform::{InputState, LogicalInput};
use crate::scheduler::{FrameHandle, FrameHost, FrameScheduler};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickOutcome, flow, tick, timers};
use crate::tuning::Tuning;
use crate::ui::{FrameView, NullPresenter, Presenter, overlay_for};

pub struct Game {
    state: GameState,
    scheduler: FrameScheduler,
    input: InputState,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    store: Box<dyn HighScoreStore>,
    presenter: Box<dyn Presenter>,
    /// Set when the session just finished above the stored high score
    new_high_score: bool,
}

impl Game {
    /// Wire a session to its collaborators. Reads the stored high score and
    /// presents the START overlay.
    pub fn new(
        mut state: GameState,
        settings: Settings,
        mut audio: Box<dyn AudioSink>,
        mut store: Box<dyn HighScoreStore>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        state.high_score = state.high_score.max(store.load());
        audio.apply_settings(&settings);

        let mut game = Self {
            state,
            scheduler: FrameScheduler::new(),
            input: InputState::default(),
            settings,
            audio,
            store,
            presenter,
            new_high_score: false,
        };
        game.show_overlay_for(game.state.phase);
        game.render();
        game
    }

    /// Session with silent audio, in-memory high score and no presenter
    pub fn headless(tuning: Tuning, seed: u64) -> Self {
        Self::new(
            GameState::with_seed(tuning, seed),
            Settings::default(),
            Box::new(SilentAudio),
            Box::new(MemoryStore::default()),
            Box::new(NullPresenter),
        )
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for debugging tools and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.settings = settings;
        self.render();
    }

    /// Apply one logical input
    pub fn handle(&mut self, input: LogicalInput, host: &mut dyn FrameHost) {
        match input {
            LogicalInput::MoveLeft(held) => {
                self.input.left = held;
                return;
            }
            LogicalInput::MoveRight(held) => {
                self.input.right = held;
                return;
            }
            LogicalInput::Pointer(x) => {
                if self.state.phase == GamePhase::Playing {
                    self.input.pointer_x = Some(x);
                }
                return;
            }
            LogicalInput::ButtonHover => {
                self.audio.play(SoundCue::ButtonHover);
                return;
            }
            LogicalInput::Primary => {
                self.audio.play(SoundCue::ButtonClick);
                flow::primary_action(&mut self.state);
            }
            LogicalInput::Restart | LogicalInput::DebugForceReset => {
                self.input.pointer_x = None;
                if input == LogicalInput::Restart {
                    self.audio.play(SoundCue::ButtonClick);
                    flow::full_reset(&mut self.state);
                } else {
                    flow::force_reset(&mut self.state);
                }
            }
            LogicalInput::FocusLost => {
                self.input.clear();
                flow::pause(&mut self.state);
            }
            LogicalInput::OverlayClick => {
                if self.state.phase == GamePhase::Paused {
                    flow::resume(&mut self.state);
                }
            }
            LogicalInput::DebugForceWin => flow::force_win(&mut self.state),
        }

        self.dispatch_events();
        self.scheduler.sync(self.state.phase, host);
        self.render();
    }

    /// Run one delivered display frame. Returns the tick outcome, or `None`
    /// when the frame was stale or the session is no longer PLAYING.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now_ms: f64,
        host: &mut dyn FrameHost,
    ) -> Option<TickOutcome> {
        if !self.scheduler.accept(handle) {
            return None;
        }
        timers::run_due(&mut self.state, now_ms);

        // The phase may have changed since this frame was requested
        if self.state.phase != GamePhase::Playing {
            self.scheduler.sync(self.state.phase, host);
            return None;
        }

        let input = self.input.take_tick_input(now_ms);
        let outcome = tick(&mut self.state, &input);

        self.dispatch_events();
        self.render();
        self.scheduler.sync(self.state.phase, host);
        Some(outcome)
    }

    /// Fire deferred effects that came due while no frames were running
    pub fn poll_timers(&mut self, now_ms: f64) -> usize {
        let fired = timers::run_due(&mut self.state, now_ms);
        if fired > 0 {
            self.render();
        }
        fired
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(cue) = cue_for(&event) {
                self.audio.play(cue);
            }
            match event {
                GameEvent::NewHighScore { score } => {
                    self.new_high_score = true;
                    self.store.save(score);
                }
                GameEvent::PhaseChanged { to, .. } => {
                    if to == GamePhase::Start {
                        self.new_high_score = false;
                    }
                    self.show_overlay_for(to);
                }
                _ => {}
            }
        }
    }

    fn show_overlay_for(&mut self, phase: GamePhase) {
        match overlay_for(phase, self.state.score, self.new_high_score) {
            Some(overlay) => self.presenter.show_overlay(&overlay),
            None => self.presenter.hide_overlay(),
        }
    }

    fn render(&mut self) {
        let mut frame = FrameView::capture(&self.state, &self.settings);
        frame.hud.new_high_score = self.new_high_score;
        self.presenter.render(&frame);
    }
}
