//! Presentation hand-off
//!
//! The simulation never touches a render target. Each frame the host captures
//! a `FrameView` from the model and passes it to a `Presenter`, which maps it
//! to pixels, DOM nodes or whatever else. Overlay cards are requested on phase
//! changes.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Rect, Shake};

/// Centered message card shown over the play area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub title: String,
    pub body: String,
    /// Show the primary action button
    pub show_action: bool,
}

impl Overlay {
    fn new(title: &str, body: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            show_action: true,
        }
    }
}

/// Overlay for a phase; PLAYING has none
pub fn overlay_for(phase: GamePhase, score: u64, new_high_score: bool) -> Option<Overlay> {
    let final_body = || {
        if new_high_score {
            format!("Final Score: {}. New high score! Press Space to play again.", score)
        } else {
            format!("Final Score: {}. Press Space to play again.", score)
        }
    };
    match phase {
        GamePhase::Start => Some(Overlay::new(
            "Breakout",
            "Press Space or click Start to launch the ball.",
        )),
        GamePhase::Playing => None,
        GamePhase::Paused => Some(Overlay::new("Paused", "Press Space or click to resume.")),
        GamePhase::LifeLost => Some(Overlay::new("Life Lost", "Press Space to continue.")),
        GamePhase::GameOver => Some(Overlay::new("Game Over 💥", final_body())),
        GamePhase::Win => Some(Overlay::new("You Win! 🎉", final_body())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub score: u64,
    pub lives: u8,
    pub high_score: u64,
    /// The finished session beat the stored high score
    pub new_high_score: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrickView {
    pub rect: Rect,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub rect: Rect,
    pub symbol: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectsView {
    pub paddle_pulse: bool,
    pub collision_flash: bool,
    pub shake: Option<Shake>,
}

/// Everything a presenter needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub hud: HudView,
    pub paddle: Rect,
    pub balls: Vec<Rect>,
    /// Live bricks only
    pub bricks: Vec<BrickView>,
    pub powerups: Vec<PowerUpView>,
    pub effects: EffectsView,
}

impl FrameView {
    pub fn capture(state: &GameState, settings: &Settings) -> Self {
        let shake = if settings.effective_screen_shake() {
            state.effects.shake
        } else {
            None
        };

        Self {
            phase: state.phase,
            hud: HudView {
                score: state.score,
                lives: state.lives,
                high_score: state.high_score,
                new_high_score: false,
            },
            paddle: state.paddle.rect(),
            balls: state.balls.iter().map(|b| b.rect()).collect(),
            bricks: state
                .bricks
                .iter()
                .filter(|b| b.alive)
                .map(|b| BrickView {
                    rect: b.rect,
                    color: b.color.hex(),
                })
                .collect(),
            powerups: state
                .powerups
                .iter()
                .map(|p| PowerUpView {
                    rect: p.rect(),
                    symbol: p.kind.symbol(),
                })
                .collect(),
            effects: EffectsView {
                paddle_pulse: state.effects.paddle_pulse,
                collision_flash: state.effects.collision_flash,
                shake,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Presentation collaborator
pub trait Presenter {
    fn render(&mut self, frame: &FrameView);
    fn show_overlay(&mut self, overlay: &Overlay);
    fn hide_overlay(&mut self);
}

/// Draws nothing
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _frame: &FrameView) {}
    fn show_overlay(&mut self, _overlay: &Overlay) {}
    fn hide_overlay(&mut self) {}
}

/// Keeps the last frame and overlay; logs overlay changes (headless runs, tests)
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub frames: u64,
    pub last_frame: Option<FrameView>,
    pub overlay: Option<Overlay>,
}

impl Presenter for LogPresenter {
    fn render(&mut self, frame: &FrameView) {
        self.frames += 1;
        self.last_frame = Some(frame.clone());
    }

    fn show_overlay(&mut self, overlay: &Overlay) {
        log::debug!("Overlay: {} / {}", overlay.title, overlay.body);
        self.overlay = Some(overlay.clone());
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::DomPresenter;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use super::{FrameView, Overlay, Presenter};

    // Page-side drawing hook; the page may leave it undefined
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (window.brickBreakerRender) {
                window.brickBreakerRender(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
    }

    /// Updates the HUD and overlay elements and forwards frames to the page
    #[derive(Debug, Default)]
    pub struct DomPresenter {
        last_hud: Option<(u64, u8, u64)>,
    }

    impl DomPresenter {
        fn set_text(id: &str, text: &str) {
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(id))
            {
                el.set_text_content(Some(text));
            }
        }

        fn set_class(id: &str, class: &str) {
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(id))
            {
                let _ = el.set_attribute("class", class);
            }
        }
    }

    impl Presenter for DomPresenter {
        fn render(&mut self, frame: &FrameView) {
            let hud = (frame.hud.score, frame.hud.lives, frame.hud.high_score);
            if self.last_hud != Some(hud) {
                Self::set_text("hud-score", &hud.0.to_string());
                Self::set_text("hud-lives", &hud.1.to_string());
                Self::set_text("hud-high", &hud.2.to_string());
                self.last_hud = Some(hud);
            }
            match frame.to_json() {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Cannot serialize frame: {}", e),
            }
        }

        fn show_overlay(&mut self, overlay: &Overlay) {
            Self::set_text("overlay-title", &overlay.title);
            Self::set_text("overlay-body", &overlay.body);
            Self::set_class(
                "overlay-action",
                if overlay.show_action { "" } else { "hidden" },
            );
            Self::set_class("overlay", "");
        }

        fn hide_overlay(&mut self) {
            Self::set_class("overlay", "hidden");
        }
    }
}
