//! Brick Breaker entry point
//!
//! Native builds run headless autopilot sessions and print a JSON report per
//! session. The WASM build wires the game to the page: DOM input, Web Audio,
//! LocalStorage and `requestAnimationFrame`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use brick_breaker::audio::WebAudio;
    use brick_breaker::highscores::LocalStorageStore;
    use brick_breaker::platform::LogicalInput;
    use brick_breaker::platform::web::{AnimationFrameHost, FrameCallback, init_logging, now_ms};
    use brick_breaker::sim::GameState;
    use brick_breaker::ui::DomPresenter;
    use brick_breaker::{Game, Settings, Tuning};

    type Shared<T> = Rc<RefCell<T>>;

    /// Deferred effects still expire while no frames run (ms)
    const TIMER_POLL_MS: i32 = 50;

    pub fn run() {
        init_logging();
        log::info!("Brick Breaker starting...");

        let seed = now_ms() as u64;
        let settings = Settings::load();
        let state = GameState::with_seed(Tuning::default(), seed);
        let game = Rc::new(RefCell::new(Game::new(
            state,
            settings,
            Box::new(WebAudio::new()),
            Box::new(LocalStorageStore),
            Box::new(DomPresenter::default()),
        )));
        log::info!("Game initialized with seed: {}", seed);

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let host = Rc::new(RefCell::new(AnimationFrameHost::new(callback.clone())));

        // Frame loop: every delivered frame is the scheduler's pending one
        {
            let game = game.clone();
            let host = host.clone();
            *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                let mut g = game.borrow_mut();
                if let Some(handle) = g.scheduler().pending() {
                    g.on_frame(handle, now_ms(), &mut *host.borrow_mut());
                }
            }));
        }

        setup_keyboard(game.clone(), host.clone());
        setup_pointer(game.clone(), host.clone());
        setup_buttons(game.clone(), host.clone());
        setup_auto_pause(game.clone(), host);
        setup_timer_poll(game);

        log::info!("Brick Breaker running!");
    }

    fn send(game: &Shared<Game>, host: &Shared<AnimationFrameHost>, input: LogicalInput) {
        game.borrow_mut().handle(input, &mut *host.borrow_mut());
    }

    fn setup_keyboard(game: Shared<Game>, host: Shared<AnimationFrameHost>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let input = match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => Some(LogicalInput::MoveLeft(true)),
                    "ArrowRight" | "d" | "D" => Some(LogicalInput::MoveRight(true)),
                    " " if !event.repeat() => {
                        event.prevent_default();
                        Some(LogicalInput::Primary)
                    }
                    "0" => Some(LogicalInput::DebugForceWin),
                    "9" => Some(LogicalInput::DebugForceReset),
                    "m" | "M" if !event.repeat() => {
                        toggle_mute(&game);
                        None
                    }
                    _ => None,
                };
                if let Some(input) = input {
                    send(&game, &host, input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let input = match event.key().as_str() {
                "ArrowLeft" | "a" | "A" => Some(LogicalInput::MoveLeft(false)),
                "ArrowRight" | "d" | "D" => Some(LogicalInput::MoveRight(false)),
                _ => None,
            };
            if let Some(input) = input {
                send(&game, &host, input);
            }
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Flip mute and persist the preference
    fn toggle_mute(game: &Shared<Game>) {
        let mut g = game.borrow_mut();
        let mut settings = g.settings().clone();
        settings.muted = !settings.muted;
        settings.save();
        log::info!("Sound {}", if settings.muted { "muted" } else { "on" });
        g.set_settings(settings);
    }

    fn setup_pointer(game: Shared<Game>, host: Shared<AnimationFrameHost>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(area) = document.get_element_by_id("game") else {
            log::warn!("No #game element - pointer control disabled");
            return;
        };

        let target = area.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let bounds = target.get_bounding_client_rect();
            if bounds.width() <= 0.0 {
                return;
            }
            // Page pixels to play-area units
            let play_width = game.borrow().state().tuning.play_width as f64;
            let x = (event.client_x() as f64 - bounds.left()) * play_width / bounds.width();
            send(&game, &host, LogicalInput::Pointer(x as f32));
        });
        let _ = document
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Shared<Game>, host: Shared<AnimationFrameHost>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let bindings = [
            ("start-btn", "click", LogicalInput::Primary),
            ("overlay-action", "click", LogicalInput::Primary),
            ("restart-btn", "click", LogicalInput::Restart),
            ("overlay", "click", LogicalInput::OverlayClick),
            ("start-btn", "mouseenter", LogicalInput::ButtonHover),
            ("restart-btn", "mouseenter", LogicalInput::ButtonHover),
        ];
        for (id, event_name, input) in bindings {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Keep the action button from also counting as an overlay click
                event.stop_propagation();
                send(&game, &host, input);
            });
            let _ =
                el.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Shared<Game>, host: Shared<AnimationFrameHost>) {
        let Some(window) = web_sys::window() else { return };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            log::info!("Window blur");
            send(&game, &host, LogicalInput::FocusLost);
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_timer_poll(game: Shared<Game>) {
        let Some(window) = web_sys::window() else { return };

        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Ok(mut g) = game.try_borrow_mut() {
                g.poll_timers(now_ms());
            }
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TIMER_POLL_MS,
        );
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use brick_breaker::audio::LogAudio;
    use brick_breaker::highscores::{FileStore, HighScoreStore, MemoryStore};
    use brick_breaker::platform::{Autopilot, HeadlessHost};
    use brick_breaker::sim::GameState;
    use brick_breaker::ui::LogPresenter;
    use brick_breaker::{Game, Settings, Tuning};

    /// Five minutes of play at 60 Hz
    const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 5;

    /// Run headless autopilot sessions and print a JSON report for each.
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct CliArgs {
        /// Seed of the first session; later sessions use seed + n.
        #[arg(long, value_name = "N", default_value_t = 42)]
        pub seed: u64,
        /// JSON file overriding the default tuning.
        #[arg(long, value_name = "FILE")]
        pub tuning: Option<PathBuf>,
        /// JSON file the high score is read from and written to.
        #[arg(long, value_name = "FILE")]
        pub store: Option<PathBuf>,
        /// JSON file with player preferences (volume, mute, reduced motion).
        #[arg(long, value_name = "FILE")]
        pub settings: Option<PathBuf>,
        /// Number of sessions to play back to back.
        #[arg(
            long,
            value_name = "N",
            default_value_t = 1,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        pub sessions: u64,
        /// Frame limit per session before it is abandoned.
        #[arg(
            long = "max-frames",
            value_name = "FRAMES",
            default_value_t = DEFAULT_MAX_FRAMES,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        pub max_frames: u64,
    }

    pub fn run(args: CliArgs) {
        let tuning = match &args.tuning {
            Some(path) => Tuning::load_or_default(path),
            None => Tuning::default(),
        };
        let settings = match &args.settings {
            Some(path) => Settings::load_from(path),
            None => Settings::default(),
        };
        let pilot = Autopilot::default();
        let mut best = 0;

        for session in 0..args.sessions {
            let seed = args.seed.wrapping_add(session);
            let store: Box<dyn HighScoreStore> = match &args.store {
                Some(path) => Box::new(FileStore::new(path)),
                None => Box::new(MemoryStore::with_score(best)),
            };
            let mut game = Game::new(
                GameState::with_seed(tuning.clone(), seed),
                settings.clone(),
                Box::new(LogAudio::default()),
                store,
                Box::new(LogPresenter::default()),
            );
            let mut host = HeadlessHost::new();

            log::info!("Session {} starting with seed {}", session + 1, seed);
            let report = pilot.drive(&mut game, &mut host, args.max_frames);
            best = best.max(report.high_score);
            log::info!(
                "Session {} ended in {} after {} frames: score {}, {} bricks, {} lives",
                session + 1,
                report.phase.as_str(),
                report.frames,
                report.score,
                report.bricks_destroyed,
                report.lives
            );

            match serde_json::to_string(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Cannot serialize report: {}", e),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Result<CliArgs, clap::Error> {
            CliArgs::try_parse_from(std::iter::once("brick-breaker").chain(list.iter().copied()))
        }

        #[test]
        fn test_parse_defaults() {
            let parsed = args(&[]).unwrap();
            assert_eq!(parsed.seed, 42);
            assert_eq!(parsed.sessions, 1);
            assert_eq!(parsed.max_frames, 18_000);
            assert_eq!(parsed.tuning, None);
            assert_eq!(parsed.store, None);
            assert_eq!(parsed.settings, None);
        }

        #[test]
        fn test_parse_flags() {
            let parsed = args(&[
                "--seed", "7", "--sessions", "3", "--store", "hs.json", "--settings", "prefs.json",
            ])
            .unwrap();
            assert_eq!(parsed.seed, 7);
            assert_eq!(parsed.sessions, 3);
            assert_eq!(parsed.store, Some(PathBuf::from("hs.json")));
            assert_eq!(parsed.settings, Some(PathBuf::from("prefs.json")));
        }

        #[test]
        fn test_parse_rejects_bad_input() {
            assert!(args(&["--seed"]).is_err());
            assert!(args(&["--seed", "-1"]).is_err());
            assert!(args(&["--fast"]).is_err());
            assert!(args(&["--sessions", "0"]).is_err());
            assert!(args(&["--max-frames", "0"]).is_err());
        }

        #[test]
        fn test_cli_definition_is_consistent() {
            use clap::CommandFactory;
            CliArgs::command().debug_assert();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brick Breaker (native, headless) starting...");

    native::run(native::CliArgs::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
