//! Neon Drift entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent};

    use neon_drift::highscores::{format_date, format_wallet_address, rank_label};
    use neon_drift::platform::{
        Control, FrameHandle, FrameLoop, FrameScheduler, FrameStatus, HeldKeys, OutcomeSink,
    };
    use neon_drift::renderer::{self, CanvasPainter};
    use neon_drift::sim::{GamePhase, Viewport};
    use neon_drift::{HighScores, Settings, Tuning};

    /// `requestAnimationFrame` behind the scheduler trait
    struct RafScheduler {
        window: web_sys::Window,
        callback: Closure<dyn FnMut(f64)>,
    }

    impl FrameScheduler for RafScheduler {
        fn request(&mut self) -> FrameHandle {
            match self
                .window
                .request_animation_frame(self.callback.as_ref().unchecked_ref())
            {
                Ok(id) => FrameHandle(id),
                Err(e) => {
                    log::error!("requestAnimationFrame failed: {:?}", e);
                    FrameHandle(0)
                }
            }
        }

        fn cancel(&mut self, handle: FrameHandle) {
            if self.window.cancel_animation_frame(handle.0).is_err() {
                log::warn!("cancelAnimationFrame failed for frame {}", handle.0);
            }
        }
    }

    /// Crash overlay; receives the final score from the frame loop
    struct GameOverScreen {
        document: Document,
        last_score: Option<u64>,
    }

    impl GameOverScreen {
        fn set_visible(&self, visible: bool) {
            if let Some(el) = self.document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }

        fn set_status(&self, text: &str) {
            if let Some(el) = self.document.get_element_by_id("submit-status") {
                el.set_text_content(Some(text));
            }
        }
    }

    impl OutcomeSink for GameOverScreen {
        fn on_crash(&mut self, score: u64) {
            self.last_score = Some(score);
            if let Some(el) = self.document.get_element_by_id("final-score") {
                el.set_text_content(Some(&format!("{}m", score)));
            }
            self.set_status("");
            self.set_visible(true);
        }
    }

    /// Game instance holding all state
    struct Game {
        frames: FrameLoop<RafScheduler>,
        keys: HeldKeys,
        painter: CanvasPainter,
        settings: Settings,
        high_scores: HighScores,
        game_over: GameOverScreen,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// Current viewport, resizing the canvas to match
        fn viewport(&self) -> Viewport {
            let window = &self.frames.scheduler().window;
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.painter.width() as f64);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.painter.height() as f64);

            if width as u32 != self.painter.width() || height as u32 != self.painter.height() {
                self.painter.resize(width as u32, height as u32);
            }
            Viewport::new(width as f32, height as f32)
        }

        fn render(&self, viewport: Viewport) {
            let scene = renderer::build(self.frames.state(), viewport, &self.settings, Some(self.fps));
            if let Err(e) = self.painter.paint(&scene) {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// One animation frame
        fn frame(&mut self, time: f64) {
            // Input is sampled once, before the step
            let input = self.keys.snapshot();
            let viewport = self.viewport();

            let status = self.frames.on_frame(&input, viewport, &mut self.game_over);
            if status == FrameStatus::Stopped {
                return;
            }

            self.track_fps(time);
            self.render(viewport);
        }

        fn start(&mut self) {
            if self.frames.start() {
                self.render(self.viewport());
            }
        }

        /// Reset for another run
        fn restart(&mut self, seed: u64) {
            self.frames.restart(seed);
            self.keys.clear();
            self.frame_times = [0.0; 60];
            self.frame_index = 0;
            self.game_over.last_score = None;
            self.game_over.set_visible(false);
            self.render(self.viewport());
        }

        /// Record the last score under the typed username
        fn submit_score(&mut self) {
            let Some(score) = self.game_over.last_score else {
                return;
            };
            let username = input_value(&self.game_over.document, "username");
            let wallet = input_value(&self.game_over.document, "wallet");

            match self
                .high_scores
                .submit(&username, &wallet, score, js_sys::Date::now())
            {
                Ok(rank) => {
                    self.high_scores.save();
                    self.settings.last_username = username.trim().to_owned();
                    self.settings.save();
                    self.game_over
                        .set_status(&format!("Score Submitted! {}m recorded at rank {}", score, rank));
                    self.update_leaderboard();
                }
                Err(e) => {
                    log::info!("Score not submitted: {}", e);
                    self.game_over.set_status(&e.to_string());
                }
            }
        }

        /// Rewrite the leaderboard list and stats
        fn update_leaderboard(&self) {
            let document = &self.game_over.document;

            if let Some(list) = document.get_element_by_id("leaderboard-list") {
                let rows: Vec<String> = self
                    .high_scores
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        format!(
                            "{} {} ({}) {}m {}",
                            rank_label(i),
                            e.username,
                            format_wallet_address(&e.wallet_address),
                            e.score,
                            format_date(e.timestamp)
                        )
                    })
                    .collect();
                let text = if rows.is_empty() {
                    "No scores yet!".to_string()
                } else {
                    rows.join("\n")
                };
                list.set_text_content(Some(&text));
            }

            if let Some(el) = document.get_element_by_id("leaderboard-stats") {
                let text = self
                    .high_scores
                    .stats()
                    .map(|s| {
                        format!(
                            "Best {}m • {} players • Average {}m",
                            s.best, s.players, s.average
                        )
                    })
                    .unwrap_or_default();
                el.set_text_content(Some(&text));
            }
        }
    }

    fn input_value(document: &Document, id: &str) -> String {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Drift starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let painter = CanvasPainter::new(canvas).expect("no 2d context");

        let settings = Settings::load();
        let tuning = Tuning::load();
        let seed = js_sys::Date::now() as u64;

        let game = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            let weak = weak.clone();
            let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                if let Some(game) = weak.upgrade() {
                    game.borrow_mut().frame(time);
                }
            });
            let scheduler = RafScheduler {
                window: window.clone(),
                callback,
            };

            RefCell::new(Game {
                frames: FrameLoop::new(seed, tuning, scheduler),
                keys: HeldKeys::new(),
                painter,
                settings,
                high_scores: HighScores::load(),
                game_over: GameOverScreen {
                    document: document.clone(),
                    last_score: None,
                },
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            })
        });

        log::info!("Game initialized with seed: {}", seed);

        {
            let g = game.borrow();
            if let Some(el) = document.get_element_by_id("username") {
                if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                    input.set_value(&g.settings.last_username);
                }
            }
            g.update_leaderboard();
            g.render(g.viewport());
        }

        setup_keyboard(&window, game.clone());
        setup_buttons(&document, game.clone());

        // The game keeps itself alive through its listeners
        std::mem::forget(game);

        log::info!("Neon Drift running!");
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                // Typing in the crash form must not steer
                if event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some()
                {
                    return;
                }

                let mut g = game.borrow_mut();
                let control = g.keys.key_down(&event.code());
                if control.is_some() {
                    event.prevent_default();
                }
                if control == Some(Control::Start) && g.frames.state().phase == GamePhase::Waiting {
                    g.start();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up clears the drift indicator right away
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.keys.key_up(&event.code());
                g.frames.state_mut().clear_drift();
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup events are lost, so forget held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.clear();
                g.frames.state_mut().clear_drift();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("submit-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().submit_score();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Drift (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the playable version");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(native::clock_seed);
    let max_frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(20_000);

    let summary = native::autopilot_run(seed, neon_drift::Tuning::load(), max_frames);
    match serde_json::to_string(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not encode run summary: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use neon_drift::Tuning;
    use neon_drift::platform::{FrameLoop, FrameStatus, ManualScheduler};
    use neon_drift::sim::{RunSummary, TickInput, Viewport, collision};

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };

    pub fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Steer toward the centre of the road under the car
    fn autopilot(frames: &FrameLoop<ManualScheduler>) -> TickInput {
        let state = frames.state();
        let Some(segment) = collision::probe(&state.track, VIEWPORT.height, &state.tuning) else {
            return TickInput::default();
        };

        let offset = segment.x - state.lateral;
        if offset > 1.0 {
            TickInput::RIGHT
        } else if offset < -1.0 {
            TickInput::LEFT
        } else {
            TickInput::default()
        }
    }

    /// Drive frames by hand until a crash or the frame budget runs out
    pub fn autopilot_run(seed: u64, tuning: Tuning, max_frames: u64) -> RunSummary {
        let mut frames = FrameLoop::new(seed, tuning, ManualScheduler::new());
        frames.start();
        log::info!("Headless run with seed {} for up to {} frames", seed, max_frames);

        let mut sink = |score: u64| log::info!("Run over at {}m", score);
        for _ in 0..max_frames {
            let input = autopilot(&frames);
            match frames.on_frame(&input, VIEWPORT, &mut sink) {
                FrameStatus::Continued => {}
                FrameStatus::Crashed { .. } | FrameStatus::Stopped => break,
            }
        }
        frames.teardown();

        frames.state().summary()
    }
}
