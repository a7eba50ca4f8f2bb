//! Lane Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use lane_runner::best_score::LocalStorageStore;
    use lane_runner::renderer::{RenderDispatcher, RenderFrame};
    use lane_runner::sim::{GameEvent, GamePhase, InputEvent, Outcome};
    use lane_runner::{Game, Tuning, format_clock};

    // Hand frames to the page's WebGL code, if it registered a drawer
    #[wasm_bindgen(inline_js = "
        export function draw_frame(view, projection, instances) {
            if (typeof window.drawRunnerFrame === 'function') {
                window.drawRunnerFrame(view, projection, instances);
            }
        }
    ")]
    extern "C" {
        fn draw_frame(view: &[f32], projection: &[f32], instances: &[u8]);
    }

    /// Forwards snapshots to JavaScript
    struct JsDispatcher;

    impl RenderDispatcher for JsDispatcher {
        fn dispatch(&mut self, frame: &RenderFrame) {
            draw_frame(
                frame.view.as_flattened(),
                frame.projection.as_flattened(),
                frame.instance_bytes(),
            );
        }
    }

    struct App {
        game: Game<LocalStorageStore>,
        dispatcher: JsDispatcher,
        canvas: HtmlCanvasElement,
    }

    impl App {
        fn aspect(&self) -> f32 {
            let w = self.canvas.client_width().max(1) as f32;
            let h = self.canvas.client_height().max(1) as f32;
            w / h
        }

        fn frame(&mut self, time: f64) {
            let aspect = self.aspect();
            let events = self.game.frame_and_draw(time, aspect, &mut self.dispatcher);
            for event in &events {
                self.on_event(event);
            }
            self.update_hud();
        }

        fn on_event(&self, event: &GameEvent) {
            match event {
                GameEvent::Started | GameEvent::Restarted => {
                    set_hidden("start-screen", true);
                    set_hidden("pause-screen", true);
                    set_hidden("game-over", true);
                }
                GameEvent::Paused => set_hidden("pause-screen", false),
                GameEvent::Resumed => set_hidden("pause-screen", true),
                GameEvent::CameraChanged(mode) => log::info!("Camera: {}", mode.as_str()),
                GameEvent::RunEnded { .. } => self.show_summary(),
                _ => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let state = &self.game.state;
            set_text("timer-display", &format!("TIME: {}", format_clock(state.elapsed_secs)));
            set_text("coin-display", &format!("COINS: {}", state.player.coins_collected));
        }

        fn show_summary(&self) {
            let Some(summary) = self.game.last_summary() else {
                return;
            };
            let title = match summary.outcome {
                Outcome::GameOver => "GAME OVER",
                Outcome::Victory => "YOU WIN!",
            };
            set_text("game-over-title", title);
            set_text("final-coins", &summary.coins.to_string());
            set_text("final-time", &format_clock(summary.elapsed_secs));
            if summary.new_record {
                set_text("record-line", "NEW RECORD!");
            } else {
                set_text("record-line", &format!("Record: {}", summary.best));
            }
            set_hidden("game-over", false);
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    /// Map a key to a game input
    fn map_key(key: &str) -> Option<InputEvent> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(InputEvent::LaneLeft),
            "ArrowRight" | "d" | "D" => Some(InputEvent::LaneRight),
            "Escape" | "p" | "P" => Some(InputEvent::PauseToggle),
            "ArrowUp" => Some(InputEvent::CameraToggle),
            "Enter" => Some(InputEvent::Start),
            _ => None,
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Lane Runner starting...");

        let Some(document) = document() else {
            log::error!("No document");
            return;
        };
        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("glCanvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No #glCanvas element");
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(seed, Tuning::default(), LocalStorageStore) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Failed to create game: {}", e);
                return;
            }
        };
        let app = Rc::new(RefCell::new(App {
            game,
            dispatcher: JsDispatcher,
            canvas,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(app.clone());
        setup_button("btn-start", app.clone(), InputEvent::Start);
        setup_button("btn-resume", app.clone(), InputEvent::PauseToggle);
        setup_button("btn-restart", app.clone(), InputEvent::Restart);
        setup_button("btn-play-again", app.clone(), InputEvent::Restart);
        setup_auto_pause(app.clone());

        request_animation_frame(app);
        log::info!("Lane Runner running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(input) = map_key(event.key().as_str()) {
                app.borrow_mut().game.push_input(input);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_button(id: &str, app: Rc<RefCell<App>>, input: InputEvent) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.borrow_mut().game.push_input(input);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Pause when the tab is hidden
    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(document) = document() else {
            return;
        };
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut app = app.borrow_mut();
                if app.game.phase() == GamePhase::Running {
                    app.game.push_input(InputEvent::PauseToggle);
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
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
    use lane_runner::best_score::JsonFileStore;
    use lane_runner::renderer::NullDispatcher;
    use lane_runner::sim::InputEvent;
    use lane_runner::{Game, Tuning, format_clock};

    env_logger::init();
    log::info!("Lane Runner (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the playable version");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let store = JsonFileStore::new(std::env::temp_dir().join("lane_runner_best.json"));
    let mut game = match Game::new(seed, tuning, store) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to create game: {}", e);
            std::process::exit(1);
        }
    };
    let mut dispatcher = NullDispatcher::default();

    // Run straight down the middle lane at 60 fps for up to five minutes
    game.push_input(InputEvent::Start);
    let frame_ms = 1000.0 / 60.0;
    for i in 0..(60 * 300) {
        game.frame_and_draw(i as f64 * frame_ms, 16.0 / 9.0, &mut dispatcher);
        if game.last_summary().is_some() {
            break;
        }
    }

    match game.last_summary() {
        Some(summary) => println!(
            "{:?} after {}: {} coins (best {}{})",
            summary.outcome,
            format_clock(summary.elapsed_secs),
            summary.coins,
            summary.best,
            if summary.new_record { ", new record" } else { "" }
        ),
        None => println!(
            "Survived {} with {} coins",
            format_clock(game.state.elapsed_secs),
            game.state.player.coins_collected
        ),
    }
    log::info!("Rendered {} frames", dispatcher.frames);
}
