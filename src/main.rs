//! Echo Maze entry point
//!
//! Handles platform-specific initialization and drives the frame loop. The
//! web build is the playable game; the native build runs a scripted headless
//! session as a smoke check of the full frame path.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use echo_maze::audio::WebAudio;
    use echo_maze::session::StatusSink;
    use echo_maze::sim::{GameStatus, TickInput};
    use echo_maze::{Session, Settings};

    thread_local! {
        static STARTED: Cell<bool> = const { Cell::new(false) };
    }

    /// Everything the frame loop needs
    struct Game {
        session: Session<WebAudio>,
        input: TickInput,
        last_time: f64,
    }

    /// Mirrors session status into the HUD text elements. Purely
    /// observational - the game runs fine if the elements are missing.
    struct DomSink;

    impl StatusSink for DomSink {
        fn publish(&mut self, status: GameStatus, time_left: f32, pos: Vec2) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let line = match status {
                GameStatus::Playing => {
                    format!("Status: PLAYING | Time: {}", time_left.ceil() as i32)
                }
                GameStatus::Won => "VICTORY! You found the artifact. Press R to play again.".into(),
                GameStatus::Lost => {
                    "GAME OVER. You were lost in the darkness. Press R to retry.".into()
                }
            };
            if let Some(el) = document.get_element_by_id("status") {
                el.set_text_content(Some(&line));
            }
            if let Some(el) = document.get_element_by_id("debug-info") {
                el.set_text_content(Some(&format!("Pos: {:.1}, {:.1}", pos.x, pos.y)));
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Echo Maze starting...");

        let document = web_sys::window()
            .expect("no window")
            .document()
            .expect("no document");

        // Hide loading indicator; the start overlay takes over from here
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_start_button();
    }

    /// The start button doubles as the retry button: audio context creation
    /// needs a user gesture, and a failed attempt leaves the overlay (and
    /// the button) armed for another try.
    fn setup_start_button() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                start_session();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start_session() {
        if STARTED.with(|s| s.get()) {
            return;
        }

        let mut settings = Settings::load();
        settings.sanitize();

        let audio = match WebAudio::new() {
            Ok(audio) => audio,
            Err(e) => {
                log::error!("audio init failed: {e}");
                show_overlay_message("Could not start audio. Check your output device and click again.");
                return;
            }
        };
        audio.resume();
        audio.set_master_volume(settings.master_volume);
        audio.set_reverb_mix(settings.reverb_mix);
        settings.save();

        let seed = js_sys::Date::now() as u64;
        let session = Session::with_settings(audio, seed, &settings).with_sink(Box::new(DomSink));
        log::info!("Session started with seed: {seed}");

        set_hidden("overlay", true);
        set_hidden("game-ui", false);
        STARTED.with(|s| s.set(true));

        let game = Rc::new(RefCell::new(Game {
            session,
            input: TickInput::default(),
            last_time: 0.0,
        }));
        setup_keyboard(game.clone());
        request_animation_frame(game);
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => g.input.forward = true,
                    "KeyS" | "ArrowDown" => g.input.backward = true,
                    "KeyA" | "ArrowLeft" => g.input.turn_left = true,
                    "KeyD" | "ArrowRight" => g.input.turn_right = true,
                    "KeyQ" => g.input.strafe_left = true,
                    "KeyE" => g.input.strafe_right = true,
                    "Space" => g.input.sonar = true,
                    "KeyR" => {
                        if !g.session.is_running() {
                            let seed = js_sys::Date::now() as u64;
                            g.input = TickInput::default();
                            g.session.restart(seed);
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => g.input.forward = false,
                    "KeyS" | "ArrowDown" => g.input.backward = false,
                    "KeyA" | "ArrowLeft" => g.input.turn_left = false,
                    "KeyD" | "ArrowRight" => g.input.turn_right = false,
                    "KeyQ" => g.input.strafe_left = false,
                    "KeyE" => g.input.strafe_right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            // Clamp so a backgrounded tab doesn't dump one huge step
            let dt = dt.min(0.1);
            g.last_time = time;

            if g.session.is_running() {
                let input = g.input.clone();
                g.session.frame(&input, dt);
                // Edge-triggered inputs are consumed by the frame that saw them
                g.input.sonar = false;
            }
        }

        // Keep scheduling even in a terminal state so a restart picks the
        // loop back up without re-wiring
        request_animation_frame(game);
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn show_overlay_message(text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("start-message"))
        {
            el.set_text_content(Some(text));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use echo_maze::Session;
    use echo_maze::audio::NullAudio;
    use echo_maze::sim::{TickInput, raycast};

    env_logger::init();
    log::info!("Echo Maze (native) starting...");

    // Headless demo: a scripted walker drives a full session against the
    // null backend. Hug the right wall, ping periodically, stop at the
    // first terminal state (the timeout bounds the run).
    let seed = 0xEC40;
    let mut session = Session::new(NullAudio::new(), seed);
    let dt = 1.0 / 60.0;
    let mut frames: u32 = 0;

    while session.is_running() {
        let state = session.state();
        let ahead = raycast(&state.maze, state.player.pos, state.player.forward(), 2.0);
        let blocked = ahead.hit && ahead.distance < 1.0;

        let input = TickInput {
            forward: !blocked,
            turn_right: blocked,
            sonar: frames % 120 == 0,
            ..Default::default()
        };
        session.frame(&input, dt);
        session.audio_mut().advance(f64::from(dt));
        frames += 1;
    }

    println!(
        "demo session over after {:.1}s: {}",
        frames as f32 * dt,
        session.status().as_str()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
