//! Neon Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use neon_arcade::renderer::Canvas2d;
    use neon_arcade::{Cabinet, Command, GameKind, Phase, Settings, Snapshot};

    /// Cabinet plus the browser handles it draws into
    struct Game {
        cabinet: Cabinet,
        canvas: HtmlCanvasElement,
        surface: Canvas2d,
        last_time: f64,
        last_phase: Phase,
    }

    impl Game {
        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;

            for event in self.cabinet.update(elapsed) {
                log::debug!("{event:?}");
            }

            let phase = self.cabinet.phase();
            if phase != self.last_phase {
                log::info!("{:?} -> {:?}", self.last_phase, phase);
                self.last_phase = phase;
            }
        }

        fn render(&mut self) {
            fit_canvas(&self.canvas, &mut self.surface);
            self.cabinet.paint(&mut self.surface);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let snapshot = self.cabinet.snapshot();

            let set = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };
            set("#hud-score .hud-value", &snapshot.score.to_string());
            set("#hud-level .hud-value", &snapshot.level.to_string());
            set("#hud-high .hud-value", &snapshot.high_score.to_string());

            // Lives only exist for Pac-Man
            if let Some(el) = document.get_element_by_id("hud-lives") {
                match snapshot.lives {
                    Some(lives) => {
                        let _ = el.set_attribute("class", "hud-item");
                        set("#hud-lives .hud-value", &lives.to_string());
                    }
                    None => {
                        let _ = el.set_attribute("class", "hud-item hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("phase-overlay") {
                let _ = el.set_attribute("data-phase", phase_name(&snapshot));
            }

            let _ = self
                .canvas
                .set_attribute("data-snapshot", &snapshot.to_json());
        }
    }

    fn phase_name(snapshot: &Snapshot) -> &'static str {
        match snapshot.phase {
            Phase::Idle => "idle",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::LevelComplete => "levelComplete",
            Phase::GameOver => "gameOver",
        }
    }

    /// Match the backing store to the CSS size at the current pixel ratio
    fn fit_canvas(canvas: &HtmlCanvasElement, surface: &mut Canvas2d) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        if width == 0 || height == 0 {
            return;
        }
        if canvas.width() != width || canvas.height() != height {
            canvas.set_width(width);
            canvas.set_height(height);
            surface.resize(width, height);
        }
    }

    fn read_settings(canvas: &HtmlCanvasElement) -> Settings {
        let Some(json) = canvas.get_attribute("data-settings") else {
            return Settings::default();
        };
        match Settings::from_json(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring data-settings ({e}), using defaults");
                Settings::default()
            }
        }
    }

    fn read_kind(canvas: &HtmlCanvasElement) -> GameKind {
        match canvas.get_attribute("data-game") {
            Some(name) => GameKind::from_str(&name).unwrap_or_else(|| {
                log::warn!("Unknown game '{name}', falling back to snake");
                GameKind::Snake
            }),
            None => GameKind::Snake,
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Neon Arcade starting...");

        let Some(window) = web_sys::window() else {
            web_sys::console::error_1(&"no window".into());
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> on the page");
            return;
        };

        let Some(mut surface) = Canvas2d::new(&canvas) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };
        fit_canvas(&canvas, &mut surface);

        let kind = read_kind(&canvas);
        let settings = read_settings(&canvas);
        let seed = js_sys::Date::now() as u64;
        let cabinet = Cabinet::new(kind, &settings, seed);

        let game = Rc::new(RefCell::new(Game {
            cabinet,
            canvas,
            surface,
            last_time: 0.0,
            last_phase: Phase::Idle,
        }));

        setup_keyboard(game.clone());
        setup_auto_pause(game.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(game);

        log::info!("Neon Arcade running {}", kind.as_str());
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let Ok(mut g) = game.try_borrow_mut() else {
                return;
            };
            if g.cabinet.handle_key(&event.key()) {
                // Keep arrows and space from scrolling the page
                event.prevent_default();
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed; loop stopped");
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        if let Ok(mut g) = game.try_borrow_mut() {
            g.update(time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let Ok(mut g) = game.try_borrow_mut() else {
                        return;
                    };
                    if g.cabinet.command(Command::Pause) {
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let Ok(mut g) = game.try_borrow_mut() else {
                    return;
                };
                if g.cabinet.command(Command::Pause) {
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Arcade (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable cabinets");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let settings = neon_arcade::Settings::default();
    let mut list = neon_arcade::renderer::DrawList::new(glam::Vec2::new(640.0, 480.0));

    for kind in neon_arcade::GameKind::ALL {
        list.clear_commands();
        run_demo(kind, &settings, seed, &mut list);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a cabinet for a few simulated seconds with a canned key script
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(
    kind: neon_arcade::GameKind,
    settings: &neon_arcade::Settings,
    seed: u64,
    list: &mut neon_arcade::renderer::DrawList,
) {
    use neon_arcade::{Cabinet, Phase};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const SCRIPT: [&str; 8] = [
        "ArrowUp",
        "ArrowLeft",
        "ArrowDown",
        "ArrowRight",
        "ArrowUp",
        " ",
        "ArrowLeft",
        "ArrowDown",
    ];

    let mut cabinet = Cabinet::new(kind, settings, seed);
    cabinet.handle_key("Enter");

    let mut events = 0;
    for frame in 0..600 {
        if frame % 45 == 0 {
            let key = SCRIPT[(frame / 45) % SCRIPT.len()];
            // Hard drop in Tetris; for the others space would pause
            if key != " " || kind == neon_arcade::GameKind::Tetris {
                cabinet.handle_key(key);
            }
        }
        events += cabinet.update(FRAME_MS).len();
        if cabinet.phase() == Phase::GameOver {
            break;
        }
    }

    cabinet.paint(list);

    log::info!(
        "{}: {} events, {} draw commands, snapshot {}",
        kind.as_str(),
        events,
        list.len(),
        cabinet.snapshot().to_json()
    );
}
