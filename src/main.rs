//! Fleet Battle entry point
//!
//! On the web this wires the canvas, DOM and Web Audio to a fixed-step
//! driver. Natively it runs both variants headless on autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent};

    use fleet_battle::audio::WebAudio;
    use fleet_battle::platform::Controls;
    use fleet_battle::platform::web::{CanvasSurface, DomHud, embedded_json, load_sprites};
    use fleet_battle::render::{SpriteAtlas, draw_frame};
    use fleet_battle::sim::{
        Action, Arena, FleetBattle, FrameDriver, GamePhase, Simulation, WaveSurvival,
    };
    use fleet_battle::{FleetPreset, Settings, Tuning};

    struct Game<S> {
        driver: FrameDriver<S>,
        controls: Controls,
        settings: Settings,
        arena: Arena,
        surface: CanvasSurface,
        atlas: SpriteAtlas<HtmlImageElement>,
        audio: WebAudio,
        hud: DomHud,
        last_time: f64,
    }

    impl<S: Simulation> Game<S> {
        fn frame(&mut self, dt: f32) {
            self.driver.frame(dt, &mut self.audio, &mut self.hud);
            let drawables = self.driver.sim.drawables();
            draw_frame(&mut self.surface, &mut self.atlas, &self.arena, &drawables);
        }

        fn apply_settings(&mut self) {
            self.driver.sim.apply_settings(&self.settings);
            self.audio.apply_settings(&self.settings);
        }

        fn resize(&mut self, width: f32, height: f32) {
            self.arena = Arena::new(width, height);
            self.driver.sim.set_arena(self.arena);
        }
    }

    type Shared<S> = Rc<RefCell<Game<S>>>;

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Fleet Battle starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };
        let Some(canvas) = document
            .get_element_by_id("game-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game-canvas element");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let (width, height) = window_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let arena = Arena::new(width, height);

        let seed = js_sys::Date::now() as u64;
        // Optional <script type="application/json"> overrides
        let settings = embedded_json(&document, "settings")
            .map(|json| Settings::from_json_or_default(&json))
            .unwrap_or_default();
        let tuning = embedded_json(&document, "tuning")
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default();
        let atlas = load_sprites().await;
        let audio = WebAudio::new(&settings);
        let hud = DomHud::new(document);
        let surface = CanvasSurface::new(ctx);

        // <canvas data-mode="battle"> selects the fleet battle
        if canvas.get_attribute("data-mode").as_deref() == Some("battle") {
            let mut sim = FleetBattle::new(seed, arena, tuning);
            sim.apply_settings(&settings);
            launch(
                canvas,
                Game {
                    driver: FrameDriver::new(sim),
                    controls: Controls::Battle,
                    settings,
                    arena,
                    surface,
                    atlas,
                    audio,
                    hud,
                    last_time: 0.0,
                },
            );
        } else {
            let mut sim = WaveSurvival::new(seed, arena, tuning);
            sim.apply_settings(&settings);
            launch(
                canvas,
                Game {
                    driver: FrameDriver::new(sim),
                    controls: Controls::Survival,
                    settings,
                    arena,
                    surface,
                    atlas,
                    audio,
                    hud,
                    last_time: 0.0,
                },
            );
        }
    }

    fn window_size(window: &web_sys::Window) -> (f32, f32) {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (
            dim(window.inner_width()) as f32,
            dim(window.inner_height()) as f32,
        )
    }

    fn launch<S: Simulation + 'static>(canvas: HtmlCanvasElement, game: Game<S>) {
        let game = Rc::new(RefCell::new(game));
        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas, game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);
    }

    fn on<E, F>(target: &web_sys::EventTarget, name: &str, handler: F)
    where
        E: FromWasmAbi + 'static,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers<S: Simulation + 'static>(canvas: &HtmlCanvasElement, game: Shared<S>) {
        let Some(window) = web_sys::window() else { return };

        // Pointer position in canvas space
        let to_canvas = {
            let canvas = canvas.clone();
            move |event: &MouseEvent| {
                let rect = canvas.get_bounding_client_rect();
                Vec2::new(
                    (f64::from(event.client_x()) - rect.left()) as f32,
                    (f64::from(event.client_y()) - rect.top()) as f32,
                )
            }
        };

        {
            let game = game.clone();
            let to_canvas = to_canvas.clone();
            on(canvas, "mousemove", move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let controls = g.controls;
                controls.pointer_moved(to_canvas(&event), &mut g.driver.input);
            });
        }

        {
            let game = game.clone();
            on(canvas, "mousedown", move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let controls = g.controls;
                controls.pointer_pressed(to_canvas(&event), &mut g.driver.input);
            });
        }

        {
            let game = game.clone();
            on(&window, "keydown", move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let controls = g.controls;
                if controls.key_down(&event.code(), &mut g.driver.input) {
                    event.prevent_default();
                }
            });
        }

        on(&window, "keyup", move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            let controls = g.controls;
            controls.key_up(&event.code(), &mut g.driver.input);
        });
    }

    fn setup_buttons<S: Simulation + 'static>(game: Shared<S>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let action_button = |id: &str, action: Action| {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                on(&btn, "click", move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.driver.push_action(action);
                });
            }
        };
        action_button("start-button", Action::Start);
        action_button("restart-button", Action::Restart);
        action_button("resume-button", Action::Pause);

        if let Some(btn) = document.get_element_by_id("mute-button") {
            let game = game.clone();
            let label = btn.clone();
            on(&btn, "click", move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.muted = !g.settings.muted;
                g.apply_settings();
                label.set_text_content(Some(if g.settings.muted { "Unmute" } else { "Mute" }));
            });
        }

        for preset in FleetPreset::ALL {
            let id = format!("fleet-{}", preset.as_str());
            if let Some(btn) = document.get_element_by_id(&id) {
                let game = game.clone();
                on(&btn, "click", move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.settings.preset = preset;
                    g.apply_settings();
                    log::info!("Fleet preset: {}", preset.as_str());
                });
            }
        }
    }

    fn setup_resize<S: Simulation + 'static>(canvas: HtmlCanvasElement, game: Shared<S>) {
        let Some(window) = web_sys::window() else { return };
        let win = window.clone();
        on(&window, "resize", move |_event: web_sys::Event| {
            let (w, h) = window_size(&win);
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            game.borrow_mut().resize(w, h);
        });
    }

    fn setup_auto_pause<S: Simulation + 'static>(game: Shared<S>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Tab switch or minimize
        {
            let game = game.clone();
            let doc = document.clone();
            on(&document, "visibilitychange", move |_event: web_sys::Event| {
                if doc.visibility_state() != web_sys::VisibilityState::Hidden {
                    return;
                }
                let mut g = game.borrow_mut();
                if g.driver.sim.phase() == GamePhase::Playing {
                    g.driver.push_action(Action::Pause);
                    log::info!("Auto-paused (tab hidden)");
                }
            });
        }

        on(&window, "blur", move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if g.driver.sim.phase() == GamePhase::Playing {
                g.driver.push_action(Action::Pause);
                log::info!("Auto-paused (window blur)");
            }
        });
    }

    fn request_animation_frame<S: Simulation + 'static>(game: Shared<S>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop<S: Simulation + 'static>(game: Shared<S>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                fleet_battle::consts::SIM_DT
            };
            g.last_time = time;
            g.frame(dt);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Fleet Battle (native) starting headless autopilot...");

    // fleet-battle [seed] [tuning.json] [settings.json]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = args
        .next()
        .and_then(|path| autopilot::read_config(&path))
        .map(|json| fleet_battle::Tuning::from_json_or_default(&json))
        .unwrap_or_default();
    let settings = args
        .next()
        .and_then(|path| autopilot::read_config(&path))
        .map(|json| fleet_battle::Settings::from_json_or_default(&json))
        .unwrap_or_default();

    autopilot::survival(seed, &tuning, &settings);
    autopilot::battle(seed, &tuning, &settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use fleet_battle::audio::MutedAudio;
    use fleet_battle::consts::SIM_DT;
    use fleet_battle::platform::LogHud;
    use fleet_battle::sim::{Action, Arena, FleetBattle, FrameDriver, GamePhase, WaveSurvival};
    use fleet_battle::{Settings, Tuning};

    /// Ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Contents of a config file, or `None` (logged) if it can't be read
    pub fn read_config(path: &str) -> Option<String> {
        std::fs::read_to_string(path)
            .map_err(|e| log::warn!("Can't read {path}: {e}"))
            .ok()
    }

    /// Aim at the nearest enemy, fire constantly, special every half second
    pub fn survival(seed: u64, tuning: &Tuning, settings: &Settings) {
        let mut sim = WaveSurvival::new(seed, Arena::default(), tuning.clone());
        sim.apply_settings(settings);
        let mut driver = FrameDriver::new(sim);
        let (mut audio, mut hud) = (MutedAudio, LogHud::default());

        driver.push_action(Action::Start);
        for frame in 0..MAX_FRAMES {
            let target = driver.sim.enemies.first().map(|e| e.pos);
            if let Some(pos) = target {
                driver.input.pointer = pos;
                driver.push_action(Action::Fire);
                if frame % 30 == 0 {
                    driver.push_action(Action::Special);
                }
            }
            driver.frame(SIM_DT, &mut audio, &mut hud);
            if matches!(driver.sim.phase, GamePhase::GameOver(_)) {
                break;
            }
        }

        match driver.sim.summary() {
            Some(summary) => log::info!(
                "Survival finished: {:?}, score {}, {} waves survived",
                summary.outcome,
                summary.score,
                summary.waves_survived
            ),
            None => log::info!(
                "Survival still running after {MAX_FRAMES} frames: score {}, wave {}",
                driver.sim.score,
                driver.sim.wave
            ),
        }
    }

    /// Fire the selected ship whenever possible, cycling through the fleet
    pub fn battle(seed: u64, tuning: &Tuning, settings: &Settings) {
        let mut sim = FleetBattle::new(seed, Arena::default(), tuning.clone());
        sim.apply_settings(settings);
        let mut driver = FrameDriver::new(sim);
        let (mut audio, mut hud) = (MutedAudio, LogHud::default());

        driver.push_action(Action::Start);

        for frame in 0..MAX_FRAMES {
            driver.push_action(Action::Fire);
            if frame % 45 == 0 {
                driver.push_action(Action::CycleNext);
            }
            driver.frame(SIM_DT, &mut audio, &mut hud);
            if matches!(driver.sim.phase, GamePhase::GameOver(_)) {
                break;
            }
        }
        log::info!("Fleet battle finished: {:?}", driver.sim.hud());
    }
}
