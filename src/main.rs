//! Flappy Feather entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use flappy_feather::fx::Effects;
    use flappy_feather::platform::default_storage;
    use flappy_feather::sim::{Field, GameEvent, Obstacle};
    use flappy_feather::{Mode, RenderSnapshot, Session, Settings, autopilot};

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        effects: Effects,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        /// A frame callback is scheduled
        looping: bool,
        /// Menu dismissed
        started: bool,
        /// Demo mode - autopilot plays
        idle: bool,
    }

    impl Game {
        /// Match the canvas to the window and report the field
        fn fit_canvas(&self) -> Field {
            let window = web_sys::window().unwrap();
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
            if self.canvas.width() != w as u32 || self.canvas.height() != h as u32 {
                self.canvas.set_width(w as u32);
                self.canvas.set_height(h as u32);
            }
            Field::new(w as f32, h as f32)
        }

        /// Run one frame; returns whether another frame should be requested
        fn update(&mut self) -> bool {
            let field = self.fit_canvas();
            if self.idle && autopilot::should_trigger(self.session.state(), field) {
                self.session.trigger();
            }

            let frame = self.session.frame(field);
            self.effects
                .apply(&frame.report, self.session.state(), &self.settings);
            self.draw(&frame.render);
            self.update_hud(&frame.report.events);

            self.session.is_ticking()
        }

        fn draw(&self, snap: &RenderSnapshot) {
            let ctx = &self.ctx;
            let (w, h) = (snap.field.width as f64, snap.field.height as f64);
            let arcade = snap.mode == Mode::Arcade;

            ctx.clear_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str(if arcade { "#0b0033" } else { "#87ceeb" });
            ctx.fill_rect(0.0, 0.0, w, h);

            ctx.set_fill_style_str(if arcade { "#00ffcc" } else { "green" });
            for obstacle in &snap.obstacles {
                match *obstacle {
                    Obstacle::GapPair {
                        x,
                        width,
                        gap_top,
                        gap_bottom,
                        ..
                    } => {
                        ctx.fill_rect(x as f64, 0.0, width as f64, gap_top as f64);
                        ctx.fill_rect(x as f64, gap_bottom as f64, width as f64, h - gap_bottom as f64);
                    }
                    Obstacle::Spike { x, y, width, height } => {
                        ctx.begin_path();
                        ctx.move_to(x as f64, (y + height) as f64);
                        ctx.line_to((x + width / 2.0) as f64, y as f64);
                        ctx.line_to((x + width) as f64, (y + height) as f64);
                        ctx.close_path();
                        ctx.fill();
                    }
                    Obstacle::Floating { x, y, size } => {
                        let r = size as f64 / 2.0;
                        ctx.begin_path();
                        let _ = ctx.arc(x as f64 + r, y as f64 + r, r, 0.0, TAU);
                        ctx.fill();
                    }
                }
            }

            let ground = snap.field.ground_height() as f64;
            ctx.set_fill_style_str(if arcade { "#3300aa" } else { "#8B4513" });
            ctx.fill_rect(0.0, h - ground, w, ground);

            ctx.set_fill_style_str("#00ffff");
            for point in &self.effects.trail {
                ctx.set_global_alpha(point.alpha as f64);
                ctx.begin_path();
                let _ = ctx.arc(point.pos.x as f64, point.pos.y as f64, 8.0, 0.0, TAU);
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);

            let actor = &snap.actor;
            ctx.set_fill_style_str(if arcade { "#00ffff" } else { "#FFD700" });
            ctx.fill_rect(
                actor.pos.x as f64,
                actor.pos.y as f64,
                actor.width as f64,
                actor.height as f64,
            );

            for particle in &self.effects.particles {
                ctx.set_global_alpha(particle.alpha() as f64);
                ctx.set_fill_style_str(&format!("#{:06x}", particle.color));
                ctx.begin_path();
                let _ = ctx.arc(
                    particle.pos.x as f64,
                    particle.pos.y as f64,
                    particle.size as f64,
                    0.0,
                    TAU,
                );
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);

            if self.effects.flash > 0.0 {
                ctx.set_fill_style_str(&format!("rgba(255,255,255,{:.3})", self.effects.flash * 0.25));
                ctx.fill_rect(0.0, 0.0, w, h);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, events: &[GameEvent]) {
            let document = web_sys::window().unwrap().document().unwrap();
            let state = self.session.state();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("Score: {}", state.score)));
            }
            if let Some(el) = document.get_element_by_id("highScore") {
                el.set_text_content(Some(&format!("Best: {}", state.best_score)));
            }

            for event in events {
                match event {
                    GameEvent::Started => set_hidden(&document, "instructions", true),
                    GameEvent::GameOver { score, .. } => {
                        if let Some(el) = document.get_element_by_id("finalScore") {
                            el.set_text_content(Some(&format!("Your Score: {}", score)));
                        }
                        if let Some(el) = document.get_element_by_id("gameOver") {
                            let _ = el.class_list().add_1("show");
                        }
                    }
                    _ => {}
                }
            }
        }

        fn start(&mut self, mode: Mode) {
            self.settings.mode = mode;
            let mut store = default_storage();
            self.settings.save(store.as_mut());
            self.session.set_mode(mode, self.settings.tuning());
            self.effects.clear();
            self.started = true;
        }

        fn restart(&mut self) {
            self.session.reset();
            self.effects.clear();
        }
    }

    fn set_hidden(document: &web_sys::Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if hidden {
                el.class_list().add_1("hidden")
            } else {
                el.class_list().remove_1("hidden")
            };
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Feather starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let store = default_storage();
        let settings = Settings::load(store.as_ref());
        let seed = js_sys::Date::now() as u64;
        let field = Field::new(
            window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0) as f32,
            window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0) as f32,
        );
        let session = Session::with_tuning(settings.mode, settings.tuning(), field, seed, store);

        if let Some(el) = document.get_element_by_id("highScore") {
            el.set_text_content(Some(&format!("Best: {}", session.best_score())));
        }
        set_hidden(&document, "instructions", true);

        let game = Rc::new(RefCell::new(Game {
            session,
            settings,
            effects: Effects::new(seed ^ 0x9E37_79B9_7F4A_7C15),
            canvas: canvas.clone(),
            ctx,
            looping: false,
            started: false,
            idle: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_mode_buttons(game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game);
    }

    fn setup_mode_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        for (id, mode) in [("modeA", Mode::Calm), ("modeB", Mode::Arcade)] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().start(mode);
                    let document = web_sys::window().unwrap().document().unwrap();
                    set_hidden(&document, "modeSelector", true);
                    set_hidden(&document, "instructions", false);
                    ensure_loop(game.clone());
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer covers mouse, pen and touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.started {
                    g.session.trigger();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        if g.started {
                            g.session.trigger();
                        }
                    }
                    "KeyI" => {
                        g.idle = !g.idle;
                        log::info!("Idle mode: {}", g.idle);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("restartBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("gameOver") {
                    let _ = el.class_list().remove_1("show");
                }
                set_hidden(&document, "instructions", false);
                ensure_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Start the frame loop unless it is already running
    fn ensure_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.looping {
                return;
            }
            g.looping = true;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let keep_going = g.update();
            g.looping = keep_going;
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
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

/// Frames after which a headless game is called off (10 minutes at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 36_000;

/// Headless runner: autopilot games, best score persisted to disk
///
/// Usage: `flappy-feather [seed] [games] [calm|arcade]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_feather::platform::default_storage;
    use flappy_feather::sim::{Field, GameEvent, RunState};
    use flappy_feather::{Mode, Session, Settings, autopilot};

    env_logger::init();
    log::info!("Flappy Feather (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let games: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let mode_arg = args.next();

    let store = default_storage();
    let mut settings = Settings::load(store.as_ref());
    if let Some(arg) = mode_arg {
        match Mode::from_str(&arg) {
            Some(mode) => settings.mode = mode,
            None => log::warn!("Unknown mode {:?}, using {}", arg, settings.mode.as_str()),
        }
    }
    let field = Field::default();
    let mut session = Session::with_tuning(settings.mode, settings.tuning(), field, seed, store);

    println!(
        "Mode {}, seed {}, best so far {}",
        settings.mode.as_str(),
        seed,
        session.best_score()
    );

    let mut total_points = 0;
    for game in 1..=games {
        let mut cause = None;
        while session.state().frame < MAX_FRAMES && session.state().run != RunState::Ended {
            if autopilot::should_trigger(session.state(), field) {
                session.trigger();
            }
            let frame = session.frame(field);
            total_points += frame.report.score_delta();
            for event in frame.report.events {
                if let GameEvent::Collided(c) = event {
                    cause = Some(c);
                }
            }
        }

        let state = session.state();
        match cause {
            Some(cause) => println!(
                "Game {}: score {} after {} frames ({:?})",
                game, state.score, state.frame, cause
            ),
            None => println!(
                "Game {}: score {} after {} frames (called off)",
                game, state.score, state.frame
            ),
        }
        session.reset();
    }

    println!("Points over {} games: {}", games, total_points);
    println!("Best: {}", session.best_score());
}
