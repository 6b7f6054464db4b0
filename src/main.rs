//! Fruit Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent, TouchEvent};

    use fruit_rush::consts::*;
    use fruit_rush::sim::{GameEvent, ItemKind, Session, TickInput, tick};
    use glam::Vec2;

    /// How long a points popup floats before vanishing
    const POPUP_MS: f64 = 800.0;

    /// Floating "+50 DIVINE!" text
    struct Popup {
        pos: Vec2,
        text: String,
        color: &'static str,
        born: f64,
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        ctx: CanvasRenderingContext2d,
        accumulator: f64,
        last_time: f64,
        input: TickInput,
        popups: Vec<Popup>,
    }

    impl Game {
        fn new(seed: u64, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                session: Session::new(seed),
                ctx,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                popups: Vec::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f64) {
            self.accumulator += dt_ms.min(100.0);

            let step = SIM_DT_MS as f64;
            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                tick(&mut self.session, &self.input, SIM_DT_MS);
                self.accumulator -= step;
                substeps += 1;
            }
        }

        /// Apply session notifications to the DOM HUD and popups
        fn handle_events(&mut self, time: f64) {
            let document = match web_sys::window().and_then(|w| w.document()) {
                Some(d) => d,
                None => return,
            };

            for event in self.session.drain_events() {
                match event {
                    GameEvent::ScoreChanged { score } => {
                        if let Some(el) = document.get_element_by_id("score") {
                            el.set_text_content(Some(&score.to_string()));
                            let _ = el.set_attribute("class", "hud-value pop");
                        }
                    }
                    GameEvent::SuperMode { active, .. } => {
                        if let Some(el) = document.get_element_by_id("super-banner") {
                            let _ = el.set_attribute("class", if active { "" } else { "hidden" });
                        }
                    }
                    GameEvent::Won => {
                        if let Some(el) = document.get_element_by_id("super-banner") {
                            let _ = el.set_attribute("class", "hidden");
                        }
                        if let Some(el) = document.get_element_by_id("win") {
                            let _ = el.set_attribute("class", "");
                        }
                        if let Some(el) = document.get_element_by_id("final-score") {
                            el.set_text_content(Some(&self.session.score().to_string()));
                        }
                    }
                    GameEvent::Collected {
                        pos,
                        points,
                        kind,
                        qualifier,
                    } => {
                        let text = if kind == ItemKind::Star {
                            qualifier.label().to_string()
                        } else if points > 0 {
                            format!("+{} {}", points, qualifier.label()).trim_end().to_string()
                        } else {
                            points.to_string()
                        };
                        let color = if kind == ItemKind::Star {
                            "#ffdd00"
                        } else if kind.is_bad() {
                            "#ff5555"
                        } else {
                            "#55ff99"
                        };
                        self.popups.push(Popup {
                            pos: pos - Vec2::new(0.0, 30.0),
                            text,
                            color,
                            born: time,
                        });
                    }
                    GameEvent::ItemSpawned { .. } | GameEvent::ItemExpired { .. } => {}
                }
            }

            // Super countdown in whole seconds, rounded up
            if let Some(remaining) = self.session.super_remaining_ms() {
                if let Some(el) = document.get_element_by_id("super-timer") {
                    el.set_text_content(Some(&remaining.div_ceil(1000).to_string()));
                }
            }

            self.popups.retain(|p| time - p.born < POPUP_MS);
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            let ctx = &self.ctx;
            let now = self.session.now_ms();

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#2d1b69");
            ctx.fill_rect(0.0, 0.0, WORLD_WIDTH as f64, WORLD_HEIGHT as f64);

            if self.session.is_super() {
                ctx.set_fill_style_str("rgba(255, 221, 0, 0.08)");
                ctx.fill_rect(0.0, 0.0, WORLD_WIDTH as f64, WORLD_HEIGHT as f64);
            }

            for (_, item) in self.session.items() {
                let pos = item.display_pos(now);
                circle(ctx, pos, item.kind.radius(), item_color(item.kind));
            }

            let player = self.session.player();
            circle(ctx, player.pos, player.radius, "#ff6b9d");

            ctx.set_text_align("center");
            for popup in &self.popups {
                let t = ((time - popup.born) / POPUP_MS).clamp(0.0, 1.0);
                ctx.set_global_alpha(1.0 - t);
                ctx.set_font("bold 32px \"Segoe UI\", Arial, sans-serif");
                ctx.set_fill_style_str(popup.color);
                let y = popup.pos.y as f64 - 80.0 * t;
                let _ = ctx.fill_text(&popup.text, popup.pos.x as f64, y);
            }
            ctx.set_global_alpha(1.0);
        }
    }

    fn item_color(kind: ItemKind) -> &'static str {
        match kind {
            ItemKind::Apple => "#ff3b3b",
            ItemKind::Banana => "#ffe135",
            ItemKind::Cherry => "#c2185b",
            ItemKind::Grape => "#8e44ad",
            ItemKind::Bomb => "#333333",
            ItemKind::Skull => "#eeeeee",
            ItemKind::Star => "#ffdd00",
        }
    }

    fn circle(ctx: &CanvasRenderingContext2d, pos: Vec2, radius: f32, color: &str) {
        ctx.begin_path();
        let _ = ctx.arc(
            pos.x as f64,
            pos.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.set_fill_style_str(color);
        ctx.fill();
    }

    /// Map a client-space point on the canvas to world coordinates
    fn to_world(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let sx = WORLD_WIDTH as f64 / rect.width().max(1.0);
        let sy = WORLD_HEIGHT as f64 / rect.height().max(1.0);
        Vec2::new(
            ((client_x - rect.left()) * sx) as f32,
            ((client_y - rect.top()) * sy) as f32,
        )
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Fruit Rush starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(WORLD_WIDTH as u32);
        canvas.set_height(WORLD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, ctx)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone())?;
        request_animation_frame(game);

        log::info!("Fruit Rush running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Pointer move/down - follow the pointer
        for event_name in ["pointermove", "pointerdown"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let target = to_world(
                    &canvas_clone,
                    event.client_x() as f64,
                    event.client_y() as f64,
                );
                game.borrow_mut().input.target = Some(target);
            });
            canvas.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move - keep the page from scrolling under the finger
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let target = to_world(
                        &canvas_clone,
                        touch.client_x() as f64,
                        touch.client_y() as f64,
                    );
                    game.borrow_mut().input.target = Some(target);
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), "i" | "I") {
                    let mut g = game.borrow_mut();
                    g.input.idle_mode = !g.input.idle_mode;
                    log::info!("Idle mode: {}", g.input.idle_mode);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                SIM_DT_MS as f64
            };
            g.last_time = time;

            g.update(dt_ms);
            g.handle_events(time);
            g.render(time);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autoplay for balance testing
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use serde::Serialize;

    use fruit_rush::Tuning;
    use fruit_rush::consts::SIM_DT_MS;
    use fruit_rush::sim::{GameEvent, Session, TickInput, tick};

    /// Give up on a run after this much simulated time
    const MAX_RUN_MS: u64 = 10 * 60 * 1000;

    #[derive(Debug, Default, Serialize)]
    struct RunSummary {
        seed: u64,
        won: bool,
        score: u32,
        elapsed_ms: u64,
        spawned: u32,
        collected: u32,
        expired: u32,
        super_activations: u32,
        best_points: i32,
    }

    impl RunSummary {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::ItemSpawned { .. } => self.spawned += 1,
                GameEvent::ItemExpired { .. } => self.expired += 1,
                GameEvent::Collected { points, .. } => {
                    self.collected += 1;
                    self.best_points = self.best_points.max(*points);
                }
                GameEvent::SuperMode { active: true, .. } => self.super_activations += 1,
                GameEvent::Won => self.won = true,
                GameEvent::ScoreChanged { .. } | GameEvent::SuperMode { .. } => {}
            }
        }
    }

    /// Usage: `fruit-rush [seed] [tuning.json]`
    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        env_logger::init();
        log::info!("Fruit Rush (native) starting...");
        log::info!("Native mode runs a headless autoplay session - run with `trunk serve` to play");

        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s.parse::<u64>()?,
            None => 1,
        };
        let tuning = match args.next() {
            Some(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Tuning::default(),
        };

        let mut session = Session::with_tuning(seed, tuning)?;
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        log::info!(
            "Autoplaying seed {} to {} points",
            session.seed(),
            session.tuning().win_score
        );
        let mut summary = RunSummary {
            seed: session.seed(),
            ..Default::default()
        };

        while !session.is_won() && session.now_ms() < MAX_RUN_MS {
            tick(&mut session, &input, SIM_DT_MS);
            for event in session.drain_events() {
                if let GameEvent::ScoreChanged { score } = event {
                    log::debug!("Score {} at {}ms", score, session.now_ms());
                }
                summary.record(&event);
            }
        }

        summary.score = session.score();
        summary.elapsed_ms = session.now_ms();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}
