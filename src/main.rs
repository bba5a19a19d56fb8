//! Catch the Hearts entry point
//!
//! Wires the simulation to the page: DOM events in, per-frame rendering out.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent, PageTransitionEvent};

    use catch_the_hearts::Settings;
    use catch_the_hearts::effects::{CELEBRATION, ConfettiBurst};
    use catch_the_hearts::pointer::{ScreenRect, client_to_field};
    use catch_the_hearts::sim::{Action, GameEvent, GameState, IntroChoice, Stage, tick};

    // canvas-confetti is loaded by the page; missing library means no confetti
    #[wasm_bindgen(inline_js = "
        export function fire_confetti(opts_json) {
            if (typeof window.confetti === 'function') {
                window.confetti(JSON.parse(opts_json));
            }
        }
    ")]
    extern "C" {
        fn fire_confetti(opts_json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: Pcg32,
        document: Document,
        heart_els: Vec<HtmlElement>,
        /// Pending animation frame
        raf_id: Option<i32>,
        /// Pending help delay: (token, timeout handle)
        helper_timer: Option<(u32, i32)>,
        running: bool,
    }

    impl Game {
        fn new(settings: Settings, seed: u64, document: Document) -> Self {
            let mut rng = Pcg32::seed_from_u64(seed);
            let state = GameState::new(settings, &mut rng);
            Self {
                state,
                rng,
                document,
                heart_els: Vec::new(),
                raf_id: None,
                helper_timer: None,
                running: true,
            }
        }

        /// Sync the DOM with the current state
        fn render(&self) {
            let state = &self.state;
            let stage = state.stage;
            let evasive = state.evasive_condition();

            set_hidden(&self.document, "intro", stage != Stage::Intro);
            set_hidden(&self.document, "intro-response", stage != Stage::IntroResponse);
            if let Some(el) = self.document.get_element_by_id("intro-line") {
                el.set_text_content(Some(&state.intro_line));
            }

            // Progress badge
            set_hidden(&self.document, "progress", stage != Stage::Playing);
            if let Some(el) = self.document.get_element_by_id("progress") {
                let _ = el.class_list().toggle_with_force("meme67", evasive);
            }
            if let Some(el) = self.document.get_element_by_id("progress-label") {
                el.set_text_content(Some(&state.progress_label()));
            }

            // Last-heart chase extras
            set_hidden(&self.document, "meme-arrow", !evasive);
            set_hidden(&self.document, "help-btn", !state.helper_visible());
            set_hidden(&self.document, "capybara", !state.runner_frozen());

            // Hearts
            set_hidden(&self.document, "hearts", !state.hearts_visible());
            let runner = state.runner();
            for (heart, el) in state.hearts.iter().zip(&self.heart_els) {
                let style = el.style();
                let half = heart.size / 2.0;
                let _ = style.set_property("left", &format!("{:.1}px", heart.pos.x - half));
                let _ = style.set_property("top", &format!("{:.1}px", heart.pos.y - half));
                let _ = style.set_property("width", &format!("{:.1}px", heart.size));
                let _ = style.set_property("height", &format!("{:.1}px", heart.size));
                let classes = el.class_list();
                let _ = classes.toggle_with_force("collected", heart.collected);
                let _ = classes.toggle_with_force("runner", runner == Some(heart.id));
            }

            // Message note
            set_hidden(&self.document, "note", state.note.is_none());
            if let (Some(el), Some(text)) = (self.document.get_element_by_id("note-text"), &state.note) {
                el.set_text_content(Some(text));
            }

            set_hidden(&self.document, "unlock-modal", stage != Stage::Unlocked);
            set_hidden(&self.document, "final-screen", stage != Stage::Accepted);
        }

        /// Stop the frame loop and any pending timer
        fn stop(&mut self) {
            self.running = false;
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(id) = self.raf_id.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some((_, handle)) = self.helper_timer.take() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Trace)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let settings = Settings::load();
        log::set_max_level(settings.log_level().to_level_filter());
        log::info!("Catch the Hearts starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(settings, seed, document.clone())));
        log::info!("Game initialized with seed: {}", seed);

        spawn_heart_elements(&document, &game)?;
        setup_pointer_tracking(&document, game.clone())?;
        setup_buttons(&document, &game)?;
        setup_page_lifecycle(&window, &game)?;

        game.borrow().render();
        request_animation_frame(game);

        log::info!("Catch the Hearts running!");
        Ok(())
    }

    /// One button per heart, positioned every frame
    fn spawn_heart_elements(document: &Document, game: &Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let container = document
            .get_element_by_id("hearts")
            .ok_or("missing #hearts container")?;

        let ids: Vec<usize> = game.borrow().state.hearts.iter().map(|h| h.id).collect();
        let mut els = Vec::with_capacity(ids.len());
        for id in ids {
            let el: HtmlElement = document.create_element("button")?.dyn_into()?;
            el.set_class_name("heart");
            el.set_text_content(Some("❤"));
            el.set_attribute("aria-label", "heart")?;
            on_event(&el, "click", game.clone(), move |_| Some(Action::ClickHeart(id)))?;
            container.append_child(&el)?;
            els.push(el);
        }

        game.borrow_mut().heart_els = els;
        Ok(())
    }

    fn setup_pointer_tracking(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let area = document
            .get_element_by_id("game-area")
            .ok_or("missing #game-area")?;

        let area_clone = area.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = area_clone.get_bounding_client_rect();
            let rect = ScreenRect::new(
                rect.left() as f32,
                rect.top() as f32,
                rect.width() as f32,
                rect.height() as f32,
            );
            let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            if let Some(pos) = client_to_field(client, rect) {
                game.borrow_mut().state.set_pointer(pos);
            }
        });
        area.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(document: &Document, game: &Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let buttons = [
            ("intro-yes", Action::Answer(IntroChoice::Yes)),
            ("intro-no", Action::Answer(IntroChoice::No)),
            ("start-btn", Action::StartGame),
            ("note-close", Action::CloseNote),
            ("help-btn", Action::RequestHelp),
            ("accept-btn", Action::Accept),
            ("decline-btn", Action::Decline),
        ];
        for (id, action) in buttons {
            match document.get_element_by_id(id) {
                Some(el) => on_event(&el, "click", game.clone(), move |_| Some(action))?,
                None => log::warn!("Missing button #{}", id),
            }
        }

        // Clicking the backdrop closes the note; clicks inside the card don't
        if let Some(backdrop) = document.get_element_by_id("note") {
            on_event(&backdrop, "click", game.clone(), |_| Some(Action::CloseNote))?;
        }
        if let Some(card) = document.get_element_by_id("note-card") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
            });
            card.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Stop on `pagehide`; pick the loop back up if the page returns from the bfcache
    fn setup_page_lifecycle(window: &web_sys::Window, game: &Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let game_hide = game.clone();
        let on_hide = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            dispatch(&game_hide, Action::Suspend);
            game_hide.borrow_mut().stop();
            if event.persisted() {
                log::info!("Page cached, game loop suspended");
            } else {
                log::info!("Game loop stopped");
            }
        });
        window.add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())?;
        on_hide.forget();

        let game_show = game.clone();
        let on_show = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            // First load also fires pageshow, with persisted = false
            if !event.persisted() || game_show.borrow().running {
                return;
            }
            game_show.borrow_mut().running = true;
            log::info!("Page restored, game loop resumed");
            request_animation_frame(game_show.clone());
            dispatch(&game_show, Action::Resume);
        });
        window.add_event_listener_with_callback("pageshow", on_show.as_ref().unchecked_ref())?;
        on_show.forget();
        Ok(())
    }

    /// Attach a listener that turns a mouse event into an action
    fn on_event<F>(target: &Element, kind: &str, game: Rc<RefCell<Game>>, to_action: F) -> Result<(), JsValue>
    where
        F: Fn(&MouseEvent) -> Option<Action> + 'static,
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if let Some(action) = to_action(&event) {
                dispatch(&game, action);
            }
        });
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Run an action through the state machine and carry out its side effects
    fn dispatch(game: &Rc<RefCell<Game>>, action: Action) {
        let events = {
            let mut g = game.borrow_mut();
            if !g.running {
                return;
            }
            g.state.dispatch(action)
        };

        for event in events {
            handle_event(game, event);
        }
        game.borrow().render();
    }

    fn handle_event(game: &Rc<RefCell<Game>>, event: GameEvent) {
        match event {
            GameEvent::ArmHelperTimer { token, delay_ms } => arm_helper_timer(game, token, delay_ms),
            GameEvent::CancelHelperTimer { token } => {
                let mut g = game.borrow_mut();
                if let Some((armed, handle)) = g.helper_timer {
                    if armed == token {
                        if let Some(window) = web_sys::window() {
                            window.clear_timeout_with_handle(handle);
                        }
                        g.helper_timer = None;
                    }
                }
            }
            GameEvent::ShakePrompt => shake_prompt(&game.borrow().document),
            GameEvent::Celebrate => celebrate(),
            other => log::debug!("{:?}", other),
        }
    }

    fn arm_helper_timer(game: &Rc<RefCell<Game>>, token: u32, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_cb = game.clone();
        let closure = Closure::once(move || {
            game_cb.borrow_mut().helper_timer = None;
            dispatch(&game_cb, Action::HelperTimerFired(token));
        });
        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
        closure.forget();

        match handle {
            Ok(handle) => game.borrow_mut().helper_timer = Some((token, handle)),
            Err(e) => log::warn!("Could not arm helper timer: {:?}", e),
        }
    }

    /// Restart the shake animation on the final prompt card
    fn shake_prompt(document: &Document) {
        let Some(card) = document.get_element_by_id("unlock-card") else {
            return;
        };
        let classes = card.class_list();
        let _ = classes.remove_1("shake");
        // Force a reflow so re-adding the class replays the animation
        if let Some(el) = card.dyn_ref::<HtmlElement>() {
            let _ = el.offset_width();
        }
        let _ = classes.add_1("shake");
    }

    fn celebrate() {
        for scheduled in CELEBRATION {
            if scheduled.delay_ms == 0 {
                fire_burst(&scheduled.burst);
                continue;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            let burst = scheduled.burst;
            let closure = Closure::once(move || fire_burst(&burst));
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                scheduled.delay_ms as i32,
            );
            closure.forget();
        }
    }

    fn fire_burst(burst: &ConfettiBurst) {
        log::debug!("Confetti: {} particles", burst.particle_count);
        fire_confetti(&burst.to_json());
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_cb = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game_cb);
        });
        let id = window.request_animation_frame(closure.as_ref().unchecked_ref()).ok();
        closure.forget();
        game.borrow_mut().raf_id = id;
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.raf_id = None;
            if !g.running {
                return;
            }

            let Game { state, rng, .. } = &mut *g;
            tick(state, rng);
            g.render();
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
fn main() {
    use catch_the_hearts::Settings;

    let settings = Settings::load();
    env_logger::Builder::new()
        .filter_level(settings.log_level().to_level_filter())
        .parse_default_env()
        .init();
    log::info!("Catch the Hearts (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    let state = headless::play(settings);
    match serde_json::to_string_pretty(&state) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize final state: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session exercising every stage without a browser
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use catch_the_hearts::Settings;
    use catch_the_hearts::effects::CELEBRATION;
    use catch_the_hearts::sim::{Action, GameEvent, GameState, IntroChoice, tick};

    /// Frames to simulate between clicks
    const FRAMES_PER_CLICK: usize = 30;

    pub fn play(settings: Settings) -> GameState {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = GameState::new(settings, &mut rng);
        log::info!("Headless session with seed: {}", seed);

        let mut pending_timer = None;

        apply(&mut state, &mut pending_timer, Action::Answer(IntroChoice::No));
        log::info!("{}", state.intro_line);
        apply(&mut state, &mut pending_timer, Action::StartGame);

        for id in 0..state.total() {
            for _ in 0..FRAMES_PER_CLICK {
                // Chase the heart we're about to click
                state.set_pointer(state.hearts[id].pos);
                tick(&mut state, &mut rng);
            }

            if state.runner() == Some(id) {
                if let Some(token) = pending_timer.take() {
                    apply(&mut state, &mut pending_timer, Action::HelperTimerFired(token));
                    apply(&mut state, &mut pending_timer, Action::RequestHelp);
                    tick(&mut state, &mut rng);
                }
            }

            apply(&mut state, &mut pending_timer, Action::ClickHeart(id));
            log::info!("{}", state.progress_label());
            apply(&mut state, &mut pending_timer, Action::CloseNote);
        }

        apply(&mut state, &mut pending_timer, Action::Decline);
        apply(&mut state, &mut pending_timer, Action::Accept);
        log::info!("Final stage: {}", state.stage.as_str());
        state
    }

    /// Dispatch and play out the side effects as log lines
    fn apply(state: &mut GameState, pending_timer: &mut Option<u32>, action: Action) {
        for event in state.dispatch(action) {
            match event {
                GameEvent::ArmHelperTimer { token, delay_ms } => {
                    log::info!("Would wait {} ms for help", delay_ms);
                    *pending_timer = Some(token);
                }
                GameEvent::CancelHelperTimer { .. } => *pending_timer = None,
                GameEvent::NoteOpened { heart } => {
                    log::info!("💌 {}", state.hearts[heart].message);
                }
                GameEvent::Celebrate => {
                    for s in CELEBRATION {
                        log::info!("+{} ms: confetti {}", s.delay_ms, s.burst.to_json());
                    }
                }
                other => log::debug!("{:?}", other),
            }
        }
    }
}
