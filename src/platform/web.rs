//! Browser scheduler and JavaScript bridge
//!
//! The page owns the DOM. It constructs a [`WebGame`], registers an event
//! listener, forwards input, and renders the JSON events it receives.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{FrameToken, Scheduler, TimerToken};
use crate::config::Config;
use crate::game::Game;

type SharedGame = Rc<RefCell<Game<WebScheduler>>>;

/// `requestAnimationFrame` / `setTimeout` backed scheduler
pub struct WebScheduler {
    game: Weak<RefCell<Game<WebScheduler>>>,
    next_token: u64,
    /// Pending (token, browser handle) pairs
    frames: Vec<(FrameToken, i32)>,
    timers: Vec<(TimerToken, i32)>,
    listener: Option<js_sys::Function>,
}

impl WebScheduler {
    fn new(game: Weak<RefCell<Game<WebScheduler>>>) -> Self {
        Self {
            game,
            next_token: 0,
            frames: Vec::new(),
            timers: Vec::new(),
            listener: None,
        }
    }

    fn allocate(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

impl Scheduler for WebScheduler {
    fn schedule_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.allocate());
        let game = self.game.clone();
        let closure = Closure::once(move |now: f64| {
            if let Some(game) = game.upgrade() {
                {
                    let mut g = game.borrow_mut();
                    g.scheduler_mut().frames.retain(|(t, _)| *t != token);
                    g.on_frame(token, now);
                }
                dispatch(&game);
            }
        });
        match web_sys::window().map(|w| w.request_animation_frame(closure.as_ref().unchecked_ref())) {
            Some(Ok(handle)) => self.frames.push((token, handle)),
            Some(Err(err)) => log::error!("requestAnimationFrame failed: {:?}", err),
            None => log::error!("No window to schedule a frame on"),
        }
        closure.forget();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if let Some(pos) = self.frames.iter().position(|(t, _)| *t == token) {
            let (_, handle) = self.frames.remove(pos);
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    fn schedule_timer(&mut self, delay_ms: u32) -> TimerToken {
        let token = TimerToken(self.allocate());
        let game = self.game.clone();
        let closure = Closure::once(move || {
            if let Some(game) = game.upgrade() {
                {
                    let mut g = game.borrow_mut();
                    g.scheduler_mut().timers.retain(|(t, _)| *t != token);
                    g.on_timer(token);
                }
                dispatch(&game);
            }
        });
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        let scheduled = web_sys::window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay,
            )
        });
        match scheduled {
            Some(Ok(handle)) => self.timers.push((token, handle)),
            Some(Err(err)) => log::error!("setTimeout failed: {:?}", err),
            None => log::error!("No window to schedule a timer on"),
        }
        closure.forget();
        token
    }

    fn cancel_timer(&mut self, token: TimerToken) {
        if let Some(pos) = self.timers.iter().position(|(t, _)| *t == token) {
            let (_, handle) = self.timers.remove(pos);
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }
}

/// Hand queued events to the page listener as JSON strings.
///
/// Events are drained even without a listener so the queue stays bounded.
/// The game borrow is released before calling out so the listener may feed
/// input straight back in.
fn dispatch(game: &SharedGame) {
    let (events, listener) = {
        let mut g = game.borrow_mut();
        (g.drain_events(), g.scheduler().listener.clone())
    };
    let Some(listener) = listener else {
        log::trace!("No listener, dropped {} events", events.len());
        return;
    };

    for event in events {
        match serde_json::to_string(&event) {
            Ok(json) => {
                if let Err(err) = listener.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::warn!("Event listener threw: {:?}", err);
                }
            }
            Err(err) => log::error!("Failed to encode {:?}: {}", event, err),
        }
    }
}

/// JavaScript handle to one game
#[wasm_bindgen]
pub struct WebGame {
    game: SharedGame,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game, optionally from a JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> WebGame {
        let config = match config_json {
            Some(json) => Config::from_json(&json).unwrap_or_else(|err| {
                log::warn!("Bad config, using defaults: {}", err);
                Config::default()
            }),
            None => Config::default(),
        };
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new_cyclic(|weak| {
            RefCell::new(Game::new(config, seed, WebScheduler::new(weak.clone())))
        });
        WebGame { game }
    }

    /// Register the function that receives every event as a JSON string
    pub fn set_listener(&self, listener: js_sys::Function) {
        self.game.borrow_mut().scheduler_mut().listener = Some(listener);
        dispatch(&self.game);
    }

    pub fn viewport_resized(&self, height: f32, width: f32) {
        self.game.borrow_mut().viewport_resized(height, width);
        dispatch(&self.game);
    }

    pub fn flap(&self) {
        self.game.borrow_mut().flap_input();
        dispatch(&self.game);
    }

    pub fn start(&self) {
        self.game.borrow_mut().start_requested();
        dispatch(&self.game);
    }

    pub fn play_again(&self) {
        self.game.borrow_mut().play_again_requested();
        dispatch(&self.game);
    }

    pub fn score(&self) -> u32 {
        self.game.borrow().score()
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("si-orange core loaded");
}
