//! Session state machine
//!
//! Idle -> Countdown -> Running -> Over -> (play again) -> Countdown -> ...
//!
//! [`Game`] owns the session and the scheduler. At most one frame and one
//! countdown timer are pending at any time, and leaving a phase cancels
//! whatever that phase had scheduled. Callbacks carrying any other token are
//! stale and dropped.

use crate::config::Config;
use crate::platform::{FrameToken, ManualScheduler, Scheduler, TimerToken};
use crate::sim::{GameEvent, Session, SessionPhase, TickInput, TickOutcome, tick};

pub struct Game<S: Scheduler> {
    config: Config,
    session: Session,
    scheduler: S,
    pending_frame: Option<FrameToken>,
    pending_timer: Option<TimerToken>,
    /// Flap received since the last tick
    flap_queued: bool,
    /// Timestamp of the previous frame in this run
    last_frame_ms: Option<f64>,
}

impl<S: Scheduler> Game<S> {
    pub fn new(config: Config, seed: u64, scheduler: S) -> Self {
        let config = config.sanitized();
        let session = Session::new(&config, seed);
        log::info!("Game created with seed {}", seed);
        Self {
            config,
            session,
            scheduler,
            pending_frame: None,
            pending_timer: None,
            flap_queued: false,
            last_frame_ms: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }

    pub fn viewport_resized(&mut self, height: f32, width: f32) {
        let (clamped_height, clamped_width) = crate::clamp_viewport(height, width);
        if clamped_height != height || clamped_width != width {
            log::warn!(
                "Viewport {}x{} too small, using {}x{}",
                width,
                height,
                clamped_width,
                clamped_height
            );
        }
        self.session.resize(height, width);
        let tilt = crate::sim::tilt(self.session.body.vel, &self.config);
        self.session.emit(GameEvent::BodyMoved {
            y: self.session.body.y,
            tilt,
        });
    }

    /// Start button: only meaningful before the first run
    pub fn start_requested(&mut self) {
        match self.session.phase {
            SessionPhase::Idle => self.begin_countdown(),
            phase => log::debug!("Start ignored in {:?}", phase),
        }
    }

    /// Try again button: only meaningful after a run ended
    pub fn play_again_requested(&mut self) {
        match self.session.phase {
            SessionPhase::Over => self.begin_countdown(),
            phase => log::debug!("Play again ignored in {:?}", phase),
        }
    }

    pub fn flap_input(&mut self) {
        match self.session.phase {
            SessionPhase::Running => self.flap_queued = true,
            SessionPhase::Idle if self.config.flap_starts_game => {
                self.reset_run();
                self.begin_running();
                self.flap_queued = true;
            }
            SessionPhase::Countdown if self.config.flap_starts_game => {
                self.begin_running();
                self.flap_queued = true;
            }
            phase => log::debug!("Flap ignored in {:?}", phase),
        }
    }

    /// Countdown timer callback
    pub fn on_timer(&mut self, token: TimerToken) {
        if self.pending_timer != Some(token) {
            log::warn!("Ignoring stale timer {:?}", token);
            return;
        }
        self.pending_timer = None;
        if self.session.phase != SessionPhase::Countdown {
            return;
        }

        self.session.countdown = self.session.countdown.saturating_sub(1);
        let remaining = self.session.countdown;
        self.session.emit(GameEvent::CountdownTick { remaining });
        if remaining == 0 {
            self.begin_running();
        } else {
            self.pending_timer = Some(self.scheduler.schedule_timer(self.config.countdown_step_ms));
        }
    }

    /// Display frame callback; runs exactly one tick while Running
    pub fn on_frame(&mut self, token: FrameToken, now_ms: f64) {
        if self.pending_frame != Some(token) {
            log::warn!("Ignoring stale frame {:?}", token);
            return;
        }
        self.pending_frame = None;
        if self.session.phase != SessionPhase::Running {
            return;
        }

        let elapsed_ms = match self.last_frame_ms {
            Some(last) => (now_ms - last) as f32,
            None => self.config.target_frame_ms,
        };
        self.last_frame_ms = Some(now_ms);

        let input = TickInput {
            flap: std::mem::take(&mut self.flap_queued),
        };
        match tick(&mut self.session, &self.config, &input, elapsed_ms) {
            TickOutcome::Continue => self.request_frame(),
            TickOutcome::Over(_) => self.cancel_pending(),
            TickOutcome::Idle => {}
        }
    }

    /// Clear the previous run and count down to a new one
    fn begin_countdown(&mut self) {
        self.reset_run();
        self.session.countdown = self.config.countdown_from;
        self.session.set_phase(SessionPhase::Countdown);
        self.session.emit(GameEvent::CountdownTick {
            remaining: self.session.countdown,
        });
        if self.session.countdown == 0 {
            self.begin_running();
        } else {
            self.pending_timer = Some(self.scheduler.schedule_timer(self.config.countdown_step_ms));
        }
    }

    fn begin_running(&mut self) {
        self.cancel_pending();
        self.session.body.vel = self.config.initial_velocity;
        self.last_frame_ms = None;
        self.session.set_phase(SessionPhase::Running);
        self.request_frame();
    }

    fn reset_run(&mut self) {
        self.cancel_pending();
        self.flap_queued = false;
        self.last_frame_ms = None;
        self.session.reset(&self.config);
    }

    fn request_frame(&mut self) {
        if let Some(token) = self.pending_frame.take() {
            self.scheduler.cancel_frame(token);
        }
        self.pending_frame = Some(self.scheduler.schedule_frame());
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending_frame.take() {
            self.scheduler.cancel_frame(token);
        }
        if let Some(token) = self.pending_timer.take() {
            self.scheduler.cancel_timer(token);
        }
    }
}

impl Game<ManualScheduler> {
    /// Headless game driven by explicit stepping
    pub fn headless(config: Config, seed: u64) -> Self {
        Self::new(config, seed, ManualScheduler::new())
    }

    /// Fire the oldest pending frame at `now_ms`. False if none was pending.
    pub fn step_frame(&mut self, now_ms: f64) -> bool {
        match self.scheduler.take_frame() {
            Some(token) => {
                self.on_frame(token, now_ms);
                true
            }
            None => false,
        }
    }

    /// Fire the oldest pending timer. False if none was pending.
    pub fn fire_timer(&mut self) -> bool {
        match self.scheduler.take_timer() {
            Some(token) => {
                self.on_timer(token);
                true
            }
            None => false,
        }
    }
}
