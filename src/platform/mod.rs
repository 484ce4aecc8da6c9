//! Platform abstraction layer
//!
//! The game never loops on its own. It asks a [`Scheduler`] for the next
//! display frame or a countdown timeout, and the platform calls back into
//! [`Game::on_frame`](crate::Game::on_frame) / [`Game::on_timer`](crate::Game::on_timer)
//! with the token it handed out.
//!
//! - [`ManualScheduler`]: records requests; tests and the headless runner fire them
//! - `web::WebScheduler` (wasm32): `requestAnimationFrame` / `setTimeout`

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Handle for a requested display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Handle for a requested timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

/// Source of frame and timer callbacks
pub trait Scheduler {
    /// Request one callback on the next display refresh
    fn schedule_frame(&mut self) -> FrameToken;
    /// Drop a pending frame request. Unknown tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
    /// Request one callback after `delay_ms`
    fn schedule_timer(&mut self, delay_ms: u32) -> TimerToken;
    /// Drop a pending timeout. Unknown tokens are ignored.
    fn cancel_timer(&mut self, token: TimerToken);
}

/// Scheduler that only records requests.
///
/// Nothing fires until the owner takes a token and hands it back to the game,
/// so a test can single-step frames and countdown timers deterministically.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_token: u64,
    frames: Vec<FrameToken>,
    timers: Vec<(TimerToken, u32)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Frame requests not yet fired or cancelled, oldest first
    pub fn pending_frames(&self) -> &[FrameToken] {
        &self.frames
    }

    /// Timer requests (token, delay) not yet fired or cancelled, oldest first
    pub fn pending_timers(&self) -> &[(TimerToken, u32)] {
        &self.timers
    }

    /// Remove and return the oldest pending frame
    pub fn take_frame(&mut self) -> Option<FrameToken> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    /// Remove and return the oldest pending timer
    pub fn take_timer(&mut self) -> Option<TimerToken> {
        if self.timers.is_empty() {
            None
        } else {
            Some(self.timers.remove(0).0)
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.allocate());
        self.frames.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.frames.retain(|t| *t != token);
    }

    fn schedule_timer(&mut self, delay_ms: u32) -> TimerToken {
        let token = TimerToken(self.allocate());
        self.timers.push((token, delay_ms));
        token
    }

    fn cancel_timer(&mut self, token: TimerToken) {
        self.timers.retain(|(t, _)| *t != token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_fifo() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule_frame();
        let b = scheduler.schedule_frame();
        assert_ne!(a, b);
        assert_eq!(scheduler.take_frame(), Some(a));
        assert_eq!(scheduler.take_frame(), Some(b));
        assert_eq!(scheduler.take_frame(), None);
    }

    #[test]
    fn test_manual_scheduler_cancel() {
        let mut scheduler = ManualScheduler::new();
        let frame = scheduler.schedule_frame();
        let timer = scheduler.schedule_timer(1000);
        assert_eq!(scheduler.pending_timers(), &[(timer, 1000)]);

        scheduler.cancel_frame(frame);
        scheduler.cancel_timer(timer);
        scheduler.cancel_timer(TimerToken(999));

        assert!(scheduler.pending_frames().is_empty());
        assert!(scheduler.pending_timers().is_empty());
    }
}
