//! Pause-compensated time base
//!
//! The simulation never reads a real clock: callers pass `now` (milliseconds)
//! into every call. `GameClock` keeps elapsed/paused bookkeeping, and
//! `Deadline` wraps every absolute timestamp stored anywhere in the sim so the
//! pause-shift invariant can be applied uniformly on resume: remaining
//! durations survive a pause untouched.

use serde::{Deserialize, Serialize};

/// Elapsed/paused time bookkeeping for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameClock {
    start_time: u64,
    paused_at: Option<u64>,
    total_paused: u64,
    running: bool,
    end_time: Option<u64>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all bookkeeping and begin a run at `now`
    pub fn start(&mut self, now: u64) {
        self.start_time = now;
        self.paused_at = None;
        self.total_paused = 0;
        self.running = true;
        self.end_time = None;
    }

    /// Freeze the clock at `now`; elapsed queries stay fixed there
    pub fn stop(&mut self, now: u64) {
        // A run ended while paused still folds the open span in
        if let Some(at) = self.paused_at.take() {
            self.total_paused += now.saturating_sub(at);
        }
        self.running = false;
        self.end_time = Some(now);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// No-op if already paused or not running
    pub fn pause(&mut self, now: u64) {
        if self.running && self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Returns the paused span so owners can shift their deadlines.
    /// No-op (returns 0) if not paused.
    pub fn resume(&mut self, now: u64) -> u64 {
        match self.paused_at.take() {
            Some(at) => {
                let span = now.saturating_sub(at);
                self.total_paused += span;
                span
            }
            None => 0,
        }
    }

    /// Milliseconds of unpaused run time; 0 before `start()`, frozen at the
    /// stop point after `stop()`
    pub fn elapsed_ms(&self, now: u64) -> u64 {
        let now = match self.end_time {
            Some(end) => end.min(now),
            None if !self.running => return 0,
            None => now,
        };
        let mut paused = self.total_paused;
        if let Some(at) = self.paused_at {
            paused += now.saturating_sub(at);
        }
        now.saturating_sub(self.start_time).saturating_sub(paused)
    }

    /// Whole seconds of unpaused run time
    pub fn elapsed_seconds(&self, now: u64) -> u64 {
        self.elapsed_ms(now) / 1000
    }
}

/// An absolute millisecond timestamp that participates in pause shifting
///
/// Used for every expiry, cooldown, spawn gate, and queued emission in the
/// sim. Cleared deadlines never fire and shift to nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline(Option<u64>);

impl Deadline {
    pub const IDLE: Deadline = Deadline(None);

    pub fn at(when: u64) -> Self {
        Deadline(Some(when))
    }

    /// Arm `duration` ms into the future
    pub fn arm(&mut self, now: u64, duration: u64) {
        self.0 = Some(now + duration);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// True once `now` has reached the deadline; never true when cleared
    pub fn is_due(&self, now: u64) -> bool {
        matches!(self.0, Some(when) if now >= when)
    }

    /// Armed and not yet due: the backing timed effect is still active
    pub fn pending(&self, now: u64) -> bool {
        matches!(self.0, Some(when) if now < when)
    }

    /// Milliseconds until due (0 when due or cleared)
    pub fn remaining_ms(&self, now: u64) -> u64 {
        self.0.map_or(0, |when| when.saturating_sub(now))
    }

    /// Shift forward by a paused span; cleared deadlines stay cleared
    pub fn shift(&mut self, span: u64) {
        if let Some(when) = self.0.as_mut() {
            *when += span;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_elapsed_before_start_is_zero() {
        let clock = GameClock::new();
        assert_eq!(clock.elapsed_ms(5_000), 0);
        assert_eq!(clock.elapsed_seconds(5_000), 0);
    }

    #[test]
    fn test_elapsed_excludes_pause() {
        let mut clock = GameClock::new();
        clock.start(1_000);
        assert_eq!(clock.elapsed_ms(4_000), 3_000);

        clock.pause(4_000);
        // Frozen while paused
        assert_eq!(clock.elapsed_ms(9_000), 3_000);

        let span = clock.resume(9_000);
        assert_eq!(span, 5_000);
        assert_eq!(clock.elapsed_ms(9_000), 3_000);
        assert_eq!(clock.elapsed_ms(10_000), 4_000);
    }

    #[test]
    fn test_redundant_pause_resume_are_noops() {
        let mut clock = GameClock::new();
        clock.start(0);
        assert_eq!(clock.resume(100), 0);
        clock.pause(100);
        clock.pause(300); // already paused, keeps the first mark
        assert_eq!(clock.resume(500), 400);
    }

    #[test]
    fn test_stop_while_paused_folds_open_span() {
        let mut clock = GameClock::new();
        clock.start(0);
        clock.pause(2_000);
        clock.stop(6_000);
        assert!(!clock.is_running());
        // 6 s wall minus the 4 s paused span, frozen thereafter
        assert_eq!(clock.elapsed_ms(10_000), 2_000);
        assert_eq!(clock.elapsed_ms(100_000), 2_000);
    }

    #[test]
    fn test_deadline_arm_due_shift() {
        let mut d = Deadline::IDLE;
        assert!(!d.is_due(u64::MAX));
        d.arm(1_000, 5_000);
        assert!(!d.is_due(5_999));
        assert!(d.is_due(6_000));
        assert_eq!(d.remaining_ms(3_000), 3_000);

        d.shift(2_000);
        assert!(!d.is_due(6_000));
        assert!(d.is_due(8_000));

        d.clear();
        d.shift(1_000);
        assert!(!d.is_set());
    }

    proptest! {
        /// Pause/resume pairs with no intervening run time never move elapsed
        #[test]
        fn prop_pause_invariance(start in 0u64..1_000_000, run in 0u64..1_000_000, spans in prop::collection::vec(1u64..100_000, 0..8)) {
            let mut clock = GameClock::new();
            clock.start(start);
            let mut now = start + run;
            let before = clock.elapsed_ms(now);
            for span in spans {
                clock.pause(now);
                now += span;
                clock.resume(now);
            }
            prop_assert_eq!(clock.elapsed_ms(now), before);
        }

        /// A deadline's remaining duration survives a pause shift exactly
        #[test]
        fn prop_deadline_remaining_survives_shift(now in 0u64..1_000_000, dur in 0u64..1_000_000, span in 0u64..1_000_000) {
            let mut d = Deadline::IDLE;
            d.arm(now, dur);
            let before = d.remaining_ms(now);
            d.shift(span);
            prop_assert_eq!(d.remaining_ms(now + span), before);
        }
    }
}
