//! # Countdown timers
//!
//! The quantizer has two timeouts, the gate length and the autosave delay. Both are counted in sample ticks by a
//! countdown which is restarted by some event and reports once when it runs out.

/// The state of a countdown after a tick is represented here
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerState {
    /// Not counting, either never started or expired on an earlier tick
    Idle,
    /// Counting down, not expired yet
    Running,
    /// Ran out on exactly this tick
    Expired,
}

/// A countdown timer measured in ticks is represented here
///
/// # Generic arguments:
///
/// * `TICKS` - the number of ticks from `start()` until the timer expires, counting the tick it was started on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown<const TICKS: u32> {
    remaining: u32,
}

impl<const TICKS: u32> Countdown<TICKS> {
    /// `Countdown::new()` is a new idle countdown
    pub const fn new() -> Self {
        Self { remaining: 0 }
    }

    /// `cd.start()` (re)starts the countdown from the top, cancelling any count in progress
    pub fn start(&mut self) {
        self.remaining = TICKS;
    }

    /// `cd.tick()` advances the countdown by one tick, expected to be called at the sample rate
    ///
    /// Returns `TimerState::Expired` on exactly one tick per `start()`.
    pub fn tick(&mut self) -> TimerState {
        match self.remaining {
            0 => TimerState::Idle,
            1 => {
                self.remaining = 0;
                TimerState::Expired
            }
            _ => {
                self.remaining -= 1;
                TimerState::Running
            }
        }
    }

    /// `cd.is_running()` is true iff the countdown has been started and has not expired yet
    pub fn is_running(&self) -> bool {
        self.remaining != 0
    }
}

impl<const TICKS: u32> Default for Countdown<TICKS> {
    fn default() -> Self {
        Self::new()
    }
}
