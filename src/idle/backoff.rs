//! Escalating backoff: spin first, then yield, then sleep with a doubling
//! period up to a ceiling.

use std::{hint, thread, time::Duration};

use super::IdleStrategy;

/// Tuning knobs for [`Backoff`].
#[derive(Clone, Copy, Debug)]
pub struct BackoffConfig {
    /// Consecutive empty polls spent busy-spinning before yielding.
    pub max_spins: u32,
    /// Consecutive empty polls spent yielding before sleeping.
    pub max_yields: u32,
    /// First sleep period once spinning and yielding are exhausted.
    pub min_sleep: Duration,
    /// Ceiling for the doubling sleep period.
    pub max_sleep: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_spins: 100,
            max_yields: 10,
            min_sleep: Duration::from_micros(50),
            max_sleep: Duration::from_millis(1),
        }
    }
}

/// Position on the wait-cost ladder.
///
/// Variant order mirrors escalation, and the derived ordering compares a
/// later rung as greater than any earlier one, so consecutive idle states
/// form a non-decreasing sequence until work resets them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BackoffState {
    /// A recent iteration performed work; the next empty poll spins.
    Active,
    /// Busy-spinning; the counter records consecutive spins.
    Spinning(u32),
    /// Yielding the processor; the counter records consecutive yields.
    Yielding(u32),
    /// Sleeping; the period applies to the next empty poll.
    Sleeping(Duration),
}

/// Idle strategy that escalates from spinning through yielding to bounded
/// sleeps, and drops back to [`BackoffState::Active`] the moment any
/// iteration performs work.
#[derive(Clone, Copy, Debug)]
pub struct Backoff {
    config: BackoffConfig,
    state: BackoffState,
}

impl Backoff {
    /// Create a strategy with the given tuning.
    #[must_use]
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            state: BackoffState::Active,
        }
    }

    /// Current rung on the wait-cost ladder.
    #[doc(hidden)]
    #[must_use]
    pub fn state(&self) -> BackoffState { self.state }

    fn next_period(&self, period: Duration) -> Duration {
        period.saturating_mul(2).min(self.config.max_sleep)
    }
}

impl Default for Backoff {
    fn default() -> Self { Self::new(BackoffConfig::default()) }
}

impl IdleStrategy for Backoff {
    fn idle(&mut self, work_done: bool) {
        if work_done {
            self.state = BackoffState::Active;
            return;
        }

        self.state = match self.state {
            BackoffState::Active => {
                hint::spin_loop();
                BackoffState::Spinning(1)
            }
            BackoffState::Spinning(spins) if spins < self.config.max_spins => {
                hint::spin_loop();
                BackoffState::Spinning(spins + 1)
            }
            BackoffState::Spinning(_) => {
                thread::yield_now();
                BackoffState::Yielding(1)
            }
            BackoffState::Yielding(yields) if yields < self.config.max_yields => {
                thread::yield_now();
                BackoffState::Yielding(yields + 1)
            }
            BackoffState::Yielding(_) => {
                thread::sleep(self.config.min_sleep);
                BackoffState::Sleeping(self.next_period(self.config.min_sleep))
            }
            BackoffState::Sleeping(period) => {
                thread::sleep(period);
                BackoffState::Sleeping(self.next_period(period))
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Backoff, BackoffConfig, BackoffState};
    use crate::idle::IdleStrategy;

    fn fast_config() -> BackoffConfig {
        BackoffConfig {
            max_spins: 2,
            max_yields: 2,
            min_sleep: Duration::from_nanos(1),
            max_sleep: Duration::from_nanos(8),
        }
    }

    #[test]
    fn wait_cost_never_decreases_while_idle() {
        let mut idler = Backoff::new(fast_config());

        let mut states = Vec::new();
        for _ in 0..12 {
            idler.idle(false);
            states.push(idler.state());
        }

        for pair in states.windows(2) {
            assert!(pair[0] <= pair[1], "cost regressed: {pair:?}");
        }
    }

    #[test]
    fn sleep_period_doubles_to_the_ceiling() {
        let mut idler = Backoff::new(fast_config());

        // Two spins, two yields, then the sleep ladder: 1ns, 2ns, 4ns, 8ns.
        for _ in 0..12 {
            idler.idle(false);
        }

        assert_eq!(
            idler.state(),
            BackoffState::Sleeping(Duration::from_nanos(8))
        );
    }

    #[test]
    fn work_resets_to_active_immediately() {
        let mut idler = Backoff::new(fast_config());

        for _ in 0..8 {
            idler.idle(false);
        }
        assert!(matches!(idler.state(), BackoffState::Sleeping(_)));

        idler.idle(true);
        assert_eq!(idler.state(), BackoffState::Active);

        // The ladder restarts from the bottom.
        idler.idle(false);
        assert_eq!(idler.state(), BackoffState::Spinning(1));
    }
}
