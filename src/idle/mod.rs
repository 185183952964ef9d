//! Wait policies for poll iterations that found no work.
//!
//! The poll loop calls its idle strategy once per iteration, at potentially
//! millions of iterations per second, so implementations must be O(1) and
//! allocation-free.

pub mod backoff;

pub use backoff::{Backoff, BackoffConfig, BackoffState};

/// Decides how the poll loop waits when an iteration performs no work.
pub trait IdleStrategy {
    /// Record the outcome of one loop iteration and wait accordingly.
    ///
    /// `work_done` resets any accumulated backoff; an idle iteration may
    /// spin, yield, or sleep depending on the strategy.
    fn idle(&mut self, work_done: bool);
}

/// Strategy that never waits, trading a saturated core for the lowest
/// possible latency.
#[derive(Clone, Copy, Debug, Default)]
pub struct BusySpin;

impl IdleStrategy for BusySpin {
    fn idle(&mut self, work_done: bool) {
        if !work_done {
            std::hint::spin_loop();
        }
    }
}
