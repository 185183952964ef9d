//! Settings governing the poll loop.

use std::num::{NonZeroU64, NonZeroUsize};

/// What to do when a registered decoder rejects a payload.
///
/// Malformed data on a trusted feed usually means a serious upstream
/// problem, so the default stops the loop. That is a strong operational
/// choice (one bad message may take down an otherwise healthy stream),
/// which is why it is a configuration rather than a constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeFaultPolicy {
    /// Stop the loop with a [`PollError::Decode`](crate::poll::PollError).
    #[default]
    Fatal,
    /// Report the failure and keep polling.
    Skip,
}

/// Tuning for [`Poller`](crate::poll::Poller).
#[derive(Clone, Copy, Debug)]
pub struct PollerConfig {
    /// Cap on fragments handled by a single poll call. Bounds the latency
    /// of one iteration and keeps a flooded subscription from starving
    /// cancellation checks.
    pub fragment_limit: NonZeroUsize,
    /// Iterations between reads of the cancellation token. The check runs
    /// on this cadence whether or not work was done, so the worst-case
    /// cancellation latency is this many iterations. Checking a shared
    /// flag every iteration would cost more than it is worth at polling
    /// rates of millions of iterations per second.
    pub cancel_check_interval: NonZeroU64,
    /// Response to a malformed payload on a recognised discriminant.
    pub decode_fault_policy: DecodeFaultPolicy,
}

impl PollerConfig {
    /// Default cap on fragments per poll call.
    pub const DEFAULT_FRAGMENT_LIMIT: NonZeroUsize = NonZeroUsize::new(10).unwrap();
    /// Default cancellation check cadence.
    pub const DEFAULT_CANCEL_CHECK_INTERVAL: NonZeroU64 = NonZeroU64::new(10_000).unwrap();
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            fragment_limit: Self::DEFAULT_FRAGMENT_LIMIT,
            cancel_check_interval: Self::DEFAULT_CANCEL_CHECK_INTERVAL,
            decode_fault_policy: DecodeFaultPolicy::default(),
        }
    }
}
