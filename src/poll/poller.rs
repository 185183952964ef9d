//! The polling loop driving a single subscription.

use log::{info, warn};
use tokio_util::sync::CancellationToken;

use super::{DecodeFaultPolicy, PollError, PollOutcome, PollerConfig};
use crate::{
    dispatch::{DecodeError, Dispatcher, Sink},
    fragment::FragmentAssembler,
    idle::IdleStrategy,
    metrics,
    transport::Subscription,
};

/// Drives repeated polling of one subscription until cancellation or a
/// fatal error.
///
/// Each subscription gets its own poller, assembler, and idle state; no
/// state is shared across loops, so independent subscriptions may run on
/// separate threads without coordination.
#[derive(Clone, Copy, Debug, Default)]
pub struct Poller {
    config: PollerConfig,
}

impl Poller {
    /// Create a poller with the given tuning.
    #[must_use]
    pub fn new(config: PollerConfig) -> Self { Self { config } }

    /// Poll `subscription` until the token is cancelled or a fatal error
    /// occurs.
    ///
    /// Every iteration drains at most `fragment_limit` fragments, routes
    /// each completed message through `dispatcher`, and reports the
    /// work-done flag to `idler`. Reassembly conflicts and unknown
    /// discriminants are reported and never stop the loop. The token is
    /// only ever read here; cancelling it is the caller's side of the
    /// contract, and an in-flight dispatch always completes before the
    /// loop acts on it.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::Transport`] when the subscription fails, and
    /// [`PollError::Decode`] when a recognised message is malformed and
    /// the policy is [`DecodeFaultPolicy::Fatal`].
    pub fn run<T, M, S>(
        &self,
        subscription: &mut T,
        assembler: &mut FragmentAssembler,
        dispatcher: &mut Dispatcher<M, S>,
        idler: &mut dyn IdleStrategy,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, PollError>
    where
        T: Subscription,
        S: Sink<M>,
    {
        let fragment_limit = self.config.fragment_limit.get();
        let cadence = self.config.cancel_check_interval.get();
        let policy = self.config.decode_fault_policy;
        let mut iterations: u64 = 0;

        loop {
            let mut fatal_decode: Option<DecodeError> = None;
            let fragments_read = subscription.poll(
                &mut |fragment| {
                    let outcome = assembler.on_fragment(fragment);
                    if let Some(conflict) = outcome.conflict {
                        warn!("reassembly conflict: {conflict}");
                        metrics::inc_reassembly_conflicts();
                    }
                    let Some(message) = outcome.message else {
                        return;
                    };
                    if fatal_decode.is_some() {
                        // The loop is about to terminate; stop consuming.
                        return;
                    }
                    if let Err(error) = dispatcher.dispatch(&message) {
                        match policy {
                            DecodeFaultPolicy::Skip => {
                                warn!("skipping malformed message: {error}");
                            }
                            DecodeFaultPolicy::Fatal => fatal_decode = Some(error),
                        }
                    }
                },
                fragment_limit,
            )?;

            if fragments_read > 0 {
                metrics::add_fragments(fragments_read as u64);
            }
            if let Some(error) = fatal_decode {
                return Err(PollError::Decode(error));
            }

            idler.idle(fragments_read > 0);

            iterations = iterations.wrapping_add(1);
            if iterations % cadence == 0 && cancel.is_cancelled() {
                info!("cancellation observed after {iterations} iterations, stopping poll loop");
                return Ok(PollOutcome::Cancelled);
            }
        }
    }
}
