//! Unit tests for the poll loop: cancellation cadence, fault policy, and
//! transport failure propagation.

use tokio_util::sync::CancellationToken;

use super::{DecodeFaultPolicy, PollError, PollOutcome, Poller, PollerConfig};
use crate::{
    dispatch::{DecodeError, DecoderRegistry, Discriminant, Dispatcher, Sink},
    fragment::{FragmentAssembler, FragmentFlags, FragmentView, SessionId},
    idle::BusySpin,
    transport::{Subscription, TransportError},
};

const GOOD: Discriminant = Discriminant::new(b'G');
const BAD: Discriminant = Discriminant::new(b'B');

/// Subscription that delivers one unfragmented message every poll and
/// cancels the shared token on a chosen call.
struct FloodSubscription {
    token: CancellationToken,
    cancel_on_poll: u64,
    payload: Vec<u8>,
    polls: u64,
}

impl FloodSubscription {
    fn new(token: CancellationToken, cancel_on_poll: u64, payload: &[u8]) -> Self {
        Self {
            token,
            cancel_on_poll,
            payload: payload.to_vec(),
            polls: 0,
        }
    }
}

impl Subscription for FloodSubscription {
    fn poll(
        &mut self,
        on_fragment: &mut dyn FnMut(FragmentView<'_>),
        _fragment_limit: usize,
    ) -> Result<usize, TransportError> {
        self.polls += 1;
        if self.polls == self.cancel_on_poll {
            self.token.cancel();
        }
        on_fragment(FragmentView::new(
            SessionId::new(1),
            FragmentFlags::UNFRAGMENTED,
            &self.payload,
        ));
        Ok(1)
    }
}

/// Subscription that fails immediately.
struct BrokenSubscription;

impl Subscription for BrokenSubscription {
    fn poll(
        &mut self,
        _on_fragment: &mut dyn FnMut(FragmentView<'_>),
        _fragment_limit: usize,
    ) -> Result<usize, TransportError> {
        Err(TransportError::Closed)
    }
}

/// Sink counting emissions.
#[derive(Default)]
struct CountingSink {
    emitted: u64,
}

impl Sink<u8> for CountingSink {
    fn emit(&mut self, _message: &u8) { self.emitted += 1; }
}

fn test_dispatcher() -> Dispatcher<u8, CountingSink> {
    let registry = DecoderRegistry::new()
        .with_decoder(GOOD, |bytes| Ok(bytes[0]))
        .expect("fresh discriminant")
        .with_decoder(BAD, |bytes| {
            Err(DecodeError::Malformed {
                discriminant: BAD,
                detail: format!("{} poisoned bytes", bytes.len()),
            })
        })
        .expect("fresh discriminant");
    Dispatcher::new(registry, CountingSink::default())
}

fn config(cadence: u64, policy: DecodeFaultPolicy) -> PollerConfig {
    PollerConfig {
        cancel_check_interval: cadence.try_into().expect("non-zero cadence"),
        decode_fault_policy: policy,
        ..PollerConfig::default()
    }
}

#[test]
fn cancellation_is_observed_within_one_cadence_window_under_load() {
    let token = CancellationToken::new();
    let mut subscription = FloodSubscription::new(token.clone(), 3, b"G");
    let mut dispatcher = test_dispatcher();

    let outcome = Poller::new(config(10, DecodeFaultPolicy::Fatal)).run(
        &mut subscription,
        &mut FragmentAssembler::default(),
        &mut dispatcher,
        &mut BusySpin,
        &token,
    );

    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    // Cancelled on poll 3, observed at the first cadence boundary after it.
    assert_eq!(subscription.polls, 10);
    assert_eq!(dispatcher.into_sink().emitted, 10);
}

#[test]
fn pre_cancelled_token_stops_at_the_first_check() {
    let token = CancellationToken::new();
    token.cancel();
    let mut subscription = FloodSubscription::new(token.clone(), u64::MAX, b"G");

    let outcome = Poller::new(config(1, DecodeFaultPolicy::Fatal)).run(
        &mut subscription,
        &mut FragmentAssembler::default(),
        &mut test_dispatcher(),
        &mut BusySpin,
        &token,
    );

    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    assert_eq!(subscription.polls, 1);
}

#[test]
fn transport_failure_is_fatal_and_unretried() {
    let token = CancellationToken::new();

    let outcome = Poller::default().run(
        &mut BrokenSubscription,
        &mut FragmentAssembler::default(),
        &mut test_dispatcher(),
        &mut BusySpin,
        &token,
    );

    assert!(matches!(
        outcome,
        Err(PollError::Transport(TransportError::Closed))
    ));
}

#[test]
fn fatal_policy_stops_the_loop_on_a_malformed_message() {
    let token = CancellationToken::new();
    let mut subscription = FloodSubscription::new(token.clone(), u64::MAX, b"Bxx");

    let outcome = Poller::new(config(1, DecodeFaultPolicy::Fatal)).run(
        &mut subscription,
        &mut FragmentAssembler::default(),
        &mut test_dispatcher(),
        &mut BusySpin,
        &token,
    );

    assert!(matches!(
        outcome,
        Err(PollError::Decode(DecodeError::Malformed { .. }))
    ));
    assert_eq!(subscription.polls, 1);
}

#[test]
fn skip_policy_keeps_polling_past_malformed_messages() {
    let token = CancellationToken::new();
    let mut subscription = FloodSubscription::new(token.clone(), 5, b"Bxx");
    let mut dispatcher = test_dispatcher();

    let outcome = Poller::new(config(1, DecodeFaultPolicy::Skip)).run(
        &mut subscription,
        &mut FragmentAssembler::default(),
        &mut dispatcher,
        &mut BusySpin,
        &token,
    );

    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    assert_eq!(subscription.polls, 5);
    assert_eq!(dispatcher.into_sink().emitted, 0);
}

#[test]
fn unknown_discriminants_never_stop_the_loop() {
    let token = CancellationToken::new();
    let mut subscription = FloodSubscription::new(token.clone(), 4, b"\x00mystery");
    let mut dispatcher = test_dispatcher();

    let outcome = Poller::new(config(1, DecodeFaultPolicy::Fatal)).run(
        &mut subscription,
        &mut FragmentAssembler::default(),
        &mut dispatcher,
        &mut BusySpin,
        &token,
    );

    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    assert_eq!(dispatcher.into_sink().emitted, 0);
}
