//! End-to-end tests: loopback transport through reassembly, dispatch, and
//! cancellation.

use std::{
    num::{NonZeroU64, NonZeroUsize},
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use shmtap::{
    Conductor,
    DecodeFaultPolicy,
    Dispatcher,
    FragmentAssembler,
    FragmentFlags,
    PollError,
    PollOutcome,
    Poller,
    PollerConfig,
    Sink,
    TransportError,
    feed::{self, Expiration, Quote, Record, Trade},
    idle::BusySpin,
    transport::{ConnectOptions, Transport, loopback::LoopbackTransport},
};
use tokio_util::sync::CancellationToken;

/// Sink collecting decoded records for later assertions.
#[derive(Clone, Debug, Default)]
struct CollectingSink(Arc<Mutex<Vec<Record>>>);

impl CollectingSink {
    fn records(&self) -> Vec<Record> { self.0.lock().expect("sink lock").clone() }
}

impl Sink<Record> for CollectingSink {
    fn emit(&mut self, message: &Record) {
        self.0.lock().expect("sink lock").push(message.clone());
    }
}

fn sample_quote() -> Quote {
    Quote {
        symbol: "SPY".to_owned(),
        expiration: Expiration {
            code: 'T',
            year: 23,
            day: 18,
        },
        timestamp: 7,
        strike_price: 445_000,
        bid_price: 1_250,
        ask_price: 1_310,
        bid_size: 40,
        ask_size: 25,
        bid_exchange: 3,
        ask_exchange: 7,
        condition: b'R',
    }
}

fn sample_trade() -> Trade {
    Trade {
        symbol: "QQQ".to_owned(),
        expiration: Expiration {
            code: 'H',
            year: 23,
            day: 15,
        },
        timestamp: 8,
        strike_price: 370_000,
        premium_price: 980,
        volume: 12,
        exchange: 5,
        condition: b'S',
    }
}

fn connected_conductor() -> Conductor<LoopbackTransport> {
    Conductor::connect(&ConnectOptions::default()).expect("loopback connect never times out")
}

fn drain_config(policy: DecodeFaultPolicy) -> PollerConfig {
    PollerConfig {
        fragment_limit: NonZeroUsize::new(64).expect("non-zero"),
        cancel_check_interval: NonZeroU64::new(1).expect("non-zero"),
        decode_fault_policy: policy,
    }
}

/// Run the poller over whatever is already staged, stopping at the first
/// cancellation check.
fn drain(
    conductor: &mut Conductor<LoopbackTransport>,
    policy: DecodeFaultPolicy,
    sink: CollectingSink,
) -> Result<PollOutcome, PollError> {
    let mut subscription = conductor.subscribe().expect("subscription");
    let cancel = CancellationToken::new();
    cancel.cancel();

    Poller::new(drain_config(policy)).run(
        &mut subscription,
        &mut FragmentAssembler::default(),
        &mut Dispatcher::new(feed::registry().expect("feed registry"), sink),
        &mut BusySpin,
        &cancel,
    )
}

#[test]
fn fragmented_messages_reassemble_and_dispatch() {
    let mut conductor = connected_conductor();
    let options = ConnectOptions::default();
    let publisher = conductor
        .transport_mut()
        .publisher(&options.channel, options.stream_id);

    // An unfragmented quote and a trade split into 8-byte fragments.
    publisher.publish(
        &sample_quote().encode(),
        NonZeroUsize::new(64).expect("non-zero"),
    );
    publisher.publish(
        &sample_trade().encode(),
        NonZeroUsize::new(8).expect("non-zero"),
    );

    let sink = CollectingSink::default();
    let outcome = drain(&mut conductor, DecodeFaultPolicy::Fatal, sink.clone());

    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    assert_eq!(
        sink.records(),
        vec![
            Record::Quote(sample_quote()),
            Record::Trade(sample_trade()),
        ]
    );
}

#[test]
fn explicit_begin_middle_end_sequence_concatenates() {
    let mut conductor = connected_conductor();
    let options = ConnectOptions::default();
    let publisher = conductor
        .transport_mut()
        .publisher(&options.channel, options.stream_id);

    let encoded = sample_quote().encode();
    publisher.publish_fragment(FragmentFlags::BEGIN, &encoded[..10]);
    publisher.publish_fragment(FragmentFlags::MIDDLE, &encoded[10..20]);
    publisher.publish_fragment(FragmentFlags::END, &encoded[20..]);

    let sink = CollectingSink::default();
    let outcome = drain(&mut conductor, DecodeFaultPolicy::Fatal, sink.clone());

    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    assert_eq!(sink.records(), vec![Record::Quote(sample_quote())]);
}

#[test]
fn unknown_discriminant_is_reported_and_skipped() {
    let mut conductor = connected_conductor();
    let options = ConnectOptions::default();
    let publisher = conductor
        .transport_mut()
        .publisher(&options.channel, options.stream_id);

    publisher.publish_fragment(FragmentFlags::UNFRAGMENTED, b"\x00no decoder here");
    publisher.publish(
        &sample_quote().encode(),
        NonZeroUsize::new(64).expect("non-zero"),
    );

    let sink = CollectingSink::default();
    let outcome = drain(&mut conductor, DecodeFaultPolicy::Fatal, sink.clone());

    // The unregistered 0x00 message invokes no decoder and the loop
    // continues to the quote behind it.
    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    assert_eq!(sink.records(), vec![Record::Quote(sample_quote())]);
}

#[test]
fn malformed_message_stops_the_loop_under_fatal_policy() {
    let mut conductor = connected_conductor();
    let options = ConnectOptions::default();
    let publisher = conductor
        .transport_mut()
        .publisher(&options.channel, options.stream_id);

    let mut truncated = sample_quote().encode();
    truncated.truncate(12);
    publisher.publish_fragment(FragmentFlags::UNFRAGMENTED, &truncated);

    let sink = CollectingSink::default();
    let outcome = drain(&mut conductor, DecodeFaultPolicy::Fatal, sink.clone());

    assert!(matches!(outcome, Err(PollError::Decode(_))));
    assert!(sink.records().is_empty());
}

#[test]
fn malformed_message_is_skipped_under_skip_policy() {
    let mut conductor = connected_conductor();
    let options = ConnectOptions::default();
    let publisher = conductor
        .transport_mut()
        .publisher(&options.channel, options.stream_id);

    let mut truncated = sample_quote().encode();
    truncated.truncate(12);
    publisher.publish_fragment(FragmentFlags::UNFRAGMENTED, &truncated);
    publisher.publish(
        &sample_trade().encode(),
        NonZeroUsize::new(64).expect("non-zero"),
    );

    let sink = CollectingSink::default();
    let outcome = drain(&mut conductor, DecodeFaultPolicy::Skip, sink.clone());

    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    assert_eq!(sink.records(), vec![Record::Trade(sample_trade())]);
}

#[test]
fn closed_transport_fails_the_poll_loop() {
    let mut conductor = connected_conductor();
    let mut subscription = conductor.subscribe().expect("subscription");
    conductor
        .transport_mut()
        .close()
        .expect("loopback close never fails");

    let cancel = CancellationToken::new();
    let outcome = Poller::new(drain_config(DecodeFaultPolicy::Fatal)).run(
        &mut subscription,
        &mut FragmentAssembler::default(),
        &mut Dispatcher::new(feed::registry().expect("feed registry"), CollectingSink::default()),
        &mut BusySpin,
        &cancel,
    );

    assert!(matches!(
        outcome,
        Err(PollError::Transport(TransportError::Closed))
    ));
}

#[test]
fn cancellation_is_observed_under_continuous_delivery() {
    let mut conductor = connected_conductor();
    let options = ConnectOptions::default();
    let publisher = conductor
        .transport_mut()
        .publisher(&options.channel, options.stream_id);
    let mut subscription = conductor.subscribe().expect("subscription");

    let cancel = CancellationToken::new();
    let flood_cancel = cancel.clone();
    let flood = thread::spawn(move || {
        let fragment_len = NonZeroUsize::new(8).expect("non-zero");
        for _ in 0..200 {
            publisher.publish(&sample_quote().encode(), fragment_len);
            thread::sleep(Duration::from_micros(100));
        }
        flood_cancel.cancel();
        // Keep the feed busy so the loop never goes idle before the
        // cadence check fires.
        for _ in 0..200 {
            publisher.publish(&sample_quote().encode(), fragment_len);
            thread::sleep(Duration::from_micros(100));
        }
    });

    let config = PollerConfig {
        cancel_check_interval: NonZeroU64::new(1_000).expect("non-zero"),
        ..PollerConfig::default()
    };
    let sink = CollectingSink::default();
    let outcome = Poller::new(config).run(
        &mut subscription,
        &mut FragmentAssembler::default(),
        &mut Dispatcher::new(feed::registry().expect("feed registry"), sink.clone()),
        &mut BusySpin,
        &cancel,
    );

    flood.join().expect("publisher thread");
    assert!(matches!(outcome, Ok(PollOutcome::Cancelled)));
    assert!(
        sink.records()
            .iter()
            .all(|record| matches!(record, Record::Quote(_)))
    );
}
