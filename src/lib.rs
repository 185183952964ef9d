//! Public API for the `shmtap` library.
//!
//! This crate provides the subscriber side of a shared-memory message
//! transport: a tight, allocation-averse poll loop that drains raw
//! fragments from a connected subscription, reassembles them into complete
//! messages, and routes each message to the decoder selected by its
//! leading discriminant byte. Cancellation is cooperative and checked on a
//! fixed iteration cadence, so shutdown stays prompt without paying for a
//! shared-flag read on every iteration.

pub mod conductor;
pub mod dispatch;
pub mod feed;
pub mod fragment;
pub mod idle;
pub mod metrics;
pub mod poll;
pub mod transport;

pub use conductor::Conductor;
pub use dispatch::{DecodeError, DecoderRegistry, Discriminant, Dispatcher, Sink};
pub use fragment::{
    CompleteMessage,
    FragmentAssembler,
    FragmentFlags,
    FragmentOutcome,
    FragmentView,
    ReassemblyConflict,
    SessionId,
};
pub use idle::{Backoff, BackoffConfig, BusySpin, IdleStrategy};
pub use poll::{DecodeFaultPolicy, PollError, PollOutcome, Poller, PollerConfig};
pub use transport::{ConnectOptions, Subscription, Transport, TransportError};
