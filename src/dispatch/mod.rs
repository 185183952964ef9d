//! Discriminant-based routing of complete messages to decoders.
//!
//! The first byte of every complete message selects its decoder, a fixed
//! convention of the upstream wire format. The registry itself is generic:
//! it neither knows nor cares which discriminants exist, it only offers a
//! constant-time table from discriminant to decode function. Decoded
//! values flow to an injected [`Sink`].

pub mod discriminant;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod sink;

pub use discriminant::Discriminant;
pub use dispatcher::Dispatcher;
pub use error::{DecodeError, DuplicateDecoder};
pub use registry::{DecodeFn, DecoderRegistry};
pub use sink::Sink;
