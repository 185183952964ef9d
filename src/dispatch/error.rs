//! Error types raised by decoding and registry construction.

use thiserror::Error;

use super::Discriminant;

/// A recognised discriminant whose payload could not be decoded.
///
/// On a trusted low-latency feed this indicates upstream corruption; the
/// poll loop's [`DecodeFaultPolicy`](crate::poll::DecodeFaultPolicy)
/// decides whether it is fatal.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The message carried no bytes at all, so no decoder can be chosen.
    #[error("message is empty and carries no discriminant byte")]
    MissingDiscriminant,
    /// The payload length does not match the fixed wire layout.
    #[error("{discriminant} message is {actual} bytes, expected {expected}")]
    Length {
        discriminant: Discriminant,
        expected: usize,
        actual: usize,
    },
    /// The payload bytes violate the wire format in some other way.
    #[error("{discriminant} message is malformed: {detail}")]
    Malformed {
        discriminant: Discriminant,
        detail: String,
    },
}

/// Raised when two decoders are registered for the same discriminant.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("a decoder is already registered for {0}")]
pub struct DuplicateDecoder(pub Discriminant);
