//! Termination outcomes of the poll loop.

use thiserror::Error;

use crate::{dispatch::DecodeError, transport::TransportError};

/// Reason the poll loop stopped without failing.
///
/// Kept distinct from [`PollError`] so callers can tell graceful shutdown
/// from breakage without matching on error variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The cancellation token was observed at a cadence check.
    Cancelled,
}

/// Fatal failures that terminate the poll loop.
///
/// The loop never retries internally; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum PollError {
    /// The underlying connection failed or was closed from under the loop.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    /// A recognised message failed to decode while the
    /// [`DecodeFaultPolicy`](crate::poll::DecodeFaultPolicy) was `Fatal`.
    #[error("malformed payload: {0}")]
    Decode(#[from] DecodeError),
}
