//! Failures surfaced by the transport boundary.

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Errors raised while connecting to or polling the transport.
///
/// Every variant is fatal to the connection or subscription it concerns;
/// retry policy belongs to the caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The driver did not answer within the connect timeout.
    #[error("could not connect to driver in {} within {:?}", .dir.display(), .timeout)]
    ConnectTimeout { dir: PathBuf, timeout: Duration },
    /// The connection or subscription was closed from under the caller.
    #[error("transport is closed")]
    Closed,
    /// The driver reported an internal failure.
    #[error("driver error: {0}")]
    Driver(String),
}
