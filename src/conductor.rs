//! Connection lifecycle and subscription creation.

use tracing::{info, warn};

use crate::transport::{ConnectOptions, Transport, TransportError};

/// Owns a transport connection for its lifetime and hands out
/// subscriptions on it.
///
/// Construction is all-or-nothing: a connection either comes up within the
/// configured timeout or `connect` fails, never leaving a degraded handle
/// behind. Dropping the conductor releases the connection and every
/// subscription created from it.
#[derive(Debug)]
pub struct Conductor<T: Transport> {
    transport: T,
    channel: String,
    stream_id: i32,
    closed: bool,
}

impl<T: Transport> Conductor<T> {
    /// Connect to the transport driver described by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the driver cannot be reached within
    /// `options.timeout`. Connection failures are fatal; there is no
    /// partial state to recover.
    pub fn connect(options: &ConnectOptions) -> Result<Self, TransportError> {
        let transport = T::connect(options)?;
        info!(
            dir = %options.dir.display(),
            channel = %options.channel,
            stream_id = options.stream_id,
            "transport connected",
        );
        Ok(Self {
            transport,
            channel: options.channel.clone(),
            stream_id: options.stream_id,
            closed: false,
        })
    }

    /// Open a subscription on the connection's default channel and stream.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the subscription cannot be created.
    pub fn subscribe(&mut self) -> Result<T::Subscription, TransportError> {
        let channel = self.channel.clone();
        let stream_id = self.stream_id;
        self.subscribe_to(&channel, stream_id)
    }

    /// Open a subscription on an explicit channel and stream.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the subscription cannot be created.
    pub fn subscribe_to(
        &mut self,
        channel: &str,
        stream_id: i32,
    ) -> Result<T::Subscription, TransportError> {
        let subscription = self.transport.add_subscription(channel, stream_id)?;
        info!(channel, stream_id, "subscription connected");
        Ok(subscription)
    }

    /// Access the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T { &mut self.transport }

    /// Release the connection and all of its subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when teardown fails.
    pub fn close(mut self) -> Result<(), TransportError> {
        self.closed = true;
        self.transport.close()
    }
}

impl<T: Transport> Drop for Conductor<T> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(error) = self.transport.close() {
                warn!(%error, "transport close failed");
            }
        }
    }
}
