//! Boundary to the shared-memory transport.
//!
//! The crate does not implement the physical transport. It consumes a
//! connected handle that exposes a single narrow primitive: a non-blocking
//! poll that hands raw fragments to a callback. [`loopback`] provides the
//! in-process implementation used by the test-suite and the demo binary;
//! production deployments supply their own [`Transport`].

pub mod error;
pub mod loopback;
pub mod options;

pub use error::TransportError;
pub use options::ConnectOptions;

use crate::fragment::FragmentView;

/// A connected transport able to open subscriptions.
pub trait Transport {
    /// Subscription handle type produced by this transport.
    type Subscription: Subscription;

    /// Establish a connection to the transport driver.
    ///
    /// Connection is synchronous: it either yields a usable handle within
    /// the configured timeout or fails outright, never a partial state.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the driver cannot be reached within
    /// `options.timeout`.
    fn connect(options: &ConnectOptions) -> Result<Self, TransportError>
    where
        Self: Sized;

    /// Open a subscription on `channel` and `stream_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the connection is closed or the
    /// driver rejects the subscription.
    fn add_subscription(
        &mut self,
        channel: &str,
        stream_id: i32,
    ) -> Result<Self::Subscription, TransportError>;

    /// Release the connection and every subscription created from it.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when teardown fails.
    fn close(&mut self) -> Result<(), TransportError>;
}

/// One connected subscription's poll primitive.
pub trait Subscription {
    /// Drain up to `fragment_limit` fragments, invoking `on_fragment`
    /// synchronously for each before returning the number delivered.
    ///
    /// The call never blocks: zero fragments means no data was available.
    /// Buffers handed to the callback are owned by the transport and are
    /// only valid until the callback returns.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the underlying connection fails;
    /// such failures are fatal to the subscription.
    fn poll(
        &mut self,
        on_fragment: &mut dyn FnMut(FragmentView<'_>),
        fragment_limit: usize,
    ) -> Result<usize, TransportError>;
}
