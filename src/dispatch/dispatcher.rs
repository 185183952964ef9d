//! Decode-and-emit routing for complete messages.

use log::warn;

use super::{DecodeError, DecoderRegistry, Discriminant, Sink};
use crate::{fragment::CompleteMessage, metrics};

/// Routes each complete message to the decoder its discriminant selects
/// and hands the decoded value to the sink.
#[derive(Debug)]
pub struct Dispatcher<M, S> {
    registry: DecoderRegistry<M>,
    sink: S,
}

impl<M, S: Sink<M>> Dispatcher<M, S> {
    /// Pair a registry with an emission sink.
    #[must_use]
    pub fn new(registry: DecoderRegistry<M>, sink: S) -> Self { Self { registry, sink } }

    /// Decode `message` and emit the result.
    ///
    /// An unknown discriminant is reported and skipped; it never fails
    /// the dispatch. The decoder receives the full payload, discriminant
    /// byte included.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the message is empty or when the
    /// selected decoder rejects the payload. The caller decides whether
    /// that is fatal.
    pub fn dispatch(&mut self, message: &CompleteMessage<'_>) -> Result<(), DecodeError> {
        let Some(first) = message.discriminant() else {
            metrics::inc_decode_failures();
            return Err(DecodeError::MissingDiscriminant);
        };
        let discriminant = Discriminant::new(first);

        let Some(decode) = self.registry.get(discriminant) else {
            warn!(
                "skipping {len}-byte message with unknown discriminant {discriminant}",
                len = message.payload().len(),
            );
            metrics::inc_unknown_discriminants();
            return Ok(());
        };

        match decode(message.payload()) {
            Ok(decoded) => {
                self.sink.emit(&decoded);
                metrics::inc_messages();
                Ok(())
            }
            Err(error) => {
                metrics::inc_decode_failures();
                Err(error)
            }
        }
    }

    /// Access the sink, for callers that need to flush or inspect it.
    pub fn sink_mut(&mut self) -> &mut S { &mut self.sink }

    /// Consume the dispatcher, returning its sink.
    #[must_use]
    pub fn into_sink(self) -> S { self.sink }
}
