//! Constant-time decoder lookup table.

use std::fmt;

use super::{DecodeError, Discriminant, DuplicateDecoder};

/// Decode function stored in the registry.
///
/// Receives the complete message payload, discriminant byte included.
pub type DecodeFn<M> = Box<dyn Fn(&[u8]) -> Result<M, DecodeError> + Send + Sync>;

/// Immutable table mapping each possible discriminant byte to a decoder.
///
/// The table is direct-indexed by the discriminant, so lookups cost one
/// array access regardless of how many decoders are registered.
/// Registration happens builder-style before the registry is handed to a
/// dispatcher; there is no mutation afterwards.
pub struct DecoderRegistry<M> {
    entries: [Option<DecodeFn<M>>; 256],
}

impl<M> DecoderRegistry<M> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: std::array::from_fn(|_| None),
        }
    }

    /// Register `decode` for `discriminant`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateDecoder`] when the discriminant already has a
    /// decoder; silently shadowing an earlier registration would hide a
    /// wiring mistake.
    pub fn with_decoder(
        mut self,
        discriminant: Discriminant,
        decode: impl Fn(&[u8]) -> Result<M, DecodeError> + Send + Sync + 'static,
    ) -> Result<Self, DuplicateDecoder> {
        let slot = &mut self.entries[discriminant.index()];
        if slot.is_some() {
            return Err(DuplicateDecoder(discriminant));
        }
        *slot = Some(Box::new(decode));
        Ok(self)
    }

    /// Look up the decoder for `discriminant`.
    #[must_use]
    pub fn get(&self, discriminant: Discriminant) -> Option<&DecodeFn<M>> {
        self.entries[discriminant.index()].as_ref()
    }

    /// Report whether a decoder is registered for `discriminant`.
    #[must_use]
    pub fn is_registered(&self, discriminant: Discriminant) -> bool {
        self.entries[discriminant.index()].is_some()
    }

    fn registered(&self) -> Vec<Discriminant> {
        (0..=u8::MAX)
            .filter(|&byte| self.entries[usize::from(byte)].is_some())
            .map(Discriminant::new)
            .collect()
    }
}

impl<M> Default for DecoderRegistry<M> {
    fn default() -> Self { Self::new() }
}

impl<M> fmt::Debug for DecoderRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("registered", &self.registered())
            .finish()
    }
}
