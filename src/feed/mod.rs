//! Bundled option-feed decoders and the JSON emission sink.
//!
//! The upstream feed carries packed little-endian structs prefixed by a
//! one-byte discriminant: `Q` for quotes and `T` for trades. Decoders
//! receive the complete message, discriminant included, and the sink
//! writes one JSON document per decoded record.

pub mod json;
pub mod quote;
pub mod record;
pub mod trade;

pub use json::JsonLineSink;
pub use quote::{QUOTE_DISCRIMINANT, Quote};
pub use record::{Expiration, Record};
pub use trade::{TRADE_DISCRIMINANT, Trade};

use crate::dispatch::{DecoderRegistry, DuplicateDecoder};

/// Decoder registry covering every message type this feed carries.
///
/// # Errors
///
/// Returns [`DuplicateDecoder`] if the feed's discriminants collide,
/// which would mean the wire constants themselves are wrong.
pub fn registry() -> Result<DecoderRegistry<Record>, DuplicateDecoder> {
    DecoderRegistry::new()
        .with_decoder(QUOTE_DISCRIMINANT, |bytes| {
            Quote::decode(bytes).map(Record::Quote)
        })?
        .with_decoder(TRADE_DISCRIMINANT, |bytes| {
            Trade::decode(bytes).map(Record::Trade)
        })
}
