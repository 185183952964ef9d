//! Option quote message.

use bytes::{Buf, BufMut};
use serde::Serialize;

use super::record::{Expiration, read_expiration, read_symbol};
use crate::dispatch::{DecodeError, Discriminant};

/// Discriminant byte identifying a quote.
pub const QUOTE_DISCRIMINANT: Discriminant = Discriminant::new(b'Q');

/// Two-sided option quote.
///
/// Prices and sizes are carried as the raw fixed-point integers the feed
/// uses; interpretation of the implied denominator is downstream's
/// business.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub expiration: Expiration,
    pub timestamp: u64,
    pub strike_price: u32,
    pub bid_price: u32,
    pub ask_price: u32,
    pub bid_size: u32,
    pub ask_size: u32,
    pub bid_exchange: u8,
    pub ask_exchange: u8,
    pub condition: u8,
}

impl Quote {
    /// Bytes on the wire: the discriminant plus the 39-byte packed body.
    pub const ENCODED_LEN: usize = 40;

    /// Decode a quote from a complete message, discriminant byte included.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Length`] when the payload is not exactly
    /// [`Self::ENCODED_LEN`] bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(DecodeError::Length {
                discriminant: QUOTE_DISCRIMINANT,
                expected: Self::ENCODED_LEN,
                actual: bytes.len(),
            });
        }

        let mut body = &bytes[1..];
        let symbol = read_symbol(&mut body);
        let expiration = read_expiration(&mut body);
        let timestamp = body.get_u64_le();
        let strike_price = body.get_u32_le();
        let bid_price = body.get_u32_le();
        let ask_price = body.get_u32_le();
        let bid_size = body.get_u32_le();
        let ask_size = body.get_u32_le();
        let bid_exchange = body.get_u8();
        let ask_exchange = body.get_u8();
        let condition = body.get_u8();

        Ok(Self {
            symbol,
            expiration,
            timestamp,
            strike_price,
            bid_price,
            ask_price,
            bid_size,
            ask_size,
            bid_exchange,
            ask_exchange,
            condition,
        })
    }

    /// Encode the quote in its wire layout. Used by the demo publisher
    /// and the test-suite; the subscriber itself only decodes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::ENCODED_LEN);
        bytes.put_u8(QUOTE_DISCRIMINANT.get());
        put_symbol(&mut bytes, &self.symbol);
        put_expiration(&mut bytes, self.expiration);
        bytes.put_u64_le(self.timestamp);
        bytes.put_u32_le(self.strike_price);
        bytes.put_u32_le(self.bid_price);
        bytes.put_u32_le(self.ask_price);
        bytes.put_u32_le(self.bid_size);
        bytes.put_u32_le(self.ask_size);
        bytes.put_u8(self.bid_exchange);
        bytes.put_u8(self.ask_exchange);
        bytes.put_u8(self.condition);
        bytes
    }
}

pub(super) fn put_symbol(bytes: &mut Vec<u8>, symbol: &str) {
    let mut raw = [b' '; 5];
    let len = symbol.len().min(5);
    raw[..len].copy_from_slice(&symbol.as_bytes()[..len]);
    bytes.put_slice(&raw);
}

pub(super) fn put_expiration(bytes: &mut Vec<u8>, expiration: Expiration) {
    bytes.put_u8(u8::try_from(u32::from(expiration.code)).unwrap_or(b'?'));
    bytes.put_u8(expiration.year);
    bytes.put_u8(expiration.day);
}
