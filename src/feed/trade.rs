//! Option trade message.

use bytes::{Buf, BufMut};
use serde::Serialize;

use super::{
    quote::{put_expiration, put_symbol},
    record::{Expiration, read_expiration, read_symbol},
};
use crate::dispatch::{DecodeError, Discriminant};

/// Discriminant byte identifying a trade.
pub const TRADE_DISCRIMINANT: Discriminant = Discriminant::new(b'T');

/// Executed option trade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trade {
    pub symbol: String,
    pub expiration: Expiration,
    pub timestamp: u64,
    pub strike_price: u32,
    pub premium_price: u32,
    pub volume: u32,
    pub exchange: u8,
    pub condition: u8,
}

impl Trade {
    /// Bytes on the wire: the discriminant plus the 30-byte packed body.
    pub const ENCODED_LEN: usize = 31;

    /// Decode a trade from a complete message, discriminant byte included.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Length`] when the payload is not exactly
    /// [`Self::ENCODED_LEN`] bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(DecodeError::Length {
                discriminant: TRADE_DISCRIMINANT,
                expected: Self::ENCODED_LEN,
                actual: bytes.len(),
            });
        }

        let mut body = &bytes[1..];
        let symbol = read_symbol(&mut body);
        let expiration = read_expiration(&mut body);
        let timestamp = body.get_u64_le();
        let strike_price = body.get_u32_le();
        let premium_price = body.get_u32_le();
        let volume = body.get_u32_le();
        let exchange = body.get_u8();
        let condition = body.get_u8();

        Ok(Self {
            symbol,
            expiration,
            timestamp,
            strike_price,
            premium_price,
            volume,
            exchange,
            condition,
        })
    }

    /// Encode the trade in its wire layout. Used by the demo publisher
    /// and the test-suite; the subscriber itself only decodes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::ENCODED_LEN);
        bytes.put_u8(TRADE_DISCRIMINANT.get());
        put_symbol(&mut bytes, &self.symbol);
        put_expiration(&mut bytes, self.expiration);
        bytes.put_u64_le(self.timestamp);
        bytes.put_u32_le(self.strike_price);
        bytes.put_u32_le(self.premium_price);
        bytes.put_u32_le(self.volume);
        bytes.put_u8(self.exchange);
        bytes.put_u8(self.condition);
        bytes
    }
}
