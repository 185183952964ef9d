//! The decoded message types emitted by the feed.

use bytes::Buf;
use serde::Serialize;

use super::{Quote, Trade};

/// Option series expiration triple as carried on the wire.
///
/// The series code letter encodes the expiration month and the call/put
/// side per the upstream convention; it is passed through undecoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Expiration {
    pub code: char,
    pub year: u8,
    pub day: u8,
}

/// One decoded feed message.
///
/// Serializes untagged: one flat JSON object per record. Quote and trade
/// lines stay distinguishable by their field names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Quote(Quote),
    Trade(Trade),
}

/// Read the space-padded five-byte symbol field.
pub(super) fn read_symbol(body: &mut &[u8]) -> String {
    let mut raw = [0_u8; 5];
    body.copy_to_slice(&mut raw);
    String::from_utf8_lossy(&raw)
        .trim_end_matches([' ', '\0'])
        .to_owned()
}

/// Read the three-byte expiration field.
pub(super) fn read_expiration(body: &mut &[u8]) -> Expiration {
    let mut raw = [0_u8; 3];
    body.copy_to_slice(&mut raw);
    Expiration {
        code: char::from(raw[0]),
        year: raw[1],
        day: raw[2],
    }
}
