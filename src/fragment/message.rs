use std::borrow::Cow;

use super::SessionId;

/// A fully reassembled message ready for dispatch.
///
/// Messages assembled from multiple fragments own their buffer; a message
/// that arrived as a single unfragmented delivery borrows the transport's
/// bytes instead, since no retention past the poll callback is needed.
/// Either way the payload's first byte is the type discriminant consulted
/// by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompleteMessage<'a> {
    session_id: SessionId,
    payload: Cow<'a, [u8]>,
}

impl<'a> CompleteMessage<'a> {
    pub(crate) fn borrowed(session_id: SessionId, payload: &'a [u8]) -> Self {
        Self {
            session_id,
            payload: Cow::Borrowed(payload),
        }
    }

    pub(crate) fn assembled(session_id: SessionId, payload: Vec<u8>) -> Self {
        Self {
            session_id,
            payload: Cow::Owned(payload),
        }
    }

    /// Session the message was assembled on.
    #[must_use]
    pub const fn session_id(&self) -> SessionId { self.session_id }

    /// The complete payload, discriminant byte included.
    #[must_use]
    pub fn payload(&self) -> &[u8] { self.payload.as_ref() }

    /// Leading type discriminant, absent for an empty payload.
    #[must_use]
    pub fn discriminant(&self) -> Option<u8> { self.payload.first().copied() }

    /// Consume the message, returning the owned payload bytes.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> { self.payload.into_owned() }
}
