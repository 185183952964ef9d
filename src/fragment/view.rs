use super::{FragmentFlags, SessionId};

/// Borrowed view over one fragment as delivered by the transport.
///
/// The transport owns the underlying buffer and reuses it after the poll
/// callback returns, so a view is only valid for the duration of that
/// callback. Anything that must outlive the callback copies the payload
/// (the [`FragmentAssembler`](crate::fragment::FragmentAssembler) does
/// this when it buffers a partial message).
#[derive(Clone, Copy, Debug)]
pub struct FragmentView<'a> {
    session_id: SessionId,
    flags: FragmentFlags,
    payload: &'a [u8],
}

impl<'a> FragmentView<'a> {
    /// Wrap a transport delivery in a view.
    #[must_use]
    pub const fn new(session_id: SessionId, flags: FragmentFlags, payload: &'a [u8]) -> Self {
        Self {
            session_id,
            flags,
            payload,
        }
    }

    /// Session the fragment belongs to.
    #[must_use]
    pub const fn session_id(&self) -> SessionId { self.session_id }

    /// Position markers for this fragment.
    #[must_use]
    pub const fn flags(&self) -> FragmentFlags { self.flags }

    /// Payload bytes, valid only for the duration of the poll callback.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] { self.payload }
}
