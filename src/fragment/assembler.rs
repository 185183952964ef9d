//! Session-keyed reassembly of transport fragments into complete messages.
//!
//! [`FragmentAssembler`] tracks at most one partial message per session.
//! Fragments for one message must arrive contiguously and in order; the
//! assembler does not reorder, it only detects violations and reports them
//! as recoverable [`ReassemblyConflict`]s. An unfragmented delivery passes
//! straight through without copying.

use std::{collections::HashMap, num::NonZeroUsize};

use super::{CompleteMessage, FragmentView, ReassemblyConflict, SessionId};

/// Growable buffer accumulating one in-progress message.
#[derive(Debug)]
struct PendingMessage {
    buffer: Vec<u8>,
}

impl PendingMessage {
    fn new(payload: &[u8]) -> Self {
        Self {
            buffer: payload.to_vec(),
        }
    }

    fn push(&mut self, payload: &[u8]) { self.buffer.extend_from_slice(payload); }

    fn len(&self) -> usize { self.buffer.len() }

    fn into_buffer(self) -> Vec<u8> { self.buffer }
}

/// Result of feeding one fragment into the assembler.
///
/// A single fragment can surface both a conflict and a message: an
/// unfragmented delivery that interrupts an in-progress message discards
/// the stale partial and still completes on its own.
#[derive(Debug)]
#[must_use]
pub struct FragmentOutcome<'a> {
    /// Message completed by this fragment, if any.
    pub message: Option<CompleteMessage<'a>>,
    /// Recoverable protocol violation detected on this fragment, if any.
    pub conflict: Option<ReassemblyConflict>,
}

impl<'a> FragmentOutcome<'a> {
    fn clean() -> Self {
        Self {
            message: None,
            conflict: None,
        }
    }

    fn completed(message: CompleteMessage<'a>) -> Self {
        Self {
            message: Some(message),
            conflict: None,
        }
    }

    fn conflicted(conflict: ReassemblyConflict) -> Self {
        Self {
            message: None,
            conflict: Some(conflict),
        }
    }
}

/// Stateful reassembler turning flagged fragment deliveries into complete
/// message buffers.
///
/// Pending buffers grow geometrically as fragments are appended and are
/// bounded by `max_message_len`; a message that would exceed the cap is
/// discarded and reported rather than allowed to grow without limit.
#[derive(Debug)]
pub struct FragmentAssembler {
    max_message_len: NonZeroUsize,
    pending: HashMap<SessionId, PendingMessage>,
}

impl FragmentAssembler {
    /// Cap applied by [`FragmentAssembler::default`].
    pub const DEFAULT_MAX_MESSAGE_LEN: NonZeroUsize = NonZeroUsize::new(64 * 1024).unwrap();

    /// Create an assembler that bounds reassembled messages at
    /// `max_message_len` bytes.
    #[must_use]
    pub fn new(max_message_len: NonZeroUsize) -> Self {
        Self {
            max_message_len,
            pending: HashMap::new(),
        }
    }

    /// Feed one fragment through the assembler.
    ///
    /// Returns the message this fragment completed, if any, together with
    /// any conflict it exposed. The returned message borrows the fragment's
    /// bytes only in the unfragmented case; assembled messages own their
    /// buffer and remain valid after the poll callback returns.
    pub fn on_fragment<'a>(&mut self, fragment: FragmentView<'a>) -> FragmentOutcome<'a> {
        let session_id = fragment.session_id();
        let flags = fragment.flags();
        let payload = fragment.payload();

        if flags.is_unfragmented() {
            let conflict = self.discard_pending(session_id);
            return FragmentOutcome {
                message: Some(CompleteMessage::borrowed(session_id, payload)),
                conflict,
            };
        }

        if flags.is_begin() {
            let conflict = self.discard_pending(session_id);
            if payload.len() > self.max_message_len.get() {
                return FragmentOutcome::conflicted(ReassemblyConflict::MessageTooLarge {
                    session_id,
                    attempted: payload.len(),
                    limit: self.max_message_len,
                });
            }
            self.pending.insert(session_id, PendingMessage::new(payload));
            return FragmentOutcome {
                message: None,
                conflict,
            };
        }

        if flags.is_end() {
            let Some(mut pending_message) = self.pending.remove(&session_id) else {
                return FragmentOutcome::conflicted(ReassemblyConflict::OrphanFragment {
                    session_id,
                    len: payload.len(),
                });
            };
            let attempted = pending_message.len().saturating_add(payload.len());
            if attempted > self.max_message_len.get() {
                return FragmentOutcome::conflicted(ReassemblyConflict::MessageTooLarge {
                    session_id,
                    attempted,
                    limit: self.max_message_len,
                });
            }
            pending_message.push(payload);
            return FragmentOutcome::completed(CompleteMessage::assembled(
                session_id,
                pending_message.into_buffer(),
            ));
        }

        match self.pending.get_mut(&session_id) {
            Some(pending_message) => {
                let attempted = pending_message.len().saturating_add(payload.len());
                if attempted > self.max_message_len.get() {
                    self.pending.remove(&session_id);
                    return FragmentOutcome::conflicted(ReassemblyConflict::MessageTooLarge {
                        session_id,
                        attempted,
                        limit: self.max_message_len,
                    });
                }
                pending_message.push(payload);
                FragmentOutcome::clean()
            }
            None => FragmentOutcome::conflicted(ReassemblyConflict::OrphanFragment {
                session_id,
                len: payload.len(),
            }),
        }
    }

    /// Number of sessions with a partial message in progress.
    #[must_use]
    pub fn pending_sessions(&self) -> usize { self.pending.len() }

    fn discard_pending(&mut self, session_id: SessionId) -> Option<ReassemblyConflict> {
        self.pending
            .remove(&session_id)
            .map(|stale| ReassemblyConflict::RestartedSeries {
                session_id,
                discarded_len: stale.len(),
            })
    }
}

impl Default for FragmentAssembler {
    fn default() -> Self { Self::new(Self::DEFAULT_MAX_MESSAGE_LEN) }
}
