//! Recoverable conflict events raised during reassembly.
//!
//! A conflict means the transport violated the contiguous-delivery
//! precondition for one session, or a message outgrew its buffer cap. The
//! assembler discards the affected partial state and keeps going; nothing
//! here terminates the poll loop.

use std::num::NonZeroUsize;

use thiserror::Error;

use super::SessionId;

/// Protocol violations detected while stitching fragments together.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyConflict {
    /// A new message began while a prior one was still incomplete. The
    /// stale partial bytes were discarded.
    #[error("session {session_id}: new message began with {discarded_len} bytes still pending")]
    RestartedSeries {
        session_id: SessionId,
        discarded_len: usize,
    },
    /// A continuation or end fragment arrived with no message in progress.
    /// The fragment was dropped.
    #[error("session {session_id}: {len}-byte continuation arrived with no message in progress")]
    OrphanFragment { session_id: SessionId, len: usize },
    /// The reassembled message would exceed the configured cap. The
    /// partial bytes were discarded.
    #[error("session {session_id}: message would reach {attempted} bytes, over the {limit} cap")]
    MessageTooLarge {
        session_id: SessionId,
        attempted: usize,
        limit: NonZeroUsize,
    },
}
