//! Metric helpers for `shmtap`.
//!
//! This module defines metric names and simple helper functions
//! wrapping the [`metrics`](https://docs.rs/metrics) crate. Counters are
//! recorded against whatever recorder the host application installs and
//! are no-ops otherwise.

use metrics::counter;

/// Name of the counter tracking fragments drained from the transport.
pub const FRAGMENTS_TOTAL: &str = "shmtap_fragments_total";
/// Name of the counter tracking decoded and emitted messages.
pub const MESSAGES_TOTAL: &str = "shmtap_messages_total";
/// Name of the counter tracking reassembly conflicts.
pub const REASSEMBLY_CONFLICTS_TOTAL: &str = "shmtap_reassembly_conflicts_total";
/// Name of the counter tracking messages with no registered decoder.
pub const UNKNOWN_DISCRIMINANTS_TOTAL: &str = "shmtap_unknown_discriminants_total";
/// Name of the counter tracking malformed payloads.
pub const DECODE_FAILURES_TOTAL: &str = "shmtap_decode_failures_total";

/// Record fragments drained by one poll call.
pub fn add_fragments(count: u64) { counter!(FRAGMENTS_TOTAL).increment(count); }

/// Record one decoded message handed to the sink.
pub fn inc_messages() { counter!(MESSAGES_TOTAL).increment(1); }

/// Record one discarded partial message or dropped fragment.
pub fn inc_reassembly_conflicts() { counter!(REASSEMBLY_CONFLICTS_TOTAL).increment(1); }

/// Record one message skipped for lack of a decoder.
pub fn inc_unknown_discriminants() { counter!(UNKNOWN_DISCRIMINANTS_TOTAL).increment(1); }

/// Record one payload a decoder rejected.
pub fn inc_decode_failures() { counter!(DECODE_FAILURES_TOTAL).increment(1); }
