use derive_more::{Display, From, Into};

/// Identifier of the message stream a fragment belongs to.
///
/// A subscription normally carries a single session, but fragments are
/// keyed by session so that multiplexed streams can never corrupt each
/// other's partial messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From, Into)]
#[display("{_0}")]
pub struct SessionId(i32);

impl SessionId {
    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: i32) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> i32 { self.0 }
}
