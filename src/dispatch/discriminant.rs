use derive_more::{From, Into};

/// Leading byte of a message body, identifying its decoder.
///
/// # Examples
///
/// ```
/// use shmtap::dispatch::Discriminant;
/// let quote = Discriminant::new(b'Q');
/// assert_eq!(quote.get(), 0x51);
/// assert_eq!(quote.to_string(), "0x51 ('Q')");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, From, Into)]
pub struct Discriminant(u8);

impl Discriminant {
    /// Wrap a raw discriminant byte.
    #[must_use]
    pub const fn new(value: u8) -> Self { Self(value) }

    /// Return the raw byte.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    pub(crate) const fn index(self) -> usize { self.0 as usize }
}

impl std::fmt::Display for Discriminant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_ascii_graphic() {
            write!(f, "0x{:02x} ('{}')", self.0, char::from(self.0))
        } else {
            write!(f, "0x{:02x}", self.0)
        }
    }
}
