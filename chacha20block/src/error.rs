use core::fmt;

/// Errors reported at the input boundary (word packing and state assembly).
///
/// The mixing core itself is total: once a [`State`](crate::State) exists, transforming and
/// serializing it cannot fail.
///
/// The `Io` variant only exists with the `std` feature, so matches need a wildcard arm:
///
/// ```
/// use chacha20block::{Error, Key};
///
/// match Key::try_from(&[0u8; 31][..]) {
///     Err(Error::InvalidLength { words, bytes }) => assert_eq!((words, bytes), (8, 31)),
///     Err(other) => panic!("unexpected {other}"),
///     Ok(_) => panic!("31 bytes is not a key"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input channel ended before `needed` bytes were supplied.
    ShortRead { needed: usize, available: usize },
    /// A buffer of `bytes` bytes cannot be packed into (or filled from) exactly `words` words.
    InvalidLength { words: usize, bytes: usize },
    /// The key must be exactly 8 words.
    InvalidKeyLength(usize),
    /// The nonce must be exactly 2 words.
    InvalidNonceLength(usize),
    /// The counter must be 1 or 2 words.
    InvalidCounterLength(usize),
    /// The input channel failed for a reason other than running out of bytes.
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
}

pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::ShortRead { needed, available } => {
                write!(f, "short read: needed {needed} bytes, got {available}")
            }
            Error::InvalidLength { words, bytes } => {
                write!(f, "cannot pack {bytes} bytes into {words} 32-bit words")
            }
            Error::InvalidKeyLength(len) => write!(f, "key must be 8 words, got {len}"),
            Error::InvalidNonceLength(len) => write!(f, "nonce must be 2 words, got {len}"),
            Error::InvalidCounterLength(len) => {
                write!(f, "counter must be 1 or 2 words, got {len}")
            }
            #[cfg(feature = "std")]
            Error::Io(kind) => write!(f, "input error: {kind}"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.kind())
    }
}
