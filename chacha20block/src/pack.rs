use core::array;

use arrayref::array_ref;
use log::debug;

use crate::{Error, Result};

/// Packs `B` bytes into `N` big-endian words. `B` must be `4 * N`, which is checked at compile
/// time.
///
/// ```
/// let words: [u32; 2] = chacha20block::pack(b"yoloswag");
/// assert_eq!(words, [0x796f_6c6f, 0x7377_6167]);
/// ```
#[inline]
pub fn pack<const N: usize, const B: usize>(bytes: &[u8; B]) -> [u32; N] {
    const { assert!(B == 4 * N, "byte length must be four times the word count") }
    array::from_fn(|i| u32::from_be_bytes(*array_ref![bytes, 4 * i, 4]))
}

/// Packs `bytes` into `out`, four bytes per word, most significant byte first.
///
/// `bytes` must hold exactly `4 * out.len()` bytes. Anything else is rejected with
/// [`Error::InvalidLength`]; the input is never truncated or padded, and `out` is left untouched.
pub fn pack_words(bytes: &[u8], out: &mut [u32]) -> Result<()> {
    if out.len().checked_mul(4) != Some(bytes.len()) {
        debug!(
            "rejecting word pack of {} bytes into {} words",
            bytes.len(),
            out.len()
        );
        return Err(Error::InvalidLength {
            words: out.len(),
            bytes: bytes.len(),
        });
    }
    for (word, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_be_bytes(*array_ref![chunk, 0, 4]);
    }
    Ok(())
}

/// Fills `out` with big-endian words read from `reader`.
///
/// Exactly `4 * out.len()` bytes are consumed. If the reader runs dry first, this fails with
/// [`Error::ShortRead`] and the contents of `out` are unspecified. Interrupted reads are retried,
/// every other I/O error is passed through as [`Error::Io`].
#[cfg(feature = "std")]
pub fn read_words<R: std::io::Read>(mut reader: R, out: &mut [u32]) -> Result<()> {
    use std::io::ErrorKind;

    let needed = out.len().checked_mul(4).ok_or(Error::InvalidLength {
        words: out.len(),
        bytes: usize::MAX,
    })?;
    let mut available = 0;
    for word in out.iter_mut() {
        let mut bytes = [0; 4];
        let mut filled = 0;
        while filled < bytes.len() {
            match reader.read(&mut bytes[filled..]) {
                Ok(0) => {
                    let available = available + filled;
                    debug!("input ended after {available} of {needed} bytes");
                    return Err(Error::ShortRead { needed, available });
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
        available += bytes.len();
        *word = u32::from_be_bytes(bytes);
    }
    Ok(())
}
