use arrayref::array_mut_ref;
use log::debug;

use crate::{Error, Result};

/// Serializes `N` words into `B` bytes, most significant byte first. `B` must be `4 * N`.
///
/// This is the inverse of [`pack`](crate::pack).
#[inline]
pub fn unpack<const N: usize, const B: usize>(words: &[u32; N]) -> [u8; B] {
    const { assert!(B == 4 * N, "byte length must be four times the word count") }
    let mut out = [0; B];
    for (i, word) in words.iter().enumerate() {
        *array_mut_ref![out, 4 * i, 4] = word.to_be_bytes();
    }
    out
}

/// Slice version of [`unpack`]. `out` must hold exactly `4 * words.len()` bytes.
pub fn unpack_words(words: &[u32], out: &mut [u8]) -> Result<()> {
    if words.len().checked_mul(4) != Some(out.len()) {
        debug!(
            "rejecting serialization of {} words into {} bytes",
            words.len(),
            out.len()
        );
        return Err(Error::InvalidLength {
            words: words.len(),
            bytes: out.len(),
        });
    }
    for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_come_out_big_endian() {
        let bytes: [u8; 8] = unpack(&[0x0102_0304, 0xa0b0_c0d0]);
        assert_eq!(bytes, [0x01, 0x02, 0x03, 0x04, 0xa0, 0xb0, 0xc0, 0xd0]);
    }

    #[test]
    fn slice_version_matches_array_version() {
        let words = [0xdead_beef, 0, u32::MAX, 0x6578_7061];
        let mut out = [0; 16];
        unpack_words(&words, &mut out).unwrap();
        assert_eq!(out, unpack::<4, 16>(&words));
    }

    #[test]
    fn slice_version_checks_length() {
        let mut out = [0; 15];
        assert_eq!(
            unpack_words(&[0; 4], &mut out),
            Err(Error::InvalidLength {
                words: 4,
                bytes: 15
            })
        );
    }
}
