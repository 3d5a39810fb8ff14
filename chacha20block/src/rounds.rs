use crate::STATE_WORDS;

/// Slot groups of the column pass. The first slot of each group is the accumulator `a`.
pub const COLUMNS: [[usize; 4]; 4] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
];

/// Slot groups of the diagonal pass.
pub const DIAGONALS: [[usize; 4]; 4] = [
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

/// The ChaCha quarter round over `[a, b, c, d]`.
///
/// ```
/// use chacha20block::quarter_round;
///
/// let out = quarter_round([0x1111_1111, 0x0102_0304, 0x9b8d_6f43, 0x0123_4567]);
/// assert_eq!(out, [0xea2a_92f4, 0xcb1c_f8ce, 0x4581_472e, 0x5881_c4bb]);
/// ```
#[inline(always)]
pub fn quarter_round([mut a, mut b, mut c, mut d]: [u32; 4]) -> [u32; 4] {
    a = a.wrapping_add(b);
    d ^= a;
    d = d.rotate_left(16);

    c = c.wrapping_add(d);
    b ^= c;
    b = b.rotate_left(12);

    a = a.wrapping_add(b);
    d ^= a;
    d = d.rotate_left(8);

    c = c.wrapping_add(d);
    b ^= c;
    b = b.rotate_left(7);

    [a, b, c, d]
}

/// Applies [`quarter_round`] to the slots of `x` named by `group`, in place.
#[inline(always)]
pub(crate) fn quarter_round_at(x: &mut [u32; STATE_WORDS], [a, b, c, d]: [usize; 4]) {
    [x[a], x[b], x[c], x[d]] = quarter_round([x[a], x[b], x[c], x[d]]);
}

/// One column pass followed by one diagonal pass.
#[inline]
pub fn double_round(x: &mut [u32; STATE_WORDS]) {
    for group in COLUMNS {
        quarter_round_at(x, group);
    }
    for group in DIAGONALS {
        quarter_round_at(x, group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_round_with_zeroed_c_and_d() {
        assert_eq!(
            quarter_round([0x1111_1111, 0x0102_0304, 0, 0]),
            [0x8324_8566, 0x5efb_7d9a, 0x45ac_87aa, 0x3197_7597]
        );
    }

    #[test]
    fn quarter_round_at_touches_only_its_group() {
        // RFC 8439, section 2.2.1
        let mut x = [
            0x879531e0, 0xc5ecf37d, 0x516461b1, 0xc9a62f8a, 0x44c20ef3, 0x3390af7f, 0xd9fc690b,
            0x2a5f714c, 0x53372767, 0xb00a5631, 0x974c541a, 0x359e9963, 0x5c971061, 0x3d631689,
            0x2098d9d6, 0x91dbd320,
        ];
        quarter_round_at(&mut x, [2, 7, 8, 13]);
        assert_eq!(
            x,
            [
                0x879531e0, 0xc5ecf37d, 0xbdb886dc, 0xc9a62f8a, 0x44c20ef3, 0x3390af7f, 0xd9fc690b,
                0xcfacafd2, 0xe46bea80, 0xb00a5631, 0x974c541a, 0x359e9963, 0x5c971061, 0xccc07c79,
                0x2098d9d6, 0x91dbd320,
            ]
        );
    }

    #[test]
    fn every_slot_is_covered_once_per_pass() {
        for pass in [COLUMNS, DIAGONALS] {
            let mut seen = [0; STATE_WORDS];
            for slot in pass.iter().flatten() {
                seen[*slot] += 1;
            }
            assert_eq!(seen, [1; STATE_WORDS]);
        }
    }
}
