use zeroize::Zeroize;

use crate::{
    rounds::double_round, unpack, Counter, Key, Nonce, State, BLOCK_BYTES, DOUBLE_ROUNDS,
    STATE_WORDS,
};

/// The state after mixing and feed-forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputBlock([u32; STATE_WORDS]);

impl OutputBlock {
    pub fn words(&self) -> &[u32; STATE_WORDS] {
        &self.0
    }

    /// The 64-byte block, each word most significant byte first, in slot order.
    pub fn to_bytes(&self) -> [u8; BLOCK_BYTES] {
        unpack(&self.0)
    }
}

impl Zeroize for OutputBlock {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl From<OutputBlock> for [u8; BLOCK_BYTES] {
    fn from(block: OutputBlock) -> Self {
        block.to_bytes()
    }
}

impl State {
    /// Runs the twenty ChaCha rounds over a copy of this state and adds the original words back.
    ///
    /// The result depends on nothing but `self`.
    pub fn transform(&self) -> OutputBlock {
        let mut original = *self.words();
        let mut x = original;
        for _ in 0..DOUBLE_ROUNDS {
            double_round(&mut x);
        }
        feed_forward(&mut x, &original);
        original.zeroize();
        OutputBlock(x)
    }
}

#[inline]
fn feed_forward(x: &mut [u32; STATE_WORDS], original: &[u32; STATE_WORDS]) {
    for (xi, oi) in x.iter_mut().zip(original) {
        *xi = xi.wrapping_add(*oi);
    }
}

/// Builds the state for `(key, counter, nonce)`, transforms it and serializes the result.
///
/// The intermediate state and output words are wiped before returning; only the bytes remain.
pub fn keystream_block(key: &Key, counter: Counter, nonce: &Nonce) -> [u8; BLOCK_BYTES] {
    let mut state = State::new(key, counter, nonce);
    let mut block = state.transform();
    let bytes = block.to_bytes();
    state.zeroize();
    block.zeroize();
    bytes
}

#[cfg(test)]
mod tests {
    use zeroize::Zeroize;

    use super::*;

    #[test]
    fn feed_forward_wraps() {
        let mut x = [0xffff_ffff; STATE_WORDS];
        feed_forward(&mut x, &[1; STATE_WORDS]);
        assert_eq!(x, [0; STATE_WORDS]);
    }

    #[test]
    fn feed_forward_is_word_wise() {
        let mut x: [u32; STATE_WORDS] = core::array::from_fn(|i| i as u32);
        let original: [u32; STATE_WORDS] = core::array::from_fn(|i| 0x100 * i as u32);
        feed_forward(&mut x, &original);
        assert_eq!(x, core::array::from_fn(|i| 0x101 * i as u32));
    }

    #[test]
    fn state_and_block_can_be_wiped() {
        let key = Key::from([0x5a; 32]);
        let mut state = State::new(&key, Counter::Narrow(3), &Nonce::from([1; 8]));
        let mut block = state.transform();
        assert!(state.key().iter().all(|&w| w == 0x5a5a_5a5a));

        state.zeroize();
        block.zeroize();
        assert_eq!(*state.words(), [0; STATE_WORDS]);
        assert_eq!(*block.words(), [0; STATE_WORDS]);
    }

    #[test]
    fn keystream_block_matches_manual_pipeline() {
        let key = Key::from([0x5a; 32]);
        let nonce = Nonce::from([1; 8]);
        let manual = State::new(&key, Counter::Narrow(3), &nonce).transform().to_bytes();
        assert_eq!(keystream_block(&key, Counter::Narrow(3), &nonce), manual);
    }

    #[test]
    fn transform_leaves_input_untouched() {
        let key = Key::from([0x5a; 32]);
        let state = State::new(&key, Counter::Narrow(3), &Nonce::from([1; 8]));
        let before = *state.words();
        let _ = state.transform();
        assert_eq!(*state.words(), before);
    }
}
