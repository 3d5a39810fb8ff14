use core::fmt;

use arrayref::array_ref;
use log::debug;
use zeroize::Zeroize;

use crate::{pack, pack_words, rounds, unpack, Error, Result, STATE_WORDS};

/// The first row of every state: `"expand 32-byte k"` as four big-endian words.
pub const CONSTANTS: [u32; 4] = [
    u32::from_be_bytes(*b"expa"),
    u32::from_be_bytes(*b"nd 3"),
    u32::from_be_bytes(*b"2-by"),
    u32::from_be_bytes(*b"te k"),
];

/// A 256-bit key as eight words. The words are wiped when the key is dropped.
///
/// Only this type wipes itself. [`State`] and [`OutputBlock`](crate::OutputBlock) are `Copy` and
/// carry key-derived words, so callers that keep them around should call
/// [`Zeroize::zeroize`] when done. [`keystream_block`](crate::keystream_block) does that for its
/// own temporaries.
#[derive(Clone, PartialEq, Eq)]
pub struct Key([u32; 8]);

impl Key {
    pub fn words(&self) -> &[u32; 8] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        unpack(&self.0)
    }
}

impl From<[u8; 32]> for Key {
    fn from(bytes: [u8; 32]) -> Self {
        Self(pack(&bytes))
    }
}

impl From<&[u8; 32]> for Key {
    fn from(bytes: &[u8; 32]) -> Self {
        Self(pack(bytes))
    }
}

impl From<[u32; 8]> for Key {
    fn from(words: [u32; 8]) -> Self {
        Self(words)
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let mut words = [0; 8];
        pack_words(bytes, &mut words)?;
        Ok(Self(words))
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}

/// A 64-bit nonce as two words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u32; 2]);

impl Nonce {
    pub fn words(&self) -> &[u32; 2] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        unpack(&self.0)
    }
}

impl From<[u8; 8]> for Nonce {
    fn from(bytes: [u8; 8]) -> Self {
        Self(pack(&bytes))
    }
}

impl From<&[u8; 8]> for Nonce {
    fn from(bytes: &[u8; 8]) -> Self {
        Self(pack(bytes))
    }
}

impl From<[u32; 2]> for Nonce {
    fn from(words: [u32; 2]) -> Self {
        Self(words)
    }
}

impl TryFrom<&[u8]> for Nonce {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let mut words = [0; 2];
        pack_words(bytes, &mut words)?;
        Ok(Self(words))
    }
}

/// The block counter occupying slots 12 and 13.
///
/// A narrow counter uses slot 12 only and keeps slot 13 at zero. A wide counter stores its low
/// word in slot 12 and its high word in slot 13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Narrow(u32),
    Wide([u32; 2]),
}

impl Counter {
    /// Accepts one word (narrow) or two words (wide, low word first).
    pub fn from_words(words: &[u32]) -> Result<Self> {
        match *words {
            [ctr] => Ok(Counter::Narrow(ctr)),
            [lo, hi] => Ok(Counter::Wide([lo, hi])),
            _ => {
                debug!("rejecting counter of {} words", words.len());
                Err(Error::InvalidCounterLength(words.len()))
            }
        }
    }

    /// The words stored in slots 12 and 13.
    pub fn words(self) -> [u32; 2] {
        match self {
            Counter::Narrow(ctr) => [ctr, 0],
            Counter::Wide(words) => words,
        }
    }

    /// The counter for the following block, keeping the width. Returns `None` once the width is
    /// exhausted instead of wrapping around to a value that was already used.
    pub fn next(self) -> Option<Self> {
        match self {
            Counter::Narrow(ctr) => ctr.checked_add(1).map(Counter::Narrow),
            Counter::Wide([lo, hi]) => {
                let value = (u64::from(hi) << 32) | u64::from(lo);
                value.checked_add(1).map(Counter::from)
            }
        }
    }
}

impl Default for Counter {
    fn default() -> Self {
        Counter::Narrow(0)
    }
}

impl From<u32> for Counter {
    fn from(ctr: u32) -> Self {
        Counter::Narrow(ctr)
    }
}

impl From<u64> for Counter {
    fn from(ctr: u64) -> Self {
        Counter::Wide([ctr as u32, (ctr >> 32) as u32])
    }
}

/// The 16-word working state: constants, key, counter, nonce.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct State([u32; STATE_WORDS]);

impl State {
    pub fn new(key: &Key, counter: Counter, nonce: &Nonce) -> Self {
        Self::assemble(&key.0, counter, &nonce.0)
    }

    /// Assembles a state from loose word slices, checking that the key has 8 words and the nonce
    /// has 2.
    pub fn build(key: &[u32], counter: Counter, nonce: &[u32]) -> Result<Self> {
        let key: &[u32; 8] = key.try_into().map_err(|_| {
            debug!("rejecting key of {} words", key.len());
            Error::InvalidKeyLength(key.len())
        })?;
        let nonce: &[u32; 2] = nonce.try_into().map_err(|_| {
            debug!("rejecting nonce of {} words", nonce.len());
            Error::InvalidNonceLength(nonce.len())
        })?;
        Ok(Self::assemble(key, counter, nonce))
    }

    /// Takes all sixteen words as given, constants included. Meant for checking the transform
    /// against published test vectors whose constant row differs in byte order.
    pub const fn from_words(words: [u32; STATE_WORDS]) -> Self {
        Self(words)
    }

    fn assemble(key: &[u32; 8], counter: Counter, nonce: &[u32; 2]) -> Self {
        let [c0, c1, c2, c3] = CONSTANTS;
        let [k0, k1, k2, k3, k4, k5, k6, k7] = *key;
        let [t0, t1] = counter.words();
        let [n0, n1] = *nonce;
        #[rustfmt::skip]
        let x = [
            c0, c1, c2, c3,
            k0, k1, k2, k3,
            k4, k5, k6, k7,
            t0, t1, n0, n1,
        ];
        Self(x)
    }

    pub fn words(&self) -> &[u32; STATE_WORDS] {
        &self.0
    }

    pub fn constants(&self) -> &[u32; 4] {
        array_ref![self.0, 0, 4]
    }

    pub fn key(&self) -> &[u32; 8] {
        array_ref![self.0, 4, 8]
    }

    pub fn counter(&self) -> &[u32; 2] {
        array_ref![self.0, 12, 2]
    }

    pub fn nonce(&self) -> &[u32; 2] {
        array_ref![self.0, 14, 2]
    }

    /// Applies one quarter round to the slots named by `group`, in place.
    ///
    /// # Panics
    ///
    /// If any index in `group` is 16 or larger.
    pub fn quarter_round(&mut self, group: [usize; 4]) {
        rounds::quarter_round_at(&mut self.0, group);
    }

    pub fn double_round(&mut self) {
        rounds::double_round(&mut self.0);
    }
}

impl Zeroize for State {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("counter", self.counter())
            .field("nonce", self.nonce())
            .finish_non_exhaustive()
    }
}
