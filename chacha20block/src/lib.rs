//! The ChaCha20 block function.
//!
//! A block is computed from a 256-bit key, a 64-bit nonce and a one- or two-word block counter:
//! the 16-word state is assembled, mixed by ten double rounds (twenty quarter rounds), and the
//! pre-mix state is added back word by word. Words are packed from and serialized to bytes in
//! big-endian order, including the `"expand 32-byte k"` constant row.
//!
//! ```
//! use chacha20block::{Counter, Key, Nonce, State};
//!
//! let key = Key::from([7; 32]);
//! let nonce = Nonce::from(*b"noncenon");
//! let block = State::new(&key, Counter::Narrow(0), &nonce).transform();
//! assert_eq!(block.to_bytes().len(), 64);
//! ```
//!
//! Only a single block is produced per call. Turning blocks into a stream cipher (advancing the
//! counter and XOR-ing with plaintext) is left to the caller; [`Counter::next`] refuses to wrap so
//! a (key, nonce, counter) triple is never reused by accident.
#![forbid(unsafe_op_in_unsafe_fn)]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod block;
mod error;
mod pack;
mod rounds;
mod serialize;
mod state;

pub use block::{keystream_block, OutputBlock};
pub use error::{Error, Result};
#[cfg(feature = "std")]
pub use pack::read_words;
pub use pack::{pack, pack_words};
pub use rounds::{double_round, quarter_round, COLUMNS, DIAGONALS};
pub use serialize::{unpack, unpack_words};
pub use state::{Counter, Key, Nonce, State, CONSTANTS};
pub use zeroize::Zeroize;

/// Number of 32-bit words in the state and in an output block.
pub const STATE_WORDS: usize = 16;

/// Number of bytes in a serialized output block.
pub const BLOCK_BYTES: usize = 4 * STATE_WORDS;

/// Number of double rounds applied per block (twenty rounds in total).
pub const DOUBLE_ROUNDS: usize = 10;
