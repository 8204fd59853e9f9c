//! Repacking of fixed-width symbols into the 6-bit groups of the base64
//! alphabet, and back.
//!
//! The symbols are read as one MSB-first bitstream. A group may take the
//! tail of one symbol and the head of the next; the last group is zero
//! filled and followed by one `=` per two fill bits.

pub mod bit_carry;
pub mod bit_width;
pub mod decode;
pub mod encode;
pub mod symbol;

pub use crate::base_common::{Alphabet, BASE64_ALPHABET, PADDING};
pub use bit_carry::{BitCarry, Phase, Tail};
pub use bit_width::BitWidth;
pub use decode::{decode, decode_tolerant, Decoder, Malformation, Mode};
pub use encode::{encode, encoded_len, Encoder};
pub use symbol::Symbol;
