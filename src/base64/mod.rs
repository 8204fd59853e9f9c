//! Base64 for bytes: the repacking codec with 8-bit symbols.

pub mod decode;
pub mod encode;
pub use crate::base_common::{Alphabet, BASE64_ALPHABET as ALPHABET};

pub use decode::{decode, decode_into, Decoder};
pub use encode::{encode, encode_into, Encoder};
