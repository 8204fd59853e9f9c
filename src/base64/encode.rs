use super::{Alphabet, ALPHABET};
use crate::repack::{self, BitWidth};

pub struct Encoder<'a> {
    encoder: repack::Encoder<'a>,
}

impl<'a> Encoder<'a> {
    pub const fn new(alphabet: &'a Alphabet<64>) -> Self {
        Self {
            encoder: repack::Encoder::new(alphabet, BitWidth::BYTE),
        }
    }

    pub fn encode_into(&self, input: impl AsRef<[u8]>, output: &mut Vec<u8>) -> usize {
        match self.encoder.encode_into(input.as_ref(), output) {
            Ok(len) => len,
            Err(error) => unreachable!("bytes always fit in 8 bits: {}", error),
        }
    }

    pub fn encode(&self, input: impl AsRef<[u8]>) -> String {
        match self.encoder.encode(input.as_ref()) {
            Ok(output) => output,
            Err(error) => unreachable!("bytes always fit in 8 bits: {}", error),
        }
    }

    pub fn default() -> &'static Self {
        &ENCODER
    }
}

static ENCODER: Encoder = Encoder::new(&ALPHABET);

pub fn encode_into(input: impl AsRef<[u8]>, output: &mut Vec<u8>) -> usize {
    Encoder::default().encode_into(input, output)
}

pub fn encode(input: impl AsRef<[u8]>) -> String {
    Encoder::default().encode(input)
}
