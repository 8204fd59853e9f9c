use super::{Alphabet, ALPHABET};
use crate::repack::{self, BitWidth, Mode};
pub use crate::repack::decode::{Error, Malformation};

pub struct Decoder<'a> {
    decoder: repack::Decoder<'a>,
}

impl<'a> Decoder<'a> {
    pub const fn new(alphabet: &'a Alphabet<64>) -> Self {
        Self {
            decoder: repack::Decoder::new(alphabet, BitWidth::BYTE),
        }
    }

    pub const fn with_mode(self, mode: Mode) -> Self {
        Self {
            decoder: self.decoder.with_mode(mode),
        }
    }

    pub fn decode_into(&self, input: impl AsRef<[u8]>, output: &mut Vec<u8>) -> Result<usize, Error> {
        self.decoder.decode_into(input, output)
    }

    pub fn decode(&self, input: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
        self.decoder.decode(input)
    }

    pub fn default() -> &'static Self {
        &DECODER
    }

    pub fn tolerant() -> &'static Self {
        &TOLERANT_DECODER
    }
}

static DECODER: Decoder = Decoder::new(&ALPHABET);
static TOLERANT_DECODER: Decoder = Decoder::new(&ALPHABET).with_mode(Mode::Tolerant);

pub fn decode_into(input: impl AsRef<[u8]>, output: &mut Vec<u8>) -> Result<usize, Error> {
    Decoder::default().decode_into(input, output)
}

pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
    Decoder::default().decode(input)
}
