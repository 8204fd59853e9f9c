use super::{bit_width, Alphabet, BitCarry, BitWidth, Symbol, BASE64_ALPHABET, PADDING};
use std::{convert::TryFrom, error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    InvalidBitWidth { bits: usize },
    SymbolOutOfRange { symbol: u32, index: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidBitWidth { bits } => write!(f, "{}", bit_width::Error::InvalidBitWidth { bits: *bits }),
            Self::SymbolOutOfRange { symbol, index } => write!(f, "Symbol {:#x} at index {} does not fit the bit width", symbol, index),
        }
    }
}

impl From<bit_width::Error> for Error {
    fn from(error: bit_width::Error) -> Self {
        match error {
            bit_width::Error::InvalidBitWidth { bits } => Error::InvalidBitWidth { bits },
        }
    }
}

pub fn div_ceil(lhs: usize, rhs: usize) -> usize {
    (lhs + rhs - 1) / rhs
}

/// Length of the encoding of `symbols` symbols, padding included.
pub fn encoded_len(symbols: usize, width: BitWidth) -> usize {
    let bits = symbols * width.bits();
    let characters = div_ceil(bits, 6);
    characters + (characters * 6 - bits) / 2
}

pub struct Encoder<'a> {
    alphabet: &'a Alphabet<64>,
    width: BitWidth,
}

impl<'a> Encoder<'a> {
    pub const fn new(alphabet: &'a Alphabet<64>, width: BitWidth) -> Self {
        Self { alphabet, width }
    }

    pub fn encode_into<S: Symbol>(&self, input: impl AsRef<[S]>, output: &mut Vec<u8>) -> Result<usize, Error> {
        let start = output.len();
        let max_symbol = self.width.max_symbol();
        let carry = input
            .as_ref()
            .iter()
            .enumerate()
            .try_fold(BitCarry::new(6), |carry, (index, &symbol)| {
                let symbol = symbol.to_bits();
                if symbol > max_symbol {
                    return Err(Error::SymbolOutOfRange { symbol, index });
                }
                Ok(carry.push(symbol, self.width.bits(), |group| output.push(self.alphabet.encode(group as usize))))
            })?;
        let tail = carry.finish();
        if tail.bits > 0 {
            output.push(self.alphabet.encode(tail.zero_filled(6) as usize));
            for _ in 0..tail.fill_bits(6) / 2 {
                output.push(PADDING);
            }
        }
        Ok(output.len() - start)
    }

    pub fn encode<S: Symbol>(&self, input: impl AsRef<[S]>) -> Result<String, Error> {
        let mut output = Vec::with_capacity(encoded_len(input.as_ref().len(), self.width));
        self.encode_into(input, &mut output)?;
        // The alphabet and the padding marker are ascii.
        Ok(output.into_iter().map(char::from).collect())
    }
}

static UTF16_ENCODER: Encoder = Encoder::new(&BASE64_ALPHABET, BitWidth::UTF16);

impl Encoder<'static> {
    pub fn utf16() -> &'static Self {
        &UTF16_ENCODER
    }
}

pub fn encode(input: impl AsRef<[u32]>, bits: usize) -> Result<String, Error> {
    let width = BitWidth::try_from(bits)?;
    Encoder::new(&BASE64_ALPHABET, width).encode(input.as_ref())
}
