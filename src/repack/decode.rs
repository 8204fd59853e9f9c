use super::{bit_carry::Tail, bit_width, Alphabet, BitCarry, BitWidth, Symbol, BASE64_ALPHABET, PADDING};
use crate::base_common::alphabet;
use std::{convert::TryFrom, error, fmt};

/// Structural problems of an encoded sequence.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Malformation {
    TooMuchPadding { count: usize },
    PaddingNotAtEnd { index: usize },
    PaddingMismatch { expected: usize, found: usize },
    NonZeroFill,
}

impl fmt::Display for Malformation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TooMuchPadding { count } => write!(f, "{} padding characters (at most 2 expected)", count),
            Self::PaddingNotAtEnd { index } => write!(f, "padding character at index {} is followed by data", index),
            Self::PaddingMismatch { expected, found } => {
                write!(f, "{} padding characters ({} expected)", found, expected)
            }
            Self::NonZeroFill => write!(f, "fill bits of the last character are not zero"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    InvalidBitWidth { bits: usize },
    NonAsciiCharacter { character: u8, index: usize },
    InvalidCharacter { character: char, index: usize },
    MalformedEncoding(Malformation),
    TruncatedData,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidBitWidth { bits } => write!(f, "{}", bit_width::Error::InvalidBitWidth { bits: *bits }),
            Self::InvalidCharacter { character, index } => write!(f, "Invalid character '{}' at index {}", character, index),
            Self::NonAsciiCharacter { character, index } => write!(f, "Non-ascii character {:#04x} at index {}", character, index),
            Self::MalformedEncoding(malformation) => write!(f, "Malformed encoding: {}", malformation),
            Self::TruncatedData => write!(f, "Truncated data"),
        }
    }
}

impl From<alphabet::DecodeError> for Error {
    fn from(error: alphabet::DecodeError) -> Self {
        match error {
            alphabet::DecodeError::InvalidCharacter { character, index } => Error::InvalidCharacter { character, index },
            alphabet::DecodeError::NonAsciiCharacter { character, index } => Error::NonAsciiCharacter { character, index },
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

impl From<Malformation> for Error {
    fn from(malformation: Malformation) -> Self {
        Error::MalformedEncoding(malformation)
    }
}

/// What to do with leftover bits that do not form a whole symbol.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Leftover bits must be the exact zero fill announced by the padding.
    Strict,
    /// Leftover bits are dropped whatever they are.
    Tolerant,
}

/// Splits the trailing run of padding characters off `input`.
pub fn split_padding(input: &[u8]) -> Result<(&[u8], usize), Error> {
    let start = match input.iter().position(|&value| value == PADDING) {
        Some(start) => start,
        None => return Ok((input, 0)),
    };
    if input[start..].iter().any(|&value| value != PADDING) {
        return Err(Malformation::PaddingNotAtEnd { index: start }.into());
    }
    let count = input.len() - start;
    if count > 2 {
        return Err(Malformation::TooMuchPadding { count }.into());
    }
    Ok((&input[..start], count))
}

pub struct Decoder<'a> {
    alphabet: &'a Alphabet<64>,
    width: BitWidth,
    mode: Mode,
}

impl<'a> Decoder<'a> {
    pub const fn new(alphabet: &'a Alphabet<64>, width: BitWidth) -> Self {
        Self {
            alphabet,
            width,
            mode: Mode::Strict,
        }
    }

    pub const fn with_mode(self, mode: Mode) -> Self {
        Self {
            alphabet: self.alphabet,
            width: self.width,
            mode,
        }
    }

    pub const fn tolerant(self) -> Self {
        self.with_mode(Mode::Tolerant)
    }

    fn decode_data<S: Symbol>(&self, data: &[u8], offset: usize, output: &mut Vec<S>) -> Result<Tail, Error> {
        if self.width.bits() > S::BITS {
            return Err(Error::InvalidBitWidth { bits: self.width.bits() });
        }
        let carry = data.iter().enumerate().try_fold(BitCarry::new(self.width.bits()), |carry, (index, &value)| {
            let group = self.alphabet.decode(value, offset + index)?;
            Ok::<_, Error>(carry.push(group as u32, 6, |symbol| output.push(S::from_bits(symbol))))
        })?;
        Ok(carry.finish())
    }

    fn check_tail(&self, tail: Tail, padding: usize) -> Result<(), Error> {
        if self.mode == Mode::Tolerant {
            return Ok(());
        }
        if tail.bits >= 6 {
            return Err(Error::TruncatedData);
        }
        if padding != tail.bits / 2 {
            return Err(Malformation::PaddingMismatch {
                expected: tail.bits / 2,
                found: padding,
            }
            .into());
        }
        if tail.value != 0 {
            return Err(Malformation::NonZeroFill.into());
        }
        Ok(())
    }

    pub fn decode_into<S: Symbol>(&self, input: impl AsRef<[u8]>, output: &mut Vec<S>) -> Result<usize, Error> {
        let start = output.len();
        let (data, padding) = split_padding(input.as_ref())?;
        let tail = self.decode_data(data, 0, output)?;
        self.check_tail(tail, padding)?;
        Ok(output.len() - start)
    }

    /// Decodes a padding-free slice of whole groups taken at `offset` in a larger input.
    pub fn decode_aligned_into<S: Symbol>(&self, data: &[u8], offset: usize, output: &mut Vec<S>) -> Result<usize, Error> {
        let start = output.len();
        let tail = self.decode_data(data, offset, output)?;
        if tail.bits != 0 {
            return Err(Error::TruncatedData);
        }
        Ok(output.len() - start)
    }

    /// Decodes the last slice of a larger input, starting at `offset` and padding included.
    pub fn decode_last_into<S: Symbol>(&self, input: &[u8], offset: usize, output: &mut Vec<S>) -> Result<usize, Error> {
        let start = output.len();
        let (data, padding) = split_padding(input).map_err(|error| match error {
            Error::MalformedEncoding(Malformation::PaddingNotAtEnd { index }) => {
                Malformation::PaddingNotAtEnd { index: offset + index }.into()
            }
            error => error,
        })?;
        let tail = self.decode_data(data, offset, output)?;
        self.check_tail(tail, padding)?;
        Ok(output.len() - start)
    }

    pub fn decode<S: Symbol>(&self, input: impl AsRef<[u8]>) -> Result<Vec<S>, Error> {
        let mut output = Vec::with_capacity((input.as_ref().len() * 6) / self.width.bits());
        self.decode_into(input, &mut output)?;
        Ok(output)
    }
}

static UTF16_DECODER: Decoder = Decoder::new(&BASE64_ALPHABET, BitWidth::UTF16);

impl Decoder<'static> {
    pub fn utf16() -> &'static Self {
        &UTF16_DECODER
    }
}

pub fn decode(input: impl AsRef<[u8]>, bits: usize) -> Result<Vec<u32>, Error> {
    let width = BitWidth::try_from(bits)?;
    Decoder::new(&BASE64_ALPHABET, width).decode(input)
}

pub fn decode_tolerant(input: impl AsRef<[u8]>, bits: usize) -> Result<Vec<u32>, Error> {
    let width = BitWidth::try_from(bits)?;
    Decoder::new(&BASE64_ALPHABET, width).tolerant().decode(input)
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_tolerant, split_padding, Decoder, Error, Malformation};
    use crate::repack::{encode, BitWidth, BASE64_ALPHABET};

    #[test]
    fn decode_bytes() {
        assert_eq!(decode("TWE=", 8), Ok(vec![0x4d, 0x61]));
        assert_eq!(decode("TWFu", 8), Ok(vec![0x4d, 0x61, 0x6e]));
        assert_eq!(decode("TQ==", 8), Ok(vec![0x4d]));
        assert_eq!(decode("FPucA9l+", 8), Ok(vec![0x14, 0xfb, 0x9c, 0x03, 0xd9, 0x7e]));
        assert_eq!(decode("//++", 8), Ok(vec![0xff, 0xff, 0xbe]));
        assert_eq!(decode("", 8), Ok(vec![]));
    }

    #[test]
    fn decode_wide_symbols() {
        assert_eq!(decode("AE0AYQ==", 16), Ok(vec![0x004d, 0x0061]));
        assert_eq!(decode("AE0=", 16), Ok(vec![0x004d]));
        assert_eq!(decode("AE0AYQBu", 16), Ok(vec![0x004d, 0x0061, 0x006e]));
        assert_eq!(decode("//", 12), Ok(vec![0xfff]));
        assert_eq!(decode("", 16), Ok(vec![]));
    }

    #[test]
    fn invalid_character() {
        assert_eq!(decode("TW$=", 8), Err(Error::InvalidCharacter { character: '$', index: 2 }));
        assert_eq!(decode("TW\u{e9}", 8), Err(Error::NonAsciiCharacter { character: 0xc3, index: 2 }));
        assert_eq!(decode("TWFu", 7), Err(Error::InvalidBitWidth { bits: 7 }));
    }

    #[test]
    fn truncated() {
        assert_eq!(decode("T", 8), Err(Error::TruncatedData));
        assert_eq!(decode("TWFuT", 8), Err(Error::TruncatedData));
        assert_eq!(decode("AE", 16), Err(Error::TruncatedData));
        assert_eq!(decode_tolerant("T", 8), Ok(vec![]));
        assert_eq!(decode_tolerant("TWFuT", 8), Ok(vec![0x4d, 0x61, 0x6e]));
    }

    #[test]
    fn padding() {
        assert_eq!(
            decode("TWE", 8),
            Err(Error::MalformedEncoding(Malformation::PaddingMismatch { expected: 1, found: 0 }))
        );
        assert_eq!(
            decode("TWFu==", 8),
            Err(Error::MalformedEncoding(Malformation::PaddingMismatch { expected: 0, found: 2 }))
        );
        assert_eq!(
            decode("TQ=", 8),
            Err(Error::MalformedEncoding(Malformation::PaddingMismatch { expected: 2, found: 1 }))
        );
        assert_eq!(
            decode("==", 8),
            Err(Error::MalformedEncoding(Malformation::PaddingMismatch { expected: 0, found: 2 }))
        );
        assert_eq!(
            decode("TQ===", 8),
            Err(Error::MalformedEncoding(Malformation::TooMuchPadding { count: 3 }))
        );
        assert_eq!(
            decode("TQ==TQ==", 8),
            Err(Error::MalformedEncoding(Malformation::PaddingNotAtEnd { index: 2 }))
        );
        assert_eq!(
            decode_tolerant("TWF=u", 8),
            Err(Error::MalformedEncoding(Malformation::PaddingNotAtEnd { index: 3 }))
        );
        assert_eq!(decode_tolerant("TWE", 8), Ok(vec![0x4d, 0x61]));
        assert_eq!(decode_tolerant("==", 8), Ok(vec![]));
    }

    #[test]
    fn non_zero_fill() {
        assert_eq!(decode("TWF=", 8), Err(Error::MalformedEncoding(Malformation::NonZeroFill)));
        assert_eq!(decode_tolerant("TWF=", 8), Ok(vec![0x4d, 0x61]));
    }

    #[test]
    fn split() {
        assert_eq!(split_padding(b"TWE="), Ok((&b"TWE"[..], 1)));
        assert_eq!(split_padding(b"TQ=="), Ok((&b"TQ"[..], 2)));
        assert_eq!(split_padding(b"TWFu"), Ok((&b"TWFu"[..], 0)));
        assert_eq!(split_padding(b""), Ok((&b""[..], 0)));
    }

    #[test]
    fn aligned() {
        let decoder = Decoder::new(&BASE64_ALPHABET, BitWidth::BYTE);
        let mut output: Vec<u32> = Vec::new();
        assert_eq!(decoder.decode_aligned_into(b"TWFu", 0, &mut output), Ok(3));
        assert_eq!(decoder.decode_last_into(b"TWE=", 4, &mut output), Ok(2));
        assert_eq!(output, [0x4d, 0x61, 0x6e, 0x4d, 0x61]);
        assert_eq!(
            decoder.decode_aligned_into(b"TW$u", 8, &mut output),
            Err(Error::InvalidCharacter { character: '$', index: 10 })
        );
        assert_eq!(
            decoder.decode_last_into(b"T=Eu", 12, &mut output),
            Err(Error::MalformedEncoding(Malformation::PaddingNotAtEnd { index: 13 }))
        );
    }

    #[test]
    fn narrow_carrier() {
        let decoder = Decoder::new(&BASE64_ALPHABET, BitWidth::UTF16);
        assert_eq!(decoder.decode::<u8>("AE0="), Err(Error::InvalidBitWidth { bits: 16 }));
        assert_eq!(decoder.decode::<u16>("AE0="), Ok(vec![0x004d]));
    }

    #[test]
    fn round_trip() {
        for &bits in &[6, 8, 10, 12, 16, 24, 32] {
            let width = BitWidth::new(bits).unwrap();
            for length in 0..20 {
                let symbols: Vec<u32> = (0..length as u32)
                    .map(|index| index.wrapping_mul(0x9e37_79b9) & width.max_symbol())
                    .collect();
                let encoded = encode(&symbols, bits).unwrap();
                assert_eq!(decode(&encoded, bits), Ok(symbols));
            }
        }
    }
}
