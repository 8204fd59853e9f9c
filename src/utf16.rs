//! Base64 for text carried as UTF-16 code units: the repacking codec with
//! 16-bit symbols. Any sequence of code units round-trips, lone surrogates
//! included; only the conversion back to a `String` requires valid UTF-16.

use crate::repack::{self, BitWidth, Decoder, Encoder, BASE64_ALPHABET};
use std::{error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Decode(repack::decode::Error),
    InvalidUtf16,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Decode(error) => write!(f, "{}", error),
            Self::InvalidUtf16 => write!(f, "Decoded code units are not valid UTF-16"),
        }
    }
}

impl From<repack::decode::Error> for Error {
    fn from(error: repack::decode::Error) -> Self {
        Error::Decode(error)
    }
}

pub fn encode_units(input: impl AsRef<[u16]>) -> String {
    match Encoder::utf16().encode(input.as_ref()) {
        Ok(output) => output,
        Err(error) => unreachable!("code units always fit in 16 bits: {}", error),
    }
}

pub fn encode(text: &str) -> String {
    encode_units(text.encode_utf16().collect::<Vec<_>>())
}

pub fn decode_units(input: impl AsRef<[u8]>) -> Result<Vec<u16>, repack::decode::Error> {
    Decoder::utf16().decode(input)
}

pub fn decode(input: impl AsRef<[u8]>) -> Result<String, Error> {
    let units = decode_units(input)?;
    String::from_utf16(&units).map_err(|_| Error::InvalidUtf16)
}

/// Like `decode`, ignoring a truncated tail, a padding count that does not match it and non-zero fill bits.
pub fn decode_tolerant(input: impl AsRef<[u8]>) -> Result<String, Error> {
    let units: Vec<u16> = Decoder::new(&BASE64_ALPHABET, BitWidth::UTF16).tolerant().decode(input)?;
    String::from_utf16(&units).map_err(|_| Error::InvalidUtf16)
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::repack::decode as repack_decode;

    #[test]
    fn encode() {
        assert_eq!(super::encode(""), "");
        assert_eq!(super::encode("M"), "AE0=");
        assert_eq!(super::encode("Ma"), "AE0AYQ==");
        assert_eq!(super::encode("Man"), "AE0AYQBu");
        assert_eq!(super::encode("\u{20ac}"), "IKw=");
        // U+1F600 is the surrogate pair d83d de00
        assert_eq!(super::encode("\u{1f600}"), "2D3eAA==");
    }

    #[test]
    fn decode() {
        assert_eq!(super::decode(""), Ok(String::new()));
        assert_eq!(super::decode("AE0AYQBu"), Ok("Man".to_string()));
        assert_eq!(super::decode("IKw="), Ok("\u{20ac}".to_string()));
        assert_eq!(super::decode("2D3eAA=="), Ok("\u{1f600}".to_string()));
        assert_eq!(super::decode("2D0="), Err(Error::InvalidUtf16));
        assert_eq!(super::decode_units("2D0="), Ok(vec![0xd83d]));
        assert_eq!(super::decode("AE"), Err(Error::Decode(repack_decode::Error::TruncatedData)));
        assert_eq!(super::decode_tolerant("AE0AYQBuAA"), Ok("Man".to_string()));
    }

    #[test]
    fn round_trip_units() {
        let units: Vec<u16> = (0..200u32).map(|index| (index.wrapping_mul(0x9e37_79b9) >> 16) as u16).collect();
        for length in 0..units.len() {
            let encoded = super::encode_units(&units[..length]);
            assert_eq!(super::decode_units(&encoded), Ok(units[..length].to_vec()));
        }
    }
}
