use std::{error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    DuplicateCharacter { character: char, first: usize, second: usize },
    NonAsciiCharacter { character: u8, index: usize },
    PaddingCharacter { index: usize },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    NonAsciiCharacter { character: u8, index: usize },
    InvalidCharacter { character: char, index: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCharacter { character, first, second } => {
                write!(f, "Duplicate character '{}' at indexes {} and {}", character, first, second)
            }
            Self::NonAsciiCharacter { character, index } => write!(f, "Non-ascii character {:#04x} at index {}", character, index),
            Self::PaddingCharacter { index } => write!(f, "Padding character '=' at index {}", index),
        }
    }
}

impl error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter { character, index } => write!(f, "Invalid character '{}' at index {}", character, index),
            Self::NonAsciiCharacter { character, index } => write!(f, "Non-ascii character {:#04x} at index {}", character, index),
        }
    }
}

pub const PADDING: u8 = b'=';

/// Bijection between the values `0..N` and `N` distinct ascii characters.
///
/// The reverse table is dense and indexed by character code, so decoding a
/// character is a single array access.
pub struct Alphabet<const N: usize> {
    encode: [u8; N],
    decode: [Option<u8>; 128],
}

impl<const N: usize> Alphabet<N> {
    pub fn encode(&self, value: usize) -> u8 {
        self.encode[value]
    }

    pub fn decode(&self, value: u8, index: usize) -> Result<u8, DecodeError> {
        if value >= 128 {
            return Err(DecodeError::NonAsciiCharacter { index, character: value });
        }
        match self.decode[value as usize] {
            Some(value) => Ok(value),
            None => Err(DecodeError::InvalidCharacter {
                character: value as char,
                index,
            }),
        }
    }

    pub fn encode_table(&self) -> [char; N] {
        let mut table = ['\0'; N];
        for (character, &value) in table.iter_mut().zip(self.encode.iter()) {
            *character = value as char;
        }
        table
    }

    pub fn decode_table(&self) -> &[Option<u8>; 128] {
        &self.decode
    }

    pub const fn new(characters: &[u8; N]) -> Result<Self, Error> {
        let mut encode = [0u8; N];
        let mut decode: [Option<u8>; 128] = [None; 128];

        let mut index = 0;
        while index < encode.len() {
            let character = characters[index];
            if character >= 128 {
                return Err(Error::NonAsciiCharacter { index, character });
            }
            if character == PADDING {
                return Err(Error::PaddingCharacter { index });
            }
            if let Some(v) = decode[character as usize] {
                return Err(Error::DuplicateCharacter {
                    character: character as char,
                    first: v as usize,
                    second: index,
                });
            }
            encode[index] = character;
            decode[character as usize] = Some(index as u8);
            index += 1;
        }

        Ok(Self { encode, decode })
    }

    pub const fn len(&self) -> usize {
        self.encode.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Alphabet, DecodeError, Error};

    #[test]
    fn new() {
        assert!(Alphabet::new(b"ab").is_ok());
        assert_eq!(
            Alphabet::new(b"aba").err(),
            Some(Error::DuplicateCharacter { character: 'a', first: 0, second: 2 })
        );
        assert_eq!(Alphabet::new(&[b'a', 0xc3]).err(), Some(Error::NonAsciiCharacter { character: 0xc3, index: 1 }));
        assert_eq!(Alphabet::new(b"a=").err(), Some(Error::PaddingCharacter { index: 1 }));
    }

    #[test]
    fn decode() {
        let alphabet = match Alphabet::new(b"xyz") {
            Ok(alphabet) => alphabet,
            Err(error) => panic!("{}", error),
        };
        assert_eq!(alphabet.decode(b'z', 0), Ok(2));
        assert_eq!(alphabet.decode(b'w', 4), Err(DecodeError::InvalidCharacter { character: 'w', index: 4 }));
        assert_eq!(alphabet.decode(0xff, 7), Err(DecodeError::NonAsciiCharacter { character: 0xff, index: 7 }));
        assert_eq!(alphabet.encode_table(), ['x', 'y', 'z']);
        assert_eq!(alphabet.len(), 3);
    }
}
