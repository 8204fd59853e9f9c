use std::{convert::TryFrom, error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    InvalidBitWidth { bits: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBitWidth { bits } => write!(
                f,
                "Invalid bit width {} (expecting an even width between {} and {})",
                bits,
                BitWidth::MIN,
                BitWidth::MAX
            ),
        }
    }
}

/// Number of bits per symbol on the unencoded side of the codec.
///
/// Not limited to bytes and UTF-16 code units: every even width in
/// `MIN..=MAX` is accepted, anything else fails with `InvalidBitWidth`.
/// With an even width the zero fill of the last group is
/// always 0, 2 or 4 bits and maps exactly onto 0, 1 or 2 padding markers.
/// The lower bound keeps every symbol count distinguishable from the number
/// of encoded characters, the upper bound is the width of the `u32` carrier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BitWidth(usize);

impl BitWidth {
    pub const MIN: usize = 6;
    pub const MAX: usize = 32;

    pub const BYTE: BitWidth = BitWidth(8);
    pub const UTF16: BitWidth = BitWidth(16);

    pub const fn new(bits: usize) -> Result<Self, Error> {
        if bits < Self::MIN || bits > Self::MAX || bits % 2 != 0 {
            return Err(Error::InvalidBitWidth { bits });
        }
        Ok(Self(bits))
    }

    pub const fn bits(&self) -> usize {
        self.0
    }

    /// Largest symbol value representable with this width.
    pub const fn max_symbol(&self) -> u32 {
        (((1u64) << self.0) - 1) as u32
    }

    /// Number of symbols that make up a whole number of 6-bit groups.
    pub const fn symbols_per_group(&self) -> usize {
        6 / gcd(self.0, 6)
    }

    /// Number of encoded characters produced by `symbols_per_group` symbols.
    pub const fn characters_per_group(&self) -> usize {
        self.0 / gcd(self.0, 6)
    }
}

const fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl TryFrom<usize> for BitWidth {
    type Error = Error;

    fn try_from(bits: usize) -> Result<Self, Error> {
        Self::new(bits)
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
