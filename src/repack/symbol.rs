/// Integer type able to carry a symbol of up to `BITS` bits.
pub trait Symbol: Copy {
    const BITS: usize;

    fn to_bits(self) -> u32;

    /// Only called with values that fit in `BITS` bits.
    fn from_bits(bits: u32) -> Self;
}

impl Symbol for u8 {
    const BITS: usize = 8;

    fn to_bits(self) -> u32 {
        self as u32
    }

    fn from_bits(bits: u32) -> Self {
        bits as u8
    }
}

impl Symbol for u16 {
    const BITS: usize = 16;

    fn to_bits(self) -> u32 {
        self as u32
    }

    fn from_bits(bits: u32) -> Self {
        bits as u16
    }
}

impl Symbol for u32 {
    const BITS: usize = 32;

    fn to_bits(self) -> u32 {
        self
    }

    fn from_bits(bits: u32) -> Self {
        bits
    }
}
