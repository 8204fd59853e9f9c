/// Where a [`BitCarry`] stands between two pushes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    AccumulatingChunk,
    EmittingChunk,
}

/// Bits left over once the input is exhausted. Reaching it consumes the carry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tail {
    pub bits: usize,
    pub value: u64,
}

impl Tail {
    /// The leftover bits shifted to the top of a full unit, the rest zero-filled.
    pub fn zero_filled(&self, width: usize) -> u64 {
        self.value << (width - self.bits)
    }

    pub fn fill_bits(&self, width: usize) -> usize {
        if self.bits == 0 {
            0
        } else {
            width - self.bits
        }
    }
}

/// Repacks a MSB-first bitstream into units of `width` bits.
///
/// Encoding folds W-bit symbols through a carry of width 6, decoding folds
/// 6-bit groups through a carry of width W. At most `width - 1` bits are
/// pending between pushes, so with pushes of at most 32 bits the pending
/// value always fits in a `u64`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BitCarry {
    width: usize,
    pending_bits: usize,
    pending_value: u64,
    consumed: usize,
}

impl BitCarry {
    pub const fn new(width: usize) -> Self {
        assert!(width > 0 && width <= 32);
        Self {
            width,
            pending_bits: 0,
            pending_value: 0,
            consumed: 0,
        }
    }

    pub fn push(mut self, value: u32, bits: usize, mut emit: impl FnMut(u32)) -> Self {
        debug_assert!(bits <= 32 && (value as u64) >> bits == 0);
        self.pending_value = (self.pending_value << bits) | value as u64;
        self.pending_bits += bits;
        self.consumed += bits;
        while self.pending_bits >= self.width {
            self.pending_bits -= self.width;
            emit((self.pending_value >> self.pending_bits) as u32);
            self.pending_value &= (1 << self.pending_bits) - 1;
        }
        self
    }

    pub fn phase(&self) -> Phase {
        if self.consumed == 0 {
            Phase::Idle
        } else if self.pending_bits == 0 {
            Phase::EmittingChunk
        } else {
            Phase::AccumulatingChunk
        }
    }

    pub fn pending_bits(&self) -> usize {
        self.pending_bits
    }

    /// Bits still missing from the unit under construction.
    pub fn remaining_bits(&self) -> usize {
        self.width - self.pending_bits
    }

    pub fn finish(self) -> Tail {
        Tail {
            bits: self.pending_bits,
            value: self.pending_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BitCarry, Phase, Tail};

    #[test]
    fn straddles_symbols() {
        let mut groups = Vec::new();
        let carry = BitCarry::new(6);
        assert_eq!(carry.phase(), Phase::Idle);
        let carry = carry.push(0x4d, 8, |group| groups.push(group));
        assert_eq!(groups, [0b010011]);
        assert_eq!(carry.phase(), Phase::AccumulatingChunk);
        assert_eq!(carry.pending_bits(), 2);
        assert_eq!(carry.remaining_bits(), 4);
        let carry = carry.push(0x61, 8, |group| groups.push(group));
        assert_eq!(groups, [0b010011, 0b010110]);
        assert_eq!(carry.pending_bits(), 4);
        let carry = carry.push(0x6e, 8, |group| groups.push(group));
        assert_eq!(groups, [0b010011, 0b010110, 0b000101, 0b101110]);
        assert_eq!(carry.phase(), Phase::EmittingChunk);
        assert_eq!(carry.finish(), Tail { bits: 0, value: 0 });
    }

    #[test]
    fn tail() {
        let carry = BitCarry::new(6).push(0x4d, 8, |_| {}).push(0x61, 8, |_| {});
        let tail = carry.finish();
        assert_eq!(tail, Tail { bits: 4, value: 0b0001 });
        assert_eq!(tail.zero_filled(6), 0b000100);
        assert_eq!(tail.fill_bits(6), 2);
    }

    #[test]
    fn wide_units() {
        let mut symbols = Vec::new();
        let carry = [0b111111u32, 0b000000, 0b101010, 0b110011, 0b111100, 0b001111]
            .iter()
            .fold(BitCarry::new(32), |carry, &group| carry.push(group, 6, |symbol| symbols.push(symbol)));
        assert_eq!(symbols, [0b1111_1100_0000_1010_1011_0011_1111_0000]);
        assert_eq!(carry.finish(), Tail { bits: 4, value: 0b1111 });
    }
}
