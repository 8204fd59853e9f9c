//! Whole-buffer encoding and decoding of large inputs on a worker pool.
//!
//! The input is cut on group boundaries (a whole number of 6-bit groups
//! and of symbols), so every chunk but the last encodes without padding
//! and decodes without leftover bits. The output is identical to the
//! sequential codec, errors included.

use crate::{
    repack::{
        decode::{self, split_padding},
        encode, BitWidth, Decoder, Encoder, Mode, Symbol, BASE64_ALPHABET,
    },
    SequentialThreadPool,
};
use std::{ops::Range, sync::Arc};

#[derive(Copy, Clone, Debug)]
pub struct ParallelCodec {
    width: BitWidth,
    mode: Mode,
    threads: usize,
    chunk_size: usize,
}

impl ParallelCodec {
    pub fn new(width: BitWidth, threads: usize, chunk_size: usize) -> Self {
        let group = width.symbols_per_group();
        Self {
            width,
            mode: Mode::Strict,
            threads: threads.max(1),
            chunk_size: ((chunk_size.max(1) + group - 1) / group) * group,
        }
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    /// Symbols per chunk, a multiple of the symbols in a group.
    pub fn chunk_symbols(&self) -> usize {
        self.chunk_size
    }

    /// Encoded characters per chunk.
    pub fn chunk_characters(&self) -> usize {
        self.chunk_size / self.width.symbols_per_group() * self.width.characters_per_group()
    }

    pub fn encode<S: 'static + Symbol + Send + Sync>(&self, input: Arc<[S]>) -> Result<String, encode::Error> {
        let chunk_size = self.chunk_symbols();
        let ranges: Vec<Range<usize>> = (0..input.len())
            .step_by(chunk_size)
            .map(|start| start..(start + chunk_size).min(input.len()))
            .collect();
        let width = self.width;
        let len = input.len();
        let chunks = SequentialThreadPool::new(
            self.threads,
            move |range: Range<usize>| {
                let mut output = Vec::new();
                let start = range.start;
                Encoder::new(&BASE64_ALPHABET, width)
                    .encode_into(&input[range], &mut output)
                    .map(|_| output)
                    .map_err(|error| match error {
                        encode::Error::SymbolOutOfRange { symbol, index } => encode::Error::SymbolOutOfRange {
                            symbol,
                            index: start + index,
                        },
                        error => error,
                    })
            },
            ranges.into_iter(),
        );
        let mut output = String::with_capacity(encode::encoded_len(len, width));
        for chunk in chunks {
            output.extend(chunk?.into_iter().map(char::from));
        }
        Ok(output)
    }

    pub fn decode<S: 'static + Symbol + Send>(&self, input: Arc<[u8]>) -> Result<Vec<S>, decode::Error> {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        let (data, _) = split_padding(&input)?;
        let chunk_characters = self.chunk_characters();
        let mut ranges = Vec::new();
        let mut start = 0;
        while data.len() - start > chunk_characters {
            ranges.push(start..start + chunk_characters);
            start += chunk_characters;
        }
        ranges.push(start..input.len());

        let decoder = Decoder::new(&BASE64_ALPHABET, self.width).with_mode(self.mode);
        let chunks = SequentialThreadPool::new(
            self.threads,
            move |range: Range<usize>| {
                let mut output: Vec<S> = Vec::new();
                if range.end == input.len() {
                    decoder.decode_last_into(&input[range.clone()], range.start, &mut output)?;
                } else {
                    decoder.decode_aligned_into(&input[range.clone()], range.start, &mut output)?;
                }
                Ok::<_, decode::Error>(output)
            },
            ranges.into_iter(),
        );
        let mut output = Vec::new();
        for chunk in chunks {
            output.extend(chunk?);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::ParallelCodec;
    use crate::repack::{decode, encode, BitWidth, Malformation, Mode};
    use std::sync::Arc;

    fn symbols(length: usize, width: BitWidth) -> Vec<u32> {
        (0..length as u32).map(|index| index.wrapping_mul(0x9e37_79b9) & width.max_symbol()).collect()
    }

    #[test]
    fn chunk_alignment() {
        let codec = ParallelCodec::new(BitWidth::BYTE, 2, 10);
        assert_eq!(codec.chunk_symbols(), 12);
        assert_eq!(codec.chunk_characters(), 16);
        let codec = ParallelCodec::new(BitWidth::UTF16, 2, 3);
        assert_eq!(codec.chunk_symbols(), 3);
        assert_eq!(codec.chunk_characters(), 8);
    }

    #[test]
    fn matches_sequential() {
        for &bits in &[8, 16, 10] {
            let width = BitWidth::new(bits).unwrap();
            let codec = ParallelCodec::new(width, 3, 7);
            for length in 0..60 {
                let input = symbols(length, width);
                let encoded = codec.encode(Arc::from(input.clone())).unwrap();
                assert_eq!(Ok(encoded.clone()), encode(&input, bits));
                assert_eq!(codec.decode::<u32>(Arc::from(encoded.into_bytes())), Ok(input));
            }
        }
    }

    #[test]
    fn errors_match_sequential() {
        let codec = ParallelCodec::new(BitWidth::BYTE, 3, 3);
        for input in ["TWFuTWFuTW$u", "TWFuTWFuT", "TWFu=TWFu", "TWFuTWE", "TWFuTWFu==="] {
            assert_eq!(codec.decode::<u8>(Arc::from(input.as_bytes())).map(|_| ()), decode(input, 8).map(|_| ()));
        }
        assert_eq!(
            codec.decode::<u8>(Arc::from(&b"TWFu=TWFu"[..])),
            Err(decode::Error::MalformedEncoding(Malformation::PaddingNotAtEnd { index: 4 }))
        );
        let tolerant = codec.with_mode(Mode::Tolerant);
        assert_eq!(tolerant.decode::<u8>(Arc::from(&b"TWFuTWFuT"[..])), Ok(b"ManMan".to_vec()));
        assert_eq!(
            codec.encode(Arc::from(vec![0u32, 1, 2, 3, 0x100])),
            Err(crate::repack::encode::Error::SymbolOutOfRange { symbol: 0x100, index: 4 })
        );
    }
}
