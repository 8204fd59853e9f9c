use crate::{
    repack::{BitWidth, Decoder, Encoder, BASE64_ALPHABET},
    Logger, PartialLogger, ThreadPool,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
pub struct SelfTest {
    pub width: BitWidth,
    pub cycles: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub seed: u64,
    pub threads: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub cycle: usize,
    pub seed: u64,
    pub length: usize,
    pub reason: String,
}

#[derive(Debug)]
pub struct Report {
    pub cycles: usize,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Encodes then decodes one random sequence, the length drawn from `min_length..min_length + max_length`.
pub fn run_cycle(width: BitWidth, seed: u64, min_length: usize, max_length: usize) -> Result<usize, (usize, String)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let length = min_length + rng.gen_range(0..max_length.max(1));
    let symbols: Vec<u32> = (0..length).map(|_| rng.gen::<u32>() & width.max_symbol()).collect();
    let encoded = Encoder::new(&BASE64_ALPHABET, width)
        .encode(&symbols[..])
        .map_err(|error| (length, error.to_string()))?;
    let decoded: Vec<u32> = Decoder::new(&BASE64_ALPHABET, width)
        .decode(&encoded)
        .map_err(|error| (length, format!("{} while decoding {}", error, encoded)))?;
    match symbols.iter().zip(decoded.iter()).position(|(symbol, decoded)| symbol != decoded) {
        Some(index) => Err((
            length,
            format!("symbol {} decoded as {:#x} instead of {:#x}", index, decoded[index], symbols[index]),
        )),
        None if decoded.len() != symbols.len() => Err((length, format!("{} symbols decoded instead of {}", decoded.len(), length))),
        None => Ok(length),
    }
}

impl SelfTest {
    pub fn run(&self, logger: &Logger) -> Report {
        logger.log(format!(
            "running {} round trips of {}-bit symbols (seed {}, {} threads)",
            self.cycles, self.width, self.seed, self.threads
        ));
        let SelfTest {
            width,
            min_length,
            max_length,
            seed,
            ..
        } = *self;
        let results = ThreadPool::new(
            self.threads,
            move |cycle: usize| {
                let seed = seed.wrapping_add(cycle as u64);
                (cycle, seed, run_cycle(width, seed, min_length, max_length))
            },
            0..self.cycles,
        );
        let mut progress = PartialLogger::new(self.cycles / 10, logger);
        let mut failures = Vec::new();
        for (cycle, seed, result) in results {
            progress.log(|index| format!("{}/{} round trips", index, self.cycles));
            if let Err((length, reason)) = result {
                logger.error(format!("cycle {} (seed {}, length {}): {}", cycle, seed, length, reason));
                failures.push(Failure {
                    cycle,
                    seed,
                    length,
                    reason,
                });
            }
        }
        failures.sort_by_key(|failure| failure.cycle);
        logger.log(format!("{} round trips, {} errors", self.cycles, failures.len()));
        Report {
            cycles: self.cycles,
            failures,
        }
    }
}
