use crate::{
    repack::{BitWidth, Mode},
    Error,
};
use std::{env, error, net::IpAddr};

#[derive(Debug, Clone)]
pub struct Configuration {
    width: BitWidth,
    mode: Mode,
    threads: usize,
    chunk_size: usize,
    cycles: usize,
    min_length: usize,
    max_length: usize,
    seed: Option<u64>,
    host: IpAddr,
    port: u16,
}

fn var(key: &str, default: Option<String>) -> Result<String, Error> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => default.ok_or_else(|| Error::new(format!("Missing {}", key))),
    }
}

fn var_map<T, E: error::Error>(key: &str, mut f: impl FnMut(&str) -> Result<T, E>, default: Option<T>) -> Result<T, Error> {
    match var(key, None) {
        Ok(value) => f(&value).map_err(|error| Error::new(format!("Invalid {} value {} ({})", key, value, error))),
        Err(err) => default.ok_or(err),
    }
}

fn parse_bool(value: &str) -> Result<bool, Error> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::new("expecting true or false")),
    }
}

impl Configuration {
    pub fn new() -> Result<Self, Error> {
        let width = var_map("WIDTH", |width| Ok::<_, Error>(BitWidth::new(width.parse()?)?), Some(BitWidth::BYTE))?;
        let tolerant = var_map("TOLERANT", parse_bool, Some(false))?;
        let threads = var_map("THREADS", |threads| threads.parse::<usize>(), Some(4))?;
        let chunk_size = var_map("CHUNK_SIZE", |chunk_size| chunk_size.parse::<usize>(), Some(786_432))?;
        let cycles = var_map("CYCLES", |cycles| cycles.parse(), Some(10_000))?;
        let min_length = var_map("MIN_LENGTH", |length| length.parse(), Some(10))?;
        let max_length = var_map("MAX_LENGTH", |length| length.parse(), Some(500))?;
        let seed = var_map("SEED", |seed| seed.parse().map(Some), Some(None))?;
        let host = var_map("HOST", |host| host.parse(), Some(IpAddr::from([127, 0, 0, 1])))?;
        let port = var_map("PORT", |port| port.parse(), Some(8000))?;
        if threads == 0 {
            return Err(Error::new("Invalid THREADS value 0"));
        }
        if chunk_size == 0 {
            return Err(Error::new("Invalid CHUNK_SIZE value 0"));
        }
        Ok(Self {
            width,
            mode: if tolerant { Mode::Tolerant } else { Mode::Strict },
            threads,
            chunk_size,
            cycles,
            min_length,
            max_length,
            seed,
            host,
            port,
        })
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::parse_bool;

    #[test]
    fn parse_booleans() {
        assert!(matches!(parse_bool("TRUE"), Ok(true)));
        assert!(matches!(parse_bool("0"), Ok(false)));
        assert!(parse_bool("maybe").is_err());
    }
}
