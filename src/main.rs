pub mod base64;
pub mod base_common;
pub mod chronometer;
pub mod configuration;
pub mod create_server;
pub mod digest;
pub mod error;
pub mod executor;
pub mod files;
pub mod logger;
pub mod parallel;
pub mod repack;
pub mod selftest;
pub mod sequential_thread_pool;
pub mod server;
pub mod thread_pool;
pub mod utf16;

use self::{
    chronometer::Chronometer,
    configuration::Configuration,
    create_server::{create_server, Service},
    error::Error,
    executor::Executor,
    logger::{Logger, PartialLogger},
    parallel::ParallelCodec,
    repack::{BitWidth, Mode},
    selftest::SelfTest,
    sequential_thread_pool::SequentialThreadPool,
    server::Server,
    thread_pool::ThreadPool,
};
use rand::Rng;
use std::{
    collections::HashMap,
    env,
    io::{self, Read, Write},
    net::SocketAddr,
    process,
    sync::Arc,
};

const USAGE: &str = "usage: repack64 <encode | decode | encode-file <input> <output> | decode-file <input> <output> | roundtrip-file <input> | selftest | serve>";

fn read_stdin() -> Result<Vec<u8>, Error> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input).map_err(|error| Error::from(error).context("stdin"))?;
    Ok(input)
}

fn write_stdout(output: impl AsRef<[u8]>) -> Result<(), Error> {
    let mut stdout = io::stdout();
    stdout
        .write_all(output.as_ref())
        .and_then(|_| stdout.flush())
        .map_err(|error| Error::from(error).context("stdout"))
}

/// Bytes for 8 bits, UTF-8 text for 16 bits, whitespace separated numbers otherwise.
fn encode(width: BitWidth) -> Result<(), Error> {
    let input = read_stdin()?;
    let encoded = match width.bits() {
        8 => base64::encode(&input),
        16 => utf16::encode(std::str::from_utf8(&input).map_err(|_| Error::new("Input is not valid UTF-8"))?),
        bits => {
            let text = String::from_utf8_lossy(&input);
            let symbols = text.split_whitespace().map(str::parse::<u32>).collect::<Result<Vec<_>, _>>()?;
            repack::encode(symbols, bits)?
        }
    };
    write_stdout(encoded + "\n")
}

fn decode(width: BitWidth, mode: Mode) -> Result<(), Error> {
    let input = read_stdin()?;
    let text = files::trim_line_end(&input);
    let output = match (width.bits(), mode) {
        (8, Mode::Strict) => base64::decode(text)?,
        (8, Mode::Tolerant) => base64::Decoder::tolerant().decode(text)?,
        (16, Mode::Strict) => utf16::decode(text)?.into_bytes(),
        (16, Mode::Tolerant) => utf16::decode_tolerant(text)?.into_bytes(),
        (bits, Mode::Strict) => format_symbols(&repack::decode(text, bits)?).into_bytes(),
        (bits, Mode::Tolerant) => format_symbols(&repack::decode_tolerant(text, bits)?).into_bytes(),
    };
    write_stdout(output)
}

fn format_symbols(symbols: &[u32]) -> String {
    let mut output = symbols.iter().map(u32::to_string).collect::<Vec<_>>().join(" ");
    output.push('\n');
    output
}

fn path_argument(arguments: &[String], index: usize) -> Result<&str, Error> {
    arguments
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| Error::new(format!("Missing argument\n{}", USAGE)))
}

fn selftest(configuration: &Configuration, logger: &Logger) -> Result<(), Error> {
    let seed = match configuration.seed() {
        Some(seed) => seed,
        None => rand::thread_rng().gen(),
    };
    let report = SelfTest {
        width: configuration.width(),
        cycles: configuration.cycles(),
        min_length: configuration.min_length(),
        max_length: configuration.max_length(),
        seed,
        threads: configuration.threads(),
    }
    .run(logger);
    if report.passed() {
        Ok(())
    } else {
        Err(Error::new(format!(
            "{} of {} round trips failed (seed {})",
            report.failures.len(),
            report.cycles,
            seed
        )))
    }
}

fn serve(configuration: &Configuration, logger: Logger) -> Result<(), Error> {
    let service = Arc::new(Service::new(configuration.width(), configuration.mode()));
    let address = SocketAddr::new(configuration.host(), configuration.port());
    let mut executor = Executor::new();
    executor.spawn_runtime(service, move |service| async move {
        let server = create_server(service, logger)?;
        server.run(address).await
    });
    executor.join()
}

fn run(arguments: &[String]) -> Result<(), Error> {
    let configuration = Configuration::new()?;
    let command = arguments.get(1).map(String::as_str).unwrap_or_default();
    let logger = Logger::new();
    let codec = ParallelCodec::new(BitWidth::BYTE, configuration.threads(), configuration.chunk_size()).with_mode(configuration.mode());
    match command {
        "encode" => encode(configuration.width()),
        "decode" => decode(configuration.width(), configuration.mode()),
        "encode-file" => files::encode_file(path_argument(arguments, 2)?, path_argument(arguments, 3)?, &codec, &logger).map(|_| ()),
        "decode-file" => files::decode_file(path_argument(arguments, 2)?, path_argument(arguments, 3)?, &codec, &logger).map(|_| ()),
        "roundtrip-file" => {
            let round_trip = files::round_trip_file(path_argument(arguments, 2)?, &codec, &logger)?;
            if round_trip.matches {
                Ok(())
            } else {
                Err(Error::new(format!("{} differs from the input", round_trip.decoded_path.display())))
            }
        }
        "selftest" => selftest(&configuration, &logger),
        "serve" => serve(&configuration, logger),
        "" => Err(Error::new(USAGE)),
        command => Err(Error::new(format!("Unknown command {}\n{}", command, USAGE))),
    }
}

fn main() {
    let arguments: Vec<String> = env::args().collect();
    if let Err(error) = run(&arguments) {
        Logger::quiet().error(error);
        process::exit(1);
    }
}
