use crate::{
    chronometer::format_duration,
    digest::{sha256, HexSlice},
    parallel::ParallelCodec,
    Chronometer, Error, Logger,
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

pub fn read(path: impl AsRef<Path>) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    fs::read(path).map_err(|error| Error::from(error).context(path.display()))
}

pub fn write(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<(), Error> {
    let path = path.as_ref();
    fs::write(path, data).map_err(|error| Error::from(error).context(path.display()))
}

/// Encodes the bytes of `input` into the text file `output`, returns the encoded length.
pub fn encode_file(input: impl AsRef<Path>, output: impl AsRef<Path>, codec: &ParallelCodec, logger: &Logger) -> Result<usize, Error> {
    let data = read(&input)?;
    logger.log(format!("encoding {} bytes from {}", data.len(), input.as_ref().display()));
    let encoded = codec.encode(Arc::<[u8]>::from(data))?;
    write(&output, &encoded)?;
    logger.log(format!("wrote {} characters to {}", encoded.len(), output.as_ref().display()));
    Ok(encoded.len())
}

/// Decodes the text file `input` into the bytes of `output`, returns the decoded length.
pub fn decode_file(input: impl AsRef<Path>, output: impl AsRef<Path>, codec: &ParallelCodec, logger: &Logger) -> Result<usize, Error> {
    let text = read(&input)?;
    logger.log(format!("decoding {} characters from {}", text.len(), input.as_ref().display()));
    let decoded = codec
        .decode::<u8>(Arc::from(trim_line_end(&text)))
        .map_err(|error| Error::from(error).context(input.as_ref().display()))?;
    write(&output, &decoded)?;
    logger.log(format!("wrote {} bytes to {}", decoded.len(), output.as_ref().display()));
    Ok(decoded.len())
}

/// Drops one trailing line break, as left by editors and `echo`.
pub fn trim_line_end(text: &[u8]) -> &[u8] {
    let text = text.strip_suffix(b"\n").unwrap_or(text);
    text.strip_suffix(b"\r").unwrap_or(text)
}

#[derive(Debug)]
pub struct RoundTrip {
    pub encoded_path: PathBuf,
    pub decoded_path: PathBuf,
    pub encode_duration: Duration,
    pub decode_duration: Duration,
    pub digest: [u8; 32],
    pub matches: bool,
}

/// `<input>.txt` and `dec_<file name>`, next to the input.
pub fn round_trip_paths(input: &Path) -> Result<(PathBuf, PathBuf), Error> {
    let file_name = input
        .file_name()
        .ok_or_else(|| Error::new(format!("Not a file path {}", input.display())))?;
    let mut encoded_name = file_name.to_os_string();
    encoded_name.push(".txt");
    let mut decoded_name = std::ffi::OsString::from("dec_");
    decoded_name.push(file_name);
    Ok((input.with_file_name(encoded_name), input.with_file_name(decoded_name)))
}

/// Encodes `input` to text, decodes the text back and compares digests.
pub fn round_trip_file(input: impl AsRef<Path>, codec: &ParallelCodec, logger: &Logger) -> Result<RoundTrip, Error> {
    let input = input.as_ref();
    let (encoded_path, decoded_path) = round_trip_paths(input)?;

    let data = read(input)?;
    let digest = sha256(&data);

    let chronometer = Chronometer::new();
    let encoded = codec.encode(Arc::<[u8]>::from(data))?;
    let encode_duration = chronometer.duration();

    let chronometer = Chronometer::new();
    let decoded = codec.decode::<u8>(Arc::from(encoded.as_bytes()))?;
    let decode_duration = chronometer.duration();

    write(&encoded_path, &encoded)?;
    write(&decoded_path, &decoded)?;

    let matches = sha256(&decoded) == digest;
    logger.log(format!(
        "{}: encoded in {}, decoded in {}, sha256 {} {}",
        input.display(),
        format_duration(encode_duration),
        format_duration(decode_duration),
        HexSlice::new(&digest),
        if matches { "matches" } else { "differs" }
    ));
    Ok(RoundTrip {
        encoded_path,
        decoded_path,
        encode_duration,
        decode_duration,
        digest,
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_file, encode_file, read, round_trip_file, round_trip_paths, trim_line_end, write};
    use crate::repack::{decode, decode::Error};
    use crate::{parallel::ParallelCodec, repack::BitWidth, Logger};
    use std::{fs, path::Path};

    fn directory(name: &str) -> std::path::PathBuf {
        let directory = std::env::temp_dir().join(format!("repack64-{}-{}", name, std::process::id()));
        fs::create_dir_all(&directory).unwrap();
        directory
    }

    #[test]
    fn paths() {
        let (encoded, decoded) = round_trip_paths(Path::new("/tmp/data/BigDB.zip")).unwrap();
        assert_eq!(encoded, Path::new("/tmp/data/BigDB.zip.txt"));
        assert_eq!(decoded, Path::new("/tmp/data/dec_BigDB.zip"));
        assert!(round_trip_paths(Path::new("/")).is_err());
    }

    #[test]
    fn line_end() {
        assert_eq!(trim_line_end(b"TWFu\r\n"), b"TWFu");
        assert_eq!(trim_line_end(b"TWFu\n"), b"TWFu");
        assert_eq!(trim_line_end(b"TWFu\n\n"), b"TWFu\n");
        // byte positions survive invalid UTF-8
        assert_eq!(
            decode(trim_line_end(b"TW\xffu\n"), 8),
            Err(Error::NonAsciiCharacter { character: 0xff, index: 2 })
        );
    }

    #[test]
    fn encode_and_decode_files() {
        let directory = directory("files");
        let codec = ParallelCodec::new(BitWidth::BYTE, 2, 4);
        let logger = Logger::quiet();
        write(directory.join("input"), b"Many hands make light work.").unwrap();
        let encoded = encode_file(directory.join("input"), directory.join("input.txt"), &codec, &logger).unwrap();
        assert_eq!(encoded, 36);
        assert_eq!(read(directory.join("input.txt")).unwrap(), b"TWFueSBoYW5kcyBtYWtlIGxpZ2h0IHdvcmsu");

        let mut text = read(directory.join("input.txt")).unwrap();
        text.extend_from_slice(b"\r\n");
        write(directory.join("input.txt"), &text).unwrap();
        assert_eq!(decode_file(directory.join("input.txt"), directory.join("output"), &codec, &logger).unwrap(), 27);
        assert_eq!(read(directory.join("output")).unwrap(), b"Many hands make light work.");

        write(directory.join("broken.txt"), b"TWF$").unwrap();
        let error = decode_file(directory.join("broken.txt"), directory.join("broken"), &codec, &logger).unwrap_err();
        assert!(error.message().ends_with("Invalid character '$' at index 3"));
        assert!(read(directory.join("missing")).is_err());
        fs::remove_dir_all(directory).unwrap();
    }

    #[test]
    fn round_trip() {
        let directory = directory("round-trip");
        let data: Vec<u8> = (0..10_000u32).map(|index| (index.wrapping_mul(2_654_435_761) >> 24) as u8).collect();
        write(directory.join("data.bin"), &data).unwrap();
        let round_trip = round_trip_file(directory.join("data.bin"), &ParallelCodec::new(BitWidth::BYTE, 4, 999), &Logger::quiet()).unwrap();
        assert!(round_trip.matches);
        assert_eq!(read(&round_trip.decoded_path).unwrap(), data);
        assert_eq!(read(&round_trip.encoded_path).unwrap().len(), 13_336);
        fs::remove_dir_all(directory).unwrap();
    }
}
