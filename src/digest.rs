use sha2::{Digest, Sha256};
use std::fmt;

pub fn sha256(buffer: impl AsRef<[u8]>) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(buffer.as_ref()));
    digest
}

pub struct HexSlice<'a> {
    buffer: &'a [u8],
}

impl<'a> HexSlice<'a> {
    pub fn new(buffer: &'a impl AsRef<[u8]>) -> HexSlice<'a> {
        HexSlice { buffer: buffer.as_ref() }
    }
}

impl fmt::Display for HexSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.buffer {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{sha256, HexSlice};

    #[test]
    fn sha256_digest() {
        assert_eq!(
            HexSlice::new(&sha256(b"abc")).to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(sha256(b"abd"), sha256(b"abc"));
    }
}
