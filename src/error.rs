use crate::{base_common::alphabet, repack, utf16};
use std::{error, fmt, io, num::ParseIntError};

/// Error of the layers around the codec: configuration, files, commands, service.
#[derive(Debug)]
pub struct Error {
    message: String,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn context(self, context: impl fmt::Display) -> Self {
        Self {
            message: format!("{}: {}", context, self.message),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", &self.message)
    }
}

impl error::Error for Error {}

macro_rules! impl_from_error {
    ($($error:ty),*) => {
        $(
            impl From<$error> for Error {
                fn from(error: $error) -> Self {
                    Self::new(error.to_string())
                }
            }
        )*
    };
}

impl_from_error!(
    io::Error,
    ParseIntError,
    alphabet::Error,
    repack::bit_width::Error,
    repack::encode::Error,
    repack::decode::Error,
    utf16::Error
);

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::repack::decode;

    #[test]
    fn context() {
        let error = Error::from(decode::Error::TruncatedData).context("input.txt");
        assert_eq!(error.message(), "input.txt: Truncated data");
    }
}
