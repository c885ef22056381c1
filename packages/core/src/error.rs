//! Error type and the crate-wide `Result` alias.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::format::Format;

/// Value-or-error container returned by every fallible public operation.
///
/// `Result<()>` is the form used by operations without a success payload.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the model, the visitor engine and the backends.
///
/// Conversion fallbacks and kind mismatches in `set`/`compare` are not
/// errors; they are silent by policy. What remains is caller misuse of the
/// direct-access APIs, backend failures and I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A backend could not read the input.
    #[error("decode error ({format}): {message}")]
    Decode { format: Format, message: String },

    /// A backend could not produce output.
    #[error("encode error ({format}): {message}")]
    Encode { format: Format, message: String },

    /// No codec handles this format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(Format),

    /// Reading or writing a file failed.
    #[error("cannot access file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// List index outside `0..len`.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Map lookup of an absent key.
    #[error("key '{key}' not found")]
    MissingKey { key: String },

    /// Input nests deeper than the configured limit.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthExceeded { limit: usize },

    /// Generic error with message.
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn decode(format: Format, message: impl Display) -> Self {
        Error::Decode {
            format,
            message: message.to_string(),
        }
    }

    pub fn encode(format: Format, message: impl Display) -> Self {
        Error::Encode {
            format,
            message: message.to_string(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn other(message: impl Display) -> Self {
        Error::Other {
            message: message.to_string(),
        }
    }

    /// Re-tag a format-less failure as a decode failure of `format`.
    ///
    /// Errors that already carry a format or a structured cause pass through.
    pub fn into_decode(self, format: &Format) -> Self {
        match self {
            Error::Other { message } => Error::Decode {
                format: format.clone(),
                message,
            },
            other => other,
        }
    }

    /// Re-tag a format-less failure as an encode failure of `format`.
    pub fn into_encode(self, format: &Format) -> Self {
        match self {
            Error::Other { message } => Error::Encode {
                format: format.clone(),
                message,
            },
            other => other,
        }
    }
}

/// Build an [`Error::Other`] from a format string.
///
/// ```rust
/// use structpack_core::{failure, Error};
///
/// let err: Error = failure!("cannot read file {}", "config.json");
/// assert_eq!(err.to_string(), "cannot read file config.json");
/// ```
#[macro_export]
macro_rules! failure {
    ($($arg:tt)*) => {
        $crate::Error::other(format!($($arg)*))
    };
}
