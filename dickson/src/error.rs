//! Errors reported by the library.

use std::path::PathBuf;

use thiserror::Error;

/// The error type of the `dickson` crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The modulus of a prime field is not a prime.
    #[error("{0} is not a prime")]
    NotPrime(u64),

    /// The modulus does not fit in 32 bits.
    #[error("modulus {0} is too large, it has to fit in 32 bits")]
    ModulusTooLarge(u64),

    /// Reading or writing a file failed.
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        /// The file that was accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A line of a value table could not be parsed.
    #[error("'{}', line {line}: {message}", path.display())]
    Csv {
        /// The file that was read.
        path: PathBuf,
        /// The 1-based line number.
        line: usize,
        /// What is wrong with the line.
        message: String,
    },

    /// There are not enough distinct points to determine the coefficients.
    #[error("a degree {degree} fit needs {needed} distinct points, got {got}")]
    UnderdeterminedFit {
        /// The requested degree.
        degree: usize,
        /// The number of distinct points needed.
        needed: usize,
        /// The number of distinct points available.
        got: usize,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Is this the error for a file that doesn't exist?
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// `Result` with the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
