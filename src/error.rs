//! All error types for the langtab crate.
//!
//! These are returned from all fallible operations (catalog parsing, discovery,
//! table compilation, etc.). Lookup misses at translation time are not errors;
//! they resolve through the fallback rules instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog root `{0}` is not a directory")]
    NotDirectory(PathBuf),

    #[error("no catalog files found under `{0}`")]
    NoCatalogs(PathBuf),

    #[error("catalog file `{0}` is not valid UTF-8")]
    NonUtf8Catalog(PathBuf),

    #[error("malformed value for key `{key}` in `{path}`: {reason}")]
    MalformedValue {
        path: PathBuf,
        key: String,
        reason: String,
    },

    #[error("no values defined for type `{0}`")]
    EmptySymbolSet(String),

    #[error("duplicate symbol set `{0}`")]
    DuplicateSymbolSet(String),

    #[error("default locale `{locale}` is not among the discovered locales [{supported}]")]
    UnknownDefaultLocale { locale: String, supported: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Creates a read error that keeps the offending path in the message.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a malformed-value error naming the file path and the offending key.
    pub fn malformed_value(
        path: impl Into<PathBuf>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedValue {
            path: path.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown-default-locale error listing the locales that exist.
    pub fn unknown_default_locale(locale: impl Into<String>, supported: &[String]) -> Self {
        Error::UnknownDefaultLocale {
            locale: locale.into(),
            supported: supported.join(", "),
        }
    }
}
