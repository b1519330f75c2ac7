//! Custom error types for the dbf-reader crate.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use super::models::Record;

/// The primary error type for all operations in this crate.
///
/// Errors are `Clone` because a failed reader keeps returning the same
/// error on every subsequent read.
#[derive(Debug, Clone, Error)]
pub enum DbfError {
    /// The first header byte is not one of the recognized file types.
    #[error("unknown file type: {0:#04X}")]
    InvalidFormat(u8),

    /// The input ended before the named structure was fully read.
    #[error("truncated input while reading {context}")]
    Truncated { context: String },

    /// The underlying stream failed while reading the named structure.
    #[error("I/O error while reading {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: Arc<io::Error>,
    },

    /// No encoding was supplied and the language driver ID is not one we know.
    #[error(
        "unable to determine encoding (language driver id {language_driver_id:#04X}): \
         please specify encoding explicitly using ReaderOptions::with_codepage, \
         with_encoding or with_transcoder"
    )]
    EncodingUndetermined { language_driver_id: u8 },

    /// The byte following the field descriptors is not the 0x0D terminator.
    #[error("invalid field descriptor terminator: {found:#04X}, expected 0x0D")]
    InvalidSchema { found: u8 },

    /// A record was fetched without a successful `advance()` first.
    #[error("no current record: call advance() before fetch()")]
    NoCurrentRecord,
}

impl DbfError {
    /// Wraps an I/O error with the name of the step that failed.
    ///
    /// Short reads become [`DbfError::Truncated`], anything else [`DbfError::Io`].
    pub fn from_io(err: io::Error, context: impl Into<String>) -> Self {
        let context = context.into();
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DbfError::Truncated { context }
        } else {
            DbfError::Io {
                context,
                source: Arc::new(err),
            }
        }
    }

    /// Returns `true` for short-read errors.
    pub fn is_truncated(&self) -> bool {
        matches!(self, DbfError::Truncated { .. })
    }
}

/// Error returned by [`DbfReader::read_all`](crate::DbfReader::read_all).
///
/// Records decoded before the failure are handed back alongside the error.
#[derive(Debug, Clone, Error)]
#[error("read failed after {} records: {error}", .records.len())]
pub struct PartialRead {
    pub records: Vec<Record>,
    #[source]
    pub error: DbfError,
}

/// A convenience `Result` type alias using the crate's `DbfError` type.
pub type Result<T> = std::result::Result<T, DbfError>;
