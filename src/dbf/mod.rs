//! Core DBF reader module

pub mod codec;
pub mod format;
pub mod iter;
pub mod reader;
pub mod types;
mod utils;

pub use codec::encoding::{Codepage, Transcoder};
pub use iter::RecordIterator;
pub use reader::DbfReader;
pub use types::error::{DbfError, PartialRead, Result};
pub use types::models::{DbfHeader, Field, FieldType, FileType, LastUpdate, Record};
pub use types::options::ReaderOptions;
