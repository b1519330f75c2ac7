//! # dbf-reader
//!
//! A reader for dBase, FoxBASE and Visual FoxPro table files (`.dbf`).
//!
//! Records are decoded to text; character data is transcoded from the
//! table's code page, which is taken from [`ReaderOptions`] or inferred from
//! the header's language driver ID.
//!
//! ```no_run
//! use dbf_reader::{DbfReader, ReaderOptions};
//!
//! let mut reader = DbfReader::from_path("data.dbf", ReaderOptions::new().cp866())?;
//! while reader.advance() {
//!     let record = reader.fetch()?;
//!     println!("{:?} {:?}", record.deleted, record.get("NAME"));
//! }
//! if let Some(err) = reader.err() {
//!     eprintln!("stopped early: {}", err);
//! }
//! # Ok::<(), dbf_reader::DbfError>(())
//! ```
//!
//! **Note:** Memo fields are returned as the raw block reference stored in
//! the table; external memo files are not read.
pub mod dbf;

// Re-export the main types for convenience
pub use dbf::{
    Codepage, DbfError, DbfHeader, DbfReader, Field, FieldType, FileType, LastUpdate, PartialRead,
    ReaderOptions, Record, RecordIterator, Result, Transcoder,
};
