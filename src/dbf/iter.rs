//! Iterator adapter for sequential access to table records.
//!
//! # Example
//! ```no_run
//! # use dbf_reader::{DbfReader, ReaderOptions};
//! let mut reader = DbfReader::from_path("data.dbf", ReaderOptions::new().cp866()).unwrap();
//! for result in reader.records() {
//!     let record = result.unwrap();
//!     println!("{:?}", record.get("NAME"));
//! }
//! ```

use std::io::Read;

use super::reader::DbfReader;
use super::types::error::Result;
use super::types::models::Record;

/// Iterator over the remaining records of a [`DbfReader`].
///
/// Yields `Ok(record)` for every record read, then stops. If a read fails
/// the error is yielded once and iteration ends; the error stays available
/// through [`DbfReader::err`].
///
/// Created by [`DbfReader::records()`](crate::DbfReader::records).
pub struct RecordIterator<'a, R: Read> {
    reader: &'a mut DbfReader<R>,
    done: bool,
}

impl<'a, R: Read> RecordIterator<'a, R> {
    pub(super) fn new(reader: &'a mut DbfReader<R>) -> Self {
        Self { reader, done: false }
    }
}

impl<R: Read> Iterator for RecordIterator<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.reader.advance() {
            self.done = true;
            // A failure latched before iteration started is still reported once.
            return self.reader.err().cloned().map(Err);
        }

        let result = self.reader.fetch();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = self.reader.records_count().saturating_sub(self.reader.position()) as usize;
        (0, Some(remaining + 1))
    }
}
