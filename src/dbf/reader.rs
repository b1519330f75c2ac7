use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use log::{info, trace, warn};

use super::codec::encoding::Transcoder;
use super::format::{self, record};
use super::iter::RecordIterator;
use super::types::error::{DbfError, PartialRead, Result};
use super::types::models::*;
use super::types::options::ReaderOptions;

/// Where the reader stands in the record body.
#[derive(Debug)]
enum ReadState {
    /// More records may follow. `positioned` is set between a successful
    /// `advance()` and the matching `fetch()`.
    Ready { positioned: bool },
    /// All declared records have been advanced past.
    Exhausted,
    /// A read failed; every later read returns this error.
    Failed(DbfError),
}

/// The main reader for DBF table files.
///
/// Parses the header and field descriptors on construction, then reads
/// records one at a time from the body. Supports both streaming
/// ([`advance`](Self::advance) / [`fetch`](Self::fetch), or
/// [`records`](Self::records)) and bulk ([`read_all`](Self::read_all)) access.
///
/// The reader is single-pass: records are read in file order and cannot be
/// revisited.
#[derive(Debug)]
pub struct DbfReader<R: Read> {
    reader: BufReader<R>,
    header: DbfHeader,
    fields: Vec<Field>,
    transcoder: Arc<dyn Transcoder>,
    buffer: Vec<u8>,
    /// Number of records advanced past so far.
    position: u32,
    state: ReadState,
}

impl DbfReader<File> {
    /// Opens the table at `path`.
    ///
    /// The file is closed when the reader is dropped.
    pub fn from_path(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening DBF file: {}", path.display());
        let file = File::open(path).map_err(|e| DbfError::from_io(e, format!("open {}", path.display())))?;
        Self::new(file, options)
    }
}

impl<R: Read> DbfReader<R> {
    /// Reads the table header and field descriptors from `reader`.
    ///
    /// Priority for determining text encoding (highest → lowest):
    /// 1. Transcoder configured in `options`
    /// 2. Code page inferred from the header's language driver ID
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file type tag is not recognized
    /// - The header or descriptors are cut short
    /// - No encoding was given and the language driver ID is unknown
    /// - The descriptor array does not end with `0x0D`
    pub fn new(reader: R, options: ReaderOptions) -> Result<Self> {
        let mut reader = BufReader::new(reader);

        let header = format::header::parse(&mut reader)?;
        let transcoder = format::header::resolve_transcoder(&header, &options)?;
        let fields = format::fields::parse(&mut reader, &header, transcoder.as_ref())?;

        info!(
            "DBF table opened: {} records, {} fields, encoding {}",
            header.records_count,
            fields.len(),
            transcoder.name()
        );

        Ok(Self {
            reader,
            buffer: vec![0u8; usize::from(header.record_length)],
            header,
            fields,
            transcoder,
            position: 0,
            state: ReadState::Ready { positioned: false },
        })
    }

    pub fn header(&self) -> &DbfHeader {
        &self.header
    }

    pub fn file_type(&self) -> FileType {
        self.header.file_type
    }

    pub fn last_update(&self) -> LastUpdate {
        self.header.last_update
    }

    /// Total number of records in the table, deleted ones included.
    pub fn records_count(&self) -> u32 {
        self.header.records_count
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn fields_count(&self) -> usize {
        self.fields.len()
    }

    /// Name of the encoding used for character data.
    pub fn encoding_name(&self) -> &str {
        self.transcoder.name()
    }

    /// Number of records advanced past so far.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Moves to the next record.
    ///
    /// Returns `false` once every declared record has been visited, or if a
    /// previous read failed; check [`err`](Self::err) to tell them apart.
    /// A record that was advanced to but never fetched is skipped.
    pub fn advance(&mut self) -> bool {
        match self.state {
            ReadState::Failed(_) | ReadState::Exhausted => false,
            ReadState::Ready { positioned } => {
                if positioned {
                    if let Err(err) = self.read_current() {
                        self.fail(err);
                        return false;
                    }
                }
                if self.position >= self.header.records_count {
                    trace!("All {} records visited", self.header.records_count);
                    self.state = ReadState::Exhausted;
                    return false;
                }
                self.position += 1;
                self.state = ReadState::Ready { positioned: true };
                true
            }
        }
    }

    /// Reads and decodes the record selected by the last [`advance`](Self::advance).
    ///
    /// Once a read has failed, the same error is returned without touching
    /// the stream again.
    pub fn fetch(&mut self) -> Result<Record> {
        match &self.state {
            ReadState::Failed(err) => return Err(err.clone()),
            ReadState::Ready { positioned: true } => {}
            ReadState::Ready { positioned: false } | ReadState::Exhausted => {
                return Err(DbfError::NoCurrentRecord);
            }
        }

        if let Err(err) = self.read_current() {
            self.fail(err.clone());
            return Err(err);
        }
        self.state = ReadState::Ready { positioned: false };

        let record = record::decode_record(&self.buffer, &self.fields, self.transcoder.as_ref());
        trace!("Record {} decoded (deleted={})", self.position, record.deleted);
        Ok(record)
    }

    /// Reads every remaining record.
    ///
    /// On failure the records read before the error are returned inside
    /// [`PartialRead`].
    pub fn read_all(&mut self) -> std::result::Result<Vec<Record>, PartialRead> {
        // The declared count is untrusted; don't preallocate for corrupt headers.
        let remaining = self.header.records_count.saturating_sub(self.position) as usize;
        let mut records = Vec::with_capacity(remaining.min(4096));

        while self.advance() {
            match self.fetch() {
                Ok(record) => records.push(record),
                Err(error) => return Err(PartialRead { records, error }),
            }
        }

        match self.err() {
            Some(error) => Err(PartialRead {
                records,
                error: error.clone(),
            }),
            None => Ok(records),
        }
    }

    /// The error that stopped iteration, if any.
    ///
    /// Reaching the end of a complete table is not an error.
    pub fn err(&self) -> Option<&DbfError> {
        match &self.state {
            ReadState::Failed(err) => Some(err),
            ReadState::Ready { .. } | ReadState::Exhausted => None,
        }
    }

    /// Returns an iterator over the remaining records.
    pub fn records(&mut self) -> RecordIterator<'_, R> {
        RecordIterator::new(self)
    }

    /// Gives back the underlying stream.
    ///
    /// Bytes already buffered but not yet decoded are lost.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn read_current(&mut self) -> Result<()> {
        self.reader
            .read_exact(&mut self.buffer)
            .map_err(|e| DbfError::from_io(e, format!("record {}", self.position)))
    }

    fn fail(&mut self, err: DbfError) {
        warn!("Reading stopped at record {}: {}", self.position, err);
        self.state = ReadState::Failed(err);
    }
}

impl<R: Read> fmt::Display for DbfReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "DBF Reader:")?;
        writeln!(f, "  File Type: {}", self.header.file_type)?;
        writeln!(f, "  Last Update: {}", self.header.last_update)?;
        writeln!(f, "  Records Count: {}", self.header.records_count)?;
        writeln!(f, "  Fields Count: {}", self.header.fields_count)?;
        writeln!(f, "  Header Size: {} bytes", self.header.header_length)?;
        writeln!(f, "  Record Size: {} bytes", self.header.record_length)?;
        write!(f, "  Encoding: {}", self.transcoder.name())
    }
}
