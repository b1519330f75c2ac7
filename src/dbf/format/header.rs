//! DBF table header parsing and text encoding selection.
//!
//! This module handles:
//! - Parsing the fixed 32-byte header at the start of every table
//! - Validating the file type tag
//! - Choosing the transcoder from caller options or the language driver ID

use std::io::Read;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::dbf::codec::encoding::{Codepage, Transcoder};
use crate::dbf::types::{
    error::{DbfError, Result},
    models::{DbfHeader, FileType, LastUpdate},
    options::ReaderOptions,
};
use crate::dbf::utils;

/// Size of the table header in bytes.
pub const HEADER_LENGTH: u16 = 32;
/// Size of one field descriptor in bytes.
pub const DESCRIPTOR_LENGTH: u16 = 32;
/// Index of the language driver ID within the 20 reserved header bytes.
const LANGUAGE_DRIVER_OFFSET: usize = 17;

/// Parses the table header from the beginning of the stream.
///
/// # Header Structure
/// ```text
/// [1 byte ] File type tag
/// [3 bytes] Last update (YY MM DD, year offset from 1900)
/// [4 bytes] Record count (little-endian u32)
/// [2 bytes] Header length (little-endian u16)
/// [2 bytes] Record length (little-endian u16, deletion flag included)
/// [20 bytes] Reserved; byte 17 is the language driver ID
/// ```
pub fn parse<R: Read>(reader: &mut R) -> Result<DbfHeader> {
    let tag = utils::read_u8(reader, "file type")?;
    let file_type = FileType::try_from(tag)?;

    let last_update = LastUpdate::from_raw(utils::read_array::<3>(reader, "last update date")?);
    let records_count = utils::read_u32(reader, "records count")?;
    let header_length = utils::read_u16(reader, "header size")?;
    let record_length = utils::read_u16(reader, "record size")?;
    let reserved = utils::read_array::<20>(reader, "reserved bytes")?;

    // Well-formed tables leave exactly the terminator byte over.
    let descriptor_bytes = header_length.saturating_sub(HEADER_LENGTH);
    let fields_count = descriptor_bytes / DESCRIPTOR_LENGTH;
    if descriptor_bytes % DESCRIPTOR_LENGTH != 1 {
        warn!(
            "Header length {} is not 32 + 32 * n + 1; assuming {} fields",
            header_length, fields_count
        );
    }

    let header = DbfHeader {
        file_type,
        last_update,
        records_count,
        header_length,
        record_length,
        fields_count,
        language_driver_id: reserved[LANGUAGE_DRIVER_OFFSET],
    };

    info!(
        "Header parsed: type='{}', updated={}, records={}, fields={}, record size={}",
        header.file_type, header.last_update, header.records_count, header.fields_count, header.record_length
    );

    Ok(header)
}

/// Picks the transcoder used for field names and character data.
///
/// # Priority Order
/// 1. Transcoder set in `options`
/// 2. Code page mapped from the header's language driver ID
/// 3. Otherwise [`DbfError::EncodingUndetermined`]
pub fn resolve_transcoder(header: &DbfHeader, options: &ReaderOptions) -> Result<Arc<dyn Transcoder>> {
    if let Some(transcoder) = options.shared_transcoder() {
        debug!(
            "Using explicit encoding {} (language driver id {:#04X} ignored)",
            transcoder.name(),
            header.language_driver_id
        );
        return Ok(transcoder);
    }

    match Codepage::from_language_driver_id(header.language_driver_id) {
        Some(codepage) => {
            debug!(
                "Encoding {} inferred from language driver id {:#04X}",
                codepage, header.language_driver_id
            );
            Ok(Arc::new(codepage))
        }
        None => Err(DbfError::EncodingUndetermined {
            language_driver_id: header.language_driver_id,
        }),
    }
}
