//! Field descriptor array parsing.

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};

use crate::dbf::codec::encoding::{self, Transcoder};
use crate::dbf::types::{
    error::{DbfError, Result},
    models::{DbfHeader, Field, FieldType},
};
use crate::dbf::utils;

/// Byte that ends the field descriptor array.
pub const TERMINATOR: u8 = 0x0D;

/// Parses `header.fields_count` descriptors followed by the terminator byte.
///
/// # Descriptor Structure
/// ```text
/// [11 bytes] Name, NUL padded
/// [1 byte ] Type code
/// [4 bytes] Reserved address (little-endian u32)
/// [1 byte ] Length
/// [1 byte ] Decimal count
/// [14 bytes] Padding
/// ```
pub fn parse<R: Read>(
    reader: &mut R,
    header: &DbfHeader,
    transcoder: &dyn Transcoder,
) -> Result<Vec<Field>> {
    let mut fields = Vec::with_capacity(usize::from(header.fields_count));

    for index in 0..header.fields_count {
        let raw = utils::read_array::<32>(reader, &format!("field {}", index))?;
        let field = parse_descriptor(&raw, transcoder);
        debug!(
            "Field {}: name='{}', type={}, length={}, decimals={}",
            index, field.name, field.field_type, field.length, field.decimal_count
        );
        fields.push(field);
    }

    let terminator = utils::read_u8(reader, "terminator")?;
    if terminator != TERMINATOR {
        return Err(DbfError::InvalidSchema { found: terminator });
    }

    let data_length: usize = fields.iter().map(|f| usize::from(f.length)).sum::<usize>() + 1;
    if data_length != usize::from(header.record_length) {
        warn!(
            "Field lengths add up to {} bytes but records are {} bytes long",
            data_length, header.record_length
        );
    }

    Ok(fields)
}

/// Decodes a single 32-byte field descriptor.
///
/// A name the transcoder rejects is kept as its raw bytes.
fn parse_descriptor(raw: &[u8; 32], transcoder: &dyn Transcoder) -> Field {
    let name_bytes = utils::trim_nul_end(&raw[0..11]);
    Field {
        name: encoding::decode_or_raw(transcoder, name_bytes),
        field_type: FieldType::from(raw[11]),
        memory_address: LittleEndian::read_u32(&raw[12..16]),
        length: raw[16],
        decimal_count: raw[17],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbf::codec::encoding::Codepage;
    use crate::dbf::types::models::{FileType, LastUpdate};

    fn header(fields_count: u16, record_length: u16) -> DbfHeader {
        DbfHeader {
            file_type: FileType::FoxBasePlusNoMemo,
            last_update: LastUpdate::from_raw([124, 1, 1]),
            records_count: 0,
            header_length: 32 + 32 * fields_count + 1,
            record_length,
            fields_count,
            language_driver_id: 0,
        }
    }

    fn descriptor(name: &[u8], tag: u8, length: u8, decimals: u8) -> [u8; 32] {
        let mut raw = [0u8; 32];
        raw[..name.len()].copy_from_slice(name);
        raw[11] = tag;
        raw[12..16].copy_from_slice(&0x0102_0304u32.to_le_bytes());
        raw[16] = length;
        raw[17] = decimals;
        raw
    }

    #[test]
    fn parses_descriptors_in_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&descriptor(b"NAME", b'C', 10, 0));
        bytes.extend_from_slice(&descriptor(b"PRICE", b'N', 8, 2));
        bytes.push(TERMINATOR);

        let fields = parse(&mut bytes.as_slice(), &header(2, 19), &Codepage::Cp866).expect("fields");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "NAME");
        assert_eq!(fields[0].field_type, FieldType::Character);
        assert_eq!(fields[0].memory_address, 0x0102_0304);
        assert_eq!(fields[1].name, "PRICE");
        assert_eq!(fields[1].field_type, FieldType::Numeric);
        assert_eq!(fields[1].length, 8);
        assert_eq!(fields[1].decimal_count, 2);
    }

    #[test]
    fn unknown_type_codes_are_kept() {
        let mut bytes = descriptor(b"BLOB", b'B', 10, 0).to_vec();
        bytes.push(TERMINATOR);
        let fields = parse(&mut bytes.as_slice(), &header(1, 11), &Codepage::Cp866).expect("fields");
        assert_eq!(fields[0].field_type, FieldType::Unknown(b'B'));
    }

    #[test]
    fn names_are_transcoded() {
        // "ИМЯ" in CP866
        let mut bytes = descriptor(&[0x88, 0x8C, 0x9F], b'C', 10, 0).to_vec();
        bytes.push(TERMINATOR);
        let fields = parse(&mut bytes.as_slice(), &header(1, 11), &Codepage::Cp866).expect("fields");
        assert_eq!(fields[0].name, "ИМЯ");
    }

    #[test]
    fn undecodable_names_fall_back_to_raw_bytes() {
        let utf8: &'static encoding_rs::Encoding = encoding_rs::UTF_8;
        let mut bytes = descriptor(&[b'N', 0xFF], b'C', 10, 0).to_vec();
        bytes.push(TERMINATOR);
        let fields = parse(&mut bytes.as_slice(), &header(1, 11), &utf8).expect("fields");
        assert_eq!(fields[0].name, "N\u{FFFD}");
    }

    #[test]
    fn rejects_bad_terminator() {
        let mut bytes = descriptor(b"NAME", b'C', 10, 0).to_vec();
        bytes.push(0x00);
        match parse(&mut bytes.as_slice(), &header(1, 11), &Codepage::Cp866) {
            Err(DbfError::InvalidSchema { found: 0x00 }) => {}
            other => panic!("expected InvalidSchema, got {:?}", other),
        }
    }

    #[test]
    fn missing_terminator_is_truncation() {
        let bytes = descriptor(b"NAME", b'C', 10, 0);
        let err = parse(&mut bytes.as_slice(), &header(1, 11), &Codepage::Cp866).unwrap_err();
        assert!(err.is_truncated());
        assert!(err.to_string().contains("terminator"));
    }
}
