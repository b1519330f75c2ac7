//! # Record Decoding
//!
//! Turns one fixed-width record from the table body into a [`Record`].
//!
//! ```text
//! [1 byte ] Deletion flag ('*' = deleted, anything else = active)
//! [n bytes] Field values, back to back in descriptor order
//! ```
//!
//! Field values are decoded leniently: text that does not transcode is kept
//! as raw bytes and unrecognized logical values become an empty string.
//! A record is never rejected because of its contents.

use log::trace;

use crate::dbf::codec::encoding::{self, Transcoder};
use crate::dbf::types::models::{Field, FieldType, Record};

/// Deletion flag value marking a deleted record.
pub const DELETED: u8 = 0x2A;
/// Canonical deletion flag value of an active record.
pub const ACTIVE: u8 = 0x20;

/// Splits `bytes` into the deletion flag and per-field slices and decodes each value.
///
/// Fields extending past the end of `bytes` decode from whatever is left.
pub fn decode_record(bytes: &[u8], fields: &[Field], transcoder: &dyn Transcoder) -> Record {
    let (flag, mut body) = match bytes.split_first() {
        Some((flag, body)) => (*flag, body),
        None => (ACTIVE, bytes),
    };
    if flag != DELETED && flag != ACTIVE {
        trace!("Unexpected deletion flag {:#04X}, treating record as active", flag);
    }

    let mut record = Record::with_capacity(flag == DELETED, fields.len());
    for field in fields {
        let (value, rest) = body.split_at(usize::from(field.length).min(body.len()));
        body = rest;
        record.push(field.name.clone(), decode_value(field.field_type, value, transcoder));
    }
    record
}

/// Decodes one field value according to its type.
pub fn decode_value(field_type: FieldType, raw: &[u8], transcoder: &dyn Transcoder) -> String {
    let trimmed = raw.trim_ascii();

    match field_type {
        FieldType::Numeric | FieldType::Float | FieldType::Date | FieldType::Memo => {
            String::from_utf8_lossy(trimmed).into_owned()
        }
        FieldType::Logical => decode_logical(trimmed).to_string(),
        FieldType::Character | FieldType::Unknown(_) => encoding::decode_or_raw(transcoder, trimmed),
    }
}

fn decode_logical(trimmed: &[u8]) -> &'static str {
    match trimmed.first() {
        Some(b'T' | b't' | b'Y' | b'y') => "true",
        Some(b'F' | b'f' | b'N' | b'n') => "false",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbf::codec::encoding::Codepage;

    fn field(name: &str, tag: u8, length: u8) -> Field {
        Field {
            name: name.to_string(),
            field_type: FieldType::from(tag),
            memory_address: 0,
            length,
            decimal_count: 0,
        }
    }

    #[test]
    fn splits_fields_by_length() {
        let fields = [field("NAME", b'C', 10), field("AGE", b'N', 3), field("BORN", b'D', 8)];
        let record = decode_record(b" John Doe   4219820105", &fields, &Codepage::Cp1252);
        assert!(!record.deleted);
        assert_eq!(record.get("NAME"), Some("John Doe"));
        assert_eq!(record.get("AGE"), Some("42"));
        assert_eq!(record.get("BORN"), Some("19820105"));
    }

    #[test]
    fn deletion_flag() {
        let fields = [field("NAME", b'C', 4)];
        assert!(decode_record(b"*Jane", &fields, &Codepage::Cp1252).deleted);
        assert!(!decode_record(b" Jane", &fields, &Codepage::Cp1252).deleted);
        assert!(!decode_record(b"#Jane", &fields, &Codepage::Cp1252).deleted);
    }

    #[test]
    fn logical_values() {
        for input in [b"T", b"t", b"Y", b"y"] {
            assert_eq!(decode_value(FieldType::Logical, input, &Codepage::Cp1252), "true");
        }
        for input in [b"F", b"f", b"N", b"n"] {
            assert_eq!(decode_value(FieldType::Logical, input, &Codepage::Cp1252), "false");
        }
        for input in [b" ", b"?", b"1"] {
            assert_eq!(decode_value(FieldType::Logical, input, &Codepage::Cp1252), "");
        }
        assert_eq!(decode_value(FieldType::Logical, b"", &Codepage::Cp1252), "");
    }

    #[test]
    fn numeric_values_are_not_reformatted() {
        assert_eq!(decode_value(FieldType::Numeric, b"   12.50", &Codepage::Cp1252), "12.50");
        assert_eq!(decode_value(FieldType::Float, b" -0.000", &Codepage::Cp1252), "-0.000");
        assert_eq!(decode_value(FieldType::Memo, b"0000000012", &Codepage::Cp1252), "0000000012");
    }

    #[test]
    fn unknown_types_decode_as_text() {
        // "Мир" in CP866
        let raw = [0x8C, 0xA8, 0xE0, b' '];
        assert_eq!(decode_value(FieldType::Unknown(b'V'), &raw, &Codepage::Cp866), "Мир");
    }

    #[test]
    fn character_values_fall_back_to_raw_bytes() {
        let utf8: &'static encoding_rs::Encoding = encoding_rs::UTF_8;
        assert_eq!(decode_value(FieldType::Character, b" ok\xFF ", &utf8), "ok\u{FFFD}");
    }

    #[test]
    fn short_record_does_not_panic() {
        let fields = [field("A", b'C', 4), field("B", b'C', 4)];
        let record = decode_record(b" abc", &fields, &Codepage::Cp1252);
        assert_eq!(record.get("A"), Some("abc"));
        assert_eq!(record.get("B"), Some(""));
    }
}
