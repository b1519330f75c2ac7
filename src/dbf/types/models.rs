//! Core data structures for DBF table components.
//!
//! This module defines the fundamental types used throughout the library:
//! - File type tags and the parsed table header
//! - Field descriptors and their type codes
//! - Decoded records

use std::fmt;

use super::error::DbfError;

/// The dialect that produced a DBF file, taken from the first header byte.
///
/// Three families are recognized (FoxBASE/dBASE III, dBASE IV, Visual FoxPro),
/// each with memo, no-memo, autoincrement or varchar variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FileType {
    FoxBase = 0x02,
    FoxBasePlusNoMemo = 0x03,
    VisualFoxPro = 0x30,
    VisualFoxProAutoIncrement = 0x31,
    VisualFoxProVarchar = 0x32,
    DBaseIvSqlTable = 0x43,
    DBaseIvSqlSystem = 0x63,
    FoxBasePlusMemo = 0x83,
    DBaseIvMemo = 0x8B,
    DBaseIvSqlTableMemo = 0xCB,
    HiPerSix = 0xE5,
    FoxPro2 = 0xF5,
}

impl FileType {
    /// The raw tag byte as stored in the file.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Human-readable name of the dialect.
    pub fn description(self) -> &'static str {
        match self {
            FileType::FoxBase => "FoxBASE",
            FileType::FoxBasePlusNoMemo => "FoxBASE+/Dbase III plus, no memo",
            FileType::VisualFoxPro => "Visual FoxPro",
            FileType::VisualFoxProAutoIncrement => "Visual FoxPro, autoincrement enabled",
            FileType::VisualFoxProVarchar => "Visual FoxPro with field type Varchar or Varbinary",
            FileType::DBaseIvSqlTable => "dBASE IV SQL table files, no memo",
            FileType::DBaseIvSqlSystem => "dBASE IV SQL system files, no memo",
            FileType::FoxBasePlusMemo => "FoxBASE+/dBASE III PLUS, with memo",
            FileType::DBaseIvMemo => "dBASE IV with memo",
            FileType::DBaseIvSqlTableMemo => "dBASE IV SQL table files with memo",
            FileType::HiPerSix => "HiPer-Six format with SMT memo file",
            FileType::FoxPro2 => "FoxPro 2.x (or earlier) with memo",
        }
    }
}

impl TryFrom<u8> for FileType {
    type Error = DbfError;
    fn try_from(value: u8) -> Result<Self, DbfError> {
        match value {
            0x02 => Ok(Self::FoxBase),
            0x03 => Ok(Self::FoxBasePlusNoMemo),
            0x30 => Ok(Self::VisualFoxPro),
            0x31 => Ok(Self::VisualFoxProAutoIncrement),
            0x32 => Ok(Self::VisualFoxProVarchar),
            0x43 => Ok(Self::DBaseIvSqlTable),
            0x63 => Ok(Self::DBaseIvSqlSystem),
            0x83 => Ok(Self::FoxBasePlusMemo),
            0x8B => Ok(Self::DBaseIvMemo),
            0xCB => Ok(Self::DBaseIvSqlTableMemo),
            0xE5 => Ok(Self::HiPerSix),
            0xF5 => Ok(Self::FoxPro2),
            _ => Err(DbfError::InvalidFormat(value)),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Date of the last update as stored in the header.
///
/// Month and day are kept exactly as written; no calendar validation is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LastUpdate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl LastUpdate {
    /// Builds a date from the three raw header bytes (`YY MM DD`, year offset from 1900).
    pub fn from_raw(bytes: [u8; 3]) -> Self {
        Self {
            year: 1900 + u16::from(bytes[0]),
            month: bytes[1],
            day: bytes[2],
        }
    }
}

impl fmt::Display for LastUpdate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Parsed 32-byte table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbfHeader {
    pub file_type: FileType,
    pub last_update: LastUpdate,
    /// Number of records in the body, deleted ones included.
    pub records_count: u32,
    /// Length of header plus field descriptors plus terminator.
    pub header_length: u16,
    /// Length of one record, deletion flag included.
    pub record_length: u16,
    /// Derived from `header_length`; any remainder is dropped.
    pub fields_count: u16,
    /// Byte 29 of the file, used to infer the text encoding.
    pub language_driver_id: u8,
}

/// Type code of a field, from byte 11 of its descriptor.
///
/// Unknown codes are kept rather than rejected; they decode as character data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Character,
    Numeric,
    Date,
    Logical,
    Memo,
    Float,
    Unknown(u8),
}

impl FieldType {
    /// The raw type code byte.
    pub fn tag(self) -> u8 {
        match self {
            FieldType::Character => b'C',
            FieldType::Numeric => b'N',
            FieldType::Date => b'D',
            FieldType::Logical => b'L',
            FieldType::Memo => b'M',
            FieldType::Float => b'F',
            FieldType::Unknown(tag) => tag,
        }
    }
}

impl From<u8> for FieldType {
    fn from(tag: u8) -> Self {
        match tag {
            b'C' => Self::Character,
            b'N' => Self::Numeric,
            b'D' => Self::Date,
            b'L' => Self::Logical,
            b'M' => Self::Memo,
            b'F' => Self::Float,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldType::Character => write!(f, "Character"),
            FieldType::Numeric => write!(f, "Numeric"),
            FieldType::Date => write!(f, "Date"),
            FieldType::Logical => write!(f, "Logical"),
            FieldType::Memo => write!(f, "Memo"),
            FieldType::Float => write!(f, "Float"),
            FieldType::Unknown(tag) => write!(f, "Unknown ({})", char::from(*tag)),
        }
    }
}

/// A single column definition from the field descriptor array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    /// Reserved address bytes; not meaningful for on-disk tables.
    pub memory_address: u32,
    pub length: u8,
    pub decimal_count: u8,
}

/// One row of the table.
///
/// Values are decoded text keyed by field name, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub deleted: bool,
    values: Vec<(String, String)>,
}

impl Record {
    pub(crate) fn with_capacity(deleted: bool, capacity: usize) -> Self {
        Self {
            deleted,
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: String, value: String) {
        self.values.push((name, value));
    }

    /// Returns the value of the named field, if the table has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates `(field name, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_round_trips_known_tags() {
        for tag in [0x02u8, 0x03, 0x30, 0x31, 0x32, 0x43, 0x63, 0x83, 0x8B, 0xCB, 0xE5, 0xF5] {
            let file_type = FileType::try_from(tag).expect("known tag");
            assert_eq!(file_type.tag(), tag);
        }
    }

    #[test]
    fn file_type_rejects_unknown_tag() {
        match FileType::try_from(0xFFu8) {
            Err(DbfError::InvalidFormat(0xFF)) => {}
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn field_type_display() {
        assert_eq!(FieldType::from(b'C').to_string(), "Character");
        assert_eq!(FieldType::from(b'F').to_string(), "Float");
        assert_eq!(FieldType::from(b'X').to_string(), "Unknown (X)");
        assert_eq!(FieldType::from(b'X').tag(), b'X');
    }

    #[test]
    fn last_update_keeps_raw_month_and_day() {
        let date = LastUpdate::from_raw([124, 13, 0]);
        assert_eq!(date.year, 2024);
        assert_eq!(date.to_string(), "2024-13-00");
    }

    #[test]
    fn record_lookup_preserves_field_order() {
        let mut record = Record::with_capacity(false, 2);
        record.push("B".to_string(), "2".to_string());
        record.push("A".to_string(), "1".to_string());
        assert_eq!(record.get("A"), Some("1"));
        assert_eq!(record.get("C"), None);
        let names: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["B", "A"]);
    }
}
