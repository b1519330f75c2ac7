//! File format parsing layer for DBF tables.
//!
//! # Module Organization
//!
//! - [`header`]: Parses the fixed table header and selects the text encoding
//! - [`fields`]: Parses the field descriptor array
//! - [`record`]: Decodes individual records from the table body
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────────┐
//! │  Header (32 bytes)  │ ← header::parse()
//! ├─────────────────────┤
//! │  Field descriptors  │ ← fields::parse()
//! │  (32 bytes each)    │
//! │  0x0D terminator    │
//! ├─────────────────────┤
//! │  Records            │ ← record::decode_record()
//! │  (fixed width)      │
//! └─────────────────────┘
//! ```

pub mod fields;
pub mod header;
pub mod record;
