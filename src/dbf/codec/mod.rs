//! Codec layer for text transcoding.
//!
//! # Submodules
//!
//! - [`encoding`][]: Code page selection and byte-to-text decoding

pub mod encoding;
