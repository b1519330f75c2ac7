//! Text transcoding for character data and field names.
//!
//! DBF files carry no self-describing charset; text is in whatever code page
//! the producing program used. The header's language driver ID hints at it,
//! and callers can always override it.

use std::fmt;

use encoding_rs::{Encoding, IBM866, WINDOWS_1251, WINDOWS_1252};
use log::trace;
use oem_cp::code_table::{DECODING_TABLE_CP437, DECODING_TABLE_CP850};
use oem_cp::decode_string_complete_table;

/// Converts raw bytes of some single-byte code page into text.
pub trait Transcoder: fmt::Debug + Send + Sync {
    /// Short name used for logging and the reader summary.
    fn name(&self) -> &str;

    /// Decodes `bytes`, returning `None` if they are malformed for this encoding.
    fn decode(&self, bytes: &[u8]) -> Option<String>;
}

impl Transcoder for &'static Encoding {
    fn name(&self) -> &str {
        (*self).name()
    }

    fn decode(&self, bytes: &[u8]) -> Option<String> {
        self.decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
    }
}

/// The code pages with built-in support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codepage {
    /// US MS-DOS.
    Cp437,
    /// International MS-DOS.
    Cp850,
    /// Russian MS-DOS.
    Cp866,
    /// Russian Windows.
    Cp1251,
    /// Western European Windows.
    Cp1252,
}

impl Codepage {
    /// Maps a language driver ID from the table header to a code page.
    pub fn from_language_driver_id(ldid: u8) -> Option<Self> {
        match ldid {
            0x01 => Some(Self::Cp437),
            0x02 => Some(Self::Cp850),
            0x03 => Some(Self::Cp1252),
            0x26 => Some(Self::Cp866),
            0x64 | 0x65 | 0xC9 => Some(Self::Cp1251),
            _ => None,
        }
    }

    /// Parses a user-supplied code page name such as `cp866`, `866` or `windows-1251`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let digits = normalized
            .trim_start_matches("windows-")
            .trim_start_matches("cp")
            .trim_start_matches("ibm")
            .trim_start_matches('-');
        match digits {
            "437" => Some(Self::Cp437),
            "850" => Some(Self::Cp850),
            "866" => Some(Self::Cp866),
            "1251" => Some(Self::Cp1251),
            "1252" => Some(Self::Cp1252),
            _ => None,
        }
    }
}

impl Transcoder for Codepage {
    fn name(&self) -> &str {
        match self {
            Codepage::Cp437 => "IBM437",
            Codepage::Cp850 => "IBM850",
            Codepage::Cp866 => IBM866.name(),
            Codepage::Cp1251 => WINDOWS_1251.name(),
            Codepage::Cp1252 => WINDOWS_1252.name(),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Codepage::Cp437 => Some(decode_string_complete_table(bytes, &DECODING_TABLE_CP437)),
            Codepage::Cp850 => Some(decode_string_complete_table(bytes, &DECODING_TABLE_CP850)),
            Codepage::Cp866 => Transcoder::decode(&IBM866, bytes),
            Codepage::Cp1251 => Transcoder::decode(&WINDOWS_1251, bytes),
            Codepage::Cp1252 => Transcoder::decode(&WINDOWS_1252, bytes),
        }
    }
}

impl fmt::Display for Codepage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(Transcoder::name(self))
    }
}

/// Decodes `bytes`, falling back to the raw bytes when the transcoder rejects them.
///
/// Never fails: malformed text is returned as-is (lossily, as UTF-8) instead.
pub fn decode_or_raw(transcoder: &dyn Transcoder, bytes: &[u8]) -> String {
    match transcoder.decode(bytes) {
        Some(text) => text,
        None => {
            trace!(
                "{} rejected {} bytes, keeping raw bytes",
                transcoder.name(),
                bytes.len()
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_driver_table() {
        assert_eq!(Codepage::from_language_driver_id(0x26), Some(Codepage::Cp866));
        assert_eq!(Codepage::from_language_driver_id(0x64), Some(Codepage::Cp1251));
        assert_eq!(Codepage::from_language_driver_id(0x65), Some(Codepage::Cp1251));
        assert_eq!(Codepage::from_language_driver_id(0xC9), Some(Codepage::Cp1251));
        assert_eq!(Codepage::from_language_driver_id(0x03), Some(Codepage::Cp1252));
        assert_eq!(Codepage::from_language_driver_id(0x01), Some(Codepage::Cp437));
        assert_eq!(Codepage::from_language_driver_id(0x02), Some(Codepage::Cp850));
        assert_eq!(Codepage::from_language_driver_id(0x00), None);
        assert_eq!(Codepage::from_language_driver_id(0xFF), None);
    }

    #[test]
    fn labels() {
        assert_eq!(Codepage::from_label("cp866"), Some(Codepage::Cp866));
        assert_eq!(Codepage::from_label("CP1251"), Some(Codepage::Cp1251));
        assert_eq!(Codepage::from_label("windows-1252"), Some(Codepage::Cp1252));
        assert_eq!(Codepage::from_label("IBM437"), Some(Codepage::Cp437));
        assert_eq!(Codepage::from_label("850"), Some(Codepage::Cp850));
        assert_eq!(Codepage::from_label("utf-8"), None);
    }

    #[test]
    fn decodes_cyrillic_code_pages() {
        // "Привет" in CP866 and CP1251
        let cp866 = [0x8F, 0xE0, 0xA8, 0xA2, 0xA5, 0xE2];
        let cp1251 = [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
        assert_eq!(Codepage::Cp866.decode(&cp866).as_deref(), Some("Привет"));
        assert_eq!(Codepage::Cp1251.decode(&cp1251).as_deref(), Some("Привет"));
    }

    #[test]
    fn decodes_dos_code_pages() {
        assert_eq!(Codepage::Cp437.decode(&[0x82, 0x41]).as_deref(), Some("éA"));
        assert_eq!(Codepage::Cp850.decode(&[0x90]).as_deref(), Some("É"));
    }

    #[test]
    fn falls_back_to_raw_bytes_on_malformed_input() {
        let utf8: &'static Encoding = encoding_rs::UTF_8;
        assert_eq!(Transcoder::decode(&utf8, &[0xFF]), None);
        assert_eq!(decode_or_raw(&utf8, b"plain"), "plain");
        assert_eq!(decode_or_raw(&utf8, &[b'a', 0xFF]), "a\u{FFFD}");
    }
}
