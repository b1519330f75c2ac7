//! Construction-time configuration for [`DbfReader`](crate::DbfReader).

use std::sync::Arc;

use encoding_rs::Encoding;

use crate::dbf::codec::encoding::{Codepage, Transcoder};

/// Options applied when opening a table.
///
/// There is a single setting, the text transcoder. Every builder method
/// writes the same slot, so when several are chained the last one wins.
/// When no transcoder is set, the encoding is inferred from the header's
/// language driver ID.
///
/// ```
/// use dbf_reader::{Codepage, ReaderOptions, Transcoder};
///
/// let options = ReaderOptions::new().cp1251().with_codepage(Codepage::Cp866);
/// assert_eq!(options.transcoder().map(|t| t.name()), Some("IBM866"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    transcoder: Option<Arc<dyn Transcoder>>,
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a caller-provided transcoder, regardless of the header's hint.
    pub fn with_transcoder(mut self, transcoder: impl Transcoder + 'static) -> Self {
        self.transcoder = Some(Arc::new(transcoder));
        self
    }

    /// Uses one of the `encoding_rs` encodings.
    pub fn with_encoding(self, encoding: &'static Encoding) -> Self {
        self.with_transcoder(encoding)
    }

    /// Uses one of the built-in code pages.
    pub fn with_codepage(self, codepage: Codepage) -> Self {
        self.with_transcoder(codepage)
    }

    pub fn cp437(self) -> Self {
        self.with_codepage(Codepage::Cp437)
    }

    pub fn cp850(self) -> Self {
        self.with_codepage(Codepage::Cp850)
    }

    /// Russian MS-DOS, common in tables written by DOS programs.
    pub fn cp866(self) -> Self {
        self.with_codepage(Codepage::Cp866)
    }

    /// Russian Windows.
    pub fn cp1251(self) -> Self {
        self.with_codepage(Codepage::Cp1251)
    }

    pub fn cp1252(self) -> Self {
        self.with_codepage(Codepage::Cp1252)
    }

    /// Combines two option sets; settings present in `later` replace ours.
    pub fn merge(self, later: ReaderOptions) -> Self {
        Self {
            transcoder: later.transcoder.or(self.transcoder),
        }
    }

    /// The explicitly configured transcoder, if any.
    pub fn transcoder(&self) -> Option<&dyn Transcoder> {
        self.transcoder.as_deref()
    }

    pub(crate) fn shared_transcoder(&self) -> Option<Arc<dyn Transcoder>> {
        self.transcoder.clone()
    }
}
