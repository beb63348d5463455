use crate::error::Result;
use crate::types::{CharacterEntity, SourceKind};

/// Partial records read from one source document, in document order.
#[derive(Debug, Default)]
pub struct ParsedSource {
    pub entities: Vec<CharacterEntity>,
    /// Entries dropped as malformed.
    pub skipped: usize,
}

pub trait SourceParser: Send + Sync {
    fn kind(&self) -> SourceKind;
    /// Hand-authored entries for characters the source lacks or gets wrong.
    /// They are upserted before anything parsed from the document.
    fn seeds(&self) -> Result<Vec<CharacterEntity>>;
    fn parse(&self, document: &str) -> Result<ParsedSource>;
}
