//! kanjidb-sources
//!
//! Parsers for the two character databases: KanjiVG stroke decompositions
//! (`structure`) and KANJIDIC2 readings and meanings (`reference`), plus the
//! hand-curated corrections both need.
pub mod corrections;
pub mod reference;
pub mod structure;
pub mod xml;

use std::fs;
use std::path::Path;
use tracing::info;

use kanjidb_core::traits::SourceParser;
use kanjidb_core::{CharacterStore, Result, SourceKind};

pub use reference::KanjiDicParser;
pub use structure::KanjiVgParser;

/// What one parse call contributed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    pub kind: SourceKind,
    pub seeded: usize,
    pub parsed: usize,
    pub skipped: usize,
}

pub fn parser_for(kind: SourceKind) -> Box<dyn SourceParser> {
    match kind {
        SourceKind::KanjiVg => Box::new(KanjiVgParser::new()),
        SourceKind::KanjiDic => Box::new(KanjiDicParser::new()),
    }
}

/// Parses `document` as the named source type and merges it into `store`.
///
/// Nothing is upserted unless the whole document parses: an unknown type
/// name or broken XML leaves the store untouched.
pub fn parse_into(store: &mut CharacterStore, document: &str, source_type: &str) -> Result<ParseSummary> {
    let kind: SourceKind = source_type.parse()?;
    load_str(store, parser_for(kind).as_ref(), document)
}

/// Reads `path` and merges it into `store` as a `kind` source.
pub fn load_file(store: &mut CharacterStore, path: &Path, kind: SourceKind) -> Result<ParseSummary> {
    info!("Reading {} from {}", kind, path.display());
    let document = fs::read_to_string(path)?;
    load_str(store, parser_for(kind).as_ref(), &document)
}

pub fn load_str(store: &mut CharacterStore, parser: &dyn SourceParser, document: &str) -> Result<ParseSummary> {
    let parsed = parser.parse(document)?;
    let seeds = parser.seeds()?;
    let summary = ParseSummary {
        kind: parser.kind(),
        seeded: seeds.len(),
        parsed: parsed.entities.len(),
        skipped: parsed.skipped,
    };
    for entity in seeds.into_iter().chain(parsed.entities) {
        store.upsert(entity);
    }
    info!(
        "{}: {} characters parsed, {} seeded, {} skipped",
        summary.kind, summary.parsed, summary.seeded, summary.skipped
    );
    Ok(summary)
}
