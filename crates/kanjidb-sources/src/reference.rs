//! KANJIDIC2 parser: on-readings, untagged (English) meanings and the
//! newspaper frequency rank of every `<character>`.

use tracing::warn;

use kanjidb_core::traits::{ParsedSource, SourceParser};
use kanjidb_core::{CharacterEntity, Result, SourceKind};

use crate::corrections;
use crate::xml::{for_each_element, Element};

const ON_READING: &str = "ja_on";

#[derive(Debug, Default, Clone, Copy)]
pub struct KanjiDicParser;

impl KanjiDicParser {
    pub fn new() -> Self {
        Self
    }

    /// One `<character>` record as a partial character; `None` if it has
    /// no literal.
    pub fn parse_entry(character: &Element) -> Result<Option<CharacterEntity>> {
        let literal = character
            .find("literal")
            .map(|l| l.text_content().trim().to_string())
            .unwrap_or_default();
        if literal.is_empty() {
            warn!("Character record without a literal, skipping");
            return Ok(None);
        }

        let readings: Vec<String> = character
            .descendants()
            .filter(|e| e.name == "reading" && e.attr("r_type") == Some(ON_READING))
            .map(|e| e.text_content().trim().to_string())
            .collect();
        let meanings: Vec<String> = character
            .descendants()
            .filter(|e| e.name == "meaning" && !e.has_attr("m_lang"))
            .map(|e| e.text_content().trim().to_string())
            .collect();

        let mut entity = CharacterEntity::new(literal)?
            .with_readings(readings)
            .with_meanings(meanings);

        if let Some(freq) = character.find("freq") {
            let raw = freq.text_content();
            match raw.trim().parse::<u32>() {
                Ok(rank) => entity = entity.with_frequency(rank),
                Err(_) => warn!("Ignoring unreadable frequency '{}' on {}", raw.trim(), entity.literal()),
            }
        }
        Ok(Some(entity))
    }
}

impl SourceParser for KanjiDicParser {
    fn kind(&self) -> SourceKind {
        SourceKind::KanjiDic
    }

    fn seeds(&self) -> Result<Vec<CharacterEntity>> {
        corrections::reference_seeds()
    }

    fn parse(&self, document: &str) -> Result<ParsedSource> {
        let mut parsed = ParsedSource::default();
        for_each_element(document, "character", |character| {
            match Self::parse_entry(&character)? {
                Some(entity) => parsed.entities.push(entity),
                None => parsed.skipped += 1,
            }
            Ok(())
        })?;
        Ok(parsed)
    }
}
