//! KanjiVG stroke-decomposition parser.
//!
//! Each `<kanji>` holds one top-level `<g>` naming the character; every
//! nested `<g>` with a `kvg:element` is a component. Untagged groups are
//! checked against [`MISSING_COMPOUNDS`](crate::corrections::MISSING_COMPOUNDS).

use tracing::warn;

use kanjidb_core::traits::{ParsedSource, SourceParser};
use kanjidb_core::{CharacterEntity, ComponentCounts, RadicalClass, Result, SourceKind};

use crate::corrections::{self, MISSING_COMPOUNDS};
use crate::xml::{for_each_element, Element};

const ELEMENT: &str = "kvg:element";
const STROKE_TYPE: &str = "kvg:type";
const RADICAL: &str = "kvg:radical";

#[derive(Debug, Default, Clone, Copy)]
pub struct KanjiVgParser;

impl KanjiVgParser {
    pub fn new() -> Self {
        Self
    }

    /// One `<kanji>` entry as a partial character; `None` if malformed.
    pub fn parse_entry(kanji: &Element) -> Result<Option<CharacterEntity>> {
        let id = kanji.attr("id").unwrap_or("?");
        let roots: Vec<&Element> = kanji.child_elements().filter(|e| e.name == "g").collect();
        let [root] = roots.as_slice() else {
            warn!("Kanji entry {} has {} main groups instead of 1, skipping", id, roots.len());
            return Ok(None);
        };
        let Some(literal) = root.attr(ELEMENT).filter(|l| !l.is_empty()) else {
            warn!("Kanji entry {} has no element name on its main group, skipping", id);
            return Ok(None);
        };

        let mut entity = CharacterEntity::new(literal)?;
        if let Some(raw) = root.attr(RADICAL) {
            let radical = RadicalClass::from_tag(raw).unwrap_or_else(|| {
                warn!("Unknown radical type of '{}' on {}", raw, literal);
                RadicalClass::Unknown
            });
            entity = entity.with_radical(radical);
        }
        Ok(Some(entity.with_components(decompose(root))))
    }
}

impl SourceParser for KanjiVgParser {
    fn kind(&self) -> SourceKind {
        SourceKind::KanjiVg
    }

    fn seeds(&self) -> Result<Vec<CharacterEntity>> {
        corrections::structure_seeds()
    }

    fn parse(&self, document: &str) -> Result<ParsedSource> {
        let mut parsed = ParsedSource::default();
        for_each_element(document, "kanji", |kanji| {
            match Self::parse_entry(&kanji)? {
                Some(entity) => parsed.entities.push(entity),
                None => parsed.skipped += 1,
            }
            Ok(())
        })?;
        Ok(parsed)
    }
}

fn decompose(root: &Element) -> ComponentCounts {
    let mut counts = ComponentCounts::new();
    for group in root.descendants().filter(|e| e.name == "g") {
        match group.attr(ELEMENT).filter(|e| !e.is_empty()) {
            Some(element) => {
                if corrections::is_ignored(element) {
                    continue;
                }
                *counts.entry(corrections::translate(element).to_string()).or_insert(0) += 1;
            }
            None => {
                for missing in MISSING_COMPOUNDS {
                    for permutation in missing.permutations {
                        if children_match(group, permutation) {
                            *counts.entry(missing.target.to_string()).or_insert(0) += 1;
                        }
                    }
                }
            }
        }
    }
    counts
}

// Multiset comparison of the direct children's labels against `permutation`.
fn children_match(group: &Element, permutation: &[&str]) -> bool {
    let children: Vec<&Element> = group.child_elements().collect();
    if children.len() != permutation.len() {
        return false;
    }
    let mut remaining = permutation.to_vec();
    for child in children {
        let Some(label) = child.attr(ELEMENT).or_else(|| child.attr(STROKE_TYPE)) else {
            return false;
        };
        match remaining.iter().position(|p| *p == label) {
            Some(i) => {
                remaining.swap_remove(i);
            }
            None => return false,
        }
    }
    true
}
