//! Hand-curated fixes for gaps in the two databases.

use kanjidb_core::{CharacterEntity, ComponentCounts, Result};

/// A compound component that KanjiVG draws as an untagged stroke group.
///
/// A group counts as `target` when its direct children carry exactly the
/// labels of one of `permutations`, in any order.
#[derive(Debug, Clone, Copy)]
pub struct MissingCompound {
    pub target: &'static str,
    pub permutations: &'static [&'static [&'static str]],
}

pub const MISSING_COMPOUNDS: &[MissingCompound] = &[
    MissingCompound { target: "亲", permutations: &[&["立", "木"]] },
    MissingCompound { target: "㐱", permutations: &[&["彡", "人"], &["㇒", "㇏", "彡"]] },
];

/// Element names that are never counted as components.
pub const IGNORED_ELEMENTS: &[&str] = &[];

/// Element names KanjiVG spells oddly, mapped to the component key used
/// everywhere else.
pub const TRANSLATED_ELEMENTS: &[(&str, &str)] = &[("⿱穴㒸", "穴+㒸")];

pub fn is_ignored(element: &str) -> bool {
    IGNORED_ELEMENTS.contains(&element)
}

pub fn translate(element: &str) -> &str {
    TRANSLATED_ELEMENTS
        .iter()
        .find(|(raw, _)| *raw == element)
        .map_or(element, |(_, canonical)| *canonical)
}

fn counts(pairs: &[(&str, u32)]) -> ComponentCounts {
    pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
}

/// Decompositions for characters KanjiVG lacks.
pub fn structure_seeds() -> Result<Vec<CharacterEntity>> {
    Ok(vec![
        CharacterEntity::new("㐱")?.with_components(counts(&[("人", 1), ("彡", 1), ("丿", 3)])),
        CharacterEntity::new("亲")?.with_components(counts(&[("立", 1), ("木", 1)])),
    ])
}

/// Readings and meanings for characters KANJIDIC2 lacks.
pub fn reference_seeds() -> Result<Vec<CharacterEntity>> {
    Ok(vec![
        CharacterEntity::new("㐱")?.with_readings(["シン"]).with_meanings(["rash"]),
        CharacterEntity::new("亲")?.with_readings(["シン"]).with_meanings(["relative"]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_falls_through_for_unknown_names() {
        assert_eq!(translate("⿱穴㒸"), "穴+㒸");
        assert_eq!(translate("木"), "木");
        assert!(!is_ignored("木"));
    }

    #[test]
    fn seeds_cover_both_sources() {
        let structure = structure_seeds().expect("seeds");
        let reference = reference_seeds().expect("seeds");
        let lits = |v: &[CharacterEntity]| v.iter().map(|e| e.literal().to_string()).collect::<Vec<_>>();
        assert_eq!(lits(&structure), lits(&reference));
        assert!(structure.iter().all(|e| e.components.is_set() && !e.readings.is_set()));
        assert!(reference.iter().all(|e| e.readings.is_set() && !e.components.is_set()));
    }
}
