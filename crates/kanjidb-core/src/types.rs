//! Domain types shared by the source parsers, the store and the analyzer.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::rounding;

/// Component literal -> number of times it occurs in one decomposition.
pub type ComponentCounts = BTreeMap<String, u32>;

/// A record field that is filled at most once.
///
/// `fill` only ever moves a field from `Unset` to `Value`; a field that
/// already holds a value keeps it no matter what is offered later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Unset,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unset
    }
}

impl<T> Field<T> {
    pub fn fill(&mut self, incoming: Field<T>) {
        if let Field::Unset = self {
            *self = incoming;
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Field::Value(_))
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            Field::Unset => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Value(v) => Some(v),
            Field::Unset => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Unset, Field::Value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

/// Radical classification attached to a character by the stroke source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RadicalClass {
    Unknown,
    General,
    Nelson,
    Tradit,
}

impl RadicalClass {
    /// Maps a raw `kvg:radical` value. Unrecognised tags return `None`;
    /// callers decide whether to fall back to `Unknown`.
    pub fn from_tag(raw: &str) -> Option<Self> {
        match raw {
            "general" => Some(RadicalClass::General),
            "nelson" => Some(RadicalClass::Nelson),
            "tradit" => Some(RadicalClass::Tradit),
            _ => None,
        }
    }
}

impl fmt::Display for RadicalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RadicalClass::Unknown => "unknown",
            RadicalClass::General => "general",
            RadicalClass::Nelson => "nelson",
            RadicalClass::Tradit => "tradit",
        };
        f.write_str(s)
    }
}

/// The two supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceKind {
    /// Stroke decomposition trees (KanjiVG).
    KanjiVg,
    /// Readings, meanings and frequency ranks (KANJIDIC2).
    KanjiDic,
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "kanjivg" => Ok(SourceKind::KanjiVg),
            "kanjidic" | "kanjidic2" => Ok(SourceKind::KanjiDic),
            _ => Err(Error::UnrecognizedSourceType(s.to_string())),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::KanjiVg => f.write_str("KANJI_VG"),
            SourceKind::KanjiDic => f.write_str("KANJI_DIC"),
        }
    }
}

/// 5-digit zero-padded lowercase hex of a code point, as used by KanjiVG
/// asset file names.
pub fn codepoint_hex(c: char) -> String {
    format!("{:05x}", u32::from(c))
}

/// One hex key per code point of `s`.
pub fn codepoint_hex_str(s: &str) -> Vec<String> {
    s.chars().map(codepoint_hex).collect()
}

/// The merged per-character record.
///
/// `literal` and `codepoint_hex` are fixed at construction; every other
/// field follows the fill-once rule of [`Field`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterEntity {
    literal: String,
    #[serde(rename = "hex")]
    codepoint_hex: String,
    pub radical: Field<RadicalClass>,
    pub components: Field<ComponentCounts>,
    pub readings: Field<Vec<String>>,
    pub meanings: Field<Vec<String>>,
    pub frequency: Field<u32>,
}

impl CharacterEntity {
    pub fn new(literal: impl Into<String>) -> Result<Self> {
        let literal = literal.into();
        let first = literal
            .chars()
            .next()
            .ok_or_else(|| Error::MalformedInput("character literal is empty".to_string()))?;
        Ok(Self {
            codepoint_hex: codepoint_hex(first),
            literal,
            radical: Field::Unset,
            components: Field::Unset,
            readings: Field::Unset,
            meanings: Field::Unset,
            frequency: Field::Unset,
        })
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn codepoint_hex(&self) -> &str {
        &self.codepoint_hex
    }

    pub fn with_radical(mut self, radical: RadicalClass) -> Self {
        self.radical = Field::Value(radical);
        self
    }

    pub fn with_components(mut self, components: ComponentCounts) -> Self {
        self.components = Field::Value(components);
        self
    }

    pub fn with_readings<I, S>(mut self, readings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.readings = Field::Value(readings.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_meanings<I, S>(mut self, meanings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meanings = Field::Value(meanings.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = Field::Value(frequency);
        self
    }

    /// Applies the fill-once rule field by field. `partial` is expected to
    /// describe the same literal.
    pub fn merge(&mut self, partial: CharacterEntity) {
        self.radical.fill(partial.radical);
        self.components.fill(partial.components);
        self.readings.fill(partial.readings);
        self.meanings.fill(partial.meanings);
        self.frequency.fill(partial.frequency);
    }

    pub fn contains_component(&self, component: &str) -> bool {
        self.components
            .get()
            .is_some_and(|counts| counts.contains_key(component))
    }
}

/// One predicted reading for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub component: String,
    /// Frequency rank of the component itself when it is also a character.
    pub frequency: Option<u32>,
    pub reading: String,
    /// Characters whose only reading is `reading`.
    pub kanji_in_series: Vec<String>,
    /// Characters that list `reading` among several.
    pub kanji_with_extra_readings: Vec<String>,
    /// Share of all characters containing the component that list `reading`.
    pub coverage: f64,
}

impl AnalysisRow {
    pub fn size(&self) -> usize {
        self.kanji_in_series.len()
    }

    /// Coverage as a percentage string, e.g. `66.67%`.
    pub fn coverage_percent(&self, decimal_places: u32) -> Result<String> {
        let rounded = rounding::round(self.coverage * 100.0, decimal_places)?;
        Ok(format!("{rounded}%"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_five_digits_lowercase() {
        assert_eq!(codepoint_hex('人'), "04eba");
        assert_eq!(codepoint_hex('a'), "00061");
        assert_eq!(codepoint_hex_str("亜人"), vec!["04e9c", "04eba"]);
        let e = CharacterEntity::new("㐱").expect("entity");
        assert_eq!(e.codepoint_hex(), "03431");
    }

    #[test]
    fn empty_literal_is_rejected() {
        assert!(matches!(CharacterEntity::new(""), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn merge_only_fills_unset_fields() {
        let mut first = CharacterEntity::new("人")
            .expect("entity")
            .with_readings(["ジン"])
            .with_frequency(5);
        let second = CharacterEntity::new("人")
            .expect("entity")
            .with_readings(["ニン"])
            .with_meanings(["person"])
            .with_frequency(99);
        first.merge(second);
        assert_eq!(first.readings.get(), Some(&vec!["ジン".to_string()]));
        assert_eq!(first.frequency.get(), Some(&5));
        assert_eq!(first.meanings.get(), Some(&vec!["person".to_string()]));
        assert!(!first.components.is_set());
    }

    #[test]
    fn source_kind_names() {
        assert_eq!("KANJI_VG".parse::<SourceKind>().expect("vg"), SourceKind::KanjiVg);
        assert_eq!("kanjidic2".parse::<SourceKind>().expect("dic"), SourceKind::KanjiDic);
        assert!(matches!(
            "UNIHAN".parse::<SourceKind>(),
            Err(Error::UnrecognizedSourceType(name)) if name == "UNIHAN"
        ));
    }

    #[test]
    fn radical_tags() {
        assert_eq!(RadicalClass::from_tag("nelson"), Some(RadicalClass::Nelson));
        assert_eq!(RadicalClass::from_tag("weird"), None);
    }

    #[test]
    fn unset_fields_serialize_as_null() {
        let e = CharacterEntity::new("人").expect("entity").with_frequency(3);
        let json = serde_json::to_value(&e).expect("json");
        assert_eq!(json["hex"], "04eba");
        assert_eq!(json["frequency"], 3);
        assert!(json["readings"].is_null());
    }

    #[test]
    fn coverage_percent_rounds_to_places() {
        let row = AnalysisRow {
            component: "X".into(),
            frequency: None,
            reading: "カ".into(),
            kanji_in_series: vec![],
            kanji_with_extra_readings: vec![],
            coverage: 2.0 / 3.0,
        };
        assert_eq!(row.coverage_percent(2).expect("round"), "66.67%");
    }
}
