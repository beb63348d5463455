use std::collections::BTreeSet;
use tracing::{debug, warn};

use kanjidb_core::{AnalysisRow, CharacterEntity, CharacterStore};

/// Rows for one component plus the characters that had no reading data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentAnalysis {
    pub rows: Vec<AnalysisRow>,
    pub missing_readings: BTreeSet<String>,
}

/// Rows for every component in the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub rows: Vec<AnalysisRow>,
    pub missing_readings: BTreeSet<String>,
    pub components: usize,
}

impl AnalysisReport {
    pub fn absorb(&mut self, analysis: ComponentAnalysis) {
        self.components += 1;
        self.rows.extend(analysis.rows);
        self.missing_readings.extend(analysis.missing_readings);
    }

    /// Logs one warning naming every character that lacked readings.
    pub fn warn_missing(&self) {
        if self.missing_readings.is_empty() {
            return;
        }
        let literals: String = self.missing_readings.iter().map(String::as_str).collect();
        warn!(
            "The following {} characters were missing reading data:\n{}",
            self.missing_readings.len(),
            literals
        );
    }
}

pub struct ComponentAnalyzer<'a> {
    store: &'a CharacterStore,
}

impl<'a> ComponentAnalyzer<'a> {
    pub fn new(store: &'a CharacterStore) -> Self {
        Self { store }
    }

    /// Predicts the reading(s) of `component` from the characters built
    /// from it. Every reading sharing the top tally gets its own row.
    pub fn analyze(&self, component: &str) -> ComponentAnalysis {
        let mut analysis = ComponentAnalysis::default();
        let characters = self.store.characters_containing(component);
        if characters.is_empty() {
            return analysis;
        }

        // first-seen order, so ties come out in a stable order
        let mut tally: Vec<(&str, usize)> = Vec::new();
        for character in &characters {
            let Some(readings) = character.readings.get() else {
                analysis.missing_readings.insert(character.literal().to_string());
                continue;
            };
            for reading in readings {
                match tally.iter_mut().find(|(r, _)| *r == reading.as_str()) {
                    Some((_, count)) => *count += 1,
                    None => tally.push((reading.as_str(), 1)),
                }
            }
        }

        if !analysis.missing_readings.is_empty() {
            debug!(
                "{}: {} characters missing readings",
                component,
                analysis.missing_readings.len()
            );
        }

        let Some(top) = tally.iter().map(|(_, count)| *count).max() else {
            debug!("{}: no readings on any of its {} characters", component, characters.len());
            return analysis;
        };

        analysis.rows = tally
            .iter()
            .filter(|(_, count)| *count == top)
            .map(|(reading, _)| self.row(component, reading, &characters))
            .collect();
        analysis
    }

    /// Runs [`analyze`](Self::analyze) for every known component and warns
    /// once about all characters lacking readings.
    pub fn analyze_all(&self) -> AnalysisReport {
        let mut report = AnalysisReport::default();
        for component in self.store.all_components() {
            report.absorb(self.analyze(component));
        }
        report.warn_missing();
        report
    }

    fn row(&self, component: &str, reading: &str, characters: &[&CharacterEntity]) -> AnalysisRow {
        let mut kanji_in_series = Vec::new();
        let mut kanji_with_extra_readings = Vec::new();
        for character in characters {
            let Some(readings) = character.readings.get() else {
                continue;
            };
            if !readings.iter().any(|r| r == reading) {
                continue;
            }
            if readings.len() == 1 {
                kanji_in_series.push(character.literal().to_string());
            } else {
                kanji_with_extra_readings.push(character.literal().to_string());
            }
        }

        let with_reading = kanji_in_series.len() + kanji_with_extra_readings.len();
        AnalysisRow {
            component: component.to_string(),
            frequency: self
                .store
                .get(component)
                .and_then(|c| c.frequency.get().copied()),
            reading: reading.to_string(),
            kanji_in_series,
            kanji_with_extra_readings,
            coverage: with_reading as f64 / characters.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanjidb_core::ComponentCounts;

    fn with_x(literal: &str) -> CharacterEntity {
        let mut counts = ComponentCounts::new();
        counts.insert("X".to_string(), 1);
        CharacterEntity::new(literal).expect("entity").with_components(counts)
    }

    #[test]
    fn unknown_component_gives_no_rows() {
        let store = CharacterStore::new();
        let analysis = ComponentAnalyzer::new(&store).analyze("X");
        assert!(analysis.rows.is_empty());
        assert!(analysis.missing_readings.is_empty());
    }

    #[test]
    fn ties_each_get_a_row() {
        let mut store = CharacterStore::new();
        store.upsert(with_x("一").with_readings(["カ"]));
        store.upsert(with_x("二").with_readings(["カ", "キ"]));
        store.upsert(with_x("三").with_readings(["キ"]));

        let rows = ComponentAnalyzer::new(&store).analyze("X").rows;
        assert_eq!(rows.len(), 2);

        let ka = rows.iter().find(|r| r.reading == "カ").expect("カ row");
        assert_eq!(ka.kanji_in_series, vec!["一"]);
        assert_eq!(ka.kanji_with_extra_readings, vec!["二"]);
        assert!((ka.coverage - 2.0 / 3.0).abs() < 1e-12);

        let ki = rows.iter().find(|r| r.reading == "キ").expect("キ row");
        assert_eq!(ki.kanji_in_series, vec!["三"]);
        assert_eq!(ki.kanji_with_extra_readings, vec!["二"]);
        assert!((ki.coverage - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn only_the_top_tally_survives() {
        let mut store = CharacterStore::new();
        store.upsert(with_x("一").with_readings(["カ"]));
        store.upsert(with_x("二").with_readings(["カ", "キ"]));
        store.upsert(with_x("三").with_readings(["カ"]));
        store.upsert(with_x("四").with_readings(["コ"]));

        let rows = ComponentAnalyzer::new(&store).analyze("X").rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reading, "カ");
        assert_eq!(rows[0].size(), 2);
        assert!((rows[0].coverage - 0.75).abs() < 1e-12);
    }

    #[test]
    fn missing_readings_lower_coverage_and_are_reported() {
        let mut store = CharacterStore::new();
        store.upsert(with_x("一").with_readings(["カ"]));
        store.upsert(with_x("二"));
        store.upsert(with_x("三").with_readings(Vec::<String>::new()));

        let analysis = ComponentAnalyzer::new(&store).analyze("X");
        assert_eq!(analysis.missing_readings.iter().collect::<Vec<_>>(), vec!["二"]);
        assert_eq!(analysis.rows.len(), 1);
        assert!((analysis.rows[0].coverage - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_readings_at_all_gives_no_rows() {
        let mut store = CharacterStore::new();
        store.upsert(with_x("一"));
        store.upsert(with_x("二").with_readings(Vec::<String>::new()));

        let analysis = ComponentAnalyzer::new(&store).analyze("X");
        assert!(analysis.rows.is_empty());
        assert_eq!(analysis.missing_readings.len(), 1);
    }

    #[test]
    fn component_frequency_comes_from_its_own_entry() {
        let mut store = CharacterStore::new();
        store.upsert(with_x("一").with_readings(["カ"]));
        store.upsert(CharacterEntity::new("X").expect("entity").with_frequency(42));
        let rows = ComponentAnalyzer::new(&store).analyze("X").rows;
        assert_eq!(rows[0].frequency, Some(42));
    }

    #[test]
    fn analyze_all_unions_missing_sets() {
        let mut store = CharacterStore::new();
        let mut counts = ComponentCounts::new();
        counts.insert("Y".to_string(), 1);
        store.upsert(with_x("一").with_readings(["カ"]));
        store.upsert(with_x("二"));
        store.upsert(CharacterEntity::new("三").expect("entity").with_components(counts));

        let report = ComponentAnalyzer::new(&store).analyze_all();
        assert_eq!(report.components, 2);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(
            report.missing_readings.into_iter().collect::<Vec<_>>(),
            vec!["三".to_string(), "二".to_string()]
        );
    }
}
