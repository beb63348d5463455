//! Keyed collection of merged characters.

use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

use crate::types::CharacterEntity;

/// All characters known to a session, keyed by literal.
///
/// Built empty, grown only through [`CharacterStore::upsert`], never shrunk.
/// Iteration follows the code-point order of the literals.
#[derive(Debug, Default, Clone)]
pub struct CharacterStore {
    characters: BTreeMap<String, CharacterEntity>,
}

impl CharacterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `partial`, or fills the unset fields of the existing entry.
    pub fn upsert(&mut self, partial: CharacterEntity) {
        match self.characters.get_mut(partial.literal()) {
            Some(existing) => {
                trace!(literal = partial.literal(), "merging into existing character");
                existing.merge(partial);
            }
            None => {
                self.characters.insert(partial.literal().to_string(), partial);
            }
        }
    }

    pub fn get(&self, literal: &str) -> Option<&CharacterEntity> {
        self.characters.get(literal)
    }

    /// Every character whose decomposition lists `component`.
    pub fn characters_containing(&self, component: &str) -> Vec<&CharacterEntity> {
        self.characters
            .values()
            .filter(|c| c.contains_component(component))
            .collect()
    }

    /// Union of the component keys of every decomposition.
    pub fn all_components(&self) -> BTreeSet<&str> {
        self.characters
            .values()
            .filter_map(|c| c.components.get())
            .flat_map(|counts| counts.keys().map(String::as_str))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterEntity> {
        self.characters.values()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
