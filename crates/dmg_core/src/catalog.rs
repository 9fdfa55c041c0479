//! Catalog lookups consumed by the calculator.
//!
//! The catalog maps stable identity keys to typed species, move and item
//! records. The core only reads it. Misses never fail: every lookup that the
//! resolver depends on has a documented fallback (base stats of 100, no
//! types, a zero-power move).

use std::collections::HashMap;

use crate::data::{CatalogData, ItemData, MoveData, MoveRef, SpeciesData};
use crate::error::{CalcError, Result};
use crate::stats::BaseStats;
use crate::types::{ElementType, TypeChart};

/// Read-only access to species, move and item records.
pub trait Catalog {
    /// Species record by identity key.
    fn species(&self, key: &str) -> Option<&SpeciesData>;

    /// Move record by identity key.
    fn move_data(&self, key: &str) -> Option<&MoveData>;

    /// Item record by identity key.
    fn item(&self, key: &str) -> Option<&ItemData>;

    /// The type-effectiveness chart.
    fn type_chart(&self) -> &TypeChart;

    /// Base stats for a species, or all-100 when unknown.
    fn base_stats(&self, key: &str) -> BaseStats {
        self.species(key).map_or(BaseStats::FALLBACK, |s| s.base_stats)
    }

    /// Types of a species, or none (neutral) when unknown.
    fn types(&self, key: &str) -> &[ElementType] {
        match self.species(key) {
            Some(species) => &species.types,
            None => &[],
        }
    }

    /// Move reference for a key, or a zero-power Normal move when unknown.
    fn move_ref(&self, key: &str) -> MoveRef {
        self.move_data(key)
            .map_or_else(|| MoveRef::fallback(key), MoveData::to_ref)
    }
}

/// In-memory catalog indexed by identity key.
#[derive(Debug, Clone, Default)]
pub struct Dex {
    species: HashMap<String, SpeciesData>,
    moves: HashMap<String, MoveData>,
    items: HashMap<String, ItemData>,
    chart: TypeChart,
}

impl Dex {
    /// Create an empty catalog with the standard type chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a deserialized document.
    ///
    /// # Errors
    ///
    /// Returns an error if two records of the same kind share a key.
    pub fn from_data(data: CatalogData) -> Result<Self> {
        let mut dex = Self::new();
        for species in data.species {
            dex.register_species(species)?;
        }
        for mv in data.moves {
            dex.register_move(mv)?;
        }
        for item in data.items {
            dex.register_item(item)?;
        }
        Ok(dex)
    }

    /// Replace the type chart.
    #[must_use]
    pub fn with_chart(mut self, chart: TypeChart) -> Self {
        self.chart = chart;
        self
    }

    /// Register a species.
    ///
    /// # Errors
    ///
    /// Returns an error if a species with the same key is already registered.
    pub fn register_species(&mut self, data: SpeciesData) -> Result<()> {
        insert_unique(&mut self.species, "species", data.key.clone(), data)
    }

    /// Register a move.
    ///
    /// # Errors
    ///
    /// Returns an error if a move with the same key is already registered.
    pub fn register_move(&mut self, data: MoveData) -> Result<()> {
        insert_unique(&mut self.moves, "move", data.key.clone(), data)
    }

    /// Register an item.
    ///
    /// # Errors
    ///
    /// Returns an error if an item with the same key is already registered.
    pub fn register_item(&mut self, data: ItemData) -> Result<()> {
        insert_unique(&mut self.items, "item", data.key.clone(), data)
    }

    /// Number of registered species.
    #[must_use]
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// Number of registered moves.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Number of registered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Item keys in sorted order.
    pub fn item_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.items.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

fn insert_unique<T>(
    map: &mut HashMap<String, T>,
    kind: &'static str,
    key: String,
    value: T,
) -> Result<()> {
    if map.contains_key(&key) {
        return Err(CalcError::DuplicateCatalogKey { kind, key });
    }
    map.insert(key, value);
    Ok(())
}

impl Catalog for Dex {
    fn species(&self, key: &str) -> Option<&SpeciesData> {
        self.species.get(key)
    }

    fn move_data(&self, key: &str) -> Option<&MoveData> {
        self.moves.get(key)
    }

    fn item(&self, key: &str) -> Option<&ItemData> {
        self.items.get(key)
    }

    fn type_chart(&self) -> &TypeChart {
        &self.chart
    }
}
