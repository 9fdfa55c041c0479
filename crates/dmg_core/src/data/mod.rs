//! Data structures for catalog records.
//!
//! This module contains pure data structures describing species, moves and
//! items. All structs are designed to be deserialized from RON (or any other
//! serde format) by whichever collaborator owns catalog ingestion.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! Lookup and fallback behavior live in [`crate::catalog`].

mod item_data;
mod move_data;
mod species_data;

use serde::{Deserialize, Serialize};

pub use item_data::{ItemData, ItemEffect};
pub use move_data::{MoveCategory, MoveData, MoveRef};
pub use species_data::SpeciesData;

/// A complete catalog as one deserializable document.
///
/// # Example RON
///
/// ```ron
/// CatalogData(
///     species: [
///         SpeciesData(
///             key: "garchomp",
///             display_name: "Garchomp",
///             base_stats: BaseStats(hp: 108, attack: 130, defense: 95,
///                                   sp_attack: 80, sp_defense: 85, speed: 102),
///             types: [Dragon, Ground],
///         ),
///     ],
///     moves: [
///         MoveData(key: "earthquake", display_name: "Earthquake",
///                  power: 100, element: Ground, category: Physical),
///     ],
///     items: [],
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    /// Species records.
    #[serde(default)]
    pub species: Vec<SpeciesData>,
    /// Move records.
    #[serde(default)]
    pub moves: Vec<MoveData>,
    /// Item records.
    #[serde(default)]
    pub items: Vec<ItemData>,
}
