//! Species data structures.

use serde::{Deserialize, Serialize};

use crate::stats::BaseStats;
use crate::types::ElementType;

/// Data-driven species definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    /// Stable identity key used for lookups.
    pub key: String,

    /// Display text. Never used as a lookup key.
    #[serde(default)]
    pub display_name: String,

    /// Base stats.
    pub base_stats: BaseStats,

    /// One or two elemental types, in slot order.
    pub types: Vec<ElementType>,

    /// Abilities this species may have.
    #[serde(default)]
    pub abilities: Vec<String>,
}

impl SpeciesData {
    /// Check if this species has the given type.
    #[must_use]
    pub fn has_type(&self, element: ElementType) -> bool {
        self.types.contains(&element)
    }
}
