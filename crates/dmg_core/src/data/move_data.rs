//! Move data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stats::StatKind;
use crate::types::ElementType;

/// Damage category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MoveCategory {
    /// Uses attack vs defense.
    #[default]
    Physical,
    /// Uses special attack vs special defense.
    Special,
    /// Deals no damage.
    Status,
}

impl MoveCategory {
    /// Offensive and defensive stats used by this category.
    ///
    /// Status moves fall back to the physical pair; they never reach the
    /// damage formula because their power is zero.
    #[must_use]
    pub const fn stat_pair(self) -> (StatKind, StatKind) {
        match self {
            Self::Special => (StatKind::SpAttack, StatKind::SpDefense),
            Self::Physical | Self::Status => (StatKind::Attack, StatKind::Defense),
        }
    }
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Physical => "Physical",
            Self::Special => "Special",
            Self::Status => "Status",
        })
    }
}

/// Catalog record for a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    /// Stable identity key used for lookups.
    pub key: String,

    /// Display text.
    #[serde(default)]
    pub display_name: String,

    /// Base power. Zero means the move deals no damage.
    pub power: u32,

    /// Elemental type.
    pub element: ElementType,

    /// Damage category.
    pub category: MoveCategory,
}

impl MoveData {
    /// Lightweight reference for the damage resolver.
    #[must_use]
    pub fn to_ref(&self) -> MoveRef {
        MoveRef {
            name: self.key.clone(),
            power: self.power,
            element: self.element,
            category: self.category,
        }
    }
}

/// The move fields the damage resolver needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRef {
    /// Move identity key (or a free-form label for ad hoc moves).
    pub name: String,
    /// Base power (0 ⇒ non-damaging).
    pub power: u32,
    /// Elemental type.
    pub element: ElementType,
    /// Damage category.
    pub category: MoveCategory,
}

impl MoveRef {
    /// Create a move reference.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        power: u32,
        element: ElementType,
        category: MoveCategory,
    ) -> Self {
        Self {
            name: name.into(),
            power,
            element,
            category,
        }
    }

    /// Reference used when a move key is unknown: zero power, Normal, Physical.
    #[must_use]
    pub fn fallback(name: impl Into<String>) -> Self {
        Self::new(name, 0, ElementType::Normal, MoveCategory::Physical)
    }

    /// Whether this move can deal damage.
    #[must_use]
    pub const fn is_damaging(&self) -> bool {
        self.power > 0 && !matches!(self.category, MoveCategory::Status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_pair() {
        assert_eq!(
            MoveCategory::Physical.stat_pair(),
            (StatKind::Attack, StatKind::Defense)
        );
        assert_eq!(
            MoveCategory::Special.stat_pair(),
            (StatKind::SpAttack, StatKind::SpDefense)
        );
    }

    #[test]
    fn test_fallback_is_harmless() {
        let mv = MoveRef::fallback("mystery");
        assert_eq!(mv.power, 0);
        assert!(!mv.is_damaging());
    }

    #[test]
    fn test_to_ref() {
        let data = MoveData {
            key: "earthquake".to_string(),
            display_name: "Earthquake".to_string(),
            power: 100,
            element: ElementType::Ground,
            category: MoveCategory::Physical,
        };
        let mv = data.to_ref();
        assert_eq!(mv.name, "earthquake");
        assert!(mv.is_damaging());
    }
}
