//! Held-item data structures.

use serde::{Deserialize, Serialize};

use crate::math::Ratio;
use crate::stats::StatKind;

/// What a held item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Heals `fraction` of max HP once, when HP drops to `threshold` of max
    /// or below. Consumed on use.
    Berry {
        /// HP ratio at or below which the berry triggers.
        threshold: Ratio,
        /// Fraction of max HP restored.
        fraction: Ratio,
    },
    /// Heals `fraction` of max HP every time it is checked. Never consumed.
    Passive {
        /// Fraction of max HP restored.
        fraction: Ratio,
    },
    /// Multiplies one offensive stat during damage resolution.
    StatBoost {
        /// Boosted stat.
        stat: StatKind,
        /// Multiplier.
        multiplier: Ratio,
    },
    /// Multiplies every damage roll.
    DamageBoost {
        /// Multiplier.
        multiplier: Ratio,
    },
}

impl ItemEffect {
    /// Whether this effect heals.
    #[must_use]
    pub const fn is_healing(&self) -> bool {
        matches!(self, Self::Berry { .. } | Self::Passive { .. })
    }

    /// Heal fraction for healing items.
    #[must_use]
    pub const fn heal_fraction(&self) -> Option<Ratio> {
        match self {
            Self::Berry { fraction, .. } | Self::Passive { fraction } => Some(*fraction),
            Self::StatBoost { .. } | Self::DamageBoost { .. } => None,
        }
    }
}

/// Catalog record for a held item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    /// Stable identity key used for lookups.
    pub key: String,

    /// Display text.
    #[serde(default)]
    pub display_name: String,

    /// Text recorded in the battle log when the item heals.
    #[serde(default)]
    pub message: String,

    /// Item behavior.
    pub effect: ItemEffect,
}

impl ItemData {
    /// Whether this item is consumed after one use.
    #[must_use]
    pub const fn is_consumable(&self) -> bool {
        matches!(self.effect, ItemEffect::Berry { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heal_fraction() {
        let berry = ItemEffect::Berry {
            threshold: Ratio::new(1, 2),
            fraction: Ratio::new(1, 4),
        };
        assert!(berry.is_healing());
        assert_eq!(berry.heal_fraction(), Some(Ratio::new(1, 4)));

        let band = ItemEffect::StatBoost {
            stat: StatKind::Attack,
            multiplier: Ratio::THREE_HALVES,
        };
        assert!(!band.is_healing());
        assert_eq!(band.heal_fraction(), None);
    }

    #[test]
    fn test_consumable() {
        let leftovers = ItemData {
            key: "leftovers".to_string(),
            display_name: "Leftovers".to_string(),
            message: "Restored HP with Leftovers".to_string(),
            effect: ItemEffect::Passive {
                fraction: Ratio::new(1, 16),
            },
        };
        assert!(!leftovers.is_consumable());
    }
}
