//! Session configuration.
//!
//! Configuration is plain data, deserializable from RON so that embedding
//! applications and tests can describe a session in text.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combatant::DEFAULT_LEVEL;
use crate::error::{CalcError, Result};

/// How the roll applied by a fresh attack is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RollPolicy {
    /// Uniformly random from the session RNG.
    #[default]
    Random,
    /// Always the 85% roll.
    Min,
    /// Always the 100% roll.
    Max,
    /// A fixed roll index, clamped to the last roll.
    Index(usize),
}

impl RollPolicy {
    /// Pick a roll index out of `len` rolls. `None` when there are no rolls.
    pub fn select<R: Rng + ?Sized>(self, rng: &mut R, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(match self {
            Self::Random => rng.gen_range(0..len),
            Self::Min => 0,
            Self::Max => len - 1,
            Self::Index(i) => i.min(len - 1),
        })
    }
}

/// Settings for a [`crate::session::BattleSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Level of every combatant at construction.
    pub default_level: u8,
    /// Initial roll selection for fresh attacks.
    pub roll_policy: RollPolicy,
    /// Seed of the roll-selection RNG.
    pub seed: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            default_level: DEFAULT_LEVEL,
            roll_policy: RollPolicy::Random,
            seed: 0,
        }
    }
}

impl BattleConfig {
    /// Parse a config from RON text. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::ConfigParse`] if the text is not valid RON for
    /// this structure.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| CalcError::ConfigParse(e.to_string()))
    }

    /// Same config with a different roll policy.
    #[must_use]
    pub const fn with_roll_policy(mut self, roll_policy: RollPolicy) -> Self {
        self.roll_policy = roll_policy;
        self
    }

    /// Same config with a different seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults() {
        let config = BattleConfig::default();
        assert_eq!(config.default_level, 50);
        assert_eq!(config.roll_policy, RollPolicy::Random);
    }

    #[test]
    fn test_parse_partial_ron() {
        let config = BattleConfig::from_ron_str("(roll_policy: Max, seed: 7)").unwrap();
        assert_eq!(config.default_level, 50);
        assert_eq!(config.roll_policy, RollPolicy::Max);
        assert_eq!(config.seed, 7);

        let config =
            BattleConfig::from_ron_str("(default_level: 100, roll_policy: Index(3))").unwrap();
        assert_eq!(config.default_level, 100);
        assert_eq!(config.roll_policy, RollPolicy::Index(3));
    }

    #[test]
    fn test_builder_methods_keep_other_fields() {
        let config = BattleConfig::default()
            .with_seed(99)
            .with_roll_policy(RollPolicy::Min);
        assert_eq!(config.seed, 99);
        assert_eq!(config.roll_policy, RollPolicy::Min);
        assert_eq!(config.default_level, 50);
    }

    #[test]
    fn test_parse_error() {
        let err = BattleConfig::from_ron_str("(roll_policy: Sometimes)").unwrap_err();
        assert!(matches!(err, CalcError::ConfigParse(_)));
    }

    #[test]
    fn test_roll_policy_select() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(RollPolicy::Min.select(&mut rng, 16), Some(0));
        assert_eq!(RollPolicy::Max.select(&mut rng, 16), Some(15));
        assert_eq!(RollPolicy::Index(40).select(&mut rng, 16), Some(15));
        assert_eq!(RollPolicy::Random.select(&mut rng, 0), None);
        for _ in 0..100 {
            let i = RollPolicy::Random.select(&mut rng, 16).unwrap();
            assert!(i < 16);
        }
    }
}
