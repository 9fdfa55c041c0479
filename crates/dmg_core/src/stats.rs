//! Real-stat derivation.
//!
//! Real stats are derived from catalog base stats, level, effort
//! allocation and nature. Stage ranks are stored alongside the inputs but are
//! never baked into [`RealStats`]; the damage resolver applies them
//! transiently via [`apply_stage_rank`].
//!
//! Formulas (all integer, floored at each step, IV fixed at 31):
//!
//! ```text
//! HP    = floor((2*base + IV) * level / 100) + level + 10 + effort
//! other = floor(floor((2*base + IV + effort) * level / 100) + 5) * nature
//! ```

use serde::{Deserialize, Serialize};

use crate::math::Ratio;

/// Individual value, fixed for every stat.
pub const INDIVIDUAL_VALUE: u32 = 31;

/// Maximum effort allocation per stat.
pub const MAX_EFFORT: u8 = 32;

/// Stage rank bounds.
pub const MIN_RANK: i8 = -6;
/// Stage rank bounds.
pub const MAX_RANK: i8 = 6;

/// Base value used for every stat of an unknown species.
pub const FALLBACK_BASE_STAT: u32 = 100;

/// Identifies one of the six stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    /// Hit points.
    Hp,
    /// Physical attack.
    Attack,
    /// Physical defense.
    Defense,
    /// Special attack.
    SpAttack,
    /// Special defense.
    SpDefense,
    /// Speed.
    Speed,
}

impl StatKind {
    /// The five stats that take a nature modifier and stage rank.
    pub const NON_HP: [Self; 5] = [
        Self::Attack,
        Self::Defense,
        Self::SpAttack,
        Self::SpDefense,
        Self::Speed,
    ];
}

/// Nature modifier applied to a single non-HP stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Nature {
    /// ×1.1.
    Up,
    /// ×0.9.
    Down,
    /// ×1.0.
    #[default]
    Neutral,
}

impl Nature {
    /// Multiplier for this nature.
    #[must_use]
    pub const fn multiplier(self) -> Ratio {
        match self {
            Self::Up => Ratio::new(11, 10),
            Self::Down => Ratio::new(9, 10),
            Self::Neutral => Ratio::ONE,
        }
    }

    /// Parse a free-form input. Anything other than `up`/`down` is neutral.
    #[must_use]
    pub fn from_input(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" | "+" => Self::Up,
            "down" | "-" => Self::Down,
            _ => Self::Neutral,
        }
    }
}

/// Per-stat configuration for a non-HP stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StatInput {
    /// Effort allocation (0..=32).
    pub effort: u8,
    /// Nature modifier.
    pub nature: Nature,
    /// Transient stage rank (-6..=6).
    pub rank: i8,
}

/// Full stat configuration of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StatSpread {
    /// HP effort allocation (0..=32).
    pub hp_effort: u8,
    /// Attack inputs.
    pub attack: StatInput,
    /// Defense inputs.
    pub defense: StatInput,
    /// Special attack inputs.
    pub sp_attack: StatInput,
    /// Special defense inputs.
    pub sp_defense: StatInput,
    /// Speed inputs.
    pub speed: StatInput,
}

impl StatSpread {
    /// Inputs for a non-HP stat. Returns `None` for [`StatKind::Hp`].
    #[must_use]
    pub const fn input(&self, stat: StatKind) -> Option<&StatInput> {
        match stat {
            StatKind::Hp => None,
            StatKind::Attack => Some(&self.attack),
            StatKind::Defense => Some(&self.defense),
            StatKind::SpAttack => Some(&self.sp_attack),
            StatKind::SpDefense => Some(&self.sp_defense),
            StatKind::Speed => Some(&self.speed),
        }
    }

    /// Mutable inputs for a non-HP stat.
    pub fn input_mut(&mut self, stat: StatKind) -> Option<&mut StatInput> {
        match stat {
            StatKind::Hp => None,
            StatKind::Attack => Some(&mut self.attack),
            StatKind::Defense => Some(&mut self.defense),
            StatKind::SpAttack => Some(&mut self.sp_attack),
            StatKind::SpDefense => Some(&mut self.sp_defense),
            StatKind::Speed => Some(&mut self.speed),
        }
    }

    /// Effort for any stat.
    #[must_use]
    pub fn effort(&self, stat: StatKind) -> u8 {
        self.input(stat).map_or(self.hp_effort, |s| s.effort)
    }

    /// Set effort for any stat, clamped to `0..=32`.
    pub fn set_effort(&mut self, stat: StatKind, effort: u8) {
        let effort = effort.min(MAX_EFFORT);
        match self.input_mut(stat) {
            Some(input) => input.effort = effort,
            None => self.hp_effort = effort,
        }
    }

    /// Stage rank for a stat (always 0 for HP).
    #[must_use]
    pub fn rank(&self, stat: StatKind) -> i8 {
        self.input(stat).map_or(0, |s| s.rank)
    }

    /// Total effort spent across all six stats.
    #[must_use]
    pub fn total_effort(&self) -> u32 {
        u32::from(self.hp_effort)
            + StatKind::NON_HP
                .iter()
                .map(|&s| u32::from(self.effort(s)))
                .sum::<u32>()
    }
}

/// Species base stats as provided by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseStats {
    /// Base HP.
    pub hp: u32,
    /// Base attack.
    pub attack: u32,
    /// Base defense.
    pub defense: u32,
    /// Base special attack.
    pub sp_attack: u32,
    /// Base special defense.
    pub sp_defense: u32,
    /// Base speed.
    pub speed: u32,
}

impl BaseStats {
    /// Base stats used when the catalog has no entry for a species.
    pub const FALLBACK: Self = Self::uniform(FALLBACK_BASE_STAT);

    /// Every stat set to `value`.
    #[must_use]
    pub const fn uniform(value: u32) -> Self {
        Self {
            hp: value,
            attack: value,
            defense: value,
            sp_attack: value,
            sp_defense: value,
            speed: value,
        }
    }

    /// Base value for one stat.
    #[must_use]
    pub const fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Hp => self.hp,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpAttack => self.sp_attack,
            StatKind::SpDefense => self.sp_defense,
            StatKind::Speed => self.speed,
        }
    }

    /// Base stat total.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.hp + self.attack + self.defense + self.sp_attack + self.sp_defense + self.speed
    }
}

impl Default for BaseStats {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Derived in-battle stats, without stage ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct RealStats {
    /// Maximum HP.
    pub hp: u32,
    /// Attack.
    pub attack: u32,
    /// Defense.
    pub defense: u32,
    /// Special attack.
    pub sp_attack: u32,
    /// Special defense.
    pub sp_defense: u32,
    /// Speed.
    pub speed: u32,
}

impl RealStats {
    /// Real value for one stat.
    #[must_use]
    pub const fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Hp => self.hp,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::SpAttack => self.sp_attack,
            StatKind::SpDefense => self.sp_defense,
            StatKind::Speed => self.speed,
        }
    }
}

/// Real HP from base HP, level and HP effort.
#[must_use]
pub const fn real_hp(base: u32, level: u8, effort: u8) -> u32 {
    let level = level as u32;
    (2 * base + INDIVIDUAL_VALUE) * level / 100 + level + 10 + effort as u32
}

/// Real value of a non-HP stat.
#[must_use]
pub const fn real_stat(base: u32, level: u8, effort: u8, nature: Nature) -> u32 {
    let raw = (2 * base + INDIVIDUAL_VALUE + effort as u32) * level as u32 / 100 + 5;
    nature.multiplier().apply(raw)
}

/// Derive all six real stats.
#[must_use]
pub fn compute_real_stats(base: &BaseStats, level: u8, spread: &StatSpread) -> RealStats {
    let stat = |kind: StatKind, input: &StatInput| {
        real_stat(base.get(kind), level, input.effort, input.nature)
    };
    RealStats {
        hp: real_hp(base.hp, level, spread.hp_effort),
        attack: stat(StatKind::Attack, &spread.attack),
        defense: stat(StatKind::Defense, &spread.defense),
        sp_attack: stat(StatKind::SpAttack, &spread.sp_attack),
        sp_defense: stat(StatKind::SpDefense, &spread.sp_defense),
        speed: stat(StatKind::Speed, &spread.speed),
    }
}

/// Stage-rank multiplier: `(2+r)/2` for positive ranks, `2/(2+|r|)` for
/// negative ones. Ranks outside `-6..=6` are clamped.
#[must_use]
pub const fn rank_multiplier(rank: i8) -> Ratio {
    let rank = if rank < MIN_RANK {
        MIN_RANK
    } else if rank > MAX_RANK {
        MAX_RANK
    } else {
        rank
    };
    if rank >= 0 {
        Ratio::new(2 + rank as u32, 2)
    } else {
        Ratio::new(2, 2 + rank.unsigned_abs() as u32)
    }
}

/// Apply a stage rank to a real stat value, flooring the result.
#[must_use]
pub const fn apply_stage_rank(value: u32, rank: i8) -> u32 {
    rank_multiplier(rank).apply(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garchomp() -> BaseStats {
        BaseStats {
            hp: 108,
            attack: 130,
            defense: 95,
            sp_attack: 80,
            sp_defense: 85,
            speed: 102,
        }
    }

    #[test]
    fn test_real_attack_worked_example() {
        // floor((2*130 + 31) * 50 / 100) + 5 = 145 + 5
        assert_eq!(real_stat(130, 50, 0, Nature::Neutral), 150);
    }

    #[test]
    fn test_nature_modifiers() {
        assert_eq!(real_stat(130, 50, 0, Nature::Up), 165);
        assert_eq!(real_stat(130, 50, 0, Nature::Down), 135);
    }

    #[test]
    fn test_real_hp() {
        // floor((216 + 31) * 50 / 100) + 50 + 10 = 123 + 60
        assert_eq!(real_hp(108, 50, 0), 183);
        assert_eq!(real_hp(108, 50, 32), 215);
    }

    #[test]
    fn test_effort_scales_with_level() {
        assert_eq!(real_stat(100, 50, 32, Nature::Neutral), 136);
        assert_eq!(real_stat(100, 100, 32, Nature::Neutral), 268);
    }

    #[test]
    fn test_compute_all_stats() {
        let spread = StatSpread {
            hp_effort: 4,
            attack: StatInput {
                effort: 32,
                nature: Nature::Up,
                rank: 2,
            },
            ..StatSpread::default()
        };
        let real = compute_real_stats(&garchomp(), 50, &spread);
        assert_eq!(real.hp, 187);
        // floor((291 + 32) * 50 / 100) + 5 = 166, × 1.1 = 182
        assert_eq!(real.attack, 182);
        assert_eq!(real.defense, real_stat(95, 50, 0, Nature::Neutral));
        // Rank is never baked into the real stat.
        assert_eq!(real.get(StatKind::Attack), 182);
    }

    #[test]
    fn test_fallback_base_stats() {
        assert_eq!(BaseStats::FALLBACK.get(StatKind::Speed), 100);
        assert_eq!(BaseStats::FALLBACK.total(), 600);
    }

    #[test]
    fn test_rank_multiplier() {
        assert_eq!(apply_stage_rank(150, 0), 150);
        assert_eq!(apply_stage_rank(150, 1), 225);
        assert_eq!(apply_stage_rank(150, 6), 600);
        assert_eq!(apply_stage_rank(150, -1), 100);
        assert_eq!(apply_stage_rank(151, -1), 100);
        assert_eq!(apply_stage_rank(150, -6), 37);
        // Out-of-range ranks clamp.
        assert_eq!(apply_stage_rank(150, 9), 600);
    }

    #[test]
    fn test_spread_effort_clamps() {
        let mut spread = StatSpread::default();
        spread.set_effort(StatKind::Hp, 40);
        spread.set_effort(StatKind::Speed, 12);
        assert_eq!(spread.hp_effort, 32);
        assert_eq!(spread.effort(StatKind::Speed), 12);
        assert_eq!(spread.total_effort(), 44);
    }

    #[test]
    fn test_nature_from_input() {
        assert_eq!(Nature::from_input("UP"), Nature::Up);
        assert_eq!(Nature::from_input("down"), Nature::Down);
        assert_eq!(Nature::from_input("garbage"), Nature::Neutral);
    }

    #[test]
    fn test_monotonic_in_effort() {
        for nature in [Nature::Up, Nature::Down, Nature::Neutral] {
            let mut prev = 0;
            for effort in 0..=MAX_EFFORT {
                let v = real_stat(77, 50, effort, nature);
                assert!(v >= prev);
                prev = v;
            }
        }
    }
}
