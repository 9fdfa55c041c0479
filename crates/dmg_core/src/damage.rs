//! Damage resolution.
//!
//! [`resolve`] turns two combatants and a move into a [`DamageResult`]: the
//! sixteen damage values for random factors 85%..=100%. Resolution is pure.
//! It reads stage ranks fresh on every call and never touches HP.
//!
//! Every multiplicative step floors before the next one, in this order:
//!
//! 1. power 0 returns an empty result
//! 2. stage ranks on the offensive and defensive stat
//! 3. stat-boosting held item
//! 4. base damage `floor(floor(floor(2L/5 + 2) * P * A / D) / 50) + 2`
//! 5. critical hit (×1.5, once)
//! 6. per roll: random factor, STAB, type effectiveness, damage-boosting item

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::combatant::Combatant;
use crate::data::{ItemEffect, MoveRef};
use crate::math::Ratio;
use crate::stats::apply_stage_rank;

/// Number of damage outcomes per resolution.
pub const ROLL_COUNT: usize = 16;

/// Lowest random factor, in percent.
pub const MIN_ROLL_PERCENT: u32 = 85;

/// Random factor (percent) of a roll index.
#[must_use]
pub const fn roll_percent(index: usize) -> u32 {
    MIN_ROLL_PERCENT + index as u32
}

/// A held item that changed the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemModifier {
    /// Item identity key.
    pub item: String,
    /// The effect that was applied.
    pub effect: ItemEffect,
}

/// Outcome of one damage resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Smallest roll (85% factor), or 0 for non-damaging moves.
    pub min: u32,
    /// Largest roll (100% factor), or 0 for non-damaging moves.
    pub max: u32,
    /// Sixteen rolls in ascending factor order; empty for non-damaging moves.
    pub rolls: Vec<u32>,
    /// Combined type-effectiveness multiplier.
    pub type_effectiveness: Ratio,
    /// Held item that modified the result, if any.
    pub item_modifier: Option<ItemModifier>,
}

impl DamageResult {
    /// Result of a move with no power.
    #[must_use]
    pub fn no_damage() -> Self {
        Self {
            min: 0,
            max: 0,
            rolls: Vec::new(),
            type_effectiveness: Ratio::ONE,
            item_modifier: None,
        }
    }

    /// Whether any roll exists.
    #[must_use]
    pub fn has_rolls(&self) -> bool {
        !self.rolls.is_empty()
    }

    /// Roll at `index`.
    #[must_use]
    pub fn roll(&self, index: usize) -> Option<u32> {
        self.rolls.get(index).copied()
    }

    /// Min and max damage as a percentage of `max_hp`.
    #[must_use]
    pub fn percent_of(&self, max_hp: u32) -> (f64, f64) {
        if max_hp == 0 {
            return (0.0, 0.0);
        }
        let hp = f64::from(max_hp);
        (
            f64::from(self.min) * 100.0 / hp,
            f64::from(self.max) * 100.0 / hp,
        )
    }

    /// How many hits it takes to knock out a defender with `max_hp`.
    #[must_use]
    pub fn ko_chance(&self, max_hp: u32) -> KoChance {
        if self.max == 0 || self.min == 0 {
            return KoChance::NoDamage;
        }
        let fewest = max_hp.div_ceil(self.max);
        let most = max_hp.div_ceil(self.min);

        if fewest == most {
            KoChance::Guaranteed(fewest)
        } else if fewest <= 1 {
            let ko_rolls = self.rolls.iter().filter(|&&r| r >= max_hp).count();
            KoChance::RandomOneHit { ko_rolls }
        } else {
            KoChance::Range {
                min_hits: fewest,
                max_hits: most,
            }
        }
    }
}

/// Hits-to-KO summary of a [`DamageResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KoChance {
    /// The move deals no damage.
    NoDamage,
    /// Every roll knocks out in exactly this many hits.
    Guaranteed(u32),
    /// Some rolls knock out in one hit.
    RandomOneHit {
        /// Rolls (out of 16) that knock out in one hit.
        ko_rolls: usize,
    },
    /// Between `min_hits` (highest rolls) and `max_hits` (lowest rolls).
    Range {
        /// Hits needed at the highest roll.
        min_hits: u32,
        /// Hits needed at the lowest roll.
        max_hits: u32,
    },
}

impl KoChance {
    /// Chance of a one-hit KO in percent, for [`KoChance::RandomOneHit`].
    #[must_use]
    pub fn one_hit_percent(self) -> Option<f64> {
        match self {
            Self::RandomOneHit { ko_rolls } => Some(ko_rolls as f64 * 100.0 / ROLL_COUNT as f64),
            Self::Guaranteed(1) => Some(100.0),
            _ => None,
        }
    }
}

/// Already-resolved numbers fed to the roll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageInputs {
    /// Attacker level.
    pub level: u8,
    /// Move power.
    pub power: u32,
    /// Offensive stat after ranks and items.
    pub attack: u32,
    /// Defensive stat after ranks.
    pub defense: u32,
    /// Critical hit.
    pub critical: bool,
    /// Same-type attack bonus multiplier.
    pub stab: Ratio,
    /// Combined type-effectiveness multiplier.
    pub effectiveness: Ratio,
    /// Damage-boosting item multiplier.
    pub damage_boost: Option<Ratio>,
}

/// Base damage before the roll loop, including the critical-hit multiplier.
#[must_use]
pub fn base_damage(inputs: &DamageInputs) -> u32 {
    let level_factor = u64::from(inputs.level) * 2 / 5 + 2;
    let defense = u64::from(inputs.defense.max(1));
    let scaled = level_factor * u64::from(inputs.power) * u64::from(inputs.attack) / defense;
    let base = (scaled / 50 + 2) as u32;
    if inputs.critical {
        Ratio::THREE_HALVES.apply(base)
    } else {
        base
    }
}

/// The sixteen rolls for already-resolved inputs.
#[must_use]
pub fn compute_rolls(inputs: &DamageInputs) -> Vec<u32> {
    if inputs.power == 0 {
        return Vec::new();
    }
    let base = base_damage(inputs);
    (0..ROLL_COUNT)
        .map(|index| {
            let mut dmg = Ratio::new(roll_percent(index), 100).apply(base);
            dmg = inputs.stab.apply(dmg);
            dmg = inputs.effectiveness.apply(dmg);
            if let Some(boost) = inputs.damage_boost {
                dmg = boost.apply(dmg);
            }
            if inputs.effectiveness.is_zero() {
                0
            } else {
                dmg.max(1)
            }
        })
        .collect()
}

/// Resolve one attack.
#[must_use]
pub fn resolve<C: Catalog>(
    attacker: &Combatant,
    defender: &Combatant,
    mv: &MoveRef,
    catalog: &C,
) -> DamageResult {
    if mv.power == 0 {
        return DamageResult::no_damage();
    }

    let (offense, defense) = mv.category.stat_pair();
    let mut attack = apply_stage_rank(attacker.real_stats().get(offense), attacker.rank(offense));
    let defense_value =
        apply_stage_rank(defender.real_stats().get(defense), defender.rank(defense));

    let held = attacker
        .item()
        .and_then(|key| catalog.item(key).map(|data| (key, data.effect)));

    let mut item_modifier = None;
    let mut damage_boost = None;
    match held {
        Some((key, effect @ ItemEffect::StatBoost { stat, multiplier })) if stat == offense => {
            attack = multiplier.apply(attack);
            item_modifier = Some(ItemModifier {
                item: key.to_string(),
                effect,
            });
        }
        Some((key, effect @ ItemEffect::DamageBoost { multiplier })) => {
            damage_boost = Some(multiplier);
            item_modifier = Some(ItemModifier {
                item: key.to_string(),
                effect,
            });
        }
        _ => {}
    }

    let stab = if attacker.attacking_types(catalog).contains(&mv.element) {
        Ratio::THREE_HALVES
    } else {
        Ratio::ONE
    };
    let effectiveness = catalog
        .type_chart()
        .multiplier(mv.element, catalog.types(defender.name()));

    let rolls = compute_rolls(&DamageInputs {
        level: attacker.level(),
        power: mv.power,
        attack,
        defense: defense_value,
        critical: attacker.conditions().critical_hit,
        stab,
        effectiveness,
        damage_boost,
    });

    DamageResult {
        min: rolls.first().copied().unwrap_or(0),
        max: rolls.last().copied().unwrap_or(0),
        rolls,
        type_effectiveness: effectiveness,
        item_modifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Dex;
    use crate::data::{ItemData, MoveCategory, SpeciesData};
    use crate::stats::{BaseStats, StatKind};
    use crate::types::ElementType;

    fn example_b() -> DamageInputs {
        DamageInputs {
            level: 50,
            power: 100,
            attack: 150,
            defense: 100,
            critical: false,
            stab: Ratio::THREE_HALVES,
            effectiveness: Ratio::whole(2),
            damage_boost: None,
        }
    }

    fn species(key: &str, base: u32, types: Vec<ElementType>) -> SpeciesData {
        SpeciesData {
            key: key.to_string(),
            display_name: key.to_string(),
            base_stats: BaseStats::uniform(base),
            types,
            abilities: Vec::new(),
        }
    }

    fn dex() -> Dex {
        let mut dex = Dex::new();
        dex.register_species(species("dragon", 100, vec![ElementType::Dragon]))
            .unwrap();
        dex.register_species(species("ghost", 100, vec![ElementType::Ghost]))
            .unwrap();
        dex.register_species(species("water", 100, vec![ElementType::Water]))
            .unwrap();
        dex.register_item(ItemData {
            key: "choice_band".to_string(),
            display_name: "Choice Band".to_string(),
            message: String::new(),
            effect: ItemEffect::StatBoost {
                stat: StatKind::Attack,
                multiplier: Ratio::THREE_HALVES,
            },
        })
        .unwrap();
        dex.register_item(ItemData {
            key: "life_orb".to_string(),
            display_name: "Life Orb".to_string(),
            message: String::new(),
            effect: ItemEffect::DamageBoost {
                multiplier: Ratio::new(13, 10),
            },
        })
        .unwrap();
        dex
    }

    fn combatant(dex: &Dex, key: &str) -> Combatant {
        let mut c = Combatant::new(50);
        c.set_species(Some(key.to_string()));
        c.recompute(dex);
        c
    }

    #[test]
    fn test_worked_example_b() {
        let inputs = example_b();
        assert_eq!(base_damage(&inputs), 68);
        let rolls = compute_rolls(&inputs);
        assert_eq!(rolls.len(), ROLL_COUNT);
        assert_eq!(rolls[0], 170);
        assert_eq!(rolls[15], 204);
    }

    #[test]
    fn test_critical_applies_once_to_base() {
        let inputs = DamageInputs {
            critical: true,
            ..example_b()
        };
        assert_eq!(base_damage(&inputs), 102);
    }

    #[test]
    fn test_minimum_one_damage() {
        let inputs = DamageInputs {
            power: 10,
            attack: 10,
            defense: 500,
            stab: Ratio::ONE,
            effectiveness: Ratio::new(1, 4),
            ..example_b()
        };
        assert!(compute_rolls(&inputs).iter().all(|&r| r == 1));
    }

    #[test]
    fn test_zero_power_is_empty() {
        let dex = dex();
        let a = combatant(&dex, "dragon");
        let d = combatant(&dex, "water");
        let mv = MoveRef::new("protect", 0, ElementType::Normal, MoveCategory::Status);
        assert_eq!(resolve(&a, &d, &mv, &dex), DamageResult::no_damage());
    }

    #[test]
    fn test_immunity_forces_zero() {
        let dex = dex();
        let a = combatant(&dex, "dragon");
        let d = combatant(&dex, "ghost");
        let mv = MoveRef::new("body_slam", 85, ElementType::Normal, MoveCategory::Physical);
        let result = resolve(&a, &d, &mv, &dex);
        assert_eq!(result.rolls.len(), ROLL_COUNT);
        assert!(result.rolls.iter().all(|&r| r == 0));
        assert!(result.type_effectiveness.is_zero());
        assert_eq!(result.ko_chance(d.max_hp()), KoChance::NoDamage);
    }

    #[test]
    fn test_resolve_matches_manual_inputs() {
        let dex = dex();
        let a = combatant(&dex, "dragon");
        let d = combatant(&dex, "water");
        let mv = MoveRef::new("dragon_claw", 80, ElementType::Dragon, MoveCategory::Physical);
        let result = resolve(&a, &d, &mv, &dex);

        let expected = compute_rolls(&DamageInputs {
            level: 50,
            power: 80,
            attack: a.real_stats().attack,
            defense: d.real_stats().defense,
            critical: false,
            stab: Ratio::THREE_HALVES,
            effectiveness: Ratio::ONE,
            damage_boost: None,
        });
        assert_eq!(result.rolls, expected);
        assert_eq!(result.min, expected[0]);
        assert_eq!(result.max, expected[15]);
    }

    #[test]
    fn test_stage_ranks_read_fresh() {
        let dex = dex();
        let mut a = combatant(&dex, "dragon");
        let d = combatant(&dex, "water");
        let mv = MoveRef::new("tackle", 40, ElementType::Normal, MoveCategory::Physical);
        let before = resolve(&a, &d, &mv, &dex);

        a.set_rank(StatKind::Attack, 2);
        let boosted = resolve(&a, &d, &mv, &dex);
        assert!(boosted.max > before.max);

        a.set_rank(StatKind::Attack, 0);
        assert_eq!(resolve(&a, &d, &mv, &dex), before);
    }

    #[test]
    fn test_stat_boost_item_matches_category() {
        let dex = dex();
        let mut a = combatant(&dex, "dragon");
        let d = combatant(&dex, "water");
        a.set_item(Some("choice_band".to_string()));

        let physical = MoveRef::new("tackle", 40, ElementType::Normal, MoveCategory::Physical);
        let special = MoveRef::new("swift", 60, ElementType::Normal, MoveCategory::Special);

        let result = resolve(&a, &d, &physical, &dex);
        assert_eq!(
            result.item_modifier.as_ref().map(|m| m.item.as_str()),
            Some("choice_band")
        );
        assert!(resolve(&a, &d, &special, &dex).item_modifier.is_none());
    }

    #[test]
    fn test_damage_boost_item() {
        let dex = dex();
        let mut a = combatant(&dex, "dragon");
        let d = combatant(&dex, "water");
        let mv = MoveRef::new("tackle", 40, ElementType::Normal, MoveCategory::Physical);
        let plain = resolve(&a, &d, &mv, &dex);

        a.set_item(Some("life_orb".to_string()));
        let boosted = resolve(&a, &d, &mv, &dex);
        for (p, b) in plain.rolls.iter().zip(&boosted.rolls) {
            assert_eq!(*b, Ratio::new(13, 10).apply(*p).max(1));
        }
    }

    #[test]
    fn test_ko_chance() {
        let result = DamageResult {
            min: 170,
            max: 204,
            rolls: compute_rolls(&example_b()),
            type_effectiveness: Ratio::whole(2),
            item_modifier: None,
        };
        assert_eq!(result.ko_chance(150), KoChance::Guaranteed(1));
        assert_eq!(result.ko_chance(300), KoChance::Guaranteed(2));
        assert_eq!(
            result.ko_chance(400),
            KoChance::Range {
                min_hits: 2,
                max_hits: 3
            }
        );
        match result.ko_chance(190) {
            KoChance::RandomOneHit { ko_rolls } => {
                assert!(ko_rolls > 0 && ko_rolls < ROLL_COUNT);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_one_hit_percent() {
        assert_eq!(
            KoChance::RandomOneHit { ko_rolls: 4 }.one_hit_percent(),
            Some(25.0)
        );
        assert_eq!(
            KoChance::RandomOneHit { ko_rolls: 0 }.one_hit_percent(),
            Some(0.0)
        );
        assert_eq!(KoChance::Guaranteed(1).one_hit_percent(), Some(100.0));
        assert_eq!(KoChance::Guaranteed(2).one_hit_percent(), None);
        assert_eq!(KoChance::NoDamage.one_hit_percent(), None);
        let range = KoChance::Range {
            min_hits: 2,
            max_hits: 3,
        };
        assert_eq!(range.one_hit_percent(), None);
    }

    #[test]
    fn test_has_rolls() {
        assert!(!DamageResult::no_damage().has_rolls());
        let result = DamageResult {
            min: 170,
            max: 204,
            rolls: compute_rolls(&example_b()),
            type_effectiveness: Ratio::whole(2),
            item_modifier: None,
        };
        assert!(result.has_rolls());
        assert_eq!(result.roll(0), Some(170));
        assert_eq!(result.roll(ROLL_COUNT), None);
    }

    #[test]
    fn test_percent_of() {
        let result = DamageResult {
            min: 50,
            max: 100,
            rolls: Vec::new(),
            type_effectiveness: Ratio::ONE,
            item_modifier: None,
        };
        assert_eq!(result.percent_of(200), (25.0, 50.0));
        assert_eq!(result.percent_of(0), (0.0, 0.0));
    }
}
