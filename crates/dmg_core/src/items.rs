//! Item-driven healing.
//!
//! Berries heal once when HP drops to their threshold and are then consumed
//! until a full reset. Passive items heal every time they are checked. Both
//! heal `floor(max_hp * fraction)`, capped at the missing HP, and neither can
//! revive a fainted combatant. Stat and damage boosts are read by the damage
//! resolver and never change state here.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::combatant::Combatant;
use crate::data::{ItemData, ItemEffect};

/// Result of a successful item heal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealOutcome {
    /// Item identity key.
    pub item: String,
    /// Item heal message.
    pub message: String,
    /// HP actually restored.
    pub amount: u32,
    /// HP before the heal.
    pub hp_before: u32,
    /// HP after the heal.
    pub hp_after: u32,
    /// Whether the item was consumed by this heal.
    pub consumed: bool,
}

/// Run the held item's automatic check after an opposing attack.
///
/// A berry heals when `current_hp / max_hp <= threshold` and it has not been
/// consumed yet. A passive item heals unconditionally. Returns `None` when
/// nothing happened, including a passive heal of 0 HP.
pub fn check_passive_or_threshold_heal<C: Catalog>(
    combatant: &mut Combatant,
    catalog: &C,
) -> Option<HealOutcome> {
    let (key, data) = held_item(combatant, catalog)?;
    match data.effect {
        ItemEffect::Berry { threshold, .. } => {
            if !threshold.admits(combatant.current_hp(), combatant.max_hp()) {
                return None;
            }
            apply_heal(combatant, &key, data)
        }
        ItemEffect::Passive { .. } => apply_heal(combatant, &key, data),
        ItemEffect::StatBoost { .. } | ItemEffect::DamageBoost { .. } => None,
    }
}

/// Berry-only threshold check, used after a reroll changes HP.
pub fn check_threshold_heal<C: Catalog>(
    combatant: &mut Combatant,
    catalog: &C,
) -> Option<HealOutcome> {
    let (key, data) = held_item(combatant, catalog)?;
    match data.effect {
        ItemEffect::Berry { threshold, .. }
            if threshold.admits(combatant.current_hp(), combatant.max_hp()) =>
        {
            apply_heal(combatant, &key, data)
        }
        _ => None,
    }
}

/// User-triggered heal with `item_key`, ignoring berry thresholds.
///
/// A consumed berry does nothing. A berry used at full HP is still consumed.
pub fn apply_manual_recovery<C: Catalog>(
    combatant: &mut Combatant,
    catalog: &C,
    item_key: &str,
) -> Option<HealOutcome> {
    let data = catalog.item(item_key)?;
    apply_heal(combatant, item_key, data)
}

fn held_item<'c, C: Catalog>(
    combatant: &Combatant,
    catalog: &'c C,
) -> Option<(String, &'c ItemData)> {
    let key = combatant.item()?;
    let data = catalog.item(key)?;
    Some((key.to_string(), data))
}

fn apply_heal(combatant: &mut Combatant, key: &str, data: &ItemData) -> Option<HealOutcome> {
    let fraction = data.effect.heal_fraction()?;
    if combatant.is_fainted() {
        return None;
    }
    let consumable = data.is_consumable();
    if consumable && combatant.item_consumed() {
        return None;
    }

    let hp_before = combatant.current_hp();
    let amount = combatant.heal(fraction.apply(combatant.max_hp()));
    if amount == 0 && !consumable {
        return None;
    }
    if consumable {
        combatant.mark_item_consumed();
    }

    tracing::debug!(
        species = combatant.name(),
        item = key,
        amount,
        hp_after = combatant.current_hp(),
        "Item heal"
    );

    Some(HealOutcome {
        item: key.to_string(),
        message: data.message.clone(),
        amount,
        hp_before,
        hp_after: combatant.current_hp(),
        consumed: consumable,
    })
}
