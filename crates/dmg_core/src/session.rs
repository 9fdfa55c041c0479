//! Battle session: the public operations of the calculator.
//!
//! A [`BattleSession`] owns the catalog, both rosters, the turn ledger and
//! the roll-selection RNG. Every state change goes through one of its
//! methods, each of which runs to completion before returning:
//!
//! - configuration edits recompute derived stats immediately
//! - [`BattleSession::resolve_attack`] resolves damage, applies the chosen
//!   roll, records the Attack (and Faint) entry, then runs the defender's
//!   item check
//! - [`BattleSession::choose_roll`] re-applies a different roll of the latest
//!   turn from that turn's starting HP
//! - [`BattleSession::revert_to`] restores every HP value from a ledger
//!   snapshot and prunes the ledger and personal histories
//!
//! ```
//! use dmg_core::prelude::*;
//!
//! let mut session = BattleSession::new(Dex::new(), BattleConfig::default());
//! session.set_species(Side::Ally, 0, Some("attacker")).unwrap();
//! session.set_species(Side::Enemy, 0, Some("defender")).unwrap();
//!
//! let tackle = MoveRef::new("tackle", 40, ElementType::Normal, MoveCategory::Physical);
//! let outcome = session.resolve_attack(Side::Ally, &tackle).unwrap();
//! assert_eq!(outcome.turn_id, 1);
//! assert_eq!(session.ledger().len(), 1);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::combatant::{Combatant, DamageRecord, MOVE_SLOTS};
use crate::config::BattleConfig;
use crate::damage::{self, DamageResult};
use crate::data::MoveRef;
use crate::error::{CalcError, Result};
use crate::items::{self, HealOutcome};
use crate::ledger::{AttackEntry, HealEntry, TurnId, TurnLedger};
use crate::roster::{RosterState, Side};
use crate::stats::{Nature, StatKind, MAX_EFFORT, MAX_RANK, MIN_RANK};
use crate::types::ElementType;

/// Which part of a stat's inputs a text edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatField {
    /// Effort allocation (0..=32).
    Effort,
    /// Nature modifier (`up`, `down`, anything else is neutral).
    Nature,
    /// Stage rank (-6..=6).
    Rank,
}

/// What an attack (or a reroll) did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Turn of the attack.
    pub turn_id: TurnId,
    /// Full damage spread.
    pub result: DamageResult,
    /// Applied roll, `None` if the move dealt no damage.
    pub roll_index: Option<usize>,
    /// Damage applied.
    pub damage: u32,
    /// Defender HP at the start of the turn.
    pub hp_before: u32,
    /// Defender HP after the roll (before any item heal).
    pub hp_after: u32,
    /// Item heal triggered on the defender afterwards.
    pub heal: Option<HealOutcome>,
}

/// The attack that rerolls may still rewrite.
#[derive(Debug, Clone)]
struct PendingTurn {
    turn_id: TurnId,
    defender_side: Side,
    defender_slot: usize,
    result: DamageResult,
}

/// Owns all battle state and exposes the calculator's operations.
#[derive(Debug, Clone)]
pub struct BattleSession<C: Catalog> {
    catalog: C,
    config: BattleConfig,
    rosters: RosterState,
    ledger: TurnLedger,
    rng: StdRng,
    pending: Option<PendingTurn>,
}

impl<C: Catalog> BattleSession<C> {
    /// Create a session with twelve unnamed combatants.
    #[must_use]
    pub fn new(catalog: C, config: BattleConfig) -> Self {
        let rosters = RosterState::new(config.default_level, &catalog);
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            catalog,
            config,
            rosters,
            ledger: TurnLedger::new(),
            rng,
            pending: None,
        }
    }

    /// The catalog.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Both rosters.
    #[must_use]
    pub const fn rosters(&self) -> &RosterState {
        &self.rosters
    }

    /// The battle log.
    #[must_use]
    pub const fn ledger(&self) -> &TurnLedger {
        &self.ledger
    }

    /// Read a combatant.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn combatant(&self, side: Side, slot: usize) -> Result<&Combatant> {
        self.rosters.combatant(side, slot)
    }

    /// Selected combatant of a side.
    #[must_use]
    pub fn active(&self, side: Side) -> &Combatant {
        self.rosters.active(side)
    }

    /// Switch the selected slot. Nothing is recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `index >= 6`.
    pub fn select_slot(&mut self, side: Side, index: usize) -> Result<()> {
        self.rosters.select(side, index)
    }

    // ---------------------------------------------------------------------
    // Configuration edits
    // ---------------------------------------------------------------------

    /// Apply a free-form text edit to one stat input, then recompute.
    ///
    /// Effort and rank take the leading integer of the text (`"20.5"` is 20,
    /// text without leading digits is 0) and clamp to their ranges. HP only
    /// has effort; nature and rank edits on HP are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn set_stat_input(
        &mut self,
        side: Side,
        slot: usize,
        stat: StatKind,
        field: StatField,
        raw: &str,
    ) -> Result<()> {
        self.edit(side, slot, |c| match field {
            StatField::Effort => {
                let effort = parse_or_zero(raw).clamp(0, i64::from(MAX_EFFORT));
                c.spread_mut().set_effort(stat, effort as u8);
            }
            StatField::Nature => {
                if let Some(input) = c.spread_mut().input_mut(stat) {
                    input.nature = Nature::from_input(raw);
                }
            }
            StatField::Rank => {
                let rank = parse_or_zero(raw).clamp(i64::from(MIN_RANK), i64::from(MAX_RANK));
                c.set_rank(stat, rank as i8);
            }
        })
    }

    /// Set the level (clamped to 1..=100).
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn set_level(&mut self, side: Side, slot: usize, level: u8) -> Result<()> {
        self.edit(side, slot, |c| c.set_level(level))
    }

    /// Set or clear the identity key.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn set_species(&mut self, side: Side, slot: usize, key: Option<&str>) -> Result<()> {
        self.edit(side, slot, |c| c.set_species(key.map(str::to_string)))
    }

    /// Set or clear the held item.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn set_item(&mut self, side: Side, slot: usize, key: Option<&str>) -> Result<()> {
        self.edit(side, slot, |c| c.set_item(key.map(str::to_string)))
    }

    /// Set or clear the ability.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn set_ability(&mut self, side: Side, slot: usize, key: Option<&str>) -> Result<()> {
        self.edit(side, slot, |c| c.set_ability(key.map(str::to_string)))
    }

    /// Set or clear the tera type.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn set_tera_type(
        &mut self,
        side: Side,
        slot: usize,
        tera: Option<ElementType>,
    ) -> Result<()> {
        self.edit(side, slot, |c| c.set_tera_type(tera))
    }

    /// Set or clear one move slot.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`, or
    /// [`CalcError::InvalidMoveSlot`] if `move_slot >= 4`.
    pub fn set_move(
        &mut self,
        side: Side,
        slot: usize,
        move_slot: usize,
        key: Option<&str>,
    ) -> Result<()> {
        if move_slot >= MOVE_SLOTS {
            return Err(CalcError::InvalidMoveSlot(move_slot));
        }
        self.edit(side, slot, |c| c.set_move(move_slot, key.map(str::to_string)))
    }

    /// Select the move slot used by [`Self::resolve_attack_with_active_move`].
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`, or
    /// [`CalcError::InvalidMoveSlot`] if `move_slot >= 4`.
    pub fn set_active_move(&mut self, side: Side, slot: usize, move_slot: usize) -> Result<()> {
        if move_slot >= MOVE_SLOTS {
            return Err(CalcError::InvalidMoveSlot(move_slot));
        }
        self.edit(side, slot, |c| c.set_active_move(move_slot))
    }

    /// Toggle the critical-hit condition.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn set_critical_hit(&mut self, side: Side, slot: usize, on: bool) -> Result<()> {
        self.edit(side, slot, |c| c.conditions_mut().critical_hit = on)
    }

    /// Toggle whether the tera type counts for same-type bonus.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn set_terastallized(&mut self, side: Side, slot: usize, on: bool) -> Result<()> {
        self.edit(side, slot, |c| c.conditions_mut().terastallized = on)
    }

    fn edit(&mut self, side: Side, slot: usize, f: impl FnOnce(&mut Combatant)) -> Result<()> {
        let combatant = self.rosters.combatant_mut(side, slot)?;
        f(combatant);
        combatant.recompute(&self.catalog);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Turn actions
    // ---------------------------------------------------------------------

    /// Resolve the attacker's selected move slot against the opposing side.
    ///
    /// An empty or unknown move slot resolves as a zero-power move.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::MissingIdentity`] if either active combatant has
    /// no identity key.
    pub fn resolve_attack_with_active_move(
        &mut self,
        attacker_side: Side,
    ) -> Result<AttackOutcome> {
        let key = self.active(attacker_side).active_move().unwrap_or_default();
        let mv = self.catalog.move_ref(key);
        self.resolve_attack(attacker_side, &mv)
    }

    /// Resolve one attack from `attacker_side`'s active combatant onto the
    /// opposing active combatant.
    ///
    /// A new turn starts only after both identities are validated, so a
    /// rejected attack changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::MissingIdentity`] if either active combatant has
    /// no identity key.
    pub fn resolve_attack(&mut self, attacker_side: Side, mv: &MoveRef) -> Result<AttackOutcome> {
        let defender_side = attacker_side.opponent();
        for side in [attacker_side, defender_side] {
            if !self.active(side).has_identity() {
                tracing::warn!(%side, "Attack aborted: combatant identity not set");
                return Err(CalcError::MissingIdentity { side });
            }
        }

        let turn_id = self.ledger.begin_turn();
        let result = damage::resolve(
            self.active(attacker_side),
            self.active(defender_side),
            mv,
            &self.catalog,
        );
        let roll_index = if result.has_rolls() {
            self.config.roll_policy.select(&mut self.rng, result.rolls.len())
        } else {
            None
        };
        let damage = roll_index.and_then(|i| result.roll(i)).unwrap_or(0);

        let attacker_name = self.active(attacker_side).name().to_string();
        let defender_slot = self.rosters.roster(defender_side).selected_index();
        let defender = self.rosters.active_mut(defender_side);
        let defender_name = defender.name().to_string();
        let hp_before = defender.current_hp();
        let hp_after = defender.apply_damage_from(hp_before, damage);
        defender.record_damage(DamageRecord {
            turn_id,
            attacker_name: attacker_name.clone(),
            move_name: mv.name.clone(),
            damage,
            roll_index,
            hp_before,
            hp_after,
        });

        self.ledger.record_attack(AttackEntry {
            turn_id,
            attacker_side,
            attacker_name: attacker_name.clone(),
            defender_slot,
            defender_name: defender_name.clone(),
            move_name: mv.name.clone(),
            damage,
            roll_index,
            hp_before,
            hp_after,
            snapshot: self.rosters.snapshot(),
        });

        tracing::info!(
            turn_id,
            attacker = %attacker_name,
            defender = %defender_name,
            move_name = %mv.name,
            roll = ?roll_index,
            damage,
            hp_before,
            hp_after,
            "Attack resolved"
        );

        self.pending = Some(PendingTurn {
            turn_id,
            defender_side,
            defender_slot,
            result: result.clone(),
        });

        let defender = self.rosters.active_mut(defender_side);
        let heal = items::check_passive_or_threshold_heal(defender, &self.catalog);
        if let Some(outcome) = &heal {
            self.log_heal(defender_side, defender_slot, outcome);
        }

        Ok(AttackOutcome {
            turn_id,
            result,
            roll_index,
            damage,
            hp_before,
            hp_after,
            heal,
        })
    }

    /// Re-apply a different roll of the latest attack turn.
    ///
    /// The defender's HP becomes `hp_before - rolls[roll_index]` (floored at
    /// 0, and unchanged if the turn started at 0). The Attack entry, its
    /// Faint entry and the defender's history record are rewritten, then the
    /// berry threshold check runs again.
    ///
    /// Returns `None` and changes nothing when `turn_id` is not the latest
    /// attack still in the ledger or `roll_index` is out of range.
    pub fn choose_roll(&mut self, turn_id: TurnId, roll_index: usize) -> Option<AttackOutcome> {
        let Some(pending) = self.pending.as_ref().filter(|p| p.turn_id == turn_id) else {
            tracing::warn!(turn_id, "Reroll ignored: not the latest attack turn");
            return None;
        };
        let Some(damage) = pending.result.roll(roll_index) else {
            tracing::warn!(turn_id, roll_index, "Reroll ignored: roll index out of range");
            return None;
        };
        let Some((_, attack)) = self.ledger.find_attack(turn_id) else {
            tracing::warn!(turn_id, "Reroll ignored: attack entry no longer in the log");
            return None;
        };

        let mut entry = attack.clone();
        let result = pending.result.clone();
        let (defender_side, defender_slot) = (pending.defender_side, pending.defender_slot);

        let defender = self.rosters.combatant_mut(defender_side, defender_slot).ok()?;
        let hp_after = defender.apply_damage_from(entry.hp_before, damage);
        defender.record_damage(DamageRecord {
            turn_id,
            attacker_name: entry.attacker_name.clone(),
            move_name: entry.move_name.clone(),
            damage,
            roll_index: Some(roll_index),
            hp_before: entry.hp_before,
            hp_after,
        });

        entry.damage = damage;
        entry.roll_index = Some(roll_index);
        entry.hp_after = hp_after;
        entry.snapshot = self.rosters.snapshot();
        let hp_before = entry.hp_before;
        self.ledger.record_attack(entry);

        tracing::info!(turn_id, roll_index, damage, hp_before, hp_after, "Roll re-applied");

        let defender = self.rosters.combatant_mut(defender_side, defender_slot).ok()?;
        let heal = items::check_threshold_heal(defender, &self.catalog);
        if let Some(outcome) = &heal {
            self.log_heal(defender_side, defender_slot, outcome);
        }

        Some(AttackOutcome {
            turn_id,
            result,
            roll_index: Some(roll_index),
            damage,
            hp_before,
            hp_after,
            heal,
        })
    }

    /// Use the active combatant's held item by hand.
    ///
    /// Berry thresholds are ignored; a consumed berry does nothing. Returns
    /// the heal, which is also logged.
    pub fn check_and_apply_item(&mut self, side: Side) -> Option<HealOutcome> {
        let slot = self.rosters.roster(side).selected_index();
        let combatant = self.rosters.active_mut(side);
        let key = combatant.item()?.to_string();
        let outcome = items::apply_manual_recovery(combatant, &self.catalog, &key)?;
        self.log_heal(side, slot, &outcome);
        Some(outcome)
    }

    fn log_heal(&mut self, side: Side, slot: usize, outcome: &HealOutcome) {
        let combatant_name = self
            .rosters
            .combatant(side, slot)
            .map(|c| c.name().to_string())
            .unwrap_or_default();
        self.ledger.record_heal(HealEntry {
            turn_id: self.ledger.current_turn(),
            side,
            slot,
            combatant_name,
            item: outcome.item.clone(),
            message: outcome.message.clone(),
            amount: outcome.amount,
            hp_before: outcome.hp_before,
            hp_after: outcome.hp_after,
            snapshot: self.rosters.snapshot(),
        });
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    /// Roll both rosters back to the snapshot of ledger entry `index`.
    ///
    /// Entries after `index` are dropped (an Attack entry keeps its Faint
    /// entry) and every personal history loses records newer than the
    /// entry's turn. Returns `false` and changes nothing if `index` is out
    /// of range.
    ///
    /// Snapshots are never rewritten by a reroll. Reverting to a heal logged
    /// before its attack was rerolled into a KO restores the healed HP, not 0.
    pub fn revert_to(&mut self, index: usize) -> bool {
        let Some(point) = self.ledger.revert_to(index) else {
            tracing::warn!(index, len = self.ledger.len(), "Revert ignored: no such log entry");
            return false;
        };

        self.rosters.restore(&point.snapshot);
        for combatant in self.rosters.all_mut() {
            combatant.prune_history(point.turn_id);
        }
        if let Some(pending) = &self.pending {
            if self.ledger.find_attack(pending.turn_id).is_none() {
                self.pending = None;
            }
        }

        tracing::info!(index, turn_id = point.turn_id, "Reverted battle log");
        true
    }

    /// Restore every combatant to full HP, un-consume items, clear every
    /// history and the ledger.
    pub fn reset_all(&mut self) {
        for combatant in self.rosters.all_mut() {
            combatant.full_reset();
        }
        self.ledger.clear();
        self.pending = None;
        tracing::info!("Reset all combatants and the battle log");
    }

    /// Clear one combatant's personal history. HP and the ledger are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `slot >= 6`.
    pub fn clear_history(&mut self, side: Side, slot: usize) -> Result<()> {
        self.rosters.combatant_mut(side, slot)?.clear_history();
        Ok(())
    }

    /// Latest attack turn that [`Self::choose_roll`] accepts.
    #[must_use]
    pub fn rerollable_turn(&self) -> Option<TurnId> {
        self.pending.as_ref().map(|p| p.turn_id)
    }
}

/// Leading integer of `raw` (optional sign, then digits), or 0 when there
/// are no leading digits. Trailing text such as `".5"` or `"abc"` is ignored.
fn parse_or_zero(raw: &str) -> i64 {
    let text = raw.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}
