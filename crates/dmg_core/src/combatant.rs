//! Combatant state: configuration, derived stats and HP.
//!
//! A combatant is created once per roster slot and lives for the whole
//! session. Its configuration (identity, level, stat inputs, item, moves) is
//! edited in place; derived stats are recomputed after every edit so that
//! `0 <= current_hp <= max_hp` always holds.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::ledger::TurnId;
use crate::stats::{compute_real_stats, RealStats, StatKind, StatSpread, MAX_RANK, MIN_RANK};
use crate::types::ElementType;

/// Number of move slots per combatant.
pub const MOVE_SLOTS: usize = 4;

/// Level used when no configuration says otherwise.
pub const DEFAULT_LEVEL: u8 = 50;

/// HP a combatant holds before its stats have ever been derived.
pub const INITIAL_HP: u32 = 150;

/// Per-attack toggles set on the attacking combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conditions {
    /// Next resolution is a critical hit (×1.5 before the roll loop).
    pub critical_hit: bool,
    /// The tera type counts toward same-type attack bonus.
    pub terastallized: bool,
}

/// One hit taken by a combatant, as shown in its personal damage history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRecord {
    /// Turn in which the hit landed.
    pub turn_id: TurnId,
    /// Identity of the attacker.
    pub attacker_name: String,
    /// Move used.
    pub move_name: String,
    /// Damage dealt by the chosen roll.
    pub damage: u32,
    /// Index of the chosen roll (`None` when the move dealt no damage).
    pub roll_index: Option<usize>,
    /// HP before the hit.
    pub hp_before: u32,
    /// HP after the hit.
    pub hp_after: u32,
}

/// One battling entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    species: Option<String>,
    level: u8,
    spread: StatSpread,
    real_stats: RealStats,
    current_hp: u32,
    max_hp: u32,
    stats_derived: bool,
    item: Option<String>,
    ability: Option<String>,
    tera_type: Option<ElementType>,
    moves: [Option<String>; MOVE_SLOTS],
    active_move: usize,
    conditions: Conditions,
    item_consumed: bool,
    history: Vec<DamageRecord>,
    last_turn_id: Option<TurnId>,
}

impl Combatant {
    /// Create an unnamed combatant at the given level.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self {
            species: None,
            level: level.clamp(1, 100),
            spread: StatSpread::default(),
            real_stats: RealStats::default(),
            current_hp: INITIAL_HP,
            max_hp: INITIAL_HP,
            stats_derived: false,
            item: None,
            ability: None,
            tera_type: None,
            moves: Default::default(),
            active_move: 0,
            conditions: Conditions::default(),
            item_consumed: false,
            history: Vec::new(),
            last_turn_id: None,
        }
    }

    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------

    /// Catalog identity key, if set.
    #[must_use]
    pub fn species(&self) -> Option<&str> {
        self.species.as_deref()
    }

    /// Identity key, or an empty string when unset.
    #[must_use]
    pub fn name(&self) -> &str {
        self.species().unwrap_or("")
    }

    /// Whether an identity key is set.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.species.is_some()
    }

    /// Level (1..=100).
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Stat inputs.
    #[must_use]
    pub const fn spread(&self) -> &StatSpread {
        &self.spread
    }

    /// Cached real stats (stage ranks not applied).
    #[must_use]
    pub const fn real_stats(&self) -> &RealStats {
        &self.real_stats
    }

    /// Current stage rank of a stat.
    #[must_use]
    pub fn rank(&self, stat: StatKind) -> i8 {
        self.spread.rank(stat)
    }

    /// Current HP.
    #[must_use]
    pub const fn current_hp(&self) -> u32 {
        self.current_hp
    }

    /// Maximum HP.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Whether current HP equals max HP.
    #[must_use]
    pub const fn is_full_hp(&self) -> bool {
        self.current_hp == self.max_hp
    }

    /// Whether the combatant is at 0 HP.
    #[must_use]
    pub const fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Held item key.
    #[must_use]
    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    /// Ability key.
    #[must_use]
    pub fn ability(&self) -> Option<&str> {
        self.ability.as_deref()
    }

    /// Tera type tag.
    #[must_use]
    pub const fn tera_type(&self) -> Option<ElementType> {
        self.tera_type
    }

    /// Move keys in slot order.
    #[must_use]
    pub const fn moves(&self) -> &[Option<String>; MOVE_SLOTS] {
        &self.moves
    }

    /// Index of the selected move slot.
    #[must_use]
    pub const fn active_move_index(&self) -> usize {
        self.active_move
    }

    /// Key of the selected move, if that slot is filled.
    #[must_use]
    pub fn active_move(&self) -> Option<&str> {
        self.moves[self.active_move].as_deref()
    }

    /// Per-attack toggles.
    #[must_use]
    pub const fn conditions(&self) -> Conditions {
        self.conditions
    }

    /// Whether the held berry has been used.
    #[must_use]
    pub const fn item_consumed(&self) -> bool {
        self.item_consumed
    }

    /// Hits taken, oldest first.
    #[must_use]
    pub fn history(&self) -> &[DamageRecord] {
        &self.history
    }

    /// Turn of the latest history record.
    #[must_use]
    pub const fn last_turn_id(&self) -> Option<TurnId> {
        self.last_turn_id
    }

    /// Types used for same-type attack bonus: species types, plus the tera
    /// type while terastallized.
    #[must_use]
    pub fn attacking_types<C: Catalog>(&self, catalog: &C) -> Vec<ElementType> {
        let mut types = catalog.types(self.name()).to_vec();
        if self.conditions.terastallized {
            if let Some(tera) = self.tera_type {
                if !types.contains(&tera) {
                    types.push(tera);
                }
            }
        }
        types
    }

    // ---------------------------------------------------------------------
    // Stat derivation
    // ---------------------------------------------------------------------

    /// Re-derive real stats and max HP, then re-clamp current HP.
    ///
    /// A combatant that was at full HP (or whose stats were never derived)
    /// follows the new maximum; otherwise current HP only ever clamps down.
    pub fn recompute<C: Catalog>(&mut self, catalog: &C) {
        let base = catalog.base_stats(self.name());
        let old_max = self.max_hp;
        let old_hp = self.current_hp;

        self.real_stats = compute_real_stats(&base, self.level, &self.spread);
        self.max_hp = self.real_stats.hp;

        if !self.stats_derived || old_hp == old_max {
            self.current_hp = self.max_hp;
        } else {
            self.current_hp = old_hp.min(self.max_hp);
        }
        self.stats_derived = true;

        tracing::debug!(
            species = self.name(),
            max_hp = self.max_hp,
            old_hp,
            new_hp = self.current_hp,
            "Recomputed real stats"
        );
    }

    // ---------------------------------------------------------------------
    // Configuration edits (callers recompute afterwards)
    // ---------------------------------------------------------------------

    pub(crate) fn set_species(&mut self, key: Option<String>) {
        self.species = key.filter(|k| !k.trim().is_empty());
    }

    pub(crate) fn set_level(&mut self, level: u8) {
        self.level = level.clamp(1, 100);
    }

    pub(crate) fn spread_mut(&mut self) -> &mut StatSpread {
        &mut self.spread
    }

    pub(crate) fn set_rank(&mut self, stat: StatKind, rank: i8) {
        if let Some(input) = self.spread.input_mut(stat) {
            input.rank = rank.clamp(MIN_RANK, MAX_RANK);
        }
    }

    pub(crate) fn set_item(&mut self, key: Option<String>) {
        self.item = key.filter(|k| !k.trim().is_empty());
    }

    pub(crate) fn set_ability(&mut self, key: Option<String>) {
        self.ability = key.filter(|k| !k.trim().is_empty());
    }

    pub(crate) fn set_tera_type(&mut self, tera: Option<ElementType>) {
        self.tera_type = tera;
    }

    pub(crate) fn set_move(&mut self, slot: usize, key: Option<String>) {
        if let Some(entry) = self.moves.get_mut(slot) {
            *entry = key.filter(|k| !k.trim().is_empty());
        }
    }

    pub(crate) fn set_active_move(&mut self, slot: usize) {
        if slot < MOVE_SLOTS {
            self.active_move = slot;
        }
    }

    pub(crate) fn conditions_mut(&mut self) -> &mut Conditions {
        &mut self.conditions
    }

    // ---------------------------------------------------------------------
    // HP and history
    // ---------------------------------------------------------------------

    /// Set HP to `hp_before - damage` (floored at 0). A combatant that
    /// started the turn at 0 HP stays at 0.
    pub(crate) fn apply_damage_from(&mut self, hp_before: u32, damage: u32) -> u32 {
        if hp_before > 0 {
            self.current_hp = hp_before.saturating_sub(damage).min(self.max_hp);
        }
        self.current_hp
    }

    /// Heal up to `amount`, never past max HP. Fainted combatants cannot be
    /// healed. Returns the amount actually restored.
    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        if self.current_hp == 0 {
            return 0;
        }
        let before = self.current_hp;
        self.current_hp = before.saturating_add(amount).min(self.max_hp);
        self.current_hp - before
    }

    pub(crate) fn restore_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
    }

    pub(crate) fn mark_item_consumed(&mut self) {
        self.item_consumed = true;
    }

    /// Record a hit. A second record for the same turn replaces the first.
    pub(crate) fn record_damage(&mut self, record: DamageRecord) {
        if self.last_turn_id == Some(record.turn_id) {
            if let Some(last) = self.history.last_mut() {
                *last = record;
                return;
            }
        }
        self.last_turn_id = Some(record.turn_id);
        self.history.push(record);
    }

    /// Drop every history record newer than `turn_id`.
    pub(crate) fn prune_history(&mut self, turn_id: TurnId) {
        self.history.retain(|r| r.turn_id <= turn_id);
        self.last_turn_id = self.history.last().map(|r| r.turn_id);
    }

    /// Clear personal history only.
    pub(crate) fn clear_history(&mut self) {
        self.history.clear();
        self.last_turn_id = None;
    }

    /// Restore full HP, un-consume the item and clear history.
    pub(crate) fn full_reset(&mut self) {
        self.current_hp = self.max_hp;
        self.item_consumed = false;
        self.clear_history();
    }
}

impl Default for Combatant {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}
