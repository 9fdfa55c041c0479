//! Turn ledger: the correctable battle log.
//!
//! The ledger records every resolved attack, item heal and knockout in
//! order. Each entry carries a [`Snapshot`] of all twelve HP values taken
//! when the entry was finalized, which is what makes [`TurnLedger::revert_to`]
//! possible.
//!
//! Mutation is limited to three named operations:
//!
//! - **replace**: a reroll overwrites the Attack entry of its own turn
//! - **insert**: a Faint entry is placed directly after its Attack entry
//! - **prune**: a revert drops every entry after the target
//!
//! A Faint entry exists for a turn exactly when that turn's Attack entry has
//! `hp_after == 0`, and it always sits at the Attack entry's index + 1.

use serde::{Deserialize, Serialize};

use crate::damage::roll_percent;
use crate::roster::{Side, Snapshot};

/// Identifier of one user-initiated attack action.
pub type TurnId = u32;

/// An attack applied to a defender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackEntry {
    /// Turn of the attack.
    pub turn_id: TurnId,
    /// Attacking side.
    pub attacker_side: Side,
    /// Attacker identity.
    pub attacker_name: String,
    /// Defender roster slot.
    pub defender_slot: usize,
    /// Defender identity.
    pub defender_name: String,
    /// Move used.
    pub move_name: String,
    /// Damage of the applied roll.
    pub damage: u32,
    /// Applied roll index, `None` if the move dealt no damage.
    pub roll_index: Option<usize>,
    /// Defender HP at the start of the turn.
    pub hp_before: u32,
    /// Defender HP after the applied roll.
    pub hp_after: u32,
    /// HP of every combatant after the attack.
    pub snapshot: Snapshot,
}

impl AttackEntry {
    /// Side that was hit.
    #[must_use]
    pub const fn defender_side(&self) -> Side {
        self.attacker_side.opponent()
    }

    /// Applied roll as a percentage label such as `"92%"`.
    #[must_use]
    pub fn roll_label(&self) -> String {
        self.roll_index
            .map_or_else(|| "-".to_string(), |i| format!("{}%", roll_percent(i)))
    }
}

/// HP restored by an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealEntry {
    /// Turn counter at the time of the heal.
    pub turn_id: TurnId,
    /// Side of the healed combatant.
    pub side: Side,
    /// Roster slot of the healed combatant.
    pub slot: usize,
    /// Healed combatant identity.
    pub combatant_name: String,
    /// Item identity key.
    pub item: String,
    /// Item heal message.
    pub message: String,
    /// HP restored.
    pub amount: u32,
    /// HP before the heal.
    pub hp_before: u32,
    /// HP after the heal.
    pub hp_after: u32,
    /// HP of every combatant after the heal.
    pub snapshot: Snapshot,
}

/// A combatant knocked out by an attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaintEntry {
    /// Turn of the knockout.
    pub turn_id: TurnId,
    /// Side of the fainted combatant.
    pub side: Side,
    /// Fainted combatant identity.
    pub defender_name: String,
    /// Same snapshot as the attack that caused it.
    pub snapshot: Snapshot,
}

impl FaintEntry {
    fn from_attack(attack: &AttackEntry) -> Self {
        Self {
            turn_id: attack.turn_id,
            side: attack.defender_side(),
            defender_name: attack.defender_name.clone(),
            snapshot: attack.snapshot,
        }
    }
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntry {
    /// An attack.
    Attack(AttackEntry),
    /// An item heal.
    Heal(HealEntry),
    /// A knockout.
    Faint(FaintEntry),
}

impl LogEntry {
    /// Turn of this entry.
    #[must_use]
    pub const fn turn_id(&self) -> TurnId {
        match self {
            Self::Attack(e) => e.turn_id,
            Self::Heal(e) => e.turn_id,
            Self::Faint(e) => e.turn_id,
        }
    }

    /// HP snapshot stored with this entry.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        match self {
            Self::Attack(e) => &e.snapshot,
            Self::Heal(e) => &e.snapshot,
            Self::Faint(e) => &e.snapshot,
        }
    }

    /// The attack, if this is an Attack entry.
    #[must_use]
    pub const fn as_attack(&self) -> Option<&AttackEntry> {
        match self {
            Self::Attack(e) => Some(e),
            _ => None,
        }
    }

    const fn is_faint_of(&self, turn_id: TurnId) -> bool {
        matches!(self, Self::Faint(e) if e.turn_id == turn_id)
    }
}

/// Outcome of a revert, for the caller to apply to the rosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertPoint {
    /// Snapshot to restore.
    pub snapshot: Snapshot,
    /// Newest turn that survives; history past it is pruned.
    pub turn_id: TurnId,
}

/// Ordered, turn-indexed battle log with its own turn counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnLedger {
    entries: Vec<LogEntry>,
    turn_counter: TurnId,
}

impl TurnLedger {
    /// Create an empty ledger at turn 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attack turn and return its id.
    pub fn begin_turn(&mut self) -> TurnId {
        self.turn_counter += 1;
        self.turn_counter
    }

    /// Id of the most recently started turn (0 before any attack).
    #[must_use]
    pub const fn current_turn(&self) -> TurnId {
        self.turn_counter
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index and contents of the Attack entry of `turn_id`.
    #[must_use]
    pub fn find_attack(&self, turn_id: TurnId) -> Option<(usize, &AttackEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find_map(|(i, e)| e.as_attack().filter(|a| a.turn_id == turn_id).map(|a| (i, a)))
    }

    /// Record an attack. An existing Attack entry of the same turn is
    /// replaced in place; otherwise the entry is appended. The turn's Faint
    /// entry is synchronized afterwards. Returns the entry's index.
    pub fn record_attack(&mut self, entry: AttackEntry) -> usize {
        let index = match self.find_attack(entry.turn_id) {
            Some((index, _)) => {
                self.replace(index, LogEntry::Attack(entry));
                index
            }
            None => {
                self.entries.push(LogEntry::Attack(entry));
                self.entries.len() - 1
            }
        };
        self.sync_faint_entry(index);
        index
    }

    /// Make the Faint entry after the Attack entry at `index` agree with the
    /// attack's `hp_after`. Idempotent.
    pub fn sync_faint_entry(&mut self, index: usize) {
        let Some(attack) = self.entries.get(index).and_then(LogEntry::as_attack) else {
            return;
        };
        let turn_id = attack.turn_id;
        let faint = (attack.hp_after == 0).then(|| FaintEntry::from_attack(attack));
        let existing = self.entries.iter().position(|e| e.is_faint_of(turn_id));

        match (faint, existing) {
            (Some(faint), Some(at)) => self.replace(at, LogEntry::Faint(faint)),
            (Some(faint), None) => self.insert(index + 1, LogEntry::Faint(faint)),
            (None, Some(at)) => {
                self.entries.remove(at);
            }
            (None, None) => {}
        }
    }

    /// Append a heal entry.
    pub fn record_heal(&mut self, entry: HealEntry) {
        self.entries.push(LogEntry::Heal(entry));
    }

    /// Drop every entry after `index` and return the snapshot to restore.
    ///
    /// Reverting to an Attack entry keeps its Faint entry. Returns `None`
    /// when `index` is out of range.
    pub fn revert_to(&mut self, index: usize) -> Option<RevertPoint> {
        let target = self.entries.get(index)?;
        let point = RevertPoint {
            snapshot: *target.snapshot(),
            turn_id: target.turn_id(),
        };
        let keep_faint = matches!(target, LogEntry::Attack(a) if a.hp_after == 0)
            && self
                .entries
                .get(index + 1)
                .is_some_and(|e| e.is_faint_of(point.turn_id));
        self.prune(if keep_faint { index + 2 } else { index + 1 });
        Some(point)
    }

    /// Remove every entry and reset the turn counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.turn_counter = 0;
    }

    fn replace(&mut self, index: usize, entry: LogEntry) {
        self.entries[index] = entry;
    }

    fn insert(&mut self, index: usize, entry: LogEntry) {
        self.entries.insert(index.min(self.entries.len()), entry);
    }

    fn prune(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}
