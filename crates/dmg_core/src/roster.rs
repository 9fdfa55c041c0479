//! Both sides' rosters and HP snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::combatant::Combatant;
use crate::error::{CalcError, Result};

/// Number of combatants per roster.
pub const ROSTER_SIZE: usize = 6;

/// One of the two battling sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The user's side.
    Ally,
    /// The opposing side.
    Enemy,
}

impl Side {
    /// Both sides, ally first.
    pub const BOTH: [Self; 2] = [Self::Ally, Self::Enemy];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Ally => Self::Enemy,
            Self::Enemy => Self::Ally,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ally => "ally",
            Self::Enemy => "enemy",
        })
    }
}

/// Current HP of all twelve combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Snapshot {
    /// Ally HP by slot.
    pub ally_hps: [u32; ROSTER_SIZE],
    /// Enemy HP by slot.
    pub enemy_hps: [u32; ROSTER_SIZE],
}

impl Snapshot {
    /// HP values of one side.
    #[must_use]
    pub const fn side(&self, side: Side) -> &[u32; ROSTER_SIZE] {
        match side {
            Side::Ally => &self.ally_hps,
            Side::Enemy => &self.enemy_hps,
        }
    }
}

/// Six combatants plus the selected slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    members: [Combatant; ROSTER_SIZE],
    selected: usize,
}

impl Roster {
    /// Create a roster of unnamed combatants at `level`.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self {
            members: std::array::from_fn(|_| Combatant::new(level)),
            selected: 0,
        }
    }

    /// Combatant at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Combatant> {
        self.members.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.members.get_mut(index)
    }

    /// Selected slot index.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Selected combatant.
    #[must_use]
    pub fn active(&self) -> &Combatant {
        &self.members[self.selected]
    }

    pub(crate) fn active_mut(&mut self) -> &mut Combatant {
        &mut self.members[self.selected]
    }

    /// Combatants in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.members.iter_mut()
    }

    /// Number of combatants at 0 HP that have an identity.
    #[must_use]
    pub fn fainted_count(&self) -> usize {
        self.members
            .iter()
            .filter(|c| c.has_identity() && c.is_fainted())
            .count()
    }

    fn hps(&self) -> [u32; ROSTER_SIZE] {
        std::array::from_fn(|i| self.members[i].current_hp())
    }
}

/// Both rosters. The single source of truth for combatant HP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterState {
    ally: Roster,
    enemy: Roster,
}

impl RosterState {
    /// Create both rosters with every combatant at `level`, stats derived.
    #[must_use]
    pub fn new<C: Catalog>(level: u8, catalog: &C) -> Self {
        let mut state = Self {
            ally: Roster::new(level),
            enemy: Roster::new(level),
        };
        for side in Side::BOTH {
            for combatant in state.roster_mut(side).iter_mut() {
                combatant.recompute(catalog);
            }
        }
        state
    }

    /// Roster of one side.
    #[must_use]
    pub const fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Ally => &self.ally,
            Side::Enemy => &self.enemy,
        }
    }

    pub(crate) fn roster_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::Ally => &mut self.ally,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Combatant at `(side, index)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `index >= 6`.
    pub fn combatant(&self, side: Side, index: usize) -> Result<&Combatant> {
        self.roster(side)
            .get(index)
            .ok_or(CalcError::InvalidSlot { side, index })
    }

    pub(crate) fn combatant_mut(&mut self, side: Side, index: usize) -> Result<&mut Combatant> {
        self.roster_mut(side)
            .get_mut(index)
            .ok_or(CalcError::InvalidSlot { side, index })
    }

    /// Selected combatant of a side.
    #[must_use]
    pub fn active(&self, side: Side) -> &Combatant {
        self.roster(side).active()
    }

    pub(crate) fn active_mut(&mut self, side: Side) -> &mut Combatant {
        self.roster_mut(side).active_mut()
    }

    /// Switch the selected slot of a side.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidSlot`] if `index >= 6`.
    pub(crate) fn select(&mut self, side: Side, index: usize) -> Result<()> {
        if index >= ROSTER_SIZE {
            return Err(CalcError::InvalidSlot { side, index });
        }
        self.roster_mut(side).selected = index;
        Ok(())
    }

    /// Copy all twelve HP values.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ally_hps: self.ally.hps(),
            enemy_hps: self.enemy.hps(),
        }
    }

    /// Overwrite all twelve HP values from a snapshot.
    pub(crate) fn restore(&mut self, snapshot: &Snapshot) {
        for side in Side::BOTH {
            let hps = snapshot.side(side);
            for (combatant, &hp) in self.roster_mut(side).iter_mut().zip(hps) {
                combatant.restore_hp(hp);
            }
        }
    }

    /// Every combatant, both sides.
    pub(crate) fn all_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.ally.iter_mut().chain(self.enemy.iter_mut())
    }
}
