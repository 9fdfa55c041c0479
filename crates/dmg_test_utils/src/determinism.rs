//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a battle session produces an
//! identical ledger and identical HP values given the same seed and the same
//! sequence of user actions.
//!
//! # Testing Strategy
//!
//! Sources of non-determinism the calculator must avoid:
//!
//! - **Floating-point math**: every multiplier is an exact ratio.
//! - **System randomness**: the default roll comes from a seeded RNG only.
//! - **HashMap iteration order**: catalog maps are only ever read by key.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use dmg_core::catalog::Dex;
use dmg_core::damage::ROLL_COUNT;
use dmg_core::roster::{Side, ROSTER_SIZE};
use dmg_core::session::BattleSession;

/// One user action against a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Attack with the active combatant of a side using its active move.
    Attack(Side),
    /// Re-apply roll `n % 16` of the latest turn.
    Reroll(usize),
    /// Revert to ledger entry `n % len`.
    Revert(usize),
    /// Use the held item of a side's active combatant.
    UseItem(Side),
    /// Switch the selected slot (`n % 6`).
    Select(Side, usize),
    /// Reset everything.
    Reset,
}

impl SessionAction {
    /// Apply this action, ignoring rejected requests.
    pub fn apply(self, session: &mut BattleSession<Dex>) {
        match self {
            Self::Attack(side) => {
                let _ = session.resolve_attack_with_active_move(side);
            }
            Self::Reroll(n) => {
                if let Some(turn) = session.rerollable_turn() {
                    let _ = session.choose_roll(turn, n % ROLL_COUNT);
                }
            }
            Self::Revert(n) => {
                let len = session.ledger().len();
                if len > 0 {
                    session.revert_to(n % len);
                }
            }
            Self::UseItem(side) => {
                let _ = session.check_and_apply_item(side);
            }
            Self::Select(side, n) => {
                let _ = session.select_slot(side, n % ROSTER_SIZE);
            }
            Self::Reset => session.reset_all(),
        }
    }
}

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of actions applied per run.
    pub actions: usize,
}

impl DeterminismResult {
    /// Assert that every run matched.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic,
            "Session is non-deterministic after {} actions: {:?}",
            self.actions, self.hashes
        );
    }
}

/// Run the same actions on `runs` fresh sessions and compare their states.
pub fn verify_determinism<Setup>(
    runs: usize,
    setup: Setup,
    actions: &[SessionAction],
) -> DeterminismResult
where
    Setup: Fn() -> BattleSession<Dex>,
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let mut session = setup();
            for action in actions {
                action.apply(&mut session);
            }
            session_hash(&session)
        })
        .collect();

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    if !is_deterministic {
        tracing::warn!(runs, actions = actions.len(), ?hashes, "Session runs diverged");
    }

    DeterminismResult {
        is_deterministic,
        hashes,
        actions: actions.len(),
    }
}

/// Hash of a session's ledger and HP values.
#[must_use]
pub fn session_hash(session: &BattleSession<Dex>) -> u64 {
    let ledger = ron::to_string(session.ledger()).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    ledger.hash(&mut hasher);
    session.rosters().snapshot().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{CombatantSpec, SessionBuilder};
    use crate::strategies::arb_action_sequence;
    use proptest::prelude::*;

    fn setup(seed: u64) -> BattleSession<Dex> {
        SessionBuilder::new()
            .seed(seed)
            .ally(CombatantSpec::new("chien_pao").with_move("icicle_crash"))
            .enemy(
                CombatantSpec::new("ting_lu")
                    .item("leftovers")
                    .with_move("earthquake"),
            )
            .build()
    }

    #[test]
    fn test_same_seed_same_ledger() {
        let actions = [
            SessionAction::Attack(Side::Ally),
            SessionAction::Attack(Side::Enemy),
            SessionAction::Attack(Side::Ally),
            SessionAction::Reroll(7),
            SessionAction::Revert(1),
            SessionAction::Attack(Side::Ally),
        ];
        verify_determinism(3, || setup(42), &actions).assert_deterministic();
    }

    proptest! {
        #[test]
        fn prop_random_action_sequences_are_deterministic(
            seed in any::<u64>(),
            actions in arb_action_sequence(20),
        ) {
            let result = verify_determinism(2, || setup(seed), &actions);
            prop_assert!(result.is_deterministic);
        }
    }
}
