//! Proptest strategies for calculator inputs.

use proptest::prelude::*;

use dmg_core::roster::Side;
use dmg_core::stats::{BaseStats, Nature, StatInput, StatSpread, MAX_EFFORT, MAX_RANK, MIN_RANK};
use dmg_core::types::ElementType;

use crate::determinism::SessionAction;

/// Effort values (0..=32).
pub fn arb_effort() -> impl Strategy<Value = u8> {
    0..=MAX_EFFORT
}

/// Stage ranks (-6..=6).
pub fn arb_rank() -> impl Strategy<Value = i8> {
    MIN_RANK..=MAX_RANK
}

/// Levels (1..=100).
pub fn arb_level() -> impl Strategy<Value = u8> {
    1u8..=100
}

/// Base stat values seen in real species (1..=255).
pub fn arb_base_stat() -> impl Strategy<Value = u32> {
    1u32..=255
}

/// Any nature modifier.
pub fn arb_nature() -> impl Strategy<Value = Nature> {
    prop_oneof![Just(Nature::Up), Just(Nature::Down), Just(Nature::Neutral)]
}

/// Any elemental type.
pub fn arb_element() -> impl Strategy<Value = ElementType> {
    (0..ElementType::ALL.len()).prop_map(|i| ElementType::ALL[i])
}

/// One or two distinct defending types.
pub fn arb_defending_types() -> impl Strategy<Value = Vec<ElementType>> {
    (arb_element(), proptest::option::of(arb_element())).prop_map(|(first, second)| {
        let mut types = vec![first];
        if let Some(second) = second.filter(|&t| t != first) {
            types.push(second);
        }
        types
    })
}

/// A full set of base stats.
pub fn arb_base_stats() -> impl Strategy<Value = BaseStats> {
    proptest::array::uniform6(arb_base_stat()).prop_map(
        |[hp, attack, defense, sp_attack, sp_defense, speed]| BaseStats {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        },
    )
}

/// Inputs for one non-HP stat.
pub fn arb_stat_input() -> impl Strategy<Value = StatInput> {
    (arb_effort(), arb_nature(), arb_rank()).prop_map(|(effort, nature, rank)| StatInput {
        effort,
        nature,
        rank,
    })
}

/// A full stat spread.
pub fn arb_stat_spread() -> impl Strategy<Value = StatSpread> {
    (arb_effort(), proptest::array::uniform5(arb_stat_input())).prop_map(
        |(hp_effort, [attack, defense, sp_attack, sp_defense, speed])| StatSpread {
            hp_effort,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        },
    )
}

/// Either side.
pub fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Ally), Just(Side::Enemy)]
}

/// One session action, weighted toward attacks.
pub fn arb_action() -> impl Strategy<Value = SessionAction> {
    prop_oneof![
        4 => arb_side().prop_map(SessionAction::Attack),
        2 => any::<usize>().prop_map(SessionAction::Reroll),
        1 => any::<usize>().prop_map(SessionAction::Revert),
        1 => arb_side().prop_map(SessionAction::UseItem),
        1 => (arb_side(), any::<usize>()).prop_map(|(s, n)| SessionAction::Select(s, n)),
        1 => Just(SessionAction::Reset),
    ]
}

/// A sequence of up to `max_len` actions.
pub fn arb_action_sequence(max_len: usize) -> impl Strategy<Value = Vec<SessionAction>> {
    proptest::collection::vec(arb_action(), 0..max_len)
}
