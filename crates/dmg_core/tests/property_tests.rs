//! Property-based tests for stat derivation, damage rolls and the ledger.

use dmg_core::damage::{self, compute_rolls, DamageInputs};
use dmg_core::prelude::*;
use dmg_core::stats::{compute_real_stats, real_stat, MAX_EFFORT};
use dmg_test_utils::determinism::SessionAction;
use dmg_test_utils::fixtures::{CombatantSpec, SessionBuilder};
use proptest::prelude::*;
use dmg_test_utils::strategies::{
    arb_action_sequence, arb_base_stat, arb_base_stats, arb_defending_types, arb_element,
    arb_level, arb_nature, arb_rank, arb_stat_spread,
};

fn dex_with(attacker: BaseStats, defender: BaseStats, defending: Vec<ElementType>) -> Dex {
    let mut dex = Dex::new();
    dex.register_species(SpeciesData {
        key: "attacker".to_string(),
        display_name: String::new(),
        base_stats: attacker,
        types: vec![ElementType::Normal],
        abilities: Vec::new(),
    })
    .unwrap();
    dex.register_species(SpeciesData {
        key: "defender".to_string(),
        display_name: String::new(),
        base_stats: defender,
        types: defending,
        abilities: Vec::new(),
    })
    .unwrap();
    dex
}

/// Structural ledger checks that must hold after any action.
fn assert_ledger_consistent(session: &BattleSession<Dex>) -> std::result::Result<(), TestCaseError> {
    let entries = session.ledger().entries();
    for (i, entry) in entries.iter().enumerate() {
        match entry {
            LogEntry::Attack(a) => {
                let same_turn = entries
                    .iter()
                    .filter(|e| matches!(e, LogEntry::Attack(o) if o.turn_id == a.turn_id))
                    .count();
                prop_assert_eq!(same_turn, 1);
                let next_is_faint = matches!(
                    entries.get(i + 1),
                    Some(LogEntry::Faint(f)) if f.turn_id == a.turn_id
                );
                prop_assert_eq!(next_is_faint, a.hp_after == 0);
            }
            LogEntry::Faint(f) => {
                let prev_ok = i > 0
                    && matches!(
                        &entries[i - 1],
                        LogEntry::Attack(a) if a.turn_id == f.turn_id && a.hp_after == 0
                    );
                prop_assert!(prev_ok);
            }
            LogEntry::Heal(_) => {}
        }
    }
    for side in Side::BOTH {
        for c in session.rosters().roster(side).iter() {
            prop_assert!(c.current_hp() <= c.max_hp());
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn real_stat_is_monotonic_in_effort(
        base in arb_base_stat(),
        level in arb_level(),
        nature in arb_nature(),
    ) {
        let mut prev = real_stat(base, level, 0, nature);
        for effort in 1..=MAX_EFFORT {
            let next = real_stat(base, level, effort, nature);
            prop_assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn ranks_never_change_real_stats(
        base in arb_base_stats(),
        level in arb_level(),
        spread in arb_stat_spread(),
    ) {
        let mut flat = spread;
        for stat in StatKind::NON_HP {
            if let Some(input) = flat.input_mut(stat) {
                input.rank = 0;
            }
        }
        prop_assert_eq!(
            compute_real_stats(&base, level, &spread),
            compute_real_stats(&base, level, &flat)
        );
    }

    #[test]
    fn zero_power_always_yields_empty_result(
        attacker in arb_base_stats(),
        defender in arb_base_stats(),
        types in arb_defending_types(),
        element in arb_element(),
        rank in arb_rank(),
    ) {
        let dex = dex_with(attacker, defender, types);
        let mut session = BattleSession::new(dex, BattleConfig::default());
        session.set_species(Side::Ally, 0, Some("attacker")).unwrap();
        session.set_species(Side::Enemy, 0, Some("defender")).unwrap();
        session
            .set_stat_input(Side::Ally, 0, StatKind::Attack, StatField::Rank, &rank.to_string())
            .unwrap();
        session.set_critical_hit(Side::Ally, 0, true).unwrap();

        let mv = MoveRef::new("nothing", 0, element, MoveCategory::Physical);
        let result = damage::resolve(
            session.active(Side::Ally),
            session.active(Side::Enemy),
            &mv,
            session.catalog(),
        );
        prop_assert_eq!(result.min, 0);
        prop_assert_eq!(result.max, 0);
        prop_assert!(result.rolls.is_empty());
    }

    #[test]
    fn rolls_are_sixteen_and_sorted(
        attacker in arb_base_stats(),
        defender in arb_base_stats(),
        types in arb_defending_types(),
        element in arb_element(),
        power in 1u32..=250,
        level in arb_level(),
        atk_rank in arb_rank(),
        def_rank in arb_rank(),
        special in any::<bool>(),
        critical in any::<bool>(),
    ) {
        let dex = dex_with(attacker, defender, types);
        let mut session = BattleSession::new(dex, BattleConfig::default());
        session.set_species(Side::Ally, 0, Some("attacker")).unwrap();
        session.set_species(Side::Enemy, 0, Some("defender")).unwrap();
        session.set_level(Side::Ally, 0, level).unwrap();
        let (offense, defense) = if special {
            (StatKind::SpAttack, StatKind::SpDefense)
        } else {
            (StatKind::Attack, StatKind::Defense)
        };
        session
            .set_stat_input(Side::Ally, 0, offense, StatField::Rank, &atk_rank.to_string())
            .unwrap();
        session
            .set_stat_input(Side::Enemy, 0, defense, StatField::Rank, &def_rank.to_string())
            .unwrap();
        session.set_critical_hit(Side::Ally, 0, critical).unwrap();

        let category = if special { MoveCategory::Special } else { MoveCategory::Physical };
        let mv = MoveRef::new("strike", power, element, category);
        let result = damage::resolve(
            session.active(Side::Ally),
            session.active(Side::Enemy),
            &mv,
            session.catalog(),
        );

        prop_assert_eq!(result.rolls.len(), ROLL_COUNT);
        prop_assert_eq!(result.min, result.rolls[0]);
        prop_assert_eq!(result.max, result.rolls[ROLL_COUNT - 1]);
        if result.type_effectiveness.is_zero() {
            prop_assert!(result.rolls.iter().all(|&r| r == 0));
        } else {
            prop_assert!(result.rolls.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(result.rolls.iter().all(|&r| r >= 1));
        }
    }

    #[test]
    fn immunity_zeroes_every_roll(
        level in arb_level(),
        power in 1u32..=250,
        attack in 1u32..=999,
        defense in 1u32..=999,
        critical in any::<bool>(),
    ) {
        let rolls = compute_rolls(&DamageInputs {
            level,
            power,
            attack,
            defense,
            critical,
            stab: Ratio::THREE_HALVES,
            effectiveness: Ratio::ZERO,
            damage_boost: Some(Ratio::new(13, 10)),
        });
        prop_assert_eq!(rolls.len(), ROLL_COUNT);
        prop_assert!(rolls.iter().all(|&r| r == 0));
    }

    #[test]
    fn ledger_stays_consistent_under_random_actions(
        seed in any::<u64>(),
        actions in arb_action_sequence(30),
    ) {
        let mut session = SessionBuilder::new()
            .seed(seed)
            .ally(CombatantSpec::new("chien_pao").with_move("icicle_crash"))
            .enemy(
                CombatantSpec::new("flutter_mane")
                    .item("sitrus_berry")
                    .with_move("moonblast"),
            )
            .build();

        for action in actions {
            action.apply(&mut session);
            assert_ledger_consistent(&session)?;

            let berry_heals = session
                .ledger()
                .entries()
                .iter()
                .filter(|e| matches!(e, LogEntry::Heal(h) if h.item == "sitrus_berry"))
                .count();
            prop_assert!(berry_heals <= 1);
        }
    }

    #[test]
    fn reroll_twice_with_same_roll_is_idempotent(
        seed in any::<u64>(),
        roll in 0usize..ROLL_COUNT,
    ) {
        let mut session = SessionBuilder::new()
            .seed(seed)
            .ally(CombatantSpec::new("garchomp").with_move("earthquake"))
            .enemy(CombatantSpec::new("ting_lu"))
            .build();
        let outcome = session.resolve_attack_with_active_move(Side::Ally).unwrap();

        session.choose_roll(outcome.turn_id, roll).unwrap();
        let once = session.ledger().clone();
        let hp_once = session.rosters().snapshot();
        session.choose_roll(outcome.turn_id, roll).unwrap();

        prop_assert_eq!(session.ledger(), &once);
        prop_assert_eq!(session.rosters().snapshot(), hp_once);
    }

    #[test]
    fn revert_restores_the_stored_snapshot(
        seed in any::<u64>(),
        actions in arb_action_sequence(20),
        pick in any::<usize>(),
    ) {
        let mut session = SessionBuilder::new()
            .seed(seed)
            .ally(CombatantSpec::new("garchomp").item("leftovers").with_move("earthquake"))
            .enemy(CombatantSpec::new("chi_yu").item("figy_berry").with_move("overheat"))
            .build();
        for action in actions {
            action.apply(&mut session);
        }
        SessionAction::Attack(Side::Ally).apply(&mut session);

        let len = session.ledger().len();
        prop_assume!(len > 0);
        let index = pick % len;
        let expected = *session.ledger().get(index).unwrap().snapshot();
        let turn = session.ledger().get(index).unwrap().turn_id();

        prop_assert!(session.revert_to(index));
        prop_assert_eq!(session.rosters().snapshot(), expected);
        for side in Side::BOTH {
            for c in session.rosters().roster(side).iter() {
                prop_assert!(c.history().iter().all(|r| r.turn_id <= turn));
            }
        }
        assert_ledger_consistent(&session)?;
    }
}
