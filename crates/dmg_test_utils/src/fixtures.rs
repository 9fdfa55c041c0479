//! Test fixtures and helpers.
//!
//! A small catalog of real species, moves and items (`data/catalog.ron`)
//! plus a builder for sessions with named combatants, for consistent
//! testing across crates.

use dmg_core::catalog::Dex;
use dmg_core::config::{BattleConfig, RollPolicy};
use dmg_core::data::CatalogData;
use dmg_core::roster::Side;
use dmg_core::session::BattleSession;
use dmg_core::stats::StatKind;
use dmg_core::types::ElementType;

/// RON source of the fixture catalog.
pub const FIXTURE_CATALOG_RON: &str = include_str!("../data/catalog.ron");

/// Parse the fixture catalog document.
///
/// # Panics
///
/// Panics if the embedded RON is malformed.
#[must_use]
pub fn fixture_catalog_data() -> CatalogData {
    ron::from_str(FIXTURE_CATALOG_RON).expect("fixture catalog should parse")
}

/// The fixture catalog as a [`Dex`].
///
/// # Panics
///
/// Panics if the embedded RON is malformed or has duplicate keys.
#[must_use]
pub fn fixture_dex() -> Dex {
    Dex::from_data(fixture_catalog_data()).expect("fixture catalog keys should be unique")
}

/// Configuration of one combatant slot.
#[derive(Debug, Clone, Default)]
pub struct CombatantSpec {
    /// Species key.
    pub species: Option<String>,
    /// Level (defaults to the session default).
    pub level: Option<u8>,
    /// Held item key.
    pub item: Option<String>,
    /// Move keys in slot order.
    pub moves: Vec<String>,
    /// Effort per stat.
    pub efforts: Vec<(StatKind, u8)>,
    /// Nature text per stat (`"up"` / `"down"`).
    pub natures: Vec<(StatKind, &'static str)>,
    /// Stage rank per stat.
    pub ranks: Vec<(StatKind, i8)>,
    /// Tera type.
    pub tera: Option<ElementType>,
}

impl CombatantSpec {
    /// Configuration for a species with everything else defaulted.
    #[must_use]
    pub fn new(species: &str) -> Self {
        Self {
            species: Some(species.to_string()),
            ..Self::default()
        }
    }

    /// Set the level.
    #[must_use]
    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the held item.
    #[must_use]
    pub fn item(mut self, item: &str) -> Self {
        self.item = Some(item.to_string());
        self
    }

    /// Append a move.
    #[must_use]
    pub fn with_move(mut self, key: &str) -> Self {
        self.moves.push(key.to_string());
        self
    }

    /// Set effort for a stat.
    #[must_use]
    pub fn effort(mut self, stat: StatKind, effort: u8) -> Self {
        self.efforts.push((stat, effort));
        self
    }

    /// Set nature text for a stat.
    #[must_use]
    pub fn nature(mut self, stat: StatKind, nature: &'static str) -> Self {
        self.natures.push((stat, nature));
        self
    }

    /// Set a stage rank.
    #[must_use]
    pub fn rank(mut self, stat: StatKind, rank: i8) -> Self {
        self.ranks.push((stat, rank));
        self
    }

    /// Set the tera type.
    #[must_use]
    pub fn tera(mut self, tera: ElementType) -> Self {
        self.tera = Some(tera);
        self
    }
}

/// Builds a [`BattleSession`] over the fixture catalog.
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: BattleConfig,
    slots: Vec<(Side, usize, CombatantSpec)>,
}

impl SessionBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a roll policy.
    #[must_use]
    pub fn roll_policy(mut self, policy: RollPolicy) -> Self {
        self.config.roll_policy = policy;
        self
    }

    /// Use an RNG seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    /// Configure slot `slot` of `side`.
    #[must_use]
    pub fn slot(mut self, side: Side, slot: usize, spec: CombatantSpec) -> Self {
        self.slots.push((side, slot, spec));
        self
    }

    /// Configure slot 0 of the ally side.
    #[must_use]
    pub fn ally(self, spec: CombatantSpec) -> Self {
        self.slot(Side::Ally, 0, spec)
    }

    /// Configure slot 0 of the enemy side.
    #[must_use]
    pub fn enemy(self, spec: CombatantSpec) -> Self {
        self.slot(Side::Enemy, 0, spec)
    }

    /// Build the session.
    ///
    /// # Panics
    ///
    /// Panics if a slot or move index is out of range.
    #[must_use]
    pub fn build(self) -> BattleSession<Dex> {
        use dmg_core::session::StatField;

        let mut session = BattleSession::new(fixture_dex(), self.config);
        for (side, slot, spec) in self.slots {
            session
                .set_species(side, slot, spec.species.as_deref())
                .expect("valid slot");
            if let Some(level) = spec.level {
                session.set_level(side, slot, level).expect("valid slot");
            }
            session
                .set_item(side, slot, spec.item.as_deref())
                .expect("valid slot");
            for (i, key) in spec.moves.iter().enumerate() {
                session
                    .set_move(side, slot, i, Some(key.as_str()))
                    .expect("at most four moves");
            }
            for (stat, effort) in spec.efforts {
                session
                    .set_stat_input(side, slot, stat, StatField::Effort, &effort.to_string())
                    .expect("valid slot");
            }
            for (stat, nature) in spec.natures {
                session
                    .set_stat_input(side, slot, stat, StatField::Nature, nature)
                    .expect("valid slot");
            }
            for (stat, rank) in spec.ranks {
                session
                    .set_stat_input(side, slot, stat, StatField::Rank, &rank.to_string())
                    .expect("valid slot");
            }
            session
                .set_tera_type(side, slot, spec.tera)
                .expect("valid slot");
        }
        session
    }
}

/// Garchomp vs Flutter Mane, each slot 0, with fixed min rolls.
#[must_use]
pub fn garchomp_vs_flutter_mane() -> BattleSession<Dex> {
    SessionBuilder::new()
        .roll_policy(RollPolicy::Min)
        .ally(
            CombatantSpec::new("garchomp")
                .with_move("earthquake")
                .with_move("stone_edge"),
        )
        .enemy(
            CombatantSpec::new("flutter_mane")
                .item("sitrus_berry")
                .with_move("moonblast")
                .with_move("shadow_ball"),
        )
        .build()
}
