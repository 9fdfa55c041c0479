//! # Damage Ledger Core
//!
//! Deterministic single-attack resolution for a 1v1 battle between two
//! six-member rosters, plus a correctable log of those resolutions.
//!
//! This crate contains **only** calculator logic:
//! - No rendering
//! - No IO
//! - No system randomness (the default roll comes from a seeded RNG)
//! - No floating-point damage math (multipliers are exact ratios)
//!
//! ## Crate Structure
//!
//! - [`stats`] - Real-stat derivation and stage ranks
//! - [`damage`] - The 16-roll damage resolver and KO analysis
//! - [`items`] - Berry and passive item healing
//! - [`roster`] - Both rosters and HP snapshots
//! - [`ledger`] - The turn ledger (reroll, faint sync, revert)
//! - [`session`] - The public operations tying it all together
//! - [`catalog`] - Species, move and item lookups

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod combatant;
pub mod config;
pub mod damage;
pub mod data;
pub mod error;
pub mod items;
pub mod ledger;
pub mod math;
pub mod roster;
pub mod session;
pub mod stats;
pub mod types;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{Catalog, Dex};
    pub use crate::combatant::{Combatant, Conditions, DamageRecord};
    pub use crate::config::{BattleConfig, RollPolicy};
    pub use crate::damage::{DamageResult, KoChance, ROLL_COUNT};
    pub use crate::data::{
        CatalogData, ItemData, ItemEffect, MoveCategory, MoveData, MoveRef, SpeciesData,
    };
    pub use crate::error::{CalcError, Result};
    pub use crate::items::HealOutcome;
    pub use crate::ledger::{AttackEntry, FaintEntry, HealEntry, LogEntry, TurnId, TurnLedger};
    pub use crate::math::Ratio;
    pub use crate::roster::{Side, Snapshot, ROSTER_SIZE};
    pub use crate::session::{AttackOutcome, BattleSession, StatField};
    pub use crate::stats::{BaseStats, Nature, RealStats, StatKind};
    pub use crate::types::{ElementType, TypeChart};
}
