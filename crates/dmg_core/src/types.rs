//! Elemental types and the type-effectiveness chart.
//!
//! The chart is a static 18×18 table of attacking type vs defending type.
//! Each cell is one of four effectiveness classes; combining several
//! defending types multiplies their cells together.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::math::Ratio;

/// Number of elemental types.
pub const TYPE_COUNT: usize = 18;

/// Elemental type of a species or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ElementType {
    /// Normal.
    #[default]
    Normal,
    /// Fire.
    Fire,
    /// Water.
    Water,
    /// Electric.
    Electric,
    /// Grass.
    Grass,
    /// Ice.
    Ice,
    /// Fighting.
    Fighting,
    /// Poison.
    Poison,
    /// Ground.
    Ground,
    /// Flying.
    Flying,
    /// Psychic.
    Psychic,
    /// Bug.
    Bug,
    /// Rock.
    Rock,
    /// Ghost.
    Ghost,
    /// Dragon.
    Dragon,
    /// Dark.
    Dark,
    /// Steel.
    Steel,
    /// Fairy.
    Fairy,
}

impl ElementType {
    /// All types in chart order.
    pub const ALL: [Self; TYPE_COUNT] = [
        Self::Normal,
        Self::Fire,
        Self::Water,
        Self::Electric,
        Self::Grass,
        Self::Ice,
        Self::Fighting,
        Self::Poison,
        Self::Ground,
        Self::Flying,
        Self::Psychic,
        Self::Bug,
        Self::Rock,
        Self::Ghost,
        Self::Dragon,
        Self::Dark,
        Self::Steel,
        Self::Fairy,
    ];

    /// Row/column index of this type in the chart.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// English name of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Fire => "Fire",
            Self::Water => "Water",
            Self::Electric => "Electric",
            Self::Grass => "Grass",
            Self::Ice => "Ice",
            Self::Fighting => "Fighting",
            Self::Poison => "Poison",
            Self::Ground => "Ground",
            Self::Flying => "Flying",
            Self::Psychic => "Psychic",
            Self::Bug => "Bug",
            Self::Rock => "Rock",
            Self::Ghost => "Ghost",
            Self::Dragon => "Dragon",
            Self::Dark => "Dark",
            Self::Steel => "Steel",
            Self::Fairy => "Fairy",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown type: {s}"))
    }
}

/// One cell of the effectiveness chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Effectiveness {
    /// ×0.
    Immune,
    /// ×0.5.
    Resisted,
    /// ×1.
    #[default]
    Neutral,
    /// ×2.
    Super,
}

impl Effectiveness {
    /// Multiplier for this cell.
    #[must_use]
    pub const fn ratio(self) -> Ratio {
        match self {
            Self::Immune => Ratio::ZERO,
            Self::Resisted => Ratio::new(1, 2),
            Self::Neutral => Ratio::ONE,
            Self::Super => Ratio::whole(2),
        }
    }
}

/// Static attacking-type × defending-type effectiveness table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeChart {
    cells: [[Effectiveness; TYPE_COUNT]; TYPE_COUNT],
}

impl TypeChart {
    /// A chart where every matchup is neutral.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            cells: [[Effectiveness::Neutral; TYPE_COUNT]; TYPE_COUNT],
        }
    }

    /// The standard modern chart.
    #[must_use]
    pub fn standard() -> Self {
        use ElementType as T;
        use Effectiveness::{Immune as X, Resisted as H, Super as S};

        let mut chart = Self::neutral();
        let rows: &[(T, &[(T, Effectiveness)])] = &[
            (T::Normal, &[(T::Rock, H), (T::Ghost, X), (T::Steel, H)]),
            (
                T::Fire,
                &[
                    (T::Fire, H),
                    (T::Water, H),
                    (T::Grass, S),
                    (T::Ice, S),
                    (T::Bug, S),
                    (T::Rock, H),
                    (T::Dragon, H),
                    (T::Steel, S),
                ],
            ),
            (
                T::Water,
                &[
                    (T::Fire, S),
                    (T::Water, H),
                    (T::Grass, H),
                    (T::Ground, S),
                    (T::Rock, S),
                    (T::Dragon, H),
                ],
            ),
            (
                T::Electric,
                &[
                    (T::Water, S),
                    (T::Electric, H),
                    (T::Grass, H),
                    (T::Ground, X),
                    (T::Flying, S),
                    (T::Dragon, H),
                ],
            ),
            (
                T::Grass,
                &[
                    (T::Fire, H),
                    (T::Water, S),
                    (T::Grass, H),
                    (T::Poison, H),
                    (T::Ground, S),
                    (T::Flying, H),
                    (T::Bug, H),
                    (T::Rock, S),
                    (T::Dragon, H),
                    (T::Steel, H),
                ],
            ),
            (
                T::Ice,
                &[
                    (T::Fire, H),
                    (T::Water, H),
                    (T::Grass, S),
                    (T::Ice, H),
                    (T::Ground, S),
                    (T::Flying, S),
                    (T::Dragon, S),
                    (T::Steel, H),
                ],
            ),
            (
                T::Fighting,
                &[
                    (T::Normal, S),
                    (T::Ice, S),
                    (T::Poison, H),
                    (T::Flying, H),
                    (T::Psychic, H),
                    (T::Bug, H),
                    (T::Rock, S),
                    (T::Ghost, X),
                    (T::Dark, S),
                    (T::Steel, S),
                    (T::Fairy, H),
                ],
            ),
            (
                T::Poison,
                &[
                    (T::Grass, S),
                    (T::Poison, H),
                    (T::Ground, H),
                    (T::Rock, H),
                    (T::Ghost, H),
                    (T::Steel, X),
                    (T::Fairy, S),
                ],
            ),
            (
                T::Ground,
                &[
                    (T::Fire, S),
                    (T::Electric, S),
                    (T::Grass, H),
                    (T::Poison, S),
                    (T::Flying, X),
                    (T::Bug, H),
                    (T::Rock, S),
                    (T::Steel, S),
                ],
            ),
            (
                T::Flying,
                &[
                    (T::Electric, H),
                    (T::Grass, S),
                    (T::Fighting, S),
                    (T::Bug, S),
                    (T::Rock, H),
                    (T::Steel, H),
                ],
            ),
            (
                T::Psychic,
                &[
                    (T::Fighting, S),
                    (T::Poison, S),
                    (T::Psychic, H),
                    (T::Dark, X),
                    (T::Steel, H),
                ],
            ),
            (
                T::Bug,
                &[
                    (T::Fire, H),
                    (T::Grass, S),
                    (T::Fighting, H),
                    (T::Poison, H),
                    (T::Flying, H),
                    (T::Psychic, S),
                    (T::Ghost, H),
                    (T::Dark, S),
                    (T::Steel, H),
                    (T::Fairy, H),
                ],
            ),
            (
                T::Rock,
                &[
                    (T::Fire, S),
                    (T::Ice, S),
                    (T::Fighting, H),
                    (T::Ground, H),
                    (T::Flying, S),
                    (T::Bug, S),
                    (T::Steel, H),
                ],
            ),
            (
                T::Ghost,
                &[(T::Normal, X), (T::Psychic, S), (T::Ghost, S), (T::Dark, H)],
            ),
            (T::Dragon, &[(T::Dragon, S), (T::Steel, H), (T::Fairy, X)]),
            (
                T::Dark,
                &[
                    (T::Fighting, H),
                    (T::Psychic, S),
                    (T::Ghost, S),
                    (T::Dark, H),
                    (T::Fairy, H),
                ],
            ),
            (
                T::Steel,
                &[
                    (T::Fire, H),
                    (T::Water, H),
                    (T::Electric, H),
                    (T::Ice, S),
                    (T::Rock, S),
                    (T::Steel, H),
                    (T::Fairy, S),
                ],
            ),
            (
                T::Fairy,
                &[
                    (T::Fire, H),
                    (T::Fighting, S),
                    (T::Poison, H),
                    (T::Dragon, S),
                    (T::Dark, S),
                    (T::Steel, H),
                ],
            ),
        ];

        for (attacking, cells) in rows {
            for &(defending, value) in *cells {
                chart.set(*attacking, defending, value);
            }
        }
        chart
    }

    /// Overwrite one cell.
    pub fn set(&mut self, attacking: ElementType, defending: ElementType, value: Effectiveness) {
        self.cells[attacking.index()][defending.index()] = value;
    }

    /// Look up one cell.
    #[must_use]
    pub const fn get(&self, attacking: ElementType, defending: ElementType) -> Effectiveness {
        self.cells[attacking.index()][defending.index()]
    }

    /// Combined multiplier of `attacking` against every type in `defending`.
    ///
    /// An empty defending set is neutral.
    #[must_use]
    pub fn multiplier(&self, attacking: ElementType, defending: &[ElementType]) -> Ratio {
        defending
            .iter()
            .fold(Ratio::ONE, |acc, &d| acc.mul(self.get(attacking, d).ratio()))
    }
}

impl Default for TypeChart {
    fn default() -> Self {
        Self::standard()
    }
}
