//! Dataset kinds and their column schemas.

use std::fmt;
use std::str::FromStr;

use oxigraph::model::NamedNodeRef;
use serde::{Deserialize, Serialize};

use super::literal::Numeric;
use crate::error::MapError;
use crate::vocab::fb;

/// Which statistics file a row came from; selects the optional fields to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Scoring,
    Goals,
    Chances,
    Assists,
    BigChance,
    GoalsPerMatch,
    Saves,
    AccuratePass,
}

/// The kind of entity a file describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Player,
    Team,
}

/// A CSV column mapped onto a numeric stats property.
#[derive(Debug, Clone, Copy)]
pub struct StatColumn {
    /// Exact header name, units included.
    pub column: &'static str,
    pub property: NamedNodeRef<'static>,
    pub numeric: Numeric,
}

const fn stat(
    column: &'static str,
    property: NamedNodeRef<'static>,
    numeric: Numeric,
) -> StatColumn {
    StatColumn {
        column,
        property,
        numeric,
    }
}

/// Columns read from every player file.
pub(crate) const PLAYER_COMMON: &[StatColumn] = &[
    stat("Minutes", fb::MINUTES, Numeric::Integer),
    stat("Matches", fb::MATCHES, Numeric::Integer),
];

/// Columns read from every team file.
pub(crate) const TEAM_COMMON: &[StatColumn] =
    &[stat("Matches", fb::GAMES_PLAYED, Numeric::Integer)];

const SCORING: &[StatColumn] = &[
    stat("Shots per 90", fb::SHOTS_PER_NINETY, Numeric::Decimal),
    stat("Shot Conversion Rate (%)", fb::SHOT_CONVERSION_RATE, Numeric::Decimal),
];
const GOALS: &[StatColumn] = &[
    stat("Goals", fb::GOALS, Numeric::Integer),
    stat("Penalties", fb::PENALTIES, Numeric::Integer),
];
const CHANCES: &[StatColumn] = &[
    stat("Chances Created", fb::CHANCES_CREATED, Numeric::Integer),
    stat("Chances Created per 90", fb::CHANCES_CREATED_PER_NINETY, Numeric::Decimal),
];
const ASSISTS: &[StatColumn] = &[
    stat("Assists", fb::ASSISTS, Numeric::Integer),
    stat("Secondary Assists", fb::SECONDARY_ASSISTS, Numeric::Decimal),
];
const BIG_CHANCE: &[StatColumn] = &[
    stat("Big Chances", fb::BIG_CHANCES, Numeric::Integer),
    stat("Goals", fb::GOALS_FOR, Numeric::Integer),
];
const GOALS_PER_MATCH: &[StatColumn] = &[
    stat("Goals per Match", fb::GOALS_PER_MATCH, Numeric::Decimal),
    stat("Total Goals Scored", fb::GOALS_FOR, Numeric::Integer),
];
const SAVES: &[StatColumn] = &[
    stat("Saves per Match", fb::SAVES_PER_MATCH, Numeric::Decimal),
    stat("Total Saves", fb::TOTAL_SAVES, Numeric::Integer),
];
const ACCURATE_PASS: &[StatColumn] = &[
    stat("Accurate Passes per Match", fb::ACCURATE_PASSES_PER_MATCH, Numeric::Decimal),
    stat("Pass Success (%)", fb::PASS_SUCCESS_PERCENTAGE, Numeric::Decimal),
];

impl FileKind {
    pub const ALL: [FileKind; 8] = [
        FileKind::Scoring,
        FileKind::Goals,
        FileKind::Chances,
        FileKind::Assists,
        FileKind::BigChance,
        FileKind::GoalsPerMatch,
        FileKind::Saves,
        FileKind::AccuratePass,
    ];

    pub fn subject(self) -> Subject {
        match self {
            FileKind::Scoring | FileKind::Goals | FileKind::Chances | FileKind::Assists => {
                Subject::Player
            }
            FileKind::BigChance
            | FileKind::GoalsPerMatch
            | FileKind::Saves
            | FileKind::AccuratePass => Subject::Team,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Scoring => "scoring",
            FileKind::Goals => "goals",
            FileKind::Chances => "chances",
            FileKind::Assists => "assists",
            FileKind::BigChance => "big_chance",
            FileKind::GoalsPerMatch => "goals_per_match",
            FileKind::Saves => "saves",
            FileKind::AccuratePass => "accurate_pass",
        }
    }

    /// Kind-specific columns, on top of the common ones for the subject.
    pub fn columns(self) -> &'static [StatColumn] {
        match self {
            FileKind::Scoring => SCORING,
            FileKind::Goals => GOALS,
            FileKind::Chances => CHANCES,
            FileKind::Assists => ASSISTS,
            FileKind::BigChance => BIG_CHANCE,
            FileKind::GoalsPerMatch => GOALS_PER_MATCH,
            FileKind::Saves => SAVES,
            FileKind::AccuratePass => ACCURATE_PASS,
        }
    }
}

impl Subject {
    /// Columns every file of this subject must carry.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Subject::Player => &["Player", "Team", "Country"],
            Subject::Team => &["Team", "Country"],
        }
    }

    /// Columns read for every file of this subject.
    pub fn common_columns(self) -> &'static [StatColumn] {
        match self {
            Subject::Player => PLAYER_COMMON,
            Subject::Team => TEAM_COMMON,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| MapError::UnknownKind { kind: s.to_string() })
    }
}
