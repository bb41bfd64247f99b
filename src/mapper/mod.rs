//! Entity mapper: CSV statistics rows to graph facts.
//!
//! Each row yields (or reuses) a Player or Team node, its Country and League,
//! and one brand-new anonymous stats record carrying the numeric fields its
//! [`FileKind`] selects. Entity nodes are idempotent because their IRIs are a
//! pure function of the name; stats records are not, so mapping a file twice
//! duplicates every record.

mod kind;
mod literal;
mod load;

use std::collections::HashMap;

use csv::StringRecord;
use oxigraph::model::vocab::{rdf, xsd};
use oxigraph::model::{BlankNode, Literal, NamedNode};

pub use kind::{FileKind, StatColumn, Subject};
pub use literal::{Numeric, is_missing, safe_literal};
pub use load::{LoadSummary, load_datasets};

use crate::error::{MapError, MapResult};
use crate::graph::FootballGraph;
use crate::vocab::{self, fb};

/// Season recorded on every player stats record.
pub const DEFAULT_SEASON: &str = "2023/24";

/// Column-name index for one CSV file, built once from its header row.
#[derive(Debug, Clone, Default)]
pub struct Header {
    index: HashMap<String, usize>,
}

impl Header {
    pub fn new(record: &StringRecord) -> Self {
        let mut index = HashMap::with_capacity(record.len());
        for (position, name) in record.iter().enumerate() {
            // First occurrence wins for duplicated column names.
            index.entry(name.to_string()).or_insert(position);
        }
        Self { index }
    }

    pub fn from_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(&columns.into_iter().collect::<StringRecord>())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }
}

/// One data row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    header: &'a Header,
    record: &'a StringRecord,
    /// Source file, for error messages.
    origin: &'a str,
    /// 1-based line number in the source file.
    line: usize,
}

impl<'a> Row<'a> {
    pub fn new(header: &'a Header, record: &'a StringRecord, origin: &'a str, line: usize) -> Self {
        Self {
            header,
            record,
            origin,
            line,
        }
    }

    /// The raw cell under `column`; `None` if the file has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.header
            .position(column)
            .map(|position| self.record.get(position).unwrap_or(""))
    }

    /// A required identity cell; empty or absent is a hard error.
    fn require(&self, column: &str) -> MapResult<&'a str> {
        match self.get(column) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            Some(_) => Err(MapError::EmptyCell {
                path: self.origin.to_string(),
                row: self.line,
                column: column.to_string(),
            }),
            None => Err(MapError::MissingColumn {
                path: self.origin.to_string(),
                column: column.to_string(),
            }),
        }
    }
}

/// What mapping one row produced.
#[derive(Debug, Clone)]
pub struct MappedRow {
    /// The Player or Team node.
    pub entity: NamedNode,
    /// The fresh stats record.
    pub stats: BlankNode,
    /// Triples asserted for this row, duplicates of existing facts included.
    pub facts: usize,
}

/// Maps statistics rows into a [`FootballGraph`].
pub struct EntityMapper<'g> {
    graph: &'g FootballGraph,
    season: String,
}

impl<'g> EntityMapper<'g> {
    pub fn new(graph: &'g FootballGraph) -> Self {
        Self {
            graph,
            season: DEFAULT_SEASON.to_string(),
        }
    }

    /// Override the season literal written on player stats records.
    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = season.into();
        self
    }

    /// Map one row of a `kind` file belonging to league `league`.
    pub fn map_row(&self, row: &Row<'_>, kind: FileKind, league: &str) -> MapResult<MappedRow> {
        match kind.subject() {
            Subject::Player => self.map_player(row, kind, league),
            Subject::Team => self.map_team(row, kind, league),
        }
    }

    fn map_player(&self, row: &Row<'_>, kind: FileKind, league: &str) -> MapResult<MappedRow> {
        let g = self.graph;
        let mut facts = 0;

        let player = vocab::entity(row.require("Player")?)?;
        let team = vocab::entity(row.require("Team")?)?;
        let country = vocab::entity(row.require("Country")?)?;
        let league_node = vocab::entity(league)?;

        g.insert(&player, rdf::TYPE, fb::PLAYER)?;
        g.insert(&team, rdf::TYPE, fb::TEAM)?;
        g.insert(&player, fb::PLAYS_FOR, &team)?;
        g.insert(&country, rdf::TYPE, fb::COUNTRY)?;
        g.insert(&player, fb::NATIONALITY, &country)?;
        g.insert(&league_node, rdf::TYPE, fb::LEAGUE)?;
        facts += 6;

        let stats = BlankNode::default();
        g.insert(&stats, rdf::TYPE, fb::PLAYER_STATS)?;
        g.insert(&player, fb::HAS_STATS, &stats)?;
        g.insert(&stats, fb::IN_LEAGUE, &league_node)?;
        g.insert(&stats, fb::IN_TEAM, &team)?;
        let season = Literal::new_typed_literal(self.season.as_str(), xsd::STRING);
        g.insert(&stats, fb::IN_SEASON, &season)?;
        facts += 5;

        facts += self.assert_stats(&stats, row, Subject::Player.common_columns())?;
        facts += self.assert_stats(&stats, row, kind.columns())?;

        Ok(MappedRow {
            entity: player,
            stats,
            facts,
        })
    }

    fn map_team(&self, row: &Row<'_>, kind: FileKind, league: &str) -> MapResult<MappedRow> {
        let g = self.graph;
        let mut facts = 0;

        let team = vocab::entity(row.require("Team")?)?;
        let country = vocab::entity(row.require("Country")?)?;
        let league_node = vocab::entity(league)?;

        g.insert(&team, rdf::TYPE, fb::TEAM)?;
        g.insert(&country, rdf::TYPE, fb::COUNTRY)?;
        g.insert(&team, fb::NATIONALITY, &country)?;
        g.insert(&league_node, rdf::TYPE, fb::LEAGUE)?;
        g.insert(&team, fb::IN_LEAGUE, &league_node)?;
        facts += 5;

        let stats = BlankNode::default();
        g.insert(&stats, rdf::TYPE, fb::TEAM_STATS)?;
        g.insert(&team, fb::HAS_TEAM_STATS, &stats)?;
        facts += 2;

        facts += self.assert_stats(&stats, row, Subject::Team.common_columns())?;
        facts += self.assert_stats(&stats, row, kind.columns())?;

        Ok(MappedRow {
            entity: team,
            stats,
            facts,
        })
    }

    /// Assert every column the row's file carries and whose cell has a value.
    fn assert_stats(
        &self,
        stats: &BlankNode,
        row: &Row<'_>,
        columns: &[StatColumn],
    ) -> MapResult<usize> {
        let mut facts = 0;
        for column in columns {
            let Some(raw) = row.get(column.column) else {
                continue;
            };
            if let Some(literal) = safe_literal(raw, column.numeric) {
                self.graph.insert(stats, column.property, &literal)?;
                facts += 1;
            }
        }
        Ok(facts)
    }
}
