//! CSV file loading.
//!
//! Files are processed strictly in manifest order. The header is validated once
//! per file; any malformed row aborts the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{EntityMapper, FileKind, Header, Row};
use crate::config::BuildConfig;
use crate::error::{MapError, MapResult};
use crate::graph::FootballGraph;

/// Counters for a load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub files: usize,
    pub rows: usize,
    pub facts: usize,
}

impl LoadSummary {
    fn absorb(&mut self, other: LoadSummary) {
        self.files += other.files;
        self.rows += other.rows;
        self.facts += other.facts;
    }
}

impl EntityMapper<'_> {
    /// Map every row of the CSV file at `path`.
    pub fn load_file(&self, path: &Path, kind: FileKind, league: &str) -> MapResult<LoadSummary> {
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|source| MapError::Open {
            path: origin.clone(),
            source,
        })?;
        let summary = self.load_reader(file, &origin, kind, league)?;
        tracing::info!(
            path = %origin,
            kind = %kind,
            league,
            rows = summary.rows,
            facts = summary.facts,
            "loaded dataset"
        );
        Ok(summary)
    }

    /// Map every row of CSV read from `reader`. `origin` names the source in errors.
    pub fn load_reader(
        &self,
        reader: impl Read,
        origin: &str,
        kind: FileKind,
        league: &str,
    ) -> MapResult<LoadSummary> {
        let csv_error = |e: csv::Error| MapError::Csv {
            path: origin.to_string(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new().from_reader(reader);
        let header = Header::new(reader.headers().map_err(csv_error)?);
        for column in kind.subject().required_columns() {
            if !header.contains(column) {
                return Err(MapError::MissingColumn {
                    path: origin.to_string(),
                    column: (*column).to_string(),
                });
            }
        }

        let mut summary = LoadSummary {
            files: 1,
            ..Default::default()
        };
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let line = record
                .position()
                .map_or(summary.rows + 2, |p| p.line() as usize);
            let row = Row::new(&header, &record, origin, line);
            let mapped = self.map_row(&row, kind, league)?;
            summary.rows += 1;
            summary.facts += mapped.facts;
        }
        Ok(summary)
    }
}

/// Load every dataset listed in `config` into `graph`, in order.
pub fn load_datasets(graph: &FootballGraph, config: &BuildConfig) -> MapResult<LoadSummary> {
    let mapper = EntityMapper::new(graph).with_season(config.season.clone());
    let mut total = LoadSummary::default();
    for dataset in config.datasets() {
        let summary = mapper.load_file(&dataset.path, dataset.kind, &dataset.league)?;
        total.absorb(summary);
    }
    tracing::info!(
        files = total.files,
        rows = total.rows,
        facts = total.facts,
        "load pass complete"
    );
    Ok(total)
}
