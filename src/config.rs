//! Build configuration: which datasets to load, where to write, how to reach Wikidata.
//!
//! Persisted as TOML (`football-kg.toml`). Every field has a default, and the
//! default dataset manifest is the 2023/24 Premier League, La Liga and Serie A
//! layout under `./datasets`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::mapper::{DEFAULT_SEASON, FileKind};

/// Default name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "football-kg.toml";

/// Top-level build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Turtle snapshot written by `build` and read by `query`/`serve`.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// JSON object mapping country codes to country names.
    #[serde(default = "default_lookup_file")]
    pub lookup_file: PathBuf,
    /// Season literal recorded on player stats records.
    #[serde(default = "default_season")]
    pub season: String,
    /// Root directory league directories are resolved against.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub wikidata: WikidataConfig,
    #[serde(default = "default_leagues")]
    pub leagues: Vec<LeagueDatasets>,
}

/// Wikidata endpoints and client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikidataConfig {
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default = "default_sparql_url")]
    pub sparql_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Search language code.
    #[serde(default = "default_language")]
    pub language: String,
}

/// The statistics files of one league.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueDatasets {
    /// League identifier; becomes the `fb:` League node.
    pub id: String,
    /// Directory under `data_dir`.
    pub dir: PathBuf,
    #[serde(default)]
    pub files: Vec<DatasetFile>,
}

/// One CSV file and the kind of statistics it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub kind: FileKind,
    pub file: PathBuf,
}

/// A fully resolved dataset ready for loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub path: PathBuf,
    pub kind: FileKind,
    pub league: String,
}

fn default_output() -> PathBuf {
    PathBuf::from("football_ontology.ttl")
}
fn default_lookup_file() -> PathBuf {
    PathBuf::from("iso_to_country.json")
}
fn default_season() -> String {
    DEFAULT_SEASON.into()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("datasets")
}
fn default_search_url() -> String {
    "https://www.wikidata.org/w/api.php".into()
}
fn default_sparql_url() -> String {
    "https://query.wikidata.org/sparql".into()
}
fn default_user_agent() -> String {
    concat!("football-kg/", env!("CARGO_PKG_VERSION")).into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_language() -> String {
    "en".into()
}

/// File names shared by every league directory, in load order.
const STANDARD_FILES: &[(FileKind, &str)] = &[
    (FileKind::Scoring, "player_total_scoring_attempts.csv"),
    (FileKind::Goals, "player_top_scorers.csv"),
    (FileKind::Chances, "player_total_assists_in_attack.csv"),
    (FileKind::Assists, "player_top_assists.csv"),
    (FileKind::BigChance, "big_chance_team.csv"),
    (FileKind::GoalsPerMatch, "team_goals_per_match.csv"),
    (FileKind::Saves, "saves_team.csv"),
    (FileKind::AccuratePass, "accurate_pass_team.csv"),
];

fn default_leagues() -> Vec<LeagueDatasets> {
    [
        ("PremierLeague", "Premleg_23_24"),
        ("LaLiga", "laliga2023_34"),
        ("SerieA", "SerieA23_24"),
    ]
    .into_iter()
    .map(|(id, dir)| LeagueDatasets::standard(id, dir))
    .collect()
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            sparql_url: default_sparql_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            language: default_language(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            lookup_file: default_lookup_file(),
            season: default_season(),
            data_dir: default_data_dir(),
            wikidata: WikidataConfig::default(),
            leagues: default_leagues(),
        }
    }
}

impl LeagueDatasets {
    /// A league directory holding the eight standard statistics files.
    pub fn standard(id: &str, dir: impl Into<PathBuf>) -> Self {
        Self {
            id: id.to_string(),
            dir: dir.into(),
            files: STANDARD_FILES
                .iter()
                .map(|(kind, file)| DatasetFile {
                    kind: *kind,
                    file: PathBuf::from(file),
                })
                .collect(),
        }
    }
}

impl BuildConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load `path` if given, else `football-kg.toml` if it exists, else defaults.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Every dataset in load order with its path resolved against `data_dir`.
    pub fn datasets(&self) -> Vec<Dataset> {
        self.leagues
            .iter()
            .flat_map(|league| {
                league.files.iter().map(move |f| Dataset {
                    path: self.data_dir.join(&league.dir).join(&f.file),
                    kind: f.kind,
                    league: league.id.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_covers_three_leagues() {
        let config = BuildConfig::default();
        let datasets = config.datasets();
        assert_eq!(datasets.len(), 24);
        assert_eq!(
            datasets[0].path,
            Path::new("datasets/Premleg_23_24/player_total_scoring_attempts.csv")
        );
        assert_eq!(datasets[0].kind, FileKind::Scoring);
        assert_eq!(datasets[23].league, "SerieA");
        assert_eq!(datasets[23].kind, FileKind::AccuratePass);
        assert_eq!(config.output, Path::new("football_ontology.ttl"));
    }

    #[test]
    fn empty_toml_is_default() {
        let config = BuildConfig::from_toml("").unwrap();
        assert_eq!(config.season, "2023/24");
        assert_eq!(config.wikidata.timeout_secs, 30);
        assert_eq!(config.leagues.len(), 3);
    }

    #[test]
    fn partial_toml_overrides() {
        let config = BuildConfig::from_toml(
            r#"
output = "out.ttl"

[wikidata]
timeout_secs = 5

[[leagues]]
id = "Eredivisie"
dir = "ere_23_24"
files = [{ kind = "goals_per_match", file = "gpm.csv" }]
"#,
        )
        .unwrap();
        assert_eq!(config.output, Path::new("out.ttl"));
        assert_eq!(config.wikidata.timeout_secs, 5);
        assert_eq!(config.wikidata.language, "en");
        assert_eq!(config.datasets().len(), 1);
        assert_eq!(config.datasets()[0].kind, FileKind::GoalsPerMatch);
    }

    #[test]
    fn unknown_kind_is_parse_error() {
        let err = BuildConfig::from_toml(
            r#"
[[leagues]]
id = "X"
dir = "x"
files = [{ kind = "corners", file = "c.csv" }]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "season = \"2022/23\"\n").unwrap();
        let config = BuildConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.season, "2022/23");
    }

    #[test]
    fn missing_explicit_config_is_read_error() {
        let err =
            BuildConfig::resolve(Some(Path::new("/nonexistent/football-kg.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
