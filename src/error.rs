//! Rich diagnostic error types for football-kg.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so a failed build or query says what went
//! wrong and where to look.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum KgError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type KgResult<T> = std::result::Result<T, KgError>;

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("oxigraph store error: {message}")]
    #[diagnostic(
        code(football::graph::store),
        help(
            "The in-memory RDF store rejected the operation. This is not expected for a fresh \
             store; file a bug report."
        )
    )]
    Store { message: String },

    #[error("invalid IRI <{iri}>: {message}")]
    #[diagnostic(
        code(football::graph::invalid_iri),
        help(
            "Node identifiers are built from names in the CSV files. \
             Check the offending name for characters that cannot appear in an IRI."
        )
    )]
    InvalidIri { iri: String, message: String },

    #[error("failed to read Turtle snapshot {path}")]
    #[diagnostic(
        code(football::graph::read),
        help("Check that the file exists and was produced by `football-kg build`.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse Turtle snapshot {path}: {message}")]
    #[diagnostic(
        code(football::graph::parse),
        help("The snapshot is not valid Turtle. Rebuild it with `football-kg build`.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write Turtle snapshot {path}: {message}")]
    #[diagnostic(
        code(football::graph::write),
        help("Ensure the destination directory exists and is writable.")
    )]
    Write { path: String, message: String },
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

// ---------------------------------------------------------------------------
// Mapping errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum MapError {
    #[error("failed to open CSV file {path}")]
    #[diagnostic(
        code(football::map::open),
        help("Check the dataset path in football-kg.toml and that the file is readable.")
    )]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {message}")]
    #[diagnostic(
        code(football::map::csv),
        help("The file could not be parsed as CSV. Check quoting and the number of fields per row.")
    )]
    Csv { path: String, message: String },

    #[error("{path} is missing required column \"{column}\"")]
    #[diagnostic(
        code(football::map::missing_column),
        help(
            "Player files need Player, Team and Country columns; team files need Team and Country. \
             Column names must match exactly."
        )
    )]
    MissingColumn { path: String, column: String },

    #[error("{path}, row {row}: empty value in required column \"{column}\"")]
    #[diagnostic(
        code(football::map::empty_cell),
        help("Every row needs a name in each identity column. Fix or remove the row.")
    )]
    EmptyCell {
        path: String,
        row: usize,
        column: String,
    },

    #[error("unknown file kind \"{kind}\"")]
    #[diagnostic(
        code(football::map::unknown_kind),
        help(
            "Valid kinds are: scoring, goals, chances, assists (players) and \
             big_chance, goals_per_match, saves, accurate_pass (teams)."
        )
    )]
    UnknownKind { kind: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

pub type MapResult<T> = std::result::Result<T, MapError>;

// ---------------------------------------------------------------------------
// Linking errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LinkError {
    #[error("request to {url} failed: {message}")]
    #[diagnostic(
        code(football::link::transport),
        help(
            "Check network connectivity and that the Wikidata endpoints in football-kg.toml \
             are reachable."
        )
    )]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    #[diagnostic(
        code(football::link::status),
        help(
            "Wikidata may be rate limiting this client. Set a descriptive user_agent and retry \
             later."
        )
    )]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {message}")]
    #[diagnostic(
        code(football::link::response),
        help("The service answered with a body that does not match the expected JSON shape.")
    )]
    Response { url: String, message: String },

    #[error("failed to read country lookup {path}")]
    #[diagnostic(
        code(football::link::lookup_read),
        help("Provide a JSON object mapping country codes to names, e.g. {{\"ENG\": \"England\"}}.")
    )]
    LookupRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse country lookup {path}: {message}")]
    #[diagnostic(
        code(football::link::lookup_parse),
        help("The lookup file must be a flat JSON object of string keys to string values.")
    )]
    LookupParse { path: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

pub type LinkResult<T> = std::result::Result<T, LinkError>;

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("query parse error: {message}")]
    #[diagnostic(
        code(football::query::parse),
        help("Check the SPARQL syntax. Prefixes such as fb: must be declared in the query.")
    )]
    Parse { message: String },

    #[error("query evaluation error: {message}")]
    #[diagnostic(
        code(football::query::evaluation),
        help("The query parsed but could not be evaluated against the snapshot.")
    )]
    Evaluation { message: String },

    #[error("unknown report \"{name}\"")]
    #[diagnostic(
        code(football::query::unknown_report),
        help("Run `football-kg report` without a name to list and run all reports.")
    )]
    UnknownReport { name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(football::config::read),
        help("Ensure the config file exists and is readable, or omit --config to use the defaults.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(football::config::parse),
        help("Check the TOML syntax and the dataset kind names in the config file.")
    )]
    Parse { path: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
