//! The football vocabulary.
//!
//! Every node the mapper creates lives under a single namespace,
//! `http://example.org/football/`, written with the `fb` prefix. Entity IRIs are
//! derived from display names by [`node_id`], and [`label`] reverses that
//! transform when the linker needs a human-readable search string.

use oxigraph::model::NamedNode;
use oxigraph::model::NamedNodeRef;
use oxigraph::model::vocab::rdf;

use crate::error::{GraphError, GraphResult};

/// Base namespace for all football nodes.
pub const FB_NS: &str = "http://example.org/football/";
/// Turtle prefix bound to [`FB_NS`].
pub const FB_PREFIX: &str = "fb";
/// Wikidata entity namespace.
pub const WD_NS: &str = "http://www.wikidata.org/entity/";
/// OWL namespace.
pub const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";

/// Prefixes bound when a graph is written as Turtle.
pub const PREFIXES: &[(&str, &str)] = &[
    (FB_PREFIX, FB_NS),
    ("wd", WD_NS),
    ("owl", OWL_NS),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// Character substituted for whitespace in node identifiers.
const JOIN: char = '_';

/// ASCII punctuation allowed verbatim in an IRI path segment.
const PATH_PUNCT: &str = "-._~!$&'()*+,;=:@/";

/// Whether `c` may appear unescaped in an IRI path (RFC 3987 `ipchar`).
/// `%` is excluded so that [`label`] can always reverse [`node_id`].
fn is_path_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric() || PATH_PUNCT.contains(c);
    }
    let cp = u32::from(c);
    match cp {
        0x80..=0x9F | 0xE000..=0xF8FF | 0xFDD0..=0xFDEF | 0xFFF0..=0xFFFF => false,
        0x10000.. => cp & 0xFFFF <= 0xFFFD && cp < 0xF0000,
        _ => true,
    }
}

macro_rules! fb_term {
    ($local:literal) => {
        NamedNodeRef::new_unchecked(concat!("http://example.org/football/", $local))
    };
}

macro_rules! owl_term {
    ($local:literal) => {
        NamedNodeRef::new_unchecked(concat!("http://www.w3.org/2002/07/owl#", $local))
    };
}

macro_rules! wd_term {
    ($local:literal) => {
        NamedNodeRef::new_unchecked(concat!("http://www.wikidata.org/entity/", $local))
    };
}

/// Classes and properties of the football ontology.
pub mod fb {
    use super::NamedNodeRef;

    pub const PLAYER: NamedNodeRef<'static> = fb_term!("Player");
    pub const TEAM: NamedNodeRef<'static> = fb_term!("Team");
    pub const COUNTRY: NamedNodeRef<'static> = fb_term!("Country");
    pub const LEAGUE: NamedNodeRef<'static> = fb_term!("League");
    pub const PLAYER_STATS: NamedNodeRef<'static> = fb_term!("PlayerStats");
    pub const TEAM_STATS: NamedNodeRef<'static> = fb_term!("TeamStats");

    pub const PLAYS_FOR: NamedNodeRef<'static> = fb_term!("playsFor");
    pub const NATIONALITY: NamedNodeRef<'static> = fb_term!("nationality");
    pub const HAS_STATS: NamedNodeRef<'static> = fb_term!("hasStats");
    pub const HAS_TEAM_STATS: NamedNodeRef<'static> = fb_term!("hasTeamStats");
    pub const IN_LEAGUE: NamedNodeRef<'static> = fb_term!("inLeague");
    pub const IN_TEAM: NamedNodeRef<'static> = fb_term!("inTeam");

    pub const IN_SEASON: NamedNodeRef<'static> = fb_term!("inSeason");
    pub const MINUTES: NamedNodeRef<'static> = fb_term!("minutes");
    pub const MATCHES: NamedNodeRef<'static> = fb_term!("matches");
    pub const SHOTS_PER_NINETY: NamedNodeRef<'static> = fb_term!("shotsPerNinety");
    pub const SHOT_CONVERSION_RATE: NamedNodeRef<'static> = fb_term!("shotConversionRate");
    pub const GOALS: NamedNodeRef<'static> = fb_term!("goals");
    pub const PENALTIES: NamedNodeRef<'static> = fb_term!("penalties");
    pub const CHANCES_CREATED: NamedNodeRef<'static> = fb_term!("chancesCreated");
    pub const CHANCES_CREATED_PER_NINETY: NamedNodeRef<'static> =
        fb_term!("chancesCreatedPerNinety");
    pub const ASSISTS: NamedNodeRef<'static> = fb_term!("assists");
    pub const SECONDARY_ASSISTS: NamedNodeRef<'static> = fb_term!("secondaryAssists");

    pub const GAMES_PLAYED: NamedNodeRef<'static> = fb_term!("gamesPlayed");
    pub const BIG_CHANCES: NamedNodeRef<'static> = fb_term!("bigChances");
    pub const GOALS_FOR: NamedNodeRef<'static> = fb_term!("goalsFor");
    pub const GOALS_PER_MATCH: NamedNodeRef<'static> = fb_term!("goalsPerMatch");
    pub const SAVES_PER_MATCH: NamedNodeRef<'static> = fb_term!("savesPerMatch");
    pub const TOTAL_SAVES: NamedNodeRef<'static> = fb_term!("totalSaves");
    pub const ACCURATE_PASSES_PER_MATCH: NamedNodeRef<'static> =
        fb_term!("accuratePassesPerMatch");
    pub const PASS_SUCCESS_PERCENTAGE: NamedNodeRef<'static> = fb_term!("passSuccessPercentage");
}

/// The handful of OWL terms the ontology header and the linker need.
pub mod owl {
    use super::NamedNodeRef;

    pub const CLASS: NamedNodeRef<'static> = owl_term!("Class");
    pub const OBJECT_PROPERTY: NamedNodeRef<'static> = owl_term!("ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'static> = owl_term!("DatatypeProperty");
    pub const EQUIVALENT_CLASS: NamedNodeRef<'static> = owl_term!("equivalentClass");
    pub const EQUIVALENT_PROPERTY: NamedNodeRef<'static> = owl_term!("equivalentProperty");
    pub const SAME_AS: NamedNodeRef<'static> = owl_term!("sameAs");
}

/// Wikidata items and properties referenced by the ontology header.
pub mod wd {
    use super::NamedNodeRef;

    /// Association football player.
    pub const FOOTBALL_PLAYER: NamedNodeRef<'static> = wd_term!("Q937857");
    /// Association football club.
    pub const FOOTBALL_CLUB: NamedNodeRef<'static> = wd_term!("Q476028");
    pub const COUNTRY: NamedNodeRef<'static> = wd_term!("Q6256");
    pub const SPORTS_LEAGUE: NamedNodeRef<'static> = wd_term!("Q15089");
    /// Member of sports team.
    pub const MEMBER_OF_SPORTS_TEAM: NamedNodeRef<'static> = wd_term!("P54");
    /// Country of citizenship.
    pub const COUNTRY_OF_CITIZENSHIP: NamedNodeRef<'static> = wd_term!("P27");
    /// Number of points/goals/set scored.
    pub const GOALS_SCORED: NamedNodeRef<'static> = wd_term!("P1351");
}

/// Fixed triples asserted at the top of every freshly built graph.
pub fn ontology_header() -> Vec<[NamedNodeRef<'static>; 3]> {
    let classes = [
        fb::PLAYER,
        fb::TEAM,
        fb::COUNTRY,
        fb::LEAGUE,
        fb::PLAYER_STATS,
        fb::TEAM_STATS,
    ];
    let object_properties = [
        fb::PLAYS_FOR,
        fb::NATIONALITY,
        fb::HAS_STATS,
        fb::HAS_TEAM_STATS,
        fb::IN_LEAGUE,
        fb::IN_TEAM,
    ];
    let datatype_properties = [
        fb::IN_SEASON,
        fb::MINUTES,
        fb::MATCHES,
        fb::SHOTS_PER_NINETY,
        fb::SHOT_CONVERSION_RATE,
        fb::GOALS,
        fb::PENALTIES,
        fb::CHANCES_CREATED,
        fb::CHANCES_CREATED_PER_NINETY,
        fb::ASSISTS,
        fb::SECONDARY_ASSISTS,
        fb::GAMES_PLAYED,
        fb::BIG_CHANCES,
        fb::GOALS_FOR,
        fb::GOALS_PER_MATCH,
        fb::SAVES_PER_MATCH,
        fb::TOTAL_SAVES,
        fb::ACCURATE_PASSES_PER_MATCH,
        fb::PASS_SUCCESS_PERCENTAGE,
    ];

    let mut triples = Vec::new();
    triples.extend(classes.iter().map(|c| [*c, rdf::TYPE, owl::CLASS]));
    triples.extend(
        object_properties
            .iter()
            .map(|p| [*p, rdf::TYPE, owl::OBJECT_PROPERTY]),
    );
    triples.extend(
        datatype_properties
            .iter()
            .map(|p| [*p, rdf::TYPE, owl::DATATYPE_PROPERTY]),
    );

    triples.push([fb::PLAYER, owl::EQUIVALENT_CLASS, wd::FOOTBALL_PLAYER]);
    triples.push([fb::TEAM, owl::EQUIVALENT_CLASS, wd::FOOTBALL_CLUB]);
    triples.push([fb::COUNTRY, owl::EQUIVALENT_CLASS, wd::COUNTRY]);
    triples.push([fb::LEAGUE, owl::EQUIVALENT_CLASS, wd::SPORTS_LEAGUE]);
    triples.push([fb::PLAYS_FOR, owl::EQUIVALENT_PROPERTY, wd::MEMBER_OF_SPORTS_TEAM]);
    triples.push([fb::NATIONALITY, owl::EQUIVALENT_PROPERTY, wd::COUNTRY_OF_CITIZENSHIP]);
    triples.push([fb::GOALS, owl::EQUIVALENT_PROPERTY, wd::GOALS_SCORED]);
    triples
}

/// Turn a display name into a stable node identifier.
///
/// Surrounding whitespace is dropped, every inner whitespace character becomes
/// `_`, and anything not allowed in an IRI path is percent-encoded.
pub fn node_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_whitespace() {
            id.push(JOIN);
        } else if !is_path_char(c) {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                id.push_str(&format!("%{byte:02X}"));
            }
        } else {
            id.push(c);
        }
    }
    id
}

/// Reverse [`node_id`]: `_` back to spaces and percent-escapes decoded.
pub fn label(id: &str) -> String {
    let bytes = id.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// The `fb:` node for a display name.
pub fn entity(name: &str) -> GraphResult<NamedNode> {
    let iri = format!("{FB_NS}{}", node_id(name));
    NamedNode::new(&iri).map_err(|e| GraphError::InvalidIri {
        iri,
        message: e.to_string(),
    })
}

/// The local identifier of an `fb:` node, or `None` for foreign IRIs.
pub fn local_id(node: NamedNodeRef<'_>) -> Option<&str> {
    node.as_str().strip_prefix(FB_NS)
}

/// The Wikidata entity node for a QID such as `Q9448`.
pub fn wikidata_entity(qid: &str) -> GraphResult<NamedNode> {
    let iri = format!("{WD_NS}{qid}");
    NamedNode::new(&iri).map_err(|e| GraphError::InvalidIri {
        iri,
        message: e.to_string(),
    })
}

/// The QID of a Wikidata entity IRI, or `None` for other IRIs.
pub fn wikidata_qid(node: NamedNodeRef<'_>) -> Option<&str> {
    node.as_str().strip_prefix(WD_NS)
}
