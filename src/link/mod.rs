//! Wikidata enrichment.
//!
//! The linker walks the Country, League, Team and Player nodes of a built graph
//! and attaches `owl:sameAs` links to matching Wikidata items. Countries are
//! resolved first because player confirmation uses the country link.
//!
//! - **Knowledge base** ([`KnowledgeBase`]): entity search plus ASK confirmation,
//!   implemented over HTTP by [`WikidataClient`]
//! - **Country names** ([`CountryLookup`]): code → name table
//!
//! Lookup misses and remote failures are logged and counted, never fatal. Only
//! graph errors abort the pass.

mod countries;
mod wikidata;

pub use countries::CountryLookup;
pub use wikidata::WikidataClient;

use std::fmt;

use oxigraph::model::{NamedNode, NamedNodeRef};

use crate::error::LinkResult;
use crate::graph::FootballGraph;
use crate::vocab::{self, fb, owl};

/// Closed table of league identifiers and their Wikidata items.
pub const KNOWN_LEAGUES: &[(&str, &str)] = &[
    ("PremierLeague", "Q9448"),
    ("LaLiga", "Q324867"),
    ("SerieA", "Q15804"),
];

const QUERY_PREFIXES: &str = "PREFIX wd: <http://www.wikidata.org/entity/>\n\
PREFIX wdt: <http://www.wikidata.org/prop/direct/>\n";

/// Remote entity search and confirmation.
pub trait KnowledgeBase {
    /// Candidate QIDs for `label`, best match first.
    fn search(&self, label: &str) -> LinkResult<Vec<String>>;

    /// Evaluate a SPARQL ASK query.
    fn ask(&self, query: &str) -> LinkResult<bool>;
}

/// The node kinds the linker enriches, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Country,
    League,
    Team,
    Player,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Country,
        EntityKind::League,
        EntityKind::Team,
        EntityKind::Player,
    ];

    /// The `fb:` class of this kind.
    pub fn class(self) -> NamedNodeRef<'static> {
        match self {
            EntityKind::Country => fb::COUNTRY,
            EntityKind::League => fb::LEAGUE,
            EntityKind::Team => fb::TEAM,
            EntityKind::Player => fb::PLAYER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Country => "country",
            EntityKind::League => "league",
            EntityKind::Team => "team",
            EntityKind::Player => "player",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `candidate` looks like a Wikidata item identifier (`Q` + digits).
pub fn is_qid(candidate: &str) -> bool {
    candidate
        .strip_prefix('Q')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// The ASK query confirming that `qid` is an entity of `kind`.
///
/// For players, `country_qid` narrows the match to people born in or citizens
/// of that country. Both identifiers must satisfy [`is_qid`].
pub fn confirmation_query(kind: EntityKind, qid: &str, country_qid: Option<&str>) -> String {
    let body = match (kind, country_qid) {
        (EntityKind::Player, Some(country)) => format!(
            "ASK {{\n  ?player wdt:P106 wd:Q937857 .\n  ?player wdt:P19|wdt:P27 ?country .\n  \
             VALUES (?player ?country) {{ (wd:{qid} wd:{country}) }}\n}}"
        ),
        (EntityKind::Player, None) => format!(
            "ASK {{\n  ?player wdt:P106 wd:Q937857 .\n  VALUES ?player {{ wd:{qid} }}\n}}"
        ),
        (EntityKind::Team, _) => format!(
            "ASK {{\n  ?team wdt:P31 wd:Q476028 .\n  VALUES ?team {{ wd:{qid} }}\n}}"
        ),
        (EntityKind::League, _) => format!(
            "ASK {{\n  ?league wdt:P31 wd:Q15089 .\n  VALUES ?league {{ wd:{qid} }}\n}}"
        ),
        (EntityKind::Country, _) => format!(
            "ASK {{\n  ?country wdt:P31 wd:Q6256 .\n  VALUES ?country {{ wd:{qid} }}\n}}"
        ),
    };
    format!("{QUERY_PREFIXES}{body}")
}

/// Per-kind counters for one link pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindReport {
    pub kind: EntityKind,
    /// New `owl:sameAs` links attached.
    pub linked: usize,
    /// Entities that already carried a link.
    pub already_linked: usize,
    /// Searched but no candidate confirmed.
    pub unresolved: usize,
    /// Not searched: unknown country code or league id.
    pub skipped: usize,
    /// Search request failed.
    pub failed: usize,
}

impl KindReport {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            linked: 0,
            already_linked: 0,
            unresolved: 0,
            skipped: 0,
            failed: 0,
        }
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Linked(_) => self.linked += 1,
            Outcome::AlreadyLinked => self.already_linked += 1,
            Outcome::Unresolved => self.unresolved += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Result of a full link pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub kinds: Vec<KindReport>,
}

impl LinkReport {
    /// Counters for `kind`, if that kind was processed.
    pub fn get(&self, kind: EntityKind) -> Option<&KindReport> {
        self.kinds.iter().find(|r| r.kind == kind)
    }

    /// New links attached across all kinds.
    pub fn linked(&self) -> usize {
        self.kinds.iter().map(|r| r.linked).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Linked(String),
    AlreadyLinked,
    Unresolved,
    Skipped,
    Failed,
}

/// Attaches Wikidata links to the nodes of a [`FootballGraph`].
pub struct Linker<'a, K: KnowledgeBase> {
    graph: &'a FootballGraph,
    kb: &'a K,
    countries: &'a CountryLookup,
}

impl<'a, K: KnowledgeBase> Linker<'a, K> {
    pub fn new(graph: &'a FootballGraph, kb: &'a K, countries: &'a CountryLookup) -> Self {
        Self {
            graph,
            kb,
            countries,
        }
    }

    /// Link every kind in dependency order.
    pub fn link_all(&self) -> LinkResult<LinkReport> {
        let mut report = LinkReport::default();
        for kind in EntityKind::ALL {
            report.kinds.push(self.link(kind)?);
        }
        tracing::info!(linked = report.linked(), "link pass complete");
        Ok(report)
    }

    /// Link every node of one kind.
    pub fn link(&self, kind: EntityKind) -> LinkResult<KindReport> {
        let mut report = KindReport::new(kind);
        for node in self.graph.subjects_of_type(kind.class())? {
            let outcome = self.link_node(kind, &node)?;
            if let Outcome::Linked(qid) = &outcome {
                self.graph
                    .insert(&node, owl::SAME_AS, &vocab::wikidata_entity(qid)?)?;
                tracing::debug!(node = %node, qid = %qid, kind = %kind, "linked");
            }
            report.record(&outcome);
        }
        tracing::info!(
            kind = %kind,
            linked = report.linked,
            already_linked = report.already_linked,
            unresolved = report.unresolved,
            skipped = report.skipped,
            failed = report.failed,
            "linked entity kind"
        );
        Ok(report)
    }

    fn link_node(&self, kind: EntityKind, node: &NamedNode) -> LinkResult<Outcome> {
        if self.graph.object(node, owl::SAME_AS)?.is_some() {
            return Ok(Outcome::AlreadyLinked);
        }
        let Some(local) = vocab::local_id(node.as_ref()) else {
            return Ok(Outcome::Skipped);
        };
        let label = vocab::label(local);

        Ok(match kind {
            EntityKind::Country => match self.countries.name(&label) {
                Some(name) => self.resolve(kind, name, None),
                None => {
                    tracing::warn!(code = %label, "no country name for code, skipping");
                    Outcome::Skipped
                }
            },
            EntityKind::League => {
                match KNOWN_LEAGUES.iter().find(|(id, _)| *id == label) {
                    Some((_, qid)) => Outcome::Linked((*qid).to_string()),
                    None => {
                        tracing::warn!(
                            league = %label,
                            "league has no known Wikidata item, skipping"
                        );
                        Outcome::Skipped
                    }
                }
            }
            EntityKind::Team => self.resolve(kind, &label, None),
            EntityKind::Player => {
                let country_qid = self.player_country_qid(node)?;
                self.resolve(kind, &label, country_qid.as_deref())
            }
        })
    }

    /// The QID linked to the player's country, if the country was resolved.
    fn player_country_qid(&self, player: &NamedNode) -> LinkResult<Option<String>> {
        let Some(country) = self.graph.named_object(player, fb::NATIONALITY)? else {
            return Ok(None);
        };
        let link = self.graph.named_object(&country, owl::SAME_AS)?;
        Ok(link.and_then(|wd| vocab::wikidata_qid(wd.as_ref()).map(str::to_string)))
    }

    /// Search `label` and return the first candidate the knowledge base confirms.
    fn resolve(&self, kind: EntityKind, label: &str, country_qid: Option<&str>) -> Outcome {
        let candidates = match self.kb.search(label) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, label, kind = %kind, "search failed, skipping entity");
                return Outcome::Failed;
            }
        };
        let country_qid = country_qid.filter(|qid| is_qid(qid));

        for candidate in candidates {
            if !is_qid(&candidate) {
                tracing::debug!(candidate = %candidate, label, "ignoring non-item candidate");
                continue;
            }
            let query = confirmation_query(kind, &candidate, country_qid);
            match self.kb.ask(&query) {
                Ok(true) => return Outcome::Linked(candidate),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        label,
                        candidate = %candidate,
                        "confirmation failed, trying next candidate"
                    );
                }
            }
        }
        tracing::warn!(label, kind = %kind, "no confirmed Wikidata match");
        Outcome::Unresolved
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use oxigraph::model::vocab::rdf;

    use super::*;
    use crate::error::LinkError;

    #[derive(Clone, Copy)]
    enum Answer {
        Yes,
        No,
        Fail,
    }

    #[derive(Default)]
    struct FakeKb {
        hits: HashMap<String, Vec<String>>,
        answers: HashMap<String, Answer>,
        asked: RefCell<Vec<String>>,
    }

    impl FakeKb {
        fn hit(mut self, label: &str, ids: &[&str]) -> Self {
            self.hits
                .insert(label.into(), ids.iter().map(|s| s.to_string()).collect());
            self
        }

        fn answer(mut self, qid: &str, answer: Answer) -> Self {
            self.answers.insert(qid.into(), answer);
            self
        }
    }

    impl KnowledgeBase for FakeKb {
        fn search(&self, label: &str) -> LinkResult<Vec<String>> {
            Ok(self.hits.get(label).cloned().unwrap_or_default())
        }

        fn ask(&self, query: &str) -> LinkResult<bool> {
            self.asked.borrow_mut().push(query.to_string());
            let values = &query[query.find("VALUES").unwrap()..];
            let start = values.find("wd:").unwrap() + 3;
            let qid: String = values[start..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect();
            match self.answers.get(&qid).copied().unwrap_or(Answer::No) {
                Answer::Yes => Ok(true),
                Answer::No => Ok(false),
                Answer::Fail => Err(LinkError::Status {
                    url: "fake".into(),
                    status: 500,
                }),
            }
        }
    }

    fn typed(graph: &FootballGraph, name: &str, class: NamedNodeRef<'_>) -> NamedNode {
        let node = vocab::entity(name).unwrap();
        graph.insert(&node, rdf::TYPE, class).unwrap();
        node
    }

    fn same_as(graph: &FootballGraph, node: &NamedNode) -> Option<NamedNode> {
        graph.named_object(node, owl::SAME_AS).unwrap()
    }

    #[test]
    fn qid_validation() {
        assert!(is_qid("Q9448"));
        assert!(!is_qid("Q"));
        assert!(!is_qid("P27"));
        assert!(!is_qid("Q1 } ; DROP"));
    }

    #[test]
    fn player_query_uses_country_when_known() {
        let q = confirmation_query(EntityKind::Player, "Q1", Some("Q21"));
        assert!(q.contains("wdt:P19|wdt:P27"));
        assert!(q.contains("(wd:Q1 wd:Q21)"));
        let q = confirmation_query(EntityKind::Player, "Q1", None);
        assert!(!q.contains("P27"));
        assert!(q.contains("wdt:P106 wd:Q937857"));
    }

    #[test]
    fn leagues_use_closed_table() {
        let graph = FootballGraph::empty().unwrap();
        let pl = typed(&graph, "PremierLeague", fb::LEAGUE);
        let ere = typed(&graph, "Eredivisie", fb::LEAGUE);
        let kb = FakeKb::default();
        let lookup = CountryLookup::empty();

        let report = Linker::new(&graph, &kb, &lookup)
            .link(EntityKind::League)
            .unwrap();
        assert_eq!(report.linked, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(same_as(&graph, &pl).unwrap().as_str(), "http://www.wikidata.org/entity/Q9448");
        assert!(same_as(&graph, &ere).is_none());
        assert!(kb.asked.borrow().is_empty());
    }

    #[test]
    fn first_confirmed_candidate_wins() {
        let graph = FootballGraph::empty().unwrap();
        let team = typed(&graph, "Arsenal", fb::TEAM);
        let kb = FakeKb::default()
            .hit("Arsenal", &["Q1", "Q2", "Q3"])
            .answer("Q1", Answer::No)
            .answer("Q2", Answer::Yes)
            .answer("Q3", Answer::Yes);
        let lookup = CountryLookup::empty();

        Linker::new(&graph, &kb, &lookup).link(EntityKind::Team).unwrap();
        assert_eq!(
            vocab::wikidata_qid(same_as(&graph, &team).unwrap().as_ref()),
            Some("Q2")
        );
        assert_eq!(kb.asked.borrow().len(), 2);
    }

    #[test]
    fn candidate_failure_moves_to_next() {
        let graph = FootballGraph::empty().unwrap();
        let team = typed(&graph, "Chelsea", fb::TEAM);
        let kb = FakeKb::default()
            .hit("Chelsea", &["Q10", "Q11"])
            .answer("Q10", Answer::Fail)
            .answer("Q11", Answer::Yes);
        let lookup = CountryLookup::empty();

        let report = Linker::new(&graph, &kb, &lookup)
            .link(EntityKind::Team)
            .unwrap();
        assert_eq!(report.linked, 1);
        assert_eq!(
            vocab::wikidata_qid(same_as(&graph, &team).unwrap().as_ref()),
            Some("Q11")
        );
    }

    #[test]
    fn malformed_candidates_are_never_queried() {
        let graph = FootballGraph::empty().unwrap();
        typed(&graph, "Fulham", fb::TEAM);
        let kb = FakeKb::default().hit("Fulham", &["L123", "Q5 }"]);
        let lookup = CountryLookup::empty();

        let report = Linker::new(&graph, &kb, &lookup)
            .link(EntityKind::Team)
            .unwrap();
        assert_eq!(report.unresolved, 1);
        assert!(kb.asked.borrow().is_empty());
    }

    #[test]
    fn player_confirmation_uses_linked_country() {
        let graph = FootballGraph::empty().unwrap();
        let player = typed(&graph, "John Smith", fb::PLAYER);
        let country = typed(&graph, "ENG", fb::COUNTRY);
        graph.insert(&player, fb::NATIONALITY, &country).unwrap();
        graph
            .insert(&country, owl::SAME_AS, &vocab::wikidata_entity("Q21").unwrap())
            .unwrap();
        let kb = FakeKb::default()
            .hit("John Smith", &["Q100"])
            .answer("Q100", Answer::Yes);
        let lookup = CountryLookup::empty();

        Linker::new(&graph, &kb, &lookup)
            .link(EntityKind::Player)
            .unwrap();
        assert!(same_as(&graph, &player).is_some());
        assert!(kb.asked.borrow()[0].contains("(wd:Q100 wd:Q21)"));
    }

    #[test]
    fn already_linked_entities_are_not_searched() {
        let graph = FootballGraph::empty().unwrap();
        let team = typed(&graph, "Arsenal", fb::TEAM);
        graph
            .insert(&team, owl::SAME_AS, &vocab::wikidata_entity("Q9617").unwrap())
            .unwrap();
        let kb = FakeKb::default()
            .hit("Arsenal", &["Q1"])
            .answer("Q1", Answer::Yes);
        let lookup = CountryLookup::empty();

        let report = Linker::new(&graph, &kb, &lookup)
            .link(EntityKind::Team)
            .unwrap();
        assert_eq!(report.already_linked, 1);
        assert_eq!(graph.objects(&team, owl::SAME_AS).unwrap().len(), 1);
        assert!(kb.asked.borrow().is_empty());
    }

    #[test]
    fn unknown_country_code_is_skipped() {
        let graph = FootballGraph::empty().unwrap();
        let eng = typed(&graph, "ENG", fb::COUNTRY);
        let xkx = typed(&graph, "XKX", fb::COUNTRY);
        let kb = FakeKb::default()
            .hit("England", &["Q21"])
            .answer("Q21", Answer::Yes);
        let lookup: CountryLookup = [("ENG".to_string(), "England".to_string())]
            .into_iter()
            .collect();

        let report = Linker::new(&graph, &kb, &lookup)
            .link(EntityKind::Country)
            .unwrap();
        assert_eq!(report.linked, 1);
        assert_eq!(report.skipped, 1);
        assert!(same_as(&graph, &eng).is_some());
        assert!(same_as(&graph, &xkx).is_none());
    }
}
