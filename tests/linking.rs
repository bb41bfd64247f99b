//! Wikidata enrichment over a mapped graph, against an in-process knowledge base.

use std::cell::RefCell;
use std::collections::HashMap;

use oxigraph::model::NamedNode;

use football_kg::error::{LinkError, LinkResult};
use football_kg::graph::FootballGraph;
use football_kg::link::{CountryLookup, EntityKind, KnowledgeBase, Linker};
use football_kg::mapper::{EntityMapper, FileKind};
use football_kg::vocab::{self, owl};

/// Answers searches from a fixed table and confirms a fixed set of QIDs.
#[derive(Default)]
struct StaticKb {
    hits: HashMap<&'static str, Vec<&'static str>>,
    confirmed: Vec<&'static str>,
    unreachable: bool,
    searches: RefCell<Vec<String>>,
}

impl KnowledgeBase for StaticKb {
    fn search(&self, label: &str) -> LinkResult<Vec<String>> {
        self.searches.borrow_mut().push(label.to_string());
        if self.unreachable {
            return Err(LinkError::Transport {
                url: "https://www.wikidata.org/w/api.php".into(),
                message: "connection refused".into(),
            });
        }
        Ok(self
            .hits
            .get(label)
            .map(|ids| ids.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default())
    }

    fn ask(&self, query: &str) -> LinkResult<bool> {
        // The candidate is the first item bound in the VALUES clause.
        let candidate: String = query
            .split("VALUES")
            .nth(1)
            .and_then(|values| values.split("wd:").nth(1))
            .unwrap_or_default()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        Ok(self.confirmed.iter().any(|qid| *qid == candidate))
    }
}

fn build_graph() -> FootballGraph {
    let graph = FootballGraph::new().unwrap();
    let mapper = EntityMapper::new(&graph);
    let csv = "Player,Team,Country,Minutes,Matches,Goals,Penalties\n\
               John Smith,Arsenal,ENG,1800,20,10,2\n\
               Ivo Vukovic,Arsenal,XKX,900,10,1,0\n";
    mapper
        .load_reader(csv.as_bytes(), "goals.csv", FileKind::Goals, "PremierLeague")
        .unwrap();
    graph
}

fn link_of(graph: &FootballGraph, name: &str) -> Option<String> {
    let node = vocab::entity(name).unwrap();
    graph
        .named_object(&node, owl::SAME_AS)
        .unwrap()
        .map(|n: NamedNode| n.as_str().to_string())
}

fn static_kb() -> StaticKb {
    StaticKb {
        hits: HashMap::from([
            ("England", vec!["Q21"]),
            ("Arsenal", vec!["Q9617"]),
            ("John Smith", vec!["Q111", "Q222"]),
        ]),
        confirmed: vec!["Q21", "Q9617", "Q222"],
        ..Default::default()
    }
}

#[test]
fn unknown_country_code_is_skipped_and_others_are_linked() {
    let dir = tempfile::TempDir::new().unwrap();
    let lookup_path = dir.path().join("iso_to_country.json");
    std::fs::write(&lookup_path, r#"{"ENG": "England", "ESP": "Spain"}"#).unwrap();
    let countries = CountryLookup::load(&lookup_path).unwrap();

    let graph = build_graph();
    let kb = static_kb();
    let report = Linker::new(&graph, &kb, &countries).link_all().unwrap();

    let country = report.get(EntityKind::Country).unwrap();
    assert_eq!(country.linked, 1);
    assert_eq!(country.skipped, 1);
    assert_eq!(
        link_of(&graph, "ENG").as_deref(),
        Some("http://www.wikidata.org/entity/Q21")
    );
    assert_eq!(link_of(&graph, "XKX"), None);
    assert!(!kb.searches.borrow().iter().any(|s| s == "XKX"));

    assert_eq!(
        link_of(&graph, "PremierLeague").as_deref(),
        Some("http://www.wikidata.org/entity/Q9448")
    );
    assert_eq!(
        link_of(&graph, "Arsenal").as_deref(),
        Some("http://www.wikidata.org/entity/Q9617")
    );
    assert_eq!(
        link_of(&graph, "John Smith").as_deref(),
        Some("http://www.wikidata.org/entity/Q222")
    );

    let players = report.get(EntityKind::Player).unwrap();
    assert_eq!(players.linked, 1);
    assert_eq!(players.unresolved, 1);
}

#[test]
fn second_pass_adds_nothing() {
    let countries: CountryLookup = [("ENG".to_string(), "England".to_string())]
        .into_iter()
        .collect();
    let graph = build_graph();
    let kb = static_kb();

    let first = Linker::new(&graph, &kb, &countries).link_all().unwrap();
    let triples = graph.len().unwrap();
    let second = Linker::new(&graph, &kb, &countries).link_all().unwrap();

    assert_eq!(graph.len().unwrap(), triples);
    assert_eq!(second.linked(), 0);
    assert_eq!(
        second.get(EntityKind::Team).unwrap().already_linked,
        first.get(EntityKind::Team).unwrap().linked
    );
}

#[test]
fn unreachable_service_never_aborts_the_pass() {
    let countries: CountryLookup = [("ENG".to_string(), "England".to_string())]
        .into_iter()
        .collect();
    let graph = build_graph();
    let kb = StaticKb {
        unreachable: true,
        ..Default::default()
    };

    let report = Linker::new(&graph, &kb, &countries).link_all().unwrap();
    assert_eq!(report.get(EntityKind::Team).unwrap().failed, 1);
    assert_eq!(report.get(EntityKind::Player).unwrap().failed, 2);
    // Leagues come from the closed table and need no network.
    assert_eq!(report.linked(), 1);
}
