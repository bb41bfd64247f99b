//! Canned analytical queries over a built snapshot.
//!
//! Each report is a plain SPARQL SELECT; `football-kg report` runs one by name
//! or all of them in order.

use crate::error::{QueryError, QueryResult};
use crate::query::{QueryResponse, QueryService};

/// A named SPARQL report.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub name: &'static str,
    pub title: &'static str,
    pub query: &'static str,
}

macro_rules! fb_query {
    ($body:literal) => {
        concat!("PREFIX fb: <http://example.org/football/>\n", $body)
    };
}

/// Every report, in presentation order.
pub const REPORTS: &[Report] = &[
    Report {
        name: "top-scorers-by-league",
        title: "Top 10 players by total goals in each league",
        query: fb_query!(
            r#"SELECT ?playerName ?leagueName (SUM(?goals) AS ?totalGoals)
WHERE {
  ?player a fb:Player ;
          fb:hasStats ?stats .
  ?stats fb:inLeague ?league ;
         fb:goals ?goals .
  BIND(STRAFTER(STR(?league), "http://example.org/football/") AS ?leagueName)
  BIND(REPLACE(STRAFTER(STR(?player), "http://example.org/football/"), "_", " ") AS ?playerName)
}
GROUP BY ?playerName ?leagueName
ORDER BY DESC(?totalGoals)
LIMIT 10"#
        ),
    },
    Report {
        name: "best-conversion-rate",
        title: "Top 10 players by shot conversion rate (minimum 5 goals)",
        query: fb_query!(
            r#"SELECT ?playerName ?leagueName ?goals ?conversionRate
WHERE {
  ?player a fb:Player ;
          fb:hasStats ?statsGoals, ?statsShots .
  ?statsGoals fb:inLeague ?league ;
              fb:goals ?goals .
  ?statsShots fb:inLeague ?league ;
              fb:shotConversionRate ?conversionRate .
  FILTER (?goals >= 5)
  BIND(STRAFTER(STR(?league), "http://example.org/football/") AS ?leagueName)
  BIND(REPLACE(STRAFTER(STR(?player), "http://example.org/football/"), "_", " ") AS ?playerName)
}
ORDER BY DESC(?conversionRate)
LIMIT 10"#
        ),
    },
    Report {
        name: "chances-without-goals",
        title: "Players who created the most chances without scoring",
        query: fb_query!(
            r#"SELECT ?playerName ?leagueName ?chancesCreated
WHERE {
  ?player a fb:Player ;
          fb:hasStats ?statsChances, ?statsGoals .
  ?statsChances fb:inLeague ?league ;
                fb:chancesCreated ?chancesCreated .
  ?statsGoals fb:inLeague ?league ;
              fb:goals ?goals .
  FILTER (?goals = 0)
  BIND(STRAFTER(STR(?league), "http://example.org/football/") AS ?leagueName)
  BIND(REPLACE(STRAFTER(STR(?player), "http://example.org/football/"), "_", " ") AS ?playerName)
}
ORDER BY DESC(?chancesCreated)
LIMIT 10"#
        ),
    },
    Report {
        name: "avg-shots-per-league",
        title: "Average shots per 90 minutes by league",
        query: fb_query!(
            r#"SELECT ?leagueName (AVG(?shotsPerNinety) AS ?avgShotsPerNinety)
WHERE {
  ?player fb:hasStats ?stats .
  ?stats fb:inLeague ?league ;
         fb:shotsPerNinety ?shotsPerNinety .
  BIND(STRAFTER(STR(?league), "http://example.org/football/") AS ?leagueName)
}
GROUP BY ?leagueName
ORDER BY DESC(?avgShotsPerNinety)"#
        ),
    },
    Report {
        name: "scored-in-pl-and-laliga",
        title: "Players who scored in both the Premier League and La Liga",
        query: fb_query!(
            r#"SELECT ?playerName ?premierLeagueGoals ?laLigaGoals
WHERE {
  ?player a fb:Player ;
          fb:hasStats ?statsPL, ?statsLaLiga .
  ?statsPL fb:inLeague fb:PremierLeague ;
           fb:goals ?premierLeagueGoals .
  ?statsLaLiga fb:inLeague fb:LaLiga ;
               fb:goals ?laLigaGoals .
  FILTER (?premierLeagueGoals > 0 && ?laLigaGoals > 0)
  BIND(REPLACE(STRAFTER(STR(?player), "http://example.org/football/"), "_", " ") AS ?playerName)
}
ORDER BY DESC(?premierLeagueGoals) DESC(?laLigaGoals)
LIMIT 10"#
        ),
    },
    Report {
        name: "premier-league-top-scorers",
        title: "Top scorers in the Premier League",
        query: fb_query!(
            r#"SELECT ?playerName ?goals
WHERE {
  ?player a fb:Player ;
          fb:hasStats ?stats .
  ?stats fb:inLeague fb:PremierLeague ;
         fb:goals ?goals .
  BIND(REPLACE(STRAFTER(STR(?player), "http://example.org/football/"), "_", " ") AS ?playerName)
}
ORDER BY DESC(?goals)
LIMIT 10"#
        ),
    },
    Report {
        name: "laliga-conversion-rate",
        title: "Highest shot conversion rate in La Liga",
        query: fb_query!(
            r#"SELECT ?playerName ?conversionRate
WHERE {
  ?player a fb:Player ;
          fb:hasStats ?stats .
  ?stats fb:inLeague fb:LaLiga ;
         fb:shotConversionRate ?conversionRate .
  BIND(REPLACE(STRAFTER(STR(?player), "http://example.org/football/"), "_", " ") AS ?playerName)
}
ORDER BY DESC(?conversionRate)
LIMIT 10"#
        ),
    },
    Report {
        name: "most-minutes",
        title: "Top 10 players by minutes played in a league",
        query: fb_query!(
            r#"SELECT DISTINCT ?playerName ?leagueName ?minutes
WHERE {
  ?player a fb:Player ;
          fb:hasStats ?stats .
  ?stats fb:inLeague ?league ;
         fb:minutes ?minutes .
  BIND(REPLACE(STRAFTER(STR(?player), "http://example.org/football/"), "_", " ") AS ?playerName)
  BIND(STRAFTER(STR(?league), "http://example.org/football/") AS ?leagueName)
}
ORDER BY DESC(?minutes)
LIMIT 10"#
        ),
    },
    Report {
        name: "laliga-assists",
        title: "Most assists in La Liga",
        query: fb_query!(
            r#"SELECT ?playerName ?assists
WHERE {
  ?player a fb:Player ;
          fb:hasStats ?stats .
  ?stats fb:inLeague fb:LaLiga ;
         fb:assists ?assists .
  BIND(REPLACE(STRAFTER(STR(?player), "http://example.org/football/"), "_", " ") AS ?playerName)
}
ORDER BY DESC(?assists)
LIMIT 10"#
        ),
    },
];

/// Look up a report by name.
pub fn find(name: &str) -> Option<&'static Report> {
    REPORTS.iter().find(|r| r.name == name)
}

/// Run the report called `name`.
pub fn run(service: &QueryService, name: &str) -> QueryResult<QueryResponse> {
    let report = find(name).ok_or_else(|| QueryError::UnknownReport {
        name: name.to_string(),
    })?;
    tracing::debug!(report = report.name, "running report");
    service.execute(report.query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FootballGraph;
    use crate::mapper::{EntityMapper, FileKind};

    fn service() -> QueryService {
        let graph = FootballGraph::new().unwrap();
        let mapper = EntityMapper::new(&graph);
        let goals = "Player,Team,Country,Minutes,Matches,Goals,Penalties\n\
                     John Smith,Arsenal,ENG,1800,20,10,2\n\
                     Jane Doe,Chelsea,WAL,900,10,0,0\n";
        let chances = "Player,Team,Country,Minutes,Matches,Chances Created,Chances Created per 90\n\
                       Jane Doe,Chelsea,WAL,900,10,25,2.5\n";
        mapper
            .load_reader(goals.as_bytes(), "goals.csv", FileKind::Goals, "PremierLeague")
            .unwrap();
        mapper
            .load_reader(chances.as_bytes(), "chances.csv", FileKind::Chances, "PremierLeague")
            .unwrap();
        QueryService::new(graph)
    }

    #[test]
    fn names_are_unique() {
        for (i, report) in REPORTS.iter().enumerate() {
            assert!(REPORTS[i + 1..].iter().all(|r| r.name != report.name));
        }
    }

    #[test]
    fn every_report_evaluates() {
        let service = service();
        for report in REPORTS {
            service
                .execute(report.query)
                .unwrap_or_else(|e| panic!("{} failed: {e}", report.name));
        }
    }

    #[test]
    fn premier_league_top_scorers_orders_by_goals() {
        let response = run(&service(), "premier-league-top-scorers").unwrap();
        assert_eq!(response.results[0]["playerName"], "John Smith");
        assert_eq!(response.results[0]["goals"], "10");
    }

    #[test]
    fn zero_goal_players_show_in_chances_report() {
        let response = run(&service(), "chances-without-goals").unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0]["playerName"], "Jane Doe");
        assert_eq!(response.results[0]["chancesCreated"], "25");
    }

    #[test]
    fn unknown_report_is_error() {
        let err = run(&service(), "corners").unwrap_err();
        assert!(matches!(err, QueryError::UnknownReport { .. }));
    }
}
