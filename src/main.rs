//! football-kg CLI: build, enrich and query the football knowledge graph.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use football_kg::config::BuildConfig;
use football_kg::graph::FootballGraph;
use football_kg::link::LinkReport;
use football_kg::pipeline;
use football_kg::query::{QueryResponse, QueryService};
use football_kg::reports::{self, REPORTS};

#[derive(Parser)]
#[command(name = "football-kg", version, about = "Football statistics knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every dataset and write the Turtle snapshot.
    Build {
        /// Path to a football-kg.toml config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the snapshot output path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Link entities to Wikidata before saving.
        #[arg(long)]
        link: bool,
    },

    /// Add Wikidata links to an existing snapshot.
    Link {
        /// Snapshot to enrich.
        #[arg(long)]
        input: PathBuf,

        /// Where to write the enriched snapshot (defaults to the input file).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Path to a football-kg.toml config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run one SPARQL query against a snapshot.
    Query {
        /// Snapshot to query.
        #[arg(long, default_value = "football_ontology.ttl")]
        file: PathBuf,

        /// SPARQL query text.
        query: String,
    },

    /// Run the canned reports (all of them unless a name is given).
    Report {
        /// Snapshot to query.
        #[arg(long, default_value = "football_ontology.ttl")]
        file: PathBuf,

        /// Report name; omit to run every report.
        name: Option<String>,

        /// List report names and exit.
        #[arg(long)]
        list: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            output,
            link,
        } => {
            let mut config = BuildConfig::resolve(config.as_deref())?;
            if let Some(output) = output {
                config.output = output;
            }

            let (graph, summary) = pipeline::load(&config)?;
            println!(
                "Loaded {} rows from {} files ({} facts)",
                summary.rows, summary.files, summary.facts
            );

            if link {
                let report = pipeline::enrich(&graph, &config)?;
                print_link_report(&report);
            }

            pipeline::save(&graph, &config)?;
            println!(
                "Wrote {} triples to {}",
                graph.len()?,
                config.output.display()
            );
        }

        Commands::Link {
            input,
            output,
            config,
        } => {
            let config = BuildConfig::resolve(config.as_deref())?;
            let graph = FootballGraph::load_turtle(&input)?;
            let report = pipeline::enrich(&graph, &config)?;
            print_link_report(&report);

            let output = output.unwrap_or(input);
            graph.save_turtle(&output)?;
            println!("Wrote {} triples to {}", graph.len()?, output.display());
        }

        Commands::Query { file, query } => {
            let service = QueryService::open(&file)?;
            let response = service.execute(&query)?;
            print_response(&response);
        }

        Commands::Report { file, name, list } => {
            if list {
                for report in REPORTS {
                    println!("  {:<28} {}", report.name, report.title);
                }
                return Ok(());
            }

            let service = QueryService::open(&file)?;
            match name {
                Some(name) => {
                    let response = reports::run(&service, &name)?;
                    print_response(&response);
                }
                None => {
                    for report in REPORTS {
                        println!("{}:", report.title);
                        println!();
                        let response = reports::run(&service, report.name)?;
                        print_response(&response);
                        println!();
                        println!("{}", "-".repeat(80));
                        println!();
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_link_report(report: &LinkReport) {
    println!("Wikidata links:");
    for kind in &report.kinds {
        println!(
            "  {:<8} linked={} already={} unresolved={} skipped={} failed={}",
            kind.kind.as_str(),
            kind.linked,
            kind.already_linked,
            kind.unresolved,
            kind.skipped,
            kind.failed
        );
    }
}

fn print_response(response: &QueryResponse) {
    if response.results.is_empty() {
        println!("No results.");
        return;
    }
    for row in &response.results {
        let cells: Vec<String> = response
            .variables
            .iter()
            .filter_map(|var| row.get(var).map(|value| format!("{var}: {value}")))
            .collect();
        println!("  {}", cells.join(", "));
    }
}
