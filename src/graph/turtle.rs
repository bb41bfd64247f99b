//! Turtle snapshot load/save.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::GraphNameRef;

use super::FootballGraph;
use crate::error::{GraphError, GraphResult};
use crate::vocab;

impl FootballGraph {
    /// Load a Turtle snapshot into a fresh graph.
    pub fn load_turtle(path: &Path) -> GraphResult<Self> {
        let file = File::open(path).map_err(|source| GraphError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let graph = Self::empty()?;
        graph.read_turtle(BufReader::new(file), &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            triples = graph.len()?,
            "loaded Turtle snapshot"
        );
        Ok(graph)
    }

    /// Parse Turtle from `reader` into this graph. `origin` names the source in errors.
    pub fn read_turtle(&self, reader: impl Read, origin: &str) -> GraphResult<()> {
        self.store
            .load_from_reader(RdfParser::from_format(RdfFormat::Turtle), reader)
            .map_err(|e| GraphError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            })
    }

    /// Serialize the default graph as Turtle with the football prefixes bound.
    pub fn write_turtle<W: Write>(&self, writer: W, origin: &str) -> GraphResult<W> {
        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
        for (prefix, iri) in vocab::PREFIXES {
            serializer = serializer
                .with_prefix(*prefix, *iri)
                .map_err(|e| GraphError::Write {
                    path: origin.to_string(),
                    message: format!("invalid prefix {prefix}: {e}"),
                })?;
        }
        self.store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, serializer, writer)
            .map_err(|e| GraphError::Write {
                path: origin.to_string(),
                message: e.to_string(),
            })
    }

    /// Write the graph to `path` as Turtle.
    pub fn save_turtle(&self, path: &Path) -> GraphResult<()> {
        let origin = path.display().to_string();
        let file = File::create(path).map_err(|e| GraphError::Write {
            path: origin.clone(),
            message: e.to_string(),
        })?;
        let mut writer = self.write_turtle(BufWriter::new(file), &origin)?;
        writer.flush().map_err(|e| GraphError::Write {
            path: origin.clone(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %origin, triples = self.len()?, "saved Turtle snapshot");
        Ok(())
    }

    /// The graph as a Turtle string.
    pub fn to_turtle(&self) -> GraphResult<String> {
        let bytes = self.write_turtle(Vec::new(), "<memory>")?;
        String::from_utf8(bytes).map_err(|e| GraphError::Write {
            path: "<memory>".into(),
            message: e.to_string(),
        })
    }
}
