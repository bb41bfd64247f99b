//! The football graph: an oxigraph store plus the handful of pattern lookups
//! the mapper and linker need.
//!
//! - **Store** ([`FootballGraph`]): in-memory `oxigraph` store, created once per
//!   process and passed by reference to every component
//! - **Turtle I/O** (`turtle`): snapshot load/save with the `fb:` prefix bound

mod turtle;

use oxigraph::model::vocab::rdf;
use oxigraph::model::{
    GraphNameRef, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, QuadRef, Term,
    TermRef, Triple,
};
use oxigraph::store::Store;

use crate::error::{GraphError, GraphResult};
use crate::vocab;

/// RDF graph holding every player, team, country, league and stats record.
#[derive(Clone)]
pub struct FootballGraph {
    store: Store,
}

impl FootballGraph {
    /// Create a graph seeded with the ontology header.
    pub fn new() -> GraphResult<Self> {
        let graph = Self::empty()?;
        for [s, p, o] in vocab::ontology_header() {
            graph.insert(s, p, o)?;
        }
        Ok(graph)
    }

    /// Create a graph with no triples at all.
    pub fn empty() -> GraphResult<Self> {
        let store = Store::new().map_err(|e| GraphError::Store {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Assert one triple in the default graph. Re-asserting a present triple
    /// is a no-op.
    pub fn insert<'a>(
        &self,
        subject: impl Into<NamedOrBlankNodeRef<'a>>,
        predicate: impl Into<NamedNodeRef<'a>>,
        object: impl Into<TermRef<'a>>,
    ) -> GraphResult<()> {
        let quad = QuadRef::new(subject, predicate, object, GraphNameRef::DefaultGraph);
        self.store.insert(quad).map_err(|e| GraphError::Store {
            message: format!("insert failed: {e}"),
        })?;
        Ok(())
    }

    /// All named subjects typed with `class`.
    pub fn subjects_of_type(&self, class: NamedNodeRef<'_>) -> GraphResult<Vec<NamedNode>> {
        let mut subjects = Vec::new();
        for quad in self.store.quads_for_pattern(
            None,
            Some(rdf::TYPE),
            Some(class.into()),
            Some(GraphNameRef::DefaultGraph),
        ) {
            let quad = quad.map_err(|e| GraphError::Store {
                message: format!("pattern scan failed: {e}"),
            })?;
            if let NamedOrBlankNode::NamedNode(node) = quad.subject {
                subjects.push(node);
            }
        }
        Ok(subjects)
    }

    /// The first object of `subject predicate ?o`, if any.
    pub fn object<'a>(
        &self,
        subject: impl Into<NamedOrBlankNodeRef<'a>>,
        predicate: NamedNodeRef<'_>,
    ) -> GraphResult<Option<Term>> {
        let first = self
            .store
            .quads_for_pattern(
                Some(subject.into()),
                Some(predicate),
                None,
                Some(GraphNameRef::DefaultGraph),
            )
            .next();
        match first {
            Some(quad) => {
                let quad = quad.map_err(|e| GraphError::Store {
                    message: format!("pattern scan failed: {e}"),
                })?;
                Ok(Some(quad.object))
            }
            None => Ok(None),
        }
    }

    /// All objects of `subject predicate ?o`.
    pub fn objects<'a>(
        &self,
        subject: impl Into<NamedOrBlankNodeRef<'a>>,
        predicate: NamedNodeRef<'_>,
    ) -> GraphResult<Vec<Term>> {
        self.store
            .quads_for_pattern(
                Some(subject.into()),
                Some(predicate),
                None,
                Some(GraphNameRef::DefaultGraph),
            )
            .map(|quad| {
                quad.map(|q| q.object).map_err(|e| GraphError::Store {
                    message: format!("pattern scan failed: {e}"),
                })
            })
            .collect()
    }

    /// The first named-node object of `subject predicate ?o`.
    pub fn named_object<'a>(
        &self,
        subject: impl Into<NamedOrBlankNodeRef<'a>>,
        predicate: NamedNodeRef<'_>,
    ) -> GraphResult<Option<NamedNode>> {
        Ok(match self.object(subject, predicate)? {
            Some(Term::NamedNode(node)) => Some(node),
            _ => None,
        })
    }

    /// Whether the exact triple is present.
    pub fn contains<'a>(
        &self,
        subject: impl Into<NamedOrBlankNodeRef<'a>>,
        predicate: impl Into<NamedNodeRef<'a>>,
        object: impl Into<TermRef<'a>>,
    ) -> GraphResult<bool> {
        let quad = QuadRef::new(subject, predicate, object, GraphNameRef::DefaultGraph);
        self.store.contains(quad).map_err(|e| GraphError::Store {
            message: format!("lookup failed: {e}"),
        })
    }

    /// Every triple in the default graph.
    pub fn triples(&self) -> GraphResult<Vec<Triple>> {
        self.store
            .quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph))
            .map(|quad| {
                quad.map(Triple::from).map_err(|e| GraphError::Store {
                    message: format!("pattern scan failed: {e}"),
                })
            })
            .collect()
    }

    /// Number of triples in the store.
    pub fn len(&self) -> GraphResult<usize> {
        self.store.len().map_err(|e| GraphError::Store {
            message: format!("failed to count triples: {e}"),
        })
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> GraphResult<bool> {
        self.len().map(|n| n == 0)
    }

    /// Get internal store reference (for SPARQL evaluation).
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl std::fmt::Debug for FootballGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FootballGraph").finish()
    }
}
