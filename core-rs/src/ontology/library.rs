/**
 * library.rs
 * RDF ontology library backed by an Oxigraph store
 *
 * Ontologies are located through a location mapping (ontology IRI → Turtle
 * file) and loaded together with everything they transitively import into
 * one union graph, which the template catalog then queries.
 */

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{Graph, Term, Triple};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::catalog::{QueryExecutor, QuerySolution};
use super::query::SparqlQuery;
use crate::errors::{ProcessorError, Result};

pub struct OntologyLibrary {
    store: Store,
    location_mapping: HashMap<String, PathBuf>,
    loaded: Vec<String>,
}

impl OntologyLibrary {
    /// Create an empty in-memory library
    pub fn new() -> Result<Self> {
        let store = Store::new().map_err(|e| ProcessorError::Store(e.to_string()))?;

        Ok(Self {
            store,
            location_mapping: HashMap::new(),
            loaded: Vec::new(),
        })
    }

    /// Create a library resolving ontology IRIs through `location_mapping`
    pub fn with_location_mapping(location_mapping: HashMap<String, PathBuf>) -> Result<Self> {
        let mut library = Self::new()?;
        library.location_mapping = location_mapping;
        Ok(library)
    }

    /// Ontology IRIs loaded so far, in load order
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    pub fn is_loaded(&self, ontology: &str) -> bool {
        self.loaded.iter().any(|iri| iri == ontology)
    }

    /// Load `ontology` and its import closure.
    ///
    /// The root ontology must be mapped to a file. Imports without a
    /// mapping are skipped with a warning; their owl:imports edge stays in
    /// the store, so the template catalog still sees the import but finds
    /// no templates for it.
    pub fn load_ontology(&mut self, ontology: &str) -> Result<()> {
        if !self.location_mapping.contains_key(ontology) && !self.is_loaded(ontology) {
            return Err(ProcessorError::Load(format!(
                "No location mapping for ontology <{}>",
                ontology
            )));
        }

        let mut visited: HashSet<String> = self.loaded.iter().cloned().collect();
        let mut queue = VecDeque::from([ontology.to_string()]);

        while let Some(iri) = queue.pop_front() {
            if visited.contains(&iri) {
                continue;
            }

            let Some(path) = self.location_mapping.get(&iri).cloned() else {
                warn!("Skipping ontology <{}>: no location mapping", iri);
                visited.insert(iri);
                continue;
            };

            self.load_ontology_file(&path, &iri)?;
            visited.insert(iri.clone());
            self.loaded.push(iri.clone());

            for solution in self.select(&SparqlQuery::imports(&iri)?)? {
                if let Some(Term::NamedNode(import)) = solution.get("import") {
                    if !visited.contains(import.as_str()) {
                        queue.push_back(import.as_str().to_string());
                    }
                }
            }
        }

        Ok(())
    }

    fn load_ontology_file(&mut self, path: &Path, ontology: &str) -> Result<()> {
        info!("Loading ontology <{}> from {}", ontology, path.display());

        if !path.exists() {
            return Err(ProcessorError::Load(format!("File not found: {}", path.display())));
        }

        if path.is_dir() {
            return Err(ProcessorError::Load(format!("Path is a directory: {}", path.display())));
        }

        let content = fs::read_to_string(path)?;
        self.load_turtle(&content, Some(ontology))
    }

    /// Load Turtle data into the union graph
    pub fn load_turtle(&mut self, turtle: &str, base_iri: Option<&str>) -> Result<()> {
        let mut parser = RdfParser::from_format(RdfFormat::Turtle);
        if let Some(base) = base_iri {
            parser = parser.with_base_iri(base)?;
        }

        self.store
            .load_from_reader(parser, turtle.as_bytes())
            .map_err(|e| ProcessorError::Load(e.to_string()))
    }

    /// Number of triples in the union graph
    pub fn len(&self) -> Result<usize> {
        self.store.len().map_err(|e| ProcessorError::Store(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty().map_err(|e| ProcessorError::Store(e.to_string()))
    }
}

impl QueryExecutor for OntologyLibrary {
    fn construct(&self, query: &SparqlQuery) -> Result<Graph> {
        debug!("CONSTRUCT query: {}", query.as_str().trim());

        let results = self
            .store
            .query(query.as_str())
            .map_err(|e| ProcessorError::Query(e.to_string()))?;

        match results {
            QueryResults::Graph(triples) => {
                let mut graph = Graph::new();
                for triple in triples {
                    let triple = triple.map_err(|e| ProcessorError::Query(e.to_string()))?;
                    graph.insert(&triple);
                }
                Ok(graph)
            }
            _ => Err(ProcessorError::Query(
                "Expected a CONSTRUCT or DESCRIBE query".to_string(),
            )),
        }
    }

    fn select(&self, query: &SparqlQuery) -> Result<Vec<QuerySolution>> {
        let results = self
            .store
            .query(query.as_str())
            .map_err(|e| ProcessorError::Query(e.to_string()))?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();

                for solution in solutions {
                    let solution = solution.map_err(|e| ProcessorError::Query(e.to_string()))?;

                    let mut row = HashMap::new();
                    for (var, term) in solution.iter() {
                        row.insert(var.as_str().to_string(), term.clone());
                    }

                    rows.push(row);
                }

                Ok(rows)
            }
            _ => Err(ProcessorError::Query("Expected a SELECT query".to_string())),
        }
    }
}

/// Parse a Turtle document into a standalone graph
pub fn parse_graph(turtle: &str, base_iri: Option<&str>) -> Result<Graph> {
    let mut library = OntologyLibrary::new()?;
    library.load_turtle(turtle, base_iri)?;

    let mut graph = Graph::new();
    for quad in library.store.iter() {
        let quad = quad.map_err(|e| ProcessorError::Store(e.to_string()))?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    Ok(graph)
}
