/**
 * ontology module
 *
 * - model: Template, Restriction, Ontology and the Sitemap import graph
 * - query: SPARQL queries with IRI binding
 * - catalog: QueryExecutor seam and Sitemap construction from query results
 * - library: Oxigraph store loading Turtle ontologies through a location mapping
 * - cache: owned Sitemap cache with invalidation and reload
 */

pub mod cache;
pub mod catalog;
pub mod library;
pub mod model;
pub mod query;

pub use cache::OntologyCache;
pub use catalog::{templates_from_graph, QueryExecutor, QuerySolution, TemplateCatalog};
pub use library::{parse_graph, OntologyLibrary};
pub use model::{Ontology, Restriction, Sitemap, Template};
pub use query::SparqlQuery;
