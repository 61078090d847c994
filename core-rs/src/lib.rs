//! # LDT Processor - ontology-driven request matching and skolemization
//!
//! Linked Data Templates annotate ontology classes with URI templates. The
//! processor uses them in both directions:
//!
//! - **Matching**: a request path is matched against every template visible
//!   through the sitemap ontology's imports, and the most specific template
//!   handles the request.
//! - **Skolemization**: an anonymous resource in a request graph gets a URI
//!   by expanding the template selected by its `rdf:type` with its own
//!   property values.
//!
//! ## Architecture
//!
//! ```text
//!   config (YAML) ──► OntologyLibrary (oxigraph Store, Turtle files)
//!                            │ templates / restrictions / imports queries
//!                            ▼
//!                     TemplateCatalog ──► Sitemap (cached, Arc snapshot)
//!                                            │
//!                  ┌─────────────────────────┴───────────────┐
//!                  ▼                                         ▼
//!          TemplateMatcher                               Skolemizer
//!    path ─► most specific Template        blank node ─► URI (NameResolver)
//! ```

pub mod application;
pub mod config;
pub mod errors;
pub mod matcher;
pub mod ontology;
pub mod resource;
pub mod skolemizer;
pub mod template;
pub mod uri;
pub mod vocabulary;

pub use application::Application;
pub use config::ProcessorConfig;
pub use errors::{ProcessorError, Result};
pub use matcher::{MatchMap, TemplateMatch, TemplateMatcher};
pub use ontology::{
    OntologyCache, OntologyLibrary, QueryExecutor, Restriction, Sitemap, SparqlQuery, Template,
    TemplateCatalog,
};
pub use resource::Resource;
pub use skolemizer::{NameResolver, Skolemizer, TemplateCall};
pub use template::{UriBuilder, UriTemplate};
pub use uri::ParsedUri;

/// Version of the LDT processor
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
