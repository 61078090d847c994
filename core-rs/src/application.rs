/**
 * application.rs
 * Processor facade: configuration, ontology library and sitemap cache
 *
 * One Application serves many requests. Matching, skolemization and
 * `reload` all borrow it immutably; `reload` re-reads the ontology files and
 * swaps both the library snapshot and the cached sitemap.
 */

use oxigraph::model::Graph;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::config::ProcessorConfig;
use crate::errors::Result;
use crate::matcher::{MatchMap, TemplateMatcher};
use crate::ontology::{OntologyCache, OntologyLibrary, Sitemap, Template, TemplateCatalog};
use crate::skolemizer::Skolemizer;
use crate::template::UriBuilder;

pub struct Application {
    config: ProcessorConfig,
    library: RwLock<Arc<OntologyLibrary>>,
    cache: OntologyCache,
}

impl Application {
    /// Load the configured ontology and its imports.
    ///
    /// Missing query definitions are reported here rather than on the
    /// first request.
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        config.templates_query()?;
        config.restrictions_query()?;

        let library = Self::open_library(&config)?;
        let cache = OntologyCache::new(config.cache_sitemap);

        Ok(Self {
            config,
            library: RwLock::new(Arc::new(library)),
            cache,
        })
    }

    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(ProcessorConfig::load(path)?)
    }

    fn open_library(config: &ProcessorConfig) -> Result<OntologyLibrary> {
        let mut library = OntologyLibrary::with_location_mapping(config.location_mapping.clone())?;
        library.load_ontology(&config.ontology)?;
        Ok(library)
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Current library snapshot; a concurrent `reload` does not affect it
    pub fn library(&self) -> Arc<OntologyLibrary> {
        Arc::clone(&self.library.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn cache(&self) -> &OntologyCache {
        &self.cache
    }

    /// Sitemap of the configured ontology, from the cache when enabled
    pub fn sitemap(&self) -> Result<Arc<Sitemap>> {
        self.cache
            .get_or_load(&self.config.ontology, || self.build_sitemap(&self.library()))
    }

    fn build_sitemap(&self, library: &OntologyLibrary) -> Result<Sitemap> {
        TemplateCatalog::new(
            library,
            self.config.templates_query()?,
            self.config.restrictions_query()?,
        )
        .load_sitemap(&self.config.ontology)
    }

    /// Template handling an absolute request URI
    pub fn match_uri(&self, uri: &str) -> Result<Option<Arc<Template>>> {
        let sitemap = self.sitemap()?;
        TemplateMatcher::new(&sitemap).match_uri(&self.config.ontology, uri, &self.config.base_uri)
    }

    /// Every template matching a request URI, most specific pattern first
    pub fn match_all(&self, uri: &str) -> Result<MatchMap> {
        let path = TemplateMatcher::request_path(uri, &self.config.base_uri)?;
        let sitemap = self.sitemap()?;
        TemplateMatcher::new(&sitemap).match_templates(&self.config.ontology, &path)
    }

    /// Assign URIs to the anonymous resources of a request graph.
    ///
    /// `absolute_path` is the request URI, the base for skolem templates.
    /// Its query and fragment are not carried into minted URIs.
    pub fn skolemize(&self, graph: Graph, absolute_path: &str) -> Result<Graph> {
        let sitemap = self.sitemap()?;
        let skolemizer = Skolemizer::new(
            &sitemap,
            &self.config.ontology,
            UriBuilder::from_uri(&self.config.base_uri)?,
            UriBuilder::absolute_path(absolute_path)?,
        )?;
        skolemizer.build_graph(graph)
    }

    /// Re-read the ontology files and replace the cached sitemap.
    ///
    /// Requests already holding the previous library or sitemap finish
    /// against it. A failed reload leaves both in place.
    pub fn reload(&self) -> Result<Arc<Sitemap>> {
        let library = Arc::new(Self::open_library(&self.config)?);
        info!("Reloading sitemap <{}>", self.config.ontology);
        let sitemap = self
            .cache
            .reload(&self.config.ontology, || self.build_sitemap(&library))?;
        *self.library.write().unwrap_or_else(PoisonError::into_inner) = library;
        Ok(sitemap)
    }
}
