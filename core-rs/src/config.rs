/**
 * config.rs
 * Processor configuration (YAML format)
 *
 * Format:
 * ```yaml
 * ontology: http://example.org/sitemap#
 * baseUri: http://example.org/
 * locationMapping:
 *   http://example.org/sitemap#: sitemap.ttl
 * templatesQuery: |
 *   CONSTRUCT { ... } WHERE { ... }
 * restrictionsQuery: |
 *   SELECT ?Template ?onProperty ?allValuesFrom WHERE { ... }
 * cacheSitemap: true
 * ```
 */

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ProcessorError, Result};
use crate::ontology::SparqlQuery;
use crate::uri::ParsedUri;

fn default_cache_sitemap() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorConfig {
    /// Root sitemap ontology IRI
    pub ontology: String,
    /// Deployment base URI; request URIs are matched relative to it
    pub base_uri: String,
    /// Ontology IRI → Turtle file
    #[serde(default)]
    pub location_mapping: HashMap<String, PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions_query: Option<String>,
    #[serde(default = "default_cache_sitemap")]
    pub cache_sitemap: bool,
}

impl ProcessorConfig {
    pub fn new(ontology: impl Into<String>, base_uri: impl Into<String>) -> Self {
        Self {
            ontology: ontology.into(),
            base_uri: base_uri.into(),
            location_mapping: HashMap::new(),
            templates_query: None,
            restrictions_query: None,
            cache_sitemap: true,
        }
    }

    /// Load a configuration file.
    ///
    /// Relative `locationMapping` paths are resolved against the directory
    /// holding the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ProcessorError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        if let Some(dir) = path.parent() {
            for location in config.location_mapping.values_mut() {
                if location.is_relative() {
                    *location = dir.join(&*location);
                }
            }
        }

        Ok(config)
    }

    /// Parse and validate a configuration document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ProcessorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Ensures:
    /// - ontology is non-empty
    /// - baseUri is an absolute URI
    pub fn validate(&self) -> Result<()> {
        if self.ontology.is_empty() {
            return Err(ProcessorError::Configuration(
                "ontology cannot be empty".to_string(),
            ));
        }

        let base = ParsedUri::parse(&self.base_uri)?;
        if !base.is_absolute() {
            return Err(ProcessorError::Configuration(format!(
                "baseUri must be absolute, got '{}'",
                self.base_uri
            )));
        }

        Ok(())
    }

    pub fn with_location(mut self, ontology: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.location_mapping.insert(ontology.into(), path.into());
        self
    }

    pub fn with_queries(mut self, templates: impl Into<String>, restrictions: impl Into<String>) -> Self {
        self.templates_query = Some(templates.into());
        self.restrictions_query = Some(restrictions.into());
        self
    }

    /// Configured templates query; its absence is fatal
    pub fn templates_query(&self) -> Result<SparqlQuery> {
        self.templates_query
            .as_deref()
            .map(SparqlQuery::new)
            .ok_or_else(|| ProcessorError::Configuration("templatesQuery not set".to_string()))
    }

    /// Configured restrictions query; its absence is fatal
    pub fn restrictions_query(&self) -> Result<SparqlQuery> {
        self.restrictions_query
            .as_deref()
            .map(SparqlQuery::new)
            .ok_or_else(|| ProcessorError::Configuration("restrictionsQuery not set".to_string()))
    }
}
