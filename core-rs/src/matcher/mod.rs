//! Template matcher: selects the resource template handling a request
//!
//! Matching walks the sitemap import graph. An ontology's own templates
//! shadow everything it imports: imports are only searched when the
//! ontology itself has no template matching the path. Among all matches the
//! most specific URI template wins (see [`crate::template::comparator`]).

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::errors::{ProcessorError, Result};
use crate::ontology::{Sitemap, Template};
use crate::resource::Resource;
use crate::template::UriTemplate;
use crate::uri::ParsedUri;

/// A template whose path pattern matched, with the captured values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    pub template: Arc<Template>,
    pub bindings: BTreeMap<String, String>,
}

/// Matches grouped by pattern, most specific pattern first
pub type MatchMap = BTreeMap<UriTemplate, Vec<TemplateMatch>>;

pub struct TemplateMatcher<'a> {
    sitemap: &'a Sitemap,
}

impl<'a> TemplateMatcher<'a> {
    pub fn new(sitemap: &'a Sitemap) -> Self {
        Self { sitemap }
    }

    /// Request path for an absolute URI under `base`: `"/"` followed by
    /// the URI relativized against the base, query string included.
    ///
    /// # Examples
    ///
    /// ```
    /// use ldt_processor::matcher::TemplateMatcher;
    ///
    /// let path = TemplateMatcher::request_path(
    ///     "http://example.org/app/posts/42?view=full",
    ///     "http://example.org/app/",
    /// ).unwrap();
    /// assert_eq!(path, "/posts/42?view=full");
    /// ```
    pub fn request_path(uri: &str, base: &str) -> Result<String> {
        let parsed = ParsedUri::parse(uri)?;
        if !parsed.is_absolute() {
            return Err(ProcessorError::InvalidArgument(format!(
                "URI being matched \"{}\" is not absolute",
                uri
            )));
        }

        let base_uri = ParsedUri::parse(base)?;
        let relative = parsed.relativize(&base_uri).ok_or_else(|| {
            ProcessorError::InvalidArgument(format!(
                "URI being matched \"{}\" is not relative to the base URI \"{}\"",
                uri, base
            ))
        })?;

        Ok(format!("/{}", relative))
    }

    /// Best matching template for an absolute request URI
    pub fn match_uri(&self, ontology: &str, uri: &str, base: &str) -> Result<Option<Arc<Template>>> {
        let path = Self::request_path(uri, base)?;
        self.match_path(ontology, &path)
    }

    /// Best matching template for a path, or `None` when nothing in the
    /// import closure matches.
    ///
    /// Several distinct templates sharing the winning pattern are reported
    /// as a warning and resolved by taking the smallest class IRI.
    pub fn match_path(&self, ontology: &str, path: &str) -> Result<Option<Arc<Template>>> {
        let matches = self.match_templates(ontology, path)?;

        let Some((uri_template, candidates)) = matches.into_iter().next() else {
            debug!("Path {} has no template match in ontology <{}>", path, ontology);
            return Ok(None);
        };

        let mut templates: Vec<Arc<Template>> = candidates.into_iter().map(|m| m.template).collect();
        templates.sort_by(|a, b| a.class.cmp(&b.class));
        templates.dedup_by(|a, b| a.class == b.class);

        if templates.len() > 1 {
            let classes: Vec<&str> = templates.iter().map(|t| t.class.as_str()).collect();
            warn!("URI '{}' was matched by more than one ldt:Template: {:?}", path, classes);
        }

        debug!("Matched UriTemplate: {} Template: <{}>", uri_template, templates[0].class);
        Ok(templates.into_iter().next())
    }

    /// Every match for `path`, grouped by pattern in specificity order
    pub fn match_templates(&self, ontology: &str, path: &str) -> Result<MatchMap> {
        self.sitemap.require_ontology(ontology)?;
        let mut visited = HashSet::new();
        self.collect_matches(ontology, path, &mut visited)
    }

    fn collect_matches(&self, iri: &str, path: &str, visited: &mut HashSet<String>) -> Result<MatchMap> {
        let mut matches = MatchMap::new();
        if !visited.insert(iri.to_string()) {
            return Ok(matches);
        }
        let Some(ontology) = self.sitemap.ontology(iri) else {
            return Ok(matches);
        };

        debug!("Matching path '{}' against resource templates in ontology <{}>", path, iri);
        for template in &ontology.templates {
            let uri_template = template.require_path()?;
            match uri_template.match_path(path) {
                Some(bindings) => {
                    debug!("Path {} matched UriTemplate {} of <{}>", path, uri_template, template.class);
                    matches.entry(uri_template.clone()).or_default().push(TemplateMatch {
                        template: Arc::clone(template),
                        bindings,
                    });
                }
                None => trace!("Path {} did not match UriTemplate {}", path, uri_template),
            }
        }

        if matches.is_empty() {
            for import in &ontology.imports {
                for (uri_template, mut imported) in self.collect_matches(import, path, visited)? {
                    matches.entry(uri_template).or_default().append(&mut imported);
                }
            }
        }

        Ok(matches)
    }

    /// Templates restricted with `owl:allValuesFrom all_values_from`, keyed
    /// by restricted property. With `on_property` set, only that property is
    /// considered. Imports are searched only when `ontology` has no match.
    pub fn templates_by_restriction(
        &self,
        ontology: &str,
        on_property: Option<&str>,
        all_values_from: &str,
    ) -> Result<BTreeMap<String, Vec<Arc<Template>>>> {
        self.sitemap.require_ontology(ontology)?;
        let mut visited = HashSet::new();
        Ok(self.collect_restrictions(ontology, on_property, all_values_from, &mut visited))
    }

    fn collect_restrictions(
        &self,
        iri: &str,
        on_property: Option<&str>,
        all_values_from: &str,
        visited: &mut HashSet<String>,
    ) -> BTreeMap<String, Vec<Arc<Template>>> {
        let mut found: BTreeMap<String, Vec<Arc<Template>>> = BTreeMap::new();
        if !visited.insert(iri.to_string()) {
            return found;
        }
        let Some(ontology) = self.sitemap.ontology(iri) else {
            return found;
        };

        for restriction in &ontology.restrictions {
            if restriction.all_values_from != all_values_from {
                continue;
            }
            if on_property.is_some_and(|p| p != restriction.on_property) {
                continue;
            }
            let Some(template) = self.sitemap.template(&restriction.template) else {
                trace!("Restriction on unknown template <{}>", restriction.template);
                continue;
            };
            if !template.is_defined_by(iri) {
                continue;
            }
            found
                .entry(restriction.on_property.clone())
                .or_default()
                .push(Arc::clone(template));
        }

        if found.is_empty() {
            for import in &ontology.imports {
                for (property, mut templates) in
                    self.collect_restrictions(import, on_property, all_values_from, visited)
                {
                    found.entry(property).or_default().append(&mut templates);
                }
            }
        }

        found
    }

    /// The resource's type that is a template defined by the same ontology
    /// as `parent`. Types are tried in lexicographic order.
    pub fn declared_type(&self, resource: &Resource<'_>, parent: &Template) -> Option<Arc<Template>> {
        let defining = parent.is_defined_by.as_deref()?;

        resource
            .types()
            .into_iter()
            .filter_map(|class| self.sitemap.template(class))
            .find(|template| template.is_defined_by(defining))
            .cloned()
    }
}
