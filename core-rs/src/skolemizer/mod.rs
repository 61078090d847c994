//! Skolemizer: assigns URIs to anonymous resources
//!
//! A resource's template is selected by its `rdf:type`, not by a path. Every
//! ontology of the import closure contributes the templates it defines
//! itself; nearer ontologies outrank farther ones through the call priority.
//! The winning template is expanded with values the [`NameResolver`] reads
//! off the resource.

pub mod resolver;

pub use resolver::NameResolver;

use oxigraph::model::{BlankNode, Graph, NamedNode, SubjectRef, Term, TermRef, Triple};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::errors::Result;
use crate::ontology::{Sitemap, Template};
use crate::resource::Resource;
use crate::template::{UriBuilder, UriTemplate};
use crate::vocabulary::CONTAINER_OVERRIDES;

/// A template selected for a resource, ranked by import distance.
///
/// Calls order by descending priority, then by class IRI, so the first
/// element of a `BTreeSet<TemplateCall>` is the one to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCall {
    pub template: Arc<Template>,
    /// Negated import depth: 0 for the ontology searched, -1 for its imports
    pub priority: i32,
}

impl TemplateCall {
    pub fn new(template: Arc<Template>, depth: u32) -> Self {
        Self {
            template,
            priority: -i32::try_from(depth).unwrap_or(i32::MAX),
        }
    }
}

impl Ord for TemplateCall {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.template.class.cmp(&other.template.class))
    }
}

impl PartialOrd for TemplateCall {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct Skolemizer<'a> {
    sitemap: &'a Sitemap,
    ontology: String,
    base_uri_builder: UriBuilder,
    absolute_path_builder: UriBuilder,
    resolver: NameResolver,
}

impl<'a> Skolemizer<'a> {
    /// `base_uri_builder` starts from the deployment base URI,
    /// `absolute_path_builder` from the request URI without its query.
    pub fn new(
        sitemap: &'a Sitemap,
        ontology: &str,
        base_uri_builder: UriBuilder,
        absolute_path_builder: UriBuilder,
    ) -> Result<Self> {
        sitemap.require_ontology(ontology)?;

        Ok(Self {
            sitemap,
            ontology: ontology.to_string(),
            base_uri_builder,
            absolute_path_builder,
            resolver: NameResolver::new(),
        })
    }

    pub fn ontology(&self) -> &str {
        &self.ontology
    }

    /// Templates with a skolem template that `resource` is typed with,
    /// searched through the import closure of `ontology`.
    ///
    /// Each ontology only offers the templates it defines itself, with
    /// priority `-(depth + distance)`. Results of all depths are kept.
    pub fn select_templates(&self, ontology: &str, resource: &Resource<'_>, depth: u32) -> Result<BTreeSet<TemplateCall>> {
        self.sitemap.require_ontology(ontology)?;

        let mut calls = BTreeSet::new();
        for (imported, distance) in self.sitemap.import_closure(ontology) {
            for template in &imported.templates {
                if template.skolem_template.is_none()
                    || !template.is_defined_by(&imported.iri)
                    || !resource.has_type(&template.class)
                {
                    continue;
                }
                trace!("Resource {} matched Template <{}>", resource.node(), template.class);
                calls.insert(TemplateCall::new(Arc::clone(template), depth + distance));
            }
        }

        Ok(calls)
    }

    /// URI for `resource`, or `None` when none of its types has a template
    pub fn build(&self, resource: &Resource<'_>) -> Result<Option<NamedNode>> {
        let calls = self.select_templates(&self.ontology, resource, 0)?;
        let Some(call) = calls.into_iter().next() else {
            return Ok(None);
        };

        debug!("Skolemizing resource {} using ontology class <{}>", resource.node(), call.template.class);
        self.build_with_template(resource, &call.template).map(Some)
    }

    /// Expand `template` for `resource`.
    ///
    /// A skolem template is appended to the absolute path, or to the URI of
    /// the resource's declared parent or container when it has one.
    /// Otherwise the routing path is appended to the base URI.
    pub fn build_with_template(&self, resource: &Resource<'_>, template: &Template) -> Result<NamedNode> {
        let (builder, pattern) = match &template.skolem_template {
            Some(skolem_template) => {
                let mut builder = self.absolute_path_builder.clone();
                for property in CONTAINER_OVERRIDES {
                    if let Some(container) = resource.uri_value(property) {
                        builder = UriBuilder::from_uri(container)?;
                    }
                }
                (builder.path(skolem_template.as_str()), skolem_template)
            }
            None => {
                let path = template.require_path()?;
                (self.base_uri_builder.clone().path(path.as_str()), path)
            }
        };

        let mut patterns: Vec<&UriTemplate> = vec![pattern];
        patterns.extend(template.fragment_template.as_ref());
        let values = self.resolver.name_value_map(resource, &patterns);

        builder
            .fragment(template.fragment_template.as_ref().map(UriTemplate::as_str))
            .build_from_map(&values)
    }

    /// Rename every anonymous subject of `graph` that gets a URI.
    ///
    /// URIs are computed against the input graph, then substituted wherever
    /// the blank node occurs. Blank nodes without a URI stay anonymous; a
    /// graph where nothing is renamed is returned as it came in.
    pub fn build_graph(&self, graph: Graph) -> Result<Graph> {
        let mut subjects: Vec<BlankNode> = graph
            .iter()
            .filter_map(|triple| match triple.subject {
                SubjectRef::BlankNode(node) => Some(node.into_owned()),
                _ => None,
            })
            .collect();
        subjects.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        subjects.dedup();

        let mut renames: HashMap<BlankNode, NamedNode> = HashMap::new();
        for node in &subjects {
            if let Some(uri) = self.build(&Resource::new(&graph, node))? {
                renames.insert(node.clone(), uri);
            }
        }

        if renames.is_empty() {
            return Ok(graph);
        }
        info!("Skolemized {} of {} anonymous resources", renames.len(), subjects.len());

        let mut renamed = Graph::new();
        for triple in graph.iter() {
            let subject = match triple.subject {
                SubjectRef::BlankNode(node) => match renames.get(&node.into_owned()) {
                    Some(uri) => uri.clone().into(),
                    None => triple.subject.into_owned(),
                },
                _ => triple.subject.into_owned(),
            };
            let object: Term = match triple.object {
                TermRef::BlankNode(node) => match renames.get(&node.into_owned()) {
                    Some(uri) => uri.clone().into(),
                    None => triple.object.into_owned(),
                },
                _ => triple.object.into_owned(),
            };
            renamed.insert(&Triple::new(subject, triple.predicate.into_owned(), object));
        }

        Ok(renamed)
    }
}
