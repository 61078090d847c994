/**
 * model.rs
 * Template catalog data model: templates, restrictions, ontologies and the
 * sitemap holding the whole import graph.
 *
 * All of it is built once per configuration load and never mutated while
 * requests are served; a reload builds a fresh Sitemap.
 */

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::errors::{ProcessorError, Result};
use crate::template::UriTemplate;

/// Resource template: an ontology class annotated with URI templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// IRI of the ontology class carrying the annotations
    pub class: String,
    /// Request routing pattern (`ldt:path`)
    pub path: Option<UriTemplate>,
    /// Naming pattern for anonymous resources (`ldt:skolemTemplate`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skolem_template: Option<UriTemplate>,
    /// Fragment pattern (`ldt:fragment`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_template: Option<UriTemplate>,
    /// Declaring ontology (`rdfs:isDefinedBy`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_defined_by: Option<String>,
}

impl Template {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            path: None,
            skolem_template: None,
            fragment_template: None,
            is_defined_by: None,
        }
    }

    pub fn with_path(mut self, path: &str) -> Result<Self> {
        self.path = Some(UriTemplate::new(path)?);
        Ok(self)
    }

    pub fn with_skolem_template(mut self, template: &str) -> Result<Self> {
        self.skolem_template = Some(UriTemplate::new(template)?);
        Ok(self)
    }

    pub fn with_fragment_template(mut self, template: &str) -> Result<Self> {
        self.fragment_template = Some(UriTemplate::new(template)?);
        Ok(self)
    }

    pub fn defined_by(mut self, ontology: impl Into<String>) -> Self {
        self.is_defined_by = Some(ontology.into());
        self
    }

    /// Routing pattern; a template without one cannot take part in matching.
    pub fn require_path(&self) -> Result<&UriTemplate> {
        self.path.as_ref().ok_or_else(|| {
            ProcessorError::Configuration(format!(
                "Template <{}> has no ldt:path value",
                self.class
            ))
        })
    }

    pub fn is_defined_by(&self, ontology: &str) -> bool {
        self.is_defined_by.as_deref() == Some(ontology)
    }
}

/// `owl:allValuesFrom` restriction declared on a template class
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restriction {
    pub template: String,
    pub on_property: String,
    pub all_values_from: String,
}

/// One ontology of the sitemap with its precomputed template data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ontology {
    pub iri: String,
    /// Directly imported ontologies, in traversal order
    pub imports: Vec<String>,
    /// Templates defined by this ontology, ordered by class IRI
    pub templates: Vec<Arc<Template>>,
    pub restrictions: Vec<Restriction>,
}

impl Ontology {
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            ..Default::default()
        }
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    /// Add a template; it is marked as defined by this ontology if it
    /// declares no `rdfs:isDefinedBy` of its own.
    pub fn with_template(mut self, template: Template) -> Self {
        self.add_template(template);
        self
    }

    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self.restrictions.sort();
        self
    }

    pub fn add_template(&mut self, mut template: Template) {
        if template.is_defined_by.is_none() {
            template.is_defined_by = Some(self.iri.clone());
        }
        self.templates.retain(|existing| existing.class != template.class);
        self.templates.push(Arc::new(template));
        self.templates.sort_by(|a, b| a.class.cmp(&b.class));
    }

    pub fn template(&self, class: &str) -> Option<&Arc<Template>> {
        self.templates.iter().find(|t| t.class == class)
    }
}

/// Import graph rooted at the configured sitemap ontology
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    root: String,
    ontologies: HashMap<String, Ontology>,
    /// type → Template table over every ontology of the graph
    templates_by_class: HashMap<String, Arc<Template>>,
}

impl Sitemap {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn with_ontology(mut self, ontology: Ontology) -> Self {
        self.insert(ontology);
        self
    }

    pub fn insert(&mut self, ontology: Ontology) {
        if let Some(previous) = self.ontologies.remove(&ontology.iri) {
            for template in &previous.templates {
                self.templates_by_class.remove(&template.class);
            }
        }
        for template in &ontology.templates {
            self.templates_by_class
                .insert(template.class.clone(), Arc::clone(template));
        }
        self.ontologies.insert(ontology.iri.clone(), ontology);
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn root_ontology(&self) -> Option<&Ontology> {
        self.ontologies.get(&self.root)
    }

    pub fn ontology(&self, iri: &str) -> Option<&Ontology> {
        self.ontologies.get(iri)
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.ontologies.contains_key(iri)
    }

    /// Ontology by IRI, as a contract check for callers handing one in
    pub fn require_ontology(&self, iri: &str) -> Result<&Ontology> {
        self.ontology(iri).ok_or_else(|| {
            ProcessorError::InvalidArgument(format!("Ontology <{}> is not part of the sitemap", iri))
        })
    }

    /// Template by class IRI, from any ontology of the graph
    pub fn template(&self, class: &str) -> Option<&Arc<Template>> {
        self.templates_by_class.get(class)
    }

    /// All ontologies ordered by IRI
    pub fn ontologies(&self) -> Vec<&Ontology> {
        let sorted: BTreeMap<&str, &Ontology> =
            self.ontologies.iter().map(|(iri, o)| (iri.as_str(), o)).collect();
        sorted.into_values().collect()
    }

    /// Import closure of `iri` in breadth-first order, each ontology paired
    /// with its shortest import distance (0 for `iri` itself).
    ///
    /// Every ontology is visited once, so mutually importing ontologies
    /// terminate. Imports missing from the sitemap are skipped.
    pub fn import_closure(&self, iri: &str) -> Vec<(&Ontology, u32)> {
        let mut closure = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back((iri, 0u32));

        while let Some((current, depth)) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            let Some(ontology) = self.ontologies.get(current) else {
                continue;
            };
            closure.push((ontology, depth));
            for import in &ontology.imports {
                if !visited.contains(import.as_str()) {
                    queue.push_back((import.as_str(), depth + 1));
                }
            }
        }

        closure
    }
}
