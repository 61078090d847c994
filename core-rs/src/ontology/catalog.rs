/**
 * catalog.rs
 * Template catalog: turns query results over the ontology into the
 * precomputed Sitemap tables.
 *
 * The query executor is a black box; anything able to answer CONSTRUCT and
 * SELECT queries over the ontology (the oxigraph-backed OntologyLibrary, a
 * remote endpoint client, a test double) can feed the catalog.
 */

use oxigraph::model::{Graph, NamedNodeRef, SubjectRef, Term, TermRef};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};

use super::model::{Ontology, Restriction, Sitemap, Template};
use super::query::SparqlQuery;
use crate::errors::{ProcessorError, Result};
use crate::vocabulary;

/// One SELECT solution: variable name → bound term
pub type QuerySolution = HashMap<String, Term>;

pub trait QueryExecutor {
    fn construct(&self, query: &SparqlQuery) -> Result<Graph>;

    fn select(&self, query: &SparqlQuery) -> Result<Vec<QuerySolution>>;
}

/// Variable bound to the ontology IRI in both catalog queries
pub const IS_DEFINED_BY_VAR: &str = "isDefinedBy";

pub struct TemplateCatalog<'a, E: QueryExecutor + ?Sized> {
    executor: &'a E,
    templates_query: SparqlQuery,
    restrictions_query: SparqlQuery,
}

impl<'a, E: QueryExecutor + ?Sized> TemplateCatalog<'a, E> {
    pub fn new(executor: &'a E, templates_query: SparqlQuery, restrictions_query: SparqlQuery) -> Self {
        Self {
            executor,
            templates_query,
            restrictions_query,
        }
    }

    /// Templates defined by `ontology`, ordered by class IRI
    pub fn templates(&self, ontology: &str) -> Result<Vec<Template>> {
        let query = self.templates_query.bind_iri(IS_DEFINED_BY_VAR, ontology)?;
        let graph = self.executor.construct(&query)?;
        templates_from_graph(&graph, ontology)
    }

    /// allValuesFrom restrictions on templates defined by `ontology`
    pub fn restrictions(&self, ontology: &str) -> Result<Vec<Restriction>> {
        let query = self.restrictions_query.bind_iri(IS_DEFINED_BY_VAR, ontology)?;

        let mut restrictions: Vec<Restriction> = self
            .executor
            .select(&query)?
            .iter()
            .filter_map(|solution| {
                Some(Restriction {
                    template: named_value(solution, "Template")?,
                    on_property: named_value(solution, "onProperty")?,
                    all_values_from: named_value(solution, "allValuesFrom")?,
                })
            })
            .collect();
        restrictions.sort();
        restrictions.dedup();
        Ok(restrictions)
    }

    /// Direct imports of `ontology`, ordered by IRI
    pub fn imports(&self, ontology: &str) -> Result<Vec<String>> {
        let mut imports: Vec<String> = self
            .executor
            .select(&SparqlQuery::imports(ontology)?)?
            .iter()
            .filter_map(|solution| named_value(solution, "import"))
            .collect();
        imports.sort();
        imports.dedup();
        Ok(imports)
    }

    /// Build the sitemap for `root` and everything it transitively imports
    pub fn load_sitemap(&self, root: &str) -> Result<Sitemap> {
        let mut sitemap = Sitemap::new(root);
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([root.to_string()]);

        while let Some(iri) = queue.pop_front() {
            if !visited.insert(iri.clone()) {
                continue;
            }

            let mut ontology = Ontology::new(iri.as_str());
            for template in self.templates(&iri)? {
                ontology.add_template(template);
            }
            ontology.restrictions = self.restrictions(&iri)?;
            ontology.imports = self.imports(&iri)?;

            debug!(
                "Ontology <{}>: {} templates, {} restrictions, imports {:?}",
                iri,
                ontology.templates.len(),
                ontology.restrictions.len(),
                ontology.imports
            );

            queue.extend(ontology.imports.iter().filter(|i| !visited.contains(*i)).cloned());
            sitemap.insert(ontology);
        }

        info!("Loaded sitemap <{}> with {} ontologies", root, visited.len());
        Ok(sitemap)
    }
}

fn named_value(solution: &QuerySolution, var: &str) -> Option<String> {
    match solution.get(var) {
        Some(Term::NamedNode(node)) => Some(node.as_str().to_string()),
        _ => None,
    }
}

fn literal_value<'g>(
    graph: &'g Graph,
    subject: SubjectRef<'_>,
    predicate: NamedNodeRef<'_>,
    template: &str,
) -> Result<Option<&'g str>> {
    match graph.object_for_subject_predicate(subject, predicate) {
        None => Ok(None),
        Some(TermRef::Literal(literal)) => Ok(Some(literal.value())),
        Some(other) => Err(ProcessorError::Configuration(format!(
            "{} value of template <{}> is not a literal: {}",
            predicate, template, other
        ))),
    }
}

/// Parse `ldt:Template` descriptors out of a templates query result
pub fn templates_from_graph(graph: &Graph, ontology: &str) -> Result<Vec<Template>> {
    let mut templates = Vec::new();

    for subject in graph.subjects_for_predicate_object(vocabulary::TYPE, vocabulary::TEMPLATE) {
        let class = match subject {
            SubjectRef::NamedNode(node) => node.as_str(),
            _ => {
                warn!("Ignoring anonymous ldt:Template {} in ontology <{}>", subject, ontology);
                continue;
            }
        };

        let mut template = Template::new(class);
        if let Some(path) = literal_value(graph, subject, vocabulary::PATH, class)? {
            template = template.with_path(path)?;
        }
        if let Some(skolem) = literal_value(graph, subject, vocabulary::SKOLEM_TEMPLATE, class)? {
            template = template.with_skolem_template(skolem)?;
        }
        if let Some(fragment) = literal_value(graph, subject, vocabulary::FRAGMENT, class)? {
            template = template.with_fragment_template(fragment)?;
        }
        template.is_defined_by = match graph.object_for_subject_predicate(subject, vocabulary::IS_DEFINED_BY) {
            Some(TermRef::NamedNode(node)) => Some(node.as_str().to_string()),
            _ => Some(ontology.to_string()),
        };

        templates.push(template);
    }

    templates.sort_by(|a, b| a.class.cmp(&b.class));
    Ok(templates)
}
