//! Read-only view of one node of an RDF graph
//!
//! The matcher and the skolemizer never mutate request data; they look at a
//! subject's `rdf:type` edges and property values through this view.

use oxigraph::model::{Graph, NamedNodeRef, SubjectRef, TermRef};

use crate::vocabulary;

#[derive(Debug, Clone, Copy)]
pub struct Resource<'g> {
    graph: &'g Graph,
    node: SubjectRef<'g>,
}

impl<'g> Resource<'g> {
    pub fn new(graph: &'g Graph, node: impl Into<SubjectRef<'g>>) -> Self {
        Self {
            graph,
            node: node.into(),
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn node(&self) -> SubjectRef<'g> {
        self.node
    }

    pub fn is_anon(&self) -> bool {
        matches!(self.node, SubjectRef::BlankNode(_))
    }

    /// IRI of a named resource
    pub fn uri(&self) -> Option<&'g str> {
        match self.node {
            SubjectRef::NamedNode(node) => Some(node.as_str()),
            _ => None,
        }
    }

    /// IRI `rdf:type` values in lexicographic order
    pub fn types(&self) -> Vec<&'g str> {
        let mut types: Vec<&'g str> = self
            .graph
            .objects_for_subject_predicate(self.node, vocabulary::TYPE)
            .filter_map(|object| match object {
                TermRef::NamedNode(class) => Some(class.as_str()),
                _ => None,
            })
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }

    pub fn has_type(&self, class: &str) -> bool {
        self.graph
            .objects_for_subject_predicate(self.node, vocabulary::TYPE)
            .any(|object| matches!(object, TermRef::NamedNode(node) if node.as_str() == class))
    }

    pub fn has_property(&self, predicate: NamedNodeRef<'_>) -> bool {
        self.graph
            .object_for_subject_predicate(self.node, predicate)
            .is_some()
    }

    /// Outgoing (predicate, object) pairs ordered by predicate IRI, then by
    /// the object's N-Triples form
    pub fn properties(&self) -> Vec<(NamedNodeRef<'g>, TermRef<'g>)> {
        let mut properties: Vec<(NamedNodeRef<'g>, TermRef<'g>)> = self
            .graph
            .triples_for_subject(self.node)
            .map(|triple| (triple.predicate, triple.object))
            .collect();
        properties.sort_by_cached_key(|(predicate, object)| (predicate.as_str().to_string(), object.to_string()));
        properties
    }

    /// Value of `predicate` when it is a named resource.
    /// With several values, the lexicographically smallest IRI is returned.
    pub fn uri_value(&self, predicate: NamedNodeRef<'_>) -> Option<&'g str> {
        self.graph
            .objects_for_subject_predicate(self.node, predicate)
            .filter_map(|object| match object {
                TermRef::NamedNode(node) => Some(node.as_str()),
                _ => None,
            })
            .min()
    }
}
