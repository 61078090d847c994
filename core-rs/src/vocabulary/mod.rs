//! Constant NamedNodeRefs for the vocabulary consumed at the processor boundary:
//! RDF/RDFS/OWL terms, the Linked Data Templates (LDT) vocabulary and the
//! SIOC container properties used to override skolemization bases.

use oxigraph::model::NamedNodeRef;

pub const LDT_NS: &str = "https://www.w3.org/ns/ldt#";

// rdf / rdfs
pub const TYPE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
pub const IS_DEFINED_BY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2000/01/rdf-schema#isDefinedBy");

// owl
pub const IMPORTS: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
pub const RESTRICTION: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Restriction");
pub const ON_PROPERTY: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
pub const ALL_VALUES_FROM: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#allValuesFrom");

// ldt
pub const TEMPLATE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://www.w3.org/ns/ldt#Template");
pub const PATH: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://www.w3.org/ns/ldt#path");
pub const SKOLEM_TEMPLATE: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("https://www.w3.org/ns/ldt#skolemTemplate");
pub const FRAGMENT: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("https://www.w3.org/ns/ldt#fragment");

// sioc
pub const HAS_PARENT: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://rdfs.org/sioc/ns#has_parent");
pub const HAS_CONTAINER: NamedNodeRef<'_> =
    NamedNodeRef::new_unchecked("http://rdfs.org/sioc/ns#has_container");

/// Container override properties, in the order they are applied.
/// A later property wins over an earlier one.
pub const CONTAINER_OVERRIDES: [NamedNodeRef<'_>; 2] = [HAS_PARENT, HAS_CONTAINER];

/// Local name of an IRI: the longest trailing XML NCName.
///
/// `http://example.org/ns#slug` → `slug`, `http://example.org/terms/2title` → `title`.
/// Returns an empty string when the IRI ends with a non-name character.
pub fn local_name(iri: &str) -> &str {
    let mut start = iri.len();
    for (idx, c) in iri.char_indices().rev() {
        if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
            start = idx;
        } else {
            break;
        }
    }

    // an NCName must start with a letter or underscore
    let tail = &iri[start..];
    match tail.char_indices().find(|(_, c)| c.is_alphabetic() || *c == '_') {
        Some((offset, _)) => &tail[offset..],
        None => "",
    }
}
