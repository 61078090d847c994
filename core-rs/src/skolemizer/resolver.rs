//! Name resolver: fills URI template variables from a resource's own data

use oxigraph::model::{SubjectRef, TermRef};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::resource::Resource;
use crate::template::{encode_path_segment, UriTemplate};
use crate::vocabulary::local_name;

/// Resolves template variable names against resource properties.
///
/// A plain name selects the first literal property whose predicate local
/// name equals the variable. A dotted name `a.b` first follows the
/// anonymous resource under property `a`, then resolves `b` there.
/// Properties are visited in the order of [`Resource::properties`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NameResolver;

impl NameResolver {
    pub fn new() -> Self {
        Self
    }

    /// Literal value for `name`, or `None` when unresolved.
    ///
    /// ```
    /// use ldt_processor::ontology::parse_graph;
    /// use ldt_processor::resource::Resource;
    /// use ldt_processor::skolemizer::NameResolver;
    /// use oxigraph::model::NamedNodeRef;
    ///
    /// let graph = parse_graph(
    ///     "<http://ex/r> <http://ex/o#author> [ <http://ex/o#name> \"Jane\" ] .",
    ///     None,
    /// ).unwrap();
    /// let r = Resource::new(&graph, NamedNodeRef::new("http://ex/r").unwrap());
    /// assert_eq!(NameResolver::new().resolve(&r, "author.name").as_deref(), Some("Jane"));
    /// ```
    pub fn resolve(&self, resource: &Resource<'_>, name: &str) -> Option<String> {
        if let Some((head, rest)) = name.split_once('.') {
            if let Some(sub_resource) = self.anonymous_value(resource, head) {
                return self.resolve(&sub_resource, rest);
            }
        }

        resource
            .properties()
            .into_iter()
            .find_map(|(predicate, object)| match object {
                TermRef::Literal(literal) if local_name(predicate.as_str()) == name => {
                    trace!("Found Literal {} for property name: {}", literal, name);
                    Some(literal.value().to_string())
                }
                _ => None,
            })
    }

    fn anonymous_value<'g>(&self, resource: &Resource<'g>, name: &str) -> Option<Resource<'g>> {
        resource
            .properties()
            .into_iter()
            .find_map(|(predicate, object)| match object {
                TermRef::BlankNode(node) if local_name(predicate.as_str()) == name => {
                    trace!("Found Resource {} for property name: {}", node, name);
                    Some(Resource::new(resource.graph(), SubjectRef::BlankNode(node)))
                }
                _ => None,
            })
    }

    /// Values for every variable of `templates`, percent-encoded as path
    /// segment content. Unresolved variables are left out.
    pub fn name_value_map(&self, resource: &Resource<'_>, templates: &[&UriTemplate]) -> HashMap<String, String> {
        let mut values = HashMap::new();

        for template in templates {
            for name in template.names() {
                if values.contains_key(name) {
                    continue;
                }
                if let Some(value) = self.resolve(resource, name) {
                    let encoded = encode_path_segment(&value);
                    debug!("UriTemplate variable name: {} has value: {}", name, encoded);
                    values.insert(name.to_string(), encoded);
                }
            }
        }

        values
    }
}
