/**
 * query.rs
 * SPARQL queries over the sitemap ontology
 *
 * The templates and restrictions queries come from configuration; the
 * defaults below describe the LDT vocabulary layout and are what the demo
 * configuration uses.
 */

use oxigraph::model::NamedNode;
use regex::Regex;

use crate::errors::Result;
use crate::vocabulary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Bind variable `?var` (or `$var`) to an IRI everywhere it occurs
    ///
    /// # Examples
    ///
    /// ```
    /// use ldt_processor::ontology::SparqlQuery;
    ///
    /// let query = SparqlQuery::new("SELECT ?t WHERE { ?t ?p ?isDefinedBy . ?x ?p ?isDefinedByOther }")
    ///     .bind_iri("isDefinedBy", "http://example.org/sitemap#")
    ///     .unwrap();
    /// assert!(query.as_str().contains("?p <http://example.org/sitemap#> ."));
    /// assert!(query.as_str().contains("?isDefinedByOther"));
    /// ```
    pub fn bind_iri(&self, var: &str, iri: &str) -> Result<Self> {
        let iri = NamedNode::new(iri)?;
        let re = Regex::new(&format!(r"[?$]{}\b", regex::escape(var)))?;
        let replacement = format!("<{}>", iri.as_str());
        Ok(Self::new(re.replace_all(&self.query, regex::NoExpand(&replacement)).into_owned()))
    }

    /// Default templates query: CONSTRUCTs an `ldt:Template` descriptor for
    /// every template class defined by `?isDefinedBy`
    pub fn templates() -> Self {
        Self::new(
            r#"
            PREFIX ldt:  <https://www.w3.org/ns/ldt#>
            PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>

            CONSTRUCT {
                ?template a ldt:Template ;
                    ldt:path ?path ;
                    ldt:skolemTemplate ?skolemTemplate ;
                    ldt:fragment ?fragment ;
                    rdfs:isDefinedBy ?isDefinedBy .
            }
            WHERE {
                ?template a ldt:Template ;
                    rdfs:isDefinedBy ?isDefinedBy .
                OPTIONAL { ?template ldt:path ?path }
                OPTIONAL { ?template ldt:skolemTemplate ?skolemTemplate }
                OPTIONAL { ?template ldt:fragment ?fragment }
            }
            "#,
        )
    }

    /// Default restrictions query: SELECTs `?Template ?onProperty ?allValuesFrom`
    /// for `owl:allValuesFrom` restrictions on templates defined by `?isDefinedBy`
    pub fn restrictions() -> Self {
        Self::new(format!(
            r#"
            PREFIX ldt:  <https://www.w3.org/ns/ldt#>
            PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>

            SELECT ?Template ?onProperty ?allValuesFrom
            WHERE {{
                ?Template a ldt:Template ;
                    rdfs:isDefinedBy ?isDefinedBy ;
                    rdfs:subClassOf ?restriction .
                ?restriction a {} ;
                    {} ?onProperty ;
                    {} ?allValuesFrom .
            }}
            "#,
            vocabulary::RESTRICTION,
            vocabulary::ON_PROPERTY,
            vocabulary::ALL_VALUES_FROM,
        ))
    }

    /// Direct imports of an ontology
    pub fn imports(ontology: &str) -> Result<Self> {
        Self::new(format!(
            "SELECT ?import WHERE {{ ?ontology {} ?import . }}",
            vocabulary::IMPORTS
        ))
        .bind_iri("ontology", ontology)
    }
}
