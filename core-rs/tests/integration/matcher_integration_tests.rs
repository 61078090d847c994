//! Integration tests for request matching
//!
//! Loads the demo sitemap (sitemap ontology importing an upper ontology)
//! from Turtle files and checks:
//! - Most specific template selection
//! - Import shadowing and fallback to imported templates
//! - Captured variable bindings
//! - Restriction lookup
//! - Contract checks on request URIs

use ldt_processor::matcher::TemplateMatcher;
use ldt_processor::{Application, ProcessorConfig, ProcessorError, SparqlQuery};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SITEMAP: &str = "http://example.org/sitemap#";

// ==================== Test Helper Functions ====================

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos")
}

fn demo_app() -> Application {
    Application::from_config_file(demos_dir().join("ldt.yaml")).unwrap()
}

fn matched_class(app: &Application, uri: &str) -> Option<String> {
    app.match_uri(uri).unwrap().map(|t| t.class.clone())
}

// ==================== Matching ====================

/// Test: A literal path beats a variable path
#[test]
fn test_literal_template_wins() {
    let app = demo_app();
    assert_eq!(
        matched_class(&app, "http://example.org/posts/new").as_deref(),
        Some("http://example.org/sitemap#NewPost")
    );
    assert_eq!(
        matched_class(&app, "http://example.org/posts/hello").as_deref(),
        Some("http://example.org/sitemap#Post")
    );
    assert_eq!(
        matched_class(&app, "http://example.org/posts/").as_deref(),
        Some("http://example.org/sitemap#Posts")
    );
}

/// Test: Explicit variable regexes restrict matches
#[test]
fn test_explicit_regex_variable() {
    let app = demo_app();
    assert_eq!(
        matched_class(&app, "http://example.org/posts/hello/comments/12").as_deref(),
        Some("http://example.org/sitemap#Comment")
    );
    // non-numeric id falls through to the upper ontology catch-all
    assert_eq!(
        matched_class(&app, "http://example.org/posts/hello/comments/abc").as_deref(),
        Some("http://example.org/upper#Resource")
    );
}

/// Test: Imported templates are used when the sitemap has no match
///
/// The upper ontology's catch-all templates only apply to paths the sitemap
/// ontology does not handle itself.
#[test]
fn test_import_fallback_and_shadowing() {
    let app = demo_app();
    assert_eq!(
        matched_class(&app, "http://example.org/things/1").as_deref(),
        Some("http://example.org/upper#Item")
    );
    assert_eq!(
        matched_class(&app, "http://example.org/about/").as_deref(),
        Some("http://example.org/upper#Container")
    );

    let all = app.match_all("http://example.org/posts/hello").unwrap();
    for found in all.values() {
        for m in found {
            assert!(m.template.class.starts_with(SITEMAP));
        }
    }
}

/// Test: Captured values are returned with the matches
#[test]
fn test_match_all_returns_bindings() {
    let app = demo_app();
    let all = app.match_all("http://example.org/posts/hello-world/comments/3").unwrap();
    let (uri_template, found) = all.iter().next().unwrap();

    assert_eq!(uri_template.as_str(), "/posts/{post}/comments/{id: [0-9]+}");
    assert_eq!(found[0].bindings["post"], "hello-world");
    assert_eq!(found[0].bindings["id"], "3");
}

/// Test: The base URI itself is the root path
#[test]
fn test_base_uri_matches_root() {
    let app = demo_app();
    assert_eq!(
        matched_class(&app, "http://example.org/").as_deref(),
        Some("http://example.org/upper#Resource")
    );
}

/// Test: Request URIs must be absolute and under the base URI
#[test]
fn test_contract_violations() {
    let app = demo_app();
    assert!(matches!(app.match_uri("/posts/new"), Err(ProcessorError::InvalidArgument(_))));
    assert!(matches!(
        app.match_uri("http://elsewhere.org/posts/new"),
        Err(ProcessorError::InvalidArgument(_))
    ));
}

/// Test: Restrictions are looked up by allValuesFrom class
#[test]
fn test_templates_by_restriction() {
    let app = demo_app();
    let sitemap = app.sitemap().unwrap();
    let matcher = TemplateMatcher::new(&sitemap);

    let found = matcher
        .templates_by_restriction(SITEMAP, None, "http://example.org/sitemap#Post")
        .unwrap();
    let containers = &found["http://rdfs.org/sioc/ns#has_container"];
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].class, "http://example.org/sitemap#Posts");

    assert!(matcher
        .templates_by_restriction(SITEMAP, None, "http://example.org/sitemap#Comment")
        .unwrap()
        .is_empty());
}

/// Test: Mutually importing ontologies load and match without looping
#[test]
fn test_cyclic_imports() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.ttl");
    let b = temp_dir.path().join("b.ttl");
    fs::write(
        &a,
        r#"
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix ldt: <https://www.w3.org/ns/ldt#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        <http://ex/a#> a owl:Ontology ; owl:imports <http://ex/b#> .
        <http://ex/a#Home> a ldt:Template ; ldt:path "/" ; rdfs:isDefinedBy <http://ex/a#> .
        "#,
    )
    .unwrap();
    fs::write(
        &b,
        r#"
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix ldt: <https://www.w3.org/ns/ldt#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        <http://ex/b#> a owl:Ontology ; owl:imports <http://ex/a#> .
        <http://ex/b#Page> a ldt:Template ; ldt:path "/{page}" ; rdfs:isDefinedBy <http://ex/b#> .
        "#,
    )
    .unwrap();

    let config = ProcessorConfig::new("http://ex/a#", "http://ex/")
        .with_location("http://ex/a#", a)
        .with_location("http://ex/b#", b)
        .with_queries(SparqlQuery::templates().as_str(), SparqlQuery::restrictions().as_str());
    let app = Application::new(config).unwrap();

    assert_eq!(app.sitemap().unwrap().ontologies().len(), 2);
    assert_eq!(matched_class(&app, "http://ex/").as_deref(), Some("http://ex/a#Home"));
    assert_eq!(matched_class(&app, "http://ex/about").as_deref(), Some("http://ex/b#Page"));
    assert_eq!(matched_class(&app, "http://ex/a/b"), None);
}
