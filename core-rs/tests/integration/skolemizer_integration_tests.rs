//! Integration tests for skolemization
//!
//! Skolemizes the demo request data against the demo sitemap:
//! - Skolem templates appended to the request's absolute path
//! - Container override and fragment templates
//! - Templates found through imports
//! - Blank nodes without a template staying anonymous

use ldt_processor::ontology::parse_graph;
use ldt_processor::resource::Resource;
use ldt_processor::skolemizer::Skolemizer;
use ldt_processor::template::UriBuilder;
use ldt_processor::Application;
use oxigraph::model::{NamedNode, NamedNodeRef, SubjectRef, TermRef};
use std::fs;
use std::path::{Path, PathBuf};

const ABSOLUTE_PATH: &str = "http://example.org/posts/";

// ==================== Test Helper Functions ====================

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos")
}

fn demo_app() -> Application {
    Application::from_config_file(demos_dir().join("ldt.yaml")).unwrap()
}

fn demo_graph() -> oxigraph::model::Graph {
    let turtle = fs::read_to_string(demos_dir().join("post.ttl")).unwrap();
    parse_graph(&turtle, Some(ABSOLUTE_PATH)).unwrap()
}

fn named_subjects(graph: &oxigraph::model::Graph) -> Vec<String> {
    let mut subjects: Vec<String> = graph
        .iter()
        .filter_map(|t| match t.subject {
            SubjectRef::NamedNode(node) => Some(node.as_str().to_string()),
            _ => None,
        })
        .collect();
    subjects.sort();
    subjects.dedup();
    subjects
}

fn anonymous_subjects(graph: &oxigraph::model::Graph) -> usize {
    let mut subjects: Vec<String> = graph
        .iter()
        .filter_map(|t| match t.subject {
            SubjectRef::BlankNode(node) => Some(node.as_str().to_string()),
            _ => None,
        })
        .collect();
    subjects.sort();
    subjects.dedup();
    subjects.len()
}

// ==================== Graph-wide rename ====================

/// Test: Typed blank nodes get URIs from their templates
#[test]
fn test_skolemize_demo_graph() {
    let app = demo_app();
    let skolemized = app.skolemize(demo_graph(), ABSOLUTE_PATH).unwrap();

    let subjects = named_subjects(&skolemized);
    assert_eq!(
        subjects,
        vec![
            "http://example.org/posts/hello%20world".to_string(),
            "http://example.org/posts/hello-world/comments/7#Jane".to_string(),
            "http://example.org/posts/notes".to_string(),
        ]
    );

    // the untyped author and the unknown type stay anonymous
    assert_eq!(anonymous_subjects(&skolemized), 2);
}

/// Test: Renaming preserves every statement
#[test]
fn test_skolemize_preserves_triples() {
    let app = demo_app();
    let graph = demo_graph();
    let before = graph.len();
    let skolemized = app.skolemize(graph, ABSOLUTE_PATH).unwrap();
    assert_eq!(skolemized.len(), before);
}

/// Test: The nested author resource is still linked after renaming
#[test]
fn test_renamed_subject_keeps_nested_resources() {
    let app = demo_app();
    let skolemized = app.skolemize(demo_graph(), ABSOLUTE_PATH).unwrap();

    let comment = NamedNodeRef::new("http://example.org/posts/hello-world/comments/7#Jane").unwrap();
    let author = skolemized
        .object_for_subject_predicate(comment, NamedNodeRef::new("http://example.org/sitemap#author").unwrap())
        .unwrap();
    assert!(matches!(author, TermRef::BlankNode(_)));
}

/// Test: Skolemizing twice changes nothing more
#[test]
fn test_skolemize_is_idempotent() {
    let app = demo_app();
    let once = app.skolemize(demo_graph(), ABSOLUTE_PATH).unwrap();
    let twice = app.skolemize(once.clone(), ABSOLUTE_PATH).unwrap();
    assert_eq!(named_subjects(&once), named_subjects(&twice));
    assert_eq!(once.len(), twice.len());
}

// ==================== Per-resource naming ====================

/// Test: A resource without a matching type has no URI
#[test]
fn test_unknown_type_builds_nothing() {
    let app = demo_app();
    let sitemap = app.sitemap().unwrap();
    let graph = parse_graph(
        "[] a <http://example.org/sitemap#Unknown> ; <http://purl.org/dc/terms/title> \"x\" .",
        None,
    )
    .unwrap();
    let node = graph.iter().next().unwrap().subject;

    let skolemizer = Skolemizer::new(
        &sitemap,
        "http://example.org/sitemap#",
        UriBuilder::from_uri("http://example.org/").unwrap(),
        UriBuilder::from_uri(ABSOLUTE_PATH).unwrap(),
    )
    .unwrap();
    assert!(skolemizer.build(&Resource::new(&graph, node)).unwrap().is_none());
}

/// Test: Without a skolem template the routing path and base URI are used
#[test]
fn test_routing_path_fallback() {
    let app = demo_app();
    let sitemap = app.sitemap().unwrap();
    let graph = parse_graph("[] <http://example.org/sitemap#slug> \"first post\" .", None).unwrap();
    let node = graph.iter().next().unwrap().subject;

    let skolemizer = Skolemizer::new(
        &sitemap,
        "http://example.org/sitemap#",
        UriBuilder::from_uri("http://example.org/").unwrap(),
        UriBuilder::from_uri(ABSOLUTE_PATH).unwrap(),
    )
    .unwrap();
    let posts = sitemap.template("http://example.org/sitemap#Post").unwrap();
    let mut routing_only = posts.as_ref().clone();
    routing_only.skolem_template = None;

    let uri = skolemizer.build_with_template(&Resource::new(&graph, node), &routing_only).unwrap();
    assert_eq!(uri, NamedNode::new("http://example.org/posts/first%20post").unwrap());
}
