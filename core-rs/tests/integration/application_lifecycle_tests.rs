//! Integration tests for the application lifecycle
//!
//! Covers configuration loading, startup failures, sitemap caching and
//! reloading after ontology files change on disk.

use ldt_processor::{Application, ProcessorConfig, ProcessorError, SparqlQuery};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const ONTOLOGY: &str = "http://ex/sitemap#";

fn sitemap_ttl(path: &str) -> String {
    format!(
        r#"
        @prefix ldt:  <https://www.w3.org/ns/ldt#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        @prefix owl:  <http://www.w3.org/2002/07/owl#> .

        <http://ex/sitemap#> a owl:Ontology .

        <http://ex/sitemap#Page> a ldt:Template ;
            ldt:path "{}" ;
            rdfs:isDefinedBy <http://ex/sitemap#> .
        "#,
        path
    )
}

fn write_config(dir: &Path, cache_sitemap: bool) -> std::path::PathBuf {
    fs::write(dir.join("sitemap.ttl"), sitemap_ttl("/pages/{id}")).unwrap();

    let config = ProcessorConfig {
        cache_sitemap,
        ..ProcessorConfig::new(ONTOLOGY, "http://ex/")
            .with_location(ONTOLOGY, "sitemap.ttl")
            .with_queries(SparqlQuery::templates().as_str(), SparqlQuery::restrictions().as_str())
    };
    let config_path = dir.join("ldt.yaml");
    fs::write(&config_path, serde_yaml::to_string(&config).unwrap()).unwrap();
    config_path
}

/// Test: A written configuration loads back with resolved locations
#[test]
fn test_config_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), true);

    let app = Application::from_config_file(&config_path).unwrap();
    assert_eq!(app.config().ontology, ONTOLOGY);
    assert_eq!(app.config().location_mapping[ONTOLOGY], temp_dir.path().join("sitemap.ttl"));
    assert!(app.library().is_loaded(ONTOLOGY));
}

/// Test: Missing query definitions fail at startup
#[test]
fn test_missing_queries_are_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("sitemap.ttl"), sitemap_ttl("/")).unwrap();
    let config = ProcessorConfig::new(ONTOLOGY, "http://ex/").with_location(ONTOLOGY, temp_dir.path().join("sitemap.ttl"));

    let err = Application::new(config).err().unwrap();
    assert!(err.is_configuration());
}

/// Test: An unmapped root ontology cannot be loaded
#[test]
fn test_unmapped_root_ontology() {
    let config = ProcessorConfig::new(ONTOLOGY, "http://ex/")
        .with_queries(SparqlQuery::templates().as_str(), SparqlQuery::restrictions().as_str());
    assert!(matches!(Application::new(config), Err(ProcessorError::Load(_))));
}

/// Test: The cached sitemap is shared until it is invalidated
#[test]
fn test_cached_sitemap_shared() {
    let temp_dir = TempDir::new().unwrap();
    let app = Application::from_config_file(write_config(temp_dir.path(), true)).unwrap();

    let first = app.sitemap().unwrap();
    let second = app.sitemap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(app.cache().len(), 1);

    assert!(app.cache().invalidate(ONTOLOGY));
    let third = app.sitemap().unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}

/// Test: Disabled caching rebuilds the sitemap every time
#[test]
fn test_uncached_sitemap_rebuilt() {
    let temp_dir = TempDir::new().unwrap();
    let app = Application::from_config_file(write_config(temp_dir.path(), false)).unwrap();

    let first = app.sitemap().unwrap();
    let second = app.sitemap().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(app.cache().is_empty());
}

/// Test: Reload picks up changed ontology files
#[test]
fn test_reload_after_ontology_change() {
    let temp_dir = TempDir::new().unwrap();
    let app = Application::from_config_file(write_config(temp_dir.path(), true)).unwrap();

    assert!(app.match_uri("http://ex/pages/1").unwrap().is_some());
    assert!(app.match_uri("http://ex/docs/1").unwrap().is_none());

    fs::write(temp_dir.path().join("sitemap.ttl"), sitemap_ttl("/docs/{id}")).unwrap();
    // the cached snapshot is still served
    assert!(app.match_uri("http://ex/pages/1").unwrap().is_some());

    app.reload().unwrap();
    assert!(app.match_uri("http://ex/pages/1").unwrap().is_none());
    assert!(app.match_uri("http://ex/docs/1").unwrap().is_some());
}
