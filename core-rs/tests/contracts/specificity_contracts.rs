//! Contract tests for template specificity and path matching
//!
//! These tests pin the ordering and shadowing rules request routing relies
//! on; they must hold for any catalog.

use ldt_processor::ontology::{Ontology, Sitemap, Template};
use ldt_processor::template::{more_specific, UriTemplate};
use ldt_processor::TemplateMatcher;

const O: &str = "http://ex/o#";
const O2: &str = "http://ex/o2#";

fn t(s: &str) -> UriTemplate {
    UriTemplate::new(s).unwrap()
}

fn template(class: &str, path: &str) -> Template {
    Template::new(class).with_path(path).unwrap()
}

fn rotations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    (0..items.len())
        .map(|shift| {
            let mut rotated = items.to_vec();
            rotated.rotate_left(shift);
            rotated
        })
        .collect()
}

/// Contract: Ordering is total and never depends on enumeration order
#[test]
fn contract_order_independent_of_enumeration() {
    let templates = vec![
        t("/{path: .*}"),
        t("/posts/{id}"),
        t("/posts/new"),
        t("/posts/{id}/comments/{cid}"),
        t("/{a}/{b}"),
        t("/{b}/{a}"),
        t("/"),
    ];

    let mut expected = templates.clone();
    expected.sort();

    for mut order in rotations(&templates) {
        order.reverse();
        order.sort();
        assert_eq!(order, expected);
    }
    for mut order in rotations(&templates) {
        order.sort();
        assert_eq!(order, expected);
    }
}

/// Contract: Literal characters, then variable count, then lexicographic order
#[test]
fn contract_specificity_keys() {
    assert!(more_specific(&t("/posts/new"), &t("/posts/{id}")));
    assert!(more_specific(&t("/{a}/"), &t("/{a}{b}/")));
    assert!(more_specific(&t("/{a}/{b}"), &t("/{b}/{a}")));
    assert!(!more_specific(&t("/{a}"), &t("/{a}")));
}

/// Contract: The matched template does not depend on declaration order
#[test]
fn contract_match_independent_of_declaration_order() {
    let declared = vec![
        template("http://ex/o#Any", "/{path: .*}"),
        template("http://ex/o#Post", "/posts/{id}"),
        template("http://ex/o#NewPost", "/posts/new"),
    ];

    for order in rotations(&declared) {
        let mut ontology = Ontology::new(O);
        for template in order {
            ontology.add_template(template);
        }
        let sitemap = Sitemap::new(O).with_ontology(ontology);
        let matcher = TemplateMatcher::new(&sitemap);

        assert_eq!(matcher.match_path(O, "/posts/new").unwrap().unwrap().class, "http://ex/o#NewPost");
        assert_eq!(matcher.match_path(O, "/posts/1").unwrap().unwrap().class, "http://ex/o#Post");
        assert_eq!(matcher.match_path(O, "/x/y").unwrap().unwrap().class, "http://ex/o#Any");
    }
}

/// Contract: An ontology's own match shadows its imports' matches
#[test]
fn contract_import_shadowing() {
    let sitemap = Sitemap::new(O)
        .with_ontology(Ontology::new(O).with_import(O2).with_template(template("http://ex/o#Item", "/{id}")))
        .with_ontology(Ontology::new(O2).with_template(template("http://ex/o2#Item", "/item")));
    let matcher = TemplateMatcher::new(&sitemap);

    // O2's template is more specific but never consulted
    assert_eq!(matcher.match_path(O, "/item").unwrap().unwrap().class, "http://ex/o#Item");
    // matching O2 directly still finds its own template
    assert_eq!(matcher.match_path(O2, "/item").unwrap().unwrap().class, "http://ex/o2#Item");
}

/// Contract: No match anywhere is `None`, not an error
#[test]
fn contract_no_match_is_none() {
    let sitemap = Sitemap::new(O)
        .with_ontology(Ontology::new(O).with_import(O2).with_template(template("http://ex/o#Post", "/posts/{id}")))
        .with_ontology(Ontology::new(O2).with_template(template("http://ex/o2#Doc", "/docs/{id}")));
    let matcher = TemplateMatcher::new(&sitemap);

    assert!(matcher.match_path(O, "/comments/1").unwrap().is_none());
    assert!(matcher.match_templates(O, "/comments/1").unwrap().is_empty());
}
