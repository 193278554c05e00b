//! Document rewriting through the public API

use pretty_assertions::assert_eq;
use rust_pbir::document::{DocumentRewriter, RewriteOutcome};
use rust_pbir::mapping::{RenameMaps, RenameRule};
use serde_json::{json, Value};

fn maps(rules: &[(&str, &str, &str, &str)]) -> RenameMaps {
    let rules: Vec<RenameRule> = rules
        .iter()
        .map(|(a, b, c, d)| RenameRule::from_cells(a, b, c, d))
        .collect();
    RenameMaps::resolve(&rules)
}

fn visual(entity: &str, property: &str) -> Value {
    json!({
        "name": "v1",
        "visual": {
            "visualType": "tableEx",
            "query": { "queryState": { "Values": { "projections": [{
                "field": { "Column": {
                    "Expression": { "SourceRef": { "Entity": entity } },
                    "Property": property
                } },
                "queryRef": "ref"
            }] } } }
        }
    })
}

#[test]
fn test_visual_rewrite() {
    let maps = maps(&[("Customer", "Cust Name", "Customers", "Customer Name")]);
    let mut tree = visual("Customer", "Cust Name");

    let outcome = DocumentRewriter::new(&maps).rewrite(&mut tree);

    assert_eq!(tree, visual("Customers", "Customer Name"));
    assert_eq!(
        outcome,
        RewriteOutcome {
            entities: true,
            properties: true
        }
    );
}

#[test]
fn test_column_of_other_table_untouched() {
    let maps = maps(&[("Customer", "Cust Name", "", "Customer Name")]);
    let mut tree = visual("Supplier", "Cust Name");

    let outcome = DocumentRewriter::new(&maps).rewrite(&mut tree);

    assert!(!outcome.changed());
    assert_eq!(tree, visual("Supplier", "Cust Name"));
}

#[test]
fn test_passes_can_run_separately() {
    let maps = maps(&[("Customer", "Cust Name", "Customers", "Customer Name")]);
    let rewriter = DocumentRewriter::new(&maps);
    let mut tree = visual("Customer", "Cust Name");

    assert!(!rewriter.rewrite_properties(&mut tree));
    assert!(rewriter.rewrite_entities(&mut tree));
    assert!(rewriter.rewrite_properties(&mut tree));
    assert_eq!(tree, visual("Customers", "Customer Name"));
}

#[test]
fn test_key_order_survives_rewrite() {
    let maps = maps(&[("Customer", "", "Customers", "")]);
    let mut tree: Value =
        serde_json::from_str(r#"{"z": 1, "Entity": "Customer", "a": 2.50, "m": [3]}"#).unwrap();

    DocumentRewriter::new(&maps).rewrite(&mut tree);

    assert_eq!(
        serde_json::to_string(&tree).unwrap(),
        r#"{"z":1,"Entity":"Customers","a":2.50,"m":[3]}"#
    );
}
