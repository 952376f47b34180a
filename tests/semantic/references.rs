//! Reference resolution and unused-object tests.

use crate::common::*;

#[test]
fn sales_repository_is_clean() {
    let outcome = validate(&sales_repository());
    assert_clean(&outcome);
}

#[test]
fn unknown_dataset_reference() {
    let documents = sales_repository_with(
        "metrics/revenue.yml",
        r#"
object_type: metric
unique_name: revenue
dataset: order_lines
column: amount
calculation_method: sum
"#,
    );
    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "metrics/revenue.yml"),
        ["dataset \"order_lines\" does not exist"]
    );
}

#[test]
fn reference_to_wrong_kind() {
    let documents = sales_repository_with(
        "metrics/revenue.yml",
        r#"
object_type: metric
unique_name: revenue
dataset: customer
column: amount
calculation_method: sum
"#,
    );
    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "metrics/revenue.yml"),
        ["Incorrect dataset reference. dataset \"customer\" points to dimension"]
    );
}

#[test]
fn model_metric_may_be_calculated() {
    let mut documents = sales_repository_with(
        "models/sales.yml",
        &SALES.replace(
            "  - unique_name: order_count\n",
            "  - unique_name: order_count\n  - unique_name: average_order\n",
        ),
    );
    documents.push(doc(
        "metrics/average_order.yml",
        r#"
object_type: metric_calc
unique_name: average_order
expression: "[Measures].[revenue] / [Measures].[order_count]"
format: standard
"#,
    ));
    let outcome = validate(&documents);
    assert_clean(&outcome);
}

#[test]
fn model_metric_pointing_at_dataset_names_metric_kind() {
    let documents = sales_repository_with(
        "models/sales.yml",
        &SALES.replace("unique_name: order_count", "unique_name: customers"),
    );
    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "models/sales.yml"),
        ["Incorrect metric reference. metric \"customers\" points to dataset"]
    );
}

#[test]
fn unused_dataset_warns_once() {
    let mut documents = sales_repository();
    documents.push(doc(
        "datasets/returns.yml",
        r#"
object_type: dataset
unique_name: returns
connection_id: warehouse
columns:
  - name: order_id
    data_type: int
"#,
    ));
    let outcome = validate(&documents);
    assert!(!outcome.has_errors());
    assert_eq!(
        warnings_in(&outcome, "datasets/returns.yml"),
        ["file not in use: dataset \"returns\" is not referenced by any object"]
    );
    assert_eq!(outcome.warnings().count(), 1);
}

#[test]
fn unused_roots_do_not_warn() {
    let mut documents = sales_repository();
    documents.push(doc(
        "models/empty.yml",
        "object_type: model\nunique_name: empty_model",
    ));
    documents.push(doc(
        "catalog.yml",
        "object_type: catalog\nunique_name: sales_catalog\nversion: 1.0",
    ));
    documents.push(doc(
        "settings/model.yml",
        "object_type: model_settings\nunique_name: model_settings",
    ));
    let outcome = validate(&documents);
    assert_clean(&outcome);
}

#[test]
fn failed_reference_does_not_count_as_use() {
    // The metric points at the connection by mistake; the connection stays
    // referenced by the datasets, the unused metric is still reported.
    let mut documents = sales_repository();
    documents.push(doc(
        "metrics/margin.yml",
        r#"
object_type: metric
unique_name: margin
dataset: warehouse
column: amount
calculation_method: sum
"#,
    ));
    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "metrics/margin.yml"),
        ["Incorrect dataset reference. dataset \"warehouse\" points to connection"]
    );
    assert_eq!(
        warnings_in(&outcome, "metrics/margin.yml"),
        ["file not in use: metric \"margin\" is not referenced by any object"]
    );
}

#[test]
fn unused_warnings_can_be_disabled() {
    let mut documents = sales_repository();
    documents.push(doc(
        "connections/legacy.yml",
        "object_type: connection\nunique_name: legacy",
    ));
    let outcome = sml_validator::SemanticValidator::new()
        .with_unused_warnings(false)
        .validate(&documents);
    assert_clean(&outcome);
}
