//! Degenerate dimension tests: multi-dataset level attributes and model
//! membership.

use crate::common::*;

const PATH: &str = "dimensions/order_status.yml";

const RETURNS: &str = r#"
object_type: dataset
unique_name: returns
connection_id: warehouse
columns:
  - name: order_id
    data_type: bigint
  - name: status
    data_type: varchar
  - name: status_code
    data_type: int
  - name: return_date
    data_type: date
"#;

const ORDER_STATUS: &str = r#"
object_type: dimension
unique_name: order_status
is_degenerate: true
level_attributes:
  - unique_name: status
    shared_degenerate_columns:
      - dataset: orders
        key_columns: [status]
        name_column: status
      - dataset: returns
        key_columns: [status]
        name_column: status
hierarchies:
  - unique_name: status
    levels:
      - unique_name: status
"#;

fn repository(dimension: &str) -> Vec<sml_validator::SmlDocument> {
    let model = SALES.replace("metrics:", "dimensions: [order_status]\nmetrics:");
    let mut documents = sales_repository_with("models/sales.yml", &model);
    documents.push(doc("datasets/returns.yml", RETURNS));
    documents.push(doc(PATH, dimension));
    documents
}

#[test]
fn degenerate_dimension_in_model_is_clean() {
    let outcome = validate(&repository(ORDER_STATUS));
    assert_clean(&outcome);
}

#[test]
fn shared_column_types_must_agree_per_role() {
    let dimension = ORDER_STATUS.replacen(
        "      - dataset: returns\n        key_columns: [status]\n        name_column: status",
        "      - dataset: returns\n        key_columns: [status_code]\n        name_column: status",
        1,
    );
    let outcome = validate(&repository(&dimension));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["key column #1 of level attribute \"status\" has different data types across datasets: orders.status (string), returns.status_code (integer)"]
    );
}

#[test]
fn sort_columns_for_all_or_none() {
    let dimension = ORDER_STATUS.replacen(
        "        key_columns: [status]\n        name_column: status\n",
        "        key_columns: [status]\n        name_column: status\n        sort_column: status\n",
        1,
    );
    let outcome = validate(&repository(&dimension));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["sort column of level attribute \"status\" must be set for all or none of its datasets (1 of 2)"]
    );
}

#[test]
fn mixed_level_attribute_shapes() {
    let dimension = format!(
        "{ORDER_STATUS}  - unique_name: by_order\n    levels:\n      - unique_name: order\n"
    )
    .replace(
        "level_attributes:\n",
        "level_attributes:\n  - unique_name: order\n    dataset: orders\n    key_columns: [order_id]\n    name_column: order_id\n",
    );
    let outcome = validate(&repository(&dimension));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["dimension \"order_status\" mixes single-dataset level attributes [order] with multi-dataset level attributes [status]"]
    );
}

#[test]
fn dataset_missing_from_some_shared_attributes_warns() {
    let dimension = ORDER_STATUS.replace(
        "hierarchies:",
        "  - unique_name: return_day\n    shared_degenerate_columns:\n      - dataset: returns\n        key_columns: [return_date]\n        name_column: return_date\nhierarchies:",
    );
    let outcome = validate(&repository(&dimension));
    assert!(errors_in(&outcome, PATH).is_empty());
    assert_eq!(
        warnings_in(&outcome, PATH),
        ["dataset \"orders\" is used by 1 of 2 multi-dataset level attributes of dimension \"order_status\""]
    );
}

#[test]
fn secondary_attributes_not_allowed_on_shared_levels() {
    let dimension = format!(
        "{ORDER_STATUS}        secondary_attributes:\n          - unique_name: status_name\n            dataset: orders\n            key_columns: [status]\n            name_column: status\n"
    );
    let outcome = validate(&repository(&dimension));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["secondary attribute \"status_name\" cannot be attached to multi-dataset level attribute \"status\""]
    );
}

#[test]
fn model_dimensions_must_be_degenerate() {
    let model = SALES.replace("metrics:", "dimensions: [customer]\nmetrics:");
    let outcome = validate(&sales_repository_with("models/sales.yml", &model));
    let errors = errors_in(&outcome, "models/sales.yml");
    assert_eq!(errors.len(), 1, "{errors:#?}");
    assert!(errors[0].starts_with(
        "dimension \"customer\" is listed in the dimensions of model \"sales\" and must be degenerate"
    ));
}

#[test]
fn relationships_must_not_reach_degenerate_dimensions() {
    let dimension = ORDER_STATUS;
    let model = SALES.replace(
        "metrics:",
        r#"  - unique_name: order_status
    from:
      dataset: orders
      join_columns: [status]
    to:
      dimension: order_status
      level: status
metrics:"#,
    );
    let mut documents = sales_repository_with("models/sales.yml", &model);
    documents.push(doc("datasets/returns.yml", RETURNS));
    documents.push(doc(PATH, dimension));

    let outcome = validate(&documents);
    let errors = errors_in(&outcome, "models/sales.yml");
    assert_eq!(errors.len(), 1, "{errors:#?}");
    assert!(errors[0].starts_with(
        "dimension \"order_status\" is reached through relationship \"order_status\" and must not be degenerate"
    ));
}
