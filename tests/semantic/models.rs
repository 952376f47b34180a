//! Model validation tests: metrics, overrides, query names, aggregates and
//! drillthroughs.

use sml_validator::{DiagSeverity, SemanticValidator};

use crate::common::*;

const PATH: &str = "models/sales.yml";

fn sales_with(extra: &str) -> String {
    format!("{SALES}{extra}")
}

#[test]
fn duplicate_metrics_in_model() {
    let model = SALES.replace(
        "  - unique_name: order_count\n",
        "  - unique_name: order_count\n  - unique_name: revenue\n",
    );
    let outcome = validate(&sales_repository_with(PATH, &model));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["Duplicate metric (2 definitions): \"revenue\" in \"sales\""]
    );
}

#[test]
fn applied_overrides_are_reported_as_info() {
    let model = sales_with(
        r#"
overrides:
  revenue:
    query_name: Total Revenue
"#,
    );
    let documents = sales_repository_with(PATH, &model);
    let outcome = validate(&documents);
    assert!(!outcome.has_errors());
    assert_eq!(
        infos_in(&outcome, PATH),
        ["\"revenue\" is published as \"Total Revenue\" in model \"sales\""]
    );
    assert_eq!(outcome.diagnostics[0].severity, DiagSeverity::Info);

    let quiet = SemanticValidator::new()
        .with_override_reports(false)
        .validate(&documents);
    assert_clean(&quiet);
}

#[test]
fn override_must_name_model_member() {
    let model = sales_with(
        r#"
overrides:
  profit:
    query_name: Profit
"#,
    );
    let outcome = validate(&sales_repository_with(PATH, &model));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["override \"profit\" does not name a metric or degenerate dimension of model \"sales\""]
    );
}

#[test]
fn query_names_collide_case_insensitively() {
    let model = sales_with(
        r#"
overrides:
  order_count:
    query_name: REVENUE
"#,
    );
    let outcome = validate(&sales_repository_with(PATH, &model));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["query name \"revenue\" is used by more than one object in \"sales\": metric \"revenue\", metric \"order_count\""]
    );
}

#[test]
fn aggregates_and_drillthroughs() {
    let model = sales_with(
        r#"
aggregates:
  - unique_name: revenue_by_customer
    metrics: [revenue, refunds]
    attributes:
      - name: customer
        dimension: customer
      - name: signup
        dimension: customer
        relationships_path: [order_customer]
  - unique_name: revenue_by_customer
    metrics: [revenue]
drillthroughs:
  - unique_name: order_details
    metrics: [order_count]
    attributes:
      - name: loyalty_tier
        dimension: customer
      - name: order_day
        dimension: order_calendar
        relationships_path: [order_shipping]
"#,
    );
    let outcome = validate(&sales_repository_with(PATH, &model));
    assert_eq!(
        errors_in(&outcome, PATH),
        [
            "Duplicate aggregate (2 definitions): \"revenue_by_customer\" in model \"sales\"",
            "attribute \"loyalty_tier\" does not exist in \"customer\"",
            "metric \"refunds\" does not exist in \"sales\"",
            "relationship \"order_shipping\" does not exist in \"sales\"",
        ]
    );
}

#[test]
fn attribute_paths_may_use_embedded_relationships() {
    let customer = r#"
object_type: dimension
unique_name: customer
level_attributes:
  - unique_name: customer
    dataset: customers
    key_columns: [customer_id]
    name_column: customer_name
hierarchies:
  - unique_name: customers
    levels:
      - unique_name: customer
relationships:
  - unique_name: customer_signup
    from:
      dataset: customers
      join_columns: [signup_date]
      hierarchy: customers
      level: customer
    to:
      dimension: order_calendar
      level: order_day
"#;
    let model = sales_with(
        r#"
drillthroughs:
  - unique_name: signup_details
    metrics: [order_count]
    attributes:
      - name: order_day
        dimension: order_calendar
        relationships_path: [order_customer, customer_signup]
"#,
    );
    let mut documents = sales_repository_with(PATH, &model);
    documents.retain(|d| d.source_path != "dimensions/customer.yml");
    documents.push(doc("dimensions/customer.yml", customer));

    let outcome = validate(&documents);
    assert_clean(&outcome);
}
