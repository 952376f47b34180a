//! Composite model tests.

use sml_validator::SmlDocument;

use crate::common::*;

const PATH: &str = "models/all_sales.yml";

const REFUNDS: &str = r#"
object_type: metric
unique_name: refunds
dataset: orders
column: amount
calculation_method: sum
"#;

fn returns_model(relationships: &str, metrics: &str) -> String {
    format!(
        r#"
object_type: model
unique_name: returns
relationships:
{relationships}metrics:
{metrics}"#
    )
}

const CUSTOMER_RELATIONSHIP: &str = r#"  - unique_name: refund_customer
    from:
      dataset: orders
      join_columns: [customer_id]
    to:
      dimension: customer
      level: customer
"#;

const DATE_RELATIONSHIP: &str = r#"  - unique_name: refund_date
    from:
      dataset: orders
      join_columns: [order_date]
    to:
      dimension: order_calendar
      level: order_day
"#;

fn repository(returns: &str, composite: &str) -> Vec<SmlDocument> {
    let mut documents = sales_repository();
    documents.push(doc("metrics/refunds.yml", REFUNDS));
    documents.push(doc("models/returns.yml", returns));
    documents.push(doc(PATH, composite));
    documents
}

const COMPOSITE: &str = r#"
object_type: composite_model
unique_name: all_sales
models: [sales, returns]
"#;

#[test]
fn composite_with_shared_dimension_is_clean() {
    let returns = returns_model(CUSTOMER_RELATIONSHIP, "  - unique_name: refunds\n");
    let outcome = validate(&repository(&returns, COMPOSITE));
    assert_clean(&outcome);
}

#[test]
fn dependency_models_need_a_common_dimension() {
    let returns = returns_model(CUSTOMER_RELATIONSHIP, "  - unique_name: refunds\n");
    let sales_only_dates = SALES.replacen(
        r#"  - unique_name: order_customer
    from:
      dataset: orders
      join_columns: [customer_id]
    to:
      dimension: customer
      level: customer
"#,
        "",
        1,
    );
    let mut documents = repository(&returns, COMPOSITE);
    documents.retain(|d| d.source_path != "models/sales.yml");
    documents.push(doc("models/sales.yml", &sales_only_dates));

    let outcome = validate(&documents);
    let errors = errors_in(&outcome, PATH);
    assert_eq!(errors.len(), 1, "{errors:#?}");
    assert!(errors[0].starts_with("dependency models don't have a common dimension"));
}

#[test]
fn metric_from_two_contributors_is_duplicate() {
    let returns = returns_model(
        &[CUSTOMER_RELATIONSHIP, DATE_RELATIONSHIP].concat(),
        "  - unique_name: refunds\n  - unique_name: revenue\n",
    );
    let composite = format!("{COMPOSITE}metrics:\n  - unique_name: order_count\n");
    let outcome = validate(&repository(&returns, &composite));
    assert_eq!(
        errors_in(&outcome, PATH),
        [
            "Duplicate metric (2 definitions): \"order_count\" in composite model \"all_sales\" (from sales, all_sales)",
            "Duplicate metric (2 definitions): \"revenue\" in composite model \"all_sales\" (from sales, returns)",
        ]
    );
}

#[test]
fn query_names_collide_across_dependency_models() {
    let returns = format!(
        "{}overrides:\n  refunds:\n    query_name: Revenue\n",
        returns_model(CUSTOMER_RELATIONSHIP, "  - unique_name: refunds\n")
    );
    let outcome = validate(&repository(&returns, COMPOSITE));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["query name \"revenue\" is used by more than one object in \"all_sales\": metric \"revenue\", metric \"refunds\""]
    );
    // Each model on its own is fine.
    assert!(errors_in(&outcome, "models/returns.yml").is_empty());
}

#[test]
fn unknown_dependency_model() {
    let composite = COMPOSITE.replace("[sales, returns]", "[sales, refunds_model]");
    let returns = returns_model(CUSTOMER_RELATIONSHIP, "  - unique_name: refunds\n");
    let outcome = validate(&repository(&returns, &composite));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["model \"refunds_model\" does not exist"]
    );
}

const ORDER_STATUS: &str = r#"
object_type: dimension
unique_name: order_status
is_degenerate: true
level_attributes:
  - unique_name: status
    dataset: orders
    key_columns: [status]
    name_column: status
hierarchies:
  - unique_name: status
    levels:
      - unique_name: status
"#;

#[test]
fn degenerate_dimension_from_two_contributors_is_duplicate() {
    let with_status = |model: &str| model.replacen("metrics:", "dimensions: [order_status]\nmetrics:", 1);
    let returns = with_status(&returns_model(CUSTOMER_RELATIONSHIP, "  - unique_name: refunds\n"));
    let mut documents = repository(&returns, COMPOSITE);
    documents.retain(|d| d.source_path != "models/sales.yml");
    documents.push(doc("models/sales.yml", &with_status(SALES)));
    documents.push(doc("dimensions/order_status.yml", ORDER_STATUS));

    let outcome = validate(&documents);
    assert!(errors_in(&outcome, "models/sales.yml").is_empty());
    assert_eq!(
        errors_in(&outcome, PATH),
        ["Duplicate dimension (2 definitions): \"order_status\" in composite model \"all_sales\" (from sales, returns)"]
    );
}
