//! Relationship validation tests: endpoints, key arity, duplicates,
//! embedded and snowflake relationships.

use crate::common::*;

fn model_with_relationships(relationships: &str) -> String {
    format!(
        r#"
object_type: model
unique_name: sales
relationships:
{relationships}
metrics:
  - unique_name: revenue
  - unique_name: order_count
"#
    )
}

fn relationship(name: &str, columns: &str, dimension: &str, level: &str) -> String {
    format!(
        r#"  - unique_name: {name}
    from:
      dataset: orders
      join_columns: [{columns}]
    to:
      dimension: {dimension}
      level: {level}
"#
    )
}

#[test]
fn duplicate_relationship_groups_report_counts() {
    let relationships = [
        relationship("customer_a", "customer_id", "customer", "customer"),
        relationship("date_a", "order_date", "order_calendar", "order_day"),
        relationship("customer_b", "customer_id", "customer", "customer"),
        relationship("date_b", "order_date", "order_calendar", "order_day"),
        relationship("customer_c", "customer_id", "customer", "customer"),
    ]
    .concat();
    let documents =
        sales_repository_with("models/sales.yml", &model_with_relationships(&relationships));

    let outcome = validate(&documents);
    let errors = errors_in(&outcome, "models/sales.yml");
    assert_eq!(
        errors,
        [
            "Duplicate relationship (2 definitions): from {dataset: orders, join_columns: [order_date]} to {dimension: order_calendar, level: order_day}",
            "Duplicate relationship (3 definitions): from {dataset: orders, join_columns: [customer_id]} to {dimension: customer, level: customer}",
        ]
    );
}

#[test]
fn duplicate_relationship_names() {
    let relationships = [
        relationship("order_customer", "customer_id", "customer", "customer"),
        relationship("order_customer", "order_date", "order_calendar", "order_day"),
    ]
    .concat();
    let documents =
        sales_repository_with("models/sales.yml", &model_with_relationships(&relationships));

    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "models/sales.yml"),
        ["Duplicate relationship unique_name (2 definitions): \"order_customer\""]
    );
}

#[test]
fn join_key_arity_must_match_level() {
    let relationships = [
        relationship("order_customer", "customer_id, order_id", "customer", "customer"),
        relationship("order_date", "order_date", "order_calendar", "order_day"),
    ]
    .concat();
    let documents =
        sales_repository_with("models/sales.yml", &model_with_relationships(&relationships));

    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "models/sales.yml"),
        ["relationship \"order_customer\" joins on 2 column(s) but level \"customer\" has 1 key column(s)"]
    );
}

#[test]
fn missing_join_column_and_level() {
    let relationships = [
        relationship("order_customer", "client_id", "customer", "customer"),
        relationship("order_date", "order_date", "order_calendar", "order_week"),
    ]
    .concat();
    let documents =
        sales_repository_with("models/sales.yml", &model_with_relationships(&relationships));

    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "models/sales.yml"),
        [
            "Non-existing column \"client_id\" in dataset \"orders\"",
            "level \"order_week\" does not exist in \"order_calendar\"",
        ]
    );
}

#[test]
fn detached_relationships_warn_and_skip_checks() {
    let relationships = r#"  - unique_name: order_customer
    from:
      join_columns: [customer_id]
    to:
      dimension: customer
      level: customer
  - unique_name: order_date
    from:
      dataset: orders
      join_columns: [order_date, order_id]
    to:
      level: order_day
"#;
    let documents =
        sales_repository_with("models/sales.yml", &model_with_relationships(relationships));

    let outcome = validate(&documents);
    assert!(errors_in(&outcome, "models/sales.yml").is_empty());
    assert_eq!(
        warnings_in(&outcome, "models/sales.yml"),
        [
            "detached relationship \"order_customer\": dataset is not set",
            "detached relationship \"order_date\": target is not set",
        ]
    );
}

const COUNTRIES: &str = r#"
object_type: dataset
unique_name: countries
connection_id: warehouse
columns:
  - name: country_code
    data_type: string
  - name: country_name
    data_type: string
"#;

const COUNTRY: &str = r#"
object_type: dimension
unique_name: country
level_attributes:
  - unique_name: country
    dataset: countries
    key_columns: [country_code]
    name_column: country_name
hierarchies:
  - unique_name: countries
    levels:
      - unique_name: country
"#;

fn customer_with_embedded(hierarchy: &str, level: &str) -> String {
    format!(
        r#"
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
  - unique_name: customer_country
    from:
      dataset: customers
      join_columns: [country_code]
      hierarchy: {hierarchy}
      level: {level}
    to:
      dimension: country
      level: country
"#
    )
}

#[test]
fn embedded_relationship_resolves_nested_dimension() {
    let mut documents = sales_repository_with(
        "dimensions/customer.yml",
        &customer_with_embedded("customers", "customer"),
    );
    documents.push(doc("datasets/countries.yml", COUNTRIES));
    documents.push(doc("dimensions/country.yml", COUNTRY));

    let outcome = validate(&documents);
    assert_clean(&outcome);
}

#[test]
fn embedded_relationship_needs_known_hierarchy_and_level() {
    let mut documents = sales_repository_with(
        "dimensions/customer.yml",
        &customer_with_embedded("by_region", "customer"),
    );
    documents.push(doc("datasets/countries.yml", COUNTRIES));
    documents.push(doc("dimensions/country.yml", COUNTRY));
    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "dimensions/customer.yml"),
        ["hierarchy \"by_region\" does not exist in \"customer\""]
    );

    let mut documents = sales_repository_with(
        "dimensions/customer.yml",
        &customer_with_embedded("customers", "account"),
    );
    documents.push(doc("datasets/countries.yml", COUNTRIES));
    documents.push(doc("dimensions/country.yml", COUNTRY));
    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "dimensions/customer.yml"),
        ["level \"account\" does not exist in \"customers\""]
    );
}

#[test]
fn snowflake_relationship_targets_own_level() {
    let dimension = r#"
object_type: dimension
unique_name: customer
level_attributes:
  - unique_name: country
    dataset: customers
    key_columns: [country_code]
    name_column: country_code
  - unique_name: customer
    dataset: customers
    key_columns: [customer_id]
    name_column: customer_name
hierarchies:
  - unique_name: customers
    levels:
      - unique_name: country
      - unique_name: customer
relationships:
  - unique_name: customer_to_country
    from:
      dataset: customers
      join_columns: [country_code]
    to:
      dimension: customer
      level: country
  - unique_name: customer_to_region
    from:
      dataset: customers
      join_columns: [country_code]
    to:
      dimension: customer
      level: region
"#;
    let documents = sales_repository_with("dimensions/customer.yml", dimension);
    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "dimensions/customer.yml"),
        ["level \"region\" does not exist in \"customer\""]
    );
}

#[test]
fn security_relationship_resolves_row_security() {
    let relationships = [
        relationship("order_customer", "customer_id", "customer", "customer"),
        relationship("order_date", "order_date", "order_calendar", "order_day"),
        r#"  - unique_name: order_security
    from:
      dataset: orders
      join_columns: [customer_id]
    to:
      row_security: customer_rls
"#
        .to_string(),
    ]
    .concat();
    let documents =
        sales_repository_with("models/sales.yml", &model_with_relationships(&relationships));
    let outcome = validate(&documents);
    assert_eq!(
        errors_in(&outcome, "models/sales.yml"),
        ["row security \"customer_rls\" does not exist"]
    );

    let mut documents = documents;
    documents.push(doc(
        "security/customer_rls.yml",
        r#"
object_type: row_security
unique_name: customer_rls
dataset: customers
filter_key_column: customer_id
ids_column: country_code
"#,
    ));
    let outcome = validate(&documents);
    assert_clean(&outcome);
}
