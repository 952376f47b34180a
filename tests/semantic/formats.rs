//! Format and calculation-method compatibility tests.

use crate::common::*;

const PATH: &str = "metrics/status_count.yml";

fn metric(column: &str, method: &str, format: Option<&str>) -> String {
    let mut yaml = format!(
        "object_type: metric\nunique_name: status_count\ndataset: orders\ncolumn: {column}\ncalculation_method: {method}\n"
    );
    if let Some(format) = format {
        yaml.push_str(&format!("format: {format}\n"));
    }
    yaml
}

fn repository(metric: &str) -> Vec<sml_validator::SmlDocument> {
    let model = SALES.replace(
        "  - unique_name: order_count\n",
        "  - unique_name: order_count\n  - unique_name: status_count\n",
    );
    let mut documents = sales_repository_with("models/sales.yml", &model);
    documents.push(doc(PATH, metric));
    documents
}

#[test]
fn string_column_rejects_numeric_format() {
    let outcome = validate(&repository(&metric("status", "count distinct", Some("standard"))));
    let errors = errors_in(&outcome, PATH);
    assert_eq!(
        errors,
        ["inapplicable formatting \"standard\" for metric \"status_count\": string columns accept no formats; accepted formats: []"]
    );
}

#[test]
fn date_format_on_integer_column_lists_alternatives() {
    let outcome = validate(&repository(&metric("order_id", "count distinct", Some("long date"))));
    let errors = errors_in(&outcome, PATH);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0],
        "incompatible formatting \"long date\" for metric \"status_count\" of type integer; accepted formats: [general number, standard, fixed, percent, scientific, currency, yes/no, true/false, on/off]"
    );
}

#[test]
fn custom_format_strings_are_accepted() {
    let outcome = validate(&repository(&metric("amount", "sum", Some("\"#,##0.00\""))));
    assert_clean(&outcome);
}

#[test]
fn calculation_method_must_fit_column_type() {
    let outcome = validate(&repository(&metric("status", "average", None)));
    let errors = errors_in(&outcome, PATH);
    assert_eq!(
        errors,
        ["calculation method \"average\" of metric \"status_count\" is not allowed for column type string"]
    );
    let diag = outcome.errors().next().expect("method error");
    assert!(diag.notes[0].starts_with("allowed methods: count non-null"));
}

#[test]
fn missing_measure_column() {
    let outcome = validate(&repository(&metric("discount", "sum", Some("currency"))));
    assert_eq!(
        errors_in(&outcome, PATH),
        ["Non-existing column \"discount\" in dataset \"orders\""]
    );
}

#[test]
fn calculated_metrics_are_numeric() {
    let model = SALES.replace(
        "  - unique_name: order_count\n",
        "  - unique_name: order_count\n  - unique_name: margin_rate\n",
    );
    let mut documents = sales_repository_with("models/sales.yml", &model);
    documents.push(doc(
        "metrics/margin_rate.yml",
        "object_type: metric_calc\nunique_name: margin_rate\nexpression: \"[Measures].[revenue] / 100\"\nformat: short date\n",
    ));
    let outcome = validate(&documents);
    let errors = errors_in(&outcome, "metrics/margin_rate.yml");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with(
        "incompatible formatting \"short date\" for calculated metric \"margin_rate\" of type decimal"
    ));
}
