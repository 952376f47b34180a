//! Model validation: relationships, metrics, degenerate dimensions,
//! aggregates, drillthroughs, and query-name overrides.

use std::collections::{HashMap, HashSet};

use smol_str::SmolStr;

use super::relationship_validation::{known_relationships, validate_model_relationships};
use super::resolver::Resolver;
use super::{duplicate_groups, group_by_key};
use crate::diag::DiagSeverity;
use crate::model::{AttributeRef, Model, ModelMetric, ObjectKind};
use crate::semantic::diag::{SmlDiagBuilder, SmlDiagKind};

/// An externally visible name contributed to a model's query namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) struct QueryNameEntry<'a> {
    pub kind: &'static str,
    pub unique_name: &'a str,
    pub query_name: &'a str,
}

pub(super) fn validate_model(resolver: &mut Resolver<'_, '_>, model: &Model) {
    validate_model_relationships(resolver, model);
    validate_metrics(resolver, &model.metrics, &model.unique_name);

    for dimension in &model.dimensions {
        if let Some(target) = resolver.dimension(dimension)
            && !target.is_degenerate
        {
            resolver.report(SmlDiagBuilder::new(
                SmlDiagKind::DegenerateMismatch,
                format!(
                    "dimension \"{dimension}\" is listed in the dimensions of model \"{}\" and must be degenerate; join regular dimensions through a relationship",
                    model.unique_name
                ),
            ));
        }
    }
    for (dimension, count) in duplicate_groups(model.dimensions.iter().map(|d| (d, d))) {
        resolver.report(SmlDiagBuilder::duplicate(
            "dimension",
            count,
            format!("\"{dimension}\" in model \"{}\"", model.unique_name),
        ));
    }

    validate_aggregates(resolver, model);
    validate_overrides(resolver, model);

    let entries = model
        .metrics
        .iter()
        .map(|m| query_entry("metric", &m.unique_name, model))
        .chain(
            model
                .dimensions
                .iter()
                .map(|d| query_entry("dimension", d, model)),
        );
    check_query_names(resolver, &model.unique_name, entries);
}

fn query_entry<'a>(kind: &'static str, unique_name: &'a str, model: &'a Model) -> QueryNameEntry<'a> {
    QueryNameEntry {
        kind,
        unique_name,
        query_name: model.query_name(unique_name),
    }
}

/// Resolves every metric of a model or composite model and reports
/// duplicates.
pub(super) fn validate_metrics(resolver: &mut Resolver<'_, '_>, metrics: &[ModelMetric], owner: &str) {
    for metric in metrics {
        resolver.resolve_any(
            &metric.unique_name,
            &[ObjectKind::Measure, ObjectKind::CalculatedMeasure],
        );
    }
    for (metric, count) in duplicate_groups(metrics.iter().map(|m| (&m.unique_name, m))) {
        resolver.report(SmlDiagBuilder::duplicate(
            "metric",
            count,
            format!("\"{}\" in \"{owner}\"", metric.unique_name),
        ));
    }
}

fn validate_aggregates(resolver: &mut Resolver<'_, '_>, model: &Model) {
    let known = known_relationships(resolver.registry(), model);

    for (aggregate, count) in duplicate_groups(
        model
            .aggregates
            .iter()
            .map(|a| (&a.unique_name, a)),
    ) {
        resolver.report(SmlDiagBuilder::duplicate(
            "aggregate",
            count,
            format!("\"{}\" in model \"{}\"", aggregate.unique_name, model.unique_name),
        ));
    }
    for (drillthrough, count) in duplicate_groups(
        model
            .drillthroughs
            .iter()
            .map(|d| (&d.unique_name, d)),
    ) {
        resolver.report(SmlDiagBuilder::duplicate(
            "drillthrough",
            count,
            format!("\"{}\" in model \"{}\"", drillthrough.unique_name, model.unique_name),
        ));
    }

    let members = model
        .aggregates
        .iter()
        .map(|a| (&a.metrics, &a.attributes))
        .chain(model.drillthroughs.iter().map(|d| (&d.metrics, &d.attributes)));
    for (metrics, attributes) in members {
        for metric in metrics {
            if !model.has_metric(metric) {
                resolver.report(SmlDiagBuilder::unknown_member(
                    "metric",
                    metric,
                    &model.unique_name,
                ));
            }
        }
        for attribute in attributes {
            check_attribute_ref(resolver, model, &known, attribute);
        }
    }
}

fn check_attribute_ref(
    resolver: &mut Resolver<'_, '_>,
    model: &Model,
    known: &HashMap<&str, Option<&SmolStr>>,
    attribute: &AttributeRef,
) {
    if let Some(dimension) = resolver.dimension(&attribute.dimension)
        && !dimension.has_attribute(&attribute.name)
    {
        resolver.report(SmlDiagBuilder::unknown_member(
            "attribute",
            &attribute.name,
            &dimension.unique_name,
        ));
    }
    for relationship in &attribute.relationships_path {
        if !known.contains_key(relationship.as_str()) {
            resolver.report(SmlDiagBuilder::unknown_member(
                "relationship",
                relationship,
                &model.unique_name,
            ));
        }
    }
}

fn validate_overrides(resolver: &mut Resolver<'_, '_>, model: &Model) {
    for (name, override_) in &model.overrides {
        if !model.has_metric(name) && !model.has_dimension(name) {
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::QueryName,
                    format!(
                        "override \"{name}\" does not name a metric or degenerate dimension of model \"{}\"",
                        model.unique_name
                    ),
                ),
            );
            continue;
        }
        if resolver.config().report_overrides {
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::QueryName,
                    format!(
                        "\"{name}\" is published as \"{}\" in model \"{}\"",
                        override_.query_name, model.unique_name
                    ),
                )
                .with_severity(DiagSeverity::Info),
            );
        }
    }
}

/// Reports query names that collide case-insensitively, one error per group.
pub(super) fn check_query_names<'a>(
    resolver: &mut Resolver<'_, '_>,
    owner: &str,
    entries: impl IntoIterator<Item = QueryNameEntry<'a>>,
) {
    let mut seen = HashSet::new();
    let unique = entries.into_iter().filter(|entry| seen.insert(*entry));
    let groups = group_by_key(unique.map(|entry| (entry.query_name.to_lowercase(), entry)));

    for group in groups.into_iter().filter(|g| g.len() > 1) {
        let members = group
            .iter()
            .map(|entry| format!("{} \"{}\"", entry.kind, entry.unique_name))
            .collect::<Vec<_>>()
            .join(", ");
        resolver.report(SmlDiagBuilder::new(
            SmlDiagKind::QueryName,
            format!(
                "query name \"{}\" is used by more than one object in \"{owner}\": {members}",
                group[0].query_name
            ),
        ));
    }
}
