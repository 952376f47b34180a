//! Composite model validation.
//!
//! A composite model publishes the union of its dependency models plus its
//! own metrics. Metric names, degenerate dimension names and query names
//! must stay unique across that union, and the dependency models must be
//! joinable through at least one shared dimension.

use std::collections::{BTreeSet, HashSet};

use super::model_validation::{QueryNameEntry, check_query_names, validate_metrics};
use super::resolver::Resolver;
use super::{duplicate_groups, group_by_key};
use crate::model::{CompositeModel, Model};
use crate::semantic::diag::{SmlDiagBuilder, SmlDiagKind};

pub(super) fn validate_composite_model(resolver: &mut Resolver<'_, '_>, composite: &CompositeModel) {
    let models: Vec<&Model> = composite
        .models
        .iter()
        .filter_map(|name| resolver.model(name))
        .collect();
    for (model, count) in duplicate_groups(composite.models.iter().map(|m| (m, m))) {
        resolver.report(SmlDiagBuilder::duplicate(
            "model",
            count,
            format!("\"{model}\" in composite model \"{}\"", composite.unique_name),
        ));
    }
    validate_metrics(resolver, &composite.metrics, &composite.unique_name);

    check_contributors(resolver, composite, &models);

    let mut entries = Vec::new();
    for model in &models {
        entries.extend(model.metrics.iter().map(|m| QueryNameEntry {
            kind: "metric",
            unique_name: &m.unique_name,
            query_name: model.query_name(&m.unique_name),
        }));
        entries.extend(model.dimensions.iter().map(|d| QueryNameEntry {
            kind: "dimension",
            unique_name: d,
            query_name: model.query_name(d),
        }));
    }
    entries.extend(composite.metrics.iter().map(|m| QueryNameEntry {
        kind: "metric",
        unique_name: &m.unique_name,
        query_name: &m.unique_name,
    }));
    check_query_names(resolver, &composite.unique_name, entries);

    check_common_dimension(resolver, composite, &models);
}

/// A metric or degenerate dimension may come from only one dependency model
/// or from the composite itself.
fn check_contributors(
    resolver: &mut Resolver<'_, '_>,
    composite: &CompositeModel,
    models: &[&Model],
) {
    let mut metrics = Vec::new();
    let mut dimensions = Vec::new();
    for model in models {
        let source = model.unique_name.as_str();
        metrics.extend(model.metrics.iter().map(|m| (m.unique_name.as_str(), source)));
        dimensions.extend(model.dimensions.iter().map(|d| (d.as_str(), source)));
    }
    let source = composite.unique_name.as_str();
    metrics.extend(composite.metrics.iter().map(|m| (m.unique_name.as_str(), source)));

    report_contributors(resolver, composite, "metric", metrics);
    report_contributors(resolver, composite, "dimension", dimensions);
}

fn report_contributors(
    resolver: &mut Resolver<'_, '_>,
    composite: &CompositeModel,
    what: &str,
    contributions: Vec<(&str, &str)>,
) {
    // Repeats within one contributor are reported by that contributor.
    let mut seen = HashSet::new();
    let unique = contributions
        .into_iter()
        .filter(|contribution| seen.insert(*contribution));
    let groups = group_by_key(unique.map(|contribution| (contribution.0, contribution)));

    for group in groups.into_iter().filter(|g| g.len() > 1) {
        let (name, _) = group[0];
        let sources = group
            .iter()
            .map(|(_, source)| *source)
            .collect::<Vec<_>>()
            .join(", ");
        resolver.report(SmlDiagBuilder::duplicate(
            what,
            group.len(),
            format!(
                "\"{name}\" in composite model \"{}\" (from {sources})",
                composite.unique_name
            ),
        ));
    }
}

fn check_common_dimension(
    resolver: &mut Resolver<'_, '_>,
    composite: &CompositeModel,
    models: &[&Model],
) {
    if models.len() < 2 {
        return;
    }
    let mut common: Option<BTreeSet<&str>> = None;
    for model in models {
        let dimensions: BTreeSet<&str> = model
            .relationship_dimensions()
            .map(|d| d.as_str())
            .collect();
        common = Some(match common {
            Some(common) => common.intersection(&dimensions).copied().collect(),
            None => dimensions,
        });
    }
    if common.is_some_and(|common| common.is_empty()) {
        resolver.report(
            SmlDiagBuilder::new(
                SmlDiagKind::CompositeModel,
                format!(
                    "dependency models don't have a common dimension in composite model \"{}\"",
                    composite.unique_name
                ),
            )
            .with_note(format!(
                "dependency models: {}",
                models
                    .iter()
                    .map(|m| m.unique_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        );
    }
}
