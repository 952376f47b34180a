//! Dimension validation: level attribute sources, degenerate (multi-dataset)
//! level attributes, hierarchies, secondary attributes, aliases, custom empty
//! members, and calculation groups.
//!
//! Time semantics live in `time_validation`, relationships in
//! `relationship_validation`.

use std::collections::{BTreeMap, BTreeSet};

use smol_str::SmolStr;

use super::format_validation::check_format;
use super::resolver::Resolver;
use super::{duplicate_groups, group_by_key, relationship_validation, time_validation};
use crate::diag::{DiagContext, DiagSeverity};
use crate::model::{
    ColumnSource, CustomEmptyMember, DataType, Dimension, Hierarchy, Level, LevelAttribute,
    LevelAttributeSource,
};
use crate::semantic::diag::{SmlDiagBuilder, SmlDiagKind};

/// Runs every dimension check.
pub(super) fn validate_dimension(resolver: &mut Resolver<'_, '_>, dimension: &Dimension) {
    for attribute in &dimension.level_attributes {
        let context = level_attribute_context(dimension, attribute);
        for source in attribute.column_sources() {
            check_column_source(resolver, source, &context);
        }
        check_custom_empty_member(
            resolver,
            attribute.has_sort_column(),
            attribute.custom_empty_member.as_ref(),
            &attribute.unique_name,
            context,
        );
    }

    check_level_attribute_shapes(resolver, dimension);
    for attribute in &dimension.level_attributes {
        if let LevelAttributeSource::Shared {
            shared_degenerate_columns,
        } = &attribute.source
        {
            let sources: Vec<&ColumnSource> =
                shared_degenerate_columns.iter().map(|s| &s.columns).collect();
            check_shared_column_types(resolver, dimension, attribute, &sources);
        }
    }
    check_shared_dataset_usage(resolver, dimension);
    check_duplicate_level_attributes(resolver, dimension);

    for (hierarchy, count) in duplicate_groups(
        dimension
            .hierarchies
            .iter()
            .map(|h| (&h.unique_name, h)),
    ) {
        resolver.report(SmlDiagBuilder::duplicate(
            "hierarchy",
            count,
            format!("\"{}\" in dimension \"{}\"", hierarchy.unique_name, dimension.unique_name),
        ));
    }
    for hierarchy in &dimension.hierarchies {
        for level in &hierarchy.levels {
            validate_level(resolver, dimension, hierarchy, level);
        }
    }

    time_validation::validate_time_semantics(resolver, dimension);
    check_calculation_groups(resolver, dimension);
    relationship_validation::validate_dimension_relationships(resolver, dimension);
}

fn level_attribute_context(dimension: &Dimension, attribute: &LevelAttribute) -> DiagContext {
    DiagContext::LevelAttribute {
        dimension: dimension.unique_name.clone(),
        level_attribute: attribute.unique_name.clone(),
    }
}

/// Resolves the dataset of a column source and checks its columns exist.
fn check_column_source(
    resolver: &mut Resolver<'_, '_>,
    source: &ColumnSource,
    context: &DiagContext,
) {
    let Some(dataset) = resolver.dataset(&source.dataset) else {
        return;
    };
    let columns = source
        .key_columns
        .iter()
        .chain(std::iter::once(&source.name_column))
        .chain(source.sort_column.as_ref());
    for column in columns {
        if !dataset.has_column(column) {
            resolver.report(
                SmlDiagBuilder::missing_column(column, &dataset.unique_name)
                    .with_context(context.clone()),
            );
        }
    }
}

fn check_custom_empty_member(
    resolver: &mut Resolver<'_, '_>,
    has_sort_column: bool,
    member: Option<&CustomEmptyMember>,
    owner: &str,
    context: DiagContext,
) {
    if let Some(member) = member
        && has_sort_column
        && member.sort_name.is_none()
    {
        resolver.report(
            SmlDiagBuilder::new(
                SmlDiagKind::CustomEmptyMember,
                format!("custom empty member of \"{owner}\" must define sort_name because a sort column is set"),
            )
            .with_context(context),
        );
    }
}

fn check_level_attribute_shapes(resolver: &mut Resolver<'_, '_>, dimension: &Dimension) {
    let (shared, single): (Vec<&LevelAttribute>, Vec<&LevelAttribute>) =
        dimension.level_attributes.iter().partition(|a| a.is_shared());
    if shared.is_empty() || single.is_empty() {
        return;
    }
    resolver.report(SmlDiagBuilder::new(
        SmlDiagKind::MixedLevelAttributes,
        format!(
            "dimension \"{}\" mixes single-dataset level attributes [{}] with multi-dataset level attributes [{}]",
            dimension.unique_name,
            names(&single),
            names(&shared)
        ),
    ));
}

fn names(attributes: &[&LevelAttribute]) -> String {
    attributes
        .iter()
        .map(|a| a.unique_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column roles of a shared degenerate column, checked for one type each.
fn column_roles(source: &ColumnSource) -> Vec<(String, Option<&SmolStr>)> {
    let mut roles: Vec<(String, Option<&SmolStr>)> = source
        .key_columns
        .iter()
        .enumerate()
        .map(|(i, column)| (format!("key column #{}", i + 1), Some(column)))
        .collect();
    roles.push(("name column".to_string(), Some(&source.name_column)));
    roles.push(("sort column".to_string(), source.sort_column.as_ref()));
    roles
}

fn check_shared_column_types(
    resolver: &mut Resolver<'_, '_>,
    dimension: &Dimension,
    attribute: &LevelAttribute,
    sources: &[&ColumnSource],
) {
    let context = level_attribute_context(dimension, attribute);

    // role -> dataset.column -> type
    let mut roles: BTreeMap<String, Vec<(String, DataType)>> = BTreeMap::new();
    let mut role_order: Vec<String> = Vec::new();
    for source in sources {
        let Some(dataset) = resolver.peek_dataset(&source.dataset) else {
            continue;
        };
        for (role, column) in column_roles(source) {
            let Some(column) = column else { continue };
            let Some(data_type) = dataset.column_type(column) else {
                continue;
            };
            if !roles.contains_key(&role) {
                role_order.push(role.clone());
            }
            roles
                .entry(role)
                .or_default()
                .push((format!("{}.{}", dataset.unique_name, column), data_type));
        }
    }

    for role in role_order {
        let columns = &roles[&role];
        let types: BTreeSet<DataType> = columns.iter().map(|(_, t)| *t).collect();
        if types.len() > 1 {
            let listed = columns
                .iter()
                .map(|(column, data_type)| format!("{column} ({data_type})"))
                .collect::<Vec<_>>()
                .join(", ");
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::InconsistentSharedColumns,
                    format!(
                        "{role} of level attribute \"{}\" has different data types across datasets: {listed}",
                        attribute.unique_name
                    ),
                )
                .with_context(context.clone()),
            );
        }
    }

    let with_sort = sources.iter().filter(|s| s.sort_column.is_some()).count();
    if with_sort != 0 && with_sort != sources.len() {
        resolver.report(
            SmlDiagBuilder::new(
                SmlDiagKind::InconsistentSharedColumns,
                format!(
                    "sort column of level attribute \"{}\" must be set for all or none of its datasets ({with_sort} of {})",
                    attribute.unique_name,
                    sources.len()
                ),
            )
            .with_context(context),
        );
    }
}

fn check_shared_dataset_usage(resolver: &mut Resolver<'_, '_>, dimension: &Dimension) {
    let shared: Vec<&LevelAttribute> = dimension
        .level_attributes
        .iter()
        .filter(|a| a.is_shared())
        .collect();
    if shared.len() < 2 {
        return;
    }

    let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
    for attribute in &shared {
        let datasets: BTreeSet<&str> = attribute
            .column_sources()
            .iter()
            .map(|s| s.dataset.as_str())
            .collect();
        for dataset in datasets {
            *usage.entry(dataset).or_default() += 1;
        }
    }

    for (dataset, count) in usage {
        if count < shared.len() {
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::SharedDatasetUsage,
                    format!(
                        "dataset \"{dataset}\" is used by {count} of {} multi-dataset level attributes of dimension \"{}\"",
                        shared.len(),
                        dimension.unique_name
                    ),
                )
                .with_severity(DiagSeverity::Warning),
            );
        }
    }
}

fn check_duplicate_level_attributes(resolver: &mut Resolver<'_, '_>, dimension: &Dimension) {
    // Attributes without key columns have nothing to compare.
    let keyed = dimension.level_attributes.iter().filter_map(|attribute| {
        let key: BTreeSet<(&str, &[SmolStr])> = attribute
            .column_sources()
            .into_iter()
            .filter(|s| !s.key_columns.is_empty())
            .map(|s| (s.dataset.as_str(), s.key_columns.as_slice()))
            .collect();
        (!key.is_empty()).then_some((key, attribute))
    });
    let groups = group_by_key(keyed);

    for group in groups.into_iter().filter(|g| g.len() > 1) {
        resolver.report(SmlDiagBuilder::new(
            SmlDiagKind::Duplicate,
            format!(
                "level attributes [{}] of dimension \"{}\" use the same dataset and key columns",
                names(&group),
                dimension.unique_name
            ),
        ));
    }
}

fn validate_level(
    resolver: &mut Resolver<'_, '_>,
    dimension: &Dimension,
    hierarchy: &Hierarchy,
    level: &Level,
) {
    let level_context = DiagContext::Level {
        dimension: dimension.unique_name.clone(),
        hierarchy: hierarchy.unique_name.clone(),
        level: level.unique_name.clone(),
    };
    let attribute = dimension.level_attribute(&level.unique_name);
    if attribute.is_none() {
        resolver.report(
            SmlDiagBuilder::unknown_member(
                "level attribute",
                &level.unique_name,
                &dimension.unique_name,
            )
            .with_context(level_context),
        );
    }
    let on_shared = attribute.is_some_and(LevelAttribute::is_shared);

    for secondary in &level.secondary_attributes {
        let context = DiagContext::SecondaryAttribute {
            dimension: dimension.unique_name.clone(),
            hierarchy: hierarchy.unique_name.clone(),
            level: level.unique_name.clone(),
            secondary_attribute: secondary.unique_name.clone(),
        };
        if on_shared {
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::InconsistentSharedColumns,
                    format!(
                        "secondary attribute \"{}\" cannot be attached to multi-dataset level attribute \"{}\"",
                        secondary.unique_name, level.unique_name
                    ),
                )
                .with_context(context),
            );
            continue;
        }

        check_column_source(resolver, &secondary.columns, &context);
        if let Some(format) = &secondary.format
            && let Some(data_type) = resolver
                .peek_dataset(&secondary.columns.dataset)
                .and_then(|d| d.column_type(&secondary.columns.name_column))
        {
            check_format(
                resolver,
                &format!("secondary attribute \"{}\"", secondary.unique_name),
                format,
                data_type,
                Some(context.clone()),
            );
        }
        check_custom_empty_member(
            resolver,
            secondary.columns.sort_column.is_some(),
            secondary.custom_empty_member.as_ref(),
            &secondary.unique_name,
            context,
        );
    }

    for alias in &level.aliases {
        let context = DiagContext::LevelAlias {
            dimension: dimension.unique_name.clone(),
            hierarchy: hierarchy.unique_name.clone(),
            level: level.unique_name.clone(),
            alias: alias.unique_name.clone(),
        };
        check_column_source(resolver, &alias.columns, &context);
        check_custom_empty_member(
            resolver,
            alias.columns.sort_column.is_some(),
            alias.custom_empty_member.as_ref(),
            &alias.unique_name,
            context,
        );
    }
}

fn check_calculation_groups(resolver: &mut Resolver<'_, '_>, dimension: &Dimension) {
    for (group, count) in duplicate_groups(
        dimension
            .calculation_groups
            .iter()
            .map(|g| (&g.unique_name, g)),
    ) {
        resolver.report(SmlDiagBuilder::duplicate(
            "calculation group",
            count,
            format!("\"{}\"", group.unique_name),
        ));
    }
    for group in &dimension.calculation_groups {
        for (member, count) in duplicate_groups(
            group
                .calculated_members
                .iter()
                .map(|m| (&m.unique_name, m)),
        ) {
            resolver.report(SmlDiagBuilder::duplicate(
                "calculated member",
                count,
                format!("\"{}\" in calculation group \"{}\"", member.unique_name, group.unique_name),
            ));
        }
    }
}
