//! Time dimension semantics: time units, level granularity order, and
//! parallel periods.

use super::resolver::Resolver;
use crate::diag::DiagContext;
use crate::model::{Dimension, Hierarchy, Level, TimeUnit};
use crate::semantic::diag::{SmlDiagBuilder, SmlDiagKind};

pub(super) fn validate_time_semantics(resolver: &mut Resolver<'_, '_>, dimension: &Dimension) {
    if dimension.is_time() {
        check_time_units(resolver, dimension);
        for hierarchy in &dimension.hierarchies {
            check_level_order(resolver, dimension, hierarchy);
        }
    }

    for hierarchy in &dimension.hierarchies {
        for level in hierarchy
            .levels
            .iter()
            .filter(|l| !l.parallel_periods.is_empty())
        {
            check_parallel_periods(resolver, dimension, hierarchy, level);
        }
    }
}

fn check_time_units(resolver: &mut Resolver<'_, '_>, dimension: &Dimension) {
    for attribute in &dimension.level_attributes {
        if attribute.time_unit.is_some() {
            continue;
        }
        resolver.report(
            SmlDiagBuilder::new(
                SmlDiagKind::TimeHierarchy,
                format!(
                    "time_unit missing for level attribute \"{}\" of time dimension \"{}\"",
                    attribute.unique_name, dimension.unique_name
                ),
            )
            .with_context(DiagContext::LevelAttribute {
                dimension: dimension.unique_name.clone(),
                level_attribute: attribute.unique_name.clone(),
            }),
        );
    }
}

/// Each level must be at most as coarse as the closest level above it with a
/// defined unit. Undefined or missing units match anything.
fn check_level_order(resolver: &mut Resolver<'_, '_>, dimension: &Dimension, hierarchy: &Hierarchy) {
    let mut above: Option<(&Level, TimeUnit, u8)> = None;

    for level in &hierarchy.levels {
        let Some(unit) = dimension
            .level_attribute(&level.unique_name)
            .and_then(|a| a.time_unit)
        else {
            continue;
        };
        let Some(granularity) = unit.granularity() else {
            continue;
        };

        if let Some((parent, parent_unit, parent_granularity)) = above
            && granularity > parent_granularity
        {
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::TimeHierarchy,
                    format!(
                        "level \"{}\" ({}) of hierarchy \"{}\" is coarser than level \"{}\" ({}) above it",
                        level.unique_name,
                        unit.name(),
                        hierarchy.unique_name,
                        parent.unique_name,
                        parent_unit.name()
                    ),
                )
                .with_context(DiagContext::Level {
                    dimension: dimension.unique_name.clone(),
                    hierarchy: hierarchy.unique_name.clone(),
                    level: level.unique_name.clone(),
                })
                .with_help("order time levels from the coarsest unit to the finest"),
            );
        }
        above = Some((level, unit, granularity));
    }
}

fn check_parallel_periods(
    resolver: &mut Resolver<'_, '_>,
    dimension: &Dimension,
    hierarchy: &Hierarchy,
    level: &Level,
) {
    debug_assert!(!level.parallel_periods.is_empty());
    let context = DiagContext::Level {
        dimension: dimension.unique_name.clone(),
        hierarchy: hierarchy.unique_name.clone(),
        level: level.unique_name.clone(),
    };

    if !dimension.is_time() {
        resolver.report(
            SmlDiagBuilder::new(
                SmlDiagKind::ParallelPeriod,
                format!(
                    "parallel periods of level \"{}\" are only allowed in time dimensions; \"{}\" is not a time dimension",
                    level.unique_name, dimension.unique_name
                ),
            )
            .with_context(context),
        );
        return;
    }

    for period in &level.parallel_periods {
        if period.level == level.unique_name {
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::ParallelPeriod,
                    format!(
                        "parallel period of level \"{}\" must reference a different level",
                        level.unique_name
                    ),
                )
                .with_context(context.clone()),
            );
            continue;
        }
        if hierarchy.level(&period.level).is_none() {
            resolver.report(
                SmlDiagBuilder::new(
                    SmlDiagKind::ParallelPeriod,
                    format!(
                        "parallel period level \"{}\" does not exist in hierarchy \"{}\"",
                        period.level, hierarchy.unique_name
                    ),
                )
                .with_context(context.clone()),
            );
            continue;
        }

        let Some(attribute) = dimension.level_attribute(&period.level) else {
            // Reported as an unknown level attribute by the hierarchy checks.
            continue;
        };
        for source in attribute.column_sources() {
            let Some(dataset) = resolver.peek_dataset(&source.dataset) else {
                continue;
            };
            for column in &period.key_columns {
                if !dataset.has_column(column) {
                    resolver.report(
                        SmlDiagBuilder::missing_column(column, &dataset.unique_name)
                            .with_context(context.clone()),
                    );
                }
            }
        }
    }
}
