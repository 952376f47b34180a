//! Dataset, row security, and catalog validation.

use super::duplicate_groups;
use super::resolver::Resolver;
use crate::model::{Catalog, Dataset, ObjectKind, RowSecurity};
use crate::semantic::diag::SmlDiagBuilder;

pub(super) fn validate_dataset(resolver: &mut Resolver<'_, '_>, dataset: &Dataset) {
    resolver.resolve(&dataset.connection_id, ObjectKind::Connection);
    if let Some(connection) = dataset
        .alternate
        .as_ref()
        .and_then(|a| a.connection_id.as_ref())
    {
        resolver.resolve(connection, ObjectKind::Connection);
    }

    if let Some(incremental) = &dataset.incremental
        && !dataset.has_column(&incremental.column)
    {
        resolver.report(SmlDiagBuilder::missing_column(
            &incremental.column,
            &dataset.unique_name,
        ));
    }

    for (column, count) in duplicate_groups(dataset.columns.iter().map(|c| (&c.name, c))) {
        resolver.report(SmlDiagBuilder::duplicate(
            "column",
            count,
            format!("\"{}\" in dataset \"{}\"", column.name, dataset.unique_name),
        ));
    }
}

pub(super) fn validate_row_security(resolver: &mut Resolver<'_, '_>, row_security: &RowSecurity) {
    let Some(dataset) = resolver.dataset(&row_security.dataset) else {
        return;
    };
    for column in [&row_security.filter_key_column, &row_security.ids_column] {
        if !dataset.has_column(column) {
            resolver.report(SmlDiagBuilder::missing_column(column, &dataset.unique_name));
        }
    }
}

pub(super) fn validate_catalog(resolver: &mut Resolver<'_, '_>, catalog: &Catalog) {
    for dataset in catalog.dataset_properties.keys() {
        resolver.dataset(dataset);
    }
    if catalog.aggressive_agg_promotion.is_some() {
        resolver.report(SmlDiagBuilder::obsolete_property(
            "aggressive_agg_promotion",
            &catalog.unique_name,
        ));
    }
}
