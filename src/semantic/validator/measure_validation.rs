//! Measure and calculated measure validation.

use super::format_validation::{check_calculation_method, check_format};
use super::resolver::Resolver;
use super::semi_additive_validation::validate_semi_additive;
use crate::model::{CalculatedMeasure, DataType, Measure};
use crate::semantic::diag::SmlDiagBuilder;

pub(super) fn validate_measure(resolver: &mut Resolver<'_, '_>, measure: &Measure) {
    let column_type = resolver.dataset(&measure.dataset).and_then(|dataset| {
        let column_type = dataset.column_type(&measure.column);
        if column_type.is_none() {
            resolver.report(SmlDiagBuilder::missing_column(
                &measure.column,
                &dataset.unique_name,
            ));
        }
        column_type
    });

    if let Some(data_type) = column_type {
        if let Some(format) = &measure.format {
            check_format(
                resolver,
                &format!("metric \"{}\"", measure.unique_name),
                format,
                data_type,
                None,
            );
        }
        check_calculation_method(
            resolver,
            &measure.unique_name,
            measure.calculation_method,
            data_type,
        );
    }

    if let Some(semi_additive) = &measure.semi_additive {
        validate_semi_additive(resolver, measure, semi_additive);
    }
}

/// Calculated measures always produce numbers.
pub(super) fn validate_calculated_measure(
    resolver: &mut Resolver<'_, '_>,
    measure: &CalculatedMeasure,
) {
    if let Some(format) = &measure.format {
        check_format(
            resolver,
            &format!("calculated metric \"{}\"", measure.unique_name),
            format,
            DataType::Decimal,
            None,
        );
    }
}
