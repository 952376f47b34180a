//! Format and calculation-method compatibility with column data types.

use super::resolver::Resolver;
use crate::diag::DiagContext;
use crate::model::{CalculationMethod, DataType};
use crate::semantic::diag::{SmlDiagBuilder, SmlDiagKind};

const NUMBER_FORMATS: &[&str] = &[
    "general number",
    "standard",
    "fixed",
    "percent",
    "scientific",
    "currency",
];
const BOOLEAN_FORMATS: &[&str] = &["yes/no", "true/false", "on/off"];
const DATE_FORMATS: &[&str] = &["general date", "long date", "medium date", "short date"];
const TIME_FORMATS: &[&str] = &["long time", "medium time", "short time"];

const NUMERIC_METHODS: &[CalculationMethod] = &[
    CalculationMethod::Sum,
    CalculationMethod::SumDistinct,
    CalculationMethod::CountNonNull,
    CalculationMethod::CountDistinct,
    CalculationMethod::EstimatedCountDistinct,
    CalculationMethod::Average,
    CalculationMethod::Minimum,
    CalculationMethod::Maximum,
    CalculationMethod::StddevSamp,
    CalculationMethod::StddevPop,
    CalculationMethod::VarSamp,
    CalculationMethod::VarPop,
    CalculationMethod::Percentile,
    CalculationMethod::EstimatedPercentile,
    CalculationMethod::Median,
];
const COUNTING_METHODS: &[CalculationMethod] = &[
    CalculationMethod::CountNonNull,
    CalculationMethod::CountDistinct,
    CalculationMethod::EstimatedCountDistinct,
    CalculationMethod::Minimum,
    CalculationMethod::Maximum,
];
const BOOLEAN_METHODS: &[CalculationMethod] = &[
    CalculationMethod::CountNonNull,
    CalculationMethod::CountDistinct,
    CalculationMethod::EstimatedCountDistinct,
];

/// Display formats accepted by a data type. `None` if the type is unknown and
/// formatting is not checked.
pub fn accepted_formats(data_type: DataType) -> Option<Vec<&'static str>> {
    let formats = match data_type {
        DataType::Integer | DataType::Decimal | DataType::Float => {
            [NUMBER_FORMATS, BOOLEAN_FORMATS].concat()
        }
        DataType::Boolean => BOOLEAN_FORMATS.to_vec(),
        DataType::Date => DATE_FORMATS.to_vec(),
        DataType::DateTime => [DATE_FORMATS, TIME_FORMATS].concat(),
        DataType::String => Vec::new(),
        DataType::Unknown => return None,
    };
    Some(formats)
}

/// True if `format` is one of the named catalog formats.
pub fn is_catalog_format(format: &str) -> bool {
    let format = format.trim();
    [NUMBER_FORMATS, BOOLEAN_FORMATS, DATE_FORMATS, TIME_FORMATS]
        .iter()
        .flat_map(|list| list.iter())
        .any(|known| known.eq_ignore_ascii_case(format))
}

/// Calculation methods allowed on a data type. `None` if the type is unknown.
pub fn allowed_calculation_methods(data_type: DataType) -> Option<&'static [CalculationMethod]> {
    match data_type {
        DataType::Integer | DataType::Decimal | DataType::Float => Some(NUMERIC_METHODS),
        DataType::String | DataType::Date | DataType::DateTime => Some(COUNTING_METHODS),
        DataType::Boolean => Some(BOOLEAN_METHODS),
        DataType::Unknown => None,
    }
}

/// Checks a `format` set on `subject` (e.g. `metric "sales"`) whose values
/// have type `data_type`.
pub(super) fn check_format(
    resolver: &mut Resolver<'_, '_>,
    subject: &str,
    format: &str,
    data_type: DataType,
    context: Option<DiagContext>,
) {
    let Some(accepted) = accepted_formats(data_type) else {
        return;
    };

    let diag = if accepted.is_empty() {
        SmlDiagBuilder::new(
            SmlDiagKind::Formatting,
            format!(
                "inapplicable formatting \"{format}\" for {subject}: {data_type} columns accept no formats; accepted formats: []"
            ),
        )
        .with_help("remove the format")
    } else if is_catalog_format(format)
        && !accepted.iter().any(|a| a.eq_ignore_ascii_case(format.trim()))
    {
        SmlDiagBuilder::new(
            SmlDiagKind::Formatting,
            format!(
                "incompatible formatting \"{format}\" for {subject} of type {data_type}; accepted formats: [{}]",
                accepted.join(", ")
            ),
        )
    } else {
        return;
    };

    resolver.report(match context {
        Some(context) => diag.with_context(context),
        None => diag,
    });
}

pub(super) fn check_calculation_method(
    resolver: &mut Resolver<'_, '_>,
    measure: &str,
    method: CalculationMethod,
    data_type: DataType,
) {
    let Some(allowed) = allowed_calculation_methods(data_type) else {
        return;
    };
    if allowed.contains(&method) {
        return;
    }
    resolver.report(
        SmlDiagBuilder::new(
            SmlDiagKind::CalculationMethod,
            format!(
                "calculation method \"{method}\" of metric \"{measure}\" is not allowed for column type {data_type}"
            ),
        )
        .with_note(format!(
            "allowed methods: {}",
            allowed
                .iter()
                .map(|m| m.name())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    );
}
