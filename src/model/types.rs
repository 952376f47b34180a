//! Scalar vocabulary shared by SML objects: column data types, time units,
//! and calculation methods.

use serde::Deserialize;
use std::fmt;

/// Normalized column data type.
///
/// SML columns declare free-form warehouse type names; compatibility checks
/// only care about the family a type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    String,
    Integer,
    Decimal,
    Float,
    Boolean,
    Date,
    DateTime,
    /// A type name outside the known families. Compatibility checks skip it.
    Unknown,
}

impl DataType {
    /// Maps a declared type name (case-insensitive) to its family.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let base = lowered
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();
        match base {
            "string" | "varchar" | "char" | "text" => DataType::String,
            "int" | "integer" | "long" | "bigint" | "smallint" | "tinyint" => DataType::Integer,
            "decimal" | "numeric" | "number" => DataType::Decimal,
            "float" | "double" | "real" => DataType::Float,
            "boolean" | "bool" => DataType::Boolean,
            "date" => DataType::Date,
            "datetime" | "timestamp" => DataType::DateTime,
            _ => DataType::Unknown,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Decimal | DataType::Float)
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Decimal => "decimal",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::DateTime => "datetime",
            DataType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dimension flavour. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DimensionType {
    #[default]
    Standard,
    Time,
}

impl TryFrom<String> for DimensionType {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(DimensionType::Standard),
            "time" => Ok(DimensionType::Time),
            _ => Err(format!("unknown dimension type `{raw}`, expected `standard` or `time`")),
        }
    }
}

/// Calendar granularity of a time level. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeUnit {
    Year,
    HalfYear,
    Trimester,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    /// Granularity is not specified; never violates ordering.
    Undefined,
}

impl TryFrom<String> for TimeUnit {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let unit = match raw.trim().to_ascii_lowercase().as_str() {
            "year" => TimeUnit::Year,
            "halfyear" | "half_year" => TimeUnit::HalfYear,
            "trimester" => TimeUnit::Trimester,
            "quarter" => TimeUnit::Quarter,
            "month" => TimeUnit::Month,
            "week" => TimeUnit::Week,
            "day" => TimeUnit::Day,
            "hour" => TimeUnit::Hour,
            "minute" => TimeUnit::Minute,
            "second" => TimeUnit::Second,
            "undefined" => TimeUnit::Undefined,
            _ => return Err(format!("unknown time unit `{raw}`")),
        };
        Ok(unit)
    }
}

impl TimeUnit {
    /// Coarseness rank: larger is coarser. `None` for [`TimeUnit::Undefined`].
    pub fn granularity(self) -> Option<u8> {
        match self {
            TimeUnit::Year => Some(10),
            TimeUnit::HalfYear => Some(9),
            TimeUnit::Trimester => Some(8),
            TimeUnit::Quarter => Some(7),
            TimeUnit::Month => Some(6),
            TimeUnit::Week => Some(5),
            TimeUnit::Day => Some(4),
            TimeUnit::Hour => Some(3),
            TimeUnit::Minute => Some(2),
            TimeUnit::Second => Some(1),
            TimeUnit::Undefined => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Year => "year",
            TimeUnit::HalfYear => "halfyear",
            TimeUnit::Trimester => "trimester",
            TimeUnit::Quarter => "quarter",
            TimeUnit::Month => "month",
            TimeUnit::Week => "week",
            TimeUnit::Day => "day",
            TimeUnit::Hour => "hour",
            TimeUnit::Minute => "minute",
            TimeUnit::Second => "second",
            TimeUnit::Undefined => "undefined",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregation applied by a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum CalculationMethod {
    #[serde(rename = "sum")]
    Sum,
    #[serde(rename = "sum distinct")]
    SumDistinct,
    #[serde(rename = "count non-null")]
    CountNonNull,
    #[serde(rename = "count distinct")]
    CountDistinct,
    #[serde(rename = "estimated count distinct")]
    EstimatedCountDistinct,
    #[serde(rename = "average")]
    Average,
    #[serde(rename = "minimum")]
    Minimum,
    #[serde(rename = "maximum")]
    Maximum,
    #[serde(rename = "stddev_samp")]
    StddevSamp,
    #[serde(rename = "stddev_pop")]
    StddevPop,
    #[serde(rename = "var_samp")]
    VarSamp,
    #[serde(rename = "var_pop")]
    VarPop,
    #[serde(rename = "percentile")]
    Percentile,
    #[serde(rename = "estimated percentile")]
    EstimatedPercentile,
    #[serde(rename = "median")]
    Median,
}

impl CalculationMethod {
    pub fn name(self) -> &'static str {
        match self {
            CalculationMethod::Sum => "sum",
            CalculationMethod::SumDistinct => "sum distinct",
            CalculationMethod::CountNonNull => "count non-null",
            CalculationMethod::CountDistinct => "count distinct",
            CalculationMethod::EstimatedCountDistinct => "estimated count distinct",
            CalculationMethod::Average => "average",
            CalculationMethod::Minimum => "minimum",
            CalculationMethod::Maximum => "maximum",
            CalculationMethod::StddevSamp => "stddev_samp",
            CalculationMethod::StddevPop => "stddev_pop",
            CalculationMethod::VarSamp => "var_samp",
            CalculationMethod::VarPop => "var_pop",
            CalculationMethod::Percentile => "percentile",
            CalculationMethod::EstimatedPercentile => "estimated percentile",
            CalculationMethod::Median => "median",
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
