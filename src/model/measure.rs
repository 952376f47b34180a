//! Measure and calculated measure types

use serde::Deserialize;
use smol_str::SmolStr;

use super::types::CalculationMethod;

/// A measure aggregating one dataset column (`object_type: metric`).
#[derive(Debug, Clone, Deserialize)]
pub struct Measure {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    pub dataset: SmolStr,
    pub column: SmolStr,
    pub calculation_method: CalculationMethod,
    pub format: Option<String>,
    pub semi_additive: Option<SemiAdditive>,
}

/// A measure defined by an expression over other measures
/// (`object_type: metric_calc`).
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatedMeasure {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    pub expression: String,
    pub format: Option<String>,
}

/// Restricts how a measure aggregates across time-like dimensions.
#[derive(Debug, Clone, Deserialize)]
pub struct SemiAdditive {
    #[serde(default)]
    pub position: SemiAdditivePosition,
    #[serde(default)]
    pub relationships: Vec<RelationshipChain>,
    #[serde(default)]
    pub degenerate_dimensions: Vec<DegenerateLevelRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemiAdditivePosition {
    First,
    #[default]
    Last,
}

/// A single relationship name or an ordered traversal through nested
/// dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RelationshipChain {
    Single(SmolStr),
    Chain(Vec<SmolStr>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct DegenerateLevelRef {
    pub name: SmolStr,
    pub level: SmolStr,
}

impl RelationshipChain {
    pub fn names(&self) -> &[SmolStr] {
        match self {
            RelationshipChain::Single(name) => std::slice::from_ref(name),
            RelationshipChain::Chain(names) => names,
        }
    }
}
