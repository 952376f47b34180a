//! Model and composite model types

use serde::Deserialize;
use smol_str::SmolStr;
use std::collections::BTreeMap;

use super::relationship::Relationship;

/// A publishable cube: relationships from fact datasets to dimensions plus the
/// measures it exposes.
#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Degenerate dimensions included directly.
    #[serde(default)]
    pub dimensions: Vec<SmolStr>,
    #[serde(default)]
    pub metrics: Vec<ModelMetric>,
    #[serde(default)]
    pub overrides: BTreeMap<SmolStr, Override>,
    #[serde(default)]
    pub aggregates: Vec<Aggregate>,
    #[serde(default)]
    pub drillthroughs: Vec<Drillthrough>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetric {
    pub unique_name: SmolStr,
    pub folder: Option<String>,
}

/// Per-model rename of a metric or dimension.
#[derive(Debug, Clone, Deserialize)]
pub struct Override {
    pub query_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Aggregate {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    #[serde(default)]
    pub metrics: Vec<SmolStr>,
    #[serde(default)]
    pub attributes: Vec<AttributeRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Drillthrough {
    pub unique_name: SmolStr,
    #[serde(default)]
    pub metrics: Vec<SmolStr>,
    #[serde(default)]
    pub attributes: Vec<AttributeRef>,
}

/// A dimension attribute reached through an optional relationship path.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeRef {
    pub name: SmolStr,
    pub dimension: SmolStr,
    #[serde(default)]
    pub relationships_path: Vec<SmolStr>,
}

/// A model combining several dependency models.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeModel {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    #[serde(default)]
    pub models: Vec<SmolStr>,
    #[serde(default)]
    pub metrics: Vec<ModelMetric>,
}

impl Model {
    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics.iter().any(|m| m.unique_name == name)
    }

    pub fn has_dimension(&self, name: &str) -> bool {
        self.dimensions.iter().any(|d| d == name)
    }

    /// Externally visible name of a metric or dimension.
    pub fn query_name<'a>(&'a self, unique_name: &'a str) -> &'a str {
        self.overrides
            .get(unique_name)
            .map(|o| o.query_name.as_str())
            .unwrap_or(unique_name)
    }

    /// Dimensions targeted by this model's relationships.
    pub fn relationship_dimensions(&self) -> impl Iterator<Item = &SmolStr> {
        self.relationships.iter().filter_map(Relationship::target_dimension)
    }
}
