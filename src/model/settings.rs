//! Connections, row security, catalogs, and settings objects

use serde::Deserialize;
use smol_str::SmolStr;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    pub as_connection: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
}

/// Row-level security filter keyed by a dataset column.
#[derive(Debug, Clone, Deserialize)]
pub struct RowSecurity {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    pub dataset: SmolStr,
    pub filter_key_column: SmolStr,
    pub ids_column: SmolStr,
    pub scope: Option<String>,
    #[serde(default)]
    pub secure_totals: bool,
}

/// Repository root descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    pub version: Option<f64>,
    /// No longer honored by the engine.
    pub aggressive_agg_promotion: Option<bool>,
    pub build_speculative_aggs: Option<bool>,
    #[serde(default)]
    pub dataset_properties: BTreeMap<SmolStr, DatasetProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetProperties {
    pub allow_aggregates: Option<bool>,
    pub create_hinted_aggregate: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    pub unique_name: SmolStr,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalSettings {
    pub unique_name: SmolStr,
    pub label: Option<String>,
}
