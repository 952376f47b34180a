//! Dataset and column types

use serde::Deserialize;
use smol_str::SmolStr;

use super::types::DataType;

/// A physical or SQL-defined table exposed to the semantic layer.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    /// Connection the dataset is read through.
    pub connection_id: SmolStr,
    pub table: Option<String>,
    pub sql: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Secondary storage used in place of the primary table.
    pub alternate: Option<Alternate>,
    /// Incremental load descriptor.
    pub incremental: Option<Incremental>,
}

/// A dataset column. Either scalar (`data_type`) or a map column.
#[derive(Debug, Clone, Deserialize)]
pub struct Column {
    pub name: SmolStr,
    pub data_type: Option<String>,
    pub map: Option<MapColumn>,
    /// Calculated columns carry an expression instead of a physical column.
    pub sql: Option<String>,
}

/// Key/value column packed into a single string column.
#[derive(Debug, Clone, Deserialize)]
pub struct MapColumn {
    pub key_type: String,
    pub value_type: String,
    pub field_terminator: Option<String>,
    pub key_terminator: Option<String>,
    #[serde(default)]
    pub is_prefixed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alternate {
    #[serde(rename = "type")]
    pub kind: AlternateKind,
    pub connection_id: Option<SmolStr>,
    pub table: Option<String>,
    pub sql: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlternateKind {
    Table,
    Sql,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Incremental {
    pub column: SmolStr,
    pub grace_period: Option<String>,
}

impl Dataset {
    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Normalized type of a column, `None` if the column does not exist.
    pub fn column_type(&self, name: &str) -> Option<DataType> {
        self.column(name).map(Column::data_type)
    }
}

impl Column {
    /// Map columns expose their value type.
    pub fn data_type(&self) -> DataType {
        match (&self.data_type, &self.map) {
            (Some(declared), _) => DataType::parse(declared),
            (None, Some(map)) => DataType::parse(&map.value_type),
            (None, None) => DataType::Unknown,
        }
    }
}
