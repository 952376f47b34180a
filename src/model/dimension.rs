//! Dimension, level attribute, and hierarchy types

use serde::Deserialize;
use smol_str::SmolStr;

use super::relationship::{Relationship, RelationshipTo};
use super::types::{DimensionType, TimeUnit};

/// A dimension definition with its level attributes and hierarchies
#[derive(Debug, Clone, Deserialize)]
pub struct Dimension {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub dimension_type: DimensionType,
    /// Degenerate dimensions are derived from fact datasets.
    #[serde(default)]
    pub is_degenerate: bool,
    #[serde(default)]
    pub level_attributes: Vec<LevelAttribute>,
    #[serde(default)]
    pub hierarchies: Vec<Hierarchy>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub calculation_groups: Vec<CalculationGroup>,
}

/// An atomic identifying column set of a dimension.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelAttribute {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    pub time_unit: Option<TimeUnit>,
    pub custom_empty_member: Option<CustomEmptyMember>,
    #[serde(flatten)]
    pub source: LevelAttributeSource,
}

/// Where a level attribute's members come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LevelAttributeSource {
    /// Shared across several fact datasets (degenerate dimensions).
    Shared {
        shared_degenerate_columns: Vec<SharedDegenerateColumn>,
    },
    Single(ColumnSource),
}

/// Dataset columns backing a level attribute, secondary attribute, or alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ColumnSource {
    pub dataset: SmolStr,
    #[serde(default)]
    pub key_columns: Vec<SmolStr>,
    pub name_column: SmolStr,
    pub sort_column: Option<SmolStr>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharedDegenerateColumn {
    #[serde(flatten)]
    pub columns: ColumnSource,
    #[serde(default)]
    pub is_unique_key: bool,
}

/// Replacement member shown for rows without a dimension match.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomEmptyMember {
    #[serde(default)]
    pub key: Vec<String>,
    pub name: String,
    pub sort_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hierarchy {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    #[serde(default)]
    pub levels: Vec<Level>,
}

/// A hierarchy level; `unique_name` references a level attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct Level {
    pub unique_name: SmolStr,
    #[serde(default)]
    pub secondary_attributes: Vec<SecondaryAttribute>,
    #[serde(default)]
    pub aliases: Vec<LevelAlias>,
    #[serde(default)]
    pub parallel_periods: Vec<ParallelPeriod>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecondaryAttribute {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    #[serde(flatten)]
    pub columns: ColumnSource,
    pub format: Option<String>,
    pub custom_empty_member: Option<CustomEmptyMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelAlias {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    #[serde(flatten)]
    pub columns: ColumnSource,
    pub custom_empty_member: Option<CustomEmptyMember>,
}

/// Offset reference to another level used for period-over-period analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct ParallelPeriod {
    pub level: SmolStr,
    #[serde(default)]
    pub key_columns: Vec<SmolStr>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculationGroup {
    pub unique_name: SmolStr,
    pub label: Option<String>,
    #[serde(default)]
    pub calculated_members: Vec<CalculatedMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculatedMember {
    pub unique_name: SmolStr,
    pub expression: Option<String>,
}

impl Dimension {
    pub fn is_time(&self) -> bool {
        self.dimension_type == DimensionType::Time
    }

    /// Get a level attribute by name
    pub fn level_attribute(&self, name: &str) -> Option<&LevelAttribute> {
        self.level_attributes.iter().find(|l| l.unique_name == name)
    }

    pub fn hierarchy(&self, name: &str) -> Option<&Hierarchy> {
        self.hierarchies.iter().find(|h| h.unique_name == name)
    }

    /// True if `name` is a level attribute or a secondary attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.level_attribute(name).is_some()
            || self
                .hierarchies
                .iter()
                .flat_map(|h| &h.levels)
                .flat_map(|l| &l.secondary_attributes)
                .any(|s| s.unique_name == name)
    }

    /// Relationships to another dimension, declared from inside this one.
    pub fn embedded_relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| match &r.to {
            RelationshipTo::Level { dimension, .. } => {
                !dimension.is_empty() && *dimension != self.unique_name
            }
            RelationshipTo::RowSecurity { .. } => false,
        })
    }
}

impl LevelAttribute {
    pub fn is_shared(&self) -> bool {
        matches!(self.source, LevelAttributeSource::Shared { .. })
    }

    /// All column sources of this level attribute, one per dataset.
    pub fn column_sources(&self) -> Vec<&ColumnSource> {
        match &self.source {
            LevelAttributeSource::Single(source) => vec![source],
            LevelAttributeSource::Shared {
                shared_degenerate_columns,
            } => shared_degenerate_columns.iter().map(|s| &s.columns).collect(),
        }
    }

    /// Number of key columns a relationship must join on.
    pub fn key_arity(&self) -> usize {
        self.column_sources()
            .first()
            .map(|s| s.key_columns.len())
            .unwrap_or_default()
    }

    pub fn has_sort_column(&self) -> bool {
        self.column_sources().iter().any(|s| s.sort_column.is_some())
    }
}

impl Hierarchy {
    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.unique_name == name)
    }
}
