//! Relationship types shared by dimensions and models

use serde::Deserialize;
use smol_str::SmolStr;
use std::fmt;

/// A declared join between a dataset and a dimension level or row security.
#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub unique_name: SmolStr,
    pub from: RelationshipFrom,
    pub to: RelationshipTo,
    pub role_play: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct RelationshipFrom {
    /// Empty when the relationship is detached on the dataset side.
    #[serde(default)]
    pub dataset: SmolStr,
    #[serde(default)]
    pub join_columns: Vec<SmolStr>,
    /// Only set on embedded relationships of a dimension.
    pub hierarchy: Option<SmolStr>,
    pub level: Option<SmolStr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum RelationshipTo {
    RowSecurity {
        row_security: SmolStr,
    },
    Level {
        #[serde(default)]
        dimension: SmolStr,
        #[serde(default)]
        level: SmolStr,
    },
}

impl Relationship {
    pub fn is_security(&self) -> bool {
        matches!(self.to, RelationshipTo::RowSecurity { .. })
    }

    /// Target dimension, for relationships pointing at a level.
    pub fn target_dimension(&self) -> Option<&SmolStr> {
        match &self.to {
            RelationshipTo::Level { dimension, .. } if !dimension.is_empty() => Some(dimension),
            _ => None,
        }
    }

    /// Detached relationships miss one of their two endpoints.
    pub fn is_detached(&self) -> bool {
        self.from.dataset.is_empty() || self.to.is_detached()
    }
}

impl RelationshipTo {
    pub fn is_detached(&self) -> bool {
        match self {
            RelationshipTo::RowSecurity { row_security } => row_security.is_empty(),
            RelationshipTo::Level { dimension, .. } => dimension.is_empty(),
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "from {{dataset: {}, join_columns: [{}]",
            self.from.dataset,
            self.from.join_columns.join(", ")
        )?;
        if let Some(hierarchy) = &self.from.hierarchy {
            write!(f, ", hierarchy: {hierarchy}")?;
        }
        if let Some(level) = &self.from.level {
            write!(f, ", level: {level}")?;
        }
        match &self.to {
            RelationshipTo::RowSecurity { row_security } => {
                write!(f, "}} to {{row_security: {row_security}}}")
            }
            RelationshipTo::Level { dimension, level } => {
                write!(f, "}} to {{dimension: {dimension}, level: {level}}}")
            }
        }
    }
}
