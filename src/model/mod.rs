//! SML object model.
//!
//! Every SML document describes exactly one object. The `object_type` field
//! selects the variant of [`SmlObject`]; all variants carry a `unique_name`
//! that identifies the object across the whole repository.
//!
//! The types here assume the document already passed structural (schema)
//! validation: required fields exist and have the right primitive types.

pub mod dataset;
pub mod dimension;
pub mod measure;
pub mod models;
pub mod relationship;
pub mod settings;
pub mod types;

use serde::Deserialize;
use smol_str::SmolStr;
use std::fmt;

pub use dataset::{Alternate, AlternateKind, Column, Dataset, Incremental, MapColumn};
pub use dimension::{
    CalculatedMember, CalculationGroup, ColumnSource, CustomEmptyMember, Dimension, Hierarchy,
    Level, LevelAlias, LevelAttribute, LevelAttributeSource, ParallelPeriod, SecondaryAttribute,
    SharedDegenerateColumn,
};
pub use measure::{
    CalculatedMeasure, DegenerateLevelRef, Measure, RelationshipChain, SemiAdditive,
    SemiAdditivePosition,
};
pub use models::{Aggregate, AttributeRef, CompositeModel, Drillthrough, Model, ModelMetric, Override};
pub use relationship::{Relationship, RelationshipFrom, RelationshipTo};
pub use settings::{Catalog, Connection, DatasetProperties, GlobalSettings, ModelSettings, RowSecurity};
pub use types::{CalculationMethod, DataType, DimensionType, TimeUnit};

/// Discriminant of an [`SmlObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Connection,
    Dataset,
    Dimension,
    Measure,
    CalculatedMeasure,
    Model,
    CompositeModel,
    Catalog,
    RowSecurity,
    ModelSettings,
    GlobalSettings,
}

impl ObjectKind {
    /// Name used in diagnostic messages.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Connection => "connection",
            ObjectKind::Dataset => "dataset",
            ObjectKind::Dimension => "dimension",
            ObjectKind::Measure => "metric",
            ObjectKind::CalculatedMeasure => "calculated metric",
            ObjectKind::Model => "model",
            ObjectKind::CompositeModel => "composite model",
            ObjectKind::Catalog => "catalog",
            ObjectKind::RowSecurity => "row security",
            ObjectKind::ModelSettings => "model settings",
            ObjectKind::GlobalSettings => "global settings",
        }
    }

    /// Root kinds are entry points of a repository and are never reported as
    /// unused.
    pub fn is_root(self) -> bool {
        matches!(
            self,
            ObjectKind::Model
                | ObjectKind::CompositeModel
                | ObjectKind::Catalog
                | ObjectKind::ModelSettings
                | ObjectKind::GlobalSettings
        )
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declaratively described SML entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "object_type", rename_all = "snake_case")]
pub enum SmlObject {
    Connection(Connection),
    Dataset(Dataset),
    Dimension(Dimension),
    #[serde(rename = "metric")]
    Measure(Measure),
    #[serde(rename = "metric_calc")]
    CalculatedMeasure(CalculatedMeasure),
    Model(Model),
    CompositeModel(CompositeModel),
    Catalog(Catalog),
    RowSecurity(RowSecurity),
    ModelSettings(ModelSettings),
    GlobalSettings(GlobalSettings),
}

impl SmlObject {
    pub fn unique_name(&self) -> &SmolStr {
        match self {
            SmlObject::Connection(o) => &o.unique_name,
            SmlObject::Dataset(o) => &o.unique_name,
            SmlObject::Dimension(o) => &o.unique_name,
            SmlObject::Measure(o) => &o.unique_name,
            SmlObject::CalculatedMeasure(o) => &o.unique_name,
            SmlObject::Model(o) => &o.unique_name,
            SmlObject::CompositeModel(o) => &o.unique_name,
            SmlObject::Catalog(o) => &o.unique_name,
            SmlObject::RowSecurity(o) => &o.unique_name,
            SmlObject::ModelSettings(o) => &o.unique_name,
            SmlObject::GlobalSettings(o) => &o.unique_name,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            SmlObject::Connection(_) => ObjectKind::Connection,
            SmlObject::Dataset(_) => ObjectKind::Dataset,
            SmlObject::Dimension(_) => ObjectKind::Dimension,
            SmlObject::Measure(_) => ObjectKind::Measure,
            SmlObject::CalculatedMeasure(_) => ObjectKind::CalculatedMeasure,
            SmlObject::Model(_) => ObjectKind::Model,
            SmlObject::CompositeModel(_) => ObjectKind::CompositeModel,
            SmlObject::Catalog(_) => ObjectKind::Catalog,
            SmlObject::RowSecurity(_) => ObjectKind::RowSecurity,
            SmlObject::ModelSettings(_) => ObjectKind::ModelSettings,
            SmlObject::GlobalSettings(_) => ObjectKind::GlobalSettings,
        }
    }

    pub fn as_dataset(&self) -> Option<&Dataset> {
        match self {
            SmlObject::Dataset(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn as_dimension(&self) -> Option<&Dimension> {
        match self {
            SmlObject::Dimension(dimension) => Some(dimension),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            SmlObject::Model(model) => Some(model),
            _ => None,
        }
    }
}

/// An SML object together with the path of the document it came from.
#[derive(Debug, Clone)]
pub struct SmlDocument {
    pub source_path: String,
    pub object: SmlObject,
}

impl SmlDocument {
    pub fn new(source_path: impl Into<String>, object: SmlObject) -> Self {
        Self {
            source_path: source_path.into(),
            object,
        }
    }
}
