//! Object registry: the per-run index from unique name to SML object.
//!
//! The registry is built once from the caller's documents and is read-only
//! afterwards, so validation units can share it across threads. It borrows
//! the documents; nothing here copies or mutates an object.

pub mod tracker;

use smol_str::SmolStr;
use std::collections::HashMap;

use crate::diag::Diag;
use crate::model::{CompositeModel, Model, ObjectKind, SmlDocument, SmlObject};
pub use tracker::ReferenceTracker;

/// How the registry treats two documents declaring the same `unique_name`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateNamePolicy {
    /// Keep the first document and report an error against every later one.
    #[default]
    Reject,
    /// Silently keep the last document seen.
    LastWins,
}

/// A model-like object that lists metrics.
#[derive(Debug, Clone, Copy)]
pub enum MetricOwner<'a> {
    Model(&'a Model),
    Composite(&'a CompositeModel),
}

impl<'a> MetricOwner<'a> {
    pub fn unique_name(&self) -> &'a SmolStr {
        match self {
            MetricOwner::Model(model) => &model.unique_name,
            MetricOwner::Composite(composite) => &composite.unique_name,
        }
    }
}

/// Index from unique name to the document defining it.
#[derive(Debug)]
pub struct ObjectRegistry<'a> {
    documents: Vec<&'a SmlDocument>,
    by_name: HashMap<SmolStr, usize>,
    metric_owners: HashMap<SmolStr, Vec<usize>>,
}

impl<'a> ObjectRegistry<'a> {
    /// Builds the registry, returning diagnostics for rejected duplicates.
    pub fn build(documents: &'a [SmlDocument], policy: DuplicateNamePolicy) -> (Self, Vec<Diag>) {
        let mut registry = Self {
            documents: Vec::with_capacity(documents.len()),
            by_name: HashMap::with_capacity(documents.len()),
            metric_owners: HashMap::new(),
        };
        let mut diagnostics = Vec::new();

        for document in documents {
            let name = document.object.unique_name();
            match (registry.by_name.get(name).copied(), policy) {
                (None, _) => {
                    registry.by_name.insert(name.clone(), registry.documents.len());
                    registry.documents.push(document);
                }
                (Some(existing), DuplicateNamePolicy::Reject) => {
                    let first = registry.documents[existing];
                    diagnostics.push(
                        Diag::error(format!(
                            "Duplicate unique_name \"{}\": already defined by {} in {}",
                            name,
                            first.object.kind(),
                            first.source_path
                        ))
                        .with_source(&document.source_path)
                        .with_code("sml::duplicate_unique_name"),
                    );
                }
                (Some(existing), DuplicateNamePolicy::LastWins) => {
                    tracing::debug!(
                        unique_name = %name,
                        replaced = %registry.documents[existing].source_path,
                        by = %document.source_path,
                        "duplicate unique_name, keeping the later document"
                    );
                    registry.documents[existing] = document;
                }
            }
        }

        registry.index_metric_owners();
        tracing::debug!(
            objects = registry.documents.len(),
            rejected = diagnostics.len(),
            "object registry built"
        );
        (registry, diagnostics)
    }

    fn index_metric_owners(&mut self) {
        for (position, document) in self.documents.iter().enumerate() {
            let metrics = match &document.object {
                SmlObject::Model(model) => &model.metrics,
                SmlObject::CompositeModel(composite) => &composite.metrics,
                _ => continue,
            };
            for metric in metrics {
                let owners = self.metric_owners.entry(metric.unique_name.clone()).or_default();
                if !owners.contains(&position) {
                    owners.push(position);
                }
            }
        }
    }

    /// Looks up an object without marking it as referenced.
    pub fn get(&self, name: &str) -> Option<&'a SmlObject> {
        self.document(name).map(|d| &d.object)
    }

    pub fn document(&self, name: &str) -> Option<&'a SmlDocument> {
        self.by_name.get(name).map(|&i| self.documents[i])
    }

    pub fn kind_of(&self, name: &str) -> Option<ObjectKind> {
        self.get(name).map(SmlObject::kind)
    }

    /// Models and composite models listing `metric` among their metrics.
    pub fn metric_owners(&self, metric: &str) -> Vec<MetricOwner<'a>> {
        self.metric_owners
            .get(metric)
            .into_iter()
            .flatten()
            .filter_map(|&i| match &self.documents[i].object {
                SmlObject::Model(model) => Some(MetricOwner::Model(model)),
                SmlObject::CompositeModel(composite) => Some(MetricOwner::Composite(composite)),
                _ => None,
            })
            .collect()
    }

    /// All registered documents in input order.
    pub fn documents(&self) -> &[&'a SmlDocument] {
        &self.documents
    }

    /// All registered dimensions.
    pub fn dimensions(&self) -> impl Iterator<Item = &'a crate::model::Dimension> + '_ {
        self.documents
            .iter()
            .filter_map(|d| d.object.as_dimension())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
