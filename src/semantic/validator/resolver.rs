//! Reference resolution for one validation unit.
//!
//! A [`Resolver`] is created per validated object. It is the only way a
//! validator crosses a reference: it looks the name up in the registry,
//! checks the kind, reports a diagnostic on failure, and records the name as
//! referenced on success. Diagnostics and referenced names stay local to the
//! resolver until [`Resolver::finish`] hands them to the aggregator.

use smol_str::SmolStr;

use super::ValidationConfig;
use crate::diag::Diag;
use crate::model::{Dataset, Dimension, Model, ObjectKind, RowSecurity, SmlObject};
use crate::registry::{ObjectRegistry, ReferenceTracker};
use crate::semantic::diag::SmlDiagBuilder;

/// Output of one validation unit.
#[derive(Debug, Default)]
pub struct ObjectReport {
    pub diagnostics: Vec<Diag>,
    pub references: ReferenceTracker,
}

/// Resolves references on behalf of the object being validated.
pub struct Resolver<'r, 'a> {
    registry: &'r ObjectRegistry<'a>,
    config: &'r ValidationConfig,
    source_path: &'a str,
    diagnostics: Vec<Diag>,
    references: ReferenceTracker,
}

impl<'r, 'a> Resolver<'r, 'a> {
    /// Creates a resolver attributing its diagnostics to `source_path`.
    pub fn new(
        registry: &'r ObjectRegistry<'a>,
        config: &'r ValidationConfig,
        source_path: &'a str,
    ) -> Self {
        Self {
            registry,
            config,
            source_path,
            diagnostics: Vec::new(),
            references: ReferenceTracker::new(),
        }
    }

    /// Resolves `name` to an object of kind `expected`.
    ///
    /// Reports an error and returns `None` if the name is unknown or points
    /// to another kind. Marks the name as referenced on success.
    pub fn resolve(&mut self, name: &SmolStr, expected: ObjectKind) -> Option<&'a SmlObject> {
        self.resolve_any(name, &[expected])
    }

    /// Resolves `name` to an object of any of the `expected` kinds.
    ///
    /// Error messages name the first expected kind. An empty `expected`
    /// resolves nothing.
    pub fn resolve_any(
        &mut self,
        name: &SmolStr,
        expected: &[ObjectKind],
    ) -> Option<&'a SmlObject> {
        let &primary = expected.first()?;
        let Some(object) = self.registry.get(name) else {
            self.report(SmlDiagBuilder::unknown_reference(primary, name));
            return None;
        };
        let actual = object.kind();
        if !expected.contains(&actual) {
            self.report(SmlDiagBuilder::incorrect_reference(primary, name, actual));
            return None;
        }
        self.references.mark(name);
        Some(object)
    }

    pub fn dataset(&mut self, name: &SmolStr) -> Option<&'a Dataset> {
        match self.resolve(name, ObjectKind::Dataset)? {
            SmlObject::Dataset(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn dimension(&mut self, name: &SmolStr) -> Option<&'a Dimension> {
        match self.resolve(name, ObjectKind::Dimension)? {
            SmlObject::Dimension(dimension) => Some(dimension),
            _ => None,
        }
    }

    pub fn model(&mut self, name: &SmolStr) -> Option<&'a Model> {
        match self.resolve(name, ObjectKind::Model)? {
            SmlObject::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn row_security(&mut self, name: &SmolStr) -> Option<&'a RowSecurity> {
        match self.resolve(name, ObjectKind::RowSecurity)? {
            SmlObject::RowSecurity(row_security) => Some(row_security),
            _ => None,
        }
    }

    /// Looks up a dataset without reporting or marking anything.
    ///
    /// Used by checks that run after the reference itself was resolved and
    /// must not repeat its diagnostics.
    pub fn peek_dataset(&self, name: &str) -> Option<&'a Dataset> {
        self.registry.get(name).and_then(SmlObject::as_dataset)
    }

    /// Looks up a dimension without reporting or marking anything.
    pub fn peek_dimension(&self, name: &str) -> Option<&'a Dimension> {
        self.registry.get(name).and_then(SmlObject::as_dimension)
    }

    pub fn registry(&self) -> &'r ObjectRegistry<'a> {
        self.registry
    }

    pub fn config(&self) -> &'r ValidationConfig {
        self.config
    }

    /// Records a diagnostic against the current document.
    pub fn report(&mut self, diag: SmlDiagBuilder) {
        self.diagnostics
            .push(diag.build().with_source(self.source_path));
    }

    pub fn diagnostics(&self) -> &[Diag] {
        &self.diagnostics
    }

    pub fn references(&self) -> &ReferenceTracker {
        &self.references
    }

    pub fn finish(self) -> ObjectReport {
        ObjectReport {
            diagnostics: self.diagnostics,
            references: self.references,
        }
    }
}
