//! Merges per-object reports and sweeps for unused objects.

use std::collections::BTreeMap;

use super::ValidationOutcome;
use super::resolver::ObjectReport;
use crate::diag::Diag;
use crate::registry::{ObjectRegistry, ReferenceTracker};
use crate::semantic::diag::SmlDiagBuilder;

/// Collects diagnostics keyed by source document.
#[derive(Debug, Default)]
pub struct DiagnosticsAggregator {
    by_source: BTreeMap<String, Vec<Diag>>,
    references: ReferenceTracker,
}

impl DiagnosticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one object's diagnostics and referenced names.
    pub fn add_report(&mut self, report: ObjectReport) {
        self.add_diagnostics(report.diagnostics);
        self.references.merge(report.references);
    }

    pub fn add_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diag>) {
        for diag in diagnostics {
            self.by_source
                .entry(diag.source_path.clone())
                .or_default()
                .push(diag);
        }
    }

    pub fn references(&self) -> &ReferenceTracker {
        &self.references
    }

    /// Warns once for every registered non-root object that no report
    /// referenced. Must run after all reports are added.
    pub fn sweep_unused(&mut self, registry: &ObjectRegistry<'_>) {
        let unused: Vec<Diag> = registry
            .documents()
            .iter()
            .filter(|document| {
                let kind = document.object.kind();
                !kind.is_root() && !self.references.is_referenced(document.object.unique_name())
            })
            .map(|document| {
                SmlDiagBuilder::unused_object(document.object.kind(), document.object.unique_name())
                    .build()
                    .with_source(&document.source_path)
            })
            .collect();
        tracing::debug!(unused = unused.len(), "unused object sweep finished");
        self.add_diagnostics(unused);
    }

    pub fn finish(self) -> ValidationOutcome {
        ValidationOutcome::new(self.by_source.into_values().flatten().collect())
    }
}
