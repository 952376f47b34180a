//! Main semantic validator coordinating validation passes.

mod aggregator;
mod composite_validation;
mod dataset_validation;
mod dimension_validation;
mod format_validation;
mod measure_validation;
mod model_validation;
mod relationship_validation;
mod resolver;
mod semi_additive_validation;
mod time_validation;

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use rayon::prelude::*;

use crate::diag::{Diag, DiagSeverity};
use crate::model::{SmlDocument, SmlObject};
use crate::registry::{DuplicateNamePolicy, ObjectRegistry};

pub use aggregator::DiagnosticsAggregator;
pub use format_validation::{accepted_formats, allowed_calculation_methods, is_catalog_format};
pub use resolver::{ObjectReport, Resolver};

/// Configuration for semantic validation.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// What to do when two documents share a unique name.
    pub duplicate_names: DuplicateNamePolicy,

    /// Warn about non-root objects nothing references.
    pub warn_on_unused: bool,

    /// Validate objects on the rayon thread pool.
    pub parallel: bool,

    /// Emit an info diagnostic for every applied query-name override.
    pub report_overrides: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            duplicate_names: DuplicateNamePolicy::Reject,
            warn_on_unused: true,
            parallel: true,
            report_overrides: true,
        }
    }
}

/// Result of validating a repository.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    /// All diagnostics, grouped by source path in path order.
    pub diagnostics: Vec<Diag>,
}

impl ValidationOutcome {
    pub fn new(diagnostics: Vec<Diag>) -> Self {
        Self { diagnostics }
    }

    /// Returns true if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diag::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diag> {
        self.with_severity(DiagSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diag> {
        self.with_severity(DiagSeverity::Warning)
    }

    fn with_severity(&self, severity: DiagSeverity) -> impl Iterator<Item = &Diag> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }

    /// Diagnostics keyed by the document they belong to.
    pub fn by_source(&self) -> BTreeMap<&str, Vec<&Diag>> {
        let mut grouped: BTreeMap<&str, Vec<&Diag>> = BTreeMap::new();
        for diag in &self.diagnostics {
            grouped
                .entry(diag.source_path.as_str())
                .or_default()
                .push(diag);
        }
        grouped
    }
}

/// Main semantic validator coordinating all validation passes.
#[derive(Debug, Clone, Default)]
pub struct SemanticValidator {
    config: ValidationConfig,
}

impl SemanticValidator {
    /// Creates a new semantic validator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new semantic validator with custom configuration.
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn with_duplicate_names(mut self, policy: DuplicateNamePolicy) -> Self {
        self.config.duplicate_names = policy;
        self
    }

    pub fn with_unused_warnings(mut self, enabled: bool) -> Self {
        self.config.warn_on_unused = enabled;
        self
    }

    /// Validates objects sequentially when `false`. Output is identical either
    /// way.
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.config.parallel = enabled;
        self
    }

    pub fn with_override_reports(mut self, enabled: bool) -> Self {
        self.config.report_overrides = enabled;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates a set of parsed documents.
    ///
    /// # Passes
    ///
    /// 1. Registry - index objects by unique name, reject duplicates
    /// 2. Object validation - one independent unit per registered document
    /// 3. Aggregation - merge per-object diagnostics and referenced names
    /// 4. Unused sweep (optional) - warn about unreferenced non-root objects
    ///
    /// Validation never stops at the first error. The result is the same for
    /// any document order and for parallel or sequential execution.
    pub fn validate(&self, documents: &[SmlDocument]) -> ValidationOutcome {
        // Pass 1: Registry
        let (registry, rejected) = ObjectRegistry::build(documents, self.config.duplicate_names);

        // Pass 2: Object validation
        let reports: Vec<ObjectReport> = if self.config.parallel {
            registry
                .documents()
                .par_iter()
                .map(|document| validate_document(&registry, &self.config, document))
                .collect()
        } else {
            registry
                .documents()
                .iter()
                .map(|document| validate_document(&registry, &self.config, document))
                .collect()
        };

        // Pass 3: Aggregation
        let mut aggregator = DiagnosticsAggregator::new();
        aggregator.add_diagnostics(rejected);
        for report in reports {
            aggregator.add_report(report);
        }

        // Pass 4: Unused sweep
        if self.config.warn_on_unused {
            aggregator.sweep_unused(&registry);
        }

        let outcome = aggregator.finish();
        tracing::debug!(
            documents = documents.len(),
            objects = registry.len(),
            diagnostics = outcome.diagnostics.len(),
            errors = outcome.errors().count(),
            warnings = outcome.warnings().count(),
            infos = outcome.with_severity(DiagSeverity::Info).count(),
            "validation finished"
        );
        outcome
    }
}

/// Validates one document against the registry.
fn validate_document(
    registry: &ObjectRegistry<'_>,
    config: &ValidationConfig,
    document: &SmlDocument,
) -> ObjectReport {
    let mut resolver = Resolver::new(registry, config, &document.source_path);

    match &document.object {
        SmlObject::Dataset(dataset) => dataset_validation::validate_dataset(&mut resolver, dataset),
        SmlObject::RowSecurity(row_security) => {
            dataset_validation::validate_row_security(&mut resolver, row_security)
        }
        SmlObject::Catalog(catalog) => dataset_validation::validate_catalog(&mut resolver, catalog),
        SmlObject::Dimension(dimension) => {
            dimension_validation::validate_dimension(&mut resolver, dimension)
        }
        SmlObject::Measure(measure) => measure_validation::validate_measure(&mut resolver, measure),
        SmlObject::CalculatedMeasure(measure) => {
            measure_validation::validate_calculated_measure(&mut resolver, measure)
        }
        SmlObject::Model(model) => model_validation::validate_model(&mut resolver, model),
        SmlObject::CompositeModel(composite) => {
            composite_validation::validate_composite_model(&mut resolver, composite)
        }
        SmlObject::Connection(_) | SmlObject::ModelSettings(_) | SmlObject::GlobalSettings(_) => {}
    }

    let report = resolver.finish();
    tracing::trace!(
        object = %document.object.unique_name(),
        kind = %document.object.kind(),
        diagnostics = report.diagnostics.len(),
        references = report.references.len(),
        "object validated"
    );
    report
}

/// Groups items by key, keeping first-appearance order of groups and items.
pub(super) fn group_by_key<K: Hash + Eq, T>(items: impl IntoIterator<Item = (K, T)>) -> Vec<Vec<T>> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<T>> = Vec::new();
    for (key, item) in items {
        match index.get(&key) {
            Some(&position) => groups[position].push(item),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![item]);
            }
        }
    }
    groups
}

/// First item and size of every group with more than one member.
pub(super) fn duplicate_groups<K: Hash + Eq, T>(
    items: impl IntoIterator<Item = (K, T)>,
) -> Vec<(T, usize)> {
    group_by_key(items)
        .into_iter()
        .filter(|group| group.len() > 1)
        .filter_map(|group| {
            let count = group.len();
            group.into_iter().next().map(|first| (first, count))
        })
        .collect()
}
