//! Semantic diagnostics extending the base diagnostic system.
//!
//! This module provides the categories of semantic findings and builders for
//! the messages shared by several validators.

use crate::diag::{Diag, DiagContext, DiagSeverity};
use crate::model::ObjectKind;

/// Categories of semantic findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmlDiagKind {
    /// Reference to a unique name that is not registered.
    UnknownReference,

    /// Reference to an object of the wrong kind.
    IncorrectReference,

    /// Column missing from the referenced dataset.
    MissingColumn,

    /// Relationship missing one of its endpoints.
    DetachedRelationship,

    /// Join column count differs from the key arity of the target level.
    KeyArityMismatch,

    /// Two or more definitions with the same identity.
    Duplicate,

    /// Reference to a hierarchy, level, or attribute that does not exist.
    UnknownMember,

    /// Level attributes mix single-dataset and multi-dataset shapes.
    MixedLevelAttributes,

    /// Shared degenerate columns disagree on type or shape.
    InconsistentSharedColumns,

    /// Dataset not used by every multi-dataset level attribute.
    SharedDatasetUsage,

    /// Degenerate flag contradicts the way a dimension is used.
    DegenerateMismatch,

    /// Time unit missing or hierarchy granularity out of order.
    TimeHierarchy,

    /// Invalid parallel period.
    ParallelPeriod,

    /// Custom empty member missing a sort name.
    CustomEmptyMember,

    /// Format not applicable to, or not compatible with, a column type.
    Formatting,

    /// Calculation method not allowed for a column type.
    CalculationMethod,

    /// Override or query name problem.
    QueryName,

    /// Composite model constraint violation.
    CompositeModel,

    /// Semi-additive definition problem.
    SemiAdditive,

    /// Object never referenced by anything.
    UnusedObject,

    /// Property no longer honored.
    ObsoleteProperty,
}

impl SmlDiagKind {
    /// Returns the stable diagnostic code of this kind.
    pub fn code(self) -> &'static str {
        match self {
            Self::UnknownReference => "sml::unknown_reference",
            Self::IncorrectReference => "sml::incorrect_reference",
            Self::MissingColumn => "sml::missing_column",
            Self::DetachedRelationship => "sml::detached_relationship",
            Self::KeyArityMismatch => "sml::key_arity_mismatch",
            Self::Duplicate => "sml::duplicate",
            Self::UnknownMember => "sml::unknown_member",
            Self::MixedLevelAttributes => "sml::mixed_level_attributes",
            Self::InconsistentSharedColumns => "sml::inconsistent_shared_columns",
            Self::SharedDatasetUsage => "sml::shared_dataset_usage",
            Self::DegenerateMismatch => "sml::degenerate_mismatch",
            Self::TimeHierarchy => "sml::time_hierarchy",
            Self::ParallelPeriod => "sml::parallel_period",
            Self::CustomEmptyMember => "sml::custom_empty_member",
            Self::Formatting => "sml::formatting",
            Self::CalculationMethod => "sml::calculation_method",
            Self::QueryName => "sml::query_name",
            Self::CompositeModel => "sml::composite_model",
            Self::SemiAdditive => "sml::semi_additive",
            Self::UnusedObject => "sml::unused_object",
            Self::ObsoleteProperty => "sml::obsolete_property",
        }
    }
}

/// Builder for semantic diagnostics.
pub struct SmlDiagBuilder {
    kind: SmlDiagKind,
    message: String,
    severity: DiagSeverity,
    context: Option<DiagContext>,
    help: Option<String>,
    notes: Vec<String>,
}

impl SmlDiagBuilder {
    /// Creates a new error builder.
    pub fn new(kind: SmlDiagKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: DiagSeverity::Error,
            context: None,
            help: None,
            notes: Vec::new(),
        }
    }

    /// Sets the diagnostic severity.
    pub fn with_severity(mut self, severity: DiagSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_context(mut self, context: DiagContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a note to the diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Builds the diagnostic. The source path is attached by the caller.
    pub fn build(self) -> Diag {
        let mut diag = Diag::new(self.severity, self.message).with_code(self.kind.code());
        diag.context = self.context;
        diag.help = self.help;
        diag.notes = self.notes;
        diag
    }
}

/// Helper functions for creating common semantic diagnostics.
impl SmlDiagBuilder {
    /// `<kind> "<name>" does not exist`
    pub fn unknown_reference(kind: ObjectKind, name: &str) -> Self {
        Self::new(
            SmlDiagKind::UnknownReference,
            format!("{kind} \"{name}\" does not exist"),
        )
    }

    /// `Incorrect <kind> reference. <kind> "<name>" points to <actual>`
    pub fn incorrect_reference(expected: ObjectKind, name: &str, actual: ObjectKind) -> Self {
        Self::new(
            SmlDiagKind::IncorrectReference,
            format!("Incorrect {expected} reference. {expected} \"{name}\" points to {actual}"),
        )
    }

    pub fn missing_column(column: &str, dataset: &str) -> Self {
        Self::new(
            SmlDiagKind::MissingColumn,
            format!("Non-existing column \"{column}\" in dataset \"{dataset}\""),
        )
    }

    /// Emits one error for a group of `count` identical definitions.
    pub fn duplicate(what: &str, count: usize, representative: impl std::fmt::Display) -> Self {
        Self::new(
            SmlDiagKind::Duplicate,
            format!("Duplicate {what} ({count} definitions): {representative}"),
        )
    }

    pub fn unknown_member(what: &str, name: &str, owner: &str) -> Self {
        Self::new(
            SmlDiagKind::UnknownMember,
            format!("{what} \"{name}\" does not exist in \"{owner}\""),
        )
    }

    pub fn unused_object(kind: ObjectKind, name: &str) -> Self {
        Self::new(
            SmlDiagKind::UnusedObject,
            format!("file not in use: {kind} \"{name}\" is not referenced by any object"),
        )
        .with_severity(DiagSeverity::Warning)
    }

    pub fn obsolete_property(property: &str, owner: &str) -> Self {
        Self::new(
            SmlDiagKind::ObsoleteProperty,
            format!("obsolete property \"{property}\" in \"{owner}\" has no effect"),
        )
        .with_severity(DiagSeverity::Warning)
        .with_help(format!("remove \"{property}\""))
    }
}
