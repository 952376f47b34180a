//! Diagnostic model for semantic validation errors, warnings, and infos.

use miette::{Diagnostic, Report, Severity};
use serde::Serialize;
use smol_str::SmolStr;
use std::fmt;

/// Severity level for a diagnostic.
///
/// Errors block publishing of the repository, warnings are advisory, and
/// infos only report noteworthy facts (for example an applied override).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagSeverity {
    /// A violation that must be fixed before publishing.
    Error,
    /// A suspicious but tolerated construct.
    Warning,
    /// Purely informational.
    Info,
}

impl fmt::Display for DiagSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagSeverity::Error => write!(f, "error"),
            DiagSeverity::Warning => write!(f, "warning"),
            DiagSeverity::Info => write!(f, "info"),
        }
    }
}

/// Pinpoints the sub-element of a dimension a diagnostic refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiagContext {
    /// A level inside a hierarchy.
    Level {
        dimension: SmolStr,
        hierarchy: SmolStr,
        level: SmolStr,
    },
    /// A level attribute of a dimension.
    LevelAttribute {
        dimension: SmolStr,
        level_attribute: SmolStr,
    },
    /// A secondary attribute attached to a hierarchy level.
    SecondaryAttribute {
        dimension: SmolStr,
        hierarchy: SmolStr,
        level: SmolStr,
        secondary_attribute: SmolStr,
    },
    /// An alias attached to a hierarchy level.
    LevelAlias {
        dimension: SmolStr,
        hierarchy: SmolStr,
        level: SmolStr,
        alias: SmolStr,
    },
}

/// A structured diagnostic message attributed to one source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diag {
    /// The severity level of this diagnostic.
    pub severity: DiagSeverity,
    /// The main diagnostic message.
    pub message: String,
    /// Path of the document the offending object was loaded from.
    pub source_path: String,
    /// Optional sub-element locator for tooling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<DiagContext>,
    /// Optional help text suggesting how to fix the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Additional notes providing context or related information.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Optional diagnostic code (e.g., "sml::unknown_reference").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diag {
    /// Creates a new diagnostic with the given severity and message.
    pub fn new(severity: DiagSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            source_path: String::new(),
            context: None,
            help: None,
            notes: Vec::new(),
            code: None,
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Error, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Warning, message)
    }

    /// Creates a new info diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagSeverity::Info, message)
    }

    /// Attributes this diagnostic to a source document.
    pub fn with_source(mut self, source_path: impl Into<String>) -> Self {
        self.source_path = source_path.into();
        self
    }

    /// Attaches a sub-element locator.
    pub fn with_context(mut self, context: DiagContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagSeverity::Error
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.source_path, self.severity, self.message)
    }
}

/// Serializes diagnostics as a JSON array for downstream tooling.
pub fn diagnostics_to_json(diagnostics: &[Diag]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diagnostics)
}

/// Converts diagnostics to miette Reports.
pub fn convert_diagnostics_to_reports(diagnostics: &[Diag]) -> Vec<Report> {
    diagnostics.iter().map(convert_diag_to_report).collect()
}

/// Converts a single diagnostic to a miette Report.
///
/// Severity, help text, code, and notes are preserved; the source path is
/// rendered as the first related note so it survives any report handler.
pub fn convert_diag_to_report(diag: &Diag) -> Report {
    Report::new(build_diagnostic(diag))
}

fn build_diagnostic(diag: &Diag) -> BuiltDiagnostic {
    let mut related = Vec::with_capacity(diag.notes.len() + 1);
    if !diag.source_path.is_empty() {
        related.push(NoteDiagnostic::new(format!("in {}", diag.source_path)));
    }
    related.extend(diag.notes.iter().cloned().map(NoteDiagnostic::new));

    BuiltDiagnostic {
        message: diag.message.clone(),
        severity: match diag.severity {
            DiagSeverity::Error => Severity::Error,
            DiagSeverity::Warning => Severity::Warning,
            DiagSeverity::Info => Severity::Advice,
        },
        code: diag.code.clone(),
        help: diag.help.clone(),
        related,
    }
}

/// The final diagnostic type that implements miette's Diagnostic trait.
#[derive(Debug)]
struct BuiltDiagnostic {
    message: String,
    severity: Severity,
    code: Option<String>,
    help: Option<String>,
    related: Vec<NoteDiagnostic>,
}

#[derive(Debug)]
struct NoteDiagnostic {
    message: String,
}

impl NoteDiagnostic {
    fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for NoteDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for BuiltDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuiltDiagnostic {}
impl std::error::Error for NoteDiagnostic {}

impl Diagnostic for BuiltDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            None
        } else {
            Some(Box::new(
                self.related.iter().map(|diag| diag as &dyn Diagnostic),
            ))
        }
    }
}

impl Diagnostic for NoteDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Advice)
    }
}
