//! Cross-document semantic validation for SML repositories.
//!
//! Structural (schema) validation of each document happens before this
//! module runs. The semantic validator checks everything that needs more
//! than one document to decide:
//! - References between objects resolve to an object of the expected kind
//! - Relationship endpoints, join-key arity, and duplicates
//! - Degenerate dimension consistency and time hierarchy ordering
//! - Format and calculation-method compatibility with column types
//! - Model and composite model metric, override, and query-name uniqueness
//! - Semi-additive measure wiring
//! - Objects that nothing references
//!
//! # Architecture
//!
//! Every document is an independent validation unit. A unit owns a
//! [`validator::Resolver`] that looks names up in the shared, read-only
//! [`crate::registry::ObjectRegistry`] and records the names it resolved.
//! Units run in parallel; their reports are merged afterwards, and only then
//! is the unused-object sweep performed.
//!
//! # Example
//!
//! ```
//! use sml_validator::parser::parse_str;
//! use sml_validator::semantic::SemanticValidator;
//!
//! let documents = vec![
//!     parse_str("warehouse.yml", "object_type: connection\nunique_name: warehouse").unwrap(),
//!     parse_str(
//!         "orders.yml",
//!         "object_type: dataset\nunique_name: orders\nconnection_id: warehouse",
//!     )
//!     .unwrap(),
//! ];
//!
//! let outcome = SemanticValidator::new().validate(&documents);
//! assert!(!outcome.has_errors());
//! // Nothing uses the dataset yet.
//! assert_eq!(outcome.warnings().count(), 1);
//! ```

pub mod diag;
pub mod validator;

pub use diag::{SmlDiagBuilder, SmlDiagKind};
pub use validator::{SemanticValidator, ValidationConfig, ValidationOutcome};
