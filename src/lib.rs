//! Semantic validator for SML (Semantic Modeling Language) repositories.
//!
//! An SML repository is a directory of YAML documents, each describing one
//! object: connections, datasets, dimensions, metrics, models, and so on.
//! This crate loads those documents and checks the cross-document rules a
//! repository must satisfy before it can be published, reporting every
//! problem as a [`Diag`] attributed to the document it was found in.
//!
//! # Example
//!
//! ```
//! use sml_validator::{parse_str, validate};
//!
//! let documents = vec![
//!     parse_str(
//!         "orders.yml",
//!         "object_type: dataset\nunique_name: orders\nconnection_id: warehouse",
//!     )
//!     .unwrap(),
//! ];
//!
//! let outcome = validate(&documents);
//! assert!(outcome.has_errors());
//! assert_eq!(
//!     outcome.errors().next().unwrap().message,
//!     "connection \"warehouse\" does not exist"
//! );
//! ```

pub mod diag;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;
pub mod semantic;

pub use diag::{Diag, DiagContext, DiagSeverity};
pub use error::ParseError;
pub use model::{ObjectKind, SmlDocument, SmlObject};
pub use parser::{parse_file, parse_str};
pub use registry::{DuplicateNamePolicy, ObjectRegistry};
pub use semantic::{SemanticValidator, ValidationConfig, ValidationOutcome};

/// Validates documents with the default configuration.
pub fn validate(documents: &[SmlDocument]) -> ValidationOutcome {
    SemanticValidator::new().validate(documents)
}
