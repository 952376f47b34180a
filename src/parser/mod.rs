//! SML document loader
//!
//! Transforms YAML documents into [`SmlDocument`]s.

use std::path::Path;

use crate::error::ParseError;
use crate::model::{SmlDocument, SmlObject};

/// Parse one SML document from a file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<SmlDocument, ParseError> {
    let path_str = path.as_ref().display().to_string();
    let contents = std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
        path: path_str.clone(),
        source: e,
    })?;
    parse_str(path_str, &contents)
}

/// Parse one SML document from a YAML string, attributing it to `source_path`
pub fn parse_str(source_path: impl Into<String>, yaml: &str) -> Result<SmlDocument, ParseError> {
    let source_path = source_path.into();
    match serde_yaml::from_str::<SmlObject>(yaml) {
        Ok(object) => Ok(SmlDocument::new(source_path, object)),
        Err(source) => Err(ParseError::Yaml {
            path: source_path,
            source,
        }),
    }
}
