//! Set of object names proven reachable during a validation run.

use smol_str::SmolStr;
use std::collections::HashSet;

/// Names marked as referenced by successful resolutions.
///
/// Each validation unit owns its own tracker; trackers are merged once all
/// units finish, so the final set does not depend on processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTracker {
    names: HashSet<SmolStr>,
}

impl ReferenceTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a name as referenced. Marking twice is a no-op.
    pub fn mark(&mut self, name: &SmolStr) {
        if !self.names.contains(name) {
            self.names.insert(name.clone());
        }
    }

    /// Checks if a name was marked.
    pub fn is_referenced(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Folds another tracker into this one.
    pub fn merge(&mut self, other: ReferenceTracker) {
        if self.names.is_empty() {
            self.names = other.names;
        } else {
            self.names.extend(other.names);
        }
    }

    /// Returns the number of distinct referenced names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns all referenced names in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> {
        self.names.iter()
    }
}
