//! Configuration tree merger.
//!
//! Folds every descriptor's `(instanceName, document)` entry into the single
//! values mapping the chart rendering consumes. Instance names must be
//! globally unique: a collision is an error, never a silent overwrite.

use serde_yaml::{Mapping, Value};

/// Merge errors
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("duplicate instance name '{0}' in generated configuration tree")]
    DuplicateInstanceName(String),
}

/// Fold the ordered descriptor entries into one values mapping.
pub fn merge_entries(
    entries: impl IntoIterator<Item = (String, Value)>,
) -> Result<Mapping, MergeError> {
    let mut values = Mapping::new();
    for (name, document) in entries {
        if values.insert(Value::from(name.clone()), document).is_some() {
            return Err(MergeError::DuplicateInstanceName(name));
        }
    }
    Ok(values)
}
