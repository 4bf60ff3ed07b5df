//! Template provider seam.
//!
//! The composer never owns the skeleton documents it overlays; it asks a
//! `TemplateProvider` for a deep-copyable base document per function kind.
//! Two providers are shipped: built-in minimal skeletons (enough for tests
//! and plain deployments) and a directory-backed provider reading the chart
//! value templates from disk.

use crate::nf::NfKind;
use serde_yaml::Value;
use std::path::PathBuf;

/// Template loading errors
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template for {kind} lacks a top-level '{key}' section", key = .kind.key())]
    MissingSection { kind: NfKind },
    #[error("failed to read template for {kind}: {source}")]
    Io {
        kind: NfKind,
        source: std::io::Error,
    },
    #[error("failed to parse template for {kind}: {source}")]
    Parse {
        kind: NfKind,
        source: serde_yaml::Error,
    },
}

/// Source of skeleton documents, one per function kind.
///
/// Implementations must return an independent copy on every call; the
/// composer mutates what it receives.
pub trait TemplateProvider {
    fn skeleton(&self, kind: NfKind) -> Result<Value, TemplateError>;
}

/// Minimal built-in skeletons: an enabled chart section with an empty config.
#[derive(Debug, Default)]
pub struct BuiltinTemplates;

impl TemplateProvider for BuiltinTemplates {
    fn skeleton(&self, kind: NfKind) -> Result<Value, TemplateError> {
        let yaml = format!("{}:\n  enabled: true\n  config: {{}}\n", kind.key());
        serde_yaml::from_str(&yaml).map_err(|source| TemplateError::Parse { kind, source })
    }
}

/// Skeletons read from `<dir>/<kind>.yaml`, the chart template layout.
#[derive(Debug)]
pub struct DirTemplates {
    dir: PathBuf,
}

impl DirTemplates {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl TemplateProvider for DirTemplates {
    fn skeleton(&self, kind: NfKind) -> Result<Value, TemplateError> {
        let path = self.dir.join(format!("{}.yaml", kind.key()));
        let contents =
            std::fs::read_to_string(&path).map_err(|source| TemplateError::Io { kind, source })?;
        serde_yaml::from_str(&contents).map_err(|source| TemplateError::Parse { kind, source })
    }
}
