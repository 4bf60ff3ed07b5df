//! End-to-end generation pipeline.
//!
//! Ties validation, strategy composition, per-function rendering and the
//! merge step together, and owns the output formats: one merged YAML
//! values document plus a JSON registry of the generated instances.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use log::info;
use serde::Serialize;
use serde_yaml::Mapping;

use crate::config::DeploymentConfig;
use crate::merge::merge_entries;
use crate::nf::{render, NfKind};
use crate::template::TemplateProvider;
use crate::topology::strategies;

/// One row of the instance registry written next to the values file.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceInfo {
    pub name: String,
    pub kind: NfKind,
}

/// Result of a generation run, prior to being written anywhere.
pub struct Deployment {
    pub values: Mapping,
    pub instances: Vec<InstanceInfo>,
}

/// Run the full pipeline for one validated configuration.
pub fn generate(
    config: &DeploymentConfig,
    templates: &dyn TemplateProvider,
) -> Result<Deployment> {
    config.validate()?;

    let mut rng = rand::thread_rng();
    let nfs = strategies::build(config, &mut rng)?;
    info!(
        "composed {} network function instance(s) across {} slice(s)",
        nfs.len(),
        config.topology.slices
    );

    let mut entries = Vec::with_capacity(nfs.len());
    let mut instances = Vec::with_capacity(nfs.len());
    for nf in &nfs {
        let (name, section) = render(nf.as_ref(), templates)?;
        instances.push(InstanceInfo {
            name: name.clone(),
            kind: nf.kind(),
        });
        entries.push((name, section));
    }

    let values = merge_entries(entries)?;
    info!("merged {} instance document(s)", values.len());
    Ok(Deployment { values, instances })
}

/// Destination for the merged values document.
pub trait ValuesSink {
    fn write(&mut self, values: &Mapping) -> Result<()>;
}

/// Writes the merged document as a single YAML file.
pub struct YamlFileSink {
    path: PathBuf,
}

impl YamlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ValuesSink for YamlFileSink {
    fn write(&mut self, values: &Mapping) -> Result<()> {
        let rendered = serde_yaml::to_string(values)?;
        fs::write(&self.path, rendered)
            .wrap_err_with(|| format!("failed to write {}", self.path.display()))?;
        info!("wrote values file: {}", self.path.display());
        Ok(())
    }
}

/// Writes the instance registry as pretty-printed JSON.
pub fn write_instance_registry(path: &Path, instances: &[InstanceInfo]) -> Result<()> {
    let rendered = serde_json::to_string_pretty(instances)?;
    fs::write(path, rendered)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    info!(
        "wrote instance registry ({} entries): {}",
        instances.len(),
        path.display()
    );
    Ok(())
}
