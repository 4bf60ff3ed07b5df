use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs;
use std::path::PathBuf;

use slicenet::config::load_config;
use slicenet::orchestrator::{self, ValuesSink, YamlFileSink};
use slicenet::template::{BuiltinTemplates, DirTemplates, TemplateProvider};

/// Configuration generator for sliced 5G core deployments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the deployment configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for the values file and instance registry
    #[arg(short, long, default_value = "5gc")]
    output: PathBuf,

    /// Directory of per-function config skeletons (<kind>.yaml per function)
    #[arg(short, long)]
    templates: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Configuration file: {:?}", args.config);
    info!("Output directory: {:?}", args.output);

    let config = load_config(&args.config)?;

    let templates: Box<dyn TemplateProvider> = match &args.templates {
        Some(dir) => {
            info!("Using config skeletons from {:?}", dir);
            Box::new(DirTemplates::new(dir.clone()))
        }
        None => Box::new(BuiltinTemplates::default()),
    };

    let deployment = orchestrator::generate(&config, templates.as_ref())?;

    fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", args.output.display()))?;

    let values_path = args.output.join("values.yaml");
    YamlFileSink::new(&values_path).write(&deployment.values)?;

    let registry_path = args.output.join("instances.json");
    orchestrator::write_instance_registry(&registry_path, &deployment.instances)?;

    info!(
        "Generated {} network function instance(s): {:?}",
        deployment.instances.len(),
        values_path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["slicenet", "--config", "deploy.yaml"]);

        assert_eq!(args.config, PathBuf::from("deploy.yaml"));
        assert_eq!(args.output, PathBuf::from("5gc"));
        assert!(args.templates.is_none());
    }

    #[test]
    fn test_template_dir_arg() {
        let args = Args::parse_from([
            "slicenet",
            "--config",
            "deploy.yaml",
            "--templates",
            "skeletons",
        ]);

        assert_eq!(args.templates, Some(PathBuf::from("skeletons")));
    }
}
