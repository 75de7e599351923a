use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{ConfigFile, FilterSettings, ModuleFilterConfig};
use crate::error::{ConfigurationError, IoError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    List,
}

#[derive(Parser, Debug)]
#[command(name = "testscope")]
#[command(about = "Select the test cases affected by a set of modules", long_about = None)]
pub struct Args {
    /// Test-case catalog (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Directory of constraint, test step and page manifests
    #[arg(long, value_name = "DIR")]
    pub artifacts: Option<PathBuf>,

    /// Comma-separated target modules (overrides config file and $module_filter)
    #[arg(short, long, value_name = "MODULES")]
    pub modules: Option<String>,

    /// Only select test cases owned by a target module (overrides $module_filter_strict)
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub strict: Option<String>,

    /// Config file with module_filter / module_filter_strict (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'O', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output format (json, list)
    #[arg(short = 'f', long, default_value = "list")]
    pub format: OutputFormat,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        validate_file(&self.catalog)?;
        if let Some(ref config_path) = self.config {
            if !config_path.exists() {
                return Err(IoError::file_not_found(config_path).into());
            }
        }
        if let Some(ref artifacts) = self.artifacts {
            if !artifacts.is_dir() {
                return Err(IoError::directory_not_found(artifacts).into());
            }
        }
        Ok(())
    }

    fn cli_settings(&self) -> FilterSettings {
        FilterSettings {
            module_filter: self.modules.clone(),
            strict: self.strict.clone(),
        }
    }

    /// Session config from flags, then the config file, then the environment.
    pub fn filter_config(&self, env: FilterSettings) -> Result<ModuleFilterConfig> {
        let file = match self.config {
            Some(ref path) => ConfigFile::load(path)?.into_settings(),
            None => FilterSettings::default(),
        };
        let settings = self.cli_settings().or(file).or(env);
        let config = ModuleFilterConfig::from_settings(&settings)?;

        if !config.is_empty() && !config.is_strict() && self.artifacts.is_none() {
            let modules: Vec<&str> = config.target_modules().iter().map(|m| m.as_str()).collect();
            return Err(ConfigurationError::missing_artifact_source(modules.join(", ")).into());
        }
        Ok(config)
    }
}

pub fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(IoError::file_not_found(path).into());
    }
    if !path.is_file() {
        anyhow::bail!("Path is not a file: {}", path.display());
    }
    std::fs::metadata(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    Ok(())
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::List => "list",
        }
    }
}
