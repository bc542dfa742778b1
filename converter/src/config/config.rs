use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Settlement config error: {0}")]
    SettlementError(#[from] envelope_core::models::config::ConfigError),
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Converter settings. Every flag falls back to an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "converter", version, about = "Converts FedNow messages between JSON and ISO 20022 XML")]
pub struct AppConfig {
    /// Envelope schema used to resolve wrapper elements
    #[arg(long, env = "SCHEMAPATH")]
    pub schemapath: Option<PathBuf>,

    /// Settlement and routing config (JSON)
    #[arg(long, env = "CONFIGPATH")]
    pub configpath: PathBuf,

    #[arg(long, env = "OUTPUTDIR", default_value = "out")]
    pub outputdir: PathBuf,

    /// Inputs converted concurrently per batch
    #[arg(long, env = "BATCHSIZE", default_value_t = 8)]
    pub batchsize: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Render JSON messages of one kind as enveloped XML
    Generate {
        /// Message definition identifier, e.g. pacs.008.001.08
        #[arg(long)]
        kind: String,

        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Read enveloped XML messages back into JSON
    Parse {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

impl Command {
    pub fn inputs(&self) -> &[PathBuf] {
        match self {
            Command::Generate { inputs, .. } | Command::Parse { inputs } => inputs,
        }
    }
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    validate(AppConfig::parse())
}

fn validate(config: AppConfig) -> Result<AppConfig, ConfigError> {
    if config.batchsize == 0 {
        return Err(ConfigError::ParseError("Invalid batch size: must be at least 1".to_string()));
    }
    if matches!(config.command, Command::Generate { .. }) && config.schemapath.is_none() {
        return Err(ConfigError::ParseError("SCHEMAPATH is required to generate messages".to_string()));
    }
    Ok(config)
}
