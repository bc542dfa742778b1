use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

pub const FEDNOW_MARKET_PRACTICE_REGISTRY: &str =
    "www2.swift.com/mystandards/#/group/Federal_Reserve_Financial_Services/FedNow_Service";
pub const FEDNOW_MARKET_PRACTICE_ID: &str = "frb.fednow.01";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error at '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Settlement and routing parameters injected into every build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub market_practice: String,

    #[serde(default)]
    pub market_practice_registry: String,

    #[serde(default)]
    pub local_instrument: LocalInstrument,

    #[serde(default)]
    pub settlement_method: String,

    /// Clearing system of member identifications, e.g. `USABA`.
    #[serde(default)]
    pub clearing_system_id: String,

    #[serde(default)]
    pub charge_bearer: String,

    #[serde(default)]
    pub currency: String,

    /// Clearing system of the settlement instruction, e.g. `FDN`.
    #[serde(default)]
    pub clearing_system: String,

    #[serde(rename = "frbId", default)]
    pub counterparty_routing_id: String,

    #[serde(rename = "ispId", default)]
    pub own_routing_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalInstrument {
    #[serde(rename = "Cd", alias = "cd", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(rename = "Prtry", alias = "prtry", default, skip_serializing_if = "Option::is_none")]
    pub proprietary: Option<String>,
}

impl Config {
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(deserializer).map_err(|e| ConfigError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading settlement config");
        let bytes = fs::read(path).map_err(|e| {
            error!(error = %e, path = %path.display(), "Failed to read config");
            ConfigError::Io(e)
        })?;
        Self::from_json(&bytes)
    }

    pub fn market_practice_registry(&self) -> &str {
        if self.market_practice_registry.is_empty() {
            FEDNOW_MARKET_PRACTICE_REGISTRY
        } else {
            &self.market_practice_registry
        }
    }

    pub fn market_practice_id(&self) -> &str {
        if self.market_practice.is_empty() {
            FEDNOW_MARKET_PRACTICE_ID
        } else {
            &self.market_practice
        }
    }
}
