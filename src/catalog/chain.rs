//! Chain files.
//!
//! A chain file lists the rules of one field in TOML:
//!
//! ```toml
//! only_on_completed = false
//!
//! [[rule]]
//! type = "NOT_EMPTY"
//!
//! [[rule]]
//! type = "MIN_LENGTH"
//! params = [3]
//! ```

use crate::core::error::ConfigError;
use crate::core::types::Value;
use crate::execution::progress::RunOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One rule reference inside a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Catalog type identifier.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Init parameters, for initable rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
}

impl RuleSpec {
    /// A rule without parameters.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            params: None,
        }
    }

    /// A rule with init parameters.
    pub fn with_params(type_name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            params: Some(params),
        }
    }
}

/// A parsed chain file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Emit only the completed snapshot.
    #[serde(default)]
    pub only_on_completed: bool,
    /// Rules, in run order.
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleSpec>,
}

impl ChainConfig {
    /// Parse a chain from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ChainConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Read and parse a chain file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("loaded chain file {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Run options described by this chain.
    pub fn options(&self) -> RunOptions {
        RunOptions {
            only_on_completed: self.only_on_completed,
        }
    }
}
