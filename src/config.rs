//! Configuration loaded from `bpmn-analysis.toml`.
//!
//! ```toml
//! [analysis]
//! unresolved_transitions = "skip"   # or "fail-fast"
//!
//! [export]
//! bpmn_base_uri = "http://process-model.org/bpmn/"
//! domain_base_uri = "http://process-model.org/domain/"
//!
//! [labels]
//! Task = "Task/sub-process"
//! Gateway = "Gateway"
//!
//! [batch]
//! workers = 0   # 0 = one per CPU
//! ```
//!
//! Every section is optional. Command-line flags override the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::AnalysisConfig;
use crate::error::ConfigError;
use crate::export::ExportConfig;
use crate::report::KindLabels;

pub const CONFIG_FILE_NAME: &str = "bpmn-analysis.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads for batch analysis, 0 lets rayon decide
    pub workers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub export: ExportConfig,
    pub labels: KindLabels,
    pub batch: BatchConfig,
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `bpmn-analysis.toml` in the
/// working directory is used if present, otherwise defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = PathBuf::from(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(Config::default());
            }
            candidate
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        source,
        path: path.clone(),
    })?;
    let config = Config::from_toml(&text, &path)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}
