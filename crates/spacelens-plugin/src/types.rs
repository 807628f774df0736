//! Core types for application plugins.

use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use spacelens_core::ProfileUsage;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors a plugin can hit while reading application state.
///
/// Plugins never fail an analysis as a whole; these errors are logged and
/// the affected value falls back to a default.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A file the plugin reads could not be opened.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON state file is malformed.
    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage figures a plugin reports for its application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginAnalysis {
    /// Size of the application's data directories.
    pub data_size: u64,
    /// Size of the application's cache directories.
    pub cache_size: u64,
    /// Latest activity the plugin could observe.
    pub last_used: Option<SystemTime>,
    /// Per-profile breakdown, largest first.
    pub profiles: Vec<ProfileUsage>,
}

impl PluginAnalysis {
    /// Data and cache sizes combined.
    pub fn total_size(&self) -> u64 {
        self.data_size + self.cache_size
    }
}
