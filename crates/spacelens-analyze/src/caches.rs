//! Cache location inventory.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use spacelens_core::{Aggregate, AggregateConfig, DirectoryStats};
use spacelens_scan::DirectoryAggregator;

/// Statistics for one analyzed cache location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheLocation {
    pub path: PathBuf,
    pub stats: DirectoryStats,
}

/// Result of analyzing a set of cache locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheReport {
    /// Locations holding data, largest first.
    pub locations: Vec<CacheLocation>,
    /// Locations that do not exist.
    pub missing: Vec<PathBuf>,
}

impl CacheReport {
    /// Combined size of all analyzed locations.
    pub fn total_size(&self) -> u64 {
        self.locations.iter().map(|l| l.stats.total_size_bytes).sum()
    }

    /// The largest location, if any.
    pub fn largest(&self) -> Option<&CacheLocation> {
        self.locations.first()
    }

    /// Check if no location held any data.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Aggregates each cache location and ranks them by size.
#[derive(Debug, Clone, Copy)]
pub struct CacheInventory {
    recursive: bool,
    top_subfolders: Option<usize>,
    aggregator: DirectoryAggregator,
}

impl Default for CacheInventory {
    fn default() -> Self {
        Self::new(true, None)
    }
}

impl CacheInventory {
    /// Create an inventory; `top_subfolders` enables the subfolder scan.
    pub fn new(recursive: bool, top_subfolders: Option<usize>) -> Self {
        Self {
            recursive,
            top_subfolders,
            aggregator: DirectoryAggregator::new(),
        }
    }

    /// Paths to analyze: the defaults when asked for or when nothing explicit
    /// was given, followed by the explicit paths.
    pub fn targets(explicit: &[PathBuf], common: bool, defaults: &[PathBuf]) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if common || explicit.is_empty() {
            paths.extend_from_slice(defaults);
        }
        paths.extend_from_slice(explicit);
        paths
    }

    /// Analyze one location.
    pub fn analyze_location(&self, path: &Path) -> Aggregate {
        let config = AggregateConfig {
            root: path.to_path_buf(),
            recursive: self.recursive,
            top_subfolders: self.top_subfolders,
        };
        self.aggregator.aggregate_with(&config)
    }

    /// Analyze every location.
    ///
    /// Missing locations are recorded and skipped; empty ones are dropped.
    pub fn analyze(&self, paths: &[PathBuf]) -> CacheReport {
        let mut report = CacheReport::default();
        let mut found = Vec::new();

        for path in paths {
            tracing::debug!("Analyzing cache location {}", path.display());
            match self.analyze_location(path) {
                Aggregate::Analyzed(stats) if stats.total_size_bytes > 0 => {
                    found.push(CacheLocation {
                        path: path.clone(),
                        stats,
                    });
                }
                Aggregate::Analyzed(_) => {}
                Aggregate::NotAnalyzable { path } => {
                    tracing::warn!("Could not analyze: {}", path.display());
                    report.missing.push(path);
                }
            }
        }

        report.locations = found
            .into_iter()
            .sorted_by(|a, b| b.stats.total_size_bytes.cmp(&a.stats.total_size_bytes))
            .collect();
        report
    }
}
