//! Subtree aggregation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use jwalk::{Parallelism, WalkDir};

use spacelens_core::{Aggregate, AggregateConfig, AgeBucket, DirectoryStats};

/// Sequential walker that builds [`DirectoryStats`] for a subtree.
///
/// Entries whose type or metadata cannot be read are skipped and counted in
/// [`DirectoryStats::skipped_entries`]. Symlinks and special files are
/// ignored without being counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryAggregator;

impl DirectoryAggregator {
    /// Create a new aggregator.
    pub fn new() -> Self {
        Self
    }

    /// Aggregate a root path, one level deep unless `recursive`.
    pub fn aggregate(&self, root: impl Into<PathBuf>, recursive: bool) -> Aggregate {
        let config = AggregateConfig {
            root: root.into(),
            recursive,
            top_subfolders: None,
        };
        self.aggregate_with(&config)
    }

    /// Aggregate according to a config, including the optional subfolder scan.
    pub fn aggregate_with(&self, config: &AggregateConfig) -> Aggregate {
        let root = &config.root;
        if !root.exists() {
            tracing::debug!("Not analyzable, missing root: {}", root.display());
            return Aggregate::NotAnalyzable { path: root.clone() };
        }

        tracing::debug!("Aggregating {} (recursive: {})", root.display(), config.recursive);

        let mut stats = DirectoryStats::new();

        for entry_result in walker(root, config.recursive) {
            let entry = match entry_result {
                Ok(e) => e,
                Err(_) => {
                    stats.record_skipped();
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                stats.record_dir();
                if entry.read_children_error.is_some() {
                    stats.record_skipped();
                }
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(_) => {
                    stats.record_skipped();
                    continue;
                }
            };
            let Ok(modified) = metadata.modified() else {
                stats.record_skipped();
                continue;
            };

            // Age is measured against the clock at the moment this file is seen.
            let age = AgeBucket::classify(modified, SystemTime::now());
            stats.record_file(&entry.path(), metadata.len(), modified, age);
        }

        if let Some(n) = config.top_subfolders {
            stats.immediate_subfolder_sizes = Some(self.top_subfolders(root, n));
        }

        Aggregate::Analyzed(stats)
    }

    /// Recursive size of every regular file under `path`.
    ///
    /// Returns 0 for a missing path. Uses the same skip policy as
    /// [`aggregate`](Self::aggregate).
    pub fn directory_size(&self, path: &Path) -> u64 {
        if !path.exists() {
            return 0;
        }

        walker(path, true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.metadata().ok())
            .map(|m| m.len())
            .sum()
    }

    /// The `n` largest immediate subdirectories of `root`, descending.
    ///
    /// Each child is sized with its own recursive walk. Children of size 0
    /// and symlinked directories are left out.
    pub fn top_subfolders(&self, root: &Path, n: usize) -> Vec<(PathBuf, u64)> {
        let Ok(entries) = std::fs::read_dir(root) else {
            return Vec::new();
        };

        let mut subfolders: Vec<(PathBuf, u64)> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .map(|entry| {
                let path = entry.path();
                let size = self.directory_size(&path);
                (path, size)
            })
            .filter(|(_, size)| *size > 0)
            .collect();

        subfolders.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        subfolders.truncate(n);
        subfolders
    }
}

/// Sequential walker over the entries below `root` (the root itself excluded).
fn walker(root: &Path, recursive: bool) -> WalkDir {
    WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
}
