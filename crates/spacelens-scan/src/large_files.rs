//! Large-file search with directory pruning.

use std::path::PathBuf;

use jwalk::{Parallelism, WalkDir};
use serde::{Deserialize, Serialize};

use spacelens_core::{LargeFileConfig, ScanError};

use crate::interrupt::InterruptFlag;

/// A file at or above the size threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Result of a large-file search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LargeFileReport {
    /// Matching files, largest first, truncated to the configured maximum.
    pub files: Vec<LargeFile>,
    /// Whether the search stopped early on an interrupt.
    pub interrupted: bool,
}

impl LargeFileReport {
    /// Total size of the reported files.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Check if no files were found.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Finds individual files above a size threshold.
///
/// Unlike the aggregator, excluded directory names are pruned before the
/// walk descends into them, so their contents are never visited.
pub struct LargeFileFinder {
    config: LargeFileConfig,
    interrupt: InterruptFlag,
}

impl LargeFileFinder {
    /// Create a finder for a config.
    pub fn new(config: LargeFileConfig) -> Self {
        Self {
            config,
            interrupt: InterruptFlag::new(),
        }
    }

    /// Stop early when `flag` is raised, keeping what was found so far.
    pub fn with_interrupt(mut self, flag: InterruptFlag) -> Self {
        self.interrupt = flag;
        self
    }

    /// Walk the configured root and collect large files.
    pub fn find(&self) -> Result<LargeFileReport, ScanError> {
        let root = &self.config.root;
        let metadata = std::fs::metadata(root).map_err(|e| ScanError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory { path: root.clone() });
        }

        tracing::debug!(
            "Searching {} for files >= {} bytes",
            root.display(),
            self.config.min_size_bytes
        );

        let pruning = self.config.clone();
        let walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(false)
            .min_depth(1)
            .process_read_dir(move |depth, _path, _state, children| {
                // depth is None for the synthetic read that yields the root itself
                if depth.is_none() {
                    return;
                }
                children.retain(|child| match child {
                    Ok(entry) => {
                        !(entry.file_type().is_dir()
                            && entry
                                .file_name()
                                .to_str()
                                .is_some_and(|name| pruning.is_excluded(name)))
                    }
                    Err(_) => true,
                });
            });

        let mut report = LargeFileReport::default();

        for entry_result in walker {
            if self.interrupt.is_raised() {
                report.interrupted = true;
                break;
            }

            let Ok(entry) = entry_result else {
                continue;
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };

            let size = metadata.len();
            if size >= self.config.min_size_bytes {
                report.files.push(LargeFile {
                    path: entry.path(),
                    size,
                });
            }
        }

        report
            .files
            .sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        report.files.truncate(self.config.max_results);

        Ok(report)
    }
}
