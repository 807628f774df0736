//! Size and activity of a set of folders.

use std::path::PathBuf;
use std::time::SystemTime;

use spacelens_scan::DirectoryAggregator;

/// Combined size and latest modification time of several directories.
///
/// Missing directories contribute nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderFootprint {
    pub size: u64,
    pub last_modified: Option<SystemTime>,
}

impl FolderFootprint {
    /// Measure every directory in `dirs`.
    pub fn measure(dirs: &[PathBuf]) -> Self {
        let aggregator = DirectoryAggregator::new();
        let mut footprint = Self::default();

        for dir in dirs {
            let Ok(metadata) = std::fs::metadata(dir) else {
                continue;
            };
            footprint.size += aggregator.directory_size(dir);
            if let Ok(modified) = metadata.modified() {
                footprint.last_modified = footprint.last_modified.max(Some(modified));
            }
        }

        footprint
    }
}
