//! Directory statistics produced by the subtree aggregator.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use strum::Display;

/// Bucket key for files without an extension.
pub const NO_EXTENSION: &str = "(no extension)";

/// Seconds in one day, used for age-in-days conversion.
pub const SECS_PER_DAY: f64 = 86_400.0;

/// Fixed modification-age ranges used for histogram reporting.
///
/// Upper edges are inclusive: a file exactly 7 days old lands in
/// [`AgeBucket::Week`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum AgeBucket {
    #[strum(to_string = "0-7 days")]
    Week,
    #[strum(to_string = "7-30 days")]
    Month,
    #[strum(to_string = "30-90 days")]
    Quarter,
    #[strum(to_string = "90-365 days")]
    Year,
    #[strum(to_string = "1+ years")]
    Older,
}

impl AgeBucket {
    /// All buckets, youngest first.
    pub const ALL: [AgeBucket; 5] = [
        AgeBucket::Week,
        AgeBucket::Month,
        AgeBucket::Quarter,
        AgeBucket::Year,
        AgeBucket::Older,
    ];

    /// Classify an age expressed in (fractional) days.
    pub fn from_age_days(days: f64) -> Self {
        if days <= 7.0 {
            Self::Week
        } else if days <= 30.0 {
            Self::Month
        } else if days <= 90.0 {
            Self::Quarter
        } else if days <= 365.0 {
            Self::Year
        } else {
            Self::Older
        }
    }

    /// Classify an age duration.
    pub fn from_age(age: Duration) -> Self {
        Self::from_age_days(age.as_secs_f64() / SECS_PER_DAY)
    }

    /// Classify a modification time relative to `now`.
    ///
    /// Times in the future count as age zero.
    pub fn classify(modified: SystemTime, now: SystemTime) -> Self {
        Self::from_age(now.duration_since(modified).unwrap_or(Duration::ZERO))
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// File counts per [`AgeBucket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeHistogram {
    counts: [u64; 5],
}

impl AgeHistogram {
    /// Add one file to a bucket.
    pub fn record(&mut self, bucket: AgeBucket) {
        self.counts[bucket.index()] += 1;
    }

    /// Number of files in a bucket.
    pub fn count(&self, bucket: AgeBucket) -> u64 {
        self.counts[bucket.index()]
    }

    /// Sum over all buckets.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterate buckets in order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (AgeBucket, u64)> + '_ {
        AgeBucket::ALL.iter().map(|b| (*b, self.count(*b)))
    }
}

/// Count and total size of files sharing an extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionStats {
    pub count: u64,
    pub size: u64,
}

/// Aggregate statistics for a directory subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryStats {
    /// Sum of all successfully stat'd file sizes.
    pub total_size_bytes: u64,
    /// Regular files counted.
    pub file_count: u64,
    /// Directories counted (symlinks to directories excluded).
    pub folder_count: u64,
    /// Entries dropped because their type or metadata could not be read.
    pub skipped_entries: u64,
    /// Oldest file by modification time.
    pub oldest_file: Option<(PathBuf, SystemTime)>,
    /// Newest file by modification time.
    pub newest_file: Option<(PathBuf, SystemTime)>,
    /// Largest file (path, size).
    pub largest_file: Option<(PathBuf, u64)>,
    /// Per-extension totals, keyed by lowercased extension with leading dot.
    pub extension_breakdown: BTreeMap<String, ExtensionStats>,
    /// Modification-age histogram.
    pub age_buckets: AgeHistogram,
    /// Largest immediate subfolders, descending by size, when requested.
    pub immediate_subfolder_sizes: Option<Vec<(PathBuf, u64)>>,
}

impl DirectoryStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a regular file.
    pub fn record_file(&mut self, path: &Path, size: u64, modified: SystemTime, age: AgeBucket) {
        self.file_count += 1;
        self.total_size_bytes += size;

        if self.oldest_file.as_ref().is_none_or(|(_, t)| modified < *t) {
            self.oldest_file = Some((path.to_path_buf(), modified));
        }

        if self.newest_file.as_ref().is_none_or(|(_, t)| modified > *t) {
            self.newest_file = Some((path.to_path_buf(), modified));
        }

        if self.largest_file.as_ref().is_none_or(|(_, s)| size > *s) {
            self.largest_file = Some((path.to_path_buf(), size));
        }

        let ext = self.extension_breakdown.entry(extension_key(path)).or_default();
        ext.count += 1;
        ext.size += size;

        self.age_buckets.record(age);
    }

    /// Record a directory.
    pub fn record_dir(&mut self) {
        self.folder_count += 1;
    }

    /// Record an entry that could not be read.
    pub fn record_skipped(&mut self) {
        self.skipped_entries += 1;
    }

    /// Extensions sorted by total size, largest first.
    pub fn top_extensions(&self, n: usize) -> Vec<(&str, ExtensionStats)> {
        let mut types: Vec<(&str, ExtensionStats)> = self
            .extension_breakdown
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        types.sort_by(|a, b| b.1.size.cmp(&a.1.size));
        types.truncate(n);
        types
    }
}

/// Result of aggregating a root path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Aggregate {
    /// The root existed and was walked.
    Analyzed(DirectoryStats),
    /// The root does not exist.
    NotAnalyzable { path: PathBuf },
}

impl Aggregate {
    /// Borrow the stats if the root was analyzed.
    pub fn stats(&self) -> Option<&DirectoryStats> {
        match self {
            Self::Analyzed(stats) => Some(stats),
            Self::NotAnalyzable { .. } => None,
        }
    }

    /// Take the stats if the root was analyzed.
    pub fn into_stats(self) -> Option<DirectoryStats> {
        match self {
            Self::Analyzed(stats) => Some(stats),
            Self::NotAnalyzable { .. } => None,
        }
    }

    /// Whether the root could be analyzed.
    pub fn is_analyzable(&self) -> bool {
        matches!(self, Self::Analyzed(_))
    }
}

/// Extension bucket key for a path: lowercased with a leading dot, or
/// [`NO_EXTENSION`].
pub fn extension_key(path: &Path) -> String {
    match path.extension().map(|e| e.to_string_lossy()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_lowercase()),
        _ => NO_EXTENSION.to_string(),
    }
}
