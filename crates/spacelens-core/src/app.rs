//! Application records built by the inventory.

use std::path::PathBuf;
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Sentinel for manifest fields that could not be read.
pub const UNKNOWN: &str = "Unknown";

/// Identity fields read from a bundle's embedded manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Human-readable name (`CFBundleName`).
    pub display_name: CompactString,
    /// Reverse-DNS identifier (`CFBundleIdentifier`).
    pub identifier: CompactString,
    /// Marketing version (`CFBundleShortVersionString`).
    pub version: CompactString,
}

impl BundleMetadata {
    /// Metadata used when the manifest is missing or unreadable.
    pub fn fallback(name: impl Into<CompactString>) -> Self {
        Self {
            display_name: name.into(),
            identifier: CompactString::const_new(UNKNOWN),
            version: CompactString::const_new(UNKNOWN),
        }
    }
}

/// A named sub-partition of an application's data, e.g. a browser profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUsage {
    /// Display name of the profile.
    pub name: String,
    /// Directory name of the profile.
    pub folder: String,
    /// Full path of the profile directory.
    pub path: PathBuf,
    /// Recursive size of the profile directory.
    pub size: u64,
}

/// One installed application and its storage footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Filesystem name of the bundle without the `.app` suffix.
    pub name: CompactString,
    /// Path to the bundle directory.
    pub path: PathBuf,
    /// Manifest name, identifier and version.
    pub metadata: BundleMetadata,
    /// Bundle creation time, if the platform reports one.
    pub created: Option<SystemTime>,
    /// Bundle modification time.
    pub modified: Option<SystemTime>,
    /// Best-effort last use; `None` means never used.
    pub last_used: Option<SystemTime>,
    /// Recursive size of the bundle itself.
    pub size: u64,
    /// Size of the associated application-support directories.
    pub data_size: u64,
    /// Size of the associated cache directories.
    pub cache_size: u64,
    /// Per-profile breakdown reported by an application plugin.
    #[serde(default)]
    pub profiles: Vec<ProfileUsage>,
}

impl ApplicationRecord {
    /// Bundle, data and cache sizes combined.
    pub fn total_footprint(&self) -> u64 {
        self.size + self.data_size + self.cache_size
    }

    /// Whether the application has never been used.
    pub fn is_never_used(&self) -> bool {
        self.last_used.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_metadata() {
        let meta = BundleMetadata::fallback("Calculator");
        assert_eq!(meta.display_name, "Calculator");
        assert_eq!(meta.identifier, UNKNOWN);
        assert_eq!(meta.version, UNKNOWN);
    }

    #[test]
    fn test_total_footprint() {
        let record = ApplicationRecord {
            name: "Editor".into(),
            path: PathBuf::from("/Applications/Editor.app"),
            metadata: BundleMetadata::fallback("Editor"),
            created: None,
            modified: None,
            last_used: None,
            size: 100,
            data_size: 20,
            cache_size: 3,
            profiles: Vec::new(),
        };
        assert_eq!(record.total_footprint(), 123);
        assert!(record.is_never_used());
    }
}
