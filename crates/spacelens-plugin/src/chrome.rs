//! Google Chrome: vendor-wide data and cache folders plus per-profile sizes.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use spacelens_core::{LibraryLocations, ProfileUsage};
use spacelens_scan::DirectoryAggregator;

use crate::footprint::FolderFootprint;
use crate::registry::AppPlugin;
use crate::types::{PluginAnalysis, PluginError, PluginResult};

/// Data folders, relative to Application Support.
const DATA_FOLDERS: &[&str] = &["Google/Chrome"];

/// Cache folders, relative to Caches.
const CACHE_FOLDERS: &[&str] = &[
    "Google",
    "com.google.GoogleUpdater",
    "com.google.Keystone",
    "com.google.SoftwareUpdate",
];

const DEFAULT_PROFILE: &str = "Default";
const PROFILE_PREFIX: &str = "Profile";

#[derive(Deserialize)]
struct Preferences {
    #[serde(default)]
    profile: Option<ProfileSection>,
}

#[derive(Deserialize)]
struct ProfileSection {
    #[serde(default)]
    name: Option<String>,
}

/// Plugin for Google Chrome.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromePlugin;

impl ChromePlugin {
    /// Create the plugin.
    pub fn new() -> Self {
        Self
    }

    /// Absolute data directories.
    pub fn data_dirs(&self, locations: &LibraryLocations) -> Vec<PathBuf> {
        DATA_FOLDERS
            .iter()
            .map(|d| locations.application_support.join(d))
            .collect()
    }

    /// Absolute cache directories.
    pub fn cache_dirs(&self, locations: &LibraryLocations) -> Vec<PathBuf> {
        CACHE_FOLDERS.iter().map(|c| locations.caches.join(c)).collect()
    }

    /// Profiles under the Chrome user-data directory, largest first.
    pub fn profiles(&self, locations: &LibraryLocations) -> Vec<ProfileUsage> {
        let user_data = locations.application_support.join(DATA_FOLDERS[0]);
        let Ok(entries) = std::fs::read_dir(&user_data) else {
            return Vec::new();
        };

        let aggregator = DirectoryAggregator::new();
        let mut profiles: Vec<ProfileUsage> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|entry| {
                let folder = entry.file_name().to_string_lossy().into_owned();
                if folder != DEFAULT_PROFILE && !folder.starts_with(PROFILE_PREFIX) {
                    return None;
                }

                let path = entry.path();
                let name = match read_profile_name(&path.join("Preferences")) {
                    Ok(Some(name)) => name,
                    Ok(None) => folder.clone(),
                    Err(err) => {
                        tracing::debug!("{err}");
                        folder.clone()
                    }
                };
                let size = aggregator.directory_size(&path);

                Some(ProfileUsage {
                    name,
                    folder,
                    path,
                    size,
                })
            })
            .collect();

        profiles.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.folder.cmp(&b.folder)));
        profiles
    }
}

impl AppPlugin for ChromePlugin {
    fn app_name(&self) -> &str {
        "Google Chrome"
    }

    fn analyze(&self, locations: &LibraryLocations) -> PluginAnalysis {
        let data = FolderFootprint::measure(&self.data_dirs(locations));
        let cache = FolderFootprint::measure(&self.cache_dirs(locations));

        PluginAnalysis {
            data_size: data.size,
            cache_size: cache.size,
            last_used: data.last_modified.max(cache.last_modified),
            profiles: self.profiles(locations),
        }
    }
}

/// Display name stored in a profile's `Preferences` file.
///
/// Returns `Ok(None)` when the file is absent or has no name.
fn read_profile_name(preferences: &Path) -> PluginResult<Option<String>> {
    if !preferences.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(preferences).map_err(|source| PluginError::Io {
        path: preferences.to_path_buf(),
        source,
    })?;
    let prefs: Preferences = serde_json::from_str(&content).map_err(|source| PluginError::Json {
        path: preferences.to_path_buf(),
        source,
    })?;

    Ok(prefs.profile.and_then(|p| p.name))
}
