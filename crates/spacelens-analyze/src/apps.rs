//! Installed application inventory.

use std::path::{Path, PathBuf};

use spacelens_core::{ApplicationRecord, BundleMetadata, InventoryConfig, LibraryLocations, ScanError};
use spacelens_plugin::{FolderFootprint, PluginRegistry};
use spacelens_scan::DirectoryAggregator;

use crate::metadata::{SpotlightProbe, UsageProbe, bundle_stem, read_bundle_metadata};

const BUNDLE_EXTENSION: &str = "app";

/// Builds [`ApplicationRecord`]s for the bundles in one or more folders.
pub struct ApplicationInventory {
    config: InventoryConfig,
    locations: LibraryLocations,
    plugins: PluginRegistry,
    probe: Box<dyn UsageProbe>,
    aggregator: DirectoryAggregator,
}

impl ApplicationInventory {
    /// Create an inventory with the built-in plugins and Spotlight lookups.
    pub fn new(config: InventoryConfig, locations: LibraryLocations) -> Self {
        Self {
            config,
            locations,
            plugins: PluginRegistry::with_defaults(),
            probe: Box::new(SpotlightProbe::default()),
            aggregator: DirectoryAggregator::new(),
        }
    }

    /// Replace the plugin registry.
    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    /// Replace the last-opened lookup.
    pub fn with_probe(mut self, probe: Box<dyn UsageProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// The library locations data and caches are resolved against.
    pub fn locations(&self) -> &LibraryLocations {
        &self.locations
    }

    /// Scan several folders, skipping any that do not exist.
    pub fn scan(&self, folders: &[PathBuf]) -> Vec<ApplicationRecord> {
        let mut apps = Vec::new();
        for folder in folders {
            match self.scan_folder(folder) {
                Ok(found) => apps.extend(found),
                Err(err) => tracing::warn!("{err}"),
            }
        }
        apps
    }

    /// Analyze every bundle directly inside `folder`.
    ///
    /// Bundles whose size is 0 are left out.
    pub fn scan_folder(&self, folder: &Path) -> Result<Vec<ApplicationRecord>, ScanError> {
        let entries = std::fs::read_dir(folder).map_err(|e| ScanError::io(folder, e))?;

        let mut apps = Vec::new();
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != BUNDLE_EXTENSION) {
                continue;
            }

            tracing::info!("Analyzing: {}", entry.file_name().to_string_lossy());
            if let Some(record) = self.analyze_bundle(&path).filter(|r| r.size > 0) {
                apps.push(record);
            }
        }

        Ok(apps)
    }

    /// Build the record for one bundle.
    ///
    /// Returns `None` when `path` is not a directory.
    pub fn analyze_bundle(&self, path: &Path) -> Option<ApplicationRecord> {
        let metadata = std::fs::metadata(path).ok().filter(|m| m.is_dir())?;
        let name = bundle_stem(path);

        let bundle_metadata =
            read_bundle_metadata(path).unwrap_or_else(|| BundleMetadata::fallback(name.clone()));
        let size = self.aggregator.directory_size(path);

        let (data_size, cache_size, folder_activity, profiles) = match self.plugins.get(&name) {
            Some(plugin) => {
                tracing::debug!("Delegating {name} to its plugin");
                let analysis = plugin.analyze(&self.locations);
                (analysis.data_size, analysis.cache_size, analysis.last_used, analysis.profiles)
            }
            None => {
                let folders = self.config.folders_for(&name);
                let data = FolderFootprint::measure(&folders.data_dirs(&self.locations));
                let cache = FolderFootprint::measure(&folders.cache_dirs(&self.locations));
                (
                    data.size,
                    cache.size,
                    data.last_modified.max(cache.last_modified),
                    Vec::new(),
                )
            }
        };

        let last_used = self.probe.last_opened(path).max(folder_activity);

        Some(ApplicationRecord {
            name,
            path: path.to_path_buf(),
            metadata: bundle_metadata,
            created: metadata.created().ok(),
            modified: metadata.modified().ok(),
            last_used,
            size,
            data_size,
            cache_size,
            profiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::NoProbe;
    use std::fs;
    use tempfile::TempDir;

    fn inventory(home: &Path) -> ApplicationInventory {
        let locations = LibraryLocations::from_home(home);
        let config = InventoryConfig::for_locations(&locations);
        ApplicationInventory::new(config, locations)
            .with_plugins(PluginRegistry::new())
            .with_probe(Box::new(NoProbe))
    }

    #[test]
    fn test_analyze_bundle_without_library_dirs() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("Tool.app");
        fs::create_dir_all(bundle.join("Contents/MacOS")).unwrap();
        fs::write(bundle.join("Contents/MacOS/tool"), vec![0u8; 64]).unwrap();

        let record = inventory(temp.path()).analyze_bundle(&bundle).unwrap();

        assert_eq!(record.name, "Tool");
        assert_eq!(record.size, 64);
        assert_eq!(record.data_size, 0);
        assert_eq!(record.cache_size, 0);
        assert!(record.is_never_used());
        assert_eq!(record.metadata, BundleMetadata::fallback("Tool"));
    }

    #[test]
    fn test_analyze_bundle_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Fake.app");
        fs::write(&file, "not a bundle").unwrap();

        assert!(inventory(temp.path()).analyze_bundle(&file).is_none());
    }

    #[test]
    fn test_scan_folder_missing() {
        let temp = TempDir::new().unwrap();
        let result = inventory(temp.path()).scan_folder(&temp.path().join("Applications"));
        assert!(matches!(result, Err(ScanError::NotFound { .. })));
    }
}
