//! Scan and inventory configuration types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory names the large-file finder prunes by default.
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", "node_modules", "__pycache__", ".venv", "venv"];

const MIB: u64 = 1024 * 1024;

/// Configuration for a subtree aggregation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct AggregateConfig {
    /// Root path to aggregate.
    pub root: PathBuf,

    /// Descend into subdirectories (otherwise only immediate entries count).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Compute the N largest immediate subfolders.
    #[builder(default)]
    #[serde(default)]
    pub top_subfolders: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl AggregateConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_root(self.root.as_ref())
    }
}

impl AggregateConfig {
    /// Create a new config builder.
    pub fn builder() -> AggregateConfigBuilder {
        AggregateConfigBuilder::default()
    }

    /// Create a recursive config without a subfolder scan.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: true,
            top_subfolders: None,
        }
    }
}

/// Configuration for the large-file finder.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct LargeFileConfig {
    /// Directory to search.
    pub root: PathBuf,

    /// Files at or above this size are reported.
    #[builder(default = "100 * MIB")]
    pub min_size_bytes: u64,

    /// Maximum number of files to report.
    #[builder(default = "50")]
    pub max_results: usize,

    /// Directory names that are never descended into.
    #[builder(default = "default_excludes()")]
    pub exclude: Vec<String>,
}

fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

impl LargeFileConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_root(self.root.as_ref())
    }
}

impl LargeFileConfig {
    /// Create a new config builder.
    pub fn builder() -> LargeFileConfigBuilder {
        LargeFileConfigBuilder::default()
    }

    /// Convert a threshold in megabytes to bytes.
    pub fn megabytes(mb: f64) -> u64 {
        (mb.max(0.0) * MIB as f64) as u64
    }

    /// Check whether a directory name is excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e == name)
    }
}

fn validate_root(root: Option<&PathBuf>) -> Result<(), String> {
    match root {
        Some(root) if root.as_os_str().is_empty() => Err("Root path cannot be empty".to_string()),
        Some(_) => Ok(()),
        None => Err("Root path is required".to_string()),
    }
}

/// Per-user library directories that hold application data and caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLocations {
    /// The user's home directory.
    pub home: PathBuf,
    /// `~/Library/Application Support`.
    pub application_support: PathBuf,
    /// `~/Library/Caches`.
    pub caches: PathBuf,
}

impl LibraryLocations {
    /// Locations rooted at a given home directory.
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            application_support: home.join("Library").join("Application Support"),
            caches: home.join("Library").join("Caches"),
            home,
        }
    }

    /// Locations for the current user.
    pub fn detect() -> Self {
        Self::from_home(dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// The per-user applications folder.
    pub fn user_applications(&self) -> PathBuf {
        self.home.join("Applications")
    }

    /// Expand a leading `~` to the home directory.
    pub fn expand(&self, path: &Path) -> PathBuf {
        match path.strip_prefix("~") {
            Ok(rest) => self.home.join(rest),
            Err(_) => path.to_path_buf(),
        }
    }
}

/// Irregular data and cache folder names for one application.
///
/// Names are relative to the application-support and cache roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderOverride {
    pub data: Vec<String>,
    pub cache: Vec<String>,
}

impl FolderOverride {
    /// Create an override from data and cache folder names.
    pub fn new(data: &[&str], cache: &[&str]) -> Self {
        Self {
            data: data.iter().map(|s| s.to_string()).collect(),
            cache: cache.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The default resolution: the application's own name in both roots.
    pub fn same_name(name: &str) -> Self {
        Self::new(&[name], &[name])
    }

    /// Absolute data directories under `locations`.
    pub fn data_dirs(&self, locations: &LibraryLocations) -> Vec<PathBuf> {
        self.data
            .iter()
            .map(|d| locations.application_support.join(d))
            .collect()
    }

    /// Absolute cache directories under `locations`.
    pub fn cache_dirs(&self, locations: &LibraryLocations) -> Vec<PathBuf> {
        self.cache.iter().map(|c| locations.caches.join(c)).collect()
    }
}

/// Inventory settings loaded at startup.
///
/// Every field has a default; a config file only needs the keys it changes.
/// Folder overrides from a file extend the built-in table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Folder scanned for application bundles.
    pub applications_root: PathBuf,

    /// Application name to irregular data/cache folder names.
    pub folder_overrides: BTreeMap<String, FolderOverride>,

    /// Well-known cache directories for the cache inventory.
    pub cache_locations: Vec<PathBuf>,

    /// Directory names pruned by the large-file finder.
    pub large_file_excludes: Vec<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self::for_locations(&LibraryLocations::detect())
    }
}

impl InventoryConfig {
    /// Default configuration for a set of library locations.
    pub fn for_locations(locations: &LibraryLocations) -> Self {
        let home = &locations.home;
        Self {
            applications_root: PathBuf::from("/Applications"),
            folder_overrides: default_folder_overrides(),
            cache_locations: vec![
                locations.caches.clone(),
                home.join(".cache"),
                PathBuf::from("/Library/Caches"),
                PathBuf::from("/System/Library/Caches"),
                PathBuf::from("/private/var/folders"),
                locations.application_support.clone(),
            ],
            large_file_excludes: default_excludes(),
        }
    }

    /// Path of the user configuration file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("spacelens").join("config.toml"))
    }

    /// Load the user configuration, or return defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(content)?;
        Ok(config.with_default_overrides())
    }

    /// Add built-in overrides the table does not already define.
    pub fn with_default_overrides(mut self) -> Self {
        for (name, folders) in default_folder_overrides() {
            self.folder_overrides.entry(name).or_insert(folders);
        }
        self
    }

    /// Data/cache folder names for an application.
    pub fn folders_for(&self, app_name: &str) -> FolderOverride {
        self.folder_overrides
            .get(app_name)
            .cloned()
            .unwrap_or_else(|| FolderOverride::same_name(app_name))
    }
}

fn default_folder_overrides() -> BTreeMap<String, FolderOverride> {
    [
        ("Docker", FolderOverride::new(&["Docker"], &["com.docker.docker"])),
        ("Figma", FolderOverride::new(&["Figma", "figma-desktop"], &["Figma"])),
        ("Postman", FolderOverride::new(&["Postman"], &["Postman"])),
        ("Visual Studio Code", FolderOverride::new(&["Code"], &["Code"])),
        ("Xmind", FolderOverride::new(&["Xmind"], &["Xmind"])),
    ]
    .into_iter()
    .map(|(name, folders)| (name.to_string(), folders))
    .collect()
}
