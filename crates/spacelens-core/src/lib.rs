//! Core types and configuration for spacelens.
//!
//! This crate provides the data structures shared by the scanning, analysis
//! and reporting crates: directory statistics produced by the aggregator,
//! application records built by the inventory, and the configuration that
//! drives both.

mod app;
mod config;
mod error;
mod stats;

pub use app::{ApplicationRecord, BundleMetadata, ProfileUsage, UNKNOWN};
pub use config::{
    AggregateConfig, AggregateConfigBuilder, FolderOverride, InventoryConfig, LargeFileConfig,
    LargeFileConfigBuilder, LibraryLocations, DEFAULT_EXCLUDES,
};
pub use error::{ConfigError, ScanError};
pub use stats::{
    Aggregate, AgeBucket, AgeHistogram, DirectoryStats, ExtensionStats, NO_EXTENSION,
    SECS_PER_DAY, extension_key,
};
