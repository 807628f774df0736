//! Application-specific analyzers for spacelens.
//!
//! Most applications keep their data under a folder named after the bundle,
//! which the generic inventory handles on its own. Applications with a more
//! involved layout implement [`AppPlugin`] and are looked up by name in a
//! [`PluginRegistry`]; their [`PluginAnalysis`] replaces the generic data,
//! cache and last-used figures.
//!
//! # Example
//!
//! ```rust,no_run
//! use spacelens_core::LibraryLocations;
//! use spacelens_plugin::PluginRegistry;
//!
//! let registry = PluginRegistry::with_defaults();
//! if let Some(plugin) = registry.get("Google Chrome") {
//!     let analysis = plugin.analyze(&LibraryLocations::detect());
//!     println!("{} profiles", analysis.profiles.len());
//! }
//! ```

mod chrome;
mod footprint;
mod registry;
mod types;

pub use chrome::ChromePlugin;
pub use footprint::FolderFootprint;
pub use registry::{AppPlugin, PluginRegistry};
pub use types::{PluginAnalysis, PluginError, PluginResult};
