//! Application and cache inventories for spacelens.
//!
//! This crate builds on the scan walks to answer the two questions the tool
//! asks of a machine:
//!
//! - **Applications** ([`ApplicationInventory`]): which bundles are
//!   installed, how much they and their data/cache folders take up, and when
//!   each was last used.
//! - **Caches** ([`CacheInventory`]): how large each well-known cache
//!   location is, ranked by size.
//!
//! [`SortKey`] and [`UsageSummary`] order and classify the application
//! records for reporting.
//!
//! ```rust,no_run
//! use std::time::SystemTime;
//! use spacelens_analyze::{ApplicationInventory, UsageSummary};
//! use spacelens_core::{InventoryConfig, LibraryLocations};
//!
//! let locations = LibraryLocations::detect();
//! let inventory = ApplicationInventory::new(InventoryConfig::default(), locations);
//! let apps = inventory.scan(&["/Applications".into()]);
//!
//! let summary = UsageSummary::classify(&apps, SystemTime::now());
//! println!("{} never used", summary.never_used.len());
//! ```

mod apps;
mod caches;
mod metadata;
mod usage;

pub use apps::ApplicationInventory;
pub use caches::{CacheInventory, CacheLocation, CacheReport};
pub use metadata::{
    NoProbe, SpotlightProbe, UsageProbe, bundle_stem, parse_mdls_date, read_bundle_metadata,
};
pub use usage::{
    OLD_AFTER_DAYS, RECENT_WITHIN_DAYS, STALE_AFTER_DAYS, SortKey, UsageSummary, days_between,
    sort_and_limit,
};
