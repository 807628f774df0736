//! Directory walking for spacelens.
//!
//! This crate provides the two traversals every analyzer builds on:
//!
//! - **Subtree aggregation** ([`DirectoryAggregator`]) computes size, count,
//!   age and extension statistics for a directory, optionally with the
//!   largest immediate subfolders.
//! - **Large-file search** ([`LargeFileFinder`]) lists individual files above
//!   a size threshold, pruning excluded directories before descending.
//!
//! Both walks are sequential and skip entries they cannot read.
//!
//! # Example
//!
//! ```rust,no_run
//! use spacelens_scan::DirectoryAggregator;
//!
//! let aggregator = DirectoryAggregator::new();
//! if let Some(stats) = aggregator.aggregate("/tmp", true).stats() {
//!     println!("{} files, {} bytes", stats.file_count, stats.total_size_bytes);
//! }
//! ```

mod aggregator;
mod interrupt;
mod large_files;

pub use aggregator::DirectoryAggregator;
pub use interrupt::InterruptFlag;
pub use large_files::{LargeFile, LargeFileFinder, LargeFileReport};

// Re-export core types for convenience
pub use spacelens_core::{
    Aggregate, AggregateConfig, AgeBucket, DirectoryStats, LargeFileConfig, ScanError,
};
