//! Console renderers.
//!
//! Every function writes to any [`Write`] so output can be captured in
//! tests; the binary passes a locked stdout.

use std::io::{self, Write};
use std::time::SystemTime;

use spacelens_analyze::{CacheLocation, CacheReport, UsageSummary, days_between};
use spacelens_core::ApplicationRecord;
use spacelens_scan::LargeFileReport;

use crate::format::{
    format_count, format_date_or, format_size, format_size_or_dash, format_timestamp, truncate,
};

const RULE_WIDTH: usize = 100;
const CACHE_RULE_WIDTH: usize = 70;
const TOP_EXTENSIONS: usize = 10;

/// Application table with one row per record, followed by the bundle total.
pub fn write_app_table(out: &mut impl Write, apps: &[ApplicationRecord]) -> io::Result<()> {
    if apps.is_empty() {
        writeln!(out, "No applications found.")?;
        return Ok(());
    }

    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Application Analysis ({} apps)", apps.len())?;
    writeln!(out, "{}\n", "=".repeat(RULE_WIDTH))?;

    writeln!(
        out,
        "{:<30} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
        "Application", "App Size", "Data", "Cache", "Installed", "Modified", "Last Used"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH + 20))?;

    for app in apps {
        writeln!(
            out,
            "{:<30} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}",
            truncate(&app.name, 28),
            format_size(app.size),
            format_size_or_dash(app.data_size),
            format_size_or_dash(app.cache_size),
            format_date_or(app.created, "Unknown"),
            format_date_or(app.modified, "Unknown"),
            format_date_or(app.last_used, "Never"),
        )?;
        for profile in &app.profiles {
            writeln!(
                out,
                "  {:<28} {:>11}  ({})",
                truncate(&profile.name, 28),
                format_size(profile.size),
                profile.folder
            )?;
        }
    }

    let total: u64 = apps.iter().map(|a| a.size).sum();
    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Total Storage Used: {}", format_size(total))?;
    writeln!(out, "{}\n", "=".repeat(RULE_WIDTH))?;
    Ok(())
}

/// Totals and the never-used, stale and old application lists.
pub fn write_usage_details(
    out: &mut impl Write,
    summary: &UsageSummary<'_>,
    now: SystemTime,
) -> io::Result<()> {
    if summary.app_count == 0 {
        return Ok(());
    }

    writeln!(out, "\nStatistics:")?;
    writeln!(out, "  Total Applications:     {}", summary.app_count)?;
    writeln!(out, "  Total App Size:         {}", format_size(summary.app_size))?;
    writeln!(out, "  Total Data Size:        {}", format_size(summary.data_size))?;
    writeln!(out, "  Total Cache Size:       {}", format_size(summary.cache_size))?;
    writeln!(out, "  Combined Total:         {}", format_size(summary.combined_size()))?;
    writeln!(out, "  Average App Size:       {}", format_size(summary.average_size()))?;
    writeln!(out, "  Recently Modified:      {} apps (last 30 days)", summary.recent.len())?;
    writeln!(out, "  Old Applications:       {} apps (1+ year old)", summary.old.len())?;
    writeln!(out, "  Never Used:             {} apps", summary.never_used.len())?;
    writeln!(out, "  Not Used Recently:      {} apps (6+ months)", summary.stale.len())?;

    if !summary.never_used.is_empty() {
        writeln!(
            out,
            "\n  Never Used Apps ({} apps, {}):",
            summary.never_used.len(),
            format_size(summary.never_used_size())
        )?;
        for app in &summary.never_used {
            writeln!(out, "    {:<50} {:>12}", truncate(&app.name, 50), format_size(app.size))?;
        }
    }

    if !summary.stale.is_empty() {
        writeln!(
            out,
            "\n  Not Used in 6+ Months ({} apps, {}):",
            summary.stale.len(),
            format_size(summary.stale_size())
        )?;
        for app in &summary.stale {
            writeln!(
                out,
                "    {:<40} {:>12}  Last: {}",
                truncate(&app.name, 40),
                format_size(app.size),
                format_date_or(app.last_used, "Never")
            )?;
        }
    }

    if !summary.old.is_empty() {
        writeln!(
            out,
            "\n  Old Applications (Not Modified in 1+ Year - {} apps, {}):",
            summary.old.len(),
            format_size(summary.old_size())
        )?;
        for app in &summary.old {
            let days = app.modified.map(|m| days_between(m, now)).unwrap_or_default();
            writeln!(
                out,
                "    {:<50} {:>12}  ({days} days)",
                truncate(&app.name, 50),
                format_size(app.size)
            )?;
        }
    }

    Ok(())
}

/// Statistics block for one cache location.
pub fn write_cache_location(out: &mut impl Write, location: &CacheLocation) -> io::Result<()> {
    let stats = &location.stats;

    writeln!(out, "\n{}", "=".repeat(CACHE_RULE_WIDTH))?;
    writeln!(out, "Cache Folder: {}", location.path.display())?;
    writeln!(out, "{}", "=".repeat(CACHE_RULE_WIDTH))?;

    writeln!(out, "\nOverall Statistics:")?;
    writeln!(out, "  Total Size:      {}", format_size(stats.total_size_bytes))?;
    writeln!(out, "  Files:           {}", format_count(stats.file_count))?;
    writeln!(out, "  Folders:         {}", format_count(stats.folder_count))?;
    if stats.skipped_entries > 0 {
        writeln!(out, "  Skipped:         {}", format_count(stats.skipped_entries))?;
    }
    if let Some((_, modified)) = &stats.oldest_file {
        writeln!(out, "  Oldest File:     {}", format_timestamp(*modified))?;
    }
    if let Some((_, modified)) = &stats.newest_file {
        writeln!(out, "  Newest File:     {}", format_timestamp(*modified))?;
    }
    if let Some((path, size)) = &stats.largest_file {
        writeln!(out, "  Largest File:    {}", format_size(*size))?;
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        writeln!(out, "                   {name}")?;
    }

    writeln!(out, "\nAge Distribution:")?;
    for (bucket, count) in stats.age_buckets.iter().filter(|(_, c)| *c > 0) {
        writeln!(out, "  {:15} {} files", bucket.to_string(), format_count(count))?;
    }

    let extensions = stats.top_extensions(TOP_EXTENSIONS);
    if !extensions.is_empty() {
        writeln!(out, "\nTop File Types by Size:")?;
        for (ext, ext_stats) in extensions {
            writeln!(
                out,
                "  {:20} {:>6} files  {:>12}",
                ext,
                format_count(ext_stats.count),
                format_size(ext_stats.size)
            )?;
        }
    }

    if let Some(subfolders) = stats.immediate_subfolder_sizes.as_ref().filter(|s| !s.is_empty()) {
        writeln!(out, "\nTop {} Largest Subfolders:", subfolders.len())?;
        for (path, size) in subfolders {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            writeln!(out, "  {:>12}  {name}", format_size(*size))?;
        }
    }

    Ok(())
}

/// Every location in a cache report, largest first, then the grand total.
pub fn write_cache_report(out: &mut impl Write, report: &CacheReport) -> io::Result<()> {
    for path in &report.missing {
        writeln!(out, " Could not analyze: {}", path.display())?;
    }
    if report.is_empty() {
        writeln!(out, "No cache data found.")?;
        return Ok(());
    }

    for location in &report.locations {
        write_cache_location(out, location)?;
    }

    writeln!(out, "\n{}", "=".repeat(CACHE_RULE_WIDTH))?;
    writeln!(out, "Total Cache Size: {}", format_size(report.total_size()))?;
    writeln!(out, "{}", "=".repeat(CACHE_RULE_WIDTH))?;
    Ok(())
}

/// Large-file listing; `min_size_mb` is echoed when nothing was found.
pub fn write_large_files(
    out: &mut impl Write,
    report: &LargeFileReport,
    min_size_mb: f64,
) -> io::Result<()> {
    if report.interrupted {
        writeln!(out, "\n\nSearch interrupted by user.")?;
    }
    if report.is_empty() {
        writeln!(out, "No files larger than {min_size_mb} MB found.")?;
        return Ok(());
    }

    writeln!(out, "Found {} large files:\n", report.files.len())?;
    writeln!(out, "{:<12} Path", "Size")?;
    writeln!(out, "{}", "-".repeat(80))?;
    for file in &report.files {
        writeln!(out, "{:<12} {}", format_size(file.size), file.path.display())?;
    }
    writeln!(out, "{}", "-".repeat(80))?;
    writeln!(out, "Total: {}", format_size(report.total_size()))?;
    Ok(())
}

/// Closing summary printed after the HTML report is written.
pub fn write_run_summary(
    out: &mut impl Write,
    summary: &UsageSummary<'_>,
    cache_total: u64,
) -> io::Result<()> {
    writeln!(out, "\n{}", "=".repeat(CACHE_RULE_WIDTH))?;
    writeln!(out, "Summary:")?;
    writeln!(
        out,
        "  Applications:   {} apps, {}",
        summary.app_count,
        format_size(summary.app_size)
    )?;
    writeln!(out, "  Data:           {}", format_size(summary.data_size))?;
    writeln!(out, "  Cache:          {}", format_size(cache_total))?;
    writeln!(
        out,
        "  Total:          {}",
        format_size(summary.app_size + summary.data_size + cache_total)
    )?;
    writeln!(out, "{}", "=".repeat(CACHE_RULE_WIDTH))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacelens_core::BundleMetadata;
    use spacelens_scan::LargeFile;
    use std::path::PathBuf;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn app(name: &str, size: u64) -> ApplicationRecord {
        ApplicationRecord {
            name: name.into(),
            path: PathBuf::from(format!("/Applications/{name}.app")),
            metadata: BundleMetadata::fallback(name),
            created: None,
            modified: None,
            last_used: None,
            size,
            data_size: 0,
            cache_size: 0,
            profiles: Vec::new(),
        }
    }

    #[test]
    fn test_app_table_empty() {
        let text = render(|out| write_app_table(out, &[]));
        assert_eq!(text, "No applications found.\n");
    }

    #[test]
    fn test_app_table_rows() {
        let text = render(|out| write_app_table(out, &[app("Editor", 2048)]));
        assert!(text.contains("Application Analysis (1 apps)"));
        assert!(text.contains("Editor"));
        assert!(text.contains("Never"));
        assert!(text.contains("Total Storage Used: 2.00 kB"));
    }

    #[test]
    fn test_large_files_empty_and_interrupted() {
        let report = LargeFileReport {
            files: Vec::new(),
            interrupted: true,
        };
        let text = render(|out| write_large_files(out, &report, 100.0));
        assert!(text.contains("Search interrupted by user."));
        assert!(text.contains("No files larger than 100 MB found."));
    }

    #[test]
    fn test_large_files_listing() {
        let report = LargeFileReport {
            files: vec![LargeFile {
                path: PathBuf::from("/data/movie.mkv"),
                size: 300 * 1024 * 1024,
            }],
            interrupted: false,
        };
        let text = render(|out| write_large_files(out, &report, 100.0));
        assert!(text.contains("Found 1 large files:"));
        assert!(text.contains("/data/movie.mkv"));
        assert!(text.contains("Total: 300.00 MB"));
    }
}
