//! Self-contained HTML storage report.

use std::fmt::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use spacelens_analyze::{CacheReport, UsageSummary, days_between};
use spacelens_core::ApplicationRecord;

use crate::error::ReportError;
use crate::format::{format_count, format_date_or, format_size, format_size_or_dash, size_class};

/// Default file name of the report.
pub const DEFAULT_REPORT_FILE: &str = "storage_report.html";

const TOP_APPS: usize = 20;
const TOP_STALE: usize = 20;
const TOP_SUBFOLDERS: usize = 15;
const GIB: u64 = 1024 * 1024 * 1024;

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 20px; min-height: 100vh; }
.container { max-width: 1400px; margin: 0 auto; background: white; border-radius: 16px; box-shadow: 0 20px 60px rgba(0,0,0,0.3); overflow: hidden; }
header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 40px; text-align: center; }
header h1 { font-size: 2.5rem; margin-bottom: 10px; font-weight: 700; }
header p { font-size: 1.1rem; opacity: 0.9; }
.summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 20px; padding: 40px; background: #f8f9fa; }
.summary-card { background: white; padding: 25px; border-radius: 12px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }
.summary-card h3 { color: #667eea; font-size: 0.9rem; text-transform: uppercase; letter-spacing: 1px; margin-bottom: 10px; font-weight: 600; }
.summary-card .value { font-size: 2rem; font-weight: 700; color: #2d3748; }
.summary-card .subtitle { color: #718096; font-size: 0.85rem; margin-top: 5px; }
.content { padding: 40px; }
section { margin-bottom: 50px; }
h2 { color: #2d3748; font-size: 1.8rem; margin-bottom: 20px; padding-bottom: 10px; border-bottom: 3px solid #667eea; }
h3 { color: #4a5568; font-size: 1.3rem; margin: 30px 0 15px; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; background: white; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
thead { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; }
th { padding: 15px; text-align: left; font-weight: 600; font-size: 0.9rem; text-transform: uppercase; letter-spacing: 0.5px; }
th.right, td.right { text-align: right; }
td { padding: 12px 15px; border-bottom: 1px solid #e2e8f0; color: #4a5568; }
tbody tr:hover { background: #f7fafc; }
tbody tr:last-child td { border-bottom: none; }
.warning { background: #fff3cd; border-left: 4px solid #ffc107; padding: 15px; margin: 20px 0; border-radius: 4px; }
.info { background: #d1ecf1; border-left: 4px solid #17a2b8; padding: 15px; margin: 20px 0; border-radius: 4px; }
.info ul { margin-left: 20px; line-height: 1.8; }
.size-large { color: #dc3545; font-weight: 600; }
.size-medium { color: #ffc107; font-weight: 600; }
.badge { display: inline-block; padding: 4px 10px; border-radius: 12px; font-size: 0.75rem; font-weight: 600; text-transform: uppercase; }
.badge-warning { background: #fffbea; color: #ff8c00; }
footer { background: #2d3748; color: white; padding: 20px; text-align: center; font-size: 0.9rem; }
"#;

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inputs of the storage report.
pub struct HtmlReport<'a> {
    apps: &'a [ApplicationRecord],
    caches: &'a CacheReport,
    generated_at: SystemTime,
}

impl<'a> HtmlReport<'a> {
    /// Create a report over application records and cache locations.
    pub fn new(apps: &'a [ApplicationRecord], caches: &'a CacheReport, generated_at: SystemTime) -> Self {
        Self {
            apps,
            caches,
            generated_at,
        }
    }

    /// Cache-location total plus the bundle sizes of never-used applications.
    pub fn reclaimable(&self) -> u64 {
        self.reclaimable_for(&UsageSummary::classify(self.apps, self.generated_at))
    }

    fn reclaimable_for(&self, summary: &UsageSummary<'_>) -> u64 {
        self.caches.total_size() + summary.never_used_size()
    }

    /// Render the complete document.
    pub fn render(&self) -> String {
        let mut html = String::new();
        self.render_into(&mut html).expect("writing to a String cannot fail");
        html
    }

    /// Render and write the document to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.render()).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Wrote report to {}", path.display());
        Ok(())
    }

    fn render_into(&self, html: &mut String) -> fmt::Result {
        let now = self.generated_at;
        let local = DateTime::<Local>::from(now);
        let summary = UsageSummary::classify(self.apps, now);
        let cache_total = self.caches.total_size();

        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"UTF-8\">")?;
        writeln!(
            html,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(html, "<title>Storage Report - {}</title>", local.format("%Y-%m-%d %H:%M"))?;
        writeln!(html, "<style>{STYLE}</style>")?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        writeln!(html, "<div class=\"container\">")?;
        writeln!(html, "<header>")?;
        writeln!(html, "<h1>Storage Report</h1>")?;
        writeln!(
            html,
            "<p>Generated on {}</p>",
            local.format("%B %d, %Y at %H:%M:%S")
        )?;
        writeln!(html, "</header>")?;

        self.summary_cards(html, &summary, cache_total)?;

        writeln!(html, "<div class=\"content\">")?;
        writeln!(html, "<section>")?;
        writeln!(html, "<h2>Applications Storage Analysis</h2>")?;
        self.top_apps_table(html)?;
        self.never_used_table(html, &summary)?;
        self.stale_table(html, &summary)?;
        writeln!(html, "</section>")?;

        writeln!(html, "<section>")?;
        writeln!(html, "<h2>Cache Storage Analysis</h2>")?;
        self.cache_tables(html)?;
        writeln!(html, "</section>")?;

        self.recommendations(html, &summary, cache_total)?;
        writeln!(html, "</div>")?;

        writeln!(html, "<footer>")?;
        writeln!(html, "<p>Generated by spacelens</p>")?;
        writeln!(
            html,
            "<p>Report generated at {}</p>",
            local.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(html, "</footer>")?;
        writeln!(html, "</div>")?;
        writeln!(html, "</body>")?;
        writeln!(html, "</html>")
    }

    fn summary_cards(
        &self,
        html: &mut String,
        summary: &UsageSummary<'_>,
        cache_total: u64,
    ) -> fmt::Result {
        let cards = [
            ("Total Apps Analyzed", summary.app_count.to_string(), "Installed applications"),
            ("Apps Storage", format_size(summary.app_size), "Application binaries"),
            ("Data Storage", format_size(summary.data_size), "Application data"),
            ("Cache Storage", format_size(cache_total), "System-wide caches"),
            (
                "Total Storage",
                format_size(summary.app_size + summary.data_size + cache_total),
                "Combined total",
            ),
            (
                "Reclaimable Space",
                format_size(self.reclaimable_for(summary)),
                "Potential cleanup",
            ),
        ];

        writeln!(html, "<div class=\"summary\">")?;
        for (title, value, subtitle) in cards {
            writeln!(html, "<div class=\"summary-card\">")?;
            writeln!(html, "<h3>{title}</h3>")?;
            writeln!(html, "<div class=\"value\">{value}</div>")?;
            writeln!(html, "<div class=\"subtitle\">{subtitle}</div>")?;
            writeln!(html, "</div>")?;
        }
        writeln!(html, "</div>")
    }

    fn top_apps_table(&self, html: &mut String) -> fmt::Result {
        let mut by_size: Vec<&ApplicationRecord> = self.apps.iter().collect();
        by_size.sort_by_key(|a| std::cmp::Reverse(a.size));
        by_size.truncate(TOP_APPS);

        writeln!(html, "<h3>Top {TOP_APPS} Largest Applications</h3>")?;
        table_head(
            html,
            &[
                ("Application", false),
                ("App Size", true),
                ("Data Size", true),
                ("Cache Size", true),
                ("Total", true),
                ("Last Used", false),
            ],
        )?;
        for app in by_size {
            let total = app.total_footprint();
            let last_used = match app.last_used {
                Some(_) => format_date_or(app.last_used, "Never"),
                None => "<span class=\"badge badge-warning\">Never</span>".to_string(),
            };
            writeln!(html, "<tr>")?;
            writeln!(html, "<td><strong>{}</strong></td>", escape_html(&app.name))?;
            writeln!(html, "<td class=\"right\">{}</td>", format_size(app.size))?;
            writeln!(html, "<td class=\"right\">{}</td>", format_size_or_dash(app.data_size))?;
            writeln!(html, "<td class=\"right\">{}</td>", format_size_or_dash(app.cache_size))?;
            writeln!(
                html,
                "<td class=\"right {}\">{}</td>",
                size_class(total),
                format_size(total)
            )?;
            writeln!(html, "<td>{last_used}</td>")?;
            writeln!(html, "</tr>")?;
        }
        table_tail(html)
    }

    fn never_used_table(&self, html: &mut String, summary: &UsageSummary<'_>) -> fmt::Result {
        if summary.never_used.is_empty() {
            return Ok(());
        }

        let footprint: u64 = summary.never_used.iter().map(|a| a.total_footprint()).sum();
        writeln!(
            html,
            "<h3>Never Used Applications ({} apps, {})</h3>",
            summary.never_used.len(),
            format_size(footprint)
        )?;
        writeln!(
            html,
            "<div class=\"warning\">These applications have never been opened. \
             Consider removing them to free up space.</div>"
        )?;
        table_head(
            html,
            &[("Application", false), ("Total Size", true), ("Installed", false)],
        )?;
        for app in &summary.never_used {
            writeln!(html, "<tr>")?;
            writeln!(html, "<td><strong>{}</strong></td>", escape_html(&app.name))?;
            writeln!(html, "<td class=\"right\">{}</td>", format_size(app.total_footprint()))?;
            writeln!(html, "<td>{}</td>", format_date_or(app.created, "Unknown"))?;
            writeln!(html, "</tr>")?;
        }
        table_tail(html)
    }

    fn stale_table(&self, html: &mut String, summary: &UsageSummary<'_>) -> fmt::Result {
        if summary.stale.is_empty() {
            return Ok(());
        }

        let footprint: u64 = summary.stale.iter().map(|a| a.total_footprint()).sum();
        writeln!(
            html,
            "<h3>Not Used Recently ({} apps, {})</h3>",
            summary.stale.len(),
            format_size(footprint)
        )?;
        writeln!(
            html,
            "<div class=\"info\">These applications haven't been used in over 6 months.</div>"
        )?;
        table_head(
            html,
            &[
                ("Application", false),
                ("Total Size", true),
                ("Last Used", false),
                ("Days Ago", false),
            ],
        )?;
        for app in summary.stale.iter().take(TOP_STALE) {
            let days = app
                .last_used
                .map(|t| days_between(t, self.generated_at))
                .unwrap_or_default();
            writeln!(html, "<tr>")?;
            writeln!(html, "<td><strong>{}</strong></td>", escape_html(&app.name))?;
            writeln!(html, "<td class=\"right\">{}</td>", format_size(app.total_footprint()))?;
            writeln!(html, "<td>{}</td>", format_date_or(app.last_used, "Never"))?;
            writeln!(html, "<td>{days} days</td>")?;
            writeln!(html, "</tr>")?;
        }
        table_tail(html)
    }

    fn cache_tables(&self, html: &mut String) -> fmt::Result {
        writeln!(html, "<h3>Cache Locations</h3>")?;
        table_head(
            html,
            &[("Location", false), ("Size", true), ("Files", true), ("Folders", true)],
        )?;
        for location in &self.caches.locations {
            let stats = &location.stats;
            writeln!(html, "<tr>")?;
            writeln!(
                html,
                "<td><code>{}</code></td>",
                escape_html(&location.path.to_string_lossy())
            )?;
            writeln!(
                html,
                "<td class=\"right {}\">{}</td>",
                size_class(stats.total_size_bytes),
                format_size(stats.total_size_bytes)
            )?;
            writeln!(html, "<td class=\"right\">{}</td>", format_count(stats.file_count))?;
            writeln!(html, "<td class=\"right\">{}</td>", format_count(stats.folder_count))?;
            writeln!(html, "</tr>")?;
        }
        table_tail(html)?;

        let Some(largest) = self.caches.largest() else {
            return Ok(());
        };
        let Some(subfolders) = largest
            .stats
            .immediate_subfolder_sizes
            .as_ref()
            .filter(|s| !s.is_empty())
        else {
            return Ok(());
        };

        writeln!(
            html,
            "<h3>Top Subfolders in {}</h3>",
            escape_html(&largest.path.to_string_lossy())
        )?;
        table_head(html, &[("Folder", false), ("Size", true)])?;
        for (path, size) in subfolders.iter().take(TOP_SUBFOLDERS) {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            writeln!(html, "<tr>")?;
            writeln!(html, "<td><code>{}</code></td>", escape_html(&name))?;
            writeln!(
                html,
                "<td class=\"right {}\">{}</td>",
                size_class(*size),
                format_size(*size)
            )?;
            writeln!(html, "</tr>")?;
        }
        table_tail(html)
    }

    fn recommendations(
        &self,
        html: &mut String,
        summary: &UsageSummary<'_>,
        cache_total: u64,
    ) -> fmt::Result {
        writeln!(html, "<section>")?;
        writeln!(html, "<h2>Recommendations</h2>")?;
        writeln!(html, "<div class=\"info\">")?;
        writeln!(html, "<h3>Quick Wins</h3>")?;
        writeln!(html, "<ul>")?;

        if !summary.never_used.is_empty() {
            let footprint: u64 = summary.never_used.iter().map(|a| a.total_footprint()).sum();
            writeln!(
                html,
                "<li><strong>Remove {} never-used applications</strong> to free up {}</li>",
                summary.never_used.len(),
                format_size(footprint)
            )?;
        }
        if cache_total > GIB {
            writeln!(
                html,
                "<li><strong>Clear cache folders</strong> to reclaim {}</li>",
                format_size(cache_total)
            )?;
        }
        if !summary.stale.is_empty() {
            writeln!(
                html,
                "<li><strong>Review {} unused applications</strong> (not used in 6+ months)</li>",
                summary.stale.len()
            )?;
        }

        writeln!(html, "</ul>")?;
        writeln!(html, "</div>")?;
        writeln!(html, "</section>")
    }
}

fn table_head(html: &mut String, columns: &[(&str, bool)]) -> fmt::Result {
    writeln!(html, "<table>")?;
    writeln!(html, "<thead>")?;
    writeln!(html, "<tr>")?;
    for (title, right) in columns {
        if *right {
            writeln!(html, "<th class=\"right\">{title}</th>")?;
        } else {
            writeln!(html, "<th>{title}</th>")?;
        }
    }
    writeln!(html, "</tr>")?;
    writeln!(html, "</thead>")?;
    writeln!(html, "<tbody>")
}

fn table_tail(html: &mut String) -> fmt::Result {
    writeln!(html, "</tbody>")?;
    writeln!(html, "</table>")
}
