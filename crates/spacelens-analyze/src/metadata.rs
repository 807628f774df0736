//! Bundle manifests and launch-time lookups.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use chrono::{DateTime, NaiveDateTime};
use compact_str::CompactString;

use spacelens_core::{BundleMetadata, UNKNOWN};

const MANIFEST: &str = "Contents/Info.plist";
const MDLS: &str = "mdls";
const LAST_USED_ATTRIBUTE: &str = "kMDItemLastUsedDate";
const MDLS_NULL: &str = "(null)";
const MDLS_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Read name, identifier and version from a bundle's `Info.plist`.
///
/// Returns `None` when the manifest is missing or is not a dictionary.
/// Individual missing keys fall back to the bundle stem (name) or
/// [`UNKNOWN`].
pub fn read_bundle_metadata(bundle: &Path) -> Option<BundleMetadata> {
    let manifest = bundle.join(MANIFEST);
    let value = match plist::Value::from_file(&manifest) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!("Unreadable manifest {}: {err}", manifest.display());
            return None;
        }
    };
    let dict = value.as_dictionary()?;

    let field = |key: &str| dict.get(key).and_then(plist::Value::as_string).map(CompactString::from);

    Some(BundleMetadata {
        display_name: field("CFBundleName").unwrap_or_else(|| bundle_stem(bundle)),
        identifier: field("CFBundleIdentifier").unwrap_or(CompactString::const_new(UNKNOWN)),
        version: field("CFBundleShortVersionString").unwrap_or(CompactString::const_new(UNKNOWN)),
    })
}

/// File name of a bundle without its `.app` suffix.
pub fn bundle_stem(bundle: &Path) -> CompactString {
    bundle
        .file_stem()
        .map(|s| CompactString::from(s.to_string_lossy()))
        .unwrap_or_default()
}

/// Source of operating-system "last opened" timestamps.
pub trait UsageProbe: Send + Sync {
    /// When the bundle was last opened, if the OS recorded it.
    fn last_opened(&self, bundle: &Path) -> Option<SystemTime>;
}

/// Queries Spotlight metadata through `mdls`, bounded by a deadline.
///
/// The bundle path is passed as the last argument. A lookup that outlives
/// the deadline is killed and reported as unknown.
#[derive(Debug, Clone)]
pub struct SpotlightProbe {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SpotlightProbe {
    /// Create an `mdls` probe with the given deadline per lookup.
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: MDLS.to_string(),
            args: ["-name", LAST_USED_ATTRIBUTE, "-raw"]
                .iter()
                .map(|a| a.to_string())
                .collect(),
            timeout,
        }
    }

    /// Run `program` with `args` instead of `mdls`.
    pub fn with_command<I, S>(mut self, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program = program.into();
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for SpotlightProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl UsageProbe for SpotlightProbe {
    fn last_opened(&self, bundle: &Path) -> Option<SystemTime> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(bundle)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .ok()?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
                Ok(None) => {
                    tracing::debug!("{} timed out for {}", self.program, bundle.display());
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                Err(_) => return None,
            }
        };
        if !status.success() {
            return None;
        }

        let mut output = String::new();
        child.stdout.take()?.read_to_string(&mut output).ok()?;
        parse_mdls_date(&output)
    }
}

/// Probe that never reports a launch time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl UsageProbe for NoProbe {
    fn last_opened(&self, _bundle: &Path) -> Option<SystemTime> {
        None
    }
}

/// Parse a raw `mdls` date such as `2024-03-01 09:15:42 +0000`.
pub fn parse_mdls_date(raw: &str) -> Option<SystemTime> {
    let raw = raw.trim();
    if raw.is_empty() || raw == MDLS_NULL {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_str(raw, MDLS_DATE_FORMAT) {
        return Some(date.into());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().into())
}
