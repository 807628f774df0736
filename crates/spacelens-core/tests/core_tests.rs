use spacelens_core::{
    Aggregate, AgeBucket, AgeHistogram, ApplicationRecord, BundleMetadata, ConfigError,
    DirectoryStats, FolderOverride, InventoryConfig, LibraryLocations, NO_EXTENSION,
    extension_key,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const DAY: u64 = 86_400;

#[test]
fn test_age_bucket_labels_and_order() {
    let labels: Vec<String> = AgeBucket::ALL.iter().map(|b| b.to_string()).collect();
    assert_eq!(
        labels,
        vec!["0-7 days", "7-30 days", "30-90 days", "90-365 days", "1+ years"]
    );
}

#[test]
fn test_age_bucket_classification() {
    let now = SystemTime::now();
    let ago = |days: u64| now - Duration::from_secs(days * DAY);

    assert_eq!(AgeBucket::classify(ago(7), now), AgeBucket::Week);
    assert_eq!(AgeBucket::classify(ago(8), now), AgeBucket::Month);
    assert_eq!(AgeBucket::classify(ago(30), now), AgeBucket::Month);
    assert_eq!(AgeBucket::classify(ago(90), now), AgeBucket::Quarter);
    assert_eq!(AgeBucket::classify(ago(365), now), AgeBucket::Year);
    assert_eq!(AgeBucket::classify(ago(366), now), AgeBucket::Older);
    assert_eq!(
        AgeBucket::classify(now + Duration::from_secs(DAY), now),
        AgeBucket::Week
    );
}

#[test]
fn test_histogram_totals() {
    let mut histogram = AgeHistogram::default();
    histogram.record(AgeBucket::Week);
    histogram.record(AgeBucket::Week);
    histogram.record(AgeBucket::Older);

    assert_eq!(histogram.count(AgeBucket::Week), 2);
    assert_eq!(histogram.count(AgeBucket::Month), 0);
    assert_eq!(histogram.total(), 3);
    assert_eq!(histogram.iter().count(), 5);
}

#[test]
fn test_stats_accumulation_ties_keep_first() {
    let now = SystemTime::now();
    let mut stats = DirectoryStats::new();

    stats.record_file(Path::new("/c/a.log"), 10, now, AgeBucket::Week);
    stats.record_file(Path::new("/c/b.LOG"), 10, now, AgeBucket::Week);
    stats.record_file(Path::new("/c/Makefile"), 3, now, AgeBucket::Week);
    stats.record_dir();
    stats.record_skipped();

    assert_eq!(stats.total_size_bytes, 23);
    assert_eq!(stats.file_count, 3);
    assert_eq!(stats.folder_count, 1);
    assert_eq!(stats.skipped_entries, 1);
    assert_eq!(stats.largest_file, Some((PathBuf::from("/c/a.log"), 10)));
    assert_eq!(stats.oldest_file, Some((PathBuf::from("/c/a.log"), now)));
    assert_eq!(stats.newest_file, Some((PathBuf::from("/c/a.log"), now)));
    assert_eq!(stats.extension_breakdown[".log"].count, 2);
    assert_eq!(stats.extension_breakdown[NO_EXTENSION].size, 3);

    let top = stats.top_extensions(1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].0, ".log");
}

#[test]
fn test_extension_keys() {
    assert_eq!(extension_key(Path::new("photo.JPG")), ".jpg");
    assert_eq!(extension_key(Path::new("archive.tar.gz")), ".gz");
    assert_eq!(extension_key(Path::new("README")), NO_EXTENSION);
    assert_eq!(extension_key(Path::new(".bashrc")), NO_EXTENSION);
}

#[test]
fn test_aggregate_accessors() {
    let analyzed = Aggregate::Analyzed(DirectoryStats::new());
    let missing = Aggregate::NotAnalyzable {
        path: PathBuf::from("/gone"),
    };

    assert!(analyzed.is_analyzable());
    assert!(analyzed.stats().is_some());
    assert!(!missing.is_analyzable());
    assert!(missing.into_stats().is_none());
}

#[test]
fn test_record_footprint_and_serde() {
    let record = ApplicationRecord {
        name: "Editor".into(),
        path: PathBuf::from("/Applications/Editor.app"),
        metadata: BundleMetadata::fallback("Editor"),
        created: None,
        modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
        last_used: None,
        size: 1,
        data_size: 2,
        cache_size: 3,
        profiles: Vec::new(),
    };
    assert_eq!(record.total_footprint(), 6);

    let toml = toml::to_string(&FolderOverride::new(&["Code"], &["Code"])).unwrap();
    assert!(toml.contains("data"));
}

#[test]
fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        applications_root = "/Volumes/Apps"
        large_file_excludes = ["target"]
        "#,
    )
    .unwrap();

    let config = InventoryConfig::load_from(&path).unwrap();
    assert_eq!(config.applications_root, PathBuf::from("/Volumes/Apps"));
    assert_eq!(config.large_file_excludes, vec!["target".to_string()]);
    assert_eq!(
        config.folders_for("Docker").cache,
        vec!["com.docker.docker".to_string()]
    );
}

#[test]
fn test_load_from_errors() {
    let temp = TempDir::new().unwrap();

    let missing = InventoryConfig::load_from(&temp.path().join("absent.toml"));
    assert!(matches!(missing, Err(ConfigError::Read { .. })));

    let bad = temp.path().join("bad.toml");
    std::fs::write(&bad, "applications_root = [").unwrap();
    assert!(matches!(
        InventoryConfig::load_from(&bad),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_override_dirs_resolve_against_locations() {
    let locations = LibraryLocations::from_home("/Users/me");
    let figma = FolderOverride::new(&["Figma", "figma-desktop"], &["Figma"]);

    assert_eq!(
        figma.data_dirs(&locations),
        vec![
            PathBuf::from("/Users/me/Library/Application Support/Figma"),
            PathBuf::from("/Users/me/Library/Application Support/figma-desktop"),
        ]
    );
    assert_eq!(
        figma.cache_dirs(&locations),
        vec![PathBuf::from("/Users/me/Library/Caches/Figma")]
    );
}
