use filetime::{FileTime, set_file_mtime};
use spacelens_analyze::{
    ApplicationInventory, CacheInventory, NoProbe, SortKey, UsageProbe, UsageSummary,
    sort_and_limit,
};
use spacelens_core::{
    ApplicationRecord, BundleMetadata, InventoryConfig, LibraryLocations,
};
use spacelens_plugin::{AppPlugin, PluginAnalysis, PluginRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const DAY: u64 = 86_400;

struct FixedProbe(Option<SystemTime>);

impl UsageProbe for FixedProbe {
    fn last_opened(&self, _bundle: &Path) -> Option<SystemTime> {
        self.0
    }
}

struct FixedPlugin;

impl AppPlugin for FixedPlugin {
    fn app_name(&self) -> &str {
        "Browser"
    }

    fn analyze(&self, _locations: &LibraryLocations) -> PluginAnalysis {
        PluginAnalysis {
            data_size: 1000,
            cache_size: 2000,
            last_used: None,
            profiles: Vec::new(),
        }
    }
}

fn make_bundle(folder: &Path, name: &str, payload: usize) -> PathBuf {
    let bundle = folder.join(format!("{name}.app"));
    fs::create_dir_all(bundle.join("Contents")).unwrap();
    if payload > 0 {
        fs::write(bundle.join("Contents/binary"), vec![0u8; payload]).unwrap();
    }
    bundle
}

fn make_dir_with(path: &Path, payload: usize) {
    fs::create_dir_all(path).unwrap();
    fs::write(path.join("blob"), vec![0u8; payload]).unwrap();
}

fn inventory_for(home: &Path) -> ApplicationInventory {
    let locations = LibraryLocations::from_home(home);
    let config = InventoryConfig::for_locations(&locations);
    ApplicationInventory::new(config, locations)
        .with_plugins(PluginRegistry::new())
        .with_probe(Box::new(NoProbe))
}

fn record(name: &str, size: u64) -> ApplicationRecord {
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
fn test_same_name_data_and_cache_dirs() {
    let temp = TempDir::new().unwrap();
    let apps_dir = temp.path().join("Applications");
    make_bundle(&apps_dir, "Notes", 10);

    let locations = LibraryLocations::from_home(temp.path());
    make_dir_with(&locations.application_support.join("Notes"), 30);
    make_dir_with(&locations.caches.join("Notes"), 5);

    let apps = inventory_for(temp.path()).scan_folder(&apps_dir).unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].data_size, 30);
    assert_eq!(apps[0].cache_size, 5);
    assert_eq!(apps[0].total_footprint(), 45);
    assert!(apps[0].last_used.is_some());
}

#[test]
fn test_override_table_resolves_irregular_folders() {
    let temp = TempDir::new().unwrap();
    let apps_dir = temp.path().join("Applications");
    make_bundle(&apps_dir, "Visual Studio Code", 10);
    make_bundle(&apps_dir, "Figma", 10);

    let locations = LibraryLocations::from_home(temp.path());
    make_dir_with(&locations.application_support.join("Code"), 70);
    make_dir_with(&locations.caches.join("Code"), 8);
    // Same-name folders must be ignored when an override exists
    make_dir_with(&locations.application_support.join("Visual Studio Code"), 9999);
    make_dir_with(&locations.application_support.join("Figma"), 11);
    make_dir_with(&locations.application_support.join("figma-desktop"), 22);

    let inventory = inventory_for(temp.path());
    let code = inventory
        .analyze_bundle(&apps_dir.join("Visual Studio Code.app"))
        .unwrap();
    let figma = inventory.analyze_bundle(&apps_dir.join("Figma.app")).unwrap();

    assert_eq!(code.data_size, 70);
    assert_eq!(code.cache_size, 8);
    assert_eq!(figma.data_size, 33);
    assert_eq!(figma.cache_size, 0);
}

#[test]
fn test_config_file_override_is_used() {
    let temp = TempDir::new().unwrap();
    let apps_dir = temp.path().join("Applications");
    make_bundle(&apps_dir, "Slack", 10);

    let locations = LibraryLocations::from_home(temp.path());
    make_dir_with(&locations.caches.join("com.tinyspeck.slackmacgap"), 40);

    let config = InventoryConfig::parse(
        r#"
        [folder_overrides."Slack"]
        data = ["Slack"]
        cache = ["com.tinyspeck.slackmacgap"]
        "#,
    )
    .unwrap();
    let inventory = ApplicationInventory::new(config, locations)
        .with_plugins(PluginRegistry::new())
        .with_probe(Box::new(NoProbe));

    let slack = inventory.analyze_bundle(&apps_dir.join("Slack.app")).unwrap();
    assert_eq!(slack.cache_size, 40);
    assert_eq!(slack.data_size, 0);
}

#[test]
fn test_plugin_overrides_generic_sizes() {
    let temp = TempDir::new().unwrap();
    let apps_dir = temp.path().join("Applications");
    make_bundle(&apps_dir, "Browser", 10);

    let locations = LibraryLocations::from_home(temp.path());
    make_dir_with(&locations.application_support.join("Browser"), 5);

    let mut plugins = PluginRegistry::new();
    plugins.register(Box::new(FixedPlugin));
    let inventory = inventory_for(temp.path()).with_plugins(plugins);

    let browser = inventory.analyze_bundle(&apps_dir.join("Browser.app")).unwrap();
    assert_eq!(browser.data_size, 1000);
    assert_eq!(browser.cache_size, 2000);
    assert!(browser.is_never_used());
}

#[test]
fn test_last_used_is_latest_signal() {
    let temp = TempDir::new().unwrap();
    let apps_dir = temp.path().join("Applications");
    let bundle = make_bundle(&apps_dir, "Notes", 10);

    let locations = LibraryLocations::from_home(temp.path());
    let data = locations.application_support.join("Notes");
    make_dir_with(&data, 1);

    let now = SystemTime::now();
    let folder_time = now - Duration::from_secs(40 * DAY);
    set_file_mtime(&data, FileTime::from_system_time(folder_time)).unwrap();

    let spotlight_newer = now - Duration::from_secs(2 * DAY);
    let newer = inventory_for(temp.path())
        .with_probe(Box::new(FixedProbe(Some(spotlight_newer))))
        .analyze_bundle(&bundle)
        .unwrap();
    assert_eq!(newer.last_used, Some(spotlight_newer));

    let spotlight_older = now - Duration::from_secs(400 * DAY);
    let older = inventory_for(temp.path())
        .with_probe(Box::new(FixedProbe(Some(spotlight_older))))
        .analyze_bundle(&bundle)
        .unwrap();
    let folder_secs = FileTime::from_system_time(folder_time).unix_seconds();
    let got_secs = FileTime::from_system_time(older.last_used.unwrap()).unix_seconds();
    assert_eq!(got_secs, folder_secs);
}

#[test]
fn test_empty_bundles_and_non_bundles_excluded() {
    let temp = TempDir::new().unwrap();
    let apps_dir = temp.path().join("Applications");
    make_bundle(&apps_dir, "Real", 10);
    make_bundle(&apps_dir, "Hollow", 0);
    fs::create_dir_all(apps_dir.join("Utilities")).unwrap();
    fs::write(apps_dir.join("readme.txt"), "hi").unwrap();

    let apps = inventory_for(temp.path()).scan_folder(&apps_dir).unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].name, "Real");
}

#[test]
fn test_scan_continues_past_missing_folder() {
    let temp = TempDir::new().unwrap();
    let system = temp.path().join("Applications");
    let user = temp.path().join("user/Applications");
    make_bundle(&system, "One", 10);
    make_bundle(&user, "Two", 20);

    let apps = inventory_for(temp.path()).scan(&[
        system,
        temp.path().join("missing"),
        user,
    ]);

    let mut names: Vec<&str> = apps.iter().map(|a| a.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["One", "Two"]);
}

#[test]
fn test_sort_keys() {
    let now = SystemTime::now();
    let mut a = record("beta", 30);
    a.modified = Some(now - Duration::from_secs(5 * DAY));
    let mut b = record("Alpha", 10);
    b.modified = Some(now);
    let c = record("gamma", 20);

    let by_size = sort_and_limit(vec![a.clone(), b.clone(), c.clone()], SortKey::Size, None);
    assert_eq!(names(&by_size), vec!["beta", "gamma", "Alpha"]);

    // Missing timestamps sort as the earliest value
    let by_modified = sort_and_limit(vec![c.clone(), a.clone(), b.clone()], SortKey::Modified, None);
    assert_eq!(names(&by_modified), vec!["Alpha", "beta", "gamma"]);

    let by_name = sort_and_limit(vec![c.clone(), a.clone(), b.clone()], SortKey::Name, None);
    assert_eq!(names(&by_name), vec!["Alpha", "beta", "gamma"]);

    let top = sort_and_limit(vec![a, b, c], SortKey::Size, Some(2));
    assert_eq!(names(&top), vec!["beta", "gamma"]);
}

fn names(apps: &[ApplicationRecord]) -> Vec<&str> {
    apps.iter().map(|a| a.name.as_str()).collect()
}

#[test]
fn test_usage_buckets_overlap() {
    let now = SystemTime::now();

    let mut relic = record("Relic", 500);
    relic.modified = Some(now - Duration::from_secs(800 * DAY));
    relic.last_used = Some(now - Duration::from_secs(300 * DAY));

    let mut fresh = record("Fresh", 50);
    fresh.modified = Some(now - Duration::from_secs(3 * DAY));
    fresh.last_used = Some(now);

    let mut unopened = record("Unopened", 90);
    unopened.modified = Some(now - Duration::from_secs(400 * DAY));

    let middle = {
        let mut r = record("Middle", 70);
        r.modified = Some(now - Duration::from_secs(100 * DAY));
        r.last_used = Some(now - Duration::from_secs(100 * DAY));
        r
    };

    let apps = vec![relic, fresh, unopened, middle];
    let summary = UsageSummary::classify(&apps, now);

    assert_eq!(summary.app_count, 4);
    assert_eq!(summary.app_size, 710);
    assert_eq!(summary.average_size(), 177);
    assert_eq!(names_of(&summary.old), vec!["Relic", "Unopened"]);
    assert_eq!(names_of(&summary.recent), vec!["Fresh"]);
    assert_eq!(names_of(&summary.never_used), vec!["Unopened"]);
    assert_eq!(names_of(&summary.stale), vec!["Relic"]);
    assert_eq!(summary.never_used_size(), 90);
}

fn names_of<'a>(apps: &[&'a ApplicationRecord]) -> Vec<&'a str> {
    apps.iter().map(|a| a.name.as_str()).collect()
}

#[test]
fn test_usage_summary_empty() {
    let summary = UsageSummary::classify(&[], SystemTime::now());
    assert_eq!(summary.average_size(), 0);
    assert_eq!(summary.combined_size(), 0);
    assert!(summary.never_used.is_empty());
}

#[test]
fn test_cache_inventory_ranks_and_reports_missing() {
    let temp = TempDir::new().unwrap();
    let small = temp.path().join("small");
    let large = temp.path().join("large");
    let empty = temp.path().join("empty");
    make_dir_with(&small, 10);
    make_dir_with(&large.join("sub"), 500);
    fs::create_dir(&empty).unwrap();
    let missing = temp.path().join("missing");

    let report = CacheInventory::new(true, Some(5)).analyze(&[
        small.clone(),
        missing.clone(),
        large.clone(),
        empty,
    ]);

    let paths: Vec<&PathBuf> = report.locations.iter().map(|l| &l.path).collect();
    assert_eq!(paths, vec![&large, &small]);
    assert_eq!(report.missing, vec![missing]);
    assert_eq!(report.total_size(), 510);

    let largest = report.largest().unwrap();
    assert_eq!(
        largest.stats.immediate_subfolder_sizes,
        Some(vec![(large.join("sub"), 500)])
    );
}

#[test]
fn test_cache_inventory_non_recursive() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("cache");
    make_dir_with(&root, 3);
    make_dir_with(&root.join("nested"), 300);

    let report = CacheInventory::new(false, None).analyze(&[root]);

    assert_eq!(report.total_size(), 3);
    assert_eq!(report.locations[0].stats.folder_count, 1);
    assert!(report.locations[0].stats.immediate_subfolder_sizes.is_none());
}
