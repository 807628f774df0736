//! spacelens - disk usage inventory for applications, caches and large files.
//!
//! Usage:
//!   spacelens apps [FOLDER]       Installed applications and their footprint
//!   spacelens caches [PATHS...]   Size and age statistics of cache folders
//!   spacelens large [DIRECTORY]   Files above a size threshold
//!   spacelens report              Write the combined HTML report
//!   spacelens --help              Show help

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use spacelens_analyze::{
    ApplicationInventory, CacheInventory, SortKey, UsageSummary, sort_and_limit,
};
use spacelens_core::{InventoryConfig, LargeFileConfig, LibraryLocations, ScanError};
use spacelens_report::{DEFAULT_REPORT_FILE, HtmlReport, format_size, text};
use spacelens_scan::{InterruptFlag, LargeFileFinder};

#[derive(Parser)]
#[command(
    name = "spacelens",
    version,
    about = "Disk usage inventory for applications, caches and large files",
    long_about = "spacelens shows where disk space goes on a Mac: installed applications \
                  with their data and cache folders, the well-known cache locations, \
                  and individual large files. It never modifies anything it scans."
)]
struct Cli {
    /// Inventory configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze installed applications
    Apps {
        /// Applications folder (defaults to the configured root, /Applications)
        folder: Option<PathBuf>,

        /// Sort applications by size, created, modified or name
        #[arg(long, default_value_t = SortKey::Size)]
        sort: SortKey,

        /// Show only the top N applications
        #[arg(long)]
        top: Option<usize>,

        /// Show detailed statistics (default)
        #[arg(long, overrides_with = "no_detailed")]
        detailed: bool,

        /// Hide detailed statistics
        #[arg(long, overrides_with = "detailed")]
        no_detailed: bool,

        /// Also analyze ~/Applications
        #[arg(long)]
        user: bool,
    },

    /// Analyze cache folders
    Caches {
        /// Paths to analyze (defaults to the common cache locations)
        paths: Vec<PathBuf>,

        /// Do not recurse into subdirectories
        #[arg(long)]
        no_recursive: bool,

        /// Analyze the common cache locations in addition to PATHS
        #[arg(long)]
        common: bool,

        /// Show the largest subfolders of each location
        #[arg(long)]
        show_subfolders: bool,

        /// Number of subfolders to show
        #[arg(long, default_value = "30")]
        top_n: usize,
    },

    /// Find files above a size threshold
    Large {
        /// Directory to search
        #[arg(default_value = ".")]
        directory: PathBuf,

        /// Minimum file size in MB
        #[arg(long, default_value = "100")]
        min_size: f64,

        /// Maximum number of files to list
        #[arg(long, default_value = "50")]
        max_results: usize,

        /// Additional directory names to skip
        #[arg(long, num_args = 1..)]
        exclude: Vec<String>,
    },

    /// Analyze applications and caches and write an HTML report
    Report {
        /// Output file
        #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => InventoryConfig::load_from(path)
            .wrap_err_with(|| format!("Invalid configuration file {}", path.display()))?,
        None => InventoryConfig::load(),
    };
    let locations = LibraryLocations::detect();

    match cli.command {
        Command::Apps {
            folder,
            sort,
            top,
            detailed: _,
            no_detailed,
            user,
        } => {
            run_apps(config, locations, folder, sort, top, !no_detailed, user)?;
        }
        Command::Caches {
            paths,
            no_recursive,
            common,
            show_subfolders,
            top_n,
        } => {
            let top = show_subfolders.then_some(top_n);
            run_caches(&config, &locations, &paths, common, !no_recursive, top)?;
        }
        Command::Large {
            directory,
            min_size,
            max_results,
            exclude,
        } => {
            run_large(&config, directory, min_size, max_results, exclude)?;
        }
        Command::Report { output } => {
            run_report(config, locations, &output)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Analyze one or two applications folders and print the table.
fn run_apps(
    config: InventoryConfig,
    locations: LibraryLocations,
    folder: Option<PathBuf>,
    sort: SortKey,
    top: Option<usize>,
    detailed: bool,
    user: bool,
) -> Result<()> {
    let folder = folder.unwrap_or_else(|| config.applications_root.clone());
    let user_folder = locations.user_applications();
    let inventory = ApplicationInventory::new(config, locations);

    let mut apps = match inventory.scan_folder(&folder) {
        Ok(apps) => apps,
        Err(ScanError::NotFound { path }) => {
            println!("Folder not found: {}", path.display());
            Vec::new()
        }
        Err(err) => {
            println!("{err}");
            Vec::new()
        }
    };

    if user && user_folder.exists() {
        eprintln!("\nAnalyzing user applications...");
        apps.extend(inventory.scan(&[user_folder]));
    }

    let now = SystemTime::now();
    let mut out = io::stdout().lock();

    let listed = sort_and_limit(apps.clone(), sort, top);
    text::write_app_table(&mut out, &listed)?;

    if detailed {
        let summary = UsageSummary::classify(&apps, now);
        text::write_usage_details(&mut out, &summary, now)?;
    }

    out.flush()?;
    Ok(())
}

/// Analyze cache locations and print a statistics block per location.
fn run_caches(
    config: &InventoryConfig,
    locations: &LibraryLocations,
    paths: &[PathBuf],
    common: bool,
    recursive: bool,
    top_subfolders: Option<usize>,
) -> Result<()> {
    let defaults = expand_all(locations, &config.cache_locations);
    let explicit = expand_all(locations, paths);
    let targets = CacheInventory::targets(&explicit, common, &defaults);

    println!("Analyzing {} cache location(s)...", targets.len());

    let report = CacheInventory::new(recursive, top_subfolders).analyze(&targets);

    let mut out = io::stdout().lock();
    text::write_cache_report(&mut out, &report)?;
    out.flush()?;
    Ok(())
}

/// Search a directory for large files; Ctrl-C stops the walk and prints
/// what was found so far.
fn run_large(
    config: &InventoryConfig,
    directory: PathBuf,
    min_size_mb: f64,
    max_results: usize,
    extra_excludes: Vec<String>,
) -> Result<()> {
    let mut exclude = config.large_file_excludes.clone();
    exclude.extend(extra_excludes);

    let finder_config = LargeFileConfig::builder()
        .root(&directory)
        .min_size_bytes(LargeFileConfig::megabytes(min_size_mb))
        .max_results(max_results)
        .exclude(exclude)
        .build()
        .wrap_err("Invalid large-file options")?;

    let interrupt = InterruptFlag::new();
    let handler_flag = interrupt.clone();
    ctrlc::set_handler(move || handler_flag.raise())
        .wrap_err("Failed to install Ctrl-C handler")?;

    println!("Scanning {}...", directory.display());
    println!("Looking for files larger than {min_size_mb} MB\n");

    let finder = LargeFileFinder::new(finder_config).with_interrupt(interrupt);
    let report = match finder.find() {
        Ok(report) => report,
        Err(ScanError::NotFound { .. }) => {
            println!("Error: Directory '{}' does not exist", directory.display());
            return Ok(());
        }
        Err(ScanError::NotADirectory { .. }) => {
            println!("Error: '{}' is not a directory", directory.display());
            return Ok(());
        }
        Err(err) => {
            println!("Error: {err}");
            return Ok(());
        }
    };

    let mut out = io::stdout().lock();
    text::write_large_files(&mut out, &report, min_size_mb)?;
    out.flush()?;
    Ok(())
}

/// Analyze applications and caches, then write the HTML report.
fn run_report(config: InventoryConfig, locations: LibraryLocations, output: &Path) -> Result<()> {
    println!("spacelens storage report");
    println!("{}", "=".repeat(70));

    let cache_targets = expand_all(&locations, &config.cache_locations);
    let folders: Vec<PathBuf> = [config.applications_root.clone(), locations.user_applications()]
        .into_iter()
        .filter(|f| f.exists())
        .collect();

    println!("\n[1/3] Analyzing applications...");
    let inventory = ApplicationInventory::new(config, locations);
    let apps = inventory.scan(&folders);
    println!("      Found {} applications", apps.len());

    println!("\n[2/3] Analyzing cache locations...");
    let caches = CacheInventory::new(true, Some(30)).analyze(&cache_targets);
    for location in &caches.locations {
        println!(
            "      {}: {}",
            location.path.display(),
            format_size(location.stats.total_size_bytes)
        );
    }

    println!("\n[3/3] Generating HTML report...");
    let now = SystemTime::now();
    HtmlReport::new(&apps, &caches, now)
        .write_to(output)
        .wrap_err("Failed to write HTML report")?;

    println!("\nReport generated: {}", output.display());

    let summary = UsageSummary::classify(&apps, now);
    let mut out = io::stdout().lock();
    text::write_run_summary(&mut out, &summary, caches.total_size())?;
    out.flush()?;
    Ok(())
}

fn expand_all(locations: &LibraryLocations, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().map(|p| locations.expand(p)).collect()
}
