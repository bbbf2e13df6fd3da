use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use photo_geotag::error::GeotagError;
use photo_geotag::geocode::{NominatimResolver, PlaceResolver};
use photo_geotag::{config, discover, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "photo-geotag",
    version,
    about = "Reverse-geocode JPEG GPS coordinates and write place names to .txt sidecars"
)]
struct Cli {
    /// Directory to scan recursively for .jpg/.jpeg images
    #[arg(value_name = "PATH", required_unless_present = "init")]
    path: Option<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Resolve place names without writing sidecar files
    #[arg(long)]
    dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let Some(root) = cli.path else {
        anyhow::bail!("No directory specified. Use --help for usage.");
    };

    if !root.exists() {
        return Err(GeotagError::PathNotFound(root).into());
    }

    // Load config
    let mut config = config::Config::load(cli.config.as_deref())?;

    // Override dry_run from CLI flag
    if cli.dry_run {
        config.output.dry_run = true;
    }

    // Discover images
    let queue = discover::discover(&root);
    log::info!("Found {} image(s) to process", queue.len());
    let report = if queue.is_empty() {
        // Nothing to resolve; skip building the HTTP client.
        pipeline::RunReport::default()
    } else {
        if config.output.dry_run {
            log::info!("DRY RUN — no sidecar files will be written");
        }

        let resolver = NominatimResolver::new(&config.geocoder)?;
        log::info!("Geocoder: {} ({})", resolver.name(), config.geocoder.endpoint);

        pipeline::run(&queue, &resolver, &config).await?
    };

    // JSON output
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    // Summary
    let s = &report.summary;
    log::info!(
        "Done: {} annotated, {} without GPS, {} unreadable metadata, {} unresolved, {} failed to open{} out of {} images",
        s.annotated,
        s.no_location,
        s.metadata_unreadable,
        s.unresolved,
        s.open_failed,
        if s.dry_run > 0 {
            format!(", {} dry run", s.dry_run)
        } else {
            String::new()
        },
        s.total
    );

    Ok(())
}
