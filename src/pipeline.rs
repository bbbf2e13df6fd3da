use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::coords::DecimalCoordinate;
use crate::error::GeotagError;
use crate::exif;
use crate::geocode::{PlaceLabel, PlaceResolver, RetryPolicy, resolve_with_retry};
use crate::sidecar::{sidecar_path, write_sidecar};

/// Terminal state of one image.
///
/// Every variant except [`Outcome::Annotated`] leaves the image without a
/// sidecar, so it is queued again on the next run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Place name resolved and written to the sidecar.
    Annotated,
    /// Place name resolved, sidecar not written (dry run).
    DryRun,
    /// The service knows no place at these coordinates.
    Unresolved,
    /// Metadata carries no usable latitude/longitude.
    NoLocation,
    /// The EXIF segment exists but could not be decoded; handled like [`Outcome::NoLocation`].
    MetadataUnreadable { error: String },
    /// The file could not be opened as an image.
    OpenFailed { error: String },
}

/// The result of processing a single image.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub path: PathBuf,
    pub outcome: Outcome,
    pub coordinate: Option<DecimalCoordinate>,
    pub label: Option<PlaceLabel>,
    pub sidecar_path: Option<PathBuf>,
}

impl ProcessResult {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            outcome: Outcome::NoLocation,
            coordinate: None,
            label: None,
            sidecar_path: None,
        }
    }

    fn finish(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }
}

/// Per-outcome counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub annotated: usize,
    pub dry_run: usize,
    pub unresolved: usize,
    pub no_location: usize,
    pub metadata_unreadable: usize,
    pub open_failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[ProcessResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.outcome {
                Outcome::Annotated => summary.annotated += 1,
                Outcome::DryRun => summary.dry_run += 1,
                Outcome::Unresolved => summary.unresolved += 1,
                Outcome::NoLocation => summary.no_location += 1,
                Outcome::MetadataUnreadable { .. } => summary.metadata_unreadable += 1,
                Outcome::OpenFailed { .. } => summary.open_failed += 1,
            }
        }
        summary
    }
}

/// Results of a completed run, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub results: Vec<ProcessResult>,
    pub summary: RunSummary,
}

/// Annotate every path in order, one at a time.
///
/// Per-image problems (unopenable file, unreadable metadata, no GPS,
/// no place found) are recorded in the report and the run continues. A
/// resolver failure that survives the retry policy, or a failed sidecar
/// write, stops the run and is returned as the error.
///
/// # Example
///
/// ```rust,no_run
/// use photo_geotag::config::Config;
/// use photo_geotag::discover::discover;
/// use photo_geotag::geocode::NominatimResolver;
/// use photo_geotag::pipeline::run;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let resolver = NominatimResolver::new(&config.geocoder)?;
///
/// let queue = discover(Path::new("./photos"));
/// let report = run(&queue, &resolver, &config).await?;
/// println!("{} annotated", report.summary.annotated);
/// # Ok(())
/// # }
/// ```
pub async fn run(
    paths: &[PathBuf],
    resolver: &dyn PlaceResolver,
    config: &Config,
) -> Result<RunReport, GeotagError> {
    let total = paths.len();
    let mut results = Vec::with_capacity(total);

    for (i, path) in paths.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, path.display());
        results.push(process_image(path, resolver, config).await?);
    }

    let summary = RunSummary::from_results(&results);
    Ok(RunReport { results, summary })
}

/// Process a single image: open, read EXIF, convert GPS, resolve, write sidecar.
pub async fn process_image(
    path: &Path,
    resolver: &dyn PlaceResolver,
    config: &Config,
) -> Result<ProcessResult, GeotagError> {
    let result = ProcessResult::new(path);

    match open_image(path) {
        Ok((width, height)) => log::info!("Opening: {} ({width}x{height})", path.display()),
        Err(e) => {
            log::error!("Can't open {}: {e}", path.display());
            return Ok(result.finish(Outcome::OpenFailed {
                error: e.to_string(),
            }));
        }
    }

    let metadata = match exif::extract(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            let error = error_chain(&e);
            log::warn!("  No usable EXIF: {error}");
            return Ok(result.finish(Outcome::MetadataUnreadable { error }));
        }
    };

    let Some((latitude, longitude)) = metadata.location() else {
        log::warn!("  No GPS data in EXIF");
        return Ok(result.finish(Outcome::NoLocation));
    };

    let coordinate = DecimalCoordinate::from_sexagesimal(latitude, longitude);
    log::debug!("  Coordinates: {coordinate}");
    let mut result = ProcessResult {
        coordinate: Some(coordinate),
        ..result
    };

    let label = resolve_with_retry(resolver, coordinate, RetryPolicy::from(&config.retry))
        .await
        .map_err(|source| GeotagError::Resolution {
            path: path.to_path_buf(),
            source,
        })?;

    let Some(label) = label else {
        log::warn!("  {} found no place at {coordinate}", resolver.name());
        return Ok(result.finish(Outcome::Unresolved));
    };

    log::info!("  {label}");
    result.label = Some(label.clone());

    if config.output.dry_run {
        return Ok(result.finish(Outcome::DryRun));
    }

    let written = write_sidecar(path, &label).map_err(|source| GeotagError::Sidecar {
        path: sidecar_path(path),
        source,
    })?;
    result.sidecar_path = Some(written);

    Ok(result.finish(Outcome::Annotated))
}

/// Open the file as an image, reading the header only.
fn open_image(path: &Path) -> image::ImageResult<(u32, u32)> {
    image::ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
}

/// Render an error followed by its chain of causes.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
