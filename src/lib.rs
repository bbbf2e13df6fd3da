//! # photo-geotag
//!
//! Batch reverse geocoding for photo collections: find JPEGs, read their EXIF
//! GPS coordinates, resolve a place name, and write it to a `.txt` sidecar
//! next to each image.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photo_geotag::config::Config;
//! use photo_geotag::discover::discover;
//! use photo_geotag::geocode::NominatimResolver;
//! use photo_geotag::pipeline::{run, Outcome};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!     let resolver = NominatimResolver::new(&config.geocoder)?;
//!
//!     // Images without a `<name>.txt` sidecar yet
//!     let queue = discover(Path::new("./photos"));
//!
//!     let report = run(&queue, &resolver, &config).await?;
//!     for result in &report.results {
//!         if result.outcome == Outcome::Annotated {
//!             println!("{} → {}", result.path.display(), result.label.as_ref().unwrap());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Sidecar layout
//!
//! `IMG_0001.jpg` gets `IMG_0001.jpg.txt` in the same directory, holding only
//! the UTF-8 place name. An existing sidecar marks the image as done; images
//! without usable GPS get no sidecar and are retried on every run.
//!
//! ## Sign convention
//!
//! Coordinates are always negated when converted to decimal degrees, whatever
//! the hemisphere reference says. See [`coords::to_decimal_degrees`].
//!
//! ## Modules
//!
//! - [`config`] — Configuration types and loading/saving
//! - [`coords`] — Sexagesimal → decimal degree conversion
//! - [`discover`] — Directory walk and eligibility filter
//! - [`error`] — Error types
//! - [`exif`] — EXIF reading and tag-name normalization
//! - [`geocode`] — Place resolver trait, Nominatim client, retry policy
//! - [`pipeline`] — Per-image processing and batch run
//! - [`sidecar`] — Sidecar naming and writing

pub mod config;
pub mod coords;
pub mod discover;
pub mod error;
pub mod exif;
pub mod geocode;
pub mod pipeline;
pub mod sidecar;
