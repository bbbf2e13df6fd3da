//! Error taxonomy for the geotagging pipeline.
//!
//! Only [`GeotagError`] aborts a run. [`MetadataError`] is recovered per image
//! by the pipeline, and [`ResolveError`] becomes fatal once the retry policy in
//! [`crate::geocode`] gives up.

use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal errors. Any of these stops the batch.
#[derive(Debug, thiserror::Error)]
pub enum GeotagError {
    /// The root directory given on the command line does not exist.
    #[error("Target path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The place resolver failed for an image after all retries.
    #[error("Reverse geocoding failed for {}: {source}", path.display())]
    Resolution {
        path: PathBuf,
        #[source]
        source: ResolveError,
    },

    /// The sidecar annotation could not be written.
    #[error("Failed to write sidecar {}: {source}", path.display())]
    Sidecar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The metadata segment of an image exists but cannot be decoded.
///
/// Every lower-level failure collapses into this one kind; the original cause
/// stays reachable through [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
#[error("Unreadable metadata: {context}")]
pub struct MetadataError {
    context: &'static str,
    #[source]
    source: BoxError,
}

impl MetadataError {
    pub(crate) fn new(context: &'static str, source: impl Into<BoxError>) -> Self {
        Self {
            context,
            source: source.into(),
        }
    }
}

/// Failures of a single reverse-geocoding attempt.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Geocoding service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The service answered with a body we could not understand.
    #[error("Malformed geocoding response: {0}")]
    Decode(String),

    /// The service reported an error for this coordinate.
    #[error("Geocoding service error: {0}")]
    Service(String),
}

impl ResolveError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::Service(_) => false,
        }
    }
}
