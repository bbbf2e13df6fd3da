mod nominatim;

pub use nominatim::{NominatimResolver, parse_reverse_response};

use serde::Serialize;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::coords::DecimalCoordinate;
use crate::error::ResolveError;

/// Human-readable place description returned by a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlaceLabel(String);

impl PlaceLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for reverse-geocoding services.
///
/// Implement this trait to plug in another backend; the crate ships with
/// [`NominatimResolver`].
///
/// # Example
///
/// ```rust,no_run
/// use photo_geotag::config::GeocoderConfig;
/// use photo_geotag::coords::DecimalCoordinate;
/// use photo_geotag::geocode::{NominatimResolver, PlaceResolver};
///
/// # async fn example() -> anyhow::Result<()> {
/// let resolver = NominatimResolver::new(&GeocoderConfig::default())?;
/// let coord = DecimalCoordinate { latitude: 48.8584, longitude: 2.2945 };
/// if let Some(label) = resolver.reverse_geocode(coord).await? {
///     println!("{label}");
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait PlaceResolver: Send + Sync {
    /// The display name of this service (e.g., "Nominatim").
    fn name(&self) -> &str;
    /// Resolve a coordinate to a place label.
    ///
    /// `Ok(None)` means the service answered but knows no place there.
    async fn reverse_geocode(&self, coord: DecimalCoordinate)
        -> Result<Option<PlaceLabel>, ResolveError>;
}

/// Bounded retry with exponential backoff around a resolver call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
        }
    }
}

/// Call the resolver, retrying transient failures.
///
/// Permanent errors (see [`ResolveError::is_transient`]) are returned at once.
/// The delay doubles after every failed attempt.
pub async fn resolve_with_retry(
    resolver: &dyn PlaceResolver,
    coord: DecimalCoordinate,
    policy: RetryPolicy,
) -> Result<Option<PlaceLabel>, ResolveError> {
    let mut delay = policy.initial_backoff;
    let mut attempt = 1;

    loop {
        match resolver.reverse_geocode(coord).await {
            Ok(label) => return Ok(label),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                log::warn!(
                    "  {} attempt {attempt}/{} failed: {e}; retrying in {delay:?}",
                    resolver.name(),
                    policy.max_attempts
                );
                tokio::time::sleep(delay).await;
                delay = next_backoff(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Double the delay, pinned at [`Duration::MAX`].
fn next_backoff(delay: Duration) -> Duration {
    delay.saturating_mul(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays a fixed sequence of responses and records every call.
    struct Scripted {
        responses: Mutex<Vec<Result<Option<PlaceLabel>, ResolveError>>>,
        calls: Mutex<u32>,
    }

    impl Scripted {
        fn new(mut responses: Vec<Result<Option<PlaceLabel>, ResolveError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl PlaceResolver for Scripted {
        fn name(&self) -> &str {
            "Scripted"
        }

        async fn reverse_geocode(
            &self,
            _coord: DecimalCoordinate,
        ) -> Result<Option<PlaceLabel>, ResolveError> {
            *self.calls.lock().unwrap() += 1;
            self.responses.lock().unwrap().pop().expect("no scripted response left")
        }
    }

    fn unavailable() -> ResolveError {
        ResolveError::HttpStatus { status: 503, body: "busy".into() }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy { max_attempts, initial_backoff: Duration::ZERO }
    }

    const COORD: DecimalCoordinate = DecimalCoordinate { latitude: -45.5, longitude: -73.0 };

    #[tokio::test]
    async fn first_success_is_returned() {
        let resolver = Scripted::new(vec![Ok(Some(PlaceLabel::new("Aysén, Chile")))]);
        let label = resolve_with_retry(&resolver, COORD, policy(3)).await.unwrap();

        assert_eq!(label, Some(PlaceLabel::new("Aysén, Chile")));
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let resolver = Scripted::new(vec![
            Err(unavailable()),
            Err(unavailable()),
            Ok(Some(PlaceLabel::new("Coyhaique"))),
        ]);
        let label = resolve_with_retry(&resolver, COORD, policy(3)).await.unwrap();

        assert_eq!(label.unwrap().as_str(), "Coyhaique");
        assert_eq!(resolver.calls(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let resolver = Scripted::new(vec![Err(unavailable()), Err(unavailable())]);
        let err = resolve_with_retry(&resolver, COORD, policy(2)).await.unwrap_err();

        assert!(matches!(err, ResolveError::HttpStatus { status: 503, .. }));
        assert_eq!(resolver.calls(), 2);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let resolver = Scripted::new(vec![Err(ResolveError::Service("Invalid coordinates".into()))]);
        let err = resolve_with_retry(&resolver, COORD, policy(3)).await.unwrap_err();

        assert!(matches!(err, ResolveError::Service(_)));
        assert_eq!(resolver.calls(), 1);
    }

    #[test]
    fn policy_from_config_never_zero_attempts() {
        let config = RetryConfig { max_attempts: 0, initial_backoff_ms: 250 };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.initial_backoff, Duration::from_millis(250));
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        assert_eq!(next_backoff(Duration::from_millis(500)), Duration::from_secs(1));
        assert_eq!(next_backoff(Duration::MAX), Duration::MAX);
        assert_eq!(next_backoff(Duration::MAX / 2 + Duration::from_secs(1)), Duration::MAX);
    }
}
