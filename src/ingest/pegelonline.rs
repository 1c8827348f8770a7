/// PEGELONLINE REST API client.
///
/// Handles URL construction, the bounded-timeout GET and JSON decoding for
/// the water-level ("W") timeseries of a single station:
///   https://www.pegelonline.wsv.de/webservices/rest-api/v2/
///
/// See `fixtures.rs` for annotated examples of the response structure.

use crate::model::{FetchError, FetchResult, Measurement};
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

pub const PEGELONLINE_BASE_URL: &str = "https://www.pegelonline.wsv.de";

/// Client-wide limit for one request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the URL of the water-level series for `station`, asking the API
/// to include the current measurement.
///
/// The station is percent-encoded, so umlauts are safe:
/// ```
/// use rheinpegel_exporter::ingest::pegelonline::build_measurement_url;
///
/// let url = build_measurement_url("https://www.pegelonline.wsv.de", "KÖLN");
/// assert!(url.contains("/stations/K%C3%96LN/W.json"));
/// ```
pub fn build_measurement_url(base_url: &str, station: &str) -> String {
    format!(
        "{}/webservices/rest-api/v2/stations/{}/W.json?includeCurrentMeasurement=true",
        base_url.trim_end_matches('/'),
        urlencoding::encode(station)
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a W.json body into a `Measurement`.
///
/// # Errors
/// `FetchError::Decode` for non-JSON bodies and for bodies missing the
/// required `currentMeasurement.value` / `currentMeasurement.trend` fields.
pub fn parse_measurement(json: &str) -> FetchResult<Measurement> {
    Ok(serde_json::from_str(json)?)
}

// ---------------------------------------------------------------------------
// API Client
// ---------------------------------------------------------------------------

/// Blocking client for one remote host. Cheap to share by reference; the
/// underlying connection pool is reused across poll cycles.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl Fetcher {
    /// Fetcher against the public PEGELONLINE host.
    pub fn new() -> FetchResult<Self> {
        Self::with_base_url(PEGELONLINE_BASE_URL)
    }

    /// Fetcher against another host serving the same REST paths.
    pub fn with_base_url(base_url: impl Into<String>) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch and decode the current measurement for `station`.
    ///
    /// Non-success HTTP statuses count as transport failures. The response
    /// is read to completion (and its connection released) before decoding,
    /// so a decode failure never holds the connection.
    pub fn fetch_sample(&self, station: &str) -> FetchResult<Measurement> {
        let url = build_measurement_url(&self.base_url, station);
        debug!(%url, "Fetching measurement");

        let result = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(FetchError::from)
            .and_then(|body| parse_measurement(&body));

        if let Err(e) = &result {
            warn!(station, kind = %e.kind(), error = %e, "Fetching measurement failed");
        }

        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
