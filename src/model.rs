/// Shared data types: the decoded PEGELONLINE timeseries record and the
/// per-cycle fetch error.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Decoded API record
// ---------------------------------------------------------------------------

/// One water-level ("W") timeseries as returned by
/// `/stations/{station}/W.json?includeCurrentMeasurement=true`.
///
/// Only `currentMeasurement` is required; the descriptive fields are kept
/// for logging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(default)]
    pub shortname: Option<String>,
    #[serde(default)]
    pub longname: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Spacing of the series in minutes.
    #[serde(default)]
    pub equidistance: Option<i64>,
    #[serde(alias = "current")]
    pub current_measurement: CurrentMeasurement,
    #[serde(default)]
    pub gauge_zero: Option<GaugeZero>,
}

/// The latest reading of the series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMeasurement {
    #[serde(default)]
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub value: f64,
    pub trend: f64,
    /// Classification against mean low / mean high water (e.g. "normal").
    #[serde(default)]
    pub state_mnw_mhw: Option<String>,
    /// Classification against navigational low / high water.
    #[serde(default)]
    pub state_nsw_hsw: Option<String>,
}

/// Gauge datum the readings are relative to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeZero {
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub valid_from: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single poll cycle. Never fatal: the cycle is logged and
/// skipped, and the metric store keeps its previous values.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, non-success status or a
    /// body that could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body was not JSON or did not match the `Measurement` schema.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Coarse classification of a `FetchError`, used in log fields and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Transport,
    Decode,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Transport(_) => FetchErrorKind::Transport,
            FetchError::Decode(_) => FetchErrorKind::Decode,
        }
    }
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::Transport => f.write_str("transport"),
            FetchErrorKind::Decode => f.write_str("decode"),
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
