/// Metric store: the latest reading per station, published as gauges.
///
/// ## Shape
///
/// Two gauge families, both labeled by `location`:
/// - `rheinpegel_measurement` — current water level
/// - `rheinpegel_trend`       — current trend
///
/// Each successful poll cycle overwrites the entry for its station. Nothing
/// is aggregated or kept historically, and entries are never removed.
///
/// ## Sharing
///
/// The store is built once at start-up and handed out as `Arc<MetricStore>`
/// to the poll loop (writer) and the HTTP exporter (reader). `Family` guards
/// its label map with an internal lock and gauges are atomics, so neither
/// side needs extra synchronization.

use crate::model::Measurement;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::HashSet;
use std::sync::atomic::AtomicU64;
use thiserror::Error;

pub const METRIC_PREFIX: &str = "rheinpegel";

/// Label set shared by both families.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct LocationLabels {
    pub location: String,
}

type GaugeFamily = Family<LocationLabels, Gauge<f64, AtomicU64>>;

#[derive(Debug, Error)]
pub enum MetricsError {
    /// A family name was registered twice. Programming error, fatal at start-up.
    #[error("metric already registered: {0}")]
    AlreadyRegistered(String),

    #[error("failed to encode metrics: {0}")]
    Encode(#[from] std::fmt::Error),
}

pub type MetricsResult<T> = Result<T, MetricsError>;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Wraps a prefixed `Registry` and refuses duplicate family names, which the
/// registry itself would silently accept.
struct Registrar {
    registry: Registry,
    names: HashSet<String>,
}

impl Registrar {
    fn new(prefix: &str) -> Self {
        Self {
            registry: Registry::with_prefix(prefix),
            names: HashSet::new(),
        }
    }

    fn gauge_family(&mut self, name: &str, help: &str) -> MetricsResult<GaugeFamily> {
        if !self.names.insert(name.to_string()) {
            return Err(MetricsError::AlreadyRegistered(name.to_string()));
        }

        let family = GaugeFamily::default();
        self.registry.register(name, help, family.clone());
        Ok(family)
    }

    fn into_registry(self) -> Registry {
        self.registry
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MetricStore {
    registry: Registry,
    measurement: GaugeFamily,
    trend: GaugeFamily,
}

impl MetricStore {
    /// Register both gauge families under `rheinpegel_`.
    pub fn new() -> MetricsResult<Self> {
        let mut registrar = Registrar::new(METRIC_PREFIX);
        let measurement = registrar.gauge_family("measurement", "Rheinpegel measurement")?;
        let trend = registrar.gauge_family("trend", "Rheinpegel trend")?;

        Ok(Self {
            registry: registrar.into_registry(),
            measurement,
            trend,
        })
    }

    pub fn set_measurement(&self, station: &str, value: f64) {
        self.measurement.get_or_create(&labels(station)).set(value);
    }

    pub fn set_trend(&self, station: &str, value: f64) {
        self.trend.get_or_create(&labels(station)).set(value);
    }

    /// Apply one decoded sample.
    pub fn record(&self, station: &str, measurement: &Measurement) {
        let current = &measurement.current_measurement;
        self.set_measurement(station, current.value);
        self.set_trend(station, current.trend);
    }

    /// Current contents in the OpenMetrics text exposition format.
    pub fn render(&self) -> MetricsResult<String> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

fn labels(station: &str) -> LocationLabels {
    LocationLabels {
        location: station.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
