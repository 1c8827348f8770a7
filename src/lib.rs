/// rheinpegel_exporter: PEGELONLINE water levels as Prometheus gauges.
///
/// # Module structure
///
/// ```text
/// rheinpegel_exporter
/// ├── model       — decoded API record (Measurement, CurrentMeasurement, …) and FetchError
/// ├── config      — command-line flags and their validation
/// ├── ingest
/// │   ├── pegelonline — PEGELONLINE REST API: URL construction, fetch, JSON parsing
/// │   └── fixtures (test only) — representative API response payloads
/// ├── monitor     — metric store: labeled measurement/trend gauges
/// ├── daemon      — scheduler and poll cycle (fetch → decode → store)
/// └── endpoint    — HTTP exporter serving /metrics
/// ```

pub mod config;
pub mod daemon;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod monitor;
