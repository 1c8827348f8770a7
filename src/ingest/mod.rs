/// Remote data sources.
///
/// Submodules:
/// - `pegelonline` — PEGELONLINE REST API: URL construction, fetch, JSON parsing.
/// - `fixtures` (test only) — representative API response payloads.

pub mod pegelonline;

#[cfg(test)]
pub(crate) mod fixtures;
