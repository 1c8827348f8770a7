/// Test fixtures: representative JSON payloads from the PEGELONLINE API.
///
/// They mirror the body returned by
///   https://www.pegelonline.wsv.de/webservices/rest-api/v2/stations/KÖLN/W.json?includeCurrentMeasurement=true
///
/// PEGELONLINE timeseries shape:
///   shortname, longname, unit, equidistance  — series metadata
///   currentMeasurement
///     .timestamp    — ISO 8601 with offset
///     .value        — water level in the series unit (cm)
///     .trend        — -1 falling, 0 steady, 1 rising
///     .stateMnwMhw  — "low" / "normal" / "high" / "unknown" / "commented" / "out-dated"
///     .stateNswHsw  — same vocabulary against navigational thresholds
///   gaugeZero       — datum (unit, value, validFrom)

/// Köln gauge, complete record.
#[cfg(test)]
pub(crate) fn fixture_koeln_json() -> &'static str {
    r#"{
      "shortname": "W",
      "longname": "WASSERSTAND ROHDATEN",
      "unit": "cm",
      "equidistance": 15,
      "currentMeasurement": {
        "timestamp": "2024-05-01T12:00:00+02:00",
        "value": 345.0,
        "trend": -1,
        "stateMnwMhw": "normal",
        "stateNswHsw": "normal"
      },
      "gaugeZero": {
        "unit": "m. ü. NHN",
        "value": 34.97,
        "validFrom": "2019-11-01"
      }
    }"#
}

/// Compact body carrying only the current reading under the short key.
#[cfg(test)]
pub(crate) fn fixture_compact_json() -> &'static str {
    r#"{"current":{"value":3.45,"trend":0.02}}"#
}

/// Station without a current reading (e.g. gauge under maintenance).
/// Valid JSON, but the schema requires `currentMeasurement`.
#[cfg(test)]
pub(crate) fn fixture_missing_current_json() -> &'static str {
    r#"{
      "shortname": "W",
      "longname": "WASSERSTAND ROHDATEN",
      "unit": "cm",
      "equidistance": 15
    }"#
}

/// Current reading whose value came back as a string.
#[cfg(test)]
pub(crate) fn fixture_string_value_json() -> &'static str {
    r#"{"currentMeasurement":{"value":"345","trend":0}}"#
}

/// Truncated body, as seen when an upstream proxy cuts the response.
#[cfg(test)]
pub(crate) fn fixture_truncated_json() -> &'static str {
    r#"{"shortname":"W","currentMeasurement":{"value":34"#
}
