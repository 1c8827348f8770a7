/// Start-up configuration: command-line flags and their validation.
///
/// All configuration comes from flags. Anything invalid here is fatal; the
/// process does not start.

use clap::Parser;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_LISTEN_ADDRESS: &str = ":8080";
pub const DEFAULT_LOCATION: &str = "KÖLN";
pub const DEFAULT_EVERY: &str = "15m";

/// Raw command-line flags.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rheinpegel_exporter",
    about = "Exports PEGELONLINE water levels as Prometheus gauges"
)]
pub struct Cli {
    /// The address to listen on for HTTP requests.
    #[arg(long, default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen_address: String,

    /// PEGELONLINE station to poll.
    #[arg(long, default_value = DEFAULT_LOCATION)]
    pub location: String,

    /// Poll interval, e.g. "15m", "1h30m", "30s".
    #[arg(long, default_value = DEFAULT_EVERY)]
    pub every: String,

    /// Log filter directive, e.g. "info" or "rheinpegel_exporter=debug".
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listen_address: SocketAddr,
    pub location: String,
    pub every: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid poll interval {value:?}: {reason}")]
    InvalidInterval { value: String, reason: String },

    #[error("location must not be empty")]
    EmptyLocation,

    #[error("invalid listen address {value:?}: {reason}")]
    InvalidListenAddress { value: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl Cli {
    pub fn into_config(self) -> ConfigResult<Config> {
        Ok(Config {
            listen_address: parse_listen_address(&self.listen_address)?,
            location: parse_location(&self.location)?,
            every: parse_interval(&self.every)?,
        })
    }
}

/// Parses a human-readable poll interval. Zero is rejected since it would
/// make the poll loop spin.
pub fn parse_interval(value: &str) -> ConfigResult<Duration> {
    let every = humantime::parse_duration(value.trim()).map_err(|e| {
        ConfigError::InvalidInterval {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })?;

    if every.is_zero() {
        return Err(ConfigError::InvalidInterval {
            value: value.to_string(),
            reason: "interval must be greater than zero".to_string(),
        });
    }

    Ok(every)
}

pub fn parse_location(value: &str) -> ConfigResult<String> {
    let location = value.trim();
    if location.is_empty() {
        return Err(ConfigError::EmptyLocation);
    }
    Ok(location.to_string())
}

/// Resolves a listen address. A bare `:port` binds every interface.
pub fn parse_listen_address(value: &str) -> ConfigResult<SocketAddr> {
    let candidate = match value.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{}", port),
        None => value.to_string(),
    };

    let invalid = |reason: String| ConfigError::InvalidListenAddress {
        value: value.to_string(),
        reason,
    };

    candidate
        .to_socket_addrs()
        .map_err(|e| invalid(e.to_string()))?
        .next()
        .ok_or_else(|| invalid("address resolved to nothing".to_string()))
}
