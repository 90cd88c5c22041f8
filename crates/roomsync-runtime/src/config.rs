//! Daemon configuration: defaults, then TOML file, then CLI flags / env.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use roomsync_http::{AvailabilityEndpoint, EndpointError};

use crate::cli::DaemonOpts;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/rooms/available";
pub const DEFAULT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub poll: PollConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollConfig {
    /// Whether this view refreshes availability at all.
    pub enabled: bool,
    pub endpoint: String,
    pub location: Option<String>,
    pub interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            location: None,
            interval_secs: DEFAULT_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Read `path`, or return defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File config overlaid with whatever the command line (or its env) set.
    pub fn resolve(opts: &DaemonOpts) -> Result<Self, ConfigError> {
        let mut config = Self::load(opts.config.as_deref())?;
        config.apply_overrides(opts);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, opts: &DaemonOpts) {
        if let Some(ref endpoint) = opts.endpoint {
            self.poll.endpoint = endpoint.clone();
        }
        if let Some(ref location) = opts.location {
            self.poll.location = Some(location.clone());
        }
        if let Some(secs) = opts.poll_interval_secs {
            self.poll.interval_secs = secs;
        }
        if let Some(secs) = opts.request_timeout_secs {
            self.poll.request_timeout_secs = secs;
        }
        if opts.no_poll {
            self.poll.enabled = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll.interval_secs == 0 {
            return Err(ConfigError::Zero("poll.interval_secs"));
        }
        if self.poll.request_timeout_secs == 0 {
            return Err(ConfigError::Zero("poll.request_timeout_secs"));
        }
        self.endpoint()?;
        Ok(())
    }

    pub fn endpoint(&self) -> Result<AvailabilityEndpoint, EndpointError> {
        let endpoint = AvailabilityEndpoint::parse(&self.poll.endpoint)?;
        Ok(match self.poll.location.as_deref() {
            Some(location) => endpoint.with_location(location),
            None => endpoint,
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.poll.request_timeout_secs)
    }
}
