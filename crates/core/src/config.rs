//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the record client. Nothing
//! in this crate reads process-wide environment variables while serving a call; binaries read the
//! raw values and hand them to the `*_from_env_value` parsers below.

use crate::constants::{
    DEFAULT_DOCTOR_ID, DEFAULT_NAMING_HOST, DEFAULT_NAMING_PORT, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SERVICE_NAME,
};
use crate::error::{ConfigError, ConfigResult};
use dme_types::NonEmptyText;
use std::fmt;
use std::time::Duration;

/// Where the directory lives and which name to look up in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoint {
    host: NonEmptyText,
    port: u16,
    service_name: NonEmptyText,
}

impl ServiceEndpoint {
    pub fn new(
        host: impl AsRef<str>,
        port: u16,
        service_name: impl AsRef<str>,
    ) -> ConfigResult<Self> {
        let host = NonEmptyText::new(host)
            .map_err(|_| ConfigError::InvalidInput("naming host cannot be empty".into()))?;
        let service_name = NonEmptyText::new(service_name)
            .map_err(|_| ConfigError::InvalidInput("service name cannot be empty".into()))?;
        if port == 0 {
            return Err(ConfigError::InvalidInput(
                "naming port must be between 1 and 65535".into(),
            ));
        }

        Ok(Self {
            host,
            port,
            service_name,
        })
    }

    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn service_name(&self) -> &str {
        self.service_name.as_str()
    }

    /// `host:port` of the directory.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self {
            host: NonEmptyText::new(DEFAULT_NAMING_HOST).expect("default host is non-empty"),
            port: DEFAULT_NAMING_PORT,
            service_name: NonEmptyText::new(DEFAULT_SERVICE_NAME)
                .expect("default service name is non-empty"),
        }
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.service_name, self.host, self.port)
    }
}

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    endpoint: ServiceEndpoint,
    request_timeout: Duration,
    doctor_id: NonEmptyText,
}

impl ClientConfig {
    pub fn new(
        endpoint: ServiceEndpoint,
        request_timeout: Duration,
        doctor_id: NonEmptyText,
    ) -> ConfigResult<Self> {
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            endpoint,
            request_timeout,
            doctor_id,
        })
    }

    /// Build a configuration from raw (optional) environment values.
    ///
    /// Missing or blank values fall back to the defaults in [`crate::constants`].
    pub fn from_env_values(
        host: Option<String>,
        port: Option<String>,
        service_name: Option<String>,
        request_timeout_ms: Option<String>,
        doctor_id: Option<String>,
    ) -> ConfigResult<Self> {
        let endpoint = ServiceEndpoint::new(
            non_blank(host).unwrap_or_else(|| DEFAULT_NAMING_HOST.to_string()),
            port_from_env_value(port)?,
            non_blank(service_name).unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        )?;

        Self::new(
            endpoint,
            request_timeout_from_env_value(request_timeout_ms)?,
            doctor_id_from_env_value(doctor_id)?,
        )
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn doctor_id(&self) -> &NonEmptyText {
        &self.doctor_id
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: ServiceEndpoint::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            doctor_id: NonEmptyText::new(DEFAULT_DOCTOR_ID).expect("default doctor id is non-empty"),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the directory port. `None` or blank yields the default port.
pub fn port_from_env_value(value: Option<String>) -> ConfigResult<u16> {
    match non_blank(value) {
        None => Ok(DEFAULT_NAMING_PORT),
        Some(v) => match v.parse::<u16>() {
            Ok(0) | Err(_) => Err(ConfigError::InvalidInput(format!(
                "naming port must be between 1 and 65535, got '{}'",
                v
            ))),
            Ok(port) => Ok(port),
        },
    }
}

/// Parse the request timeout in milliseconds. `None` or blank yields the default timeout.
pub fn request_timeout_from_env_value(value: Option<String>) -> ConfigResult<Duration> {
    match non_blank(value) {
        None => Ok(DEFAULT_REQUEST_TIMEOUT),
        Some(v) => match v.parse::<u64>() {
            Ok(0) | Err(_) => Err(ConfigError::InvalidInput(format!(
                "request timeout must be a positive number of milliseconds, got '{}'",
                v
            ))),
            Ok(ms) => Ok(Duration::from_millis(ms)),
        },
    }
}

pub fn doctor_id_from_env_value(value: Option<String>) -> ConfigResult<NonEmptyText> {
    let value = non_blank(value).unwrap_or_else(|| DEFAULT_DOCTOR_ID.to_string());
    NonEmptyText::new(value)
        .map_err(|_| ConfigError::InvalidInput("doctor id cannot be empty".into()))
}
