//! Org connection configuration.
//!
//! This module provides the `ConnectionConfig` struct for configuring
//! REST connections to an org.

use std::time::Duration;
use url::Url;

/// API version used when neither the flags nor the auth file name one
pub const DEFAULT_API_VERSION: &str = "60.0";

/// Configuration for org connections.
///
/// # Security
/// This struct intentionally does NOT store the access token. It can be
/// logged and displayed freely.
///
/// # Example
/// ```rust
/// use objexport_core::adapters::ConnectionConfig;
/// use url::Url;
///
/// let config = ConnectionConfig::new(Url::parse("https://acme.my.salesforce.com").unwrap())
///     .with_api_version("59.0");
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Org instance URL
    pub instance_url: Url,
    /// REST API version, `NN.N`
    pub api_version: String,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Timeout for one describe request, including the body
    pub request_timeout: Duration,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConnectionConfig({} v{})",
            self.instance_url.as_str().trim_end_matches('/'),
            self.api_version
        )
    }
}

impl ConnectionConfig {
    /// Creates a new connection config with default API version and timeouts.
    pub fn new(instance_url: Url) -> Self {
        Self {
            instance_url,
            api_version: DEFAULT_API_VERSION.to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            user_agent: format!("objexport/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Builder method to set the API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Builder method to set the connect timeout.
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the request timeout.
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if configuration values are invalid
    pub fn validate(&self) -> crate::Result<()> {
        if !matches!(self.instance_url.scheme(), "https" | "http") {
            return Err(crate::error::ObjExportError::configuration(format!(
                "instance URL must use https, got '{}'",
                self.instance_url.scheme()
            )));
        }

        if self.instance_url.host_str().is_none() {
            return Err(crate::error::ObjExportError::configuration(
                "instance URL must include a host",
            ));
        }

        if !is_valid_api_version(&self.api_version) {
            return Err(crate::error::ObjExportError::configuration(format!(
                "API version '{}' must look like 60.0",
                self.api_version
            )));
        }

        if self.connect_timeout.is_zero() {
            return Err(crate::error::ObjExportError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(crate::error::ObjExportError::configuration(
                "request_timeout must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn is_valid_api_version(version: &str) -> bool {
    version.split_once('.').is_some_and(|(major, minor)| {
        !major.is_empty()
            && !minor.is_empty()
            && major.chars().all(|c| c.is_ascii_digit())
            && minor.chars().all(|c| c.is_ascii_digit())
    })
}
