//! Configuration types for the PAYE service.
//!
//! [`ServiceConfigFile`] mirrors the optional YAML file, where every key may
//! be omitted. [`ServiceConfig`] is the resolved, validated configuration the
//! service runs with.

use std::net::SocketAddr;

use serde::Deserialize;
use url::Url;

/// Default port the HTTP server listens on.
pub const DEFAULT_PORT: u16 = 5002;

/// Default base URL of the User Input Service.
pub const DEFAULT_USER_INPUT_SERVICE_URL: &str = "https://salary-calculator-user-input.onrender.com";

/// Default base URL of the Tax Table Service.
pub const DEFAULT_TAX_SERVICE_URL: &str = "https://salary-calculator-tax-tables-service.onrender.com";

/// Default timeout for outbound requests, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// The YAML configuration file structure.
///
/// # Example
///
/// ```
/// use paye_engine::config::ServiceConfigFile;
///
/// let file: ServiceConfigFile = serde_yaml::from_str("port: 8080\ndebug: true\n").unwrap();
/// assert_eq!(file.port, Some(8080));
/// assert_eq!(file.tax_service_url, None);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfigFile {
    /// Port to listen on.
    pub port: Option<u16>,
    /// Base URL of the User Input Service.
    pub user_input_service_url: Option<String>,
    /// Base URL of the Tax Table Service.
    pub tax_service_url: Option<String>,
    /// Base URL of the feedback service.
    pub feedback_service_url: Option<String>,
    /// Outbound request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Whether to check collaborators before serving.
    pub startup_health_checks: Option<bool>,
    /// Enables debug logging.
    pub debug: Option<bool>,
}

/// Resolved service configuration.
///
/// Built once at start-up by [`ServiceConfig::from_env`] or
/// [`ServiceConfig::from_sources`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Port to listen on.
    pub port: u16,
    /// Base URL of the User Input Service.
    pub user_input_service_url: Url,
    /// Base URL of the Tax Table Service.
    pub tax_service_url: Url,
    /// Base URL of the feedback service, if one is deployed.
    pub feedback_service_url: Option<Url>,
    /// Outbound request timeout in seconds. Always greater than zero.
    pub request_timeout_secs: u64,
    /// Whether to check collaborators before serving.
    pub startup_health_checks: bool,
    /// Enables debug logging.
    pub debug: bool,
}

impl ServiceConfig {
    /// The address the server binds to: all interfaces on `port`.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// The default log filter directive implied by `debug`.
    pub fn default_log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
