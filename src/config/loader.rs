//! Configuration loading functionality.
//!
//! Settings are layered: built-in defaults, then the optional YAML file named
//! by `PAYE_CONFIG`, then environment variables. Later layers win.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{EngineError, EngineResult};

use super::types::{
    DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TAX_SERVICE_URL,
    DEFAULT_USER_INPUT_SERVICE_URL, ServiceConfig, ServiceConfigFile,
};

/// Environment variable naming the optional YAML configuration file.
pub const CONFIG_PATH_ENV: &str = "PAYE_CONFIG";

impl ServiceConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use paye_engine::config::ServiceConfig;
    ///
    /// let config = ServiceConfig::from_env()?;
    /// println!("Listening on {}", config.bind_address());
    /// # Ok::<(), paye_engine::error::EngineError>(())
    /// ```
    pub fn from_env() -> EngineResult<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        let file = lookup(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::from_sources(file.as_deref(), lookup)
    }

    /// Loads configuration from an optional YAML file and an environment lookup.
    ///
    /// Empty environment values are ignored.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if `file` cannot be read
    /// - `ConfigParseError` if `file` is not valid YAML or has unknown keys
    /// - `InvalidConfig` for an unparseable value, a non-HTTP URL or a zero timeout
    ///
    /// # Example
    ///
    /// ```
    /// use paye_engine::config::ServiceConfig;
    ///
    /// let config = ServiceConfig::from_sources(None, |key| match key {
    ///     "PORT" => Some("8080".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.port, 8080);
    /// assert_eq!(config.request_timeout_secs, 30);
    /// # Ok::<(), paye_engine::error::EngineError>(())
    /// ```
    pub fn from_sources<F>(file: Option<&Path>, lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match file {
            Some(path) => load_yaml(path)?,
            None => ServiceConfigFile::default(),
        };
        apply_env(&mut settings, &lookup)?;
        resolve(settings)
    }
}

/// Loads and parses a YAML file.
fn load_yaml(path: &Path) -> EngineResult<ServiceConfigFile> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}

fn apply_env<F>(settings: &mut ServiceConfigFile, lookup: &F) -> EngineResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(port) = var("PORT") {
        settings.port = Some(parse_number("PORT", &port)?);
    }
    if let Some(url) = var("USER_INPUT_SERVICE_URL").or_else(|| var("USER_INPUT_SERVICE_BASE_URL")) {
        settings.user_input_service_url = Some(url);
    }
    if let Some(url) = var("TAX_SERVICE_BASE_URL").or_else(|| var("TAX_TABLE_SERVICE_BASE_URL")) {
        settings.tax_service_url = Some(url);
    }
    if let Some(url) = var("FEEDBACK_SERVICE_BASE_URL") {
        settings.feedback_service_url = Some(url);
    }
    if let Some(timeout) = var("REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = Some(parse_number("REQUEST_TIMEOUT_SECS", &timeout)?);
    }
    if let Some(flag) = var("STARTUP_HEALTH_CHECKS") {
        settings.startup_health_checks = Some(parse_bool("STARTUP_HEALTH_CHECKS", &flag)?);
    }
    if let Some(flag) = var("DEBUG") {
        settings.debug = Some(parse_bool("DEBUG", &flag)?);
    }
    Ok(())
}

fn resolve(settings: ServiceConfigFile) -> EngineResult<ServiceConfig> {
    let request_timeout_secs = settings
        .request_timeout_secs
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if request_timeout_secs == 0 {
        return Err(EngineError::InvalidConfig {
            key: "request_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    Ok(ServiceConfig {
        port: settings.port.unwrap_or(DEFAULT_PORT),
        user_input_service_url: parse_url(
            "user_input_service_url",
            settings
                .user_input_service_url
                .as_deref()
                .unwrap_or(DEFAULT_USER_INPUT_SERVICE_URL),
        )?,
        tax_service_url: parse_url(
            "tax_service_url",
            settings
                .tax_service_url
                .as_deref()
                .unwrap_or(DEFAULT_TAX_SERVICE_URL),
        )?,
        feedback_service_url: settings
            .feedback_service_url
            .as_deref()
            .map(|url| parse_url("feedback_service_url", url))
            .transpose()?,
        request_timeout_secs,
        startup_health_checks: settings.startup_health_checks.unwrap_or(true),
        debug: settings.debug.unwrap_or(false),
    })
}

fn parse_url(key: &str, value: &str) -> EngineResult<Url> {
    let url = Url::parse(value.trim()).map_err(|e| EngineError::InvalidConfig {
        key: key.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(EngineError::InvalidConfig {
            key: key.to_string(),
            message: format!("unsupported scheme '{}', expected http or https", scheme),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> EngineResult<T> {
    value.trim().parse().map_err(|_| EngineError::InvalidConfig {
        key: key.to_string(),
        message: format!("'{}' is not a valid number", value),
    })
}

fn parse_bool(key: &str, value: &str) -> EngineResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(EngineError::InvalidConfig {
            key: key.to_string(),
            message: format!("'{}' is not a valid boolean", value),
        }),
    }
}
