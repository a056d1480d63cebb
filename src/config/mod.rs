//! Configuration loading for the PAYE service.
//!
//! This module resolves the service's [`ServiceConfig`] from built-in
//! defaults, an optional YAML file and environment variables.
//!
//! # Example
//!
//! ```no_run
//! use paye_engine::config::ServiceConfig;
//!
//! let config = ServiceConfig::from_env().unwrap();
//! println!("Tax Table Service: {}", config.tax_service_url);
//! ```

mod loader;
mod types;

pub use loader::CONFIG_PATH_ENV;
pub use types::{
    DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TAX_SERVICE_URL,
    DEFAULT_USER_INPUT_SERVICE_URL, ServiceConfig, ServiceConfigFile,
};
