//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: RESOURCE_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/resource-controller/{service_name}/config.toml
//! 4. System directory: /etc/resource-controller/{service_name}/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const APP_DIR: &str = "resource-controller";
const ENV_PREFIX: &str = "RESOURCE_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Query-string conventions of the resource actions
    #[serde(default)]
    pub resource: ResourceConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Query keys and limits used when resolving filters, ordering and paging
///
/// # Example
///
/// ```rust
/// use resource_controller::config::ResourceConfig;
///
/// let config = ResourceConfig::default();
/// assert!(config.is_control_key("page"));
/// assert!(config.is_control_key("sort"));
/// assert!(!config.is_control_key("name"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Page size used when the request does not give one
    #[serde(default = "default_per_page")]
    pub default_per_page: u64,

    /// Upper bound on the page size a request may ask for
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u64,

    #[serde(default = "default_page_key")]
    pub page_key: String,

    #[serde(default = "default_per_page_key")]
    pub per_page_key: String,

    #[serde(default = "default_sort_key")]
    pub sort_key: String,

    /// Key whose falsy value switches the index action to search mode
    #[serde(default = "default_paginate_key")]
    pub paginate_key: String,

    /// Separator between a field name and its operator token (`age__gte`)
    #[serde(default = "default_operator_separator")]
    pub operator_separator: String,
}

impl ResourceConfig {
    /// Whether `key` is reserved for paging or ordering and never a filter
    pub fn is_control_key(&self, key: &str) -> bool {
        key == self.page_key
            || key == self.per_page_key
            || key == self.sort_key
            || key == self.paginate_key
    }

    /// Reject settings the resolvers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_per_page == 0 {
            return Err(Error::InvalidConfig(
                "resource.max_per_page must be at least 1".to_string(),
            ));
        }
        if self.default_per_page == 0 || self.default_per_page > self.max_per_page {
            return Err(Error::InvalidConfig(format!(
                "resource.default_per_page must be within 1..={}",
                self.max_per_page
            )));
        }
        if self.operator_separator.is_empty() {
            return Err(Error::InvalidConfig(
                "resource.operator_separator must not be empty".to_string(),
            ));
        }

        let keys = [
            &self.page_key,
            &self.per_page_key,
            &self.sort_key,
            &self.paginate_key,
        ];
        for (i, key) in keys.iter().enumerate() {
            if key.is_empty() {
                return Err(Error::InvalidConfig(
                    "resource control keys must not be empty".to_string(),
                ));
            }
            if keys[..i].contains(key) {
                return Err(Error::InvalidConfig(format!(
                    "resource control key '{}' is used twice",
                    key
                )));
            }
        }
        Ok(())
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            page_key: default_page_key(),
            per_page_key: default_per_page_key(),
            sort_key: default_sort_key(),
            paginate_key: default_paginate_key(),
            operator_separator: default_operator_separator(),
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_per_page() -> u64 {
    15
}

fn default_max_per_page() -> u64 {
    100
}

fn default_page_key() -> String {
    "page".to_string()
}

fn default_per_page_key() -> String {
    "per_page".to_string()
}

fn default_sort_key() -> String {
    "sort".to_string()
}

fn default_paginate_key() -> String {
    "paginate".to_string()
}

fn default_operator_separator() -> String {
    "__".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is inferred from the binary name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| APP_DIR.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    ///
    /// Searches for config files in this order (first found wins):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/resource-controller/{service_name}/config.toml
    /// 3. System directory: /etc/resource-controller/{service_name}/config.toml
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!(paths = ?config_paths, "Searching for config files");

        let mut figment = Figment::new().merge(Serialized::defaults(Config::named(service_name)));

        // lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!(path = %path.display(), "Loading configuration");
                figment = figment.merge(Toml::file(path));
            }
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses XDG directories and loads directly from the given path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.resource.validate()?;
        Ok(config)
    }

    /// Default configuration carrying the given service name
    pub fn named(service_name: &str) -> Self {
        let mut config = Self::default();
        config.service.name = service_name.to_string();
        config
    }

    /// Candidate config file paths, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR);
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg_dirs.find_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(APP_DIR)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_DIR.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            resource: ResourceConfig::default(),
        }
    }
}
