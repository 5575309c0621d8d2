//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! HTTP cache headers, the health endpoint path, deployment defaults, logging
//! format and default paths. `AppConfig` is the root configuration struct.

use const_format::formatcp;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// The health endpoint and the status page reflect live process state and must
// never be served from an intermediate cache (load balancer, CDN, browser).

/// Static assets (CSS) - long cache with immutable hint
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 86400;

/// Cache-Control for anything carrying live status
pub const CACHE_CONTROL_NO_STORE: &str = "no-cache, no-store, must-revalidate";

pub const CACHE_CONTROL_STATIC: &str =
    formatcp!("public, max-age={}, immutable", HTTP_CACHE_STATIC_MAX_AGE);

// =============================================================================
// Health Endpoint
// =============================================================================

/// Path of the health endpoint, relative to the service root
pub const HEALTH_PATH: &str = "/api/health";

/// Constant service identifier reported in every snapshot
pub const SERVICE_NAME: &str = "deploy-status";

/// Environment variable naming the deployment environment
pub const ENV_VAR_ENVIRONMENT: &str = "APP_ENV";

/// Environment variable carrying the deployed application version
pub const ENV_VAR_VERSION: &str = "APP_VERSION";

/// Environment label used when neither the environment nor config name one
pub const DEFAULT_ENVIRONMENT: &str = "development";

// =============================================================================
// Status Viewer
// =============================================================================

/// Message shown for every failed fetch, whatever the cause
pub const VIEWER_ERROR_MESSAGE: &str = "Unable to load deployment info";

/// Default timeout for a single health request
pub const DEFAULT_VIEWER_TIMEOUT_SECS: u64 = 10;

/// Seconds in a minute
pub const SECONDS_PER_MINUTE: u64 = 60;
/// Seconds in an hour
pub const SECONDS_PER_HOUR: u64 = 3600;

/// Localized timestamp layout (matches the en-US locale rendering)
pub const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Timestamp layout for the status page, which is rendered in the server's
/// zone and read in the browser's, so the offset is spelled out
pub const ZONED_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p (UTC%:z)";

/// Spinner frame interval for the terminal viewer, in milliseconds
pub const SPINNER_INTERVAL_MS: u64 = 100;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Glob pattern for template files
pub const TEMPLATE_GLOB: &str = "templates/**/*";

/// Directory for static files
pub const STATIC_DIR: &str = "static";

/// Default site title
pub const DEFAULT_SITE_NAME: &str = "Deployment Status";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "deploy_status=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Deployment labels reported by the health endpoint
    #[serde(default)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Where the status page gets its snapshot from
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    /// Base URL a local client should use to reach this server.
    ///
    /// Wildcard bind addresses are replaced by loopback.
    pub fn local_base_url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
            other => other,
        };
        format!("http://{}:{}", host, self.port)
    }
}

/// Deployment labels. Environment variables take priority over these.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeploymentConfig {
    pub environment: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Site title shown in the page header and title
    #[serde(default = "UiConfig::default_site_name")]
    pub site_name: String,
    /// Version string, populated at runtime
    #[serde(skip_deserializing, default = "UiConfig::default_version")]
    pub version: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            version: Self::default_version(),
        }
    }
}

impl UiConfig {
    fn default_site_name() -> String {
        DEFAULT_SITE_NAME.to_string()
    }

    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// Base URL of a remote health reporter. When unset the page reads the
    /// in-process reporter directly.
    pub upstream: Option<String>,
    /// Timeout for a single health request in seconds (default: 10)
    #[serde(default = "ViewerConfig::default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            upstream: None,
            timeout_seconds: Self::default_timeout(),
        }
    }
}

impl ViewerConfig {
    fn default_timeout() -> u64 {
        DEFAULT_VIEWER_TIMEOUT_SECS
    }

    /// Parsed upstream base URL, if configured
    pub fn upstream_url(&self) -> Result<Option<Url>, ConfigError> {
        self.upstream
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| {
                    ConfigError::Validation(format!(
                        "viewer.upstream '{}' is not a URL: {}",
                        raw, e
                    ))
                })
            })
            .transpose()
    }
}

/// Template and static file locations
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "AssetsConfig::default_templates")]
    pub templates: String,
    #[serde(default = "AssetsConfig::default_static_dir")]
    pub static_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            templates: Self::default_templates(),
            static_dir: Self::default_static_dir(),
        }
    }
}

impl AssetsConfig {
    fn default_templates() -> String {
        TEMPLATE_GLOB.to_string()
    }

    fn default_static_dir() -> String {
        STATIC_DIR.to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to built-in defaults only when `is_default`
    /// is set and the file does not exist. An explicit path must exist.
    ///
    /// Returns the config and whether the defaults were used.
    pub fn load_or_default<P: AsRef<Path>>(
        path: P,
        is_default: bool,
    ) -> Result<(Self, bool), ConfigError> {
        let path = path.as_ref();
        if is_default && !path.exists() {
            return Ok((Self::default(), true));
        }
        Ok((Self::load(path)?, false))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        if self.viewer.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "viewer.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        self.viewer.upstream_url()?;
        Ok(())
    }
}

/// Picks the log filter with priority: CLI flag > `RUST_LOG` > default
pub fn resolve_log_filter(cli: Option<String>, env: Option<String>) -> String {
    cli.or(env).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
[http]
host = "127.0.0.1"
port = 8080

[deployment]
environment = "staging"
version = "2.3.4"

[ui]
site_name = "Checkout"

[viewer]
upstream = "http://status.internal:3000"
timeout_seconds = 3

[logging]
format = "json"
"#,
        );

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.deployment.environment.as_deref(), Some("staging"));
        assert_eq!(config.deployment.version.as_deref(), Some("2.3.4"));
        assert_eq!(config.ui.site_name, "Checkout");
        assert_eq!(config.ui.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.viewer.timeout_seconds, 3);
        assert_eq!(
            config.viewer.upstream_url().unwrap().unwrap().as_str(),
            "http://status.internal:3000/"
        );
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = write_config("");
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.ui.site_name, DEFAULT_SITE_NAME);
        assert_eq!(config.viewer.timeout_seconds, DEFAULT_VIEWER_TIMEOUT_SECS);
        assert!(config.viewer.upstream.is_none());
        assert_eq!(config.assets.templates, TEMPLATE_GLOB);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let file = write_config("[logging]\nformat = \"xml\"\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("logging.format")));
    }

    #[test]
    fn test_rejects_bad_upstream() {
        let file = write_config("[viewer]\nupstream = \"not a url\"\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("viewer.upstream")));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/deploy-status.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_missing_default_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        let (config, used_defaults) = AppConfig::load_or_default(&path, true).unwrap();
        assert!(used_defaults);
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let err = AppConfig::load_or_default(&path, false).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_present_file_is_loaded_at_any_path() {
        let file = write_config("[http]\nport = 8081\n");

        let (config, used_defaults) = AppConfig::load_or_default(file.path(), true).unwrap();
        assert!(!used_defaults);
        assert_eq!(config.http.port, 8081);

        let (config, used_defaults) = AppConfig::load_or_default(file.path(), false).unwrap();
        assert!(!used_defaults);
        assert_eq!(config.http.port, 8081);
    }

    #[test]
    fn test_invalid_default_file_is_not_masked() {
        let file = write_config("[logging]\nformat = \"xml\"\n");
        let err = AppConfig::load_or_default(file.path(), true).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_log_filter_prefers_cli() {
        let filter = resolve_log_filter(
            Some("deploy_status=trace".to_string()),
            Some("warn".to_string()),
        );
        assert_eq!(filter, "deploy_status=trace");
    }

    #[test]
    fn test_log_filter_falls_back_to_env() {
        assert_eq!(resolve_log_filter(None, Some("warn".to_string())), "warn");
    }

    #[test]
    fn test_log_filter_default() {
        assert_eq!(resolve_log_filter(None, None), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_local_base_url_replaces_wildcard() {
        let http = HttpServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
        };
        assert_eq!(http.local_base_url(), "http://127.0.0.1:3000");

        let http = HttpServerConfig {
            host: "status.local".to_string(),
            port: 80,
        };
        assert_eq!(http.local_base_url(), "http://status.local:80");
    }
}
