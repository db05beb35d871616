// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub branding: BrandingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub dashboards: DashboardsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Log output format for the tracing subscriber
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stderr if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Keep-alive switch: `0` disables it, any other value enables it.
    /// Connections are closed by the read/write timeout, not by this value.
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl PerformanceConfig {
    pub fn keep_alive_enabled(&self) -> bool {
        self.keep_alive_timeout > 0
    }

    /// Upper bound on the lifetime of one connection
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout.max(self.write_timeout))
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Routes configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoutesConfig {
    /// Path of the splash endpoint
    #[serde(default = "default_splash_path")]
    pub splash_path: String,
    /// Prefix under which brand assets are served
    #[serde(default = "default_asset_prefix")]
    pub asset_prefix: String,
    /// Health check configuration
    #[serde(default)]
    pub health: HealthConfig,
}

fn default_splash_path() -> String {
    "/".to_string()
}

fn default_asset_prefix() -> String {
    "/brand/".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            splash_path: default_splash_path(),
            asset_prefix: default_asset_prefix(),
            health: HealthConfig::default(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Brand cookie and brand asset configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BrandingConfig {
    /// Directory that `brand_root` and `static_root` are resolved against
    pub root_dir: PathBuf,
    /// Directory holding one sub-directory per brand
    pub brand_root: PathBuf,
    /// Fallback tree with `img/` and `css/` sub-directories
    pub static_root: PathBuf,
    pub cookie_name: String,
    /// Brand cookie lifetime in seconds (30 days by default)
    pub cookie_max_age: u64,
    pub default_brand: String,
    pub logout_reason_cookie: String,
    /// `Cache-Control` max-age for served assets
    pub asset_max_age: u32,
}

impl BrandingConfig {
    /// Directory that holds the per-brand asset folders
    pub fn brand_dir(&self) -> PathBuf {
        join_root(&self.root_dir, &self.brand_root)
    }

    /// Root of the static fallback tree
    pub fn static_dir(&self) -> PathBuf {
        join_root(&self.root_dir, &self.static_root)
    }
}

fn join_root(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            brand_root: PathBuf::from("brand"),
            static_root: PathBuf::from("static/custom"),
            cookie_name: "brand".to_string(),
            cookie_max_age: 2_592_000,
            default_brand: "default".to_string(),
            logout_reason_cookie: "logout_reason".to_string(),
            asset_max_age: 3600,
        }
    }
}

/// Identity header configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// Header carrying the authenticated user name
    pub user_header: String,
    /// Header carrying a comma-separated role list
    pub roles_header: String,
    /// Role that marks a user as superuser
    pub superuser_role: String,
    /// Where unauthenticated splash requests are sent
    pub login_url: String,
    /// Query parameter carrying the originally requested path
    pub redirect_field_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: "x-remote-user".to_string(),
            roles_header: "x-remote-roles".to_string(),
            superuser_role: "admin".to_string(),
            login_url: "/auth/login/".to_string(),
            redirect_field_name: "next".to_string(),
        }
    }
}

/// Dashboard registry configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DashboardsConfig {
    /// Slug of the system default dashboard
    pub default: String,
    /// Slug preferred as home for superusers
    pub superuser_dashboard: String,
    /// Prefix for dashboards without an explicit URL
    pub url_prefix: String,
    pub registered: Vec<DashboardEntry>,
}

impl Default for DashboardsConfig {
    fn default() -> Self {
        Self {
            default: "project".to_string(),
            superuser_dashboard: "project".to_string(),
            url_prefix: "/".to_string(),
            registered: vec![DashboardEntry {
                slug: "project".to_string(),
                url: None,
            }],
        }
    }
}

/// A single registered dashboard
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DashboardEntry {
    pub slug: String,
    #[serde(default)]
    pub url: Option<String>,
}
