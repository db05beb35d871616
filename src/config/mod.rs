// Configuration module entry point
// Loads configuration from defaults, an optional TOML file and the environment

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    AuthConfig, BrandingConfig, Config, DashboardEntry, DashboardsConfig, HealthConfig,
    HttpConfig, LogFormat, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig,
};

/// Default configuration file (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `BRANDGATE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "BRANDGATE";

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("invalid default brand: {0}")]
    InvalidDefaultBrand(#[from] crate::brand::BrandError),

    #[error("invalid dashboard configuration: {0}")]
    Dashboards(#[from] crate::dashboard::DashboardError),

    #[error("invalid route configuration: {0}")]
    Routes(String),
}

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error; defaults and environment still apply
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default(
                "http.server_name",
                concat!("brandgate/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.get_socket_addr()?;
        crate::brand::Brand::parse(&self.branding.default_brand)?;
        crate::dashboard::DashboardRegistry::from_config(&self.dashboards)?;

        let routes = &self.routes;
        if !routes.splash_path.starts_with('/') {
            return Err(ConfigError::Routes(format!(
                "splash_path must start with '/': {}",
                routes.splash_path
            )));
        }
        if !routes.asset_prefix.starts_with('/') || !routes.asset_prefix.ends_with('/') {
            return Err(ConfigError::Routes(format!(
                "asset_prefix must start and end with '/': {}",
                routes.asset_prefix
            )));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ConfigError::InvalidAddress { addr, source })
    }
}
