//! Logger module
//!
//! Sets up the `tracing` subscriber and provides the access log and
//! lifecycle log helpers used by the server.

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat, LoggingConfig};

/// Tracing target for access log records
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once
/// at application startup.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };
    let writer = writer::make_writer(config.log_file.as_deref())?;
    let ansi = config.log_file.is_none();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    let installed = match config.format {
        LogFormat::Text => builder.with_ansi(ansi).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        workers = ?config.server.workers,
        "brandgate listening on http://{addr}"
    );
    tracing::info!(
        brand_dir = %config.branding.brand_dir().display(),
        static_dir = %config.branding.static_dir().display(),
        default_brand = %config.branding.default_brand,
        cookie_max_age = config.branding.cookie_max_age,
        "Branding configured"
    );
    tracing::info!(
        splash = %config.routes.splash_path,
        assets = %config.routes.asset_prefix,
        default_dashboard = %config.dashboards.default,
        "Routes configured"
    );
}

/// Emit one access log record
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
