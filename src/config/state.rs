// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;

use super::types::Config;
use super::ConfigError;
use crate::auth::{Authenticator, HeaderAuthenticator};
use crate::brand::Brand;
use crate::dashboard::DashboardRegistry;
use crate::logger::AccessLogFormat;

/// Application state
pub struct AppState {
    pub config: Config,
    pub dashboards: DashboardRegistry,
    pub authenticator: Arc<dyn Authenticator>,
    /// Validated copy of `branding.default_brand`
    pub default_brand: Brand,
    pub access_log_format: AccessLogFormat,
}

impl AppState {
    /// Build state with the header-based authenticator from `config.auth`
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let authenticator = Arc::new(HeaderAuthenticator::from_config(&config.auth));
        Self::with_authenticator(config, authenticator)
    }

    /// Build state with a custom authenticator
    pub fn with_authenticator(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, ConfigError> {
        let dashboards = DashboardRegistry::from_config(&config.dashboards)?;
        let default_brand = Brand::parse(&config.branding.default_brand)?;
        let access_log_format = AccessLogFormat::from_name(&config.logging.access_log_format);

        Ok(Self {
            config,
            dashboards,
            authenticator,
            default_brand,
            access_log_format,
        })
    }
}
