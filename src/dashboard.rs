//! Dashboard registry and home resolution

use std::collections::HashMap;

use crate::auth::User;
use crate::config::DashboardsConfig;

/// Dashboard lookup and registration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("dashboard '{0}' is not registered")]
    NotRegistered(String),

    #[error("dashboard '{0}' is registered more than once")]
    Duplicate(String),
}

/// A registered dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    slug: String,
    url: String,
}

impl Dashboard {
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn absolute_url(&self) -> &str {
        &self.url
    }
}

/// Registered dashboards with one designated default
#[derive(Debug, Clone)]
pub struct DashboardRegistry {
    dashboards: HashMap<String, Dashboard>,
    default: String,
    superuser_dashboard: String,
}

impl DashboardRegistry {
    pub fn from_config(config: &DashboardsConfig) -> Result<Self, DashboardError> {
        let prefix = if config.url_prefix.ends_with('/') {
            config.url_prefix.clone()
        } else {
            format!("{}/", config.url_prefix)
        };

        let mut dashboards = HashMap::with_capacity(config.registered.len());
        for entry in &config.registered {
            let url = entry
                .url
                .clone()
                .unwrap_or_else(|| format!("{prefix}{}/", entry.slug));
            let dashboard = Dashboard {
                slug: entry.slug.clone(),
                url,
            };
            if dashboards.insert(entry.slug.clone(), dashboard).is_some() {
                return Err(DashboardError::Duplicate(entry.slug.clone()));
            }
        }

        if !dashboards.contains_key(&config.default) {
            return Err(DashboardError::NotRegistered(config.default.clone()));
        }

        Ok(Self {
            dashboards,
            default: config.default.clone(),
            superuser_dashboard: config.superuser_dashboard.clone(),
        })
    }

    pub fn get(&self, slug: &str) -> Result<&Dashboard, DashboardError> {
        self.dashboards
            .get(slug)
            .ok_or_else(|| DashboardError::NotRegistered(slug.to_string()))
    }

    pub fn default_dashboard(&self) -> &Dashboard {
        // Presence is checked in from_config
        &self.dashboards[&self.default]
    }

    /// Absolute URL of the user's home dashboard
    ///
    /// Superusers prefer the superuser dashboard when it is registered;
    /// everyone else lands on the default dashboard.
    pub fn user_home(&self, user: &User) -> &str {
        let preferred = if user.is_superuser {
            match self.get(&self.superuser_dashboard) {
                Ok(dashboard) => Some(dashboard),
                Err(e) => {
                    tracing::debug!(user = %user.name, error = %e, "Falling back to default dashboard");
                    None
                }
            }
        } else {
            None
        };

        preferred
            .unwrap_or_else(|| self.default_dashboard())
            .absolute_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardEntry;

    fn entry(slug: &str) -> DashboardEntry {
        DashboardEntry {
            slug: slug.to_string(),
            url: None,
        }
    }

    fn config(default: &str, slugs: &[&str]) -> DashboardsConfig {
        DashboardsConfig {
            default: default.to_string(),
            registered: slugs.iter().map(|s| entry(s)).collect(),
            ..DashboardsConfig::default()
        }
    }

    fn user(is_superuser: bool) -> User {
        User {
            name: "u".to_string(),
            is_superuser,
        }
    }

    #[test]
    fn test_superuser_prefers_project() {
        let registry = DashboardRegistry::from_config(&config("settings", &["settings", "project"])).unwrap();
        assert_eq!(registry.user_home(&user(true)), "/project/");
    }

    #[test]
    fn test_superuser_falls_back_to_default() {
        let registry = DashboardRegistry::from_config(&config("settings", &["settings"])).unwrap();
        assert_eq!(registry.user_home(&user(true)), "/settings/");
    }

    #[test]
    fn test_regular_user_gets_default() {
        let registry = DashboardRegistry::from_config(&config("settings", &["settings", "project"])).unwrap();
        assert_eq!(registry.user_home(&user(false)), "/settings/");
    }

    #[test]
    fn test_explicit_url_and_prefix() {
        let mut cfg = config("project", &["project"]);
        cfg.url_prefix = "/dashboard".to_string();
        cfg.registered.push(DashboardEntry {
            slug: "admin".to_string(),
            url: Some("/admin/overview/".to_string()),
        });
        let registry = DashboardRegistry::from_config(&cfg).unwrap();
        assert_eq!(registry.default_dashboard().absolute_url(), "/dashboard/project/");
        assert_eq!(registry.get("admin").unwrap().absolute_url(), "/admin/overview/");
    }

    #[test]
    fn test_get_unregistered() {
        let registry = DashboardRegistry::from_config(&config("project", &["project"])).unwrap();
        assert_eq!(
            registry.get("identity"),
            Err(DashboardError::NotRegistered("identity".to_string()))
        );
    }

    #[test]
    fn test_invalid_registries() {
        assert_eq!(
            DashboardRegistry::from_config(&config("missing", &["project"])).unwrap_err(),
            DashboardError::NotRegistered("missing".to_string())
        );
        assert_eq!(
            DashboardRegistry::from_config(&config("project", &["project", "project"])).unwrap_err(),
            DashboardError::Duplicate("project".to_string())
        );
    }
}
