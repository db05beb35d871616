//! Request authentication
//!
//! The service does not own sessions. A fronting proxy or session layer
//! authenticates the user and forwards the identity in request headers.

use hyper::header::{HeaderMap, HeaderName};

use crate::config::AuthConfig;

/// Authenticated user attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub is_superuser: bool,
}

/// Resolves the user behind a request, `None` when unauthenticated
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Option<User>;
}

/// Trusts identity headers set upstream
///
/// Any peer that reaches the listener directly can forge these headers, so
/// the service must only be exposed through the identity proxy.
#[derive(Debug, Clone)]
pub struct HeaderAuthenticator {
    user_header: HeaderName,
    roles_header: HeaderName,
    superuser_role: String,
}

impl HeaderAuthenticator {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            user_header: parse_header_name(&config.user_header, "x-remote-user"),
            roles_header: parse_header_name(&config.roles_header, "x-remote-roles"),
            superuser_role: config.superuser_role.clone(),
        }
    }
}

fn parse_header_name(name: &str, fallback: &'static str) -> HeaderName {
    HeaderName::from_bytes(name.as_bytes()).unwrap_or_else(|e| {
        tracing::warn!(header = name, error = %e, fallback, "Invalid auth header name");
        HeaderName::from_static(fallback)
    })
}

impl Authenticator for HeaderAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Option<User> {
        let name = headers
            .get(&self.user_header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())?;

        let is_superuser = headers
            .get_all(&self.roles_header)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|roles| roles.split(','))
            .any(|role| role.trim().eq_ignore_ascii_case(&self.superuser_role));

        Some(User {
            name: name.to_string(),
            is_superuser,
        })
    }
}
