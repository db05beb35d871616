//! Brand selection
//!
//! A brand is a named visual theme chosen per session. It is carried in a
//! cookie and names a directory under the brand root, so it must be a single
//! safe path segment.

use std::fmt;

use hyper::header::HeaderMap;
use hyper::Response;

use crate::config::BrandingConfig;
use crate::http::cookie;

const MAX_BRAND_LEN: usize = 64;

/// Brand validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrandError {
    #[error("brand name is empty")]
    Empty,

    #[error("brand name longer than 64 characters")]
    TooLong,

    #[error("brand name '{0}' contains characters outside [A-Za-z0-9_-]")]
    InvalidCharacters(String),
}

/// A validated brand identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Brand(String);

impl Brand {
    pub fn parse(value: &str) -> Result<Self, BrandError> {
        if value.is_empty() {
            return Err(BrandError::Empty);
        }
        if value.len() > MAX_BRAND_LEN {
            return Err(BrandError::TooLong);
        }
        if !value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(BrandError::InvalidCharacters(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Brand {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Brand of the current session
///
/// Falls back to `default` when the cookie is missing, empty or invalid.
pub fn get_brand(headers: &HeaderMap, cookie_name: &str, default: &Brand) -> Brand {
    match cookie::get_cookie(headers, cookie_name) {
        Some("") | None => default.clone(),
        Some(value) => Brand::parse(value).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Ignoring invalid brand cookie");
            default.clone()
        }),
    }
}

/// Make the brand persistent on the client
///
/// Without a brand the response is left untouched.
pub fn set_brand<B>(response: &mut Response<B>, brand: Option<&Brand>, config: &BrandingConfig) {
    let Some(brand) = brand else {
        return;
    };
    let value = cookie::build_set_cookie(&config.cookie_name, brand.as_str(), config.cookie_max_age);
    cookie::append_set_cookie(response, &value);
}
