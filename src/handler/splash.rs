//! Splash endpoint
//!
//! Either records a brand chosen through `?brand=` or forwards an
//! authenticated user to their home dashboard.

use crate::brand::{self, Brand};
use crate::config::AppState;
use crate::error::HandlerError;
use crate::handler::router::RequestContext;
use crate::http::{self, cookie, query, HttpResponse};

/// Query parameter selecting a brand
pub const BRAND_PARAM: &str = "brand";

pub fn splash(ctx: &RequestContext<'_>, state: &AppState) -> Result<HttpResponse, HandlerError> {
    let branding = &state.config.branding;

    if let Some(value) = query::query_param(ctx.query, BRAND_PARAM).filter(|v| !v.is_empty()) {
        // Store the brand and reload the splash page
        let brand = Brand::parse(&value)?;
        tracing::debug!(%brand, "Brand selected via query parameter");
        let mut response = http::build_redirect_response(&state.config.routes.splash_path);
        brand::set_brand(&mut response, Some(&brand), branding);
        return Ok(response);
    }

    let user = state
        .authenticator
        .authenticate(ctx.headers)
        .ok_or(HandlerError::NotAuthenticated)?;

    let home = state.dashboards.user_home(&user);
    tracing::debug!(user = %user.name, superuser = user.is_superuser, home, "Redirecting to home dashboard");

    let mut response = http::build_redirect_response(home);
    if cookie::has_cookie(ctx.headers, &branding.logout_reason_cookie) {
        cookie::delete_cookie(&mut response, &branding.logout_reason_cookie);
    }
    let current = brand::get_brand(ctx.headers, &branding.cookie_name, &state.default_brand);
    brand::set_brand(&mut response, Some(&current), branding);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use hyper::header::{HeaderMap, HeaderValue, COOKIE, LOCATION, SET_COOKIE};

    fn state() -> AppState {
        let config = Config::load_from("does-not-exist/brandgate").unwrap();
        AppState::new(config).unwrap()
    }

    fn ctx<'a>(query: Option<&'a str>, headers: &'a HeaderMap) -> RequestContext<'a> {
        RequestContext {
            path: "/",
            query,
            headers,
            is_head: false,
        }
    }

    fn set_cookies(resp: &HttpResponse) -> Vec<String> {
        resp.headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_brand_query_sets_cookie_and_redirects() {
        let headers = HeaderMap::new();
        let resp = splash(&ctx(Some("brand=acme"), &headers), &state()).unwrap();

        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()[LOCATION], "/");
        let cookies = set_cookies(&resp);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("brand=acme;"));
    }

    #[test]
    fn test_invalid_brand_query_rejected() {
        let headers = HeaderMap::new();
        let err = splash(&ctx(Some("brand=..%2Fetc"), &headers), &state()).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidBrand(_)));
    }

    #[test]
    fn test_empty_brand_query_requires_auth() {
        let headers = HeaderMap::new();
        let err = splash(&ctx(Some("brand="), &headers), &state()).unwrap_err();
        assert!(matches!(err, HandlerError::NotAuthenticated));
    }

    #[test]
    fn test_authenticated_redirects_home_with_brand() {
        let mut headers = HeaderMap::new();
        headers.insert("x-remote-user", HeaderValue::from_static("alice"));
        headers.insert(COOKIE, HeaderValue::from_static("brand=acme"));

        let resp = splash(&ctx(None, &headers), &state()).unwrap();
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()[LOCATION], "/project/");
        assert_eq!(resp.headers()["vary"], "Cookie");

        let cookies = set_cookies(&resp);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("brand=acme;"));
    }

    #[test]
    fn test_logout_reason_cleared() {
        let mut headers = HeaderMap::new();
        headers.insert("x-remote-user", HeaderValue::from_static("alice"));
        headers.insert(
            COOKIE,
            HeaderValue::from_static("logout_reason=Session%20expired"),
        );

        let resp = splash(&ctx(None, &headers), &state()).unwrap();
        let cookies = set_cookies(&resp);
        assert!(cookies.iter().any(|c| c.starts_with("logout_reason=; Max-Age=0")));
        // No brand cookie on the request: the default brand is stamped
        assert!(cookies.iter().any(|c| c.starts_with("brand=default;")));
    }
}
