//! Cookie header module
//!
//! Reads request `Cookie` headers and builds `Set-Cookie` values.

use chrono::{Duration, Utc};
use hyper::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use hyper::Response;

/// `Expires` value used to clear a cookie
const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Iterate over `(name, value)` pairs across all `Cookie` headers
pub fn iter_cookies(headers: &HeaderMap) -> impl Iterator<Item = (&str, &str)> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let value = value.trim();
            // Quoted values are allowed by RFC 6265
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((name.trim(), value))
        })
}

/// Get the cookie value with the given name; a later duplicate wins
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    iter_cookies(headers)
        .filter_map(|(n, v)| (n == name).then_some(v))
        .last()
}

/// Check whether the request carries a cookie, whatever its value
pub fn has_cookie(headers: &HeaderMap, name: &str) -> bool {
    iter_cookies(headers).any(|(n, _)| n == name)
}

/// Build a persistent `Set-Cookie` value scoped to the whole site
pub fn build_set_cookie(name: &str, value: &str, max_age: u64) -> String {
    let expires = i64::try_from(max_age)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|d| Utc::now().checked_add_signed(d))
        .map_or_else(
            || "Fri, 31 Dec 9999 23:59:59 GMT".to_string(),
            |t| t.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        );
    format!("{name}={value}; Max-Age={max_age}; Expires={expires}; Path=/")
}

/// Build a `Set-Cookie` value that makes the browser drop the cookie
pub fn build_delete_cookie(name: &str) -> String {
    format!("{name}=; Max-Age=0; Expires={EPOCH_HTTP_DATE}; Path=/")
}

/// Append a `Set-Cookie` header to a response
pub fn append_set_cookie<B>(response: &mut Response<B>, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => tracing::error!(cookie, error = %e, "Invalid Set-Cookie value dropped"),
    }
}

/// Expire a cookie on the client
pub fn delete_cookie<B>(response: &mut Response<B>, name: &str) {
    append_set_cookie(response, &build_delete_cookie(name));
}
