//! HTTP response building module
//!
//! Provides builders for the status codes the service answers with.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Response type produced by every handler
pub type HttpResponse = Response<Full<Bytes>>;

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, cache_control: &str) -> HttpResponse {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", cache_control)
        .header("Vary", "Cookie")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response(reason: &str) -> HttpResponse {
    let body = format!("400 Bad Request: {reason}");
    Response::builder()
        .status(400)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Vary", "Cookie")
        .body(Full::new(Bytes::from(body.clone())))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Build 401 Unauthorized response
pub fn build_401_response() -> HttpResponse {
    Response::builder()
        .status(401)
        .header("Content-Type", "text/plain")
        .header("Vary", "Cookie")
        .body(Full::new(Bytes::from("401 Unauthorized")))
        .unwrap_or_else(|e| {
            log_build_error("401", &e);
            Response::new(Full::new(Bytes::from("401 Unauthorized")))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> HttpResponse {
    Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> HttpResponse {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 302 redirect response
///
/// Redirect targets depend on the brand cookie, so caches must key on it.
pub fn build_redirect_response(target: &str) -> HttpResponse {
    Response::builder()
        .status(302)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .header("Vary", "Cookie")
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Full::new(Bytes::from("Redirecting...")))
        })
}

/// Build health check response
pub fn build_health_response(status: &str, is_head: bool) -> HttpResponse {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(status.to_string())
    };
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-store")
        .header("Content-Length", status.len())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a brand asset response with validators
pub fn build_asset_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    cache_control: &str,
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", cache_control)
        .header("Vary", "Cookie")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the empty response used when no asset exists
pub fn build_empty_asset_response(content_type: &str) -> HttpResponse {
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", 0)
        .header("Cache-Control", "no-cache")
        .header("Vary", "Cookie")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    tracing::error!(status, error = %error, "Failed to build response");
}
