//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, error mapping and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::Body;
use hyper::header::{HeaderMap, HeaderValue, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Version};

use crate::config::{AppState, RoutesConfig};
use crate::error::HandlerError;
use crate::handler::{assets, splash};
use crate::http::{self, query, HttpResponse};
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub headers: &'a HeaderMap,
    pub is_head: bool,
}

impl RequestContext<'_> {
    pub fn if_none_match(&self) -> Option<&str> {
        self.headers
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
    }

    fn is_xhr(&self) -> bool {
        self.headers
            .get("x-requested-with")
            .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"XMLHttpRequest"))
    }
}

/// Main entry point for HTTP request handling
///
/// Request bodies are never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();
    let ctx = RequestContext {
        path: parts.uri.path(),
        query: parts.uri.query(),
        headers: &parts.headers,
        is_head: parts.method == Method::HEAD,
    };

    let mut response = match precheck(&parts.method, &parts.headers, &state) {
        Some(resp) => resp,
        None => route_request(&ctx, &state).await,
    };

    match HeaderValue::from_str(&state.config.http.server_name) {
        Ok(server) => {
            response.headers_mut().insert(SERVER, server);
        }
        Err(e) => tracing::warn!(error = %e, "Invalid server_name, Server header omitted"),
    }

    if state.config.logging.access_log {
        let entry = access_entry(&ctx, &parts.method, parts.version, peer_addr, &response, started);
        logger::log_access(&entry, state.access_log_format);
    }

    Ok(response)
}

/// Method and body-size checks that run before routing
fn precheck(method: &Method, headers: &HeaderMap, state: &AppState) -> Option<HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return Some(http::build_options_response()),
        _ => {
            tracing::warn!(%method, "Method not allowed");
            return Some(http::build_405_response());
        }
    }
    check_body_size(headers, state.config.http.max_body_size)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            tracing::warn!("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                tracing::warn!(size, max_body_size, "Request body too large");
                Some(http::build_413_response())
            }
            Err(_) => {
                tracing::warn!(value = size_str, "Invalid Content-Length value, skipping size check");
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    let routes: &RoutesConfig = &state.config.routes;

    // Health check endpoints (highest priority, always fast)
    if routes.health.enabled
        && (ctx.path == routes.health.liveness_path || ctx.path == routes.health.readiness_path)
    {
        return http::build_health_response("ok", ctx.is_head);
    }

    if ctx.path == routes.splash_path {
        return splash::splash(ctx, state)
            .unwrap_or_else(|e| error_response(ctx, state, &e));
    }

    if let Some(asset) = ctx.path.strip_prefix(routes.asset_prefix.as_str()) {
        return assets::serve_brand_asset(ctx, asset, state).await;
    }

    http::build_404_response()
}

/// Map a handler error to the response the dashboard framework would give
fn error_response(ctx: &RequestContext<'_>, state: &AppState, error: &HandlerError) -> HttpResponse {
    match error {
        HandlerError::NotAuthenticated => {
            if ctx.is_xhr() {
                return http::build_401_response();
            }
            let auth = &state.config.auth;
            let next = ctx
                .query
                .map_or_else(|| ctx.path.to_string(), |q| format!("{}?{q}", ctx.path));
            let target = query::append_query_param(&auth.login_url, &auth.redirect_field_name, &next);
            tracing::debug!(%target, "Not authenticated, redirecting to login");
            http::build_redirect_response(&target)
        }
        HandlerError::InvalidBrand(e) => {
            tracing::warn!(error = %e, "Rejected brand selection");
            http::build_400_response(&e.to_string())
        }
    }
}

fn access_entry(
    ctx: &RequestContext<'_>,
    method: &Method,
    version: Version,
    peer_addr: SocketAddr,
    response: &HttpResponse,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        method.to_string(),
        ctx.path.to_string(),
    );
    entry.query = ctx.query.map(ToString::to_string);
    entry.http_version = http_version_label(version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_string(ctx.headers, REFERER.as_str());
    entry.user_agent = header_string(ctx.headers, USER_AGENT.as_str());
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
