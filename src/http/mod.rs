//! HTTP protocol layer module
//!
//! Protocol helpers shared by the handlers: cookies, caching validators,
//! MIME detection, query strings and response builders.

pub mod cache;
pub mod cookie;
pub mod mime;
pub mod query;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_400_response, build_401_response, build_404_response,
    build_405_response, build_413_response, build_asset_response, build_empty_asset_response,
    build_health_response, build_options_response, build_redirect_response, HttpResponse,
};
