//! Request handler module
//!
//! Routing dispatch plus the splash and brand asset endpoints.

pub mod assets;
pub mod router;
pub mod splash;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
