//! brandgate
//!
//! Branding front door for dashboard deployments: resolves the visual brand
//! of a session, keeps it in a cookie, sends users from the splash page to
//! their home dashboard, and serves brand assets with a static fallback.

pub mod auth;
pub mod brand;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
