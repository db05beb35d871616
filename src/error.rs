//! Request-level errors raised by handlers and mapped to responses by the router

use crate::brand::BrandError;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The endpoint requires an authenticated user
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("invalid brand: {0}")]
    InvalidBrand(#[from] BrandError),
}
