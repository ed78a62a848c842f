//! HTTP surface of the gateway.

mod error;
mod handlers;
mod router;

use std::sync::Arc;

use crate::gateway::Gateway;

pub use error::ApiError;
pub use handlers::GenerateResponse;
pub use router::create_router;

/// Shared application state. Cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}
