//! Application state for dependency injection.

use std::sync::Arc;

use user_service_lib::UserService;

use crate::config::GatewayConfig;
use crate::middleware::JwtVerifier;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub verifier: Arc<JwtVerifier>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        verifier: Arc<JwtVerifier>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            user_service,
            verifier,
            config,
        }
    }
}
