//! Backend resources gateway library.
//!
//! HTTP REST API in front of the identity provider's user administration:
//! bearer tokens are verified here, the acting principal must hold the
//! configured role, and user operations are delegated to `user_service_lib`.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::GatewayConfig;
use crate::middleware::JwtVerifier;
use crate::routes::create_router;
use crate::state::AppState;

/// Wire the production state: Keycloak-backed user service and token verifier.
pub fn build_state(config: GatewayConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let verifier = Arc::new(JwtVerifier::from_config(&config.jwt)?);
    let user_service = Arc::new(user_service_lib::connect(config.keycloak.clone())?);

    Ok(AppState::new(user_service, verifier, config))
}

/// Run the HTTP server with the given configuration.
pub async fn run_server(
    host: &str,
    port: u16,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        keycloak = %config.keycloak.server_url,
        realm = %config.keycloak.realm,
        required_role = %config.required_role,
        "Starting backend resources gateway"
    );

    let state = build_state(config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
