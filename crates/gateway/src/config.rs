//! Gateway configuration.

use std::env;

use common::{JwtConfig, KeycloakConfig};
use domain::Role;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Role every `/api/users` caller must hold
    pub required_role: Role,
    /// Identity provider admin API
    pub keycloak: KeycloakConfig,
    /// Bearer token verification
    pub jwt: JwtConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            required_role: env::var("API_REQUIRED_ROLE")
                .ok()
                .and_then(|r| Role::from_claim(&r))
                .unwrap_or(Role::Moderator),
            keycloak: KeycloakConfig::from_env(),
            jwt: JwtConfig::from_env(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            required_role: Role::Moderator,
            keycloak: KeycloakConfig::default(),
            jwt: JwtConfig::default(),
        }
    }
}
