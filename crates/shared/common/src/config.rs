//! Shared configuration structures.

use std::env;

use serde::{Deserialize, Serialize};

/// Read an environment variable, treating empty values as unset.
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Identity provider admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeycloakConfig {
    /// Base URL of the server (e.g., "http://localhost:8080")
    pub server_url: String,
    /// Realm whose users this service manages
    pub realm: String,
    /// Realm the admin client authenticates against
    pub admin_realm: String,
    /// Admin client id
    pub client_id: String,
    /// Client secret for the client-credentials grant
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    /// Admin username; switches token requests to the password grant
    pub admin_username: Option<String>,
    #[serde(skip_serializing)]
    pub admin_password: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl KeycloakConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_url: env_opt("KEYCLOAK_SERVER_URL").unwrap_or(defaults.server_url),
            realm: env_opt("KEYCLOAK_REALM").unwrap_or(defaults.realm),
            admin_realm: env_opt("KEYCLOAK_ADMIN_REALM").unwrap_or(defaults.admin_realm),
            client_id: env_opt("KEYCLOAK_CLIENT_ID").unwrap_or(defaults.client_id),
            client_secret: env_opt("KEYCLOAK_CLIENT_SECRET"),
            admin_username: env_opt("KEYCLOAK_ADMIN_USERNAME"),
            admin_password: env_opt("KEYCLOAK_ADMIN_PASSWORD"),
            request_timeout_ms: env_opt("KEYCLOAK_REQUEST_TIMEOUT_MS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
        }
    }
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            realm: "ITM".to_string(),
            admin_realm: "master".to_string(),
            client_id: "admin-cli".to_string(),
            client_secret: None,
            admin_username: None,
            admin_password: None,
            request_timeout_ms: 10_000,
        }
    }
}

/// Bearer token verification configuration.
///
/// `public_key_pem` (RS256, the realm's signing key) wins over `secret`
/// (HS256) when both are set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JwtConfig {
    #[serde(skip_serializing)]
    pub public_key_pem: Option<String>,
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    /// Expected `iss` claim
    pub issuer: Option<String>,
    /// Expected `aud` claim
    pub audience: Option<String>,
}

impl JwtConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            public_key_pem: env_opt("JWT_PUBLIC_KEY"),
            secret: env_opt("JWT_SECRET"),
            issuer: env_opt("JWT_ISSUER"),
            audience: env_opt("JWT_AUDIENCE"),
        }
    }
}
