//! Keycloak admin REST adapter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use serde::Deserialize;
use tracing::debug;

use common::KeycloakConfig;
use domain::UserRepresentation;

use super::{
    IdentityError, IdentityProvider, IdentityResult, RealmResource, UserResource, UsersResource,
};

/// Token endpoint payload; only the bearer token is used.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Error payloads returned by the admin API and the token endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error_message: Option<String>,
    #[serde(rename = "error_description")]
    error_description: Option<String>,
    error: Option<String>,
}

/// Shared HTTP client and configuration behind every resource handle.
struct AdminSession {
    http: reqwest::Client,
    config: KeycloakConfig,
}

impl AdminSession {
    fn base_url(&self) -> &str {
        self.config.server_url.trim_end_matches('/')
    }

    fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url(),
            self.config.admin_realm
        )
    }

    fn users_url(&self, realm: &str) -> String {
        format!("{}/admin/realms/{}/users", self.base_url(), realm)
    }

    fn user_url(&self, realm: &str, id: &str) -> String {
        format!("{}/{}", self.users_url(realm), id)
    }

    /// Form fields for the admin token request.
    ///
    /// Uses the password grant when admin credentials are configured and the
    /// client-credentials grant otherwise.
    fn token_form(&self) -> Vec<(&'static str, String)> {
        let config = &self.config;
        let mut form = vec![("client_id", config.client_id.clone())];

        match (&config.admin_username, &config.admin_password) {
            (Some(username), Some(password)) => {
                form.push(("grant_type", "password".to_string()));
                form.push(("username", username.clone()));
                form.push(("password", password.clone()));
            }
            _ => form.push(("grant_type", "client_credentials".to_string())),
        }

        if let Some(secret) = &config.client_secret {
            form.push(("client_secret", secret.clone()));
        }

        form
    }

    /// Obtain an admin bearer token for one call.
    async fn access_token(&self) -> IdentityResult<String> {
        let url = self.token_url();
        debug!("Requesting admin token from {}", url);

        let response = self.http.post(&url).form(&self.token_form()).send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

/// Turn an unsuccessful response into a rejection, keeping the provider's message.
async fn rejection(response: reqwest::Response) -> IdentityError {
    let status = response.status();
    let body = response.json::<ErrorResponse>().await.unwrap_or_default();
    let message = body
        .error_message
        .or(body.error_description)
        .or(body.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    IdentityError::Rejected { status, message }
}

/// Admin client for a Keycloak server.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct KeycloakAdmin {
    session: Arc<AdminSession>,
}

impl KeycloakAdmin {
    /// Build an admin client from configuration.
    pub fn new(config: KeycloakConfig) -> IdentityResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        debug!(
            "Keycloak admin client for {} (admin realm {})",
            config.server_url, config.admin_realm
        );

        Ok(Self {
            session: Arc::new(AdminSession { http, config }),
        })
    }
}

impl IdentityProvider for KeycloakAdmin {
    fn realm(&self, name: &str) -> Box<dyn RealmResource> {
        Box::new(KeycloakRealm {
            session: self.session.clone(),
            realm: name.to_string(),
        })
    }
}

struct KeycloakRealm {
    session: Arc<AdminSession>,
    realm: String,
}

impl RealmResource for KeycloakRealm {
    fn users(&self) -> Box<dyn UsersResource> {
        Box::new(KeycloakUsers {
            session: self.session.clone(),
            realm: self.realm.clone(),
        })
    }
}

struct KeycloakUsers {
    session: Arc<AdminSession>,
    realm: String,
}

#[async_trait]
impl UsersResource for KeycloakUsers {
    async fn create(&self, representation: UserRepresentation) -> IdentityResult<StatusCode> {
        let token = self.session.access_token().await?;
        let url = self.session.users_url(&self.realm);
        debug!("POST {}", url);

        let response = self
            .session
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&representation)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection(response).await);
        }

        Ok(status)
    }

    fn get(&self, id: &str) -> Box<dyn UserResource> {
        Box::new(KeycloakUser {
            session: self.session.clone(),
            realm: self.realm.clone(),
            id: id.to_string(),
        })
    }

    async fn list(&self, first: u32, max: u32) -> IdentityResult<Vec<UserRepresentation>> {
        let token = self.session.access_token().await?;
        let url = self.session.users_url(&self.realm);
        debug!("GET {} (first={}, max={})", url, first, max);

        let response = self
            .session
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("first", first.to_string()),
                ("max", max.to_string()),
                ("briefRepresentation", "false".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        Ok(response.json().await?)
    }
}

struct KeycloakUser {
    session: Arc<AdminSession>,
    realm: String,
    id: String,
}

#[async_trait]
impl UserResource for KeycloakUser {
    async fn to_representation(&self) -> IdentityResult<UserRepresentation> {
        let token = self.session.access_token().await?;
        let url = self.session.user_url(&self.realm, &self.id);
        debug!("GET {}", url);

        let response = self.session.http.get(&url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(IdentityError::NotFound),
            status if status.is_success() => Ok(response.json().await?),
            _ => Err(rejection(response).await),
        }
    }
}
