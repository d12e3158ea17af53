//! Authentication and authorization middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::warn;

use common::{AppError, AppResult, JwtConfig};
use domain::{Principal, Role, BEARER_TOKEN_PREFIX};

use crate::state::AppState;

/// Realm-level role claim as issued by the identity provider.
#[derive(Debug, Default, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Access token claims the gateway reads.
#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub realm_access: RealmAccess,
    pub exp: i64,
}

/// Verifies bearer tokens and turns them into principals.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Build a verifier from configuration; the public key wins over the secret.
    pub fn from_config(config: &JwtConfig) -> AppResult<Self> {
        let verifier = match (&config.public_key_pem, &config.secret) {
            (Some(key), _) => Self::rs256_pem(&to_pem(key))?,
            (None, Some(secret)) => Self::hs256(secret.as_bytes()),
            (None, None) => {
                return Err(AppError::internal(
                    "JWT_PUBLIC_KEY or JWT_SECRET must be configured",
                ))
            }
        };

        Ok(verifier.with_expectations(config.issuer.as_deref(), config.audience.as_deref()))
    }

    /// HS256 verifier with a shared secret.
    pub fn hs256(secret: &[u8]) -> Self {
        Self::new(DecodingKey::from_secret(secret), Algorithm::HS256)
    }

    /// RS256 verifier with a PEM encoded public key.
    pub fn rs256_pem(pem: &str) -> AppResult<Self> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AppError::internal(format!("Invalid JWT public key: {}", e)))?;
        Ok(Self::new(key, Algorithm::RS256))
    }

    fn new(key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        Self { key, validation }
    }

    /// Require `iss` and/or `aud` to match.
    pub fn with_expectations(mut self, issuer: Option<&str>, audience: Option<&str>) -> Self {
        if let Some(issuer) = issuer {
            self.validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = audience {
            self.validation.set_audience(&[audience]);
            self.validation.validate_aud = true;
        }
        self
    }

    /// Verify `token` and build the principal it names.
    pub fn verify(&self, token: &str) -> AppResult<Principal> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;

        let username = claims
            .preferred_username
            .or(claims.sub)
            .ok_or(AppError::Unauthorized)?;

        Ok(Principal::from_claims(username, claims.realm_access.roles))
    }
}

/// Accept a bare base64 key as published by the realm endpoint.
fn to_pem(key: &str) -> String {
    if key.contains("-----BEGIN") {
        key.to_string()
    } else {
        format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n",
            key.trim()
        )
    }
}

/// Authentication middleware that validates bearer tokens.
///
/// Inserts the verified [`Principal`] into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)?;
    let principal = state.verifier.verify(token)?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Reject principals that lack the role held in state.
///
/// Must run after [`auth_middleware`].
pub async fn require_role(
    State(required): State<Role>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or(AppError::Unauthorized)?;

    if !principal.has_role(required) {
        warn!(
            principal = %principal.username,
            required = %required,
            "Request rejected: missing role"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}
