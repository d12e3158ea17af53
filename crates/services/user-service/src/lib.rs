//! User Service Library
//!
//! User management use cases backed by an external identity provider:
//! - `identity`: the narrow admin API boundary and its Keycloak adapter
//! - `service`: the `UserService` orchestrating provider calls
//!
//! Enable the `test-utils` feature for mocks and an in-memory provider.

pub mod identity;
pub mod service;

use std::sync::Arc;

use common::KeycloakConfig;
use tracing::info;

pub use identity::{IdentityError, IdentityProvider, IdentityResult, KeycloakAdmin};
pub use service::{UserManager, UserService};

/// Build the production user service for the configured realm.
pub fn connect(config: KeycloakConfig) -> IdentityResult<UserManager<KeycloakAdmin>> {
    let realm = config.realm.clone();
    let provider = Arc::new(KeycloakAdmin::new(config)?);
    info!(realm = %realm, "User service bound to identity provider realm");
    Ok(UserManager::new(provider, realm))
}
