//! Identity provider admin API boundary.
//!
//! The service depends on exactly this shape of the provider:
//! realm → users collection → create / get / list, and a single user
//! resource that can be read back as a representation. Resource handles are
//! cheap to build; only the `async` methods touch the network.

mod keycloak;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

use async_trait::async_trait;
use http::StatusCode;
use thiserror::Error;

use common::AppError;
use domain::UserRepresentation;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use keycloak::KeycloakAdmin;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryIdentityProvider;

/// Faults reported by the identity provider or on the way to it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("user not found")]
    NotFound,

    #[error("identity provider rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("identity provider unreachable: {0}")]
    Transport(String),

    #[error("unexpected identity provider response: {0}")]
    Decode(String),
}

/// Result type alias for provider calls
pub type IdentityResult<T> = Result<T, IdentityError>;

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            IdentityError::Decode(err.to_string())
        } else {
            IdentityError::Transport(err.to_string())
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound => AppError::NotFound,
            // The admin client's own credentials were refused; not the caller's fault.
            IdentityError::Rejected { status, message }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                tracing::error!(status = %status, "Identity provider refused admin credentials: {}", message);
                AppError::backend_resources(
                    "Identity provider refused the admin credentials",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
            IdentityError::Rejected { status, message } => {
                AppError::backend_resources(message, status)
            }
            IdentityError::Transport(msg) => {
                tracing::error!("Identity provider transport error: {}", msg);
                AppError::backend_resources(
                    "Identity provider is unavailable",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
            IdentityError::Decode(msg) => AppError::internal(msg),
        }
    }
}

/// Entry point of the provider's admin client.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the realm named `name`
    fn realm(&self, name: &str) -> Box<dyn RealmResource>;
}

/// A named tenant within the provider.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait RealmResource: Send + Sync {
    /// Users collection of this realm
    fn users(&self) -> Box<dyn UsersResource>;
}

/// The users collection of a realm.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UsersResource: Send + Sync {
    /// Submit a new user; returns the provider's HTTP status on success
    async fn create(&self, representation: UserRepresentation) -> IdentityResult<StatusCode>;

    /// Resource handle for the user with provider id `id`
    fn get(&self, id: &str) -> Box<dyn UserResource>;

    /// Page through the realm's users
    async fn list(&self, first: u32, max: u32) -> IdentityResult<Vec<UserRepresentation>>;
}

/// A single user within a realm.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserResource: Send + Sync {
    /// Fetch the user's current representation
    async fn to_representation(&self) -> IdentityResult<UserRepresentation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(AppError::from(IdentityError::NotFound).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_rejection_passes_status_and_message_through() {
        let error = AppError::from(IdentityError::Rejected {
            status: StatusCode::CONFLICT,
            message: "User exists with same username".to_string(),
        });

        assert_eq!(error.status(), StatusCode::CONFLICT);
        assert_eq!(error.user_message(), "User exists with same username");
    }

    #[test]
    fn test_admin_credential_rejection_is_server_error() {
        let error = AppError::from(IdentityError::Rejected {
            status: StatusCode::UNAUTHORIZED,
            message: "invalid_client".to_string(),
        });

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_transport_error_is_server_error() {
        let error = AppError::from(IdentityError::Transport("connection refused".to_string()));

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.user_message(), "Identity provider is unavailable");
    }
}
