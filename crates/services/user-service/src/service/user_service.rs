//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only. All user state lives in
//! the identity provider; this layer resolves the configured realm, delegates
//! and maps provider outcomes into [`AppError`].

use async_trait::async_trait;
use http::StatusCode;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Principal, UserRepresentation, UserRequest, UserResponse};

use crate::identity::{IdentityError, IdentityProvider, UsersResource};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
///
/// The acting principal is passed explicitly to every operation.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user in the configured realm from an already validated request
    async fn create_user(&self, principal: &Principal, request: UserRequest) -> AppResult<()>;

    /// Fetch a single user by provider id
    async fn get_user_by_id(&self, principal: &Principal, id: Uuid) -> AppResult<UserResponse>;

    /// List a page of users
    async fn list_users(
        &self,
        principal: &Principal,
        first: u32,
        max: u32,
    ) -> AppResult<Vec<UserResponse>>;
}

/// Concrete implementation of UserService backed by an identity provider.
pub struct UserManager<P: IdentityProvider> {
    provider: Arc<P>,
    realm: String,
}

impl<P: IdentityProvider> UserManager<P> {
    /// Create new user service instance bound to `realm`
    pub fn new(provider: Arc<P>, realm: impl Into<String>) -> Self {
        Self {
            provider,
            realm: realm.into(),
        }
    }

    fn users(&self) -> Box<dyn UsersResource> {
        self.provider.realm(&self.realm).users()
    }
}

#[async_trait]
impl<P: IdentityProvider> UserService for UserManager<P> {
    async fn create_user(&self, principal: &Principal, request: UserRequest) -> AppResult<()> {
        info!(
            actor = %principal.username,
            username = %request.username,
            realm = %self.realm,
            "Creating user"
        );

        let representation = UserRepresentation::from(request);
        match self.users().create(representation).await {
            Ok(StatusCode::CREATED) => Ok(()),
            Ok(status) => {
                warn!(status = %status, "Identity provider answered user creation without 201");
                Err(AppError::backend_resources(
                    format!("Unexpected identity provider status: {}", status),
                    StatusCode::INTERNAL_SERVER_ERROR,
                ))
            }
            Err(e) => {
                warn!(actor = %principal.username, "User creation failed: {}", e);
                Err(e.into())
            }
        }
    }

    async fn get_user_by_id(&self, principal: &Principal, id: Uuid) -> AppResult<UserResponse> {
        info!(actor = %principal.username, user_id = %id, realm = %self.realm, "Fetching user");

        let representation = self
            .users()
            .get(&id.to_string())
            .to_representation()
            .await
            .map_err(|e| {
                if e != IdentityError::NotFound {
                    warn!(user_id = %id, "User lookup failed: {}", e);
                }
                AppError::from(e)
            })?;

        Ok(UserResponse::try_from(representation)?)
    }

    async fn list_users(
        &self,
        principal: &Principal,
        first: u32,
        max: u32,
    ) -> AppResult<Vec<UserResponse>> {
        info!(actor = %principal.username, first, max, realm = %self.realm, "Listing users");

        self.users()
            .list(first, max)
            .await?
            .into_iter()
            .map(|representation| UserResponse::try_from(representation).map_err(AppError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::identity::{MockIdentityProvider, MockRealmResource, MockUserResource, MockUsersResource};

    const REALM: &str = "ITM";

    fn moderator() -> Principal {
        Principal::from_claims("user1", ["MODERATOR"])
    }

    fn yuri() -> UserRequest {
        UserRequest::new("yuri", "yuri@mail.com", "12345", "Yuri", "Yuriev")
    }

    /// Provider whose realm `REALM` hands out `users` exactly once.
    fn provider_with(users: MockUsersResource) -> MockIdentityProvider {
        let mut realm = MockRealmResource::new();
        realm
            .expect_users()
            .times(1)
            .return_once(move || Box::new(users));

        let mut provider = MockIdentityProvider::new();
        provider
            .expect_realm()
            .withf(|name| name == REALM)
            .times(1)
            .return_once(move |_| Box::new(realm));
        provider
    }

    fn service(provider: MockIdentityProvider) -> UserManager<MockIdentityProvider> {
        UserManager::new(Arc::new(provider), REALM)
    }

    #[tokio::test]
    async fn test_create_user_invokes_provider_once() {
        let mut users = MockUsersResource::new();
        users
            .expect_create()
            .withf(|rep| {
                rep.username.as_deref() == Some("yuri")
                    && rep.email.as_deref() == Some("yuri@mail.com")
                    && rep.first_name.as_deref() == Some("Yuri")
                    && rep.last_name.as_deref() == Some("Yuriev")
                    && rep.enabled == Some(true)
            })
            .times(1)
            .returning(|_| Ok(StatusCode::CREATED));

        let result = service(provider_with(users))
            .create_user(&moderator(), yuri())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_user_conflict_keeps_provider_status() {
        let mut users = MockUsersResource::new();
        users.expect_create().times(1).returning(|_| {
            Err(IdentityError::Rejected {
                status: StatusCode::CONFLICT,
                message: "User exists with same username".to_string(),
            })
        });

        let err = service(provider_with(users))
            .create_user(&moderator(), yuri())
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "User exists with same username");
    }

    #[tokio::test]
    async fn test_create_user_unexpected_success_status_is_server_error() {
        let mut users = MockUsersResource::new();
        users
            .expect_create()
            .times(1)
            .returning(|_| Ok(StatusCode::NO_CONTENT));

        let err = service(provider_with(users))
            .create_user(&moderator(), yuri())
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_user_by_id_success() {
        let id = Uuid::new_v4();
        let expected_id = id.to_string();

        let mut user = MockUserResource::new();
        user.expect_to_representation().times(1).returning(move || {
            Ok(UserRepresentation {
                id: Some(id.to_string()),
                username: Some("yuri".to_string()),
                email: Some("yuri@mail.com".to_string()),
                first_name: Some("Yuri".to_string()),
                last_name: Some("Yuriev".to_string()),
                ..UserRepresentation::default()
            })
        });

        let mut users = MockUsersResource::new();
        users
            .expect_get()
            .withf(move |requested| requested == expected_id.as_str())
            .times(1)
            .return_once(move |_| Box::new(user));

        let response = service(provider_with(users))
            .get_user_by_id(&moderator(), id)
            .await
            .unwrap();

        assert_eq!(response.id, id);
        assert_eq!(response.username, "yuri");
        assert_eq!(response.first_name, "Yuri");
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let mut user = MockUserResource::new();
        user.expect_to_representation()
            .returning(|| Err(IdentityError::NotFound));

        let mut users = MockUsersResource::new();
        users.expect_get().return_once(move |_| Box::new(user));

        let err = service(provider_with(users))
            .get_user_by_id(&moderator(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_get_user_by_id_empty_representation_is_server_error() {
        let mut user = MockUserResource::new();
        user.expect_to_representation()
            .returning(|| Ok(UserRepresentation::default()));

        let mut users = MockUsersResource::new();
        users.expect_get().return_once(move |_| Box::new(user));

        let err = service(provider_with(users))
            .get_user_by_id(&moderator(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_user_by_id_transport_fault_is_server_error() {
        let mut user = MockUserResource::new();
        user.expect_to_representation()
            .returning(|| Err(IdentityError::Transport("connection reset".to_string())));

        let mut users = MockUsersResource::new();
        users.expect_get().return_once(move |_| Box::new(user));

        let err = service(provider_with(users))
            .get_user_by_id(&moderator(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_users_projects_page() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];

        let mut users = MockUsersResource::new();
        users
            .expect_list()
            .with(eq(0), eq(20))
            .times(1)
            .returning(move |_, _| {
                Ok(ids
                    .iter()
                    .map(|id| UserRepresentation {
                        id: Some(id.to_string()),
                        ..UserRepresentation::default()
                    })
                    .collect())
            });

        let page = service(provider_with(users))
            .list_users(&moderator(), 0, 20)
            .await
            .unwrap();

        assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), ids.to_vec());
    }
}
