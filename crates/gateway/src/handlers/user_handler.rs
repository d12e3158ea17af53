//! User handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Principal, UserRequest, UserResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Paging parameters for the user listing.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Offset of the first user to return
    #[serde(default)]
    #[param(example = 0)]
    pub first: u32,
    /// Page size, between 1 and 100
    #[serde(default = "default_page_size")]
    #[param(example = 20)]
    pub max: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl ListUsersQuery {
    fn check(&self) -> AppResult<()> {
        if self.max == 0 || self.max > MAX_PAGE_SIZE {
            return Err(AppError::bad_request(format!(
                "max must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/hello", get(hello))
        .route("/:id", get(get_user))
}

/// Echo the authenticated username
#[utoipa::path(
    get,
    path = "/api/users/hello",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's username", body = String, content_type = "text/plain"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing required role")
    )
)]
pub async fn hello(Extension(principal): Extension<Principal>) -> String {
    principal.username
}

/// Create a user in the configured realm
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User created"),
        (status = 400, description = "Validation failed, one message per offending field"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing required role"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> AppResult<StatusCode> {
    state.user_service.create_user(&principal, request).await?;
    Ok(StatusCode::OK)
}

/// Get a user by provider id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing required role"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user_by_id(&principal, id).await?;
    Ok(Json(user))
}

/// List a page of users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserResponse>),
        (status = 400, description = "Invalid paging parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing required role")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    query.check()?;

    let users = state
        .user_service
        .list_users(&principal, query.first, query.max)
        .await?;
    Ok(Json(users))
}
