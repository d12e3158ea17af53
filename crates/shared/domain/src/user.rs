//! User request, provider representation and read projection.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::constants::CREDENTIAL_TYPE_PASSWORD;
use crate::error::{DomainError, DomainResult};

/// Reject empty and whitespace-only values.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some(Cow::Borrowed("must not be blank"));
        return Err(error);
    }
    Ok(())
}

/// User creation request.
///
/// Missing fields deserialize as empty strings so that every violation is
/// reported by validation rather than by the JSON decoder.
#[derive(Clone, Default, Deserialize, Serialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct UserRequest {
    /// Login name in the realm
    #[validate(
        custom(function = "not_blank"),
        length(
            min = 2,
            max = 30,
            message = "Username should be between 2 and 30 characters long"
        )
    )]
    #[cfg_attr(feature = "openapi", schema(example = "yuri"))]
    pub username: String,

    /// Contact email address
    #[validate(custom(function = "not_blank"), email(message = "Email should be valid"))]
    #[cfg_attr(feature = "openapi", schema(example = "yuri@mail.com"))]
    pub email: String,

    /// Initial password
    #[validate(
        custom(function = "not_blank"),
        length(
            min = 4,
            message = "Password should be at least 4 characters long"
        )
    )]
    #[cfg_attr(feature = "openapi", schema(example = "12345"))]
    pub password: String,

    /// Given name
    #[serde(rename = "firstName")]
    #[validate(custom(function = "not_blank"))]
    #[cfg_attr(feature = "openapi", schema(example = "Yuri"))]
    pub first_name: String,

    /// Family name
    #[serde(rename = "lastName")]
    #[validate(custom(function = "not_blank"))]
    #[cfg_attr(feature = "openapi", schema(example = "Yuriev"))]
    pub last_name: String,
}

impl UserRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl std::fmt::Debug for UserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Credential attached to a representation on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRepresentation {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub temporary: bool,
}

impl CredentialRepresentation {
    /// Non-temporary password credential
    pub fn password(value: impl Into<String>) -> Self {
        Self {
            kind: CREDENTIAL_TYPE_PASSWORD.to_string(),
            value: value.into(),
            temporary: false,
        }
    }
}

/// The identity provider's serialized form of a user record.
///
/// Every field is optional: the provider omits what it does not return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRepresentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    /// Creation time in epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<CredentialRepresentation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm_roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl From<&UserRequest> for UserRepresentation {
    fn from(request: &UserRequest) -> Self {
        Self {
            username: Some(request.username.clone()),
            email: Some(request.email.clone()),
            first_name: Some(request.first_name.clone()),
            last_name: Some(request.last_name.clone()),
            enabled: Some(true),
            email_verified: Some(false),
            credentials: Some(vec![CredentialRepresentation::password(
                request.password.clone(),
            )]),
            ..Self::default()
        }
    }
}

impl From<UserRequest> for UserRepresentation {
    fn from(request: UserRequest) -> Self {
        UserRepresentation::from(&request)
    }
}

/// User read projection returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Provider-assigned user identifier
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Realm roles carried on the representation, if any.
    ///
    /// The admin API's single-user and list reads do not include realm role
    /// mappings, so this is normally empty and is not an authoritative list
    /// of the user's roles.
    pub roles: Vec<String>,
    /// Groups reported by the provider
    pub groups: Vec<String>,
    /// Account creation time, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRepresentation> for UserResponse {
    type Error = DomainError;

    fn try_from(representation: UserRepresentation) -> DomainResult<Self> {
        let raw_id = representation
            .id
            .ok_or_else(|| DomainError::invalid_representation("user id is missing"))?;
        let id = Uuid::parse_str(&raw_id).map_err(|_| {
            DomainError::invalid_representation(format!("user id '{}' is not a UUID", raw_id))
        })?;

        let created_at = match representation.created_timestamp {
            Some(millis) => Some(DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(
                || DomainError::invalid_representation("createdTimestamp is out of range"),
            )?),
            None => None,
        };

        Ok(Self {
            id,
            username: representation.username.unwrap_or_default(),
            email: representation.email.unwrap_or_default(),
            first_name: representation.first_name.unwrap_or_default(),
            last_name: representation.last_name.unwrap_or_default(),
            roles: representation.realm_roles.unwrap_or_default(),
            groups: representation.groups.unwrap_or_default(),
            created_at,
        })
    }
}
