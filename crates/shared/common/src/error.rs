//! Unified error handling for the HTTP layer.
//!
//! Every fault raised while serving a request ends up in [`AppError`] and is
//! turned into a response by [`handle_exception`]. Faults that declare their
//! own status (`BackendResources`) are echoed verbatim: status as declared,
//! body exactly the message.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use thiserror::Error;
use validator::ValidationErrors;

/// Field name to first violation message.
pub type FieldErrors = BTreeMap<String, String>;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    /// Application-declared fault carrying its own HTTP status
    #[error("{message}")]
    BackendResources { message: String, status: StatusCode },

    #[cfg(feature = "jwt")]
    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            #[cfg(feature = "jwt")]
            AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::BackendResources { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::BackendResources { message, status } => {
                if status.is_server_error() {
                    tracing::error!(status = %status, "Backend resources error: {}", message);
                } else {
                    tracing::warn!(status = %status, "Backend resources error: {}", message);
                }
                message.clone()
            }
            AppError::BadRequest(msg) => msg.clone(),

            // Hide details for internal/security errors
            #[cfg(feature = "jwt")]
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

/// Translate a fault into its HTTP response.
///
/// Validation failures carry a JSON object of field violations; every other
/// fault carries its message as the entire plain-text body.
pub fn handle_exception(err: AppError) -> Response {
    let status = err.status();
    match err {
        AppError::Validation(fields) => (status, Json(fields)).into_response(),
        other => (status, other.user_message()).into_response(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_exception(self)
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (camel_case(&field), message)
            })
            .collect();

        AppError::Validation(fields)
    }
}

/// Field keys follow the JSON body, which is camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidRepresentation(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn backend_resources(message: impl Into<String>, status: StatusCode) -> Self {
        AppError::BackendResources {
            message: message.into(),
            status,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
