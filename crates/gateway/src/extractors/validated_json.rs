//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;

/// JSON extractor that validates the payload before the handler runs.
///
/// A body that is not JSON is a `400` with the parser's message; a body
/// that fails validation is a `400` carrying every offending field.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use domain::UserRequest;

    use super::*;

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let body = r#"{"username":"yuri","email":"yuri@mail.com","password":"12345","firstName":"Yuri","lastName":"Yuriev"}"#;

        let ValidatedJson(request) =
            ValidatedJson::<UserRequest>::from_request(json_request(body), &())
                .await
                .unwrap();

        assert_eq!(request.username, "yuri");
        assert_eq!(request.last_name, "Yuriev");
    }

    #[tokio::test]
    async fn test_invalid_payload_reports_every_field() {
        let result = ValidatedJson::<UserRequest>::from_request(json_request("{}"), &()).await;

        match result {
            Err(AppError::Validation(fields)) => {
                assert_eq!(fields.len(), 5);
                assert!(fields.contains_key("firstName"));
                assert!(fields.contains_key("lastName"));
                assert!(!fields.contains_key("first_name"));
            }
            _ => panic!("expected validation error"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let result =
            ValidatedJson::<UserRequest>::from_request(json_request("{\"username\":"), &()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
