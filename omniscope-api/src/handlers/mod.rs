pub mod calendar;
pub mod companies;
pub mod contacts;
pub mod meetings;
pub mod tasks;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use shared_types::ErrorResponse;

use crate::database::{InvalidOperation, RecordNotFound};

/// Handler failures, rendered as an `ErrorResponse` body.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) | ApiError::Internal(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        if e.downcast_ref::<RecordNotFound>().is_some() {
            ApiError::NotFound(e.to_string())
        } else if e.downcast_ref::<InvalidOperation>().is_some() {
            ApiError::Validation(e.to_string())
        } else {
            tracing::error!("Request failed: {:#}", e);
            ApiError::Internal(e.to_string())
        }
    }
}

/// Rejects names and titles that are empty after trimming.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[actix_web::test]
    async fn test_not_found_maps_to_404_with_error_body() {
        let error = ApiError::from(crate::database::not_found("Contact", 7));
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "Contact 7 not found");
    }

    #[test]
    fn test_invalid_operation_is_bad_request() {
        let error = ApiError::from(crate::database::invalid_operation("no".to_string()));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let error = ApiError::from(anyhow::anyhow!("disk full"));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_require_text_rejects_whitespace() {
        assert!(require_text("Name", "  ").is_err());
        assert!(require_text("Name", "Jake").is_ok());
    }
}
