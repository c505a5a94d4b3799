use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::screening::error::ScreeningError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Screening(#[from] ScreeningError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Screening(err) => {
                tracing::error!("Screening error: {err}");
                match err {
                    ScreeningError::ExtractionValidation(_) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "EXTRACTION_INVALID",
                        err.to_string(),
                    ),
                    ScreeningError::ExtractionProvider(_) => (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_ERROR",
                        "The extraction provider is unavailable".to_string(),
                    ),
                    ScreeningError::AllProvidersFailed { .. } => (
                        StatusCode::BAD_GATEWAY,
                        "ALL_PROVIDERS_FAILED",
                        err.to_string(),
                    ),
                }
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("bad input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_all_providers_failed_maps_to_502() {
        let err = AppError::Screening(ScreeningError::AllProvidersFailed {
            openai: "a".to_string(),
            gemini: "b".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_extraction_validation_maps_to_422() {
        use crate::screening::schema::ValidationError;
        let err = AppError::Screening(ScreeningError::ExtractionValidation(
            ValidationError::new(vec!["experiences[0].start: missing".to_string()]),
        ));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
