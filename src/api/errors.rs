use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::services::language::Language;

/// Which pipeline a failed request went through; picks the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanType {
    Workout,
    Nutrition,
    ExerciseSwap,
}

impl PlanType {
    pub fn failure_message(self, language: Language) -> &'static str {
        match (self, language) {
            (PlanType::Workout | PlanType::ExerciseSwap, Language::En) => {
                "Failed to generate workout plan"
            }
            (PlanType::Workout | PlanType::ExerciseSwap, Language::Pt) => {
                "Falha ao gerar o plano de treino"
            }
            (PlanType::Nutrition, Language::En) => "Failed to generate meal plan",
            (PlanType::Nutrition, Language::Pt) => "Falha ao gerar o plano alimentar",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Generation {
        message: &'static str,
        details: Option<String>,
    },
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Forbidden - Invalid origin")]
    ForbiddenOrigin,
}

impl ApiError {
    /// `details` carries the underlying error and is only filled outside production.
    pub fn generation(
        plan_type: PlanType,
        language: Language,
        error: &impl std::fmt::Display,
        expose_details: bool,
    ) -> Self {
        ApiError::Generation {
            message: plan_type.failure_message(language),
            details: expose_details.then(|| error.to_string()),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Generation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ForbiddenOrigin => StatusCode::FORBIDDEN,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            details: match self {
                ApiError::Generation { details, .. } => details,
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn render(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generation_error_body() {
        let (status, body) = render(ApiError::generation(
            PlanType::Nutrition,
            Language::Pt,
            &"upstream timed out",
            true,
        ))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Falha ao gerar o plano alimentar", "details": "upstream timed out"})
        );
    }

    #[tokio::test]
    async fn test_details_hidden_in_production() {
        let (_, body) = render(ApiError::generation(
            PlanType::ExerciseSwap,
            Language::En,
            &"boom",
            false,
        ))
        .await;

        assert_eq!(body, json!({"error": "Failed to generate workout plan"}));
    }

    #[tokio::test]
    async fn test_fixed_errors() {
        assert_eq!(
            render(ApiError::MethodNotAllowed).await,
            (StatusCode::METHOD_NOT_ALLOWED, json!({"error": "Method not allowed"}))
        );
        assert_eq!(
            render(ApiError::ForbiddenOrigin).await,
            (StatusCode::FORBIDDEN, json!({"error": "Forbidden - Invalid origin"}))
        );
    }
}
