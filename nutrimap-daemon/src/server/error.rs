//! Error responses.
//!
//! Every failure is returned as `{"detail": "<message>"}` with a status
//! matching the error class.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nutrimap_core::NutritionError;

use crate::mapping::MappingError;

/// Detail sent for unknown ingredient ids.
pub const NOT_FOUND_DETAIL: &str = "Ingredient not found in nutrition_data";

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// 400
    BadRequest(String),
    /// 404
    NotFound(String),
    /// 500
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(d) | ApiError::NotFound(d) | ApiError::Internal(d) => d,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("Request failed: {}", detail);
        }
        let status = self.status();
        (status, Json(serde_json::json!({ "detail": self.detail() }))).into_response()
    }
}

impl From<NutritionError> for ApiError {
    fn from(err: NutritionError) -> Self {
        match err {
            NutritionError::NotFound(_) => ApiError::NotFound(NOT_FOUND_DETAIL.to_string()),
            NutritionError::InvalidInput(message) => ApiError::BadRequest(message),
        }
    }
}

impl From<MappingError> for ApiError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::InvalidInput(message) => ApiError::BadRequest(message),
            MappingError::Upstream(e) => ApiError::Internal(e.to_string()),
        }
    }
}
