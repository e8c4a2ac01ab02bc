use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid or missing authorization header")]
    Unauthorized,

    /// Unknown and inactive public profiles share this variant so callers
    /// cannot tell which tokens exist.
    #[error("Public profile not found")]
    PublicProfileNotFound,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::PublicProfileNotFound | AppError::ProfileNotFound => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            AppError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Store(err) => {
                tracing::error!(error = %err, "storage failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
