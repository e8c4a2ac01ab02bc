//! HTTP request handlers for the public profile API
//!
//! Authenticated handlers receive the caller through the [`AuthUser`]
//! extension set by the auth middleware; public handlers take the lookup key
//! from the path.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::auth::AuthUser;
use crate::database::AppState;
use crate::error::AppError;
use crate::model::{ProfileUpdate, ToggleRequest};

/// Returns the caller's public profile, creating it on first call
///
/// # Response
///
/// - **201 Created** - a new public profile with a fresh share token
/// - **200 OK** - the existing public profile
/// - **401 Unauthorized** - missing or invalid bearer token
pub async fn get_or_create_public_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let (record, created) = state.service.get_or_create(&user.user_id)?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(record)))
}

/// Turns public visibility on or off
///
/// # Request Body
///
/// ```json
/// { "isActive": false }
/// ```
///
/// # Response
///
/// - **200 OK** - the updated public profile
/// - **404 Not Found** - the caller never created a public profile
pub async fn toggle_public_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ToggleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.service.toggle(&user.user_id, payload.is_active)?;
    Ok(Json(record))
}

/// Public profile by share token, counting one view
///
/// Unknown and inactive tokens both answer **404 Not Found** with the same body.
pub async fn get_public_profile_by_token(
    Path(share_token): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.service.get_by_token(&share_token)?;
    Ok(Json(view))
}

/// Public profile by user id, counting one view
pub async fn get_public_profile_by_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.service.get_by_user_id(&user_id)?;
    Ok(Json(view))
}

/// Returns the caller's profile snapshot
///
/// # Response
///
/// - **200 OK** - the profile
/// - **404 Not Found** - the caller has no profile yet
/// - **401 Unauthorized** - missing or invalid bearer token
pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.service.get_profile(&user.user_id)?;
    Ok(Json(profile))
}

/// Creates or partially updates the caller's profile
///
/// Fields absent from the body keep their current value.
///
/// # Request Body
///
/// ```json
/// { "title": "Data Analyst", "city": "Hanoi" }
/// ```
///
/// # Response
///
/// - **200 OK** - the stored profile after the update
/// - **401 Unauthorized** - missing or invalid bearer token
pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.service.update_profile(&user.user_id, payload)?;
    Ok(Json(profile))
}

/// Liveness check
///
/// # Response
///
/// - **200 OK** - `{ "status": "ok" }`
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
