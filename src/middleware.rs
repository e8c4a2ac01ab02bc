use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::database::AppState;
use crate::error::AppError;

/// Middleware requiring a valid `Authorization: Bearer <jwt>` header
///
/// On success the verified [`AuthUser`](crate::auth::AuthUser) is stored in
/// the request extensions for handlers to pick up with `Extension`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let user = state.keys.verify(token).map_err(|err| {
        tracing::debug!(error = %err, "rejected bearer token");
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
