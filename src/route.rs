//! Route definitions for the public profile API

use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::database::AppState;
use crate::handler::{
    get_my_profile, get_or_create_public_profile, get_public_profile_by_token,
    get_public_profile_by_user, health, toggle_public_profile, update_my_profile,
};
use crate::middleware::auth_middleware;

/// Creates the application router
///
/// # Route Definitions
///
/// - `POST /profiles/public` - Get or create the caller's public profile (auth)
/// - `POST /profiles/public/toggle` - Change visibility (auth)
/// - `GET /profiles/me` / `PUT /profiles/me` - Read or edit the caller's profile (auth)
/// - `GET /profiles/public/user/{user_id}` - Public view by user id
/// - `GET /profiles/public/share/{share_token}` - Public view by share token
/// - `GET /health` - Liveness check
///
/// # Example Usage
///
/// ```no_run
/// # use profile_share::auth::JwtKeys;
/// # use profile_share::database::{init_db, AppState};
/// # use profile_share::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// let state = AppState::new(db, JwtKeys::new("secret", 24));
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/profiles/public", post(get_or_create_public_profile))
        .route("/profiles/public/toggle", post(toggle_public_profile))
        .route("/profiles/me", get(get_my_profile).put(update_my_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/profiles/public/user/{user_id}", get(get_public_profile_by_user))
        .route("/profiles/public/share/{share_token}", get(get_public_profile_by_token))
        .route("/health", get(health))
        .merge(authenticated)
        .with_state(state)
}
