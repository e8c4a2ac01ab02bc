//! Application entry point and server initialization

use axum::http::{header, HeaderValue, Method};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use profile_share::auth::JwtKeys;
use profile_share::config::Config;
use profile_share::database::{init_db, AppState};
use profile_share::route::create_app;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("profile_share=debug,tower_http=debug")),
        )
        .init();

    let config = Config::load().expect("Environment misconfigured");

    let db = init_db(&config.database_url).expect("Failed to initialize database");
    let keys = JwtKeys::new(&config.jwt_secret, config.jwt_expiration_hours);
    let state = AppState::new(db, keys);

    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .expect("CORS_ORIGIN is not a valid header value");
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let app = create_app(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");

    info!(port = config.port, database = %config.database_url, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolves on SIGINT or SIGTERM so open requests and write transactions can finish
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
