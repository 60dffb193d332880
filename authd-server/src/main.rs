mod api;
mod config;
mod context;
mod credentials;
mod errors;
mod grants;
mod interceptor;
mod openapi;
mod policy;
mod state;
#[cfg(test)]
mod test_utils;
mod token;

use crate::state::AppState;
use axum::Router;
use identity::{
    hash_password, scope_set, ClientRecord, HashError, InMemoryClientDirectory,
    InMemoryUserDirectory, Scope, UserRecord,
};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Load configuration
    let config = match config::AuthdConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Seed the demo identity records
    let (clients, users) = match seed_directories() {
        Ok(directories) => directories,
        Err(e) => {
            error!("Failed to seed identity directories: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize application state
    let port = config.port;
    let state = AppState::new(config, clients, users);

    // Create application
    let app = create_app(state);

    // Build server address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    // Start server
    let server = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Start the server and wait for it to finish
    info!("Server running on {}, press Ctrl+C to stop", addr);
    let serve = axum::serve(server, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = serve {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Create a new application instance with a given state
pub fn create_app(state: AppState) -> Router {
    // Create OpenAPI documentation
    let (openapi_router, api_doc) =
        OpenApiRouter::with_openapi(openapi::ApiDoc::openapi()).split_for_parts();

    // Create base router with routes
    Router::new()
        .merge(api::router(&state))
        .merge(openapi_router)
        .merge(Scalar::with_url("/scalar", api_doc.clone()))
        .with_state(state)
}

/// Seed the identity records the demo deployment ships with: one client that
/// may create and authorize users, and one user whose tokens can read
/// profiles.
fn seed_directories(
) -> Result<(Arc<InMemoryClientDirectory>, Arc<InMemoryUserDirectory>), HashError> {
    let clients = Arc::new(InMemoryClientDirectory::new());
    clients.register(
        "client",
        ClientRecord {
            secret: "password".to_string(),
            scopes: scope_set([Scope::UserCreation, Scope::UserAuthorize]),
        },
    );

    let users = Arc::new(InMemoryUserDirectory::new());
    users.register(
        "amy",
        UserRecord {
            password_hash: hash_password("password")?,
            scopes: scope_set([Scope::UserProfile]),
        },
    );

    Ok((clients, users))
}

// Simple signal handler that works on all platforms
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
