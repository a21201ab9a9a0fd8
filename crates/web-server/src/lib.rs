use crate::error::AppError;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use configuration::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    /// The CSV the KPI endpoints read and the upload endpoint replaces.
    pub csv_path: PathBuf,
    /// When set, every data endpoint requires a matching `X-API-Key`.
    pub api_key: Option<String>,
}

/// Builds the application router with all routes and layers attached.
///
/// The auth layer covers only the routes registered before it; /api/health
/// stays open so probes work without the key.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/kpi", get(handlers::get_kpi))
        .route("/api/series", get(handlers::get_series))
        .route("/api/upload", post(handlers::upload_csv))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_api_key,
        ))
        .route("/api/health", get(handlers::health))
        .with_state(app_state)
        .layer(cors)
        // Logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 10)) // 10MB upload cap
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, config: Config) -> anyhow::Result<()> {
    let app_state = Arc::new(AppState {
        csv_path: config.data.csv_path.clone(),
        api_key: configuration::api_key_from_env(),
    });
    if app_state.api_key.is_some() {
        tracing::info!("API key auth enabled for data endpoints");
    }

    let app = router(app_state);

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rejects requests missing the configured API key. A no-op when no key is
/// configured.
async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = &state.api_key {
        let provided = request
            .headers()
            .get("x-api-key")
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Err(AppError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}
