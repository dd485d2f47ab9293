use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use axum::middleware;
use axum::{
    Router,
    extract::{Request, State},
    response::Response,
};
use http::{HeaderName, HeaderValue, header};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::api::state::AppState;
use crate::core::{PushConfig, init_tracing};

type SharedState = Arc<RwLock<AppState>>;

async fn set_static_headers(
    State(state): State<SharedState>,
    request: Request,
    next: middleware::Next,
) -> Response {
    let path = request.uri().path().to_string();
    let worker_path = state
        .read()
        .map(|s| s.config.worker_script_path.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    if path.starts_with("/static/") {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }
    // Lets a worker served from /static control the whole site
    if path == worker_path {
        response
            .headers_mut()
            .insert(
                HeaderName::from_static("service-worker-allowed"),
                HeaderValue::from_static("/"),
            );
    }
    response
}

pub fn app(shared_state: SharedState) -> Result<Router> {
    let static_dir = shared_state
        .read()
        .map_err(|e| anyhow!("{}", e))?
        .config
        .static_dir
        .clone();
    let cors = CorsLayer::permissive();

    Ok(Router::new()
        .merge(routes::router())
        // Worker script, page loader, wasm bundle and icons
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&shared_state),
            set_static_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state)))
}

// Run the dev server
pub async fn serve(host: String, port: String, config: PushConfig) -> Result<()> {
    init_tracing();

    let shared_state = Arc::new(RwLock::new(AppState::new(config)));
    let app = app(Arc::clone(&shared_state))?;

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
