use std::{any::Any, net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Json, Router,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
};

use crate::{
    api::{self, AppState},
    config, error, info,
    types::PkceToken,
    warning,
};

/// Routes of the public backend.
pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(api::home))
        .route("/health", get(api::health))
        .route("/generate-playlist", post(api::generate_playlist))
        .route("/me", post(api::profile))
        .route("/callback", post(api::callback))
        .layer(Extension(state));

    with_service_layers(routes)
}

/// Wraps routes in permissive CORS and turns handler panics into a 500 JSON body.
pub fn with_service_layers(routes: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    warning!("Handler panicked: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error", "details": details })),
    )
        .into_response()
}

fn bind_addr() -> SocketAddr {
    match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    }
}

async fn serve(app: Router) {
    let addr = bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server stopped: {}", e);
    }
}

pub async fn start_api_server(state: Arc<AppState>) {
    serve(router(state)).await;
}

/// Temporary server receiving the OAuth redirect during `auth`.
pub async fn start_login_server(state: Arc<Mutex<Option<PkceToken>>>) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::login_callback).layer(Extension(state)));

    serve(app).await;
}
