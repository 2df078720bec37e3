/**
 * Router Configuration
 *
 * # Routes
 *
 * - `GET /` - liveness text
 * - `GET /ws` - relay WebSocket
 * - `GET /api/notifications` - stored notifications for the caller
 *
 * Unknown paths fall through to a JSON 404. CORS is restricted to the
 * configured front-end origins.
 */
use axum::{
    http::{HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use crate::backend::websocket::ws_handler;

pub const ROOT_BANNER: &str = "Chatme backend is running!";

pub fn create_router(app_state: AppState, allowed_origins: &[String]) -> Router<()> {
    let router = Router::new()
        .route("/", get(|| async { ROOT_BANNER }))
        .route("/ws", get(ws_handler));

    let router = configure_api_routes(router);

    router
        .fallback(|| async { BackendError::handler(StatusCode::NOT_FOUND, "Not Found") })
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .allow_credentials(true)
}
