//! HTTP layer: REST handlers, DTOs, OpenAPI document and app composition.
//!
//! Introspection endpoints are mounted under `/api/v1`; `/health` and
//! `/stats` live at the root next to the `/ws` upgrade endpoint.

pub mod dto;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::ws::handler::ws_handler;

/// OpenAPI document for the HTTP surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "room-relay", description = "Room-based WebSocket relay"),
    paths(
        handlers::system::health_handler,
        handlers::system::stats_handler,
        handlers::rooms::list_rooms,
        handlers::rooms::get_room,
    ),
    components(schemas(
        handlers::system::HealthResponse,
        dto::StatsResponse,
        dto::RoomListResponse,
        crate::domain::RoomSummary,
        crate::service::ForwardingPolicy,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "System", description = "Health and statistics"),
        (name = "Rooms", description = "Room occupancy"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the full application: REST, `/ws`, optional static files, and
/// the tracing and CORS layers.
pub fn build_app(state: AppState, config: &RelayConfig) -> Router {
    let mut app = Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    {
        app = app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    if let Some(dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
