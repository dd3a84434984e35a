//! Room introspection handlers: list, get.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::RoomListResponse;
use crate::app_state::AppState;
use crate::domain::{RoomCode, RoomSummary};
use crate::error::{ErrorResponse, RelayError};

/// `GET /rooms` — List occupied rooms.
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    summary = "List rooms",
    description = "Returns every room that currently holds at least one connection.",
    responses(
        (status = 200, description = "Room list", body = RoomListResponse),
    )
)]
pub async fn list_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let rooms = state.registry.list_rooms().await;
    let total = rooms.len();
    (StatusCode::OK, Json(RoomListResponse { rooms, total }))
}

/// `GET /rooms/{code}` — Get one room's occupancy.
///
/// # Errors
///
/// Returns [`RelayError::RoomNotFound`] if no room has this code.
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{code}",
    tag = "Rooms",
    summary = "Get room",
    description = "Returns which role-slots of the room are occupied.",
    params(("code" = String, Path, description = "Room code (case-sensitive)")),
    responses(
        (status = 200, description = "Room summary", body = RoomSummary),
        (status = 404, description = "Room not found", body = ErrorResponse),
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, RelayError> {
    let room_code =
        RoomCode::new(code.clone()).map_err(|_| RelayError::RoomNotFound(code.clone()))?;
    let summary = state
        .registry
        .room_summary(&room_code)
        .await
        .ok_or(RelayError::RoomNotFound(code))?;
    Ok((StatusCode::OK, Json(summary)))
}

/// Room routes, nested under `/api/v1` by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/{code}", get(get_room))
}
