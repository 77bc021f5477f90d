//! Slot endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;

use timetable_core::config::DeletePolicy;
use timetable_core::{NewSlot, Slot, SlotPatch};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/slots", get(list_all).post(create_slot))
        .route("/api/slots/", get(list_all).post(create_slot))
        // `{key}` is a user id for GET and a slot id for PUT/DELETE
        .route(
            "/api/slots/{key}",
            get(list_by_user).put(update_slot).delete(delete_slot),
        )
}

/// Response from deleting a slot
#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/slots/ - List every slot
async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Slot>>, AppError> {
    Ok(Json(state.store.list_all()?))
}

/// GET /api/slots/:userId - List one user's slots
async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Slot>>, AppError> {
    Ok(Json(state.store.list_by_user(&user_id)?))
}

/// POST /api/slots/ - Create a slot
async fn create_slot(
    State(state): State<AppState>,
    Json(mut new): Json<NewSlot>,
) -> Result<Json<Slot>, AppError> {
    new.resolve_end_time();
    let slot = state.store.create(new)?;

    tracing::info!(id = %slot.id, day = %slot.day, "slot created");
    Ok(Json(slot))
}

/// PUT /api/slots/:id - Overwrite fields of a slot
async fn update_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SlotPatch>,
) -> Result<Json<Slot>, AppError> {
    let slot = state.store.update(&id, patch)?;

    tracing::info!(id = %slot.id, "slot updated");
    Ok(Json(slot))
}

/// DELETE /api/slots/:id - Remove a slot
async fn delete_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let existed = state.store.delete(&id)?;

    if !existed && state.delete_policy == DeletePolicy::ReportMissing {
        return Err(AppError::not_found(format!("Slot not found: {}", id)));
    }

    tracing::info!(id = %id, existed, "slot deleted");
    Ok(Json(DeleteResponse { success: true }))
}
