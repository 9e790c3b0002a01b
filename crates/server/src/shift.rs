//! Shift API endpoints

use api_types::shift::{ShiftAssign, ShiftCreated, ShiftDetail, ShiftNew, ShiftsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

/// All shifts of a group with their assignees. Date filtering happens in
/// the calendar projection, not here.
pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<ShiftsResponse>, ServerError> {
    let shifts = state
        .engine
        .list_shifts(&group_id)
        .await?
        .into_iter()
        .map(|(shift, assignees)| ShiftDetail {
            id: shift.id,
            group_id: shift.group_id,
            start_at: shift.start_at.fixed_offset(),
            end_at: shift.end_at.fixed_offset(),
            assignees,
        })
        .collect();

    Ok(Json(ShiftsResponse { shifts }))
}

/// Handle requests for creating a new shift (admin-only).
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<ShiftNew>,
) -> Result<Json<ShiftCreated>, ServerError> {
    let shift_id = state
        .engine
        .new_shift(
            &group_id,
            payload.start_at.with_timezone(&Utc),
            payload.end_at.with_timezone(&Utc),
            &user.username,
        )
        .await?;

    Ok(Json(ShiftCreated { id: shift_id }))
}

/// Attaches a group member to a shift (admin-only, idempotent).
pub async fn assign(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((group_id, shift_id)): Path<(String, Uuid)>,
    Json(payload): Json<ShiftAssign>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .assign_shift(&group_id, shift_id, &payload.username, &user.username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
