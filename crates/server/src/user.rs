//! User profile endpoints, plus the users entity the auth middleware reads.

use api_types::shift::ShiftView;
use api_types::user::{MeResponse, UserFind, UserUpdate, UserView};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use sea_orm::entity::prelude::*;

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Current user plus their assigned shifts.
pub async fn me(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
) -> Result<Json<MeResponse>, ServerError> {
    let shifts = state
        .engine
        .shifts_for_user(&user.username)
        .await?
        .into_iter()
        .map(|shift| ShiftView {
            id: shift.id,
            group_id: shift.group_id,
            start_at: shift.start_at.fixed_offset(),
            end_at: shift.end_at.fixed_offset(),
        })
        .collect();

    Ok(Json(MeResponse {
        user: UserView {
            username: user.username,
            name: user.name,
            email: user.email,
        },
        shifts,
    }))
}

/// Exact-match lookup by email, for the "find member" search. An unknown
/// address is an expected outcome and surfaces as a plain 404 body.
pub async fn find(
    State(state): State<ServerState>,
    Query(query): Query<UserFind>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .user_by_email(&query.email)
        .await?
        .ok_or_else(|| {
            ServerError::Engine(engine::EngineError::KeyNotFound("user not exists".to_string()))
        })?;

    Ok(Json(UserView {
        username: user.username,
        name: user.name,
        email: user.email,
    }))
}

/// Updates the requester's own profile fields.
pub async fn update(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
    Json(payload): Json<UserUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_user(&user.username, payload.name.as_deref(), &payload.email)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
