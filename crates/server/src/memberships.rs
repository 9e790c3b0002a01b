//! Membership endpoints. Mutations are admin-gated in the engine, not here.

use api_types::group::PermissionResponse;
use api_types::membership::{MemberAdd, MemberView, MembersResponse, MembershipRole};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

pub(crate) fn role_view(role: engine::MembershipRole) -> MembershipRole {
    match role {
        engine::MembershipRole::Admin => MembershipRole::Admin,
        engine::MembershipRole::User => MembershipRole::User,
    }
}

/// The requester's role on a group, or `null` without a membership.
pub async fn permission(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<PermissionResponse>, ServerError> {
    let role = state
        .engine
        .membership_role(&group_id, &user.username)
        .await?;

    Ok(Json(PermissionResponse {
        role: role.map(role_view),
    }))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .engine
        .list_group_members(&group_id)
        .await?
        .into_iter()
        .map(|(member, role)| MemberView {
            username: member.username,
            name: member.name,
            email: member.email,
            role: role_view(role),
        })
        .collect();

    Ok(Json(MembersResponse { members }))
}

pub async fn add(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<MemberAdd>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .add_member(&group_id, &payload.username, &user.username)
        .await?;
    Ok(StatusCode::CREATED)
}
