//! Group API endpoints

use api_types::group::{GroupDetail, GroupNew, GroupView, UserGroupView, UserGroupsResponse};
use api_types::membership::MemberView;
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{ServerError, memberships::role_view, server::ServerState, user};

/// Handle requests for creating a new group. The requester becomes its
/// admin.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<Json<GroupView>, ServerError> {
    let group_id = state
        .engine
        .new_group(&payload.name, &payload.email, &user.username)
        .await?;

    Ok(Json(GroupView {
        id: group_id,
        name: payload.name,
        email: payload.email,
    }))
}

/// A group with its member list.
pub async fn get(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupDetail>, ServerError> {
    let group = state.engine.group_by_id(&group_id).await?;
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

    Ok(Json(GroupDetail {
        id: group.id,
        name: group.name,
        email: group.email,
        members,
    }))
}

/// The requester's groups, with the role held on each.
pub async fn list_for_user(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<UserGroupsResponse>, ServerError> {
    let groups = state
        .engine
        .list_groups_for_user(&user.username)
        .await?
        .into_iter()
        .map(|(group, role)| UserGroupView {
            group: GroupView {
                id: group.id,
                name: group.name,
                email: group.email,
            },
            role: role_view(role),
        })
        .collect();

    Ok(Json(UserGroupsResponse { groups }))
}
