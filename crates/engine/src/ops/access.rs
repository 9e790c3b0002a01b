use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, MembershipRole, ResultEngine, groups, memberships, shifts, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_group_by_id(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    pub(super) async fn membership_role_tx(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Option<MembershipRole>> {
        let row = memberships::Entity::find_by_id((group_id.to_string(), user_id.to_string()))
            .one(db)
            .await?;
        row.as_ref()
            .map(|m| MembershipRole::try_from(m.role.as_str()))
            .transpose()
    }

    /// Admin gate for every mutating group operation. The group must exist
    /// and the requester must hold the admin role on it.
    pub(super) async fn require_group_admin(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let model = self.require_group_by_id(db, group_id).await?;
        let role = self.membership_role_tx(db, group_id, user_id).await?;
        if !role.is_some_and(MembershipRole::is_admin) {
            return Err(EngineError::Forbidden(
                "admin role required".to_string(),
            ));
        }
        Ok(model)
    }

    pub(super) async fn require_group_member(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = memberships::Entity::find_by_id((group_id.to_string(), username.to_string()))
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("membership not exists".to_string()));
        }
        Ok(())
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    pub(super) async fn require_shift_in_group(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        shift_id: Uuid,
    ) -> ResultEngine<shifts::Model> {
        shifts::Entity::find_by_id(shift_id.to_string())
            .filter(shifts::Column::GroupId.eq(group_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("shift not exists".to_string()))
    }
}
