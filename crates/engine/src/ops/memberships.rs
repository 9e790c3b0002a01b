use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, MembershipRole, ResultEngine, memberships};

use super::{Engine, with_tx};

impl Engine {
    /// Adds a member to a group (admin-only). The new member always starts
    /// with the plain user role.
    pub async fn add_member(
        &self,
        group_id: &str,
        member_username: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group_admin(&db_tx, group_id, user_id).await?;
            self.require_user_exists(&db_tx, member_username).await?;

            let existing = memberships::Entity::find_by_id((
                group_id.to_string(),
                member_username.to_string(),
            ))
            .one(&db_tx)
            .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(member_username.to_string()));
            }

            let membership = memberships::ActiveModel {
                group_id: ActiveValue::Set(group_id.to_string()),
                user_id: ActiveValue::Set(member_username.to_string()),
                role: ActiveValue::Set(MembershipRole::User.as_str().to_string()),
            };
            membership.insert(&db_tx).await?;

            Ok(())
        })
    }

    /// The role a user holds on a group, or `None` without a membership.
    /// Pure lookup; never mutates.
    pub async fn membership_role(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Option<MembershipRole>> {
        with_tx!(self, |db_tx| {
            self.membership_role_tx(&db_tx, group_id, user_id).await
        })
    }
}
