use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Group, MembershipRole, ResultEngine, User, groups, memberships, users,
};

use super::{Engine, normalize_required_field, with_tx};

impl Engine {
    /// Add a new group. The creator becomes its sole admin; group and
    /// membership are inserted in one transaction so neither can exist
    /// without the other.
    pub async fn new_group(&self, name: &str, email: &str, user_id: &str) -> ResultEngine<String> {
        let name = normalize_required_field(name, "group name")?;
        let email = normalize_required_field(email, "group email")?;

        let group = Group::new(name, email);
        let group_entry: groups::ActiveModel = (&group).into();
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            group_entry.insert(&db_tx).await?;

            let membership = memberships::ActiveModel {
                group_id: ActiveValue::Set(group.id.clone()),
                user_id: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(MembershipRole::Admin.as_str().to_string()),
            };
            membership.insert(&db_tx).await?;

            Ok(group.id.clone())
        })
    }

    /// Return a group by id.
    pub async fn group_by_id(&self, group_id: &str) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let model = self.require_group_by_id(&db_tx, group_id).await?;
            Ok(Group::from(model))
        })
    }

    /// Lists the members of a group with their role.
    pub async fn list_group_members(
        &self,
        group_id: &str,
    ) -> ResultEngine<Vec<(User, MembershipRole)>> {
        with_tx!(self, |db_tx| {
            self.require_group_by_id(&db_tx, group_id).await?;

            let rows: Vec<(memberships::Model, Option<users::Model>)> =
                memberships::Entity::find()
                    .filter(memberships::Column::GroupId.eq(group_id.to_string()))
                    .find_also_related(users::Entity)
                    .all(&db_tx)
                    .await?;

            let mut out = Vec::with_capacity(rows.len());
            for (membership, user_model) in rows {
                let Some(user_model) = user_model else { continue };
                out.push((
                    User::from(user_model),
                    MembershipRole::try_from(membership.role.as_str())?,
                ));
            }
            Ok(out)
        })
    }

    /// Lists the groups a user belongs to, with the role held on each.
    pub async fn list_groups_for_user(
        &self,
        user_id: &str,
    ) -> ResultEngine<Vec<(Group, MembershipRole)>> {
        with_tx!(self, |db_tx| {
            let rows: Vec<(memberships::Model, Option<groups::Model>)> =
                memberships::Entity::find()
                    .filter(memberships::Column::UserId.eq(user_id.to_string()))
                    .find_also_related(groups::Entity)
                    .all(&db_tx)
                    .await?;

            let mut out = Vec::with_capacity(rows.len());
            for (membership, group_model) in rows {
                let Some(group_model) = group_model else { continue };
                out.push((
                    Group::from(group_model),
                    MembershipRole::try_from(membership.role.as_str())?,
                ));
            }
            Ok(out)
        })
    }
}
