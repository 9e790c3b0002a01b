use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Shift, shift_assignments, shifts};

use super::{Engine, with_tx};

impl Engine {
    /// Add a new shift to a group (admin-only). The start must strictly
    /// precede the end.
    pub async fn new_shift(
        &self,
        group_id: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        if start_at >= end_at {
            return Err(EngineError::InvalidRange(
                "start_at must precede end_at".to_string(),
            ));
        }

        let shift = Shift::new(group_id.to_string(), start_at, end_at);
        let shift_entry: shifts::ActiveModel = (&shift).into();
        with_tx!(self, |db_tx| {
            self.require_group_admin(&db_tx, group_id, user_id).await?;
            shift_entry.insert(&db_tx).await?;
            Ok(shift.id)
        })
    }

    /// Attaches a group member to a shift (admin-only). Attaching an
    /// already-assigned user is a no-op success.
    pub async fn assign_shift(
        &self,
        group_id: &str,
        shift_id: Uuid,
        member_username: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group_admin(&db_tx, group_id, user_id).await?;
            self.require_shift_in_group(&db_tx, group_id, shift_id)
                .await?;
            self.require_group_member(&db_tx, group_id, member_username)
                .await?;

            let existing = shift_assignments::Entity::find_by_id((
                shift_id.to_string(),
                member_username.to_string(),
            ))
            .one(&db_tx)
            .await?;
            if existing.is_none() {
                let assignment = shift_assignments::ActiveModel {
                    shift_id: ActiveValue::Set(shift_id.to_string()),
                    user_id: ActiveValue::Set(member_username.to_string()),
                };
                assignment.insert(&db_tx).await?;
            }

            Ok(())
        })
    }

    /// All shifts of a group with their assignees, ordered by start time.
    /// Day/week/month filtering happens downstream in the calendar
    /// projection.
    pub async fn list_shifts(&self, group_id: &str) -> ResultEngine<Vec<(Shift, Vec<String>)>> {
        with_tx!(self, |db_tx| {
            self.require_group_by_id(&db_tx, group_id).await?;

            let shift_models: Vec<shifts::Model> = shifts::Entity::find()
                .filter(shifts::Column::GroupId.eq(group_id.to_string()))
                .order_by_asc(shifts::Column::StartAt)
                .all(&db_tx)
                .await?;

            let ids: Vec<String> = shift_models.iter().map(|m| m.id.clone()).collect();
            let assignment_models: Vec<shift_assignments::Model> =
                shift_assignments::Entity::find()
                    .filter(shift_assignments::Column::ShiftId.is_in(ids))
                    .all(&db_tx)
                    .await?;

            let mut assignees: HashMap<String, Vec<String>> = HashMap::new();
            for assignment in assignment_models {
                assignees
                    .entry(assignment.shift_id)
                    .or_default()
                    .push(assignment.user_id);
            }

            let mut out = Vec::with_capacity(shift_models.len());
            for model in shift_models {
                let users = assignees.remove(&model.id).unwrap_or_default();
                out.push((Shift::try_from(model)?, users));
            }
            Ok(out)
        })
    }

    /// Shifts a user is assigned to, across all groups, ordered by start
    /// time.
    pub async fn shifts_for_user(&self, user_id: &str) -> ResultEngine<Vec<Shift>> {
        with_tx!(self, |db_tx| {
            let rows: Vec<(shift_assignments::Model, Option<shifts::Model>)> =
                shift_assignments::Entity::find()
                    .filter(shift_assignments::Column::UserId.eq(user_id.to_string()))
                    .join(JoinType::InnerJoin, shift_assignments::Relation::Shifts.def())
                    .order_by_asc(shifts::Column::StartAt)
                    .find_also_related(shifts::Entity)
                    .all(&db_tx)
                    .await?;

            let mut out = Vec::with_capacity(rows.len());
            for (_, shift_model) in rows {
                let Some(shift_model) = shift_model else { continue };
                out.push(Shift::try_from(shift_model)?);
            }
            Ok(out)
        })
    }
}
