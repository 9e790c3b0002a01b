//! Shift primitives.
//!
//! A `Shift` is a time interval owned by exactly one group; users are
//! attached through `shift_assignments`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shift {
    pub id: Uuid,
    pub group_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl Shift {
    pub fn new(group_id: String, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            start_at,
            end_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shifts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub start_at: DateTimeUtc,
    pub end_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
    #[sea_orm(has_many = "super::shift_assignments::Entity")]
    ShiftAssignments,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::shift_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShiftAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Shift> for ActiveModel {
    fn from(shift: &Shift) -> Self {
        Self {
            id: ActiveValue::Set(shift.id.to_string()),
            group_id: ActiveValue::Set(shift.group_id.clone()),
            start_at: ActiveValue::Set(shift.start_at),
            end_at: ActiveValue::Set(shift.end_at),
        }
    }
}

impl TryFrom<Model> for Shift {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("shift not exists".to_string()))?,
            group_id: model.group_id,
            start_at: model.start_at,
            end_at: model.end_at,
        })
    }
}
