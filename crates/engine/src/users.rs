//! Users table.
//!
//! The engine stores memberships and shift assignments by `user_id`, which
//! is the username.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
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

/// Profile data safe to hand outside the engine. The password never leaves
/// the entity model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub name: Option<String>,
    pub email: String,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            username: model.username,
            name: model.name,
            email: model.email,
        }
    }
}
