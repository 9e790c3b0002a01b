use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, User, users};

use super::{Engine, normalize_optional_text, normalize_required_field, with_tx};

impl Engine {
    /// Exact-match lookup by email. Absence is a normal result, not an
    /// error.
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<Option<User>> {
        with_tx!(self, |db_tx| {
            let model = users::Entity::find()
                .filter(users::Column::Email.eq(email.to_string()))
                .one(&db_tx)
                .await?;
            Ok(model.map(User::from))
        })
    }

    /// Updates a user's own profile fields.
    pub async fn update_user(
        &self,
        user_id: &str,
        name: Option<&str>,
        email: &str,
    ) -> ResultEngine<()> {
        let email = normalize_required_field(email, "email")?;
        let name = normalize_optional_text(name);

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .filter(users::Column::Username.ne(user_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(email));
            }

            let mut active: users::ActiveModel = model.into();
            active.name = ActiveValue::Set(name.clone());
            active.email = ActiveValue::Set(email.clone());
            active.update(&db_tx).await?;

            Ok(())
        })
    }
}
