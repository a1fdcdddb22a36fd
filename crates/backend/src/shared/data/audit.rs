//! Аудит-поля записей.
//!
//! Every audited table carries `create_user_id`, `update_user_id`,
//! `create_date` and `update_date`. The dates are stamped by the save hook
//! generated with [`audited_active_model!`]; the user columns are filled by
//! the repositories from the acting user.

use contracts::system::users::UserId;
use sea_orm::ActiveValue;

/// `ActiveModelBehavior` for an entity module with `create_date` /
/// `update_date` columns: inserts stamp both, updates only `update_date`.
///
/// Invoke inside the entity's module, after `DeriveEntityModel`.
macro_rules! audited_active_model {
    () => {
        #[async_trait::async_trait]
        impl sea_orm::ActiveModelBehavior for ActiveModel {
            async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, sea_orm::DbErr>
            where
                C: sea_orm::ConnectionTrait,
            {
                let now = chrono::Utc::now();
                if insert {
                    self.create_date = sea_orm::ActiveValue::Set(now);
                }
                self.update_date = sea_orm::ActiveValue::Set(now);
                Ok(self)
            }
        }
    };
}

pub(crate) use audited_active_model;

/// Value for a `*_user_id` column.
pub fn user_column(acting_user: Option<UserId>) -> ActiveValue<Option<i64>> {
    ActiveValue::Set(acting_user.map(|user| user.value()))
}
