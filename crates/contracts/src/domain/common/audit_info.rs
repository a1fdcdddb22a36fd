use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::system::users::UserId;

/// Аудит-поля записи, заполняются хранилищем при каждой записи
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    /// Создатель записи
    pub create_user: Option<UserId>,
    /// Последний изменивший
    pub update_user: Option<UserId>,
    /// Дата создания записи
    pub create_date: DateTime<Utc>,
    /// Дата последнего обновления
    pub update_date: DateTime<Utc>,
}

impl AuditInfo {
    pub fn new(
        create_user: Option<i64>,
        update_user: Option<i64>,
        create_date: DateTime<Utc>,
        update_date: DateTime<Utc>,
    ) -> Self {
        Self {
            create_user: create_user.map(UserId),
            update_user: update_user.map(UserId),
            create_date,
            update_date,
        }
    }
}
