use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Идентификатор пользователя системы
    UserId
);

/// Пользователь системы; на него ссылаются аудит-поля всех записей
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub full_name: Option<String>,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), String> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Username cannot be empty".into());
        }
        if username.chars().any(char::is_whitespace) {
            return Err("Username cannot contain whitespace".into());
        }
        Ok(())
    }
}
