use anyhow::Result;
use contracts::system::users::{CreateUserDto, User, UserId};

use super::repository;
use crate::shared::data::db::get_connection;

/// Create a new user
pub async fn create(dto: CreateUserDto) -> Result<UserId> {
    dto.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let db = get_connection()?;

    if repository::get_by_username(db, dto.username.trim())
        .await?
        .is_some()
    {
        return Err(anyhow::anyhow!("Username already exists"));
    }

    Ok(repository::add(db, &dto).await?)
}

pub async fn get_by_id(id: UserId) -> Result<User> {
    Ok(repository::get_by_id(get_connection()?, id).await?)
}

pub async fn get_by_username(username: &str) -> Result<Option<User>> {
    Ok(repository::get_by_username(get_connection()?, username).await?)
}

pub async fn list_all() -> Result<Vec<User>> {
    Ok(repository::list_all(get_connection()?).await?)
}
