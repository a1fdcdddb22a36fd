use super::repository;
use contracts::domain::a001_address_country::{AddressCountry, AddressCountryDto};
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;

use crate::shared::data::db::get_connection;

/// Создание новой страны
pub async fn create(dto: AddressCountryDto, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    dto.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let db = get_connection()?;
    let id = repository::add(db, &dto, acting_user).await?;
    tracing::info!("Created address country {} ({})", id, dto.name.trim());
    Ok(id)
}

/// Обновление страны
pub async fn update(dto: AddressCountryDto, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    let id = dto
        .id
        .ok_or_else(|| anyhow::anyhow!("ID is required for update"))?;
    dto.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let db = get_connection()?;
    Ok(repository::update(db, id, &dto, acting_user).await?)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<AddressCountry> {
    Ok(repository::get_by_id(get_connection()?, id).await?)
}

pub async fn get_by_name(name: &str) -> anyhow::Result<AddressCountry> {
    Ok(repository::get_by_name(get_connection()?, name).await?)
}

pub async fn list(request: &ListQuery) -> anyhow::Result<(Paginator, Vec<AddressCountry>)> {
    Ok(repository::get_all(get_connection()?, request).await?)
}

pub async fn delete(id: i64) -> anyhow::Result<()> {
    repository::delete(get_connection()?, id).await?;
    tracing::info!("Deleted address country {}", id);
    Ok(())
}
