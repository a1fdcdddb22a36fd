use super::repository;
use contracts::domain::a002_address_province::{AddressProvince, AddressProvinceDto};
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;

use crate::shared::data::db::get_connection;

pub async fn create(dto: AddressProvinceDto, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    dto.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let db = get_connection()?;
    Ok(repository::add(db, &dto, acting_user).await?)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<AddressProvince> {
    Ok(repository::get_by_id(get_connection()?, id).await?)
}

pub async fn list(request: &ListQuery) -> anyhow::Result<(Paginator, Vec<AddressProvince>)> {
    Ok(repository::get_all(get_connection()?, request).await?)
}

pub async fn delete(id: i64) -> anyhow::Result<()> {
    Ok(repository::delete(get_connection()?, id).await?)
}
