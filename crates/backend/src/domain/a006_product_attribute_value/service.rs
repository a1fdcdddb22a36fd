use super::repository;
use contracts::domain::a006_product_attribute_value::{
    ProductAttributeValue, ProductAttributeValueDto,
};
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;

use crate::shared::data::db::get_connection;

pub async fn create(
    dto: ProductAttributeValueDto,
    acting_user: Option<UserId>,
) -> anyhow::Result<i64> {
    if dto.name.trim().is_empty() {
        return Err(anyhow::anyhow!("Validation failed: Name cannot be empty"));
    }
    Ok(repository::add(get_connection()?, &dto, acting_user).await?)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<ProductAttributeValue> {
    Ok(repository::get_by_id(get_connection()?, id).await?)
}

pub async fn list(request: &ListQuery) -> anyhow::Result<(Paginator, Vec<ProductAttributeValue>)> {
    Ok(repository::get_all(get_connection()?, request).await?)
}

pub async fn delete(id: i64) -> anyhow::Result<()> {
    Ok(repository::delete(get_connection()?, id).await?)
}
