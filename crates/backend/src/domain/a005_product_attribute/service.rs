use super::repository;
use contracts::domain::a005_product_attribute::{ProductAttribute, ProductAttributeDto};
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;

use crate::shared::data::db::get_connection;

/// Создание нового атрибута товара
pub async fn create(dto: ProductAttributeDto, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    dto.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let db = get_connection()?;
    let id = repository::add(db, &dto, acting_user).await?;
    tracing::info!("Created product attribute {} ({})", id, dto.name.trim());
    Ok(id)
}

/// Обновление атрибута товара
pub async fn update(dto: ProductAttributeDto, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    let id = dto
        .id
        .ok_or_else(|| anyhow::anyhow!("ID is required for update"))?;
    dto.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    Ok(repository::update(get_connection()?, id, &dto, acting_user).await?)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<ProductAttribute> {
    Ok(repository::get_by_id(get_connection()?, id).await?)
}

pub async fn get_by_name(name: &str) -> anyhow::Result<ProductAttribute> {
    Ok(repository::get_by_name(get_connection()?, name).await?)
}

pub async fn list(request: &ListQuery) -> anyhow::Result<(Paginator, Vec<ProductAttribute>)> {
    Ok(repository::get_all(get_connection()?, request).await?)
}

pub async fn delete(id: i64) -> anyhow::Result<()> {
    repository::delete(get_connection()?, id).await?;
    tracing::info!("Deleted product attribute {}", id);
    Ok(())
}

/// Пересчитать количество шаблонов, использующих атрибут
pub async fn update_templates_count(id: i64, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    Ok(repository::update_templates_count(get_connection()?, id, acting_user).await?)
}

pub async fn update_products_count(id: i64, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    Ok(repository::update_products_count(get_connection()?, id, acting_user).await?)
}
