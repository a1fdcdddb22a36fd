use super::repository;
use contracts::domain::a004_template_file::{TemplateFile, TemplateFileDto};
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;

use crate::shared::data::db::get_connection;

pub async fn create(dto: TemplateFileDto, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    dto.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let db = get_connection()?;
    let id = repository::add(db, &dto, acting_user).await?;
    tracing::info!("Created template file {} ({})", id, dto.name.trim());
    Ok(id)
}

pub async fn update(dto: TemplateFileDto, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    let id = dto
        .id
        .ok_or_else(|| anyhow::anyhow!("ID is required for update"))?;
    dto.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    Ok(repository::update(get_connection()?, id, &dto, acting_user).await?)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<TemplateFile> {
    Ok(repository::get_by_id(get_connection()?, id).await?)
}

pub async fn get_by_name(name: &str) -> anyhow::Result<TemplateFile> {
    Ok(repository::get_by_name(get_connection()?, name).await?)
}

/// Последний файл шаблона пользователя
pub async fn get_last_by_user(user: UserId) -> anyhow::Result<TemplateFile> {
    Ok(repository::get_last_by_user(get_connection()?, user).await?)
}

pub async fn list(request: &ListQuery) -> anyhow::Result<(Paginator, Vec<TemplateFile>)> {
    Ok(repository::get_all(get_connection()?, request).await?)
}

pub async fn delete(id: i64) -> anyhow::Result<()> {
    repository::delete(get_connection()?, id).await?;
    tracing::info!("Deleted template file {}", id);
    Ok(())
}
