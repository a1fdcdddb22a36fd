use sea_orm::{ConnectionTrait, DbErr, EntityName, EntityTrait, Schema};

use crate::domain::{
    a001_address_country, a002_address_province, a003_position, a004_template_file,
    a005_product_attribute, a006_product_attribute_value, a007_product_attribute_line,
    a008_product_product,
};
use crate::system::users;

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let table = entity.table_name().to_owned();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    tracing::debug!("Table ready: {}", table);
    Ok(())
}

/// Создание всех таблиц (`CREATE TABLE IF NOT EXISTS`).
///
/// Tables are created in foreign-key order: users first, since every audited
/// table references them, then each owner before the tables that point at it.
pub async fn register_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, users::repository::Entity).await?;
    create_table(db, a001_address_country::repository::Entity).await?;
    create_table(db, a002_address_province::repository::Entity).await?;
    create_table(db, a003_position::repository::Entity).await?;
    create_table(db, a004_template_file::repository::Entity).await?;
    create_table(db, a005_product_attribute::repository::Entity).await?;
    create_table(db, a006_product_attribute_value::repository::Entity).await?;
    create_table(db, a007_product_attribute_line::repository::Entity).await?;
    create_table(db, a008_product_product::repository::Entity).await?;
    create_table(db, a008_product_product::repository::attribute_link::Entity).await?;

    tracing::info!("Database schema registered");
    Ok(())
}
