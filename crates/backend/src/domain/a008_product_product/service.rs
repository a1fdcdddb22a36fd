use super::repository;
use crate::domain::a005_product_attribute::repository as attribute;
use contracts::domain::a008_product_product::{ProductProduct, ProductProductDto};
use contracts::system::users::UserId;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::shared::data::db::get_connection;
use crate::shared::data::error::RepoResult;

pub async fn create(dto: ProductProductDto, acting_user: Option<UserId>) -> anyhow::Result<i64> {
    if dto.name.trim().is_empty() {
        return Err(anyhow::anyhow!("Validation failed: Name cannot be empty"));
    }
    Ok(repository::add(get_connection()?, &dto, acting_user).await?)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<ProductProduct> {
    Ok(repository::get_by_id(get_connection()?, id).await?)
}

/// Привязать товар к атрибуту и пересчитать количество товаров атрибута
pub async fn link_attribute(
    product_id: i64,
    attribute_id: i64,
    acting_user: Option<UserId>,
) -> anyhow::Result<i64> {
    Ok(link_counted(get_connection()?, product_id, attribute_id, acting_user).await?)
}

/// Пересчёт до вставки связи, в одной транзакции: `+1` в счётчике и есть
/// новая связь. Ошибка вставки откатывает и пересчёт.
pub(crate) async fn link_counted(
    db: &DatabaseConnection,
    product_id: i64,
    attribute_id: i64,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let txn = db.begin().await?;
    let count = attribute::update_products_count(&txn, attribute_id, acting_user).await?;
    repository::link_attribute(&txn, product_id, attribute_id).await?;
    txn.commit().await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support::setup;
    use contracts::domain::a005_product_attribute::ProductAttributeDto;

    #[tokio::test]
    async fn test_first_link_counts_once() {
        let (db, user) = setup().await;
        let attr = attribute::add(
            &db,
            &ProductAttributeDto {
                id: None,
                name: "Size".into(),
                code: None,
                sequence: 0,
            },
            Some(user),
        )
        .await
        .unwrap();
        let product = repository::add(
            &db,
            &ProductProductDto {
                name: "T-shirt".into(),
                default_code: "TS".into(),
            },
            Some(user),
        )
        .await
        .unwrap();

        assert_eq!(link_counted(&db, product, attr, Some(user)).await.unwrap(), 1);
        assert_eq!(attribute::get_by_id(&db, attr).await.unwrap().products_count, 1);

        // duplicate link: insert fails, counter stays as it was
        assert!(link_counted(&db, product, attr, Some(user)).await.is_err());
        assert_eq!(attribute::get_by_id(&db, attr).await.unwrap().products_count, 1);
    }
}
