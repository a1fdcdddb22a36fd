use super::repository;
use crate::domain::a005_product_attribute::repository as attribute;
use contracts::domain::a007_product_attribute_line::{
    ProductAttributeLine, ProductAttributeLineDto,
};
use contracts::system::users::UserId;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::shared::data::db::get_connection;
use crate::shared::data::error::RepoResult;

/// Добавить строку атрибута и пересчитать количество шаблонов атрибута
pub async fn create(
    dto: ProductAttributeLineDto,
    acting_user: Option<UserId>,
) -> anyhow::Result<i64> {
    let (id, count) = add_counted(get_connection()?, &dto, acting_user).await?;
    tracing::debug!(
        "Attribute {} now used by {} templates",
        dto.attribute_id,
        count
    );
    Ok(id)
}

/// Пересчёт и вставка в одной транзакции. Счётчик считается до вставки,
/// его `+1` и есть новая строка. Возвращает id строки и новый счётчик.
pub(crate) async fn add_counted(
    db: &DatabaseConnection,
    dto: &ProductAttributeLineDto,
    acting_user: Option<UserId>,
) -> RepoResult<(i64, i64)> {
    let txn = db.begin().await?;
    let count = attribute::update_templates_count(&txn, dto.attribute_id, acting_user).await?;
    let id = repository::add(&txn, dto, acting_user).await?;
    txn.commit().await?;
    Ok((id, count))
}

pub async fn list_by_attribute(attribute_id: i64) -> anyhow::Result<Vec<ProductAttributeLine>> {
    Ok(repository::list_by_attribute(get_connection()?, attribute_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support::setup;
    use contracts::domain::a005_product_attribute::ProductAttributeDto;

    fn line(attribute_id: i64, template_id: i64) -> ProductAttributeLineDto {
        ProductAttributeLineDto {
            attribute_id,
            template_id,
        }
    }

    #[tokio::test]
    async fn test_first_line_counts_once() {
        let (db, user) = setup().await;
        let attr = attribute::add(
            &db,
            &ProductAttributeDto {
                id: None,
                name: "Color".into(),
                code: None,
                sequence: 0,
            },
            Some(user),
        )
        .await
        .unwrap();

        let (_, count) = add_counted(&db, &line(attr, 10), Some(user)).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(attribute::get_by_id(&db, attr).await.unwrap().templates_count, 1);

        let (_, count) = add_counted(&db, &line(attr, 11), Some(user)).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(repository::list_by_attribute(&db, attr).await.unwrap().len(), 2);
        assert_eq!(attribute::get_by_id(&db, attr).await.unwrap().templates_count, 2);
    }

    #[tokio::test]
    async fn test_missing_attribute_adds_no_line() {
        let (db, user) = setup().await;
        let err = add_counted(&db, &line(404, 10), Some(user)).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(repository::list_by_attribute(&db, 404).await.unwrap().is_empty());
    }
}
