use std::collections::HashMap;

use contracts::domain::a005_product_attribute::ProductAttributeId;
use contracts::domain::a006_product_attribute_value::{
    ProductAttributeValue, ProductAttributeValueDto, ProductAttributeValueId,
};
use contracts::domain::common::AuditInfo;
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryOrder};

use crate::domain::a005_product_attribute::repository as attribute;
use crate::shared::data::audit::{audited_active_model, user_column};
use crate::shared::data::crud;
use crate::shared::data::error::RepoResult;
use crate::shared::list_query::{fetch_page, FieldKind, FieldMap};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_attribute_value")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub attribute_id: i64,
    pub sequence: i32,
    pub create_user_id: Option<i64>,
    pub update_user_id: Option<i64>,
    pub create_date: DateTimeUtc,
    pub update_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::a005_product_attribute::repository::Entity",
        from = "Column::AttributeId",
        to = "crate::domain::a005_product_attribute::repository::Column::Id"
    )]
    Attribute,
    #[sea_orm(
        belongs_to = "crate::system::users::repository::Entity",
        from = "Column::CreateUserId",
        to = "crate::system::users::repository::Column::Id",
        on_delete = "SetNull"
    )]
    CreateUser,
    #[sea_orm(
        belongs_to = "crate::system::users::repository::Entity",
        from = "Column::UpdateUserId",
        to = "crate::system::users::repository::Column::Id",
        on_delete = "SetNull"
    )]
    UpdateUser,
}

impl Related<attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attribute.def()
    }
}

audited_active_model!();

pub fn field_map() -> FieldMap<Entity> {
    FieldMap::new()
        .column("Id", Column::Id, FieldKind::I64)
        .column("Name", Column::Name, FieldKind::String)
        .column("Sequence", Column::Sequence, FieldKind::I64)
        .column("Attribute", Column::AttributeId, FieldKind::I64)
        .related::<attribute::Entity>(
            "Attribute.Name",
            || Relation::Attribute.def(),
            attribute::Column::Name,
            FieldKind::String,
        )
        .related::<attribute::Entity>(
            "Attribute.Code",
            || Relation::Attribute.def(),
            attribute::Column::Code,
            FieldKind::String,
        )
        .audit_columns(
            Column::CreateUserId,
            Column::UpdateUserId,
            Column::CreateDate,
            Column::UpdateDate,
        )
}

pub(crate) fn to_aggregate(m: Model, attribute_name: Option<String>) -> ProductAttributeValue {
    ProductAttributeValue {
        id: ProductAttributeValueId(m.id),
        name: m.name,
        sequence: m.sequence,
        attribute_id: ProductAttributeId(m.attribute_id),
        attribute_name,
        audit: AuditInfo::new(
            m.create_user_id,
            m.update_user_id,
            m.create_date,
            m.update_date,
        ),
    }
}

// ============================================================================
// Repository functions
// ============================================================================

pub async fn add(
    db: &DatabaseConnection,
    dto: &ProductAttributeValueDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        attribute_id: Set(dto.attribute_id),
        sequence: Set(dto.sequence),
        create_user_id: user_column(acting_user),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    let inserted = crud::insert_in_transaction(db, active_model).await?;
    Ok(inserted.id)
}

pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> RepoResult<ProductAttributeValue> {
    let model = crud::find_existing::<Entity>(db, id).await?;
    let attribute = attribute::Entity::find_by_id(model.attribute_id).one(db).await?;
    Ok(to_aggregate(model, attribute.map(|a| a.name)))
}

/// Значения с названиями атрибутов
pub async fn get_all(
    db: &DatabaseConnection,
    request: &ListQuery,
) -> RepoResult<(Paginator, Vec<ProductAttributeValue>)> {
    let (paginator, models) = fetch_page(db, Entity::find(), &field_map(), request).await?;

    let mut attribute_ids: Vec<i64> = models.iter().map(|m| m.attribute_id).collect();
    attribute_ids.sort_unstable();
    attribute_ids.dedup();
    let names: HashMap<i64, String> = if attribute_ids.is_empty() {
        HashMap::new()
    } else {
        attribute::Entity::find()
            .filter(attribute::Column::Id.is_in(attribute_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect()
    };

    let values = models
        .into_iter()
        .map(|m| {
            let name = names.get(&m.attribute_id).cloned();
            to_aggregate(m, name)
        })
        .collect();
    Ok((paginator, values))
}

/// Значения нескольких атрибутов, по порядку `sequence`, затем `id`
pub async fn list_by_attributes(
    db: &DatabaseConnection,
    attribute_ids: Vec<i64>,
) -> RepoResult<Vec<Model>> {
    if attribute_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::AttributeId.is_in(attribute_ids))
        .order_by_asc(Column::Sequence)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> RepoResult<()> {
    crud::delete_existing::<Entity>(db, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::error::RepoError;
    use crate::shared::data::test_support::setup;
    use contracts::domain::a005_product_attribute::ProductAttributeDto;

    async fn add_attribute(db: &DatabaseConnection, user: UserId, name: &str, code: &str) -> i64 {
        attribute::add(
            db,
            &ProductAttributeDto {
                id: None,
                name: name.into(),
                code: Some(code.into()),
                sequence: 0,
            },
            Some(user),
        )
        .await
        .unwrap()
    }

    async fn add_value(db: &DatabaseConnection, user: UserId, attr: i64, name: &str, seq: i32) -> i64 {
        add(
            db,
            &ProductAttributeValueDto {
                name: name.into(),
                attribute_id: attr,
                sequence: seq,
            },
            Some(user),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let (db, user) = setup().await;
        let color = add_attribute(&db, user, "Color", "CLR").await;
        let id = add_value(&db, user, color, "Red", 1).await;

        let value = get_by_id(&db, id).await.unwrap();
        assert_eq!(value.name, "Red");
        assert_eq!(value.attribute_id, ProductAttributeId(color));
        assert_eq!(value.attribute_name.as_deref(), Some("Color"));
    }

    #[tokio::test]
    async fn test_value_requires_attribute() {
        let (db, user) = setup().await;
        let err = add(
            &db,
            &ProductAttributeValueDto {
                name: "Orphan".into(),
                attribute_id: 999,
                sequence: 0,
            },
            Some(user),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
    }

    #[tokio::test]
    async fn test_list_by_attribute_path() {
        let (db, user) = setup().await;
        let color = add_attribute(&db, user, "Color", "CLR").await;
        let size = add_attribute(&db, user, "Size", "SZ").await;
        add_value(&db, user, color, "Red", 2).await;
        add_value(&db, user, color, "Blue", 1).await;
        add_value(&db, user, size, "XL", 1).await;

        let request = ListQuery::new()
            .filter("Attribute.Code", "CLR")
            .sort(["Sequence"], ["asc"]);
        let (paginator, values) = get_all(&db, &request).await.unwrap();
        assert_eq!(paginator.total_count, 2);
        let names: Vec<_> = values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Blue", "Red"]);
        assert!(values
            .iter()
            .all(|v| v.attribute_name.as_deref() == Some("Color")));

        let request = ListQuery::new()
            .filter("Attribute", size)
            .exclude("Name", "XL");
        let (paginator, values) = get_all(&db, &request).await.unwrap();
        assert_eq!(paginator.total_count, 0);
        assert!(values.is_empty());
    }
}
