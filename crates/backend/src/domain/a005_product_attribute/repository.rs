use std::collections::HashMap;

use contracts::domain::a005_product_attribute::{
    ProductAttribute, ProductAttributeDto, ProductAttributeId,
};
use contracts::domain::common::AuditInfo;
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;

use crate::domain::a006_product_attribute_value::repository as value;
use crate::domain::a007_product_attribute_line::repository as line;
use crate::domain::a008_product_product::repository::attribute_link;
use crate::shared::data::audit::{audited_active_model, user_column};
use crate::shared::data::crud;
use crate::shared::data::error::{RepoError, RepoResult};
use crate::shared::list_query::{fetch_page, FieldKind, FieldMap};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_attribute")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub code: String,
    pub sequence: i32,
    pub templates_count: i64,
    pub products_count: i64,
    pub create_user_id: Option<i64>,
    pub update_user_id: Option<i64>,
    pub create_date: DateTimeUtc,
    pub update_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::a006_product_attribute_value::repository::Entity")]
    Value,
    #[sea_orm(has_many = "crate::domain::a007_product_attribute_line::repository::Entity")]
    Line,
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

impl Related<value::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Value.def()
    }
}

impl Related<line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Line.def()
    }
}

audited_active_model!();

pub fn field_map() -> FieldMap<Entity> {
    FieldMap::new()
        .column("Id", Column::Id, FieldKind::I64)
        .column("Name", Column::Name, FieldKind::String)
        .column("Code", Column::Code, FieldKind::String)
        .column("Sequence", Column::Sequence, FieldKind::I64)
        .column("TemplatesCount", Column::TemplatesCount, FieldKind::I64)
        .column("ProductsCount", Column::ProductsCount, FieldKind::I64)
        .audit_columns(
            Column::CreateUserId,
            Column::UpdateUserId,
            Column::CreateDate,
            Column::UpdateDate,
        )
}

fn to_aggregate(m: Model, values: Vec<value::Model>) -> ProductAttribute {
    let values = values
        .into_iter()
        .map(|v| value::to_aggregate(v, Some(m.name.clone())))
        .collect();
    ProductAttribute {
        id: ProductAttributeId(m.id),
        name: m.name,
        code: m.code,
        sequence: m.sequence,
        templates_count: m.templates_count,
        products_count: m.products_count,
        values,
        audit: AuditInfo::new(
            m.create_user_id,
            m.update_user_id,
            m.create_date,
            m.update_date,
        ),
    }
}

/// Присоединить значения к атрибутам одним запросом
async fn with_values(
    db: &DatabaseConnection,
    models: Vec<Model>,
) -> RepoResult<Vec<ProductAttribute>> {
    let ids = models.iter().map(|m| m.id).collect();
    let mut by_attribute: HashMap<i64, Vec<value::Model>> = HashMap::new();
    for v in value::list_by_attributes(db, ids).await? {
        by_attribute.entry(v.attribute_id).or_default().push(v);
    }
    Ok(models
        .into_iter()
        .map(|m| {
            let values = by_attribute.remove(&m.id).unwrap_or_default();
            to_aggregate(m, values)
        })
        .collect())
}

// ============================================================================
// Repository functions
// ============================================================================

/// Добавить атрибут; счётчики начинаются с нуля
pub async fn add(
    db: &DatabaseConnection,
    dto: &ProductAttributeDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        code: Set(dto.code.clone().unwrap_or_default()),
        sequence: Set(dto.sequence),
        templates_count: Set(0),
        products_count: Set(0),
        create_user_id: user_column(acting_user),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    let inserted = crud::insert_in_transaction(db, active_model).await?;
    Ok(inserted.id)
}

/// Атрибут вместе со значениями
pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> RepoResult<ProductAttribute> {
    let model = crud::find_existing::<Entity>(db, id).await?;
    let values = value::list_by_attributes(db, vec![model.id]).await?;
    Ok(to_aggregate(model, values))
}

pub async fn get_by_name(db: &DatabaseConnection, name: &str) -> RepoResult<ProductAttribute> {
    let model = Entity::find().filter(Column::Name.eq(name)).one(db).await?;
    let model = crud::found::<Entity>(model, name)?;
    let values = value::list_by_attributes(db, vec![model.id]).await?;
    Ok(to_aggregate(model, values))
}

pub async fn get_all(
    db: &DatabaseConnection,
    request: &ListQuery,
) -> RepoResult<(Paginator, Vec<ProductAttribute>)> {
    let (paginator, models) = fetch_page(db, Entity::find(), &field_map(), request).await?;
    let attributes = with_values(db, models).await?;
    Ok((paginator, attributes))
}

/// Обновить атрибут; отсутствующий id даёт `NotFound`.
/// Счётчики здесь не изменяются.
pub async fn update(
    db: &DatabaseConnection,
    id: i64,
    dto: &ProductAttributeDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let existing = crud::find_existing::<Entity>(db, id).await?;

    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        code: Set(dto.code.clone().unwrap_or(existing.code)),
        sequence: Set(dto.sequence),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    crud::update_by_id(db, Column::Id, id, active_model).await?;
    Ok(id)
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> RepoResult<()> {
    crud::delete_existing::<Entity>(db, id).await
}

// ============================================================================
// Derived counters
// ============================================================================

/// `SET counter = (SELECT COUNT(*) ...) + 1, update_user_id = ?` in one
/// statement, then read back the new value with `read`.
async fn recount<C: ConnectionTrait>(
    db: &C,
    id: i64,
    counter: Column,
    read: fn(&Model) -> i64,
    count_sql: String,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let result = Entity::update_many()
        .col_expr(counter, Expr::cust_with_values(count_sql, [id]))
        .col_expr(
            Column::UpdateUserId,
            Expr::value(acting_user.map(|user| user.value())),
        )
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(RepoError::not_found(Entity.table_name(), id));
    }

    let count = read(&crud::find_existing::<Entity>(db, id).await?);
    tracing::debug!("{} of product attribute {} set to {}", counter.as_str(), id, count);
    Ok(count)
}

/// Пересчитать количество шаблонов товаров (строк атрибута) + 1.
///
/// `+1` учитывает строку, которая добавляется в той же транзакции
/// после пересчёта.
pub async fn update_templates_count<C: ConnectionTrait>(
    db: &C,
    id: i64,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let sql = format!(
        "(SELECT COUNT(*) FROM {} WHERE {} = ?) + 1",
        line::Entity.table_name(),
        line::Column::AttributeId.as_str()
    );
    recount(db, id, Column::TemplatesCount, |m| m.templates_count, sql, acting_user).await
}

/// Пересчитать количество связанных товаров + 1
pub async fn update_products_count<C: ConnectionTrait>(
    db: &C,
    id: i64,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let sql = format!(
        "(SELECT COUNT(*) FROM {} WHERE {} = ?) + 1",
        attribute_link::Entity.table_name(),
        attribute_link::Column::ProductAttributeId.as_str()
    );
    recount(db, id, Column::ProductsCount, |m| m.products_count, sql, acting_user).await
}
