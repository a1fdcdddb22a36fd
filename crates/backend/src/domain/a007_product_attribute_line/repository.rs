use contracts::domain::a005_product_attribute::ProductAttributeId;
use contracts::domain::a007_product_attribute_line::{
    ProductAttributeLine, ProductAttributeLineDto, ProductAttributeLineId,
};
use contracts::domain::common::AuditInfo;
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryOrder, TransactionTrait};

use crate::domain::a005_product_attribute::repository as attribute;
use crate::shared::data::audit::{audited_active_model, user_column};
use crate::shared::data::crud;
use crate::shared::data::error::RepoResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_attribute_line")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub attribute_id: i64,
    /// Шаблон товара; сами шаблоны здесь не хранятся
    pub template_id: i64,
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

impl From<Model> for ProductAttributeLine {
    fn from(m: Model) -> Self {
        ProductAttributeLine {
            id: ProductAttributeLineId(m.id),
            attribute_id: ProductAttributeId(m.attribute_id),
            template_id: m.template_id,
            audit: AuditInfo::new(
                m.create_user_id,
                m.update_user_id,
                m.create_date,
                m.update_date,
            ),
        }
    }
}

pub async fn add<C>(
    db: &C,
    dto: &ProductAttributeLineDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64>
where
    C: ConnectionTrait + TransactionTrait,
{
    let active_model = ActiveModel {
        attribute_id: Set(dto.attribute_id),
        template_id: Set(dto.template_id),
        create_user_id: user_column(acting_user),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    let inserted = crud::insert_in_transaction(db, active_model).await?;
    Ok(inserted.id)
}

pub async fn list_by_attribute(
    db: &DatabaseConnection,
    attribute_id: i64,
) -> RepoResult<Vec<ProductAttributeLine>> {
    let models = Entity::find()
        .filter(Column::AttributeId.eq(attribute_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> RepoResult<()> {
    crud::delete_existing::<Entity>(db, id).await
}
