use contracts::domain::common::AuditInfo;
use contracts::domain::a008_product_product::{ProductProduct, ProductProductDto, ProductProductId};
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::shared::data::audit::{audited_active_model, user_column};
use crate::shared::data::crud;
use crate::shared::data::error::RepoResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub default_code: String,
    pub create_user_id: Option<i64>,
    pub update_user_id: Option<i64>,
    pub create_date: DateTimeUtc,
    pub update_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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

audited_active_model!();

/// Связь атрибут ↔ товар (многие ко многим)
pub mod attribute_link {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "product_attribute_products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub product_attribute_id: i64,
        #[sea_orm(primary_key, auto_increment = false)]
        pub product_product_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "crate::domain::a005_product_attribute::repository::Entity",
            from = "Column::ProductAttributeId",
            to = "crate::domain::a005_product_attribute::repository::Column::Id",
            on_delete = "Cascade"
        )]
        Attribute,
        #[sea_orm(
            belongs_to = "super::Entity",
            from = "Column::ProductProductId",
            to = "super::Column::Id",
            on_delete = "Cascade"
        )]
        Product,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<Model> for ProductProduct {
    fn from(m: Model) -> Self {
        ProductProduct {
            id: ProductProductId(m.id),
            name: m.name,
            default_code: m.default_code,
            audit: AuditInfo::new(
                m.create_user_id,
                m.update_user_id,
                m.create_date,
                m.update_date,
            ),
        }
    }
}

pub async fn add(
    db: &DatabaseConnection,
    dto: &ProductProductDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        default_code: Set(dto.default_code.clone()),
        create_user_id: user_column(acting_user),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    let inserted = crud::insert_in_transaction(db, active_model).await?;
    Ok(inserted.id)
}

pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> RepoResult<ProductProduct> {
    Ok(crud::find_existing::<Entity>(db, id).await?.into())
}

/// Привязать товар к атрибуту. Счётчик атрибута не пересчитывается.
pub async fn link_attribute<C: ConnectionTrait>(
    db: &C,
    product_id: i64,
    attribute_id: i64,
) -> RepoResult<()> {
    let link = attribute_link::ActiveModel {
        product_attribute_id: Set(attribute_id),
        product_product_id: Set(product_id),
    };
    attribute_link::Entity::insert(link)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> RepoResult<()> {
    crud::delete_existing::<Entity>(db, id).await
}
