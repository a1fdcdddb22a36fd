use contracts::domain::a004_template_file::{TemplateFile, TemplateFileDto, TemplateFileId};
use contracts::domain::common::AuditInfo;
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryOrder};

use crate::shared::data::audit::{audited_active_model, user_column};
use crate::shared::data::crud;
use crate::shared::data::error::RepoResult;
use crate::shared::list_query::{fetch_page, FieldKind, FieldMap};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "base_template_file")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
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

pub fn field_map() -> FieldMap<Entity> {
    FieldMap::new()
        .column("Id", Column::Id, FieldKind::I64)
        .column("Name", Column::Name, FieldKind::String)
        .column("Description", Column::Description, FieldKind::String)
        .audit_columns(
            Column::CreateUserId,
            Column::UpdateUserId,
            Column::CreateDate,
            Column::UpdateDate,
        )
}

impl From<Model> for TemplateFile {
    fn from(m: Model) -> Self {
        TemplateFile {
            id: TemplateFileId(m.id),
            name: m.name,
            description: m.description,
            audit: AuditInfo::new(
                m.create_user_id,
                m.update_user_id,
                m.create_date,
                m.update_date,
            ),
        }
    }
}

// ============================================================================
// Repository functions
// ============================================================================

pub async fn add(
    db: &DatabaseConnection,
    dto: &TemplateFileDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        description: Set(dto.description.clone()),
        create_user_id: user_column(acting_user),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    let inserted = crud::insert_in_transaction(db, active_model).await?;
    Ok(inserted.id)
}

pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> RepoResult<TemplateFile> {
    Ok(crud::find_existing::<Entity>(db, id).await?.into())
}

pub async fn get_by_name(db: &DatabaseConnection, name: &str) -> RepoResult<TemplateFile> {
    let model = Entity::find().filter(Column::Name.eq(name)).one(db).await?;
    Ok(crud::found::<Entity>(model, name)?.into())
}

/// Последний (с наибольшим id) файл шаблона, созданный пользователем
pub async fn get_last_by_user(db: &DatabaseConnection, user: UserId) -> RepoResult<TemplateFile> {
    let model = Entity::find()
        .filter(Column::CreateUserId.eq(user.value()))
        .order_by_desc(Column::Id)
        .one(db)
        .await?;
    Ok(crud::found::<Entity>(model, format!("create_user_id={}", user))?.into())
}

pub async fn get_all(
    db: &DatabaseConnection,
    request: &ListQuery,
) -> RepoResult<(Paginator, Vec<TemplateFile>)> {
    let (paginator, models) = fetch_page(db, Entity::find(), &field_map(), request).await?;
    Ok((paginator, models.into_iter().map(Into::into).collect()))
}

/// Обновить файл шаблона; отсутствующий id даёт `NotFound`
pub async fn update(
    db: &DatabaseConnection,
    id: i64,
    dto: &TemplateFileDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    crud::find_existing::<Entity>(db, id).await?;

    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        description: Set(dto.description.clone()),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    crud::update_by_id(db, Column::Id, id, active_model).await?;
    Ok(id)
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> RepoResult<()> {
    crud::delete_existing::<Entity>(db, id).await
}
