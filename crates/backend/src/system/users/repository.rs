use chrono::Utc;
use contracts::system::users::{CreateUserDto, User, UserId};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, PaginatorTrait, QueryOrder};

use crate::shared::data::crud;
use crate::shared::data::error::RepoResult;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(m: Model) -> Self {
        User {
            id: UserId(m.id),
            username: m.username,
            full_name: m.full_name,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

/// Create user, returns the new id
pub async fn add(db: &DatabaseConnection, dto: &CreateUserDto) -> RepoResult<UserId> {
    let active_model = ActiveModel {
        username: Set(dto.username.trim().to_string()),
        full_name: Set(dto.full_name.clone()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let inserted = active_model.insert(db).await?;
    Ok(UserId(inserted.id))
}

/// Get user by ID
pub async fn get_by_id(db: &DatabaseConnection, id: UserId) -> RepoResult<User> {
    Ok(crud::find_existing::<Entity>(db, id.value()).await?.into())
}

/// Get user by username
pub async fn get_by_username(db: &DatabaseConnection, username: &str) -> RepoResult<Option<User>> {
    let model = Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await?;
    Ok(model.map(Into::into))
}

/// List all users
pub async fn list_all(db: &DatabaseConnection) -> RepoResult<Vec<User>> {
    let models = Entity::find().order_by_asc(Column::Id).all(db).await?;
    Ok(models.into_iter().map(Into::into).collect())
}

pub async fn count_users(db: &DatabaseConnection) -> RepoResult<u64> {
    Ok(Entity::find().count(db).await?)
}
