use contracts::domain::a003_position::{Position, PositionDto, PositionId};
use contracts::domain::common::AuditInfo;
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::shared::data::audit::{audited_active_model, user_column};
use crate::shared::data::crud;
use crate::shared::data::error::RepoResult;
use crate::shared::list_query::{fetch_page, FieldKind, FieldMap};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "base_position")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
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

impl From<Model> for Position {
    fn from(m: Model) -> Self {
        Position {
            id: PositionId(m.id),
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

/// Добавить должность, вернуть её id
pub async fn add(
    db: &DatabaseConnection,
    dto: &PositionDto,
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

pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> RepoResult<Position> {
    Ok(crud::find_existing::<Entity>(db, id).await?.into())
}

pub async fn get_by_name(db: &DatabaseConnection, name: &str) -> RepoResult<Position> {
    let model = Entity::find().filter(Column::Name.eq(name)).one(db).await?;
    Ok(crud::found::<Entity>(model, name)?.into())
}

pub async fn get_all(
    db: &DatabaseConnection,
    request: &ListQuery,
) -> RepoResult<(Paginator, Vec<Position>)> {
    let (paginator, models) = fetch_page(db, Entity::find(), &field_map(), request).await?;
    Ok((paginator, models.into_iter().map(Into::into).collect()))
}

/// Обновить должность без проверки существования
pub async fn update(
    db: &DatabaseConnection,
    id: i64,
    dto: &PositionDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::error::RepoError;
    use crate::shared::data::test_support::setup;

    fn dto(name: &str, description: &str) -> PositionDto {
        PositionDto {
            id: None,
            name: name.into(),
            description: description.into(),
        }
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let (db, user) = setup().await;
        let id = add(&db, &dto("Manager", "Runs the store"), Some(user))
            .await
            .unwrap();

        let position = get_by_id(&db, id).await.unwrap();
        assert_eq!(position.id, PositionId(id));
        assert_eq!(position.name, "Manager");
        assert_eq!(position.description, "Runs the store");
        assert_eq!(position.audit.create_user, Some(user));
        assert_eq!(get_by_name(&db, "Manager").await.unwrap(), position);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_storage_error() {
        let (db, user) = setup().await;
        add(&db, &dto("Manager", ""), Some(user)).await.unwrap();

        let err = add(&db, &dto("Manager", "again"), Some(user))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));

        // the failed insert was rolled back
        let (paginator, _) = get_all(&db, &ListQuery::new()).await.unwrap();
        assert_eq!(paginator.total_count, 1);
    }

    #[tokio::test]
    async fn test_update_without_existence_check() {
        let (db, user) = setup().await;
        let id = add(&db, &dto("Clerk", ""), None).await.unwrap();

        update(&db, id, &dto("Senior clerk", "Files reports"), Some(user))
            .await
            .unwrap();
        let position = get_by_id(&db, id).await.unwrap();
        assert_eq!(position.name, "Senior clerk");
        assert_eq!(position.audit.update_user, Some(user));
        assert_eq!(position.audit.create_user, None);

        assert_eq!(update(&db, id + 50, &dto("Ghost", ""), None).await.unwrap(), id + 50);
    }

    #[tokio::test]
    async fn test_list_with_description_filter() {
        let (db, user) = setup().await;
        add(&db, &dto("Manager", "office"), Some(user)).await.unwrap();
        add(&db, &dto("Driver", "field"), Some(user)).await.unwrap();
        add(&db, &dto("Accountant", "office"), Some(user)).await.unwrap();

        let request = ListQuery::new()
            .filter("Description", "office")
            .sort(["Name"], ["asc"]);
        let (paginator, positions) = get_all(&db, &request).await.unwrap();
        assert_eq!(paginator.total_count, 2);
        assert_eq!(positions[0].name, "Accountant");
        assert_eq!(positions[1].name, "Manager");

        let request = ListQuery::new().filter("CreateUser", user.value());
        let (paginator, _) = get_all(&db, &request).await.unwrap();
        assert_eq!(paginator.total_count, 3);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let (db, _) = setup().await;
        assert!(delete(&db, 1).await.unwrap_err().is_not_found());
    }
}
