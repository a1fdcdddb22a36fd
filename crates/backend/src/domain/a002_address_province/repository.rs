use std::collections::HashMap;

use contracts::domain::a001_address_country::AddressCountryId;
use contracts::domain::a002_address_province::{
    AddressProvince, AddressProvinceDto, AddressProvinceId,
};
use contracts::domain::common::AuditInfo;
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryOrder};

use crate::domain::a001_address_country::repository as country;
use crate::shared::data::audit::{audited_active_model, user_column};
use crate::shared::data::crud;
use crate::shared::data::error::{RepoError, RepoResult};
use crate::shared::list_query::{fetch_page, FieldKind, FieldMap};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "address_province")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub country_id: Option<i64>,
    pub create_user_id: Option<i64>,
    pub update_user_id: Option<i64>,
    pub create_date: DateTimeUtc,
    pub update_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::a001_address_country::repository::Entity",
        from = "Column::CountryId",
        to = "crate::domain::a001_address_country::repository::Column::Id"
    )]
    Country,
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

impl Related<country::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Country.def()
    }
}

audited_active_model!();

/// Поля, доступные для фильтрации и сортировки
pub fn field_map() -> FieldMap<Entity> {
    FieldMap::new()
        .column("Id", Column::Id, FieldKind::I64)
        .column("Name", Column::Name, FieldKind::String)
        .column("Country", Column::CountryId, FieldKind::I64)
        .related::<country::Entity>(
            "Country.Id",
            || Relation::Country.def(),
            country::Column::Id,
            FieldKind::I64,
        )
        .related::<country::Entity>(
            "Country.Name",
            || Relation::Country.def(),
            country::Column::Name,
            FieldKind::String,
        )
        .audit_columns(
            Column::CreateUserId,
            Column::UpdateUserId,
            Column::CreateDate,
            Column::UpdateDate,
        )
}

pub(crate) fn to_aggregate(m: Model, country_name: Option<String>) -> AddressProvince {
    AddressProvince {
        id: AddressProvinceId(m.id),
        name: m.name,
        country_id: m.country_id.map(AddressCountryId),
        country_name,
        audit: AuditInfo::new(
            m.create_user_id,
            m.update_user_id,
            m.create_date,
            m.update_date,
        ),
    }
}

impl From<Model> for AddressProvince {
    fn from(m: Model) -> Self {
        to_aggregate(m, None)
    }
}

// ============================================================================
// Repository functions
// ============================================================================

pub async fn add(
    db: &DatabaseConnection,
    dto: &AddressProvinceDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        country_id: Set(dto.country_id),
        create_user_id: user_column(acting_user),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    let inserted = crud::insert_in_transaction(db, active_model).await?;
    Ok(inserted.id)
}

/// Провинция вместе с названием страны
pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> RepoResult<AddressProvince> {
    match Entity::find_by_id(id)
        .find_also_related(country::Entity)
        .one(db)
        .await?
    {
        Some((m, country)) => Ok(to_aggregate(m, country.map(|c| c.name))),
        None => Err(RepoError::not_found(Entity.table_name(), id)),
    }
}

pub async fn get_all(
    db: &DatabaseConnection,
    request: &ListQuery,
) -> RepoResult<(Paginator, Vec<AddressProvince>)> {
    let (paginator, models) = fetch_page(db, Entity::find(), &field_map(), request).await?;

    let country_ids: Vec<i64> = models.iter().filter_map(|m| m.country_id).collect();
    let country_names: HashMap<i64, String> = if country_ids.is_empty() {
        HashMap::new()
    } else {
        country::Entity::find()
            .filter(country::Column::Id.is_in(country_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect()
    };

    let provinces = models
        .into_iter()
        .map(|m| {
            let name = m.country_id.and_then(|id| country_names.get(&id).cloned());
            to_aggregate(m, name)
        })
        .collect();
    Ok((paginator, provinces))
}

/// Провинции нескольких стран одним запросом, по возрастанию id
pub async fn list_by_countries(
    db: &DatabaseConnection,
    country_ids: Vec<i64>,
) -> RepoResult<Vec<Model>> {
    if country_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::CountryId.is_in(country_ids))
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
    use crate::shared::data::test_support::setup;
    use crate::shared::list_query::ListQueryError;
    use contracts::domain::a001_address_country::AddressCountryDto;

    async fn add_country(db: &DatabaseConnection, user: UserId, name: &str) -> i64 {
        country::add(
            db,
            &AddressCountryDto {
                id: None,
                name: name.into(),
            },
            Some(user),
        )
        .await
        .unwrap()
    }

    async fn add_province(
        db: &DatabaseConnection,
        user: UserId,
        name: &str,
        country_id: Option<i64>,
    ) -> i64 {
        add(
            db,
            &AddressProvinceDto {
                id: None,
                name: name.into(),
                country_id,
            },
            Some(user),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_by_id_carries_country_name() {
        let (db, user) = setup().await;
        let de = add_country(&db, user, "Germany").await;
        let id = add_province(&db, user, "Bavaria", Some(de)).await;

        let province = get_by_id(&db, id).await.unwrap();
        assert_eq!(province.name, "Bavaria");
        assert_eq!(province.country_id, Some(AddressCountryId(de)));
        assert_eq!(province.country_name.as_deref(), Some("Germany"));
        assert_eq!(province.audit.create_user, Some(user));
    }

    #[tokio::test]
    async fn test_filter_and_sort_by_related_path() {
        let (db, user) = setup().await;
        let de = add_country(&db, user, "Germany").await;
        let fr = add_country(&db, user, "France").await;
        add_province(&db, user, "Bavaria", Some(de)).await;
        add_province(&db, user, "Saxony", Some(de)).await;
        add_province(&db, user, "Normandy", Some(fr)).await;
        add_province(&db, user, "Nowhere", None).await;

        let request = ListQuery::new()
            .filter("Country.Name", "Germany")
            .sort(["Name"], ["desc"]);
        let (paginator, provinces) = get_all(&db, &request).await.unwrap();
        assert_eq!(paginator.total_count, 2);
        let names: Vec<_> = provinces.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Saxony", "Bavaria"]);
        assert!(provinces
            .iter()
            .all(|p| p.country_name.as_deref() == Some("Germany")));

        let request = ListQuery::new().sort(["Country.Name", "Name"], ["asc", "asc"]);
        let (_, provinces) = get_all(&db, &request).await.unwrap();
        let names: Vec<_> = provinces.iter().map(|p| p.name.as_str()).collect();
        // NULL sorts first in SQLite
        assert_eq!(names, ["Nowhere", "Normandy", "Bavaria", "Saxony"]);
    }

    #[tokio::test]
    async fn test_exclude_and_null_lookup() {
        let (db, user) = setup().await;
        let de = add_country(&db, user, "Germany").await;
        add_province(&db, user, "Bavaria", Some(de)).await;
        add_province(&db, user, "Saxony", Some(de)).await;
        add_province(&db, user, "Nowhere", None).await;

        let request = ListQuery::new()
            .filter("Country__isnull", false)
            .exclude("Name__istartswith", "sax");
        let (paginator, provinces) = get_all(&db, &request).await.unwrap();
        assert_eq!(paginator.total_count, 1);
        assert_eq!(provinces[0].name, "Bavaria");
    }

    #[tokio::test]
    async fn test_unknown_related_field() {
        let (db, _) = setup().await;
        let request = ListQuery::new().filter("Country.Capital", "Berlin");
        let err = get_all(&db, &request).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Query(ListQueryError::UnknownField(ref path)) if path == "Country__Capital"
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (db, user) = setup().await;
        let id = add_province(&db, user, "Bavaria", None).await;

        assert!(delete(&db, id + 100).await.unwrap_err().is_not_found());
        assert!(get_by_id(&db, id).await.is_ok());

        delete(&db, id).await.unwrap();
        assert!(get_by_id(&db, id).await.unwrap_err().is_not_found());
    }
}
