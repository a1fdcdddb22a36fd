use std::collections::HashMap;

use contracts::domain::a001_address_country::{
    AddressCountry, AddressCountryDto, AddressCountryId,
};
use contracts::domain::a002_address_province::AddressProvince;
use contracts::domain::common::AuditInfo;
use contracts::shared::list_query::{ListQuery, Paginator};
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

use crate::domain::a002_address_province::repository as province;
use crate::shared::data::audit::{audited_active_model, user_column};
use crate::shared::data::crud;
use crate::shared::data::error::RepoResult;
use crate::shared::list_query::{fetch_page, FieldKind, FieldMap};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "address_country")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "String(Some(50))")]
    pub name: String,
    pub create_user_id: Option<i64>,
    pub update_user_id: Option<i64>,
    pub create_date: DateTimeUtc,
    pub update_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::a002_address_province::repository::Entity")]
    Province,
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

impl Related<province::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Province.def()
    }
}

audited_active_model!();

pub fn field_map() -> FieldMap<Entity> {
    FieldMap::new()
        .column("Id", Column::Id, FieldKind::I64)
        .column("Name", Column::Name, FieldKind::String)
        .audit_columns(
            Column::CreateUserId,
            Column::UpdateUserId,
            Column::CreateDate,
            Column::UpdateDate,
        )
}

fn to_aggregate(m: Model, provinces: Vec<province::Model>) -> AddressCountry {
    let provinces: Vec<AddressProvince> = provinces
        .into_iter()
        .map(|p| province::to_aggregate(p, Some(m.name.clone())))
        .collect();
    AddressCountry {
        id: AddressCountryId(m.id),
        name: m.name,
        provinces,
        audit: AuditInfo::new(
            m.create_user_id,
            m.update_user_id,
            m.create_date,
            m.update_date,
        ),
    }
}

/// Присоединить провинции к странам (один запрос на страницу)
async fn with_provinces(
    db: &DatabaseConnection,
    models: Vec<Model>,
) -> RepoResult<Vec<AddressCountry>> {
    let ids = models.iter().map(|m| m.id).collect();
    let mut by_country: HashMap<i64, Vec<province::Model>> = HashMap::new();
    for p in province::list_by_countries(db, ids).await? {
        if let Some(country_id) = p.country_id {
            by_country.entry(country_id).or_default().push(p);
        }
    }
    Ok(models
        .into_iter()
        .map(|m| {
            let provinces = by_country.remove(&m.id).unwrap_or_default();
            to_aggregate(m, provinces)
        })
        .collect())
}

// ============================================================================
// Repository functions
// ============================================================================

/// Добавить страну, вернуть её id
pub async fn add(
    db: &DatabaseConnection,
    dto: &AddressCountryDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        create_user_id: user_column(acting_user),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    let inserted = crud::insert_in_transaction(db, active_model).await?;
    Ok(inserted.id)
}

/// Страна вместе с провинциями
pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> RepoResult<AddressCountry> {
    let model = crud::find_existing::<Entity>(db, id).await?;
    let provinces = province::list_by_countries(db, vec![model.id]).await?;
    Ok(to_aggregate(model, provinces))
}

pub async fn get_by_name(db: &DatabaseConnection, name: &str) -> RepoResult<AddressCountry> {
    let model = Entity::find().filter(Column::Name.eq(name)).one(db).await?;
    let model = crud::found::<Entity>(model, name)?;
    let provinces = province::list_by_countries(db, vec![model.id]).await?;
    Ok(to_aggregate(model, provinces))
}

pub async fn get_all(
    db: &DatabaseConnection,
    request: &ListQuery,
) -> RepoResult<(Paginator, Vec<AddressCountry>)> {
    let (paginator, models) = fetch_page(db, Entity::find(), &field_map(), request).await?;
    let countries = with_provinces(db, models).await?;
    Ok((paginator, countries))
}

/// Обновить страну. Существование записи не проверяется: отсутствующий id
/// не изменяет ни одной строки и всё равно возвращается.
pub async fn update(
    db: &DatabaseConnection,
    id: i64,
    dto: &AddressCountryDto,
    acting_user: Option<UserId>,
) -> RepoResult<i64> {
    let active_model = ActiveModel {
        name: Set(dto.name.trim().to_string()),
        update_user_id: user_column(acting_user),
        ..Default::default()
    };
    crud::update_by_id(db, Column::Id, id, active_model).await?;
    Ok(id)
}

/// Удалить страну. Страна с провинциями не удаляется (ограничение внешнего ключа).
pub async fn delete(db: &DatabaseConnection, id: i64) -> RepoResult<()> {
    crud::delete_existing::<Entity>(db, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect;
    use crate::shared::data::error::RepoError;
    use crate::shared::data::test_support::setup;
    use crate::shared::list_query::ListQueryError;
    use contracts::domain::a002_address_province::AddressProvinceDto;
    use contracts::shared::list_query::DEFAULT_LIMIT;

    fn dto(name: &str) -> AddressCountryDto {
        AddressCountryDto {
            id: None,
            name: name.into(),
        }
    }

    async fn add_province(db: &DatabaseConnection, user: UserId, name: &str, country: i64) {
        province::add(
            db,
            &AddressProvinceDto {
                id: None,
                name: name.into(),
                country_id: Some(country),
            },
            Some(user),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_add_then_get_by_id() {
        let (db, user) = setup().await;
        let id = add(&db, &dto("Россия"), Some(user)).await.unwrap();

        let country = get_by_id(&db, id).await.unwrap();
        assert_eq!(country.id, AddressCountryId(id));
        assert_eq!(country.name, "Россия");
        assert!(country.provinces.is_empty());
        assert_eq!(country.audit.create_user, Some(user));
        assert_eq!(country.audit.update_user, Some(user));
        assert_eq!(country.audit.create_date, country.audit.update_date);

        assert_eq!(get_by_name(&db, "Россия").await.unwrap(), country);
        assert!(get_by_name(&db, "Атлантида").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_by_id_loads_provinces() {
        let (db, user) = setup().await;
        let id = add(&db, &dto("Germany"), Some(user)).await.unwrap();
        add_province(&db, user, "Bavaria", id).await;
        add_province(&db, user, "Saxony", id).await;

        let country = get_by_id(&db, id).await.unwrap();
        let names: Vec<_> = country.provinces.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Bavaria", "Saxony"]);
        assert_eq!(
            country.provinces[0].country_name.as_deref(),
            Some("Germany")
        );
    }

    #[tokio::test]
    async fn test_update_restamps_updater_only() {
        let (db, user) = setup().await;
        let id = add(&db, &dto("Germany"), None).await.unwrap();
        let before = get_by_id(&db, id).await.unwrap();

        let returned = update(&db, id, &dto("Deutschland"), Some(user))
            .await
            .unwrap();
        assert_eq!(returned, id);

        let after = get_by_id(&db, id).await.unwrap();
        assert_eq!(after.name, "Deutschland");
        assert_eq!(after.audit.create_user, None);
        assert_eq!(after.audit.update_user, Some(user));
        assert_eq!(after.audit.create_date, before.audit.create_date);
        assert!(after.audit.update_date >= after.audit.create_date);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_silent() {
        let (db, user) = setup().await;
        let returned = update(&db, 4242, &dto("Nowhere"), Some(user))
            .await
            .unwrap();
        assert_eq!(returned, 4242);
        assert!(get_by_id(&db, 4242).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, user) = setup().await;
        let id = add(&db, &dto("France"), Some(user)).await.unwrap();

        let err = delete(&db, id + 1).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(get_by_id(&db, id).await.is_ok());

        delete(&db, id).await.unwrap();
        assert!(get_by_id(&db, id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_with_provinces_is_storage_error() {
        let (db, user) = setup().await;
        let id = add(&db, &dto("Germany"), Some(user)).await.unwrap();
        add_province(&db, user, "Bavaria", id).await;

        let err = delete(&db, id).await.unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
        assert!(get_by_id(&db, id).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_list() {
        let (db, _) = setup().await;
        let (paginator, countries) = get_all(&db, &ListQuery::new()).await.unwrap();
        assert_eq!(paginator, Paginator::default());
        assert!(countries.is_empty());
    }

    #[tokio::test]
    async fn test_default_limit_and_paging() {
        let (db, user) = setup().await;
        for i in 0..25 {
            add(&db, &dto(&format!("Country {:02}", i)), Some(user))
                .await
                .unwrap();
        }

        let (paginator, page) = get_all(&db, &ListQuery::new()).await.unwrap();
        assert_eq!(paginator.total_count, 25);
        assert_eq!(paginator.limit, DEFAULT_LIMIT);
        assert_eq!(paginator.current_page_size, 20);
        assert_eq!(paginator.total_page, 2);
        assert!(paginator.has_next);
        assert_eq!(page.len(), 20);

        let request = ListQuery::new().sort(["Name"], ["asc"]).page(20, 0);
        let (paginator, page) = get_all(&db, &request).await.unwrap();
        assert_eq!(paginator.current_page, 2);
        assert_eq!(paginator.current_page_size, 5);
        assert!(!paginator.has_next);
        assert_eq!(page[0].name, "Country 20");
    }

    #[tokio::test]
    async fn test_single_direction_applies_to_all_fields() {
        let (db, user) = setup().await;
        for name in ["Chile", "Austria", "Brazil"] {
            add(&db, &dto(name), Some(user)).await.unwrap();
        }

        let request = ListQuery::new().sort(["Name", "Id"], ["desc"]);
        let (_, countries) = get_all(&db, &request).await.unwrap();
        let names: Vec<_> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Chile", "Brazil", "Austria"]);
    }

    #[tokio::test]
    async fn test_cond_group() {
        let (db, user) = setup().await;
        for name in ["Austria", "Australia", "Brazil", "Chile"] {
            add(&db, &dto(name), Some(user)).await.unwrap();
        }

        // (Name LIKE 'Aus%' AND Name LIKE '%ia') OR Name = 'Chile'
        let request = ListQuery::new()
            .and("Name__startswith", "Aus")
            .and("Name__endswith", "ia")
            .or("Name", "Chile")
            .sort(["Name"], ["asc"]);
        let (paginator, countries) = get_all(&db, &request).await.unwrap();
        let names: Vec<_> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Australia", "Austria", "Chile"]);
        assert_eq!(paginator.total_count, 3);

        // include filters are AND-ed with the group
        let request = request.filter("Name__icontains", "CHI");
        let (_, countries) = get_all(&db, &request).await.unwrap();
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].name, "Chile");
    }

    #[tokio::test]
    async fn test_in_lookup() {
        let (db, user) = setup().await;
        let a = add(&db, &dto("Austria"), Some(user)).await.unwrap();
        add(&db, &dto("Brazil"), Some(user)).await.unwrap();
        let c = add(&db, &dto("Chile"), Some(user)).await.unwrap();

        let request = ListQuery::new().filter("Id__in", serde_json::json!([a, c]));
        let (paginator, _) = get_all(&db, &request).await.unwrap();
        assert_eq!(paginator.total_count, 2);
    }

    #[tokio::test]
    async fn test_list_loads_provinces() {
        let (db, user) = setup().await;
        let de = add(&db, &dto("Germany"), Some(user)).await.unwrap();
        let fr = add(&db, &dto("France"), Some(user)).await.unwrap();
        add_province(&db, user, "Bavaria", de).await;
        add_province(&db, user, "Normandy", fr).await;
        add_province(&db, user, "Saxony", de).await;

        let (_, countries) = get_all(&db, &ListQuery::new().sort(["Id"], ["asc"]))
            .await
            .unwrap();
        assert_eq!(countries[0].provinces.len(), 2);
        assert_eq!(countries[1].provinces.len(), 1);
        assert_eq!(countries[1].provinces[0].name, "Normandy");
    }

    #[tokio::test]
    async fn test_sort_errors_precede_storage_access() {
        // No schema: any storage access would fail with a database error
        let db = connect("sqlite::memory:").await.unwrap();

        let request = ListQuery::new().sort(["Name"], ["up"]);
        let err = get_all(&db, &request).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid order 'up': must be either [asc|desc]"
        );

        let request = ListQuery::new().sort(["Name", "Id", "Code"], ["asc", "desc"]);
        let err = get_all(&db, &request).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "'sortby' (3), 'order' (2) sizes mismatch or 'order' size is not 1"
        );

        let request = ListQuery::new().sort(Vec::<String>::new(), ["asc"]);
        let err = get_all(&db, &request).await.unwrap_err();
        assert!(matches!(err, RepoError::Query(ListQueryError::UnusedOrder)));
        assert_eq!(err.to_string(), "unused 'order' fields");

        let err = get_all(&db, &ListQuery::new()).await.unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
    }
}
