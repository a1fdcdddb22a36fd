use anyhow::Result;
use contracts::domain::a001_address_country::AddressCountryDto;
use contracts::domain::a002_address_province::AddressProvinceDto;
use contracts::domain::a003_position::PositionDto;
use contracts::domain::a005_product_attribute::ProductAttributeDto;
use contracts::domain::a006_product_attribute_value::ProductAttributeValueDto;
use contracts::domain::a007_product_attribute_line::ProductAttributeLineDto;
use contracts::domain::a008_product_product::ProductProductDto;
use contracts::system::users::{CreateUserDto, UserId};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::domain::{
    a001_address_country, a002_address_province, a003_position, a005_product_attribute,
    a006_product_attribute_value, a007_product_attribute_line, a008_product_product,
};
use crate::shared::data::db::get_connection;
use crate::system::users::{repository as users, service as users_service};

/// Ensure admin user exists (create if table is empty)
pub async fn ensure_admin_user_exists() -> Result<UserId> {
    let db = get_connection()?;

    if users::count_users(db).await? == 0 {
        tracing::info!("No users found. Creating default admin user...");
        let admin_id = users_service::create(CreateUserDto {
            username: "admin".to_string(),
            full_name: Some("Administrator".to_string()),
        })
        .await?;
        tracing::info!("Default admin user created (id {})", admin_id.0);
        return Ok(admin_id);
    }

    users_service::get_by_username("admin")
        .await?
        .map(|u| u.id)
        .ok_or_else(|| anyhow::anyhow!("Users exist but 'admin' is missing"))
}

/// Демо-данные для пустой базы. Повторный запуск ничего не добавляет.
pub async fn seed_demo_data(admin: UserId) -> Result<()> {
    let db = get_connection()?;
    if a001_address_country::repository::Entity::find()
        .count(db)
        .await?
        > 0
    {
        tracing::info!("Demo data skipped: countries already present");
        return Ok(());
    }
    seed(db, Some(admin)).await?;
    tracing::info!("Demo data seeded");
    Ok(())
}

async fn seed(db: &DatabaseConnection, user: Option<UserId>) -> Result<()> {
    let countries = [
        ("Germany", &["Bavaria", "Saxony", "Hesse"][..]),
        ("France", &["Normandy", "Brittany"][..]),
        ("Italy", &["Tuscany"][..]),
    ];
    for (country, provinces) in countries {
        let country_id = a001_address_country::repository::add(
            db,
            &AddressCountryDto {
                id: None,
                name: country.into(),
            },
            user,
        )
        .await?;
        for province in provinces {
            a002_address_province::repository::add(
                db,
                &AddressProvinceDto {
                    id: None,
                    name: (*province).into(),
                    country_id: Some(country_id),
                },
                user,
            )
            .await?;
        }
    }

    let positions = [
        ("Accountant", "Bookkeeping and reporting"),
        ("Storekeeper", "Warehouse receipts and shipments"),
        ("Sales manager", ""),
    ];
    for (position, description) in positions {
        a003_position::repository::add(
            db,
            &PositionDto {
                id: None,
                name: position.into(),
                description: description.into(),
            },
            user,
        )
        .await?;
    }

    let attributes = [
        ("Color", "COL", &["Red", "Green", "Blue"][..]),
        ("Size", "SZ", &["S", "M", "L", "XL"][..]),
    ];
    for (sequence, (name, code, values)) in attributes.into_iter().enumerate() {
        let attribute_id = a005_product_attribute::repository::add(
            db,
            &ProductAttributeDto {
                id: None,
                name: name.into(),
                code: Some(code.into()),
                sequence: sequence as i32,
            },
            user,
        )
        .await?;
        for (value_seq, value) in values.iter().enumerate() {
            a006_product_attribute_value::repository::add(
                db,
                &ProductAttributeValueDto {
                    name: (*value).into(),
                    attribute_id,
                    sequence: value_seq as i32,
                },
                user,
            )
            .await?;
        }

        a007_product_attribute_line::service::add_counted(
            db,
            &ProductAttributeLineDto {
                attribute_id,
                template_id: 1,
            },
            user,
        )
        .await?;
        let product_id = a008_product_product::repository::add(
            db,
            &ProductProductDto {
                name: format!("T-shirt ({})", name),
                default_code: format!("TS-{}", code),
            },
            user,
        )
        .await?;
        a008_product_product::service::link_counted(db, product_id, attribute_id, user).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::test_support::setup;
    use contracts::shared::list_query::ListQuery;

    #[tokio::test]
    async fn test_seed_fills_every_table() {
        let (db, user) = setup().await;
        seed(&db, Some(user)).await.unwrap();

        let (paginator, countries) =
            a001_address_country::repository::get_all(&db, &ListQuery::new())
                .await
                .unwrap();
        assert_eq!(paginator.total_count, 3);
        let germany = countries.iter().find(|c| c.name == "Germany").unwrap();
        assert_eq!(germany.provinces.len(), 3);

        let color = a005_product_attribute::repository::get_by_name(&db, "Color")
            .await
            .unwrap();
        assert_eq!(color.code, "COL");
        assert_eq!(color.values.len(), 3);
        assert_eq!(color.templates_count, 1);
        assert_eq!(color.products_count, 1);
    }
}
