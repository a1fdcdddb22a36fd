//! In-memory database for repository tests.

use contracts::system::users::{CreateUserDto, UserId};
use sea_orm::DatabaseConnection;

use super::db::connect;
use super::schema::register_schema;
use crate::system::users::repository as users;

/// Fresh in-memory database with the full schema and one acting user.
pub async fn setup() -> (DatabaseConnection, UserId) {
    let db = connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    register_schema(&db).await.expect("register schema");
    let user = users::add(
        &db,
        &CreateUserDto {
            username: "tester".into(),
            full_name: Some("Test User".into()),
        },
    )
    .await
    .expect("create acting user");
    (db, user)
}
