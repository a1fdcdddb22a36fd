//! Общие операции над одной записью, одинаковые для всех справочников.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityName, EntityTrait, IntoActiveModel, PrimaryKeyTrait, QueryFilter, TransactionTrait,
};

use super::error::{RepoError, RepoResult};

/// `BEGIN; INSERT; COMMIT`.
///
/// A failed insert is rolled back and its error returned, unless the
/// rollback fails too; then the rollback error is returned. A failed commit
/// returns the commit error.
///
/// Inside an open transaction the insert runs in a savepoint.
pub async fn insert_in_transaction<C, A>(
    db: &C,
    model: A,
) -> RepoResult<<A::Entity as EntityTrait>::Model>
where
    C: ConnectionTrait + TransactionTrait,
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let txn = db.begin().await?;
    match model.insert(&txn).await {
        Ok(inserted) => {
            txn.commit().await?;
            Ok(inserted)
        }
        Err(err) => {
            txn.rollback().await?;
            Err(err.into())
        }
    }
}

/// Turns an optional lookup result into `NotFound` keyed by the entity's
/// table name.
pub fn found<E: EntityTrait>(model: Option<E::Model>, key: impl ToString) -> RepoResult<E::Model> {
    model.ok_or_else(|| RepoError::not_found(E::default().table_name(), key))
}

/// Reads a record by primary key.
pub async fn find_existing<E>(db: &impl ConnectionTrait, id: i64) -> RepoResult<E::Model>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    let model = E::find_by_id(id).one(db).await?;
    found::<E>(model, id)
}

/// Deletes a record after checking that it exists; a missing id leaves
/// storage untouched.
pub async fn delete_existing<E>(db: &DatabaseConnection, id: i64) -> RepoResult<()>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    find_existing::<E>(db, id).await?;
    let result = E::delete_by_id(id).exec(db).await?;
    tracing::debug!(
        "Number of records deleted in {}: {}",
        E::default().table_name(),
        result.rows_affected
    );
    Ok(())
}

/// Writes the set columns of `model` onto row `id` and returns the number
/// of rows affected. Runs the save hook first so `update_date` is stamped.
///
/// Existence is not checked; a missing id simply affects zero rows.
pub async fn update_by_id<A>(
    db: &DatabaseConnection,
    id_column: <A::Entity as EntityTrait>::Column,
    id: i64,
    model: A,
) -> RepoResult<u64>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
{
    let model = model.before_save(db, false).await?;
    let result = <A::Entity as EntityTrait>::update_many()
        .set(model)
        .filter(id_column.eq(id))
        .exec(db)
        .await?;
    tracing::debug!(
        "Number of records updated in {}: {}",
        <A::Entity as Default>::default().table_name(),
        result.rows_affected
    );
    Ok(result.rows_affected)
}
