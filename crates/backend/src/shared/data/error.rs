use sea_orm::DbErr;
use thiserror::Error;

use crate::shared::list_query::ListQueryError;

/// Ошибки слоя доступа к данным
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    #[error(transparent)]
    Query(#[from] ListQueryError),

    /// Ошибки хранилища (ограничения, соединение) передаются как есть
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl RepoError {
    pub fn not_found(entity: impl Into<String>, key: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
