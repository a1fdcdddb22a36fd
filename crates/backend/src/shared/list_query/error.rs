use thiserror::Error;

/// Ошибки построения запроса списка. Все они возникают до обращения к БД.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListQueryError {
    #[error("invalid order '{0}': must be either [asc|desc]")]
    InvalidOrder(String),

    #[error("'sortby' ({sortby}), 'order' ({order}) sizes mismatch or 'order' size is not 1")]
    OrderSizeMismatch { sortby: usize, order: usize },

    #[error("unused 'order' fields")]
    UnusedOrder,

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("operator '{op}' is not supported for field '{field}'")]
    UnsupportedOperator { field: String, op: String },

    #[error("invalid value for field '{field}': expected {expected}, got {got}")]
    InvalidValue {
        field: String,
        expected: &'static str,
        got: String,
    },
}
