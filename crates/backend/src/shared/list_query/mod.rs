//! Generic list query builder: filter / exclude / AND-OR conditions,
//! sort-order reconciliation and pagination over any sea-orm entity.

pub mod error;
pub mod field_map;
pub mod filter;
pub mod order;
pub mod pager;

pub use error::ListQueryError;
pub use field_map::{to_storage_path, Field, FieldKind, FieldMap};
pub use filter::{split_key, Operator};
pub use order::{order_clause, reconcile, SortDir, SortKey};
pub use pager::{fetch_page, CompiledQuery};
