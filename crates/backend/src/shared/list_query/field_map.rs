use std::collections::HashMap;
use std::marker::PhantomData;

use sea_orm::sea_query::{ColumnRef, DynIden, Expr, IntoIden};
use sea_orm::{EntityName, EntityTrait, RelationDef};

use super::ListQueryError;

/// Rewrites dot notation (`Province.Country`) to the storage path separator
/// (`Province__Country`).
pub fn to_storage_path(path: &str) -> String {
    path.replace('.', "__")
}

fn registry_key(path: &str) -> String {
    to_storage_path(path.trim()).to_lowercase()
}

/// Logical type of a field, used to coerce untyped request values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    I64,
    F64,
    Bool,
    DateTimeUtc,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::I64 => "integer",
            FieldKind::F64 => "number",
            FieldKind::Bool => "boolean",
            FieldKind::DateTimeUtc => "RFC 3339 datetime",
        }
    }
}

/// Relation that has to be joined before a related column can be used.
#[derive(Clone)]
pub struct Join {
    /// Related table name, used to join each relation once
    pub key: String,
    pub relation: fn() -> RelationDef,
}

/// A resolved field: the qualified column plus the join it needs, if any.
#[derive(Clone)]
pub struct Field {
    pub kind: FieldKind,
    table: DynIden,
    column: DynIden,
    join: Option<Join>,
}

impl Field {
    /// `"table"."column"` expression for conditions and ordering.
    pub fn expr(&self) -> Expr {
        Expr::col(ColumnRef::TableColumn(
            self.table.clone(),
            self.column.clone(),
        ))
    }

    pub fn join(&self) -> Option<&Join> {
        self.join.as_ref()
    }
}

/// Field registry of one entity.
///
/// Maps API paths (case-insensitive, dot or `__` form) to columns of the
/// entity itself or of a directly related table:
///
/// ```ignore
/// FieldMap::<Entity>::new()
///     .column("Name", Column::Name, FieldKind::String)
///     .column("Country", Column::CountryId, FieldKind::I64)
///     .related::<country::Entity>(
///         "Country.Name",
///         || Relation::Country.def(),
///         country::Column::Name,
///         FieldKind::String,
///     )
/// ```
pub struct FieldMap<E: EntityTrait> {
    fields: HashMap<String, Field>,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            _entity: PhantomData,
        }
    }

    /// Register a column of the entity's own table.
    pub fn column(mut self, path: &str, column: E::Column, kind: FieldKind) -> Self {
        self.fields.insert(
            registry_key(path),
            Field {
                kind,
                table: E::default().into_iden(),
                column: column.into_iden(),
                join: None,
            },
        );
        self
    }

    /// Register the audit columns shared by every table.
    pub fn audit_columns(
        self,
        create_user: E::Column,
        update_user: E::Column,
        create_date: E::Column,
        update_date: E::Column,
    ) -> Self {
        self.column("CreateUser", create_user, FieldKind::I64)
            .column("UpdateUser", update_user, FieldKind::I64)
            .column("CreateDate", create_date, FieldKind::DateTimeUtc)
            .column("UpdateDate", update_date, FieldKind::DateTimeUtc)
    }

    /// Register a column of a directly related table reached through `relation`.
    pub fn related<R: EntityTrait>(
        mut self,
        path: &str,
        relation: fn() -> RelationDef,
        column: R::Column,
        kind: FieldKind,
    ) -> Self {
        let related = R::default();
        let join = Join {
            key: related.table_name().to_owned(),
            relation,
        };
        self.fields.insert(
            registry_key(path),
            Field {
                kind,
                table: related.into_iden(),
                column: column.into_iden(),
                join: Some(join),
            },
        );
        self
    }

    pub fn get(&self, path: &str) -> Option<&Field> {
        self.fields.get(&registry_key(path))
    }

    pub fn resolve(&self, path: &str) -> Result<&Field, ListQueryError> {
        self.get(path)
            .ok_or_else(|| ListQueryError::UnknownField(to_storage_path(path)))
    }
}
