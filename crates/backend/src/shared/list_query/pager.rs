use contracts::shared::list_query::{ListQuery, Paginator};
use sea_orm::sea_query::{Order, OrderedStatement, SimpleExpr};
use sea_orm::{
    Condition, ConnectionTrait, EntityName, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QuerySelect, QueryTrait, Select,
};
use serde_json::{Map, Value as JsonValue};

use super::field_map::{FieldMap, Join};
use super::filter::{predicate, split_key};
use super::order::{reconcile, SortDir};
use super::ListQueryError;
use crate::shared::data::error::RepoResult;

/// A list request compiled against an entity's field registry.
///
/// Compilation validates the whole request, so a `CompiledQuery` can be
/// applied to storage without further failures of its own.
pub struct CompiledQuery {
    condition: Condition,
    order: Vec<(SimpleExpr, Order)>,
    joins: Vec<Join>,
}

impl CompiledQuery {
    pub fn compile<E: EntityTrait>(
        fields: &FieldMap<E>,
        request: &ListQuery,
    ) -> Result<Self, ListQueryError> {
        let mut joins: Vec<Join> = Vec::new();

        let sort_keys = reconcile(&request.sortby, &request.order)?;

        for name in &request.fields {
            fields.resolve(name)?;
        }

        let mut condition = Condition::all();

        if !request.cond.is_empty() {
            let mut group = Condition::any();
            if !request.cond.and.is_empty() {
                let mut all = Condition::all();
                for expr in predicates(fields, &request.cond.and, &mut joins)? {
                    all = all.add(expr);
                }
                group = group.add(all);
            }
            for expr in predicates(fields, &request.cond.or, &mut joins)? {
                group = group.add(expr);
            }
            condition = condition.add(group);
        }

        for expr in predicates(fields, &request.query, &mut joins)? {
            condition = condition.add(expr);
        }

        for expr in predicates(fields, &request.exclude, &mut joins)? {
            condition = condition.add(Condition::all().add(expr).not());
        }

        let mut order = Vec::with_capacity(sort_keys.len());
        for key in &sort_keys {
            let field = fields.resolve(&key.path)?;
            push_join(&mut joins, field.join());
            let dir = match key.dir {
                SortDir::Asc => Order::Asc,
                SortDir::Desc => Order::Desc,
            };
            order.push((SimpleExpr::from(field.expr()), dir));
        }

        Ok(Self {
            condition,
            order,
            joins,
        })
    }

    pub fn apply<E: EntityTrait>(self, select: Select<E>) -> Select<E> {
        let mut select = select;
        for join in &self.joins {
            select = select.join(JoinType::LeftJoin, (join.relation)());
        }
        select = select.filter(self.condition);
        for (expr, dir) in self.order {
            QueryTrait::query(&mut select).order_by_expr(expr, dir);
        }
        select
    }
}

fn push_join(joins: &mut Vec<Join>, join: Option<&Join>) {
    if let Some(join) = join {
        if !joins.iter().any(|j| j.key == join.key) {
            joins.push(join.clone());
        }
    }
}

fn predicates<E: EntityTrait>(
    fields: &FieldMap<E>,
    map: &Map<String, JsonValue>,
    joins: &mut Vec<Join>,
) -> Result<Vec<SimpleExpr>, ListQueryError> {
    map.iter()
        .map(|(key, value)| {
            let (path, op) = split_key(key);
            let field = fields.resolve(&path)?;
            push_join(joins, field.join());
            predicate(field, &path, op, value)
        })
        .collect()
}

/// Runs a list request: validates it, counts the matching rows and, when
/// there are any, fetches exactly one page.
///
/// `select` is the entity's base query; the request's conditions, joins and
/// ordering are layered on top of it.
pub async fn fetch_page<E, C>(
    db: &C,
    select: Select<E>,
    fields: &FieldMap<E>,
    request: &ListQuery,
) -> RepoResult<(Paginator, Vec<E::Model>)>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let compiled = CompiledQuery::compile(fields, request)?;
    let select = compiled.apply(select);

    let limit = request.effective_limit();
    let total = select.clone().count(db).await?;
    if total == 0 {
        return Ok((Paginator::default(), Vec::new()));
    }

    let mut paginator = Paginator::new(limit, request.offset, total);
    let rows = select
        .offset(request.offset)
        .limit(limit)
        .all(db)
        .await?;
    paginator.current_page_size = rows.len() as u64;

    tracing::debug!(
        table = %E::default().table_name(),
        total,
        page_size = paginator.current_page_size,
        "list query"
    );

    Ok((paginator, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_address_province::repository as province;
    use sea_orm::{DatabaseBackend, EntityTrait, QueryTrait};

    fn sql(request: &ListQuery) -> String {
        let compiled = CompiledQuery::compile(&province::field_map(), request).unwrap();
        compiled
            .apply(province::Entity::find())
            .build(DatabaseBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_related_path_adds_single_join() {
        let request = ListQuery::new()
            .filter("Country.Name", "France")
            .sort(["Country.Name"], ["desc"]);
        let sql = sql(&request);

        assert_eq!(sql.matches("LEFT JOIN").count(), 1);
        assert!(sql.contains(r#""address_country"."name" = 'France'"#));
        assert!(sql.contains(r#"ORDER BY "address_country"."name" DESC"#));
    }

    #[test]
    fn test_exclude_is_negated() {
        let request = ListQuery::new().exclude("Name", "Bavaria");
        let sql = sql(&request);
        assert!(sql.contains("NOT"));
        assert!(sql.contains("'Bavaria'"));
    }

    #[test]
    fn test_and_group_or_items() {
        let request = ListQuery::new()
            .and("Name", "A")
            .and("Country", 1)
            .or("Name", "B");
        let sql = sql(&request);
        assert!(sql.contains(" OR "));
        assert!(sql.contains(" AND "));
    }

    #[test]
    fn test_order_errors_win_before_field_resolution() {
        let request = ListQuery::new().sort(["Nope"], ["sideways"]);
        let err = CompiledQuery::compile(&province::field_map(), &request)
            .err()
            .unwrap();
        assert_eq!(err, ListQueryError::InvalidOrder("sideways".to_string()));
    }

    #[test]
    fn test_unknown_requested_field() {
        let mut request = ListQuery::new();
        request.fields = vec!["Name".to_string(), "Population".to_string()];
        let err = CompiledQuery::compile(&province::field_map(), &request)
            .err()
            .unwrap();
        assert_eq!(err, ListQueryError::UnknownField("Population".to_string()));
    }

    #[test]
    fn test_text_operator_on_integer_field() {
        let request = ListQuery::new().filter("Country__contains", "1");
        let err = CompiledQuery::compile(&province::field_map(), &request)
            .err()
            .unwrap();
        assert!(matches!(err, ListQueryError::UnsupportedOperator { .. }));
    }
}
