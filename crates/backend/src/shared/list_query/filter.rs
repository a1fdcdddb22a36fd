use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use serde_json::Value as JsonValue;

use super::field_map::{to_storage_path, Field, FieldKind};
use super::ListQueryError;

/// Lookup operator appended to a key as its last `__` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    IsNull,
}

impl Operator {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let op = match suffix.to_ascii_lowercase().as_str() {
            "exact" => Operator::Exact,
            "iexact" => Operator::IExact,
            "contains" => Operator::Contains,
            "icontains" => Operator::IContains,
            "startswith" => Operator::StartsWith,
            "istartswith" => Operator::IStartsWith,
            "endswith" => Operator::EndsWith,
            "iendswith" => Operator::IEndsWith,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "in" => Operator::In,
            "isnull" => Operator::IsNull,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Exact => "exact",
            Operator::IExact => "iexact",
            Operator::Contains => "contains",
            Operator::IContains => "icontains",
            Operator::StartsWith => "startswith",
            Operator::IStartsWith => "istartswith",
            Operator::EndsWith => "endswith",
            Operator::IEndsWith => "iendswith",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::IsNull => "isnull",
        }
    }

    fn is_text_match(self) -> bool {
        matches!(
            self,
            Operator::IExact
                | Operator::Contains
                | Operator::IContains
                | Operator::StartsWith
                | Operator::IStartsWith
                | Operator::EndsWith
                | Operator::IEndsWith
        )
    }
}

/// Splits a filter key into its storage path and operator:
/// `Country.Name__icontains` -> (`Country__Name`, `IContains`).
pub fn split_key(key: &str) -> (String, Operator) {
    let path = to_storage_path(key.trim());
    if let Some((head, tail)) = path.rsplit_once("__") {
        if !head.is_empty() {
            if let Some(op) = Operator::from_suffix(tail) {
                return (head.to_string(), op);
            }
        }
    }
    (path, Operator::Exact)
}

fn invalid(field: &str, kind: FieldKind, got: &JsonValue) -> ListQueryError {
    ListQueryError::InvalidValue {
        field: field.to_string(),
        expected: kind.name(),
        got: got.to_string(),
    }
}

/// Coerces an untyped request value into a bound SQL value. Numbers and
/// booleans sent as strings (query parameters) are accepted.
pub fn coerce(field: &str, kind: FieldKind, value: &JsonValue) -> Result<sea_orm::Value, ListQueryError> {
    let coerced = match (kind, value) {
        (FieldKind::String, JsonValue::String(s)) => Some(sea_orm::Value::from(s.clone())),
        (FieldKind::String, JsonValue::Number(n)) => Some(sea_orm::Value::from(n.to_string())),

        (FieldKind::I64, JsonValue::Number(n)) => n.as_i64().map(sea_orm::Value::from),
        (FieldKind::I64, JsonValue::String(s)) => s.trim().parse::<i64>().ok().map(sea_orm::Value::from),

        (FieldKind::F64, JsonValue::Number(n)) => n.as_f64().map(sea_orm::Value::from),
        (FieldKind::F64, JsonValue::String(s)) => s.trim().parse::<f64>().ok().map(sea_orm::Value::from),

        (FieldKind::Bool, _) => parse_bool(value).map(sea_orm::Value::from),

        (FieldKind::DateTimeUtc, JsonValue::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| sea_orm::Value::from(dt.with_timezone(&Utc))),

        _ => None,
    };
    coerced.ok_or_else(|| invalid(field, kind, value))
}

fn parse_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn text(field: &str, value: &JsonValue) -> Result<String, ListQueryError> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(invalid(field, FieldKind::String, other)),
    }
}

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn like(pattern: String) -> LikeExpr {
    LikeExpr::new(pattern).escape('\\')
}

fn lower(field: &Field) -> Expr {
    Expr::expr(Func::lower(field.expr()))
}

/// Builds the SQL predicate for `path <op> value` against a resolved field.
pub fn predicate(
    field: &Field,
    path: &str,
    op: Operator,
    value: &JsonValue,
) -> Result<SimpleExpr, ListQueryError> {
    if op.is_text_match() && field.kind != FieldKind::String {
        return Err(ListQueryError::UnsupportedOperator {
            field: path.to_string(),
            op: op.as_str().to_string(),
        });
    }
    if matches!(op, Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte)
        && field.kind == FieldKind::Bool
    {
        return Err(ListQueryError::UnsupportedOperator {
            field: path.to_string(),
            op: op.as_str().to_string(),
        });
    }

    let expr = match op {
        Operator::Exact => field.expr().eq(coerce(path, field.kind, value)?),
        Operator::IExact => lower(field).eq(text(path, value)?.to_lowercase()),
        Operator::Contains => field
            .expr()
            .like(like(format!("%{}%", like_escape(&text(path, value)?)))),
        Operator::IContains => lower(field).like(like(format!(
            "%{}%",
            like_escape(&text(path, value)?.to_lowercase())
        ))),
        Operator::StartsWith => field
            .expr()
            .like(like(format!("{}%", like_escape(&text(path, value)?)))),
        Operator::IStartsWith => lower(field).like(like(format!(
            "{}%",
            like_escape(&text(path, value)?.to_lowercase())
        ))),
        Operator::EndsWith => field
            .expr()
            .like(like(format!("%{}", like_escape(&text(path, value)?)))),
        Operator::IEndsWith => lower(field).like(like(format!(
            "%{}",
            like_escape(&text(path, value)?.to_lowercase())
        ))),
        Operator::Gt => field.expr().gt(coerce(path, field.kind, value)?),
        Operator::Gte => field.expr().gte(coerce(path, field.kind, value)?),
        Operator::Lt => field.expr().lt(coerce(path, field.kind, value)?),
        Operator::Lte => field.expr().lte(coerce(path, field.kind, value)?),
        Operator::In => {
            let items = match value {
                JsonValue::Array(items) => items
                    .iter()
                    .map(|item| coerce(path, field.kind, item))
                    .collect::<Result<Vec<_>, _>>()?,
                scalar => vec![coerce(path, field.kind, scalar)?],
            };
            field.expr().is_in(items)
        }
        Operator::IsNull => match parse_bool(value) {
            Some(true) => field.expr().is_null(),
            Some(false) => field.expr().is_not_null(),
            None => return Err(invalid(path, FieldKind::Bool, value)),
        },
    };
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("Name"), ("Name".to_string(), Operator::Exact));
        assert_eq!(
            split_key("Name__icontains"),
            ("Name".to_string(), Operator::IContains)
        );
        assert_eq!(
            split_key("Country.Name__in"),
            ("Country__Name".to_string(), Operator::In)
        );
        assert_eq!(
            split_key("Country.Name"),
            ("Country__Name".to_string(), Operator::Exact)
        );
        assert_eq!(split_key("Sequence__GTE"), ("Sequence".to_string(), Operator::Gte));
    }

    #[test]
    fn test_split_key_keeps_bare_operator_names() {
        assert_eq!(split_key("in"), ("in".to_string(), Operator::Exact));
        assert_eq!(split_key("__in"), ("__in".to_string(), Operator::Exact));
    }

    #[test]
    fn test_coerce_accepts_strings_for_numbers() {
        assert_eq!(
            coerce("Id", FieldKind::I64, &json!("42")).unwrap(),
            sea_orm::Value::from(42i64)
        );
        assert_eq!(
            coerce("Id", FieldKind::I64, &json!(42)).unwrap(),
            sea_orm::Value::from(42i64)
        );
        assert_eq!(
            coerce("Active", FieldKind::Bool, &json!("true")).unwrap(),
            sea_orm::Value::from(true)
        );
    }

    #[test]
    fn test_coerce_rejects_mismatched_values() {
        let err = coerce("Id", FieldKind::I64, &json!("abc")).unwrap_err();
        assert!(matches!(err, ListQueryError::InvalidValue { expected: "integer", .. }));

        let err = coerce("Name", FieldKind::String, &json!(null)).unwrap_err();
        assert!(matches!(err, ListQueryError::InvalidValue { .. }));

        let err = coerce("Id", FieldKind::I64, &json!(1.5)).unwrap_err();
        assert!(matches!(err, ListQueryError::InvalidValue { .. }));
    }

    #[test]
    fn test_like_escape() {
        assert_eq!(like_escape("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(like_escape("plain"), "plain");
    }
}
