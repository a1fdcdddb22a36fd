use super::field_map::to_storage_path;
use super::ListQueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    /// Only the exact tokens `asc` and `desc` are accepted.
    pub fn parse(token: &str) -> Result<Self, ListQueryError> {
        match token {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(ListQueryError::InvalidOrder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Storage path (`Country__Name`)
    pub path: String,
    pub dir: SortDir,
}

impl SortKey {
    fn new(field: &str, dir: SortDir) -> Self {
        Self {
            path: to_storage_path(field),
            dir,
        }
    }

    /// `-path` for descending, `path` for ascending.
    pub fn signed_token(&self) -> String {
        match self.dir {
            SortDir::Asc => self.path.clone(),
            SortDir::Desc => format!("-{}", self.path),
        }
    }
}

/// Pairs sort fields with directions.
///
/// * equal counts: paired positionally
/// * a single direction: applied to every field
/// * any other count mismatch: `OrderSizeMismatch`
/// * directions without fields: `UnusedOrder`
pub fn reconcile(sortby: &[String], order: &[String]) -> Result<Vec<SortKey>, ListQueryError> {
    if sortby.is_empty() {
        if !order.is_empty() {
            return Err(ListQueryError::UnusedOrder);
        }
        return Ok(Vec::new());
    }

    if sortby.len() == order.len() {
        return sortby
            .iter()
            .zip(order)
            .map(|(field, token)| Ok(SortKey::new(field, SortDir::parse(token)?)))
            .collect();
    }

    if order.len() == 1 {
        let dir = SortDir::parse(&order[0])?;
        return Ok(sortby.iter().map(|field| SortKey::new(field, dir)).collect());
    }

    Err(ListQueryError::OrderSizeMismatch {
        sortby: sortby.len(),
        order: order.len(),
    })
}

/// Effective order clause in signed-token form, e.g. `["-Name", "Code"]`.
pub fn order_clause(sortby: &[String], order: &[String]) -> Result<Vec<String>, ListQueryError> {
    Ok(reconcile(sortby, order)?
        .iter()
        .map(SortKey::signed_token)
        .collect())
}
