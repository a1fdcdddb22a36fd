use serde::{Deserialize, Serialize};

use crate::domain::common::AuditInfo;

crate::aggregate_id!(ProductProductId);

/// Товар (конкретная спецификация шаблона)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductProduct {
    pub id: ProductProductId,
    pub name: String,
    pub default_code: String,
    pub audit: AuditInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductProductDto {
    pub name: String,
    #[serde(default)]
    pub default_code: String,
}
