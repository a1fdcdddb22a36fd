use serde::{Deserialize, Serialize};

use crate::domain::a005_product_attribute::ProductAttributeId;
use crate::domain::common::AuditInfo;

crate::aggregate_id!(ProductAttributeValueId);

/// Значение атрибута товара ("красный", "XL", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributeValue {
    pub id: ProductAttributeValueId,
    pub name: String,
    pub sequence: i32,
    pub attribute_id: ProductAttributeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    pub audit: AuditInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductAttributeValueDto {
    pub name: String,
    pub attribute_id: i64,
    #[serde(default)]
    pub sequence: i32,
}
