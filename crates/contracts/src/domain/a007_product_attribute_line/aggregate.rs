use serde::{Deserialize, Serialize};

use crate::domain::a005_product_attribute::ProductAttributeId;
use crate::domain::common::AuditInfo;

crate::aggregate_id!(ProductAttributeLineId);

/// Строка атрибута в шаблоне товара
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributeLine {
    pub id: ProductAttributeLineId,
    pub attribute_id: ProductAttributeId,
    /// Шаблон товара, в котором используется атрибут
    pub template_id: i64,
    pub audit: AuditInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductAttributeLineDto {
    pub attribute_id: i64,
    pub template_id: i64,
}
