use serde::{Deserialize, Serialize};

use crate::domain::a006_product_attribute_value::ProductAttributeValue;
use crate::domain::common::AuditInfo;

crate::aggregate_id!(
    /// Уникальный идентификатор атрибута товара
    ProductAttributeId
);

/// Атрибут товара (цвет, размер, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub id: ProductAttributeId,
    /// Название атрибута (уникально)
    pub name: String,
    pub code: String,
    pub sequence: i32,
    /// Количество шаблонов товаров, использующих атрибут
    pub templates_count: i64,
    /// Количество товаров, связанных с атрибутом
    pub products_count: i64,
    /// Значения атрибута
    #[serde(default)]
    pub values: Vec<ProductAttributeValue>,
    pub audit: AuditInfo,
}

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductAttributeDto {
    pub id: Option<i64>,
    pub name: String,
    pub code: Option<String>,
    #[serde(default)]
    pub sequence: i32,
}

impl ProductAttributeDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name cannot be empty".into());
        }
        if self.sequence < 0 {
            return Err("Sequence cannot be negative".into());
        }
        Ok(())
    }
}
