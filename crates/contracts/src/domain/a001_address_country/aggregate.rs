use serde::{Deserialize, Serialize};

use crate::domain::a002_address_province::AddressProvince;
use crate::domain::common::AuditInfo;

/// Максимальная длина названия страны
pub const NAME_MAX_LEN: usize = 50;

crate::aggregate_id!(
    /// Уникальный идентификатор страны
    AddressCountryId
);

/// Страна
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCountry {
    pub id: AddressCountryId,
    pub name: String,
    /// Провинции страны (загружаются вместе с записью)
    #[serde(default)]
    pub provinces: Vec<AddressProvince>,
    pub audit: AuditInfo,
}

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressCountryDto {
    pub id: Option<i64>,
    pub name: String,
}

impl AddressCountryDto {
    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name cannot be empty".into());
        }
        if name.chars().count() > NAME_MAX_LEN {
            return Err(format!("Name cannot exceed {} characters", NAME_MAX_LEN));
        }
        Ok(())
    }
}
