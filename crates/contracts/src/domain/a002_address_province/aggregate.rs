use serde::{Deserialize, Serialize};

use crate::domain::a001_address_country::AddressCountryId;
use crate::domain::common::AuditInfo;

crate::aggregate_id!(
    /// Уникальный идентификатор провинции
    AddressProvinceId
);

/// Провинция (регион) страны
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressProvince {
    pub id: AddressProvinceId,
    pub name: String,
    pub country_id: Option<AddressCountryId>,
    /// Название страны, если связанная запись загружена
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    pub audit: AuditInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressProvinceDto {
    pub id: Option<i64>,
    pub name: String,
    pub country_id: Option<i64>,
}

impl AddressProvinceDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name cannot be empty".into());
        }
        Ok(())
    }
}
