use serde::{Deserialize, Serialize};

use crate::domain::common::AuditInfo;

crate::aggregate_id!(
    /// Уникальный идентификатор должности
    PositionId
);

/// Должность
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    /// Название должности (уникально)
    pub name: String,
    /// Описание должности
    pub description: String,
    pub audit: AuditInfo,
}

// ============================================================================
// DTO
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionDto {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl PositionDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name cannot be empty".into());
        }
        Ok(())
    }
}
