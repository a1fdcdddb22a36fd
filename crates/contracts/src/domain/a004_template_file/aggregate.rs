use serde::{Deserialize, Serialize};

use crate::domain::common::AuditInfo;

crate::aggregate_id!(
    /// Уникальный идентификатор файла шаблона
    TemplateFileId
);

/// Файл шаблона (печатные формы, выгрузки)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    pub id: TemplateFileId,
    pub name: String,
    pub description: String,
    pub audit: AuditInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateFileDto {
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TemplateFileDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name cannot be empty".into());
        }
        Ok(())
    }
}
