pub mod aggregate;

pub use aggregate::{TemplateFile, TemplateFileDto, TemplateFileId};
