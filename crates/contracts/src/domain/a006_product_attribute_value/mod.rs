pub mod aggregate;

pub use aggregate::{ProductAttributeValue, ProductAttributeValueDto, ProductAttributeValueId};
