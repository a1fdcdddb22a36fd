pub mod aggregate;

pub use aggregate::{ProductAttribute, ProductAttributeDto, ProductAttributeId};
