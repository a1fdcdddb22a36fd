pub mod aggregate;

pub use aggregate::{ProductAttributeLine, ProductAttributeLineDto, ProductAttributeLineId};
