pub mod aggregate;

pub use aggregate::{ProductProduct, ProductProductDto, ProductProductId};
