pub mod aggregate;

pub use aggregate::{AddressProvince, AddressProvinceDto, AddressProvinceId};
