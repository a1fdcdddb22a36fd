pub mod aggregate;

pub use aggregate::{AddressCountry, AddressCountryDto, AddressCountryId};
