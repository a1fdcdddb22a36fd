pub mod audit;
pub mod crud;
pub mod db;
pub mod error;
pub mod schema;

#[cfg(test)]
pub mod test_support;
