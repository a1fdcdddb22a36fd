pub mod config;
pub mod data;
pub mod list_query;
