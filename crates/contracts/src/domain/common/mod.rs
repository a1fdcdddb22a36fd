//! Common types and traits for all aggregates

pub mod aggregate_id;
pub mod audit_info;

// Re-exports
pub use aggregate_id::AggregateId;
pub use audit_info::AuditInfo;
