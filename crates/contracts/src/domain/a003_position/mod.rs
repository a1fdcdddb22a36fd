pub mod aggregate;

pub use aggregate::{Position, PositionDto, PositionId};
