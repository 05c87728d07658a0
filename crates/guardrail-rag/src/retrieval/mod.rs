//! Retrieval, guard rails and confidence scoring

pub mod confidence;
pub mod engine;
pub mod guard_rails;

pub use engine::{with_deadline, GuardRailEngine};
pub use guard_rails::is_too_generic;
