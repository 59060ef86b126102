//! API handlers.

pub mod catalog;
pub mod estimate;
pub mod health;
pub mod projection;
