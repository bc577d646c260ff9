//! Country codes and calendar helpers used across the dashboard crates.

pub mod ids;
pub mod time;

pub use ids::*;
pub use time::*;
