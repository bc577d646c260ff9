//! Control state and metrics shared by the presenter and the server.

pub mod controls;
pub mod metrics;

pub use controls::*;
pub use metrics::{Histogram, Metrics};
