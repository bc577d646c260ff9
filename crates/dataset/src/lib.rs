//! Data loading for the dashboard.
//!
//! The dataset is fetched once over HTTP, parsed from CSV or JSON into a
//! [`RecordTable`], and treated as read-only afterwards.

pub mod error;
pub mod fetch;
pub mod parse;
pub mod record;
pub mod table;

pub use error::LoadError;
pub use fetch::{fetch_dataset, DatasetFormat, DatasetSource};
pub use parse::{parse_csv, parse_json, LoadOptions};
pub use record::{Metric, Record};
pub use table::{DateSelection, RecordTable};
