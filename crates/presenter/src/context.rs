use dataset::RecordTable;
use foundation::DateRange;

use crate::PresenterError;

/// The loaded table plus the option sets derived from it.
///
/// Built once at startup and never reloaded; share it behind an `Arc`.
#[derive(Debug)]
pub struct DataContext {
    table: RecordTable,
    bounds: DateRange,
    years: Vec<i32>,
    months: Vec<u32>,
}

impl DataContext {
    pub fn new(table: RecordTable) -> Result<Self, PresenterError> {
        let bounds = table.date_bounds().ok_or(PresenterError::EmptyDataset)?;
        let years = table.years().into_iter().collect();
        let months = table.months(None).into_iter().collect();
        Ok(Self {
            table,
            bounds,
            years,
            months,
        })
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn bounds(&self) -> DateRange {
        self.bounds
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn months(&self) -> &[u32] {
        &self.months
    }
}
