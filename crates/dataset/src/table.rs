use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use foundation::{DateParts, DateRange, IsoCode};

use crate::record::Record;

/// Which day the presenter is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    /// Picked directly from a date picker.
    Exact(NaiveDate),
    /// Picked through year/month dropdowns and a day slider.
    Parts(DateParts),
}

impl DateSelection {
    /// The calendar day this selection names, if it names a real one.
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            DateSelection::Exact(date) => Some(*date),
            DateSelection::Parts(parts) => parts.to_date(),
        }
    }
}

/// Read-only table of records in source order, indexed by date.
///
/// Duplicate country-date pairs are kept as they appear; lookups by location
/// return the first one.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    rows: Vec<Record>,
    by_date: BTreeMap<NaiveDate, Vec<usize>>,
}

impl RecordTable {
    pub fn new(rows: Vec<Record>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
        for (i, row) in rows.iter().enumerate() {
            by_date.entry(row.date).or_default().push(i);
        }
        Self { rows, by_date }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Rows whose date equals `date`, in source order.
    pub fn on_date(&self, date: NaiveDate) -> impl Iterator<Item = &Record> + '_ {
        self.by_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(move |&i| &self.rows[i])
    }

    /// Rows matching the selection exactly. An impossible calendar day, or one
    /// outside the data, yields nothing.
    pub fn matching(&self, selection: &DateSelection) -> Vec<&Record> {
        match selection.day() {
            Some(day) => self.on_date(day).collect(),
            None => Vec::new(),
        }
    }

    pub fn get(&self, location: &IsoCode, date: NaiveDate) -> Option<&Record> {
        self.on_date(date).find(|r| &r.location == location)
    }

    pub fn date_bounds(&self) -> Option<DateRange> {
        let mut dates = self.dates();
        let first = dates.next()?;
        let last = dates.next_back().unwrap_or(first);
        DateRange::new(first, last)
    }

    /// Distinct dates with data, ascending.
    pub fn dates(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    fn parts(&self) -> impl Iterator<Item = DateParts> + '_ {
        self.rows.iter().map(Record::parts)
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.parts().map(|p| p.year).collect()
    }

    /// Months with data, optionally restricted to one year.
    pub fn months(&self, year: Option<i32>) -> BTreeSet<u32> {
        self.parts()
            .filter(|p| year.map_or(true, |y| p.year == y))
            .map(|p| p.month)
            .collect()
    }

    pub fn locations(&self) -> BTreeSet<&IsoCode> {
        self.rows.iter().map(|r| &r.location).collect()
    }
}
