use std::collections::BTreeMap;

use serde::Serialize;

pub const REDRAWS: &str = "redraws";
/// Rows plotted per redraw.
pub const REDRAW_ROWS: &str = "redraw_rows";
pub const UPDATES_REJECTED: &str = "update_rejected";
pub const DATASET_ROWS: &str = "dataset_rows";

/// Dashboard counters, gauges and row histograms.
///
/// Keys are sorted so `/status` prints them in the same order on every call.
/// The registry is plain data; callers share it behind their own lock.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    gauges: BTreeMap<&'static str, i64>,
    histograms: BTreeMap<&'static str, Histogram>,
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Histogram {
    pub count: u64,
    pub sum: u64,
    pub min: u64,
    pub max: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
}

impl Histogram {
    pub fn observe(&mut self, value: u64) {
        self.min = if self.count == 0 {
            value
        } else {
            self.min.min(value)
        };
        self.max = self.max.max(value);
        self.count += 1;
        self.sum = self.sum.saturating_add(value);
        self.mean = Some(self.sum as f64 / self.count as f64);
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn incr(&mut self, name: &'static str) {
        *self.counters.entry(name).or_default() += 1;
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: &'static str, value: i64) {
        self.gauges.insert(name, value);
    }

    pub fn observe(&mut self, name: &'static str, value: u64) {
        self.histograms.entry(name).or_default().observe(value);
    }

    pub fn histogram(&self, name: &str) -> Option<&Histogram> {
        self.histograms.get(name)
    }

    /// One finished redraw that plotted `rows` locations.
    pub fn record_redraw(&mut self, rows: usize) {
        self.incr(REDRAWS);
        self.observe(REDRAW_ROWS, rows as u64);
    }

    pub fn record_rejected_update(&mut self) {
        self.incr(UPDATES_REJECTED);
    }

    pub fn set_dataset_rows(&mut self, rows: usize) {
        self.set_gauge(DATASET_ROWS, i64::try_from(rows).unwrap_or(i64::MAX));
    }
}
