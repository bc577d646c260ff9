use std::str::FromStr;

use chrono::NaiveDate;
use runtime::{ControlError, ControlValue};
use serde::Serialize;
use serde_json::Value;

pub const GRAPH_ID: &str = "choropleth-graph";
pub const DATE_PICKER: &str = "date-picker";
pub const PROJECTION: &str = "projection";
pub const METRIC: &str = "metric";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// How the day is picked on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerMode {
    /// A single date picker bounded by the data.
    #[default]
    Date,
    /// Year and month dropdowns plus a day slider.
    Calendar,
}

impl FromStr for PickerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(PickerMode::Date),
            "calendar" => Ok(PickerMode::Calendar),
            other => Err(format!("unknown picker mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: ControlValue,
}

impl DropdownOption {
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: ControlValue::Text(value.into()),
        }
    }

    pub fn number(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value: ControlValue::Number(value),
        }
    }

    pub fn month(month: u32) -> Self {
        let label = month
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i as usize))
            .map_or_else(|| month.to_string(), |name| (*name).to_string());
        Self::number(label, i64::from(month))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
    DatePicker {
        min: NaiveDate,
        max: NaiveDate,
        initial_visible_month: NaiveDate,
    },
    Dropdown {
        options: Vec<DropdownOption>,
    },
    Slider {
        min: i64,
        max: i64,
        step: i64,
    },
}

/// One input control as declared to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlSpec {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: ControlKind,
    /// Initial value.
    pub value: ControlValue,
}

impl ControlSpec {
    /// Converts a raw value sent by the page into a typed control value,
    /// refusing anything outside the declared options or bounds.
    ///
    /// Dates are not checked against the picker bounds: a day without data just
    /// produces an empty map.
    pub fn accept(&self, raw: &Value) -> Result<ControlValue, ControlError> {
        let reject = |reason: &str| ControlError::Rejected {
            id: self.id.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        match &self.kind {
            ControlKind::DatePicker { .. } => {
                let text = raw.as_str().ok_or_else(|| reject("expected a date string"))?;
                // Pickers may send a full timestamp; only the day matters.
                let day = text.split('T').next().unwrap_or(text).trim();
                NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map(ControlValue::Date)
                    .map_err(|_| reject("expected YYYY-MM-DD"))
            }
            ControlKind::Dropdown { options } => options
                .iter()
                .find(|opt| option_matches(&opt.value, raw))
                .map(|opt| opt.value.clone())
                .ok_or_else(|| reject("not one of the offered options")),
            ControlKind::Slider { min, max, .. } => {
                let n = as_integer(raw).ok_or_else(|| reject("expected an integer"))?;
                if n < *min || n > *max {
                    return Err(reject("outside slider bounds"));
                }
                Ok(ControlValue::Number(n))
            }
        }
    }
}

fn as_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn option_matches(option: &ControlValue, raw: &Value) -> bool {
    match option {
        ControlValue::Number(n) => as_integer(raw) == Some(*n),
        ControlValue::Text(t) => raw.as_str() == Some(t.as_str()),
        ControlValue::Date(d) => raw
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            == Some(*d),
    }
}

/// Everything the page needs to draw itself: the graph slot and the controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLayout {
    pub title: String,
    pub graph_id: &'static str,
    pub picker: PickerMode,
    pub controls: Vec<ControlSpec>,
}

impl PageLayout {
    pub fn control(&self, id: &str) -> Option<&ControlSpec> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn initial_values(&self) -> Vec<(String, ControlValue)> {
        self.controls
            .iter()
            .map(|c| (c.id.to_string(), c.value.clone()))
            .collect()
    }
}
