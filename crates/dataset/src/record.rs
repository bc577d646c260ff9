use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use foundation::{DateParts, IsoCode};
use serde::{Deserialize, Serialize};

/// One country-day of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub location: IsoCode,
    pub name: String,
    pub date: NaiveDate,
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_cases: Option<f64>,
    pub new_deaths: Option<f64>,
}

impl Record {
    /// Row with only the cumulative case count set.
    pub fn cases(location: IsoCode, date: NaiveDate, total_cases: f64) -> Self {
        Self {
            name: location.to_string(),
            location,
            date,
            total_cases: Some(total_cases),
            total_deaths: None,
            new_cases: None,
            new_deaths: None,
        }
    }

    pub fn parts(&self) -> DateParts {
        DateParts::from_date(self.date)
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TotalCases => self.total_cases,
            Metric::TotalDeaths => self.total_deaths,
            Metric::NewCases => self.new_cases,
            Metric::NewDeaths => self.new_deaths,
        }
    }
}

/// Numeric column plotted on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    TotalCases,
    TotalDeaths,
    NewCases,
    NewDeaths,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::TotalCases,
        Metric::TotalDeaths,
        Metric::NewCases,
        Metric::NewDeaths,
    ];

    /// Column name in the OWID files.
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalCases => "total_cases",
            Metric::TotalDeaths => "total_deaths",
            Metric::NewCases => "new_cases",
            Metric::NewDeaths => "new_deaths",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalCases => "Total cases",
            Metric::TotalDeaths => "Total deaths",
            Metric::NewCases => "New cases",
            Metric::NewDeaths => "New deaths",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.column() == s.trim())
            .ok_or_else(|| format!("unknown metric {s:?}"))
    }
}
