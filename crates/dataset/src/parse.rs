use std::fmt;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use foundation::IsoCode;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::LoadError;
use crate::record::Record;
use crate::table::RecordTable;

/// Columns the CSV header must carry; metric columns other than `total_cases`
/// are optional.
pub const REQUIRED_COLUMNS: [&str; 4] = ["iso_code", "location", "date", "total_cases"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop OWID aggregate pseudo-countries (`OWID_WRL`, `OWID_EUR`, ...).
    pub exclude_aggregates: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            exclude_aggregates: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    iso_code: String,
    location: String,
    date: String,
    total_cases: Option<f64>,
    #[serde(default)]
    total_deaths: Option<f64>,
    #[serde(default)]
    new_cases: Option<f64>,
    #[serde(default)]
    new_deaths: Option<f64>,
}

/// Top-level JSON object, kept in document order.
struct JsonCountries(Vec<(String, JsonCountry)>);

impl<'de> Deserialize<'de> for JsonCountries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountriesVisitor;

        impl<'de> Visitor<'de> for CountriesVisitor {
            type Value = JsonCountries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object keyed by location code")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut countries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, JsonCountry>()? {
                    countries.push(entry);
                }
                Ok(JsonCountries(countries))
            }
        }

        deserializer.deserialize_map(CountriesVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct JsonCountry {
    #[serde(default)]
    location: String,
    #[serde(default)]
    data: Vec<JsonDay>,
}

#[derive(Debug, Deserialize)]
struct JsonDay {
    date: String,
    #[serde(default)]
    total_cases: Option<f64>,
    #[serde(default)]
    total_deaths: Option<f64>,
    #[serde(default)]
    new_cases: Option<f64>,
    #[serde(default)]
    new_deaths: Option<f64>,
}

/// One source row before validation, borrowed from either format.
struct RawRow<'a> {
    iso_code: &'a str,
    name: &'a str,
    date: &'a str,
    total_cases: Option<f64>,
    total_deaths: Option<f64>,
    new_cases: Option<f64>,
    new_deaths: Option<f64>,
}

/// Accumulates rows shared by both formats and applies the load options.
struct RowSink {
    options: LoadOptions,
    rows: Vec<Record>,
    skipped_unlocated: u64,
    skipped_aggregates: u64,
}

impl RowSink {
    fn new(options: LoadOptions) -> Self {
        Self {
            options,
            rows: Vec::new(),
            skipped_unlocated: 0,
            skipped_aggregates: 0,
        }
    }

    fn push(&mut self, row: u64, raw: RawRow<'_>) -> Result<(), LoadError> {
        let iso_code = raw.iso_code;
        // Rows without a code cannot be placed on the map.
        if iso_code.trim().is_empty() {
            self.skipped_unlocated += 1;
            return Ok(());
        }
        let location = IsoCode::parse(iso_code).map_err(|_| LoadError::InvalidLocation {
            row,
            value: iso_code.to_string(),
        })?;
        if self.options.exclude_aggregates && location.is_aggregate() {
            self.skipped_aggregates += 1;
            return Ok(());
        }

        let date = parse_date(raw.date).ok_or_else(|| LoadError::InvalidDate {
            row,
            value: raw.date.to_string(),
        })?;

        self.rows.push(Record {
            location,
            name: raw.name.trim().to_string(),
            date,
            total_cases: raw.total_cases,
            total_deaths: raw.total_deaths,
            new_cases: raw.new_cases,
            new_deaths: raw.new_deaths,
        });
        Ok(())
    }

    fn finish(self) -> Result<RecordTable, LoadError> {
        debug!(
            rows = self.rows.len(),
            skipped_unlocated = self.skipped_unlocated,
            skipped_aggregates = self.skipped_aggregates,
            "dataset parsed"
        );
        if self.rows.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(RecordTable::new(self.rows))
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Parses the OWID CSV layout. Extra columns are ignored and header names may
/// carry surrounding whitespace.
pub fn parse_csv(bytes: &[u8], options: LoadOptions) -> Result<RecordTable, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut sink = RowSink::new(options);
    for result in reader.records() {
        let raw = result?;
        let line = raw.position().map_or(0, |p| p.line());
        let row: CsvRow = raw.deserialize(Some(&headers))?;
        sink.push(
            line,
            RawRow {
                iso_code: &row.iso_code,
                name: &row.location,
                date: &row.date,
                total_cases: row.total_cases,
                total_deaths: row.total_deaths,
                new_cases: row.new_cases,
                new_deaths: row.new_deaths,
            },
        )?;
    }
    sink.finish()
}

/// Parses the OWID JSON layout: an object keyed by location code, each holding a
/// `data` array of daily entries. Countries keep their document order and rows
/// are numbered in traversal order.
pub fn parse_json(bytes: &[u8], options: LoadOptions) -> Result<RecordTable, LoadError> {
    let JsonCountries(countries) = serde_json::from_slice(bytes)?;

    let mut sink = RowSink::new(options);
    let mut row = 0u64;
    for (code, country) in &countries {
        for day in &country.data {
            row += 1;
            sink.push(
                row,
                RawRow {
                    iso_code: code,
                    name: &country.location,
                    date: &day.date,
                    total_cases: day.total_cases,
                    total_deaths: day.total_deaths,
                    new_cases: day.new_cases,
                    new_deaths: day.new_deaths,
                },
            )?;
        }
    }
    sink.finish()
}

#[cfg(test)]
mod tests {
    use super::{parse_csv, parse_json, LoadOptions};
    use crate::error::LoadError;
    use crate::record::Record;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const CSV: &str = "\
iso_code,continent,location,date,total_cases,new_cases,total_deaths,new_deaths
USA,North America,United States,2020-03-01,100,10,1,
CAN,North America,Canada,2020-03-01,50,,,
OWID_WRL,,World,2020-03-01,90000,,,
,,International,2020-03-01,700,,,
USA,North America,United States,2020-03-02,150,50,2,1
";

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn codes(rows: &[Record]) -> Vec<&str> {
        rows.iter().map(|r| r.location.as_str()).collect()
    }

    #[test]
    fn csv_rows_parse_with_blank_cells() {
        let table = parse_csv(CSV.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(codes(table.rows()), vec!["USA", "CAN", "USA"]);

        let usa = &table.rows()[0];
        assert_eq!(usa.name, "United States");
        assert_eq!(usa.date, d(2020, 3, 1));
        assert_eq!(usa.total_cases, Some(100.0));
        assert_eq!(usa.new_cases, Some(10.0));
        assert_eq!(usa.new_deaths, None);

        let can = &table.rows()[1];
        assert_eq!(can.total_deaths, None);
    }

    #[test]
    fn aggregates_are_kept_when_asked() {
        let options = LoadOptions {
            exclude_aggregates: false,
        };
        let table = parse_csv(CSV.as_bytes(), options).unwrap();
        assert_eq!(codes(table.rows()), vec!["USA", "CAN", "OWID_WRL", "USA"]);
    }

    #[test]
    fn padded_header_names_still_match() {
        let csv = "iso_code, location ,date,total_cases\nUSA,United States,2020-03-01,1\n";
        let table = parse_csv(csv.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(codes(table.rows()), vec!["USA"]);
        assert_eq!(table.rows()[0].name, "United States");
        assert_eq!(table.rows()[0].total_cases, Some(1.0));
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let csv = "iso_code,location,total_cases\nUSA,United States,1\n";
        let err = parse_csv(csv.as_bytes(), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("date")), "{err}");
    }

    #[test]
    fn bad_date_reports_line() {
        let csv = "iso_code,location,date,total_cases\nUSA,United States,2020-03-01,1\nUSA,United States,03/02/2020,2\n";
        let err = parse_csv(csv.as_bytes(), LoadOptions::default()).unwrap_err();
        match err {
            LoadError::InvalidDate { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "03/02/2020");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_metric_is_a_csv_error() {
        let csv = "iso_code,location,date,total_cases\nUSA,United States,2020-03-01,lots\n";
        let err = parse_csv(csv.as_bytes(), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)), "{err}");
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "iso_code,location,date,total_cases\n";
        let err = parse_csv(csv.as_bytes(), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn json_layout_parses() {
        let json = r#"{
            "CAN": {"location": "Canada", "data": [{"date": "2020-03-01", "total_cases": 50.0}]},
            "OWID_WRL": {"location": "World", "data": [{"date": "2020-03-01", "total_cases": 9.0}]},
            "USA": {"location": "United States", "continent": "North America", "data": [
                {"date": "2020-03-01", "total_cases": 100.0, "total_deaths": 1.0},
                {"date": "2020-03-02", "total_cases": 150.0}
            ]}
        }"#;
        let table = parse_json(json.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(codes(table.rows()), vec!["CAN", "USA", "USA"]);
        assert_eq!(table.rows()[1].total_deaths, Some(1.0));
        assert_eq!(table.on_date(d(2020, 3, 2)).count(), 1);
    }

    #[test]
    fn json_countries_keep_document_order() {
        let json = r#"{
            "USA": {"location": "United States", "data": [{"date": "2020-03-01", "total_cases": 100.0}]},
            "CAN": {"location": "Canada", "data": [{"date": "2020-03-01", "total_cases": 50.0}]}
        }"#;
        let table = parse_json(json.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(codes(table.rows()), vec!["USA", "CAN"]);
        assert_eq!(table.rows()[1].name, "Canada");
    }

    #[test]
    fn json_non_object_is_rejected() {
        let err = parse_json(b"[1, 2]", LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)), "{err}");
    }

    #[test]
    fn json_bad_location_is_rejected() {
        let json = r#"{"usa": {"location": "x", "data": [{"date": "2020-03-01"}]}}"#;
        let err = parse_json(json.as_bytes(), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidLocation { row: 1, .. }), "{err}");
    }
}
